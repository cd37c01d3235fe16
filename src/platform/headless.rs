//! Headless collaborators
//!
//! Frames are "delivered" by whoever owns the loop calling
//! [`LoopDriver::on_frame`] with made-up timestamps.
//!
//! [`LoopDriver::on_frame`]: crate::driver::LoopDriver::on_frame

use glam::Vec2;
use serde::Serialize;

use crate::driver::{FrameHandle, FrameScheduler, Renderer, Snapshot};

/// Scheduler that only counts requests and cancellations
#[derive(Debug, Default)]
pub struct ManualScheduler {
    /// Total frames requested
    pub requested: u64,
    /// Handles cancelled, in order
    pub cancelled: Vec<FrameHandle>,
    last: Option<FrameHandle>,
}

impl ManualScheduler {
    /// Whether a requested frame is still due
    pub fn has_pending(&self) -> bool {
        match self.last {
            Some(handle) => !self.cancelled.contains(&handle),
            None => false,
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.requested += 1;
        let handle = FrameHandle(self.requested as i64);
        self.last = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }
}

/// Positions captured from one render pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedFrame {
    pub sim_time: f64,
    pub score: u64,
    pub paddle: Vec2,
    pub ball: Vec2,
    pub bonus: Option<Vec2>,
}

/// Renderer that keeps the most recent frame
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: u64,
    pub last: Option<RenderedFrame>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        self.frames += 1;
        self.last = Some(RenderedFrame {
            sim_time: snapshot.sim_time,
            score: snapshot.score,
            paddle: snapshot.paddle.pos,
            ball: snapshot.ball.pos,
            bonus: snapshot.bonus.map(|b| b.pos),
        });
        log::trace!(
            "frame {} t={:.0} ball=({:.1}, {:.1}) score={}",
            self.frames,
            snapshot.sim_time,
            snapshot.ball.pos.x,
            snapshot.ball.pos.y,
            snapshot.score
        );
    }
}
