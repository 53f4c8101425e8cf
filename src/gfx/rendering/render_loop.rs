//! Per-frame render loop
//!
//! One [`RenderLoop::step`] reads the pointer, computes the camera pose and
//! issues exactly one draw. The host decides when to call the next step based
//! on the returned [`Tick`]; a cancelled loop never draws again.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    error::RenderError,
    gfx::{
        camera::{CameraController, CameraPose, PointerSlot},
        scene::SceneGraph,
    },
};

/// Shared stop flag for a render loop
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Everything a sink needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub scene: &'a SceneGraph,
    pub pose: CameraPose,
    pub frame_index: u64,
}

/// Consumer of frames, normally the GPU render engine
pub trait FrameSink {
    fn draw(&mut self, frame: &FrameContext<'_>) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A frame was drawn; schedule the next step
    Reschedule,
    /// The loop is cancelled; do not schedule again
    Stopped,
}

#[derive(Debug)]
pub struct RenderLoop {
    token: CancellationToken,
    pointer: Arc<PointerSlot>,
    controller: CameraController,
    frames: u64,
}

impl RenderLoop {
    pub fn new(pointer: Arc<PointerSlot>) -> Self {
        Self {
            token: CancellationToken::new(),
            pointer,
            controller: CameraController::new(),
            frames: 0,
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn step<S>(&mut self, scene: &SceneGraph, sink: &mut S) -> Result<Tick, RenderError>
    where
        S: FrameSink + ?Sized,
    {
        if self.token.is_cancelled() {
            return Ok(Tick::Stopped);
        }

        let pose = self.controller.pose(self.pointer.load());
        let frame = FrameContext {
            scene,
            pose,
            frame_index: self.frames,
        };
        sink.draw(&frame)?;
        self.frames += 1;

        Ok(Tick::Reschedule)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::{gfx::camera::PointerSample, testing::RecordingHost};

    #[test]
    fn each_step_draws_once_with_latest_pointer() {
        let slot = Arc::new(PointerSlot::new());
        let mut render_loop = RenderLoop::new(slot.clone());
        let scene = SceneGraph::new([0.0; 3]);
        let mut host = RecordingHost::new(800, 600);

        assert!(matches!(render_loop.step(&scene, &mut host), Ok(Tick::Reschedule)));
        slot.store(PointerSample::new(0.0, 1.0));
        slot.store(PointerSample::new(0.0, -1.0));
        assert!(matches!(render_loop.step(&scene, &mut host), Ok(Tick::Reschedule)));

        assert_eq!(host.frames.len(), 2);
        assert_eq!(host.frames[0].frame_index, 0);
        assert_eq!(host.frames[1].frame_index, 1);
        assert!((host.frames[1].pose.position.y - 5.0).abs() < 1e-5);
        assert_eq!(host.frames[1].pose.look_at, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(render_loop.frames(), 2);
    }

    #[test]
    fn cancelled_loop_never_draws() {
        let mut render_loop = RenderLoop::new(Arc::new(PointerSlot::new()));
        let scene = SceneGraph::new([0.0; 3]);
        let mut host = RecordingHost::new(800, 600);

        let token = render_loop.token();
        token.cancel();

        for _ in 0..3 {
            assert!(matches!(render_loop.step(&scene, &mut host), Ok(Tick::Stopped)));
        }
        assert!(host.frames.is_empty());
        assert_eq!(render_loop.frames(), 0);
    }

    #[test]
    fn draw_failure_is_propagated() {
        let mut render_loop = RenderLoop::new(Arc::new(PointerSlot::new()));
        let scene = SceneGraph::new([0.0; 3]);
        let mut host = RecordingHost::new(800, 600);
        host.fail_draws = true;

        assert!(matches!(
            render_loop.step(&scene, &mut host),
            Err(RenderError::Detached)
        ));
        assert_eq!(render_loop.frames(), 0);
    }
}
