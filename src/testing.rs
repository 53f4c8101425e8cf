//! Headless stand-in for the GPU host

use crate::{
    error::RenderError,
    gfx::{
        camera::CameraPose,
        rendering::render_loop::{FrameContext, FrameSink},
        resources::handle::{ResourceBackend, ResourceHandle},
        viewport::{SurfaceAttachment, Viewport},
    },
};

/// What a [`RecordingHost`] saw for one drawn frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedFrame {
    pub frame_index: u64,
    pub pose: CameraPose,
    pub drawables: usize,
}

/// Records every viewport, release and draw call instead of touching a GPU
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub size: (u32, u32),
    pub attached: usize,
    pub detached: usize,
    pub released: Vec<ResourceHandle>,
    pub frames: Vec<RecordedFrame>,
    pub fail_draws: bool,
    next_attachment: u64,
    active_attachment: Option<u64>,
}

impl RecordingHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }

    pub fn is_attached(&self) -> bool {
        self.active_attachment.is_some()
    }
}

impl Viewport for RecordingHost {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn attach_surface(&mut self) -> SurfaceAttachment {
        assert!(
            self.active_attachment.is_none(),
            "surface attached twice without detaching"
        );
        let id = self.next_attachment;
        self.next_attachment += 1;
        self.attached += 1;
        self.active_attachment = Some(id);
        SurfaceAttachment::new(id)
    }

    fn detach_surface(&mut self, attachment: SurfaceAttachment) {
        assert_eq!(self.active_attachment, Some(attachment.id()));
        self.active_attachment = None;
        self.detached += 1;
    }
}

impl ResourceBackend for RecordingHost {
    fn release(&mut self, handle: ResourceHandle) {
        assert!(
            !self.released.contains(&handle),
            "{handle} released twice"
        );
        self.released.push(handle);
    }
}

impl FrameSink for RecordingHost {
    fn draw(&mut self, frame: &FrameContext<'_>) -> Result<(), RenderError> {
        if self.fail_draws {
            return Err(RenderError::Detached);
        }
        self.frames.push(RecordedFrame {
            frame_index: frame.frame_index,
            pose: frame.pose,
            drawables: frame.scene.drawables().len(),
        });
        Ok(())
    }
}
