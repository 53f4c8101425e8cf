//! The output surface a generation draws into

/// Proof that a surface is attached to a viewport.
///
/// Issued by [`Viewport::attach_surface`] and consumed by
/// [`Viewport::detach_surface`]; it cannot be cloned, so a surface is detached
/// at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct SurfaceAttachment {
    id: u64,
}

impl SurfaceAttachment {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A mountable container for rendered output
pub trait Viewport {
    /// Current size in physical pixels
    fn size(&self) -> (u32, u32);

    fn attach_surface(&mut self) -> SurfaceAttachment;

    fn detach_surface(&mut self, attachment: SurfaceAttachment);
}
