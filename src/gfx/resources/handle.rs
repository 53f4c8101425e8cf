//! GPU resource handles and live-handle bookkeeping
//!
//! A [`ResourceHandle`] names one GPU-side allocation (a geometry buffer pair
//! or a material uniform). Handles are issued by a [`ResourceTracker`], owned by
//! the scene node that requested them, and returned to the tracker exactly once
//! when their generation is disposed.

use std::collections::HashSet;
use std::fmt;

use crate::error::LifecycleError;

/// What a handle refers to on the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
}

/// Opaque id of one GPU allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    id: u64,
    kind: ResourceKind,
}

impl ResourceHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.id)
    }
}

/// Receives release notifications for handles so the backing GPU memory can be freed.
pub trait ResourceBackend {
    fn release(&mut self, handle: ResourceHandle);
}

/// Issues handles and tracks which ones are still live
#[derive(Debug, Default)]
pub struct ResourceTracker {
    next_id: u64,
    live: HashSet<ResourceHandle>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: ResourceKind) -> ResourceHandle {
        let handle = ResourceHandle {
            id: self.next_id,
            kind,
        };
        self.next_id += 1;
        self.live.insert(handle);
        handle
    }

    /// Marks a handle as freed.
    ///
    /// Releasing a handle that is not live (never issued, or already released)
    /// is reported instead of silently ignored.
    pub fn release(&mut self, handle: ResourceHandle) -> Result<(), LifecycleError> {
        if self.live.remove(&handle) {
            Ok(())
        } else {
            Err(LifecycleError::UnknownHandle(handle))
        }
    }

    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique() {
        let mut tracker = ResourceTracker::new();
        let a = tracker.allocate(ResourceKind::Geometry);
        let b = tracker.allocate(ResourceKind::Material);
        let c = tracker.allocate(ResourceKind::Geometry);
        assert_ne!(a, c);
        assert_ne!(a.id(), b.id());
        assert_eq!(tracker.live_count(), 3);
        assert_eq!(a.kind(), ResourceKind::Geometry);
        assert_eq!(b.kind(), ResourceKind::Material);
    }

    #[test]
    fn double_release_is_reported() {
        let mut tracker = ResourceTracker::new();
        let h = tracker.allocate(ResourceKind::Material);
        assert!(tracker.release(h).is_ok());
        assert!(!tracker.is_live(h));
        assert!(matches!(
            tracker.release(h),
            Err(LifecycleError::UnknownHandle(x)) if x == h
        ));
        assert_eq!(tracker.live_count(), 0);
    }
}
