//! Pointer samples and the listener hub that feeds them to the camera
//!
//! Pointer moves are written into a [`PointerSlot`] by the event handler and
//! read back once per frame by the render loop. The slot keeps only the most
//! recent sample.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Normalized pointer position, `x` and `y` in `[-1, 1]`, `+y` pointing up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub const CENTER: PointerSample = PointerSample { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Normalizes a window-space cursor position (origin top left, `y` down).
    ///
    /// A zero-sized window has no meaningful position and yields the centre.
    pub fn from_window_position(px: f64, py: f64, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::CENTER;
        }
        let x = (px / width as f64) * 2.0 - 1.0;
        let y = -(py / height as f64) * 2.0 + 1.0;
        Self::new(x as f32, y as f32)
    }

    fn pack(self) -> u64 {
        ((self.x.to_bits() as u64) << 32) | self.y.to_bits() as u64
    }

    fn unpack(bits: u64) -> Self {
        Self {
            x: f32::from_bits((bits >> 32) as u32),
            y: f32::from_bits(bits as u32),
        }
    }
}

/// Last-value cell for pointer samples. One writer, one reader, no locking.
#[derive(Debug)]
pub struct PointerSlot(AtomicU64);

impl PointerSlot {
    pub fn new() -> Self {
        Self(AtomicU64::new(PointerSample::CENTER.pack()))
    }

    pub fn store(&self, sample: PointerSample) {
        self.0.store(sample.pack(), Ordering::Release);
    }

    pub fn load(&self) -> PointerSample {
        PointerSample::unpack(self.0.load(Ordering::Acquire))
    }
}

impl Default for PointerSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration token returned by [`PointerInput::subscribe`].
///
/// Not `Clone`: unsubscribing consumes it, so a listener can only be removed once.
#[derive(Debug)]
pub struct PointerListener {
    id: u64,
}

impl PointerListener {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Fan-out of pointer moves to every subscribed slot
#[derive(Debug, Default)]
pub struct PointerInput {
    next_id: u64,
    listeners: Vec<(u64, Arc<PointerSlot>)>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, slot: Arc<PointerSlot>) -> PointerListener {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, slot));
        log::trace!("pointer listener {} subscribed", id);
        PointerListener { id }
    }

    /// Returns `false` when the listener was not registered with this hub.
    pub fn unsubscribe(&mut self, listener: PointerListener) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != listener.id);
        before != self.listeners.len()
    }

    /// Stores `sample` in every subscribed slot and returns how many received it.
    pub fn dispatch(&self, sample: PointerSample) -> usize {
        for (_, slot) in &self.listeners {
            slot.store(sample);
        }
        self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
