//! Generation lifecycle and GPU resource teardown
//!
//! A generation is everything one build of the field list produced: the scene
//! graph with its handles, the render loop, the pointer listener and the
//! surface attachment. Rebuilding or unmounting disposes the whole generation
//! in one [`ResourceLifecycleManager::dispose_all`] call.

use std::sync::Arc;

use crate::{
    error::{LifecycleError, RenderError},
    farm::{builder::SceneBuilder, field::FieldDescriptor},
    gfx::{
        camera::{PointerInput, PointerListener, PointerSlot},
        rendering::render_loop::{FrameSink, RenderLoop, Tick},
        scene::SceneGraph,
        viewport::{SurfaceAttachment, Viewport},
    },
};

use super::handle::{ResourceBackend, ResourceKind, ResourceTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationState {
    Uninitialized,
    Built,
    Running,
    /// Terminal
    Disposed,
}

impl GenerationState {
    pub fn can_transition_to(self, next: GenerationState) -> bool {
        use GenerationState::*;
        matches!(
            (self, next),
            (Uninitialized, Built)
                | (Built, Running)
                | (Uninitialized, Disposed)
                | (Built, Disposed)
                | (Running, Disposed)
        )
    }
}

/// One build of the scene together with the resources it holds
#[derive(Debug)]
pub struct Generation {
    id: u64,
    state: GenerationState,
    scene: SceneGraph,
    render_loop: RenderLoop,
    listener: Option<PointerListener>,
    attachment: Option<SurfaceAttachment>,
}

impl Generation {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub fn is_disposed(&self) -> bool {
        self.state == GenerationState::Disposed
    }

    pub(crate) fn transition(&mut self, next: GenerationState) -> Result<(), LifecycleError> {
        if !self.state.can_transition_to(next) {
            return Err(LifecycleError::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        log::trace!("generation {}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Runs one render loop step. The first step moves a built generation to running.
    pub fn step<S>(&mut self, sink: &mut S) -> Result<Tick, RenderError>
    where
        S: FrameSink + ?Sized,
    {
        if self.state == GenerationState::Built {
            self.state = GenerationState::Running;
        }
        self.render_loop.step(&self.scene, sink)
    }
}

/// Outcome of [`ResourceLifecycleManager::dispose_all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposeReport {
    AlreadyDisposed,
    Released { geometries: usize, materials: usize },
}

/// Owns the handle tracker and builds and tears down generations
#[derive(Debug, Default)]
pub struct ResourceLifecycleManager {
    tracker: ResourceTracker,
    next_generation: u64,
}

impl ResourceLifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the scene for `fields`, attaches the surface and subscribes a
    /// fresh pointer slot. The returned generation is `Built`.
    pub fn build_generation<H>(
        &mut self,
        builder: &SceneBuilder,
        fields: &[FieldDescriptor],
        host: &mut H,
        input: &mut PointerInput,
    ) -> Result<Generation, LifecycleError>
    where
        H: Viewport + ?Sized,
    {
        let id = self.next_generation;
        self.next_generation += 1;

        let slot = Arc::new(PointerSlot::new());
        let mut generation = Generation {
            id,
            state: GenerationState::Uninitialized,
            scene: SceneGraph::new(builder.background()),
            render_loop: RenderLoop::new(slot.clone()),
            listener: None,
            attachment: None,
        };

        generation.scene = builder.build(fields, &mut self.tracker);
        generation.attachment = Some(host.attach_surface());
        generation.listener = Some(input.subscribe(slot));
        generation.transition(GenerationState::Built)?;

        log::debug!(
            "generation {} built: {} fields, {} live handles",
            id,
            fields.len(),
            self.tracker.live_count()
        );
        Ok(generation)
    }

    /// Tears down a generation.
    ///
    /// Stops the render loop, removes the pointer listener, detaches the
    /// surface and releases every geometry and material handle in the scene.
    /// Disposing an already disposed generation does nothing.
    pub fn dispose_all<H>(
        &mut self,
        generation: &mut Generation,
        host: &mut H,
        input: &mut PointerInput,
    ) -> Result<DisposeReport, LifecycleError>
    where
        H: Viewport + ResourceBackend + ?Sized,
    {
        if generation.is_disposed() {
            return Ok(DisposeReport::AlreadyDisposed);
        }

        generation.render_loop.cancel();
        if let Some(listener) = generation.listener.take() {
            if !input.unsubscribe(listener) {
                log::warn!(
                    "generation {}: pointer listener not registered with this input",
                    generation.id
                );
            }
        }
        if let Some(attachment) = generation.attachment.take() {
            host.detach_surface(attachment);
        }

        let mut geometries = 0;
        let mut materials = 0;
        let mut first_error = None;
        for handle in generation.scene.handles() {
            match self.tracker.release(handle) {
                Ok(()) => {
                    host.release(handle);
                    match handle.kind() {
                        ResourceKind::Geometry => geometries += 1,
                        ResourceKind::Material => materials += 1,
                    }
                }
                Err(err) => {
                    log::error!("generation {}: {}", generation.id, err);
                    first_error.get_or_insert(err);
                }
            }
        }

        generation.transition(GenerationState::Disposed)?;
        log::debug!(
            "generation {} disposed: {} geometries, {} materials released",
            generation.id,
            geometries,
            materials
        );

        match first_error {
            Some(err) => Err(err),
            None => Ok(DisposeReport::Released {
                geometries,
                materials,
            }),
        }
    }

    pub fn live_handles(&self) -> usize {
        self.tracker.live_count()
    }

}
