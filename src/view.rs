//! Mount, rebuild, frame and unmount of the farm scene
//!
//! [`FarmView`] keeps at most one live generation. Any change to the field
//! list disposes the current generation before the next one is built, so GPU
//! memory never holds two scenes at once.

use crate::{
    error::{LifecycleError, RenderError},
    farm::{builder::SceneBuilder, field::FieldDescriptor},
    gfx::{
        camera::{PointerInput, PointerSample},
        rendering::render_loop::{FrameSink, Tick},
        resources::{
            handle::ResourceBackend,
            lifecycle::{DisposeReport, Generation, ResourceLifecycleManager},
        },
        viewport::Viewport,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    /// No container to render into; nothing was built
    NoSurface,
}

#[derive(Debug, Default)]
pub struct FarmView {
    builder: SceneBuilder,
    manager: ResourceLifecycleManager,
    input: PointerInput,
    fields: Vec<FieldDescriptor>,
    generation: Option<Generation>,
}

impl FarmView {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn generation(&self) -> Option<&Generation> {
        self.generation.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.generation.is_some()
    }

    pub fn live_handles(&self) -> usize {
        self.manager.live_handles()
    }

    /// Builds the scene into `host`. Mounting again tears down the previous
    /// generation first.
    pub fn mount<H>(&mut self, host: Option<&mut H>) -> Result<MountOutcome, LifecycleError>
    where
        H: Viewport + ResourceBackend + ?Sized,
    {
        let Some(host) = host else {
            log::debug!("no surface to mount into, skipping scene build");
            return Ok(MountOutcome::NoSurface);
        };

        self.teardown(host)?;
        let generation =
            self.manager
                .build_generation(&self.builder, &self.fields, host, &mut self.input)?;
        let (width, height) = host.size();
        log::info!(
            "mounted generation {} with {} fields at {}x{}",
            generation.id(),
            self.fields.len(),
            width,
            height
        );
        self.generation = Some(generation);
        Ok(MountOutcome::Mounted)
    }

    /// Replaces the field list.
    ///
    /// Every call hands over a new list, so a mounted scene is always disposed
    /// and rebuilt, even when the content is unchanged. Returns `true` when
    /// that happened; while unmounted the list is only stored.
    pub fn set_fields<H>(
        &mut self,
        fields: Vec<FieldDescriptor>,
        host: &mut H,
    ) -> Result<bool, LifecycleError>
    where
        H: Viewport + ResourceBackend + ?Sized,
    {
        self.fields = fields;

        if self.generation.is_none() {
            return Ok(false);
        }
        self.teardown(host)?;
        let generation =
            self.manager
                .build_generation(&self.builder, &self.fields, host, &mut self.input)?;
        log::debug!(
            "rebuilt as generation {} with {} fields",
            generation.id(),
            self.fields.len()
        );
        self.generation = Some(generation);
        Ok(true)
    }

    /// Runs one render loop step. Without a live generation the loop is stopped.
    pub fn frame<S>(&mut self, sink: &mut S) -> Result<Tick, RenderError>
    where
        S: FrameSink + ?Sized,
    {
        match self.generation.as_mut() {
            Some(generation) => generation.step(sink),
            None => Ok(Tick::Stopped),
        }
    }

    /// Forwards a pointer move. Returns how many listeners received it.
    pub fn on_pointer_move(&self, sample: PointerSample) -> usize {
        self.input.dispatch(sample)
    }

    /// Disposes the live generation, if any
    pub fn unmount<H>(&mut self, host: &mut H) -> Result<Option<DisposeReport>, LifecycleError>
    where
        H: Viewport + ResourceBackend + ?Sized,
    {
        let report = self.teardown(host)?;
        if let Some(report) = report {
            log::info!("unmounted: {:?}", report);
        }
        Ok(report)
    }

    fn teardown<H>(&mut self, host: &mut H) -> Result<Option<DisposeReport>, LifecycleError>
    where
        H: Viewport + ResourceBackend + ?Sized,
    {
        let Some(mut generation) = self.generation.take() else {
            return Ok(None);
        };
        self.manager
            .dispose_all(&mut generation, host, &mut self.input)
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::{gfx::resources::lifecycle::GenerationState, testing::RecordingHost};

    fn farm() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("North", 10.0, 10.0).with_crop("Corn"),
            FieldDescriptor::new("East", 8.0, 12.0).with_crop("Winter wheat"),
            FieldDescriptor::new("Fallow", 6.0, 6.0),
        ]
    }

    #[test]
    fn no_surface_builds_nothing() {
        let mut view = FarmView::new(farm());
        let outcome = view.mount::<RecordingHost>(None).unwrap();
        assert_eq!(outcome, MountOutcome::NoSurface);
        assert!(!view.is_mounted());
        assert_eq!(view.live_handles(), 0);
        assert_eq!(view.on_pointer_move(PointerSample::new(0.5, 0.5)), 0);

        let mut host = RecordingHost::new(800, 600);
        assert!(matches!(view.frame(&mut host), Ok(Tick::Stopped)));
        assert!(host.frames.is_empty());
    }

    #[test]
    fn mounted_view_draws_with_pointer_pose() {
        let mut view = FarmView::new(farm());
        let mut host = RecordingHost::new(800, 600);
        assert_eq!(view.mount(Some(&mut host)), Ok(MountOutcome::Mounted));

        assert_eq!(view.on_pointer_move(PointerSample::new(1.0, 1.0)), 1);
        assert!(matches!(view.frame(&mut host), Ok(Tick::Reschedule)));

        let frame = host.frames[0];
        assert!(frame.pose.position.x.abs() < 1e-4);
        assert!((frame.pose.position.y - 15.0).abs() < 1e-4);
        assert!((frame.pose.position.z + 15.0).abs() < 1e-4);
        // ground + 3 plots + 3 labels + 8 corn + 90 wheat
        assert_eq!(frame.drawables, 105);
        assert_eq!(
            view.generation().map(|g| g.state()),
            Some(GenerationState::Running)
        );
    }

    #[test]
    fn identical_fields_still_rebuild() {
        let mut view = FarmView::new(farm());
        let mut host = RecordingHost::new(800, 600);
        view.mount(Some(&mut host)).unwrap();
        let first = view.generation().map(|g| g.id());
        let owned = view.generation().map(|g| g.scene().handles()).unwrap_or_default();

        assert_eq!(view.set_fields(farm(), &mut host), Ok(true));
        assert_ne!(view.generation().map(|g| g.id()), first);
        assert_eq!(host.released, owned);
        assert_eq!(host.detached, 1);
        assert_eq!(host.attached, 2);
        assert_eq!(view.live_handles(), owned.len());
    }

    #[test]
    fn changed_fields_dispose_before_rebuild() {
        let mut view = FarmView::new(farm());
        let mut host = RecordingHost::new(800, 600);
        view.mount(Some(&mut host)).unwrap();
        let old_handles = view
            .generation()
            .map(|g| g.scene().handles())
            .unwrap_or_default();

        let mut fields = farm();
        fields.pop();
        assert_eq!(view.set_fields(fields, &mut host), Ok(true));

        assert_eq!(host.released, old_handles);
        assert_eq!(host.detached, 1);
        assert_eq!(host.attached, 2);
        let new_handles = view
            .generation()
            .map(|g| g.scene().handles())
            .unwrap_or_default();
        assert_eq!(view.live_handles(), new_handles.len());
    }

    #[test]
    fn fields_set_while_unmounted_are_used_on_mount() {
        let mut view = FarmView::new(Vec::new());
        let mut host = RecordingHost::new(800, 600);
        assert_eq!(view.set_fields(farm(), &mut host), Ok(false));
        assert_eq!(view.live_handles(), 0);

        view.mount(Some(&mut host)).unwrap();
        assert_eq!(view.fields().len(), 3);
        assert!(view.live_handles() > 0);
    }

    #[test]
    fn unmount_stops_everything_and_is_repeatable() {
        let mut view = FarmView::new(farm());
        let mut host = RecordingHost::new(800, 600);
        view.mount(Some(&mut host)).unwrap();
        view.frame(&mut host).unwrap();

        let report = view.unmount(&mut host).unwrap();
        assert!(matches!(report, Some(DisposeReport::Released { .. })));
        assert_eq!(view.live_handles(), 0);
        assert!(!host.is_attached());

        assert_eq!(view.on_pointer_move(PointerSample::new(-1.0, 0.0)), 0);
        assert!(matches!(view.frame(&mut host), Ok(Tick::Stopped)));
        assert_eq!(host.frames.len(), 1);
        assert_eq!(view.unmount(&mut host), Ok(None));
    }

    #[test]
    fn random_rebuilds_never_leak_handles() {
        let crops = ["Corn", "wheat", "Maize", "Soy", ""];
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut view = FarmView::new(Vec::new());
        let mut host = RecordingHost::new(1024, 768);
        view.mount(Some(&mut host)).unwrap();

        for _ in 0..25 {
            let count = rng.random_range(0..7);
            let fields = (0..count)
                .map(|i| {
                    let field = FieldDescriptor::new(
                        format!("Field {i}"),
                        rng.random_range(1.0..20.0),
                        rng.random_range(1.0..20.0),
                    );
                    if rng.random_bool(0.7) {
                        field.with_crop(crops[rng.random_range(0..crops.len())])
                    } else {
                        field
                    }
                })
                .collect();
            view.set_fields(fields, &mut host).unwrap();
            view.frame(&mut host).unwrap();

            let current = view
                .generation()
                .map(|g| g.scene().handles().len())
                .unwrap_or_default();
            assert_eq!(view.live_handles(), current);
        }

        view.unmount(&mut host).unwrap();
        assert_eq!(view.live_handles(), 0);
        let unique: HashSet<_> = host.released.iter().collect();
        assert_eq!(unique.len(), host.released.len());
        assert_eq!(host.attached, host.detached);
    }
}
