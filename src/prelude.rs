//! # Farm Twin Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use farm_twin::prelude::*;
//!
//! fn main() -> Result<(), FarmTwinError> {
//!     let fields = vec![
//!         FieldDescriptor::new("North", 10.0, 10.0).with_crop("Corn"),
//!         FieldDescriptor::new("South", 12.0, 8.0).with_crop("Wheat"),
//!     ];
//!     FarmTwinApp::new(ViewerConfig::from_env())
//!         .with_fields(fields)
//!         .run()
//! }
//! ```

pub use crate::{
    app::FarmTwinApp,
    config::ViewerConfig,
    error::{FarmTwinError, LifecycleError, RenderError},
    farm::{
        FieldDescriptor, PlantModel, PlantVariant, ProceduralModelFactory, SceneBuilder,
    },
    gfx::{
        camera::{CameraController, CameraPose, PointerInput, PointerSample},
        rendering::{FrameContext, FrameSink, RenderLoop, Tick},
        resources::{
            DisposeReport, GenerationState, ResourceBackend, ResourceHandle,
            ResourceLifecycleManager, ResourceTracker,
        },
        scene::{NodeRole, SceneGraph, SceneNode},
        RenderEngine, SurfaceAttachment, Viewport,
    },
    view::{FarmView, MountOutcome},
};
