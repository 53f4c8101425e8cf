use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    config::ViewerConfig,
    error::{FarmTwinError, RenderError},
    farm::field::FieldDescriptor,
    gfx::{camera::PointerSample, rendering::render_loop::Tick, RenderEngine},
    view::FarmView,
};

/// Windowed farm viewer: one window, one wgpu surface, one [`FarmView`]
pub struct FarmTwinApp {
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    view: FarmView,
    error: Option<FarmTwinError>,
}

impl FarmTwinApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                view: FarmView::default(),
                error: None,
            },
        }
    }

    /// Sets the fields shown once the window opens
    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.app_state.view = FarmView::new(fields);
        self
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> Result<(), FarmTwinError> {
        self.app_state.config.init_logging();

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: FarmTwinError) {
        log::error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_engine)) =
            (self.window.as_ref(), self.render_engine.as_mut())
        else {
            return;
        };

        match self.view.frame(render_engine) {
            Ok(Tick::Reschedule) => window.request_redraw(),
            Ok(Tick::Stopped) => log::debug!("render loop stopped"),
            Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("surface lost or outdated, reconfiguring");
                render_engine.reconfigure();
                window.request_redraw();
            }
            Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                let err = RenderError::Surface(wgpu::SurfaceError::OutOfMemory);
                self.fail(event_loop, err.into());
            }
            Err(RenderError::Surface(e)) => {
                log::warn!("skipping frame: {}", e);
                window.request_redraw();
            }
            Err(RenderError::Detached) => log::debug!("frame requested without a surface"),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        log::info!("window created: {}", self.config.title);

        let (width, height) = window.inner_size().into();
        let vsync = self.config.vsync;
        let window_clone = window.clone();
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, vsync).await
        });
        let mut renderer = match renderer {
            Ok(renderer) => renderer,
            Err(e) => return self.fail(event_loop, e),
        };

        if let Err(e) = self.view.mount(Some(&mut renderer)) {
            return self.fail(event_loop, e.into());
        }
        self.render_engine = Some(renderer);
        self.window = Some(window.clone());
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = self.window.as_ref() {
                    let PhysicalSize { width, height } = window.inner_size();
                    self.view.on_pointer_move(PointerSample::from_window_position(
                        position.x, position.y, width, height,
                    ));
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(render_engine) = self.render_engine.as_mut() {
            if let Err(e) = self.view.unmount(render_engine) {
                log::error!("teardown failed: {}", e);
            }
        }
    }
}
