//! The application driver: sequences startup, runs the frame loop, and
//! guarantees reverse-order teardown on every exit path.

use crate::core::config::EngineConfig;
use crate::core::error::EngineError;
use crate::core::handlers::{KeyboardHandler, Viewport, WindowResizeHandler};
use crate::core::lifecycle::{CleanupState, Subsystem};
use crate::core::timer::{FramePacer, Stopwatch};
use crate::event::{Event, EventBus, EventHandler, EventKind};
use crate::subsystems::renderer::{CubeScene, GraphicsContext};
use crate::window::{input, AppWindow};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

/// Public entry point: owns the configuration and drives one engine run.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Brings the engine up, runs the platform event loop until the window
    /// closes (or a fatal failure occurs), and tears everything down.
    ///
    /// Startup is sequenced: event bus, built-in callbacks, window, GPU
    /// resources. Any failure refuses to proceed further; teardown then
    /// releases exactly the subsystems that were acquired, in reverse order,
    /// before the error is returned.
    pub fn run(self) -> Result<(), EngineError> {
        log::info!("=== Application starting ===");

        let mut state = EngineState::new(self.config);
        state.bring_up_events()?;
        state.register_builtin_callbacks();

        let event_loop =
            EventLoop::new().map_err(|e| EngineError::EventLoop(e.to_string()))?;
        event_loop
            .run_app(&mut state)
            .map_err(|e| EngineError::EventLoop(e.to_string()))?;

        log::info!("Application closing after {} frames", state.frame_count);
        match state.take_fatal() {
            Some(error) => Err(error),
            None => {
                log::info!("Application closed successfully");
                Ok(())
            }
        }
    }
}

/// The running engine: bus, lifecycle flags, platform resources and the
/// per-frame bookkeeping. Owned by [`Engine::run`] for the duration of the
/// event loop; its `Drop` impl is the teardown guard.
struct EngineState {
    config: EngineConfig,
    bus: EventBus,
    cleanup: CleanupState,
    clock: Stopwatch,
    pacer: FramePacer,

    viewport: Arc<Viewport>,
    keyboard_callback: Arc<dyn EventHandler>,
    resize_callback: Arc<dyn EventHandler>,

    window: Option<AppWindow>,
    graphics: Option<GraphicsContext>,
    scene: Option<CubeScene>,

    cursor: (i32, i32),
    frame_count: u32,
    last_log_frame: u32,
    fatal: Option<EngineError>,
}

impl EngineState {
    fn new(config: EngineConfig) -> Self {
        let viewport = Arc::new(Viewport::new(config.window_width, config.window_height));
        let keyboard_callback: Arc<dyn EventHandler> = Arc::new(KeyboardHandler::new());
        let resize_callback: Arc<dyn EventHandler> =
            Arc::new(WindowResizeHandler::new(viewport.clone()));
        let pacer = FramePacer::new(config.target_frame_time());

        Self {
            config,
            bus: EventBus::new(),
            cleanup: CleanupState::new(),
            clock: Stopwatch::new(),
            pacer,
            viewport,
            keyboard_callback,
            resize_callback,
            window: None,
            graphics: None,
            scene: None,
            cursor: (0, 0),
            frame_count: 0,
            last_log_frame: 0,
            fatal: None,
        }
    }

    /// First lifecycle transition: bring the event bus up. Failure is fatal
    /// and leaves nothing to unwind.
    fn bring_up_events(&mut self) -> Result<(), EngineError> {
        if !self.bus.init() {
            log::error!("Failed to initialize the event system!");
            return Err(EngineError::EventSystemInit);
        }
        self.cleanup.mark_up(Subsystem::Events);
        Ok(())
    }

    /// Second transition: register the built-in handlers. Registration is
    /// fire-and-forget on the bus side, so this cannot fail; the flag is
    /// recorded regardless so teardown always attempts the unregistration.
    fn register_builtin_callbacks(&mut self) {
        self.bus
            .register_callback(EventKind::Keyboard, self.keyboard_callback.clone());
        self.bus
            .register_callback(EventKind::Window, self.resize_callback.clone());
        self.cleanup.mark_up(Subsystem::Callbacks);
        log::info!("Event callbacks registered");
    }

    /// Records a fatal error and asks the platform loop to exit; teardown
    /// happens when the state is dropped.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: EngineError) {
        log::error!("{error}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn take_fatal(&mut self) -> Option<EngineError> {
        self.fatal.take()
    }

    fn timestamp(&self) -> u32 {
        self.clock.elapsed_ms_u32()
    }

    /// Renders one frame, recovers reconfigurable surface errors, and paces
    /// to the fixed frame budget.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let elapsed = self.clock.elapsed_secs_f32();
        let render_result = {
            let (Some(graphics), Some(scene)) = (self.graphics.as_ref(), self.scene.as_mut())
            else {
                return;
            };
            scene.advance(elapsed);
            scene.render(graphics)
        };

        match render_result {
            Ok(()) => {
                self.frame_count = self.frame_count.wrapping_add(1);
                let since_last = self.frame_count.wrapping_sub(self.last_log_frame);
                if since_last >= self.config.frame_log_interval {
                    log::trace!("Frame: {}", self.frame_count);
                    self.last_log_frame = self.frame_count;
                }
            }
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring.");
                let size = self.window.as_ref().map(|w| w.inner_size());
                if let (Some(graphics), Some(size)) = (self.graphics.as_mut(), size) {
                    graphics.resize(size);
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(
                    event_loop,
                    EngineError::Render("the graphics device is out of memory".to_string()),
                );
            }
            Err(e) => log::warn!("Frame skipped: {e}"),
        }

        self.pacer.pace();
    }

    /// Releases acquired subsystems in reverse acquisition order. Runs from
    /// `Drop`, so every exit path (normal close, fatal startup failure,
    /// event-loop error) unwinds the same way. Idempotent: draining the
    /// lifecycle flags clears them.
    fn unwind(&mut self) {
        let stages = self.cleanup.drain_for_teardown();
        if stages.is_empty() {
            return;
        }
        log::info!("Starting cleanup...");
        for stage in stages {
            match stage {
                Subsystem::Render => {
                    self.scene = None;
                    self.graphics = None;
                    log::debug!("Render resources released");
                }
                Subsystem::Window => {
                    self.window = None;
                    log::debug!("Window shutdown complete");
                }
                Subsystem::Callbacks => {
                    self.bus
                        .unregister_callback(EventKind::Keyboard, &self.keyboard_callback);
                    self.bus
                        .unregister_callback(EventKind::Window, &self.resize_callback);
                    log::debug!("Event callbacks unregistered");
                }
                Subsystem::Events => {
                    self.bus.shutdown();
                    log::debug!("Event system shutdown complete");
                }
            }
        }
        log::info!("Cleanup complete");
    }
}

impl Drop for EngineState {
    fn drop(&mut self) {
        self.unwind();
    }
}

impl ApplicationHandler for EngineState {
    /// Third and fourth lifecycle transitions: window, then GPU resources.
    /// Either failure aborts startup; the already-acquired subsystems are
    /// unwound when the state is dropped.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Some platforms resume more than once.
        }

        let window = match AppWindow::new(event_loop, &self.config) {
            Ok(window) => window,
            Err(e) => {
                self.fail(event_loop, EngineError::WindowCreation(e.to_string()));
                return;
            }
        };
        let size = window.inner_size();
        log::info!(
            "Window: \"{}\" ({}x{})",
            window.caption(),
            size.width,
            size.height
        );
        self.viewport.set(size.width, size.height);
        self.window = Some(window);
        self.cleanup.mark_up(Subsystem::Window);

        let Some(window) = self.window.as_ref() else {
            return;
        };
        let graphics = match GraphicsContext::new(window) {
            Ok(graphics) => graphics,
            Err(e) => {
                self.fail(event_loop, EngineError::GraphicsInit(e.to_string()));
                return;
            }
        };
        let scene = match CubeScene::new(&graphics, self.viewport.clone()) {
            Ok(scene) => scene,
            Err(e) => {
                self.fail(event_loop, EngineError::GraphicsInit(e.to_string()));
                return;
            }
        };
        self.graphics = Some(graphics);
        self.scene = Some(scene);
        self.cleanup.mark_up(Subsystem::Render);

        log::info!("Press ESC to exit");
    }

    /// The platform pump: republishes native input as typed events on the
    /// bus and reacts to the window-level control flow.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting event loop...");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(graphics) = self.graphics.as_mut() {
                    graphics.resize(size);
                }
                let resize = Event::Window {
                    timestamp: self.timestamp(),
                    width: size.width as i32,
                    height: size.height as i32,
                };
                self.bus.dispatch(&resize);
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if let Some(keyboard) = input::keyboard_event(&key_event, self.timestamp()) {
                    self.bus.dispatch(&keyboard);
                }
                if key_event.state == ElementState::Pressed
                    && key_event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    log::info!("Escape pressed, exiting event loop...");
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as i32, position.y as i32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                if let Some(button) = input::mouse_button(button) {
                    let (x, y) = self.cursor;
                    let click = Event::Mouse {
                        timestamp: self.timestamp(),
                        x,
                        y,
                        button,
                    };
                    self.bus.dispatch(&click);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    /// Keeps the loop continuous: each pass requests the next redraw.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
