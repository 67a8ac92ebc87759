pub mod input;

use crate::core::config::EngineConfig;
use std::sync::Arc;
use winit::{
    dpi::PhysicalSize,
    error::OsError,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

#[cfg(feature = "raw-window-handle")]
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

/// A wrapper around a winit window, providing controlled access and
/// engine-specific utilities.
#[derive(Debug, Clone)]
pub struct AppWindow {
    inner: Arc<Window>,
}

impl AppWindow {
    /// Creates the application window on the active event loop, using the
    /// caption and initial size from `config`.
    /// ## Returns
    /// A `Result` containing the new `AppWindow` or a `winit::error::OsError`
    /// on failure.
    pub fn new(event_loop: &ActiveEventLoop, config: &EngineConfig) -> Result<Self, OsError> {
        log::info!("Creating application window...");

        let window_attributes = Window::default_attributes()
            .with_title(&config.window_title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window_width,
                config.window_height,
            ))
            .with_visible(true);

        let window = event_loop.create_window(window_attributes)?;
        log::info!("Window created successfully (id: {:?}).", window.id());

        Ok(Self {
            inner: Arc::new(window),
        })
    }

    /// Returns the unique identifier of the underlying window.
    pub fn id(&self) -> WindowId {
        self.inner.id()
    }

    /// Returns the window caption.
    pub fn caption(&self) -> String {
        self.inner.title()
    }

    /// Requests that a redraw event be emitted for this window.
    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    /// Returns the physical size of the window's client area.
    pub fn inner_size(&self) -> PhysicalSize<u32> {
        self.inner.inner_size()
    }

    /// Returns the display scale factor associated with this window.
    pub fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    /// Returns the window handle associated with this window.
    #[cfg(feature = "raw-window-handle")]
    pub fn raw_window_handle(
        &self,
    ) -> Result<raw_window_handle::RawWindowHandle, raw_window_handle::HandleError> {
        self.inner.window_handle().map(|h| h.as_raw())
    }

    /// Returns the display handle associated with this window.
    #[cfg(feature = "raw-window-handle")]
    pub fn raw_display_handle(
        &self,
    ) -> Result<raw_window_handle::RawDisplayHandle, raw_window_handle::HandleError> {
        self.inner.display_handle().map(|h| h.as_raw())
    }

    /// Returns a reference to the underlying winit window. The renderer needs
    /// the `Arc` to create a surface outliving any one borrow.
    pub(crate) fn winit_window_arc(&self) -> &Arc<Window> {
        &self.inner
    }
}
