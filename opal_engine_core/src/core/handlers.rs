//! The engine's built-in event handlers, registered on the bus during
//! startup and unregistered during teardown.

use crate::event::{Event, EventHandler};
use std::sync::{Arc, Mutex};

/// Client-area extent shared between the resize handler and the renderer.
///
/// The resize handler writes the latest size observed on the bus; the cube
/// scene reads it each frame to keep its projection aspect ratio current.
#[derive(Debug)]
pub struct Viewport {
    extent: Mutex<(u32, u32)>,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            extent: Mutex::new((width.max(1), height.max(1))),
        }
    }

    pub fn set(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        *self.extent.lock().expect("viewport lock poisoned") = (width, height);
    }

    pub fn extent(&self) -> (u32, u32) {
        *self.extent.lock().expect("viewport lock poisoned")
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.extent();
        width as f32 / height as f32
    }
}

/// Logs key presses observed on the bus.
#[derive(Debug, Default)]
pub struct KeyboardHandler;

impl KeyboardHandler {
    pub fn new() -> Self {
        Self
    }
}

impl EventHandler for KeyboardHandler {
    fn handle(&self, event: &Event) {
        if let Event::Keyboard {
            timestamp,
            keycode,
            state: crate::event::KeyState::Down,
        } = event
        {
            log::debug!("Key pressed: {keycode} (timestamp: {timestamp})");
        }
    }
}

/// Tracks window resizes, feeding the shared [`Viewport`].
#[derive(Debug)]
pub struct WindowResizeHandler {
    viewport: Arc<Viewport>,
}

impl WindowResizeHandler {
    pub fn new(viewport: Arc<Viewport>) -> Self {
        Self { viewport }
    }
}

impl EventHandler for WindowResizeHandler {
    fn handle(&self, event: &Event) {
        if let Event::Window {
            width, height, ..
        } = event
        {
            log::debug!("Window resized: {width}x{height}");
            if *width > 0 && *height > 0 {
                self.viewport.set(*width as u32, *height as u32);
            }
        }
    }
}
