//! Translation from winit input types to the engine's event types.
//!
//! The platform pump observes native input and republishes it as typed
//! [`Event`](crate::event::Event) records on the bus; these helpers map the
//! winit vocabulary to ours.

use crate::event::{Event, KeyState};
use winit::event::{ElementState, KeyEvent};
use winit::platform::scancode::PhysicalKeyExtScancode;

/// Maps a winit element state to the engine key state.
pub fn key_state(state: ElementState) -> KeyState {
    match state {
        ElementState::Pressed => KeyState::Down,
        ElementState::Released => KeyState::Up,
    }
}

/// Maps a winit mouse button to the engine button set.
///
/// Buttons outside the three-button set (back/forward/extras) have no engine
/// representation and return `None`.
pub fn mouse_button(button: winit::event::MouseButton) -> Option<crate::event::MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(crate::event::MouseButton::Left),
        winit::event::MouseButton::Right => Some(crate::event::MouseButton::Right),
        winit::event::MouseButton::Middle => Some(crate::event::MouseButton::Middle),
        _ => None,
    }
}

/// Builds a keyboard [`Event`] from a winit key event.
///
/// The keycode is the platform-raw scancode; keys winit cannot map to a
/// scancode on the current platform are dropped.
pub fn keyboard_event(key: &KeyEvent, timestamp: u32) -> Option<Event> {
    let keycode = key.physical_key.to_scancode()? as i32;
    Some(Event::Keyboard {
        timestamp,
        keycode,
        state: key_state(key.state),
    })
}
