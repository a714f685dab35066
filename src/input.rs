//! Input handling
//!
//! Keyboard events are polled once per frame and mapped onto a small set of
//! renderer actions. Everything else is ignored.

use crate::rasterizer::{CullMode, RenderMode};
use macroquad::prelude::*;

/// Raw input for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close requested
    Quit,
    KeyDown(KeyCode),
}

/// What an input asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SetRenderMode(RenderMode),
    SetCull(CullMode),
}

/// Collect this frame's events
pub fn poll_events() -> Vec<InputEvent> {
    let mut events = Vec::new();
    if is_quit_requested() {
        events.push(InputEvent::Quit);
    }
    events.extend(get_keys_pressed().into_iter().map(InputEvent::KeyDown));
    events
}

/// Map an event to an action, `None` for keys without a binding
pub fn action_for(event: InputEvent) -> Option<Action> {
    let key = match event {
        InputEvent::Quit => return Some(Action::Quit),
        InputEvent::KeyDown(key) => key,
    };

    let action = match key {
        KeyCode::Escape => Action::Quit,
        KeyCode::Key1 => Action::SetRenderMode(RenderMode::WireVertex),
        KeyCode::Key2 => Action::SetRenderMode(RenderMode::Wire),
        KeyCode::Key3 => Action::SetRenderMode(RenderMode::FillTriangle),
        KeyCode::Key4 => Action::SetRenderMode(RenderMode::FillTriangleWire),
        KeyCode::Key5 => Action::SetRenderMode(RenderMode::Textured),
        KeyCode::Key6 => Action::SetRenderMode(RenderMode::TexturedWire),
        KeyCode::C => Action::SetCull(CullMode::Backface),
        KeyCode::D => Action::SetCull(CullMode::Disabled),
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_inputs() {
        assert_eq!(action_for(InputEvent::Quit), Some(Action::Quit));
        assert_eq!(action_for(InputEvent::KeyDown(KeyCode::Escape)), Some(Action::Quit));
    }

    #[test]
    fn test_mode_keys() {
        assert_eq!(
            action_for(InputEvent::KeyDown(KeyCode::Key1)),
            Some(Action::SetRenderMode(RenderMode::WireVertex))
        );
        assert_eq!(
            action_for(InputEvent::KeyDown(KeyCode::Key6)),
            Some(Action::SetRenderMode(RenderMode::TexturedWire))
        );
        assert_eq!(
            action_for(InputEvent::KeyDown(KeyCode::D)),
            Some(Action::SetCull(CullMode::Disabled))
        );
    }

    #[test]
    fn test_unbound_key_ignored() {
        assert_eq!(action_for(InputEvent::KeyDown(KeyCode::Q)), None);
    }
}
