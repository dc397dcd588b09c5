//! Input handling for the page window.
//!
//! [`Input`] turns raw window events into page-level actions: pointer
//! movement in logical pixels, the pointer leaving the window, and scroll
//! commands from the wheel or keyboard.
//!
//! ```ignore
//! if let Some(action) = input.handle_event(&event) {
//!     match action {
//!         InputAction::PointerMoved(p) => page.signal(Signal::PointerMove { position: p }),
//!         InputAction::PointerLeft => page.signal(Signal::PointerLeave),
//!         InputAction::Scroll(cmd) => page.scroll(cmd),
//!     }
//! }
//! ```

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::surface::Viewport;

/// Pixels scrolled per wheel line or arrow key press.
pub const LINE_HEIGHT: f32 = 40.0;

/// Fraction of the viewport height scrolled by page keys.
pub const PAGE_FRACTION: f32 = 0.875;

/// Keys the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    PageUp,
    PageDown,
    Space,
    Home,
    End,
    Shift,
    /// Number row digit 0-9.
    Digit(u8),
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::PageUp => KeyCode::PageUp,
            WinitKeyCode::PageDown => KeyCode::PageDown,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Home => KeyCode::Home,
            WinitKeyCode::End => KeyCode::End,
            WinitKeyCode::ShiftLeft | WinitKeyCode::ShiftRight => KeyCode::Shift,
            WinitKeyCode::Digit0 => KeyCode::Digit(0),
            WinitKeyCode::Digit1 => KeyCode::Digit(1),
            WinitKeyCode::Digit2 => KeyCode::Digit(2),
            WinitKeyCode::Digit3 => KeyCode::Digit(3),
            WinitKeyCode::Digit4 => KeyCode::Digit(4),
            WinitKeyCode::Digit5 => KeyCode::Digit(5),
            WinitKeyCode::Digit6 => KeyCode::Digit(6),
            WinitKeyCode::Digit7 => KeyCode::Digit(7),
            WinitKeyCode::Digit8 => KeyCode::Digit(8),
            WinitKeyCode::Digit9 => KeyCode::Digit(9),
            _ => KeyCode::Other,
        }
    }
}

/// How the page should scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCommand {
    /// Relative, in logical pixels (positive is down).
    By(f32),
    Top,
    Bottom,
    /// Jump to the n-th nav link (0 = work).
    Section(usize),
}

/// Page-level result of a window event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Pointer position in logical pixels.
    PointerMoved(Vec2),
    PointerLeft,
    Scroll(ScrollCommand),
}

/// Input state for one window.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    pointer: Option<Vec2>,
    viewport: Viewport,
}

impl Input {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    /// Update the viewport used for pixel conversions.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // ========== Queries ==========

    /// Pointer position in logical pixels, if inside the window.
    #[inline]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Pointer position normalized to the viewport, each axis in 0-1.
    pub fn pointer_normalized(&self) -> Option<Vec2> {
        let p = self.pointer?;
        let size = self.viewport.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        Some((p / size).clamp(Vec2::ZERO, Vec2::ONE))
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    // ========== Event Handling ==========

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<InputAction> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.pointer_moved(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::CursorLeft { .. } => Some(self.pointer_left()),
            WindowEvent::MouseWheel { delta, .. } => self.wheel(*delta),
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => self.key(
                    KeyCode::from(code),
                    event.state == ElementState::Pressed,
                    event.repeat,
                ),
                PhysicalKey::Unidentified(_) => None,
            },
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                None
            }
            _ => None,
        }
    }

    /// Pointer moved to `physical` (device pixels).
    pub fn pointer_moved(&mut self, physical: Vec2) -> InputAction {
        let logical = physical / self.viewport.scale_factor;
        self.pointer = Some(logical);
        InputAction::PointerMoved(logical)
    }

    pub fn pointer_left(&mut self) -> InputAction {
        self.pointer = None;
        InputAction::PointerLeft
    }

    /// Wheel movement. Positive deltas scroll up.
    pub fn wheel(&mut self, delta: MouseScrollDelta) -> Option<InputAction> {
        let dy = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32) / self.viewport.scale_factor,
        };
        (dy != 0.0 && dy.is_finite()).then_some(InputAction::Scroll(ScrollCommand::By(dy)))
    }

    /// Key press or release. Held scroll keys repeat; digits do not.
    pub fn key(&mut self, key: KeyCode, pressed: bool, repeat: bool) -> Option<InputAction> {
        if !pressed {
            self.keys_held.remove(&key);
            return None;
        }
        self.keys_held.insert(key);

        let page = self.viewport.height * PAGE_FRACTION;
        let shift = self.key_held(KeyCode::Shift);
        let command = match key {
            KeyCode::Down => ScrollCommand::By(LINE_HEIGHT),
            KeyCode::Up => ScrollCommand::By(-LINE_HEIGHT),
            KeyCode::PageDown => ScrollCommand::By(page),
            KeyCode::PageUp => ScrollCommand::By(-page),
            KeyCode::Space if shift => ScrollCommand::By(-page),
            KeyCode::Space => ScrollCommand::By(page),
            KeyCode::Home => ScrollCommand::Top,
            KeyCode::End => ScrollCommand::Bottom,
            KeyCode::Digit(n @ 1..=3) if !repeat => ScrollCommand::Section(n as usize - 1),
            _ => return None,
        };
        Some(InputAction::Scroll(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn input() -> Input {
        Input::new(Viewport::new(800.0, 600.0, 2.0))
    }

    #[test]
    fn test_pointer_is_logical() {
        let mut input = input();
        assert_eq!(
            input.pointer_moved(Vec2::new(800.0, 600.0)),
            InputAction::PointerMoved(Vec2::new(400.0, 300.0))
        );
        assert_eq!(input.pointer_normalized(), Some(Vec2::new(0.5, 0.5)));

        input.pointer_left();
        assert_eq!(input.pointer(), None);
        assert_eq!(input.pointer_normalized(), None);
    }

    #[test]
    fn test_normalized_pointer_clamped() {
        let mut input = input();
        input.pointer_moved(Vec2::new(5000.0, -10.0));
        assert_eq!(input.pointer_normalized(), Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_wheel_units() {
        let mut input = input();
        assert_eq!(
            input.wheel(MouseScrollDelta::LineDelta(0.0, -2.0)),
            Some(InputAction::Scroll(ScrollCommand::By(80.0)))
        );
        assert_eq!(
            input.wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 100.0))),
            Some(InputAction::Scroll(ScrollCommand::By(-50.0)))
        );
        assert_eq!(input.wheel(MouseScrollDelta::LineDelta(3.0, 0.0)), None);
    }

    #[test]
    fn test_scroll_keys() {
        let mut input = input();
        let by = |a: Option<InputAction>| match a {
            Some(InputAction::Scroll(ScrollCommand::By(d))) => d,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(by(input.key(KeyCode::Down, true, false)), 40.0);
        assert_eq!(by(input.key(KeyCode::Down, true, true)), 40.0);
        assert_eq!(by(input.key(KeyCode::PageDown, true, false)), 525.0);
        assert_eq!(by(input.key(KeyCode::Space, true, false)), 525.0);

        input.key(KeyCode::Shift, true, false);
        assert_eq!(by(input.key(KeyCode::Space, true, false)), -525.0);
        input.key(KeyCode::Shift, false, false);
        assert!(!input.key_held(KeyCode::Shift));
    }

    #[test]
    fn test_jump_keys() {
        let mut input = input();
        assert_eq!(
            input.key(KeyCode::Home, true, false),
            Some(InputAction::Scroll(ScrollCommand::Top))
        );
        assert_eq!(
            input.key(KeyCode::End, true, false),
            Some(InputAction::Scroll(ScrollCommand::Bottom))
        );
        assert_eq!(
            input.key(KeyCode::Digit(2), true, false),
            Some(InputAction::Scroll(ScrollCommand::Section(1)))
        );
        assert_eq!(input.key(KeyCode::Digit(2), true, true), None);
        assert_eq!(input.key(KeyCode::Digit(7), true, false), None);
        assert_eq!(input.key(KeyCode::Down, false, false), None);
    }
}
