//! Input action sequences.
//!
//! Pointer gestures and key events are expressed as an [`ActionSequence`],
//! a flat list of W3C input steps the driver performs in one call. The
//! constructors cover the gestures the engine needs: hover, double click,
//! context click, drag-and-drop and key presses scoped either to the focused
//! element or to a specific element.

use crate::driver::ElementHandle;
use crate::keys::Key;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary button
    Left,
    /// Wheel button
    Middle,
    /// Secondary button
    Right,
}

impl MouseButton {
    /// W3C button number
    #[must_use]
    pub const fn code(self) -> u64 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
}

/// Origin of a pointer move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerOrigin {
    /// Viewport coordinates
    Viewport,
    /// Offset from the element's center
    Element(ElementHandle),
}

/// One step of an input sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    /// Move the pointer
    PointerMove {
        /// Coordinate origin
        origin: PointerOrigin,
        /// X offset
        x: i64,
        /// Y offset
        y: i64,
    },
    /// Press a mouse button
    PointerDown(MouseButton),
    /// Release a mouse button
    PointerUp(MouseButton),
    /// Press a key
    KeyDown(Key),
    /// Release a key
    KeyUp(Key),
    /// Wait between steps
    Pause(Duration),
}

impl InputAction {
    /// Whether the step belongs to the pointer source
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerMove { .. } | Self::PointerDown(_) | Self::PointerUp(_)
        )
    }

    /// Whether the step belongs to the key source
    #[must_use]
    pub const fn is_key(&self) -> bool {
        matches!(self, Self::KeyDown(_) | Self::KeyUp(_))
    }
}

/// Ordered list of input steps performed as one gesture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSequence {
    steps: Vec<InputAction>,
}

impl ActionSequence {
    /// Empty sequence
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    #[must_use]
    pub fn then(mut self, step: InputAction) -> Self {
        self.steps.push(step);
        self
    }

    /// Move the pointer to the center of an element
    #[must_use]
    pub fn move_to(self, element: &ElementHandle) -> Self {
        self.then(InputAction::PointerMove {
            origin: PointerOrigin::Element(element.clone()),
            x: 0,
            y: 0,
        })
    }

    /// Press and release a button
    #[must_use]
    pub fn click_button(self, button: MouseButton) -> Self {
        self.then(InputAction::PointerDown(button))
            .then(InputAction::PointerUp(button))
    }

    /// Hover over an element
    #[must_use]
    pub fn hover(element: &ElementHandle) -> Self {
        Self::new().move_to(element)
    }

    /// Double click an element
    #[must_use]
    pub fn double_click(element: &ElementHandle) -> Self {
        Self::new()
            .move_to(element)
            .click_button(MouseButton::Left)
            .click_button(MouseButton::Left)
    }

    /// Right click an element
    #[must_use]
    pub fn context_click(element: &ElementHandle) -> Self {
        Self::new()
            .move_to(element)
            .click_button(MouseButton::Right)
    }

    /// Drag `source` and drop it on `target`
    #[must_use]
    pub fn drag_and_drop(source: &ElementHandle, target: &ElementHandle) -> Self {
        Self::new()
            .move_to(source)
            .then(InputAction::PointerDown(MouseButton::Left))
            .move_to(target)
            .then(InputAction::PointerUp(MouseButton::Left))
    }

    /// Focus an element by clicking it, when one is given
    #[must_use]
    fn focus(self, target: Option<&ElementHandle>) -> Self {
        match target {
            Some(element) => self.move_to(element).click_button(MouseButton::Left),
            None => self,
        }
    }

    /// Press and release a key
    #[must_use]
    pub fn key_press(key: Key, target: Option<&ElementHandle>) -> Self {
        Self::new()
            .focus(target)
            .then(InputAction::KeyDown(key))
            .then(InputAction::KeyUp(key))
    }

    /// Press a key without releasing it
    #[must_use]
    pub fn key_down(key: Key, target: Option<&ElementHandle>) -> Self {
        Self::new().focus(target).then(InputAction::KeyDown(key))
    }

    /// Release a key
    #[must_use]
    pub fn key_up(key: Key, target: Option<&ElementHandle>) -> Self {
        Self::new().focus(target).then(InputAction::KeyUp(key))
    }

    /// Steps in order
    #[must_use]
    pub fn steps(&self) -> &[InputAction] {
        &self.steps
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Elements the sequence targets, in order of first use
    #[must_use]
    pub fn targets(&self) -> Vec<&ElementHandle> {
        let mut out: Vec<&ElementHandle> = Vec::new();
        for step in &self.steps {
            if let InputAction::PointerMove {
                origin: PointerOrigin::Element(element),
                ..
            } = step
            {
                if !out.contains(&element) {
                    out.push(element);
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn el(id: &str) -> ElementHandle {
        ElementHandle::new(id)
    }

    mod gesture_tests {
        use super::*;

        #[test]
        fn test_hover_is_single_move() {
            let seq = ActionSequence::hover(&el("a"));
            assert_eq!(seq.len(), 1);
            assert!(seq.steps()[0].is_pointer());
        }

        #[test]
        fn test_double_click_presses_left_twice() {
            let seq = ActionSequence::double_click(&el("a"));
            let downs = seq
                .steps()
                .iter()
                .filter(|s| **s == InputAction::PointerDown(MouseButton::Left))
                .count();
            assert_eq!(downs, 2);
        }

        #[test]
        fn test_context_click_uses_right_button() {
            let seq = ActionSequence::context_click(&el("a"));
            assert!(seq
                .steps()
                .contains(&InputAction::PointerDown(MouseButton::Right)));
        }

        #[test]
        fn test_drag_and_drop_targets_source_then_target() {
            let seq = ActionSequence::drag_and_drop(&el("src"), &el("dst"));
            let targets: Vec<&str> = seq.targets().iter().map(|e| e.id()).collect();
            assert_eq!(targets, vec!["src", "dst"]);
            assert_eq!(seq.len(), 4);
        }
    }

    mod key_tests {
        use super::*;

        #[test]
        fn test_global_key_press_has_no_pointer_steps() {
            let seq = ActionSequence::key_press(Key::Enter, None);
            assert!(seq.steps().iter().all(InputAction::is_key));
            assert_eq!(seq.len(), 2);
        }

        #[test]
        fn test_scoped_key_press_focuses_element_first() {
            let seq = ActionSequence::key_press(Key::Tab, Some(&el("field")));
            assert!(seq.steps()[0].is_pointer());
            assert_eq!(seq.steps().last(), Some(&InputAction::KeyUp(Key::Tab)));
        }

        #[test]
        fn test_key_down_and_up_are_single_edges() {
            assert_eq!(
                ActionSequence::key_down(Key::Shift, None).steps(),
                &[InputAction::KeyDown(Key::Shift)]
            );
            assert_eq!(
                ActionSequence::key_up(Key::Shift, None).steps(),
                &[InputAction::KeyUp(Key::Shift)]
            );
        }

        #[test]
        fn test_button_codes() {
            assert_eq!(MouseButton::Left.code(), 0);
            assert_eq!(MouseButton::Right.code(), 2);
        }
    }
}
