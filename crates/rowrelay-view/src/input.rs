//! Synthetic input vocabulary.
//!
//! Strategies describe the exact event sequences a host's drag sensor
//! expects; the driver translates them into whatever dispatch mechanism
//! the embedding has (trusted DOM events, a devtools input domain, or the
//! simulated host). Payload fields mirror what real sensors inspect:
//! button state, pressure, primary-pointer flags, legacy key codes.

use crate::{RowHandle, geom::Point};

/// Phase of a pointer or mouse gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    /// Button press on the grab point.
    Down,
    /// Movement while pressed.
    Move,
    /// Button release at the drop point.
    Up,
}

/// A synthesized pointer event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Gesture phase.
    pub phase: PointerPhase,
    /// Viewport position.
    pub at: Point,
    /// Pointer id; sensors track capture per id.
    pub pointer_id: u32,
    /// Whether this is the primary pointer.
    pub primary: bool,
    /// Pressed-buttons bitmask (1 while dragging, 0 on release).
    pub buttons: u8,
    /// Contact pressure (0.5 while dragging, 0.0 on release).
    pub pressure: f64,
}

impl PointerInput {
    /// Press at `at`.
    #[must_use]
    pub const fn down(at: Point, pointer_id: u32) -> Self {
        Self {
            phase: PointerPhase::Down,
            at,
            pointer_id,
            primary: true,
            buttons: 1,
            pressure: 0.5,
        }
    }

    /// Move to `at` while pressed.
    #[must_use]
    pub const fn moved(at: Point, pointer_id: u32) -> Self {
        Self {
            phase: PointerPhase::Move,
            at,
            pointer_id,
            primary: true,
            buttons: 1,
            pressure: 0.5,
        }
    }

    /// Release at `at`.
    #[must_use]
    pub const fn up(at: Point, pointer_id: u32) -> Self {
        Self {
            phase: PointerPhase::Up,
            at,
            pointer_id,
            primary: true,
            buttons: 0,
            pressure: 0.0,
        }
    }
}

/// A synthesized legacy mouse event, for sensors that never adopted
/// pointer events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseInput {
    /// Gesture phase.
    pub phase: PointerPhase,
    /// Viewport position.
    pub at: Point,
    /// Button index (0 = primary).
    pub button: u8,
    /// Pressed-buttons bitmask.
    pub buttons: u8,
}

impl MouseInput {
    /// Primary-button press at `at`.
    #[must_use]
    pub const fn down(at: Point) -> Self {
        Self {
            phase: PointerPhase::Down,
            at,
            button: 0,
            buttons: 1,
        }
    }

    /// Move to `at` while pressed.
    #[must_use]
    pub const fn moved(at: Point) -> Self {
        Self {
            phase: PointerPhase::Move,
            at,
            button: 0,
            buttons: 1,
        }
    }

    /// Primary-button release at `at`.
    #[must_use]
    pub const fn up(at: Point) -> Self {
        Self {
            phase: PointerPhase::Up,
            at,
            button: 0,
            buttons: 0,
        }
    }
}

/// Phase of a native drag-and-drop protocol exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    /// `dragstart` on the source.
    Start,
    /// `dragenter` on the drop target.
    Enter,
    /// `dragover` on the drop target.
    Over,
    /// `drop` on the drop target.
    Drop,
    /// `dragend` on the source.
    End,
}

/// A synthesized native drag-and-drop event.
#[derive(Clone, Debug, PartialEq)]
pub struct DragInput {
    /// Protocol phase.
    pub phase: DragPhase,
    /// Viewport position.
    pub at: Point,
    /// Transfer payload text, set on `Start` and carried to `Drop`.
    pub payload: Option<String>,
}

impl DragInput {
    /// Build a drag event without payload.
    #[must_use]
    pub const fn at(phase: DragPhase, at: Point) -> Self {
        Self {
            phase,
            at,
            payload: None,
        }
    }

    /// Attach a transfer payload.
    #[must_use]
    pub fn with_payload(mut self, payload: String) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Key press phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPhase {
    /// Key down.
    Down,
    /// Key up.
    Up,
}

/// Keys used by accessible reorder sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Pick up / drop.
    Space,
    /// Move one step toward the top.
    ArrowUp,
    /// Move one step toward the bottom.
    ArrowDown,
    /// Cancel an in-progress keyboard drag.
    Escape,
}

impl Key {
    /// Legacy `keyCode` value some sensors still read.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Space => 32,
            Self::ArrowUp => 38,
            Self::ArrowDown => 40,
            Self::Escape => 27,
        }
    }
}

/// A synthesized keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    /// Press phase.
    pub phase: KeyPhase,
    /// Which key.
    pub key: Key,
}

impl KeyInput {
    /// Key-down event.
    #[must_use]
    pub const fn down(key: Key) -> Self {
        Self {
            phase: KeyPhase::Down,
            key,
        }
    }

    /// Key-up event.
    #[must_use]
    pub const fn up(key: Key) -> Self {
        Self {
            phase: KeyPhase::Up,
            key,
        }
    }
}

/// Any synthesized input the driver can dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum SyntheticInput {
    /// Pointer-event family.
    Pointer(PointerInput),
    /// Legacy mouse-event family.
    Mouse(MouseInput),
    /// Native drag-and-drop family.
    Drag(DragInput),
    /// Keyboard family.
    Key(KeyInput),
}

/// Where an input is dispatched.
///
/// Sensors attach listeners at different depths; the original host listens
/// for presses on the row (or its drag handle) and for movement on the
/// document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputTarget {
    /// The row element itself.
    Row(RowHandle),
    /// The row's drag-handle sub-element.
    Handle(RowHandle),
    /// The list container.
    Container,
    /// The document root.
    Document,
}
