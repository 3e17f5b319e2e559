//! Pointer and keyboard events delivered by the shell.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer events in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move { position: Point },
    DoubleClick { position: Point },
    Scroll { position: Point, delta: Vec2 },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::DoubleClick { position }
            | PointerEvent::Scroll { position, .. } => *position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Character(String),
}

impl Key {
    /// Map a DOM/winit style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Escape" => Key::Escape,
            other => Key::Character(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

const DOUBLE_CLICK_TIME_MS: u64 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Turns a stream of presses into double clicks for shells that only report single clicks.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last: Option<(u64, Point)>,
}

impl ClickTracker {
    /// Record a press at `timestamp_ms`. Returns true when it completes a double click.
    pub fn register(&mut self, timestamp_ms: u64, position: Point) -> bool {
        let is_double = self.last.is_some_and(|(time, pos)| {
            timestamp_ms.saturating_sub(time) <= DOUBLE_CLICK_TIME_MS
                && (position - pos).hypot() <= DOUBLE_CLICK_DISTANCE
        });
        self.last = if is_double { None } else { Some((timestamp_ms, position)) };
        is_double
    }
}
