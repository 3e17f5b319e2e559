//! Replays recorded input against the editor.
//!
//! A script is a JSON array of steps, each an event plus the time it happened:
//!
//! ```json
//! [
//!   { "timeMs": 0, "event": { "pointer": { "Down": {
//!       "position": { "x": 45, "y": 45 }, "button": "Left" } } } },
//!   { "timeMs": 16, "event": { "pointer": { "Move": {
//!       "position": { "x": 75, "y": 65 } } } } },
//!   { "timeMs": 900, "event": { "type": "New caption" } },
//!   { "timeMs": 950, "event": "blur" }
//! ]
//! ```

use cardforge_core::input::{ClickTracker, KeyEvent, MouseButton, PointerEvent};
use cardforge_core::{EditorState, Side};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScriptEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
    /// Replace the draft of the text being edited.
    Type(String),
    /// Focus left the text editor.
    Blur,
    Lock(bool),
    Side(Side),
    /// Pointer-down on the inspector header; following moves drag the panel.
    Inspector(Point),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStep {
    /// Milliseconds since the session started.
    #[serde(default)]
    pub time_ms: u64,
    pub event: ScriptEvent,
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Feeds steps into an [`EditorState`], synthesizing double clicks from
/// timed left-button releases the way a windowing shell would.
#[derive(Debug, Default)]
pub struct EventHandler {
    clicks: ClickTracker,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, editor: &mut EditorState, step: &ScriptStep) {
        match &step.event {
            ScriptEvent::Pointer(event) => {
                editor.handle_pointer(event);
                if let PointerEvent::Up {
                    position,
                    button: MouseButton::Left,
                } = *event
                {
                    if self.clicks.register(step.time_ms, position) {
                        log::debug!("Double click at ({}, {})", position.x, position.y);
                        editor.handle_pointer(&PointerEvent::DoubleClick { position });
                    }
                }
            }
            ScriptEvent::Key(event) => editor.handle_key(event),
            ScriptEvent::Type(text) => {
                if !editor.set_edit_draft(text.clone()) {
                    log::warn!(
                        "Ignoring typed text at {}ms: no text is being edited",
                        step.time_ms
                    );
                }
            }
            ScriptEvent::Blur => editor.blur(),
            ScriptEvent::Lock(locked) => editor.set_locked(*locked),
            ScriptEvent::Side(side) => editor.set_active_side(*side),
            ScriptEvent::Inspector(position) => {
                if !editor.begin_inspector_drag(*position) {
                    log::warn!("Inspector is not open at {}ms", step.time_ms);
                }
            }
        }
    }

    /// Run every step in order. Returns how many were applied.
    pub fn replay(&mut self, editor: &mut EditorState, steps: &[ScriptStep]) -> usize {
        for step in steps {
            self.handle(editor, step);
        }
        log::info!("Replayed {} input events", steps.len());
        steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardforge_core::input::Key;

    fn at(time_ms: u64, event: ScriptEvent) -> ScriptStep {
        ScriptStep { time_ms, event }
    }

    fn click(time_ms: u64, x: f64, y: f64) -> [ScriptStep; 2] {
        let position = Point::new(x, y);
        let button = MouseButton::Left;
        [
            at(time_ms, ScriptEvent::Pointer(PointerEvent::Down { position, button })),
            at(time_ms + 40, ScriptEvent::Pointer(PointerEvent::Up { position, button })),
        ]
    }

    #[test]
    fn test_parse_script() {
        let json = r#"[
            {"timeMs": 5, "event": {"pointer": {"Move": {"position": {"x": 1.0, "y": 2.0}}}}},
            {"event": {"key": {"Pressed": "Delete"}}},
            {"timeMs": 9, "event": {"type": "Hello"}},
            {"timeMs": 10, "event": "blur"},
            {"timeMs": 11, "event": {"side": "back"}},
            {"timeMs": 12, "event": {"lock": true}}
        ]"#;
        let steps = parse_script(json).unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(
            steps[0].event,
            ScriptEvent::Pointer(PointerEvent::Move {
                position: Point::new(1.0, 2.0)
            })
        );
        assert_eq!(steps[1].time_ms, 0);
        assert_eq!(steps[1].event, ScriptEvent::Key(KeyEvent::Pressed(Key::Delete)));
        assert_eq!(steps[3].event, ScriptEvent::Blur);
        assert_eq!(steps[4].event, ScriptEvent::Side(Side::Back));
    }

    #[test]
    fn test_quick_clicks_edit_text() {
        let mut editor = EditorState::default();
        let id = editor.add_text("Before");
        let mut steps: Vec<ScriptStep> = click(0, 45.0, 28.0).into();
        steps.extend(click(200, 46.0, 28.0));
        steps.push(at(400, ScriptEvent::Type("After".into())));
        steps.push(at(500, ScriptEvent::Blur));

        EventHandler::new().replay(&mut editor, &steps);
        let text = editor.document.get_element(id).and_then(|e| e.as_text()).unwrap();
        assert_eq!(text.text, "After");
        assert!(editor.gesture().is_idle());
    }

    #[test]
    fn test_slow_clicks_do_not_edit() {
        let mut editor = EditorState::default();
        editor.add_text("Before");
        let mut steps: Vec<ScriptStep> = click(0, 45.0, 28.0).into();
        steps.extend(click(2000, 45.0, 28.0));

        EventHandler::new().replay(&mut editor, &steps);
        assert_eq!(editor.editing_element(), None);
    }

    #[test]
    fn test_lock_then_delete_keeps_element() {
        let mut editor = EditorState::default();
        editor.add_text("Stay");
        let mut steps: Vec<ScriptStep> = click(0, 45.0, 28.0).into();
        steps.push(at(100, ScriptEvent::Lock(true)));
        steps.push(at(200, ScriptEvent::Key(KeyEvent::Pressed(Key::Delete))));

        EventHandler::new().replay(&mut editor, &steps);
        assert!(editor.is_locked());
        assert_eq!(editor.document.elements.len(), 1);
    }
}
