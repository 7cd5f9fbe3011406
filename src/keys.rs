//! Keyboard chord → command mapping.
//!
//! Chords map 1:1 onto "deactivate current, activate requested", so holding
//! a chord down repeats harmlessly. The chord strings are the browser-style
//! `"ctrl+<key>"` names the host's key handler reports.

#[cfg(test)]
#[path = "keys_test.rs"]
mod keys_test;

use crate::tools::{ShapeKind, Tool};

/// What a recognized chord triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    /// Activate an editing tool.
    Activate(Tool),
    /// Save the selected shape, or all shapes when nothing is selected.
    Save,
}

/// Resolve a chord to its command, or `None` for unbound chords.
#[must_use]
pub fn command_for(chord: &str) -> Option<KeyCommand> {
    let command = match chord {
        "ctrl+backspace" => KeyCommand::Activate(Tool::Delete),
        "ctrl+m" => KeyCommand::Activate(Tool::Modify),
        "ctrl+t" => KeyCommand::Activate(Tool::Transform),
        "ctrl+d" => KeyCommand::Activate(Tool::Duplicate),
        "ctrl+p" => KeyCommand::Activate(Tool::Draw(ShapeKind::Polygon)),
        "ctrl+r" => KeyCommand::Activate(Tool::Draw(ShapeKind::Rectangle)),
        "ctrl+f" => KeyCommand::Activate(Tool::Select),
        "ctrl+w" => KeyCommand::Activate(Tool::Drag),
        "ctrl+z" => KeyCommand::Activate(Tool::ZoomBox),
        "ctrl+s" => KeyCommand::Save,
        _ => return None,
    };
    Some(command)
}
