//! Mode-aware key translation.
//!
//! Raw crossterm key events become [`ViewerCommand`]s here and nowhere
//! else; the app state machine never sees terminal types.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{ViewerCommand, ViewerMode};

/// Translate one key event for the active mode. `None` means the key is
/// unbound and the event is dropped.
#[must_use]
pub fn command_for_key(mode: ViewerMode, key: &KeyEvent) -> Option<ViewerCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match mode {
        ViewerMode::Browse => browse_command(key),
        ViewerMode::QueryEdit => query_edit_command(key),
        ViewerMode::JumpPrompt => jump_prompt_command(key),
    }
}

fn browse_command(key: &KeyEvent) -> Option<ViewerCommand> {
    match key.code {
        KeyCode::Char('/') => Some(ViewerCommand::OpenQueryEdit),
        KeyCode::Char('g') | KeyCode::Char(':') => Some(ViewerCommand::OpenJumpPrompt),
        KeyCode::Char('e') => Some(ViewerCommand::ExportMatches),
        KeyCode::Char('q') | KeyCode::Esc => Some(ViewerCommand::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(ViewerCommand::ScrollLineUp),
        KeyCode::Down | KeyCode::Char('j') => Some(ViewerCommand::ScrollLineDown),
        KeyCode::PageUp => Some(ViewerCommand::PageUp),
        KeyCode::PageDown => Some(ViewerCommand::PageDown),
        KeyCode::Home => Some(ViewerCommand::JumpTop),
        KeyCode::End => Some(ViewerCommand::JumpBottom),
        _ => None,
    }
}

fn query_edit_command(key: &KeyEvent) -> Option<ViewerCommand> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => Some(ViewerCommand::CloseOverlay),
        KeyCode::Backspace => Some(ViewerCommand::InputBackspace),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ViewerCommand::ClearQuery)
        }
        KeyCode::Char(ch) => Some(ViewerCommand::InputChar(ch)),
        _ => None,
    }
}

fn jump_prompt_command(key: &KeyEvent) -> Option<ViewerCommand> {
    match key.code {
        KeyCode::Esc => Some(ViewerCommand::CloseOverlay),
        KeyCode::Enter => Some(ViewerCommand::SubmitJump),
        KeyCode::Backspace => Some(ViewerCommand::InputBackspace),
        KeyCode::Char(ch) => Some(ViewerCommand::InputChar(ch)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
