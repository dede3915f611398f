//! Keyboard commands.
//!
//! [`on_key_down`] handles the chords the editor defines on top of plain
//! text editing. Anything it declines falls through to
//! [`default_key_action`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::document::{
    BlockKind, Data, EditorState, Mark, Motion, current_list, is_selection_in_table,
};
use crate::schema::set_checked;

/// Ctrl on most terminals, Cmd where the terminal reports it.
fn is_mod(key: &KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
}

fn start_kind(state: &EditorState) -> Option<BlockKind> {
    state.start_block().map(|block| block.kind)
}

fn unchecked() -> Data {
    let mut data = Data::new();
    data.insert("checked".to_string(), false.into());
    data
}

/// The mark a Mod chord toggles.
///
/// Terminals send Ctrl+` as Ctrl+Space, so both mean code.
fn mark_for_chord(code: KeyCode) -> Option<Mark> {
    match code {
        KeyCode::Char('b' | 'B') => Some(Mark::Bold),
        KeyCode::Char('i' | 'I') => Some(Mark::Italic),
        KeyCode::Char('u' | 'U') => Some(Mark::Underlined),
        KeyCode::Char('`' | ' ') => Some(Mark::Code),
        _ => None,
    }
}

/// Editor key commands. `None` means the key was not handled here.
pub fn on_key_down(state: &EditorState, key: &KeyEvent) -> Option<EditorState> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let in_check_list = start_kind(state) == Some(BlockKind::CheckListItem);

    if key.code == KeyCode::Enter && !is_mod(key) && in_check_list {
        return Some(state.transform().split_block().set_block_data(&unchecked()).apply());
    }

    if key.code == KeyCode::Backspace
        && state.is_collapsed()
        && in_check_list
        && state.start().offset == 0
    {
        return Some(state.transform().set_block(BlockKind::Paragraph).apply());
    }

    if !is_mod(key) {
        return None;
    }
    let mark = mark_for_chord(key.code)?;
    Some(state.transform().toggle_mark(mark).apply())
}

fn motion_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Motion> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Left => Some(Motion::Left),
        KeyCode::Right => Some(Motion::Right),
        KeyCode::Up => Some(Motion::Up),
        KeyCode::Down => Some(Motion::Down),
        KeyCode::Home if ctrl => Some(Motion::DocumentStart),
        KeyCode::End if ctrl => Some(Motion::DocumentEnd),
        KeyCode::Home => Some(Motion::LineStart),
        KeyCode::End => Some(Motion::LineEnd),
        _ => None,
    }
}

/// Plain editing keys.
pub fn default_key_action(state: &EditorState, key: &KeyEvent) -> Option<EditorState> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let modifiers = key.modifiers;
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    if let Some(motion) = motion_for(key.code, modifiers) {
        let extend = modifiers.contains(KeyModifiers::SHIFT);
        return Some(state.transform().move_focus(motion, extend).apply());
    }

    match key.code {
        KeyCode::Char('a' | 'A') if ctrl => Some(state.transform().select_all().apply()),
        KeyCode::Char('t' | 'T') if ctrl => toggle_focused_checkbox(state),
        KeyCode::Char(ch)
            if !ctrl && !modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SUPER) =>
        {
            let mut buf = [0; 4];
            Some(state.transform().insert_text(ch.encode_utf8(&mut buf)).apply())
        }
        KeyCode::Enter => Some(enter(state)),
        KeyCode::Backspace => Some(state.transform().delete_backward().apply()),
        KeyCode::Delete => Some(state.transform().delete_forward().apply()),
        KeyCode::Tab if is_selection_in_table(state) => {
            Some(state.transform().select_next_cell().apply())
        }
        KeyCode::BackTab if is_selection_in_table(state) => {
            Some(state.transform().select_previous_cell().apply())
        }
        KeyCode::Esc => Some(state.transform().blur().apply()),
        _ => None,
    }
}

fn enter(state: &EditorState) -> EditorState {
    if is_selection_in_table(state) {
        return state.transform().delete_range().insert_row().apply();
    }
    let empty_item = state.is_collapsed()
        && state
            .start_block()
            .is_some_and(|block| block.kind == BlockKind::ListItem && block.text_len() == 0);
    if empty_item && current_list(state).is_some() {
        return state.transform().unwrap_list().apply();
    }
    state.transform().split_block().apply()
}

fn toggle_focused_checkbox(state: &EditorState) -> Option<EditorState> {
    let block = state
        .focus_block()
        .filter(|block| block.kind == BlockKind::CheckListItem)?;
    Some(set_checked(state, block.key, !block.checked()))
}
