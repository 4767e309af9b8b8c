// src/ui/main_ui.rs

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::state::WizardState;

pub fn handle_event(state: &mut WizardState, ev: Event) {
    let Event::Key(key) = ev else {
        return;
    };

    if key.kind == KeyEventKind::Release {
        return;
    }

    handle_key(state, key);
}

fn handle_key(state: &mut WizardState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.should_exit = true;
        }

        KeyCode::Char(c) => state.push_char(c),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Enter => state.execution_pending = true,

        KeyCode::Up => state.history_prev(),
        KeyCode::Down => state.history_next(),

        // shifted paging scrolls the tree panel instead of the logs
        KeyCode::PageUp if key.modifiers.contains(KeyModifiers::SHIFT) => {
            state.tree_scroll = state.tree_scroll.saturating_sub(5);
        }
        KeyCode::PageDown if key.modifiers.contains(KeyModifiers::SHIFT) => {
            // clamped against the real row count at draw time
            state.tree_scroll = state.tree_scroll.saturating_add(5);
        }

        // scroll positions are clamped against the real line count at
        // draw time; logs.len() is a safe upper bound here
        KeyCode::PageUp => {
            let current = if state.log_scroll == usize::MAX {
                state.logs.len()
            } else {
                state.log_scroll
            };
            state.log_scroll = current.saturating_sub(5);
        }
        KeyCode::PageDown => {
            if state.log_scroll != usize::MAX {
                let next = state.log_scroll.saturating_add(5);
                state.log_scroll = if next >= state.logs.len() {
                    usize::MAX // back to following the tail
                } else {
                    next
                };
            }
        }
        KeyCode::End => state.log_scroll = usize::MAX,

        KeyCode::Esc => state.should_exit = true,

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::from(code))
    }

    #[test]
    fn typing_builds_the_input_line() {
        let mut state = WizardState::new("tok".into());
        for c in "help".chars() {
            handle_event(&mut state, press(KeyCode::Char(c)));
        }
        assert_eq!(state.input, "help");

        handle_event(&mut state, press(KeyCode::Backspace));
        assert_eq!(state.input, "hel");
    }

    #[test]
    fn enter_requests_execution() {
        let mut state = WizardState::new("tok".into());
        handle_event(&mut state, press(KeyCode::Enter));
        assert!(state.execution_pending);
    }

    #[test]
    fn escape_exits() {
        let mut state = WizardState::new("tok".into());
        handle_event(&mut state, press(KeyCode::Esc));
        assert!(state.should_exit);
    }
}
