use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::state::*;
use crate::ui::input::InputHandlers;
use crate::views::{HomeView, View};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => handle_terminal(state, cevent),
        AppEvent::Tick => vec![],
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) => {
            state.dirty = true;
            handle_key(state, key)
        }
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.kind == KeyEventKind::Release {
        return vec![];
    }

    // Global keybindings
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return vec![Action::Quit],
        KeyCode::Char('l') if ctrl => return vec![Action::OpenAddressBar],
        KeyCode::Left if alt => return vec![Action::Back],
        KeyCode::Right if alt => return vec![Action::Forward],
        _ => {}
    }

    match state.focus {
        Focus::AddressBar => handle_address_key(state, key),
        Focus::Content => match state.current_view() {
            Some(View::Home) => HomeView::handle_key(state, key),
            None => vec![],
        },
    }
}

fn handle_address_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let value = state.address.value.clone();
    let target = value.trim().to_string();
    let handlers = InputHandlers::new()
        .on_change(Action::AddressChanged)
        .on_enter(move || Action::Navigate(target.clone()))
        .on_key_down(|key| {
            matches!(key.code, KeyCode::Enter | KeyCode::Esc).then_some(Action::CloseAddressBar)
        });
    state.address.input.handle_key(Some(value.as_str()), key, &handlers)
}

/// Apply an action to the view state. The store has already seen it.
pub fn apply_action(state: &mut AppState, action: Action) {
    match action {
        Action::Navigate(path) => {
            if !path.is_empty() {
                state.router.navigate(path);
            }
        }
        Action::Back => {
            state.router.back();
        }
        Action::Forward => {
            state.router.forward();
        }
        Action::OpenAddressBar => state.open_address_bar(),
        Action::CloseAddressBar => state.close_address_bar(),
        Action::AddressChanged(value) => state.address.value = value,
        Action::DraftChanged(draft) => state.home.draft = draft,
        Action::DraftSubmitted => {
            state.home.submit_draft();
        }
        Action::ToggleEntries => state.home.expanded = !state.home.expanded,
        Action::Quit => state.should_quit = true,
    }
    state.dirty = true;
}
