use crate::app::action::Action;
use crate::app::state::{AppState, Focus};
use crate::ui::collapsible::CollapsibleView;
use crate::ui::input::{InputHandlers, TextInput};
use crate::ui::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

pub struct HomeView;

impl HomeView {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Heading
                Constraint::Length(3), // Draft input
                Constraint::Min(0),    // Entries
            ])
            .split(area);

        let heading = Paragraph::new(vec![
            Line::from(Span::styled(" Home", Theme::heading())),
            Line::from(Span::styled(
                " Type a note and press Enter. Ctrl+E toggles the entries panel.",
                Theme::muted(),
            )),
        ]);
        frame.render_widget(heading, chunks[0]);

        let focused = state.focus == Focus::Content;
        let border = if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        TextInput::new(Some(state.home.draft.as_str()), &state.home_input)
            .block(
                Block::default()
                    .title(" Note ")
                    .title_style(Theme::title())
                    .borders(Borders::ALL)
                    .border_style(border)
                    .padding(Padding::horizontal(1)),
            )
            .prompt(Span::styled("❯ ", Style::default().fg(Theme::ACCENT)))
            .placeholder("write something…")
            .placeholder_style(Theme::placeholder())
            .style(Theme::input_text())
            .focused(focused)
            .render_in(frame, chunks[1]);

        let items: Vec<ListItem> = if state.home.entries.is_empty() {
            vec![ListItem::new(Span::styled("No entries yet", Theme::muted()))]
        } else {
            state
                .home
                .entries
                .iter()
                .enumerate()
                .map(|(i, entry)| ListItem::new(format!("{:>3}. {}", i + 1, entry)))
                .collect()
        };
        let entries = CollapsibleView::new(List::new(items)).block(
            Block::default()
                .title(format!(" Entries ({}) ", state.home.entries.len()))
                .title_style(Theme::title())
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );
        frame.render_widget(entries, chunks[2]);
    }

    /// Map a key press to actions while the home view has focus.
    pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('e') {
            return vec![Action::ToggleEntries];
        }

        let handlers = InputHandlers::new()
            .on_change(Action::DraftChanged)
            .on_enter(|| Action::DraftSubmitted);
        let draft = state.home.draft.clone();
        state.home_input.handle_key(Some(draft.as_str()), key, &handlers)
    }
}
