pub mod collapsible;
pub mod input;
mod layout;
mod theme;
mod top_bar;

pub use theme::Theme;

use crate::app::state::AppState;
use crate::views;
use ratatui::prelude::*;

/// Draw the root layout: top bar, then whatever view the router matched.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let shell = layout::compute_layout(area);

    top_bar::render(frame, shell.top_bar, state);

    // Unmatched paths leave the content region empty
    if let Some(view) = state.current_view() {
        views::render(frame, shell.content, view, state);
    }
}
