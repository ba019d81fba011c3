//! Views the router can select.

mod home;

pub use home::HomeView;

use crate::app::state::AppState;
use ratatui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
}

pub fn render(frame: &mut Frame, area: Rect, view: View, state: &AppState) {
    match view {
        View::Home => HomeView::render(frame, area, state),
    }
}
