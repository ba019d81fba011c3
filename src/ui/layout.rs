use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct ShellLayout {
    pub top_bar: Rect,
    pub content: Rect,
}

pub fn compute_layout(area: Rect) -> ShellLayout {
    // Fixed top bar | routed content
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Top bar
            Constraint::Min(0),    // Content
        ])
        .split(area);

    ShellLayout {
        top_bar: chunks[0],
        content: chunks[1],
    }
}
