use crate::app::state::*;
use crate::ui::input::TextInput;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = Span::styled(format!(" ◆ {} ", state.config.ui.title), Theme::top_bar_path());

    if state.focus == Focus::AddressBar {
        let title_width = title.width() as u16;
        frame.render_widget(Paragraph::new(Line::from(title)).style(Theme::top_bar()), area);

        let input_area = Rect {
            x: area.x + title_width.min(area.width),
            width: area.width.saturating_sub(title_width),
            ..area
        };
        TextInput::new(Some(state.address.value.as_str()), &state.address.input)
            .prompt(Span::styled("go to ", Theme::top_bar_hint()))
            .style(Theme::top_bar())
            .focused(true)
            .render_in(frame, input_area);
        return;
    }

    let path = Span::styled(format!(" {} ", state.router.current_path()), Theme::top_bar());
    let hints = format!(" {} ", state.status_line());

    // Pad so the hints sit at the right edge
    let used = title.width() + path.width() + hints.chars().count();
    let remaining = (area.width as usize).saturating_sub(used);

    let line = Line::from(vec![
        title,
        path,
        Span::styled(" ".repeat(remaining), Theme::top_bar()),
        Span::styled(hints, Theme::top_bar_hint()),
    ]);
    frame.render_widget(Paragraph::new(line).style(Theme::top_bar()), area);
}
