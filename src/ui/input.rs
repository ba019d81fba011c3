//! Controlled single-line text input.
//!
//! When the caller supplies a value, the text belongs to the caller and
//! [`InputControl`] only remembers the caret. It turns key events into edits
//! of that value and reports them through optional handlers. Without a value
//! the control falls back to its own buffer, so typed text still accumulates.
//! [`TextInput`] draws whichever of the two is in effect.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

type ChangeFn<A> = Box<dyn Fn(String) -> A>;
type EnterFn<A> = Box<dyn Fn() -> A>;
type KeyDownFn<A> = Box<dyn Fn(&KeyEvent) -> Option<A>>;

/// Optional callbacks. An unset handler is skipped silently.
pub struct InputHandlers<A> {
    on_change: Option<ChangeFn<A>>,
    on_enter: Option<EnterFn<A>>,
    on_key_down: Option<KeyDownFn<A>>,
}

impl<A> Default for InputHandlers<A> {
    fn default() -> Self {
        Self {
            on_change: None,
            on_enter: None,
            on_key_down: None,
        }
    }
}

impl<A> InputHandlers<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the new value after every edit that changed it.
    pub fn on_change(mut self, f: impl Fn(String) -> A + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Called when Enter is pressed.
    pub fn on_enter(mut self, f: impl Fn() -> A + 'static) -> Self {
        self.on_enter = Some(Box::new(f));
        self
    }

    /// Called with the raw event for every key press, Enter included.
    pub fn on_key_down(mut self, f: impl Fn(&KeyEvent) -> Option<A> + 'static) -> Self {
        self.on_key_down = Some(Box::new(f));
        self
    }
}

#[derive(Debug, Default, Clone)]
pub struct InputControl {
    cursor: usize,
    /// Text for callers that pass no value.
    uncontrolled: String,
}

impl InputControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caret byte offset, clamped to `value` and snapped to a char boundary.
    pub fn cursor(&self, value: &str) -> usize {
        let mut cursor = self.cursor.min(value.len());
        while !value.is_char_boundary(cursor) {
            cursor -= 1;
        }
        cursor
    }

    pub fn move_end(&mut self, value: &str) {
        self.cursor = value.len();
    }

    /// The supplied value, or the internal buffer when there is none.
    pub fn text<'a>(&'a self, value: Option<&'a str>) -> &'a str {
        value.unwrap_or(self.uncontrolled.as_str())
    }

    /// Process one key event against the caller's `value`.
    ///
    /// Order per press: `on_enter` (Enter only), then `on_key_down`, then
    /// `on_change` if the edit produced a different value. Release events are
    /// ignored. With `value` set to `None` the edit applies to the internal
    /// buffer, which `on_change` then reports.
    pub fn handle_key<A>(
        &mut self,
        value: Option<&str>,
        key: KeyEvent,
        handlers: &InputHandlers<A>,
    ) -> Vec<A> {
        let mut out = Vec::new();
        if key.kind == KeyEventKind::Release {
            return out;
        }
        let controlled = value.is_some();
        let current = self.text(value).to_string();

        if key.code == KeyCode::Enter {
            if let Some(on_enter) = &handlers.on_enter {
                out.push(on_enter());
            }
        }

        if let Some(on_key_down) = &handlers.on_key_down {
            if let Some(action) = on_key_down(&key) {
                out.push(action);
            }
        }

        if let Some(next) = self.edit(&current, &key) {
            if !controlled {
                self.uncontrolled.clone_from(&next);
            }
            if let Some(on_change) = &handlers.on_change {
                out.push(on_change(next));
            }
        }

        out
    }

    /// Apply an editing key. Returns the new value when the text changed;
    /// caret-only keys move the caret and return `None`.
    fn edit(&mut self, value: &str, key: &KeyEvent) -> Option<String> {
        let cursor = self.cursor(value);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        // AltGr arrives as Ctrl+Alt on Windows and produces ordinary text
        let chord = ctrl != alt;

        match key.code {
            KeyCode::Char('w') if ctrl && !alt => {
                let start = word_start(value, cursor);
                if start == cursor {
                    return None;
                }
                let mut next = value.to_string();
                next.drain(start..cursor);
                self.cursor = start;
                Some(next)
            }
            KeyCode::Char('u') if ctrl && !alt => {
                self.cursor = 0;
                if value.is_empty() {
                    None
                } else {
                    Some(String::new())
                }
            }
            KeyCode::Char(_) if chord => None,
            KeyCode::Char(c) => {
                let mut next = value.to_string();
                next.insert(cursor, c);
                self.cursor = cursor + c.len_utf8();
                Some(next)
            }
            KeyCode::Backspace => {
                if cursor == 0 {
                    return None;
                }
                let prev = prev_boundary(value, cursor);
                let mut next = value.to_string();
                next.drain(prev..cursor);
                self.cursor = prev;
                Some(next)
            }
            KeyCode::Delete => {
                if cursor >= value.len() {
                    return None;
                }
                let end = next_boundary(value, cursor);
                let mut next = value.to_string();
                next.drain(cursor..end);
                self.cursor = cursor;
                Some(next)
            }
            KeyCode::Left => {
                self.cursor = prev_boundary(value, cursor);
                None
            }
            KeyCode::Right => {
                self.cursor = next_boundary(value, cursor);
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = value.len();
                None
            }
            _ => None,
        }
    }
}

fn prev_boundary(value: &str, cursor: usize) -> usize {
    value[..cursor]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_boundary(value: &str, cursor: usize) -> usize {
    value[cursor..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| cursor + i)
        .unwrap_or(value.len())
}

fn word_start(value: &str, cursor: usize) -> usize {
    let head = &value[..cursor];
    let trimmed = head.trim_end_matches(' ');
    match trimmed.rfind(' ') {
        Some(i) => i + 1,
        None => 0,
    }
}

/// Widget for an input's current value. Extra presentation (block, style,
/// placeholder, prompt) is applied to the underlying paragraph.
pub struct TextInput<'a> {
    value: &'a str,
    cursor: usize,
    placeholder: Option<&'a str>,
    prompt: Option<Span<'a>>,
    block: Option<Block<'a>>,
    style: Style,
    placeholder_style: Style,
    focused: bool,
}

impl<'a> TextInput<'a> {
    pub fn new(value: Option<&'a str>, control: &'a InputControl) -> Self {
        let value = control.text(value);
        Self {
            value,
            cursor: control.cursor(value),
            placeholder: None,
            prompt: None,
            block: None,
            style: Style::default(),
            placeholder_style: Style::default().add_modifier(Modifier::DIM),
            focused: false,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn placeholder_style(mut self, style: Style) -> Self {
        self.placeholder_style = style;
        self
    }

    pub fn prompt(mut self, prompt: Span<'a>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn inner(&self, area: Rect) -> Rect {
        match &self.block {
            Some(block) => block.inner(area),
            None => area,
        }
    }

    fn prompt_width(&self) -> u16 {
        self.prompt.as_ref().map(|p| p.width() as u16).unwrap_or(0)
    }

    /// Columns scrolled off the left so the caret stays visible.
    fn scroll(&self, text_width: u16) -> u16 {
        let caret = self.value[..self.cursor].width() as u16;
        if text_width == 0 || caret < text_width {
            0
        } else {
            caret - text_width + 1
        }
    }

    /// Terminal cell for the caret, when focused.
    pub fn cursor_position(&self, area: Rect) -> Option<Position> {
        if !self.focused {
            return None;
        }
        let inner = self.inner(area);
        if inner.width == 0 || inner.height == 0 {
            return None;
        }
        let prompt = self.prompt_width();
        let text_width = inner.width.saturating_sub(prompt);
        let caret = self.value[..self.cursor].width() as u16 - self.scroll(text_width);
        let x = (inner.x + prompt + caret).min(inner.right() - 1);
        Some(Position::new(x, inner.y))
    }

    /// Render and, when focused, place the terminal cursor on the caret.
    pub fn render_in(self, frame: &mut Frame, area: Rect) {
        let cursor = self.cursor_position(area);
        frame.render_widget(self, area);
        if let Some(position) = cursor {
            frame.set_cursor_position(position);
        }
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.inner(area);
        let prompt_width = self.prompt_width();
        let scroll = self.scroll(inner.width.saturating_sub(prompt_width));

        if let Some(block) = self.block {
            block.render(area, buf);
        }

        let mut spans: Vec<Span> = Vec::new();
        if let Some(prompt) = self.prompt {
            spans.push(prompt);
        }
        let text_area = Rect {
            x: inner.x + prompt_width.min(inner.width),
            width: inner.width.saturating_sub(prompt_width),
            ..inner
        };
        if !spans.is_empty() {
            Paragraph::new(Line::from(spans)).style(self.style).render(inner, buf);
        }

        let text = if self.value.is_empty() {
            match self.placeholder {
                Some(placeholder) if !self.focused => Span::styled(placeholder, self.placeholder_style),
                _ => Span::raw(""),
            }
        } else {
            Span::raw(self.value)
        };
        Paragraph::new(Line::from(text))
            .style(self.style)
            .scroll((0, scroll))
            .render(text_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::widgets::Borders;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum Msg {
        Changed(String),
        Entered,
        KeyDown(KeyCode),
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn all_handlers() -> InputHandlers<Msg> {
        InputHandlers::new()
            .on_change(Msg::Changed)
            .on_enter(|| Msg::Entered)
            .on_key_down(|key| Some(Msg::KeyDown(key.code)))
    }

    /// Type `text` into a controlled input, feeding each change back as the
    /// new value, the way a caller would.
    fn type_text(control: &mut InputControl, value: &mut String, text: &str) -> Vec<Msg> {
        let handlers = InputHandlers::new().on_change(Msg::Changed);
        let mut out = Vec::new();
        for c in text.chars() {
            for msg in control.handle_key(Some(value.as_str()), press(KeyCode::Char(c)), &handlers) {
                if let Msg::Changed(next) = &msg {
                    *value = next.clone();
                }
                out.push(msg);
            }
        }
        out
    }

    #[test]
    fn change_fires_once_per_keystroke_with_new_value() {
        let mut control = InputControl::new();
        let mut value = String::new();
        let msgs = type_text(&mut control, &mut value, "héllo");

        assert_eq!(
            msgs,
            vec![
                Msg::Changed("h".into()),
                Msg::Changed("hé".into()),
                Msg::Changed("hél".into()),
                Msg::Changed("héll".into()),
                Msg::Changed("héllo".into()),
            ]
        );
        assert_eq!(value, "héllo");
    }

    #[test]
    fn enter_fires_enter_then_key_down() {
        let mut control = InputControl::new();
        let msgs = control.handle_key(Some("abc"), press(KeyCode::Enter), &all_handlers());
        assert_eq!(msgs, vec![Msg::Entered, Msg::KeyDown(KeyCode::Enter)]);
    }

    #[test]
    fn key_down_fires_for_every_key() {
        let seen = Rc::new(Cell::new(0));
        let counter = seen.clone();
        let handlers: InputHandlers<()> = InputHandlers::new().on_key_down(move |_| {
            counter.set(counter.get() + 1);
            None
        });

        let mut control = InputControl::new();
        for code in [
            KeyCode::Char('a'),
            KeyCode::Enter,
            KeyCode::Left,
            KeyCode::Esc,
            KeyCode::Backspace,
            KeyCode::F(5),
        ] {
            control.handle_key(Some("x"), press(code), &handlers);
        }
        assert_eq!(seen.get(), 6);
    }

    #[test]
    fn enter_handler_not_called_for_other_keys() {
        let entered = Rc::new(Cell::new(0));
        let counter = entered.clone();
        let handlers: InputHandlers<()> = InputHandlers::new().on_enter(move || {
            counter.set(counter.get() + 1);
        });

        let mut control = InputControl::new();
        control.handle_key(Some(""), press(KeyCode::Char('q')), &handlers);
        control.handle_key(Some(""), press(KeyCode::Tab), &handlers);
        assert_eq!(entered.get(), 0);
        control.handle_key(Some(""), press(KeyCode::Enter), &handlers);
        assert_eq!(entered.get(), 1);
    }

    #[test]
    fn missing_handlers_are_no_ops() {
        let mut control = InputControl::new();
        let handlers: InputHandlers<Msg> = InputHandlers::new();
        assert!(control.handle_key(Some("a"), press(KeyCode::Enter), &handlers).is_empty());
        assert!(control.handle_key(None, press(KeyCode::Char('z')), &handlers).is_empty());
    }

    #[test]
    fn without_a_value_text_accumulates_internally() {
        let mut control = InputControl::new();
        let handlers = InputHandlers::new().on_change(Msg::Changed);

        let mut msgs = control.handle_key(None, press(KeyCode::Char('a')), &handlers);
        msgs.extend(control.handle_key(None, press(KeyCode::Char('b')), &handlers));
        assert_eq!(msgs, vec![Msg::Changed("a".into()), Msg::Changed("ab".into())]);
        assert_eq!(control.text(None), "ab");

        let msgs = control.handle_key(None, press(KeyCode::Backspace), &handlers);
        assert_eq!(msgs, vec![Msg::Changed("a".into())]);

        // A supplied value still wins over the internal buffer
        assert_eq!(control.text(Some("xyz")), "xyz");
    }

    #[test]
    fn altgr_characters_are_text() {
        let mut control = InputControl::new();
        let handlers = InputHandlers::new().on_change(Msg::Changed);
        let altgr = KeyEvent::new(KeyCode::Char('@'), KeyModifiers::CONTROL | KeyModifiers::ALT);
        let msgs = control.handle_key(Some("me"), altgr, &handlers);
        assert_eq!(msgs, vec![Msg::Changed("@me".into())]);

        let alt_only = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert!(control.handle_key(Some(""), alt_only, &handlers).is_empty());
    }

    #[test]
    fn caret_keys_do_not_change_value() {
        let mut control = InputControl::new();
        control.move_end("abc");
        let handlers = InputHandlers::new().on_change(Msg::Changed);
        for code in [KeyCode::Left, KeyCode::Home, KeyCode::Right, KeyCode::End] {
            assert!(control.handle_key(Some("abc"), press(code), &handlers).is_empty());
        }
    }

    #[test]
    fn editing_in_the_middle() {
        let mut control = InputControl::new();
        let handlers = InputHandlers::new().on_change(Msg::Changed);
        control.move_end("abd");
        control.handle_key(Some("abd"), press(KeyCode::Left), &handlers);
        let msgs = control.handle_key(Some("abd"), press(KeyCode::Char('c')), &handlers);
        assert_eq!(msgs, vec![Msg::Changed("abcd".into())]);

        let msgs = control.handle_key(Some("abcd"), press(KeyCode::Delete), &handlers);
        assert_eq!(msgs, vec![Msg::Changed("abc".into())]);

        let msgs = control.handle_key(Some("abc"), press(KeyCode::Backspace), &handlers);
        assert_eq!(msgs, vec![Msg::Changed("ab".into())]);
    }

    #[test]
    fn backspace_at_start_does_not_fire_change() {
        let mut control = InputControl::new();
        let handlers = InputHandlers::new().on_change(Msg::Changed);
        assert!(control.handle_key(Some("abc"), press(KeyCode::Home), &handlers).is_empty());
        assert!(control.handle_key(Some("abc"), press(KeyCode::Backspace), &handlers).is_empty());
    }

    #[test]
    fn ctrl_shortcuts() {
        let mut control = InputControl::new();
        let handlers = InputHandlers::new().on_change(Msg::Changed);
        control.move_end("hello big world");

        let msgs = control.handle_key(Some("hello big world"), ctrl('w'), &handlers);
        assert_eq!(msgs, vec![Msg::Changed("hello big ".into())]);

        let msgs = control.handle_key(Some("hello big "), ctrl('u'), &handlers);
        assert_eq!(msgs, vec![Msg::Changed(String::new())]);

        // Other control chords are not text
        assert!(control.handle_key(Some(""), ctrl('e'), &handlers).is_empty());
    }

    #[test]
    fn release_events_are_ignored() {
        let mut control = InputControl::new();
        let mut key = press(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert!(control.handle_key(Some(""), key, &all_handlers()).is_empty());
    }

    #[test]
    fn caret_is_clamped_to_a_shorter_value() {
        let mut control = InputControl::new();
        control.move_end("a long value");
        assert_eq!(control.cursor("ab"), 2);
        assert_eq!(control.cursor("é"), 2);
        assert_eq!(control.cursor(""), 0);
    }

    #[test]
    fn renders_value_inside_block() {
        let backend = TestBackend::new(12, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut control = InputControl::new();
        control.move_end("hi");

        terminal
            .draw(|f| {
                TextInput::new(Some("hi"), &control)
                    .block(Block::default().borders(Borders::ALL))
                    .focused(true)
                    .render_in(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(1, 1)].symbol(), "h");
        assert_eq!(buffer[(2, 1)].symbol(), "i");
        assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(3, 1));
    }

    #[test]
    fn renders_internal_text_when_no_value_is_given() {
        let mut control = InputControl::new();
        let handlers: InputHandlers<Msg> = InputHandlers::new();
        control.handle_key(None, press(KeyCode::Char('a')), &handlers);
        control.handle_key(None, press(KeyCode::Char('b')), &handlers);

        let backend = TestBackend::new(6, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                TextInput::new(None, &control)
                    .placeholder("type")
                    .focused(true)
                    .render_in(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0, 0)].symbol(), "a");
        assert_eq!(buffer[(1, 0)].symbol(), "b");
        assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(2, 0));
    }

    #[test]
    fn placeholder_shows_only_when_empty_and_unfocused() {
        let backend = TestBackend::new(10, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let control = InputControl::new();

        terminal
            .draw(|f| {
                f.render_widget(TextInput::new(None, &control).placeholder("type"), f.area());
            })
            .unwrap();
        assert_eq!(terminal.backend().buffer()[(0, 0)].symbol(), "t");

        terminal
            .draw(|f| {
                f.render_widget(
                    TextInput::new(Some(""), &control).placeholder("type").focused(true),
                    f.area(),
                );
            })
            .unwrap();
        assert_eq!(terminal.backend().buffer()[(0, 0)].symbol(), " ");
    }
}
