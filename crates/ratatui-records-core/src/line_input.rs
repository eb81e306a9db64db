use crate::column::InputKind;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineInputAction {
    None,
    /// The cursor moved; the text did not change.
    Moved,
    Changed,
}

/// A single-line text field used to edit one cell.
///
/// Keys the field does not consume (Enter, Tab, Esc, Up/Down, PageUp/PageDown) return
/// [`LineInputAction::None`] so the caller can treat them as navigation.
#[derive(Clone, Debug)]
pub struct LineInput {
    text: String,
    cursor: usize, // char index
    kind: InputKind,
    scroll: u32,
}

impl Default for LineInput {
    fn default() -> Self {
        Self::new(InputKind::Text)
    }
}

impl LineInput {
    pub fn new(kind: InputKind) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            kind,
            scroll: 0,
        }
    }

    pub fn with_text(kind: InputKind, text: impl Into<String>) -> Self {
        let mut input = Self::new(kind);
        input.set_text(text);
        input
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into().replace(['\n', '\r'], " ");
        self.cursor = self.text.chars().count();
        self.scroll = 0;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn kind(&self) -> &InputKind {
        &self.kind
    }

    pub fn input(&mut self, event: InputEvent) -> LineInputAction {
        match event {
            InputEvent::Paste(s) => {
                if matches!(self.kind, InputKind::Select(_)) {
                    return LineInputAction::None;
                }
                let before = self.text.len();
                for c in s.chars().filter(|c| !c.is_control()) {
                    self.insert_char(c);
                }
                if self.text.len() == before {
                    LineInputAction::None
                } else {
                    LineInputAction::Changed
                }
            }
            InputEvent::Key(key) => self.handle_key(key),
        }
    }

    /// Renders the text and returns the terminal cursor position, if it is inside `area`.
    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, style: Style) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), style);

        if matches!(self.kind, InputKind::Select(_)) {
            let display = format!("‹ {} ›", self.text);
            render::render_str_clipped(area.x, area.y, 0, area.width, buf, &display, style);
            return None;
        }

        let cursor_x = self.cursor_display_x();
        let width = area.width as u32;
        if cursor_x < self.scroll {
            self.scroll = cursor_x;
        } else if cursor_x >= self.scroll + width {
            self.scroll = cursor_x + 1 - width;
        }
        render::render_str_clipped(area.x, area.y, self.scroll, area.width, buf, &self.text, style);

        let x = cursor_x.saturating_sub(self.scroll);
        (x < width).then(|| (area.x + x as u16, area.y))
    }

    fn handle_key(&mut self, key: KeyEvent) -> LineInputAction {
        if let InputKind::Select(options) = &self.kind {
            let step = match key.code {
                KeyCode::Left => -1,
                KeyCode::Right | KeyCode::Char(' ') => 1,
                _ => return LineInputAction::None,
            };
            let next = cycle_option(options, &self.text, step).map(str::to_string);
            return match next {
                Some(next) if next != self.text => {
                    self.set_text(next);
                    LineInputAction::Changed
                }
                _ => LineInputAction::None,
            };
        }

        match key.code {
            KeyCode::Char(c) => {
                if !key.modifiers.is_plain() {
                    return LineInputAction::None;
                }
                if self.insert_char(c) {
                    LineInputAction::Changed
                } else {
                    LineInputAction::None
                }
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return LineInputAction::None;
                }
                self.cursor -= 1;
                let b = self.byte_at(self.cursor);
                self.text.remove(b);
                LineInputAction::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_len() {
                    return LineInputAction::None;
                }
                let b = self.byte_at(self.cursor);
                self.text.remove(b);
                LineInputAction::Changed
            }
            KeyCode::Left => self.move_cursor(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_cursor((self.cursor + 1).min(self.char_len())),
            KeyCode::Home => self.move_cursor(0),
            KeyCode::End => self.move_cursor(self.char_len()),
            KeyCode::Enter
            | KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Esc
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::PageUp
            | KeyCode::PageDown => LineInputAction::None,
        }
    }

    fn move_cursor(&mut self, to: usize) -> LineInputAction {
        if to == self.cursor {
            return LineInputAction::None;
        }
        self.cursor = to;
        LineInputAction::Moved
    }

    fn insert_char(&mut self, c: char) -> bool {
        if !self.accepts(c) {
            return false;
        }
        let b = self.byte_at(self.cursor);
        self.text.insert(b, c);
        self.cursor += 1;
        true
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            InputKind::Number => {
                c.is_ascii_digit()
                    || (c == '-' && self.cursor == 0 && !self.text.starts_with('-'))
            }
            InputKind::Email => !c.is_whitespace(),
            InputKind::Text => !c.is_control(),
            InputKind::Select(_) => false,
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn cursor_display_x(&self) -> u32 {
        self.text
            .chars()
            .take(self.cursor)
            .map(|c| UnicodeWidthChar::width(c).unwrap_or(0) as u32)
            .sum()
    }
}

fn cycle_option<'a>(options: &'a [String], current: &str, step: i32) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }
    let len = options.len() as i32;
    let next = match options.iter().position(|o| o == current) {
        Some(i) => (i as i32 + step).rem_euclid(len),
        None => 0,
    };
    options.get(next as usize).map(String::as_str)
}
