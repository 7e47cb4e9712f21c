//! Form building blocks shared by every tool: text fields, selects,
//! checkboxes, sliders, buttons and the focus ring that moves between them.
//!
//! Layout convention: one labelled control per row, label column on the left
//! (right for RTL languages is not attempted; labels are short).

use super::RenderContext;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use tui_textarea::{CursorMove, TextArea};

/// Width of the label column for single-row controls
pub const LABEL_WIDTH: u16 = 20;

/// Sequential row allocator inside a tool's body area
pub struct Rows {
    area: Rect,
    y: u16,
}

impl Rows {
    pub fn new(area: Rect) -> Self {
        Self { area, y: area.y }
    }

    /// Next `height` rows (clipped to the area)
    pub fn take(&mut self, height: u16) -> Rect {
        let bottom = self.area.y + self.area.height;
        let y = self.y.min(bottom);
        let h = height.min(bottom - y);
        self.y = y + h;
        Rect::new(self.area.x, y, self.area.width, h)
    }

    pub fn skip(&mut self, height: u16) {
        self.take(height);
    }
}

/// Tab / Shift+Tab focus cycling over `count` controls
#[derive(Debug, Clone, Copy)]
pub struct Focus {
    index: usize,
    count: usize,
}

impl Focus {
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is(&self, index: usize) -> bool {
        self.index == index
    }

    /// Change the number of controls, keeping focus in range
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        if self.index >= count {
            self.index = count.saturating_sub(1);
        }
    }

    pub fn set(&mut self, index: usize) {
        if index < self.count {
            self.index = index;
        }
    }

    pub fn next(&mut self) {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
    }

    pub fn previous(&mut self) {
        if self.count > 0 {
            self.index = if self.index == 0 {
                self.count - 1
            } else {
                self.index - 1
            };
        }
    }

    /// Consume Tab/Shift+Tab. Returns true if focus moved.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab => {
                self.next();
                true
            }
            KeyCode::BackTab => {
                self.previous();
                true
            }
            _ => false,
        }
    }
}

pub fn label_style(focused: bool, ui: &RenderContext<'_>) -> Style {
    if focused {
        Style::default()
            .fg(ui.theme.form_label_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ui.theme.form_label)
    }
}

/// Draw `text` clipped to `width` at (x, y)
pub fn put(buf: &mut Buffer, x: u16, y: u16, text: &str, width: u16, style: Style) {
    if width == 0 {
        return;
    }
    buf.set_stringn(x, y, text, width as usize, style);
}

fn render_label(area: Rect, buf: &mut Buffer, label: &str, focused: bool, ui: &RenderContext<'_>) {
    let marker = if focused { "▸ " } else { "  " };
    put(
        buf,
        area.x,
        area.y,
        &format!("{}{}", marker, label),
        LABEL_WIDTH.min(area.width),
        label_style(focused, ui),
    );
}

/// Area to the right of the label column
fn value_area(area: Rect) -> Rect {
    let offset = LABEL_WIDTH.min(area.width);
    Rect::new(area.x + offset, area.y, area.width - offset, area.height)
}

/// Labelled read-only value on one row
pub fn render_value(
    area: Rect,
    buf: &mut Buffer,
    label: &str,
    value: &str,
    style: Style,
    ui: &RenderContext<'_>,
) {
    if area.height == 0 {
        return;
    }
    render_label(area, buf, label, false, ui);
    let value_area = value_area(area);
    put(buf, value_area.x, value_area.y, value, value_area.width, style);
}

/// Lines `text` occupies when greedily word-wrapped at `width`
pub fn wrapped_lines(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    let mut lines = 1u16;
    let mut used = 0usize;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        if used > 0 && used + 1 + len <= width {
            used += 1 + len;
            continue;
        }
        if used > 0 {
            lines = lines.saturating_add(1);
        }
        // Words longer than the line are split across rows
        let extra = (len - 1) / width;
        lines = lines.saturating_add(u16::try_from(extra).unwrap_or(u16::MAX));
        used = len - extra * width;
    }
    lines
}

/// Text input backed by tui-textarea
pub struct TextField {
    label_key: &'static str,
    placeholder: String,
    input: TextArea<'static>,
    multiline: bool,
}

impl TextField {
    pub fn single(label_key: &'static str, initial: &str) -> Self {
        Self::build(label_key, initial, false)
    }

    pub fn multiline(label_key: &'static str, initial: &str) -> Self {
        Self::build(label_key, initial, true)
    }

    fn build(label_key: &'static str, initial: &str, multiline: bool) -> Self {
        let mut field = Self {
            label_key,
            placeholder: String::new(),
            input: TextArea::default(),
            multiline,
        };
        field.set_text(initial);
        field
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self.input.set_placeholder_text(placeholder);
        self
    }

    pub fn text(&self) -> String {
        self.input.lines().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.input.lines().iter().all(|line| line.is_empty())
    }

    /// Replace the contents, leaving the cursor at the end
    pub fn set_text(&mut self, text: &str) {
        let lines: Vec<String> = if self.multiline {
            text.split('\n')
                .map(|line| line.trim_end_matches('\r').to_string())
                .collect()
        } else {
            vec![text.replace(['\r', '\n'], " ")]
        };
        let mut input = TextArea::new(lines);
        if !self.placeholder.is_empty() {
            input.set_placeholder_text(self.placeholder.clone());
        }
        input.move_cursor(CursorMove::Bottom);
        input.move_cursor(CursorMove::End);
        self.input = input;
    }

    /// Feed a key. Returns true if the text changed.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter if !self.multiline => false,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => false,
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.select_all();
                false
            }
            _ => self.input.input(key),
        }
    }

    /// Insert pasted text at the cursor
    pub fn paste(&mut self, text: &str) -> bool {
        if !self.multiline {
            return self.input.insert_str(text.replace(['\r', '\n'], " "));
        }
        let normalized = crate::clipboard::normalize_newlines(text);
        let mut changed = false;
        for (i, part) in normalized.split('\n').enumerate() {
            if i > 0 {
                self.input.insert_newline();
                changed = true;
            }
            changed |= self.input.insert_str(part);
        }
        changed
    }

    /// Single-line: label column + input. Multiline: label row + bordered box.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, focused: bool, ui: &RenderContext<'_>) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let field_style = Style::default()
            .fg(ui.theme.form_field_text)
            .bg(ui.theme.form_field_background);
        let cursor_style = if focused {
            Style::default()
                .fg(ui.theme.form_field_background)
                .bg(ui.theme.form_field_text)
        } else {
            field_style
        };

        self.input.set_style(field_style);
        self.input.set_cursor_style(cursor_style);
        self.input.set_cursor_line_style(Style::default());
        self.input
            .set_placeholder_style(Style::default().fg(ui.theme.text_disabled));

        let label = ui.tr.t(self.label_key);
        if self.multiline {
            let border = if focused {
                ui.theme.border_focused
            } else {
                ui.theme.border
            };
            self.input.set_block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(label.to_string())
                    .title_style(label_style(focused, ui)),
            );
            Widget::render(&self.input, area, buf);
        } else {
            render_label(area, buf, label, focused, ui);
            self.input.set_block(Block::default().borders(Borders::NONE));
            let value = value_area(Rect::new(area.x, area.y, area.width, 1));
            Widget::render(&self.input, value, buf);
        }
    }
}

/// Left/Right select over a fixed option list
pub struct Choice<T: Copy + PartialEq> {
    label_key: &'static str,
    options: Vec<(T, String)>,
    index: usize,
}

impl<T: Copy + PartialEq> Choice<T> {
    pub fn new(label_key: &'static str, options: Vec<(T, String)>, selected: T) -> Self {
        let index = options
            .iter()
            .position(|(value, _)| *value == selected)
            .unwrap_or(0);
        Self {
            label_key,
            options,
            index,
        }
    }

    pub fn selected(&self) -> T {
        self.options[self.index].0
    }

    pub fn selected_label(&self) -> &str {
        &self.options[self.index].1
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.options.len();
    }

    pub fn previous(&mut self) {
        self.index = if self.index == 0 {
            self.options.len() - 1
        } else {
            self.index - 1
        };
    }

    /// Left/Right cycle. Returns true if the selection changed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Left | KeyCode::Up => {
                self.previous();
                true
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => {
                self.next();
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, focused: bool, ui: &RenderContext<'_>) {
        if area.height == 0 {
            return;
        }
        render_label(area, buf, ui.tr.t(self.label_key), focused, ui);
        let value_area = value_area(area);
        let style = Style::default()
            .fg(ui.theme.form_field_text)
            .bg(ui.theme.form_field_background);
        put(
            buf,
            value_area.x,
            value_area.y,
            &format!("◀ {} ▶", self.selected_label()),
            value_area.width,
            style,
        );
    }
}

/// Checkbox toggled with Space or Enter
pub struct Toggle {
    label_key: &'static str,
    pub value: bool,
}

impl Toggle {
    pub fn new(label_key: &'static str, value: bool) -> Self {
        Self { label_key, value }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.value = !self.value;
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, focused: bool, ui: &RenderContext<'_>) {
        if area.height == 0 {
            return;
        }
        render_label(area, buf, ui.tr.t(self.label_key), focused, ui);
        let value_area = value_area(area);
        let (mark, color) = if self.value {
            ("[x]", ui.theme.form_checkbox_checked)
        } else {
            ("[ ]", ui.theme.form_checkbox_unchecked)
        };
        put(
            buf,
            value_area.x,
            value_area.y,
            mark,
            value_area.width,
            Style::default().fg(color),
        );
    }
}

/// Integer slider moved with Left/Right
pub struct Slider {
    label_key: &'static str,
    pub value: i64,
    min: i64,
    max: i64,
    step: i64,
}

impl Slider {
    pub fn new(label_key: &'static str, value: i64, min: i64, max: i64, step: i64) -> Self {
        Self {
            label_key,
            value: value.clamp(min, max),
            min,
            max,
            step,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let next = match key.code {
            KeyCode::Left | KeyCode::Down => self.value - self.step,
            KeyCode::Right | KeyCode::Up => self.value + self.step,
            KeyCode::Home => self.min,
            KeyCode::End => self.max,
            _ => return false,
        }
        .clamp(self.min, self.max);
        let changed = next != self.value;
        self.value = next;
        changed
    }

    /// Render with `display` as the value text (e.g. "12" or "70%")
    pub fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        focused: bool,
        display: &str,
        ui: &RenderContext<'_>,
    ) {
        if area.height == 0 {
            return;
        }
        render_label(area, buf, ui.tr.t(self.label_key), focused, ui);
        let value_area = value_area(area);
        let track_width = value_area.width.saturating_sub(display.len() as u16 + 1).min(32);
        let span = (self.max - self.min).max(1) as f64;
        let filled = (((self.value - self.min) as f64 / span) * track_width as f64).round() as u16;
        for i in 0..track_width {
            let (symbol, color) = if i < filled {
                ("━", ui.theme.primary)
            } else {
                ("─", ui.theme.progress_track)
            };
            put(buf, value_area.x + i, value_area.y, symbol, 1, Style::default().fg(color));
        }
        put(
            buf,
            value_area.x + track_width + 1,
            value_area.y,
            display,
            value_area.width.saturating_sub(track_width + 1),
            Style::default().fg(ui.theme.text_primary),
        );
    }
}

/// Draw a button; returns the width used
pub fn render_button(
    area: Rect,
    buf: &mut Buffer,
    label: &str,
    focused: bool,
    ui: &RenderContext<'_>,
) -> u16 {
    if area.height == 0 {
        return 0;
    }
    let text = format!(" {} ", label);
    let bg = if focused {
        ui.theme.button_focused
    } else {
        ui.theme.button_normal
    };
    let mut style = Style::default().fg(ui.theme.button_text).bg(bg);
    if focused {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    let width = (text.chars().count() as u16).min(area.width);
    put(buf, area.x, area.y, &text, width, style);
    width
}
