//! Layout shell: progress bar, header, scrolling main area and footer.
//!
//! The main content is drawn into an offscreen buffer as tall as the content
//! and the visible window of rows is copied onto the screen. The scroll
//! offset into that buffer drives the reading progress bar.

use super::{home, pages, popup_menu, progress_bar::ProgressBar, tool_frame};
use crate::core::view::{ViewState, NAV_ITEMS};
use crate::core::AppCore;
use crate::tools::form::put;
use crate::tools::RenderContext;
use chrono::Datelike;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};

pub const HEADER_HEIGHT: u16 = 2;
pub const FOOTER_HEIGHT: u16 = 2;
const MAX_CONTENT_WIDTH: u16 = 140;

/// Screen regions for a terminal of `area`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellLayout {
    pub progress: Rect,
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl ShellLayout {
    pub fn new(area: Rect) -> Self {
        let take = |y: &mut u16, h: u16| {
            let h = h.min(area.bottom().saturating_sub(*y));
            let rect = Rect::new(area.x, *y, area.width, h);
            *y += h;
            rect
        };
        let mut y = area.y;
        let progress = take(&mut y, 1);
        let header = take(&mut y, HEADER_HEIGHT);
        let main_height = area.bottom().saturating_sub(y).saturating_sub(FOOTER_HEIGHT);
        let main = take(&mut y, main_height);
        let footer = take(&mut y, FOOTER_HEIGHT);
        Self {
            progress,
            header,
            main,
            footer,
        }
    }

    /// Centered column inside the main area where content is drawn
    pub fn content(&self) -> Rect {
        let width = self.main.width.saturating_sub(2).min(MAX_CONTENT_WIDTH);
        let x = self.main.x + (self.main.width - width) / 2;
        Rect::new(x, self.main.y, width, self.main.height)
    }
}

fn content_height(core: &AppCore, width: u16, ui: &RenderContext<'_>) -> u16 {
    let view = core.current_view();
    match view {
        ViewState::Home => home::height(width, core.home_columns, ui),
        _ if view.is_page() => pages::height(view, width, &core.contact, ui),
        _ => match (view.meta(), core.tool.as_ref()) {
            (Some(meta), Some(tool)) => tool_frame::height(meta, tool.as_ref(), width, ui),
            _ => 0,
        },
    }
}

/// Rows that must stay visible after a focus change
fn focus_span(core: &AppCore, width: u16, ui: &RenderContext<'_>) -> Option<(u16, u16)> {
    let view = core.current_view();
    match view {
        ViewState::Home => Some((
            home::card_top(core.home_selected, width, core.home_columns, ui),
            home::CARD_HEIGHT,
        )),
        _ if view.is_page() => {
            pages::focus_row(view, width, &core.contact, ui).map(|row| (row, 1))
        }
        _ => match (view.meta(), core.tool.as_ref()) {
            (Some(meta), Some(tool)) => Some((tool_frame::focus_row(meta, tool.as_ref(), width, ui), 1)),
            _ => None,
        },
    }
}

fn render_content(core: &mut AppCore, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
    let view = core.current_view();
    match view {
        ViewState::Home => home::render(area, buf, core.home_selected, core.home_columns, ui),
        _ if view.is_page() => pages::render(view, area, buf, &mut core.contact, ui),
        _ => {
            if let (Some(meta), Some(tool)) = (view.meta(), core.tool.as_mut()) {
                tool_frame::render(meta, tool.as_mut(), area, buf, ui);
            }
        }
    }
}

/// Copy rows `offset..` of `content` into `target`
fn blit(content: &Buffer, offset: u16, target: Rect, buf: &mut Buffer) {
    let source = content.area;
    for row in 0..target.height {
        let src_y = offset + row;
        if src_y >= source.height {
            break;
        }
        for col in 0..target.width.min(source.width) {
            if let (Some(cell), Some(dst)) = (
                content.cell((col, src_y)),
                buf.cell_mut((target.x + col, target.y + row)),
            ) {
                *dst = cell.clone();
            }
        }
    }
}

fn render_header(core: &AppCore, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
    if area.height == 0 {
        return;
    }
    let theme = ui.theme;
    let brand = format!("◆ {}", ui.tr.t("app_name"));
    let mut x = area.x + 1;
    let brand_width = brand.chars().count() as u16;
    put(
        buf,
        x,
        area.y,
        &brand,
        area.right().saturating_sub(x),
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    );
    x += brand_width + 3;

    // Theme and language indicators on the right
    let indicators = format!(
        "{} ^T  {} ^L  ☰ F10 ",
        ui.tr.t(ui.theme.mode.label_key()),
        core.prefs.language().code().to_uppercase(),
    );
    let indicators_width = indicators.chars().count() as u16;
    let nav_end = area.right().saturating_sub(indicators_width + 1);

    for nav in NAV_ITEMS.iter() {
        if x >= nav_end {
            break;
        }
        let key = match nav.key {
            crossterm::event::KeyCode::F(n) => format!("F{}", n),
            _ => String::new(),
        };
        let label = format!("{} {}", key, ui.tr.t(nav.label_key));
        let style = if core.current_view() == nav.view {
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.text_secondary)
        };
        put(buf, x, area.y, &label, nav_end - x, style);
        x += label.chars().count() as u16 + 3;
    }

    if area.width > indicators_width {
        put(
            buf,
            area.right() - indicators_width,
            area.y,
            &indicators,
            indicators_width,
            Style::default().fg(theme.text_primary),
        );
    }

    if area.height > 1 {
        let rule = "─".repeat(area.width as usize);
        put(buf, area.x, area.y + 1, &rule, area.width, Style::default().fg(theme.border));
    }
}

fn render_footer(core: &AppCore, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
    if area.height == 0 {
        return;
    }
    let theme = ui.theme;
    let (text, style) = match &core.status {
        Some(status) => (
            status.text.clone(),
            Style::default()
                .fg(if status.is_error {
                    theme.status_error
                } else {
                    theme.status_info
                })
                .add_modifier(Modifier::BOLD),
        ),
        None => {
            let view = core.current_view();
            let key = if view == ViewState::Home {
                "hint_home"
            } else if view.is_tool() {
                "hint_tool"
            } else {
                "hint_page"
            };
            (ui.tr.t(key).to_string(), Style::default().fg(theme.text_disabled))
        }
    };
    put(buf, area.x + 1, area.y, &text, area.width.saturating_sub(2), style);

    if area.height > 1 {
        let year = chrono::Local::now().year().to_string();
        let rights = ui.tr.fmt("footer_rights", &[("year", year.as_str())]);
        let location = core.prefs.location().to_query_string();
        let location_width = location.chars().count() as u16;
        put(
            buf,
            area.x + 1,
            area.y + 1,
            &rights,
            area.width.saturating_sub(location_width + 3),
            Style::default().fg(theme.text_secondary),
        );
        if location_width > 0 && area.width > location_width + 1 {
            put(
                buf,
                area.right() - location_width - 1,
                area.y + 1,
                &location,
                location_width,
                Style::default().fg(theme.text_disabled),
            );
        }
    }
}

/// Draw the whole screen and report layout facts back to the core
pub fn render(area: Rect, buf: &mut Buffer, core: &mut AppCore) {
    let theme = core.theme().clone();
    let ui = RenderContext {
        theme: &theme,
        tr: core.tr(),
    };
    buf.set_style(
        area,
        Style::default().bg(theme.background).fg(theme.text_primary),
    );

    let layout = ShellLayout::new(area);
    let content = layout.content();
    core.home_columns = home::columns_for(content.width);

    let height = content_height(core, content.width, &ui);
    core.scroll.set_dimensions(height, content.height);
    if core.follow_focus {
        if let Some((top, rows)) = focus_span(core, content.width, &ui) {
            core.scroll.reveal(top, rows);
        }
        core.follow_focus = false;
    }

    if height > 0 && content.width > 0 {
        // Struct literal: `Rect::new` would clip tall content to a u16 cell count
        let mut offscreen = Buffer::empty(Rect {
            x: 0,
            y: 0,
            width: content.width,
            height,
        });
        offscreen.set_style(
            offscreen.area,
            Style::default().bg(theme.background).fg(theme.text_primary),
        );
        render_content(core, offscreen.area, &mut offscreen, &ui);
        blit(&offscreen, core.scroll.offset(), content, buf);
    }

    ProgressBar::new(core.scroll.progress()).render(layout.progress, buf, &theme);
    render_header(core, layout.header, buf, &ui);
    render_footer(core, layout.footer, buf, &ui);

    if let Some(menu) = &core.menu {
        popup_menu::render(menu, area, buf, &theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::AppPaths;
    use crate::location::Location;
    use crate::preferences::PreferenceStore;
    use crate::storage::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::mpsc::unbounded_channel;

    fn app(dir: &std::path::Path) -> AppCore {
        let (tx, _rx) = unbounded_channel();
        let prefs = PreferenceStore::resolve(
            Box::new(MemoryStore::new()),
            Location::parse("?lang=en"),
            None,
        );
        let paths = AppPaths {
            downloads: dir.join("downloads"),
            outbox: dir.join("outbox.jsonl"),
        };
        AppCore::new(Config::default(), prefs, paths, tx)
    }

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_layout_regions() {
        let layout = ShellLayout::new(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.progress.height, 1);
        assert_eq!(layout.header.y, 1);
        assert_eq!(layout.main.y, 1 + HEADER_HEIGHT);
        assert_eq!(layout.main.height, 30 - 1 - HEADER_HEIGHT - FOOTER_HEIGHT);
        assert_eq!(layout.footer.bottom(), 30);
        assert_eq!(layout.content().width, 98);

        // Too small for everything: nothing overflows
        let tiny = ShellLayout::new(Rect::new(0, 0, 20, 3));
        assert!(tiny.footer.bottom() <= 3);
    }

    #[test]
    fn test_home_screen_sets_columns_and_shows_chrome() {
        let dir = tempfile::tempdir().unwrap();
        let mut core = app(dir.path());
        let area = Rect::new(0, 0, 130, 40);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, &mut core);
        assert_eq!(core.home_columns, 3);
        let text = screen_text(&buf);
        assert!(text.contains("SmartTools"));
        assert!(text.contains("F2 About Us"));
        assert!(text.contains("?lang=en"));
    }

    #[test]
    fn test_reading_progress_follows_scroll() {
        let dir = tempfile::tempdir().unwrap();
        let mut core = app(dir.path());
        core.set_view(ViewState::ReadingProgress);
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, &mut core);
        assert_eq!(core.scroll.progress(), 0.0);
        assert!(core.scroll.max_offset() > 0);

        core.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::CONTROL));
        render(area, &mut buf, &mut core);
        assert_eq!(core.scroll.progress(), 100.0);
        // Bar fully drawn in the gradient, no track cells left
        let last = buf.cell((59, 0)).unwrap();
        assert_ne!(last.fg, core.theme().progress_track);
    }

    #[test]
    fn test_content_height_settles_on_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut core = app(dir.path());
        core.set_view(ViewState::ReadingProgress);
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, &mut core);
        let first = core.scroll.max_offset();
        render(area, &mut buf, &mut core);
        assert_eq!(core.scroll.max_offset(), first);

        // Switching language re-measures before the next frame
        core.set_language(crate::i18n::Language::Ar);
        render(area, &mut buf, &mut core);
        let arabic = core.scroll.max_offset();
        render(area, &mut buf, &mut core);
        assert_eq!(core.scroll.max_offset(), arabic);
    }

    #[test]
    fn test_focus_is_scrolled_into_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut core = app(dir.path());
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, &mut core);
        core.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::NONE));
        render(area, &mut buf, &mut core);
        assert_eq!(core.scroll.offset(), core.scroll.max_offset());
        assert!(screen_text(&buf).contains("Markdown"));
    }

    #[test]
    fn test_menu_overlay_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let mut core = app(dir.path());
        core.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, &mut core);
        assert!(screen_text(&buf).contains("Deutsch"));
    }
}
