//! Popup menu rendering: navigation and language menus drawn centered over
//! the screen.

use crate::core::menu::PopupMenu;
use crate::theme::AppTheme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

/// Rectangle the menu occupies inside `area`
pub fn menu_rect(menu: &PopupMenu, area: Rect) -> Rect {
    let max_width = menu
        .items()
        .iter()
        .map(|item| item.text.chars().count())
        .chain(std::iter::once(menu.title().chars().count()))
        .max()
        .unwrap_or(20)
        .min(60);

    let width = ((max_width + 4) as u16).min(area.width); // borders and padding
    let height = ((menu.items().len() + 2) as u16).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render(menu: &PopupMenu, area: Rect, buf: &mut Buffer, theme: &AppTheme) {
    let rect = menu_rect(menu, area);
    if rect.width < 3 || rect.height < 3 {
        return;
    }

    Clear.render(rect, buf);

    let lines: Vec<Line> = menu
        .items()
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let style = if idx == menu.selected_index() {
                Style::default()
                    .fg(theme.surface)
                    .bg(theme.form_label_focused)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_primary).bg(theme.surface)
            };
            Line::from(vec![
                Span::raw(" "),
                Span::styled(item.text.clone(), style),
                Span::raw(" "),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .title(format!(" {} ", menu.title()))
        .style(Style::default().bg(theme.surface));

    Paragraph::new(lines).block(block).render(rect, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, Tr};
    use crate::theme::ThemeMode;

    #[test]
    fn test_menu_is_centered_and_clipped() {
        let menu = PopupMenu::languages(Tr::new(Language::En));
        let area = Rect::new(0, 0, 80, 24);
        let rect = menu_rect(&menu, area);
        assert_eq!(rect.height, Language::ALL.len() as u16 + 2);
        assert_eq!(rect.x, (80 - rect.width) / 2);

        let tiny = menu_rect(&menu, Rect::new(0, 0, 10, 5));
        assert!(tiny.width <= 10 && tiny.height <= 5);
    }

    #[test]
    fn test_render_highlights_selection() {
        let theme = AppTheme::for_mode(ThemeMode::Dark);
        let menu = PopupMenu::languages(Tr::new(Language::En));
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        render(&menu, area, &mut buf, &theme);
        let rect = menu_rect(&menu, area);
        // First item row, just after the leading space
        let cell = buf.cell((rect.x + 2, rect.y + 1)).unwrap();
        assert_eq!(cell.symbol(), "E");
        assert_eq!(cell.bg, theme.form_label_focused);
    }
}
