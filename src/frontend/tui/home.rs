//! Home view: hero text and the grid of tool cards.

use crate::core::view::TOOLS;
use crate::tools::form::wrapped_lines;
use crate::tools::RenderContext;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

/// Rows per card including its border
pub const CARD_HEIGHT: u16 = 4;

/// Cards per row for a terminal `width`
pub fn columns_for(width: u16) -> usize {
    if width >= 120 {
        3
    } else if width >= 80 {
        2
    } else {
        1
    }
}

fn intro_height(width: u16, ui: &RenderContext<'_>) -> u16 {
    1 + wrapped_lines(ui.tr.t("home_subtitle"), width) + 1
}

pub fn height(width: u16, columns: usize, ui: &RenderContext<'_>) -> u16 {
    let rows = TOOLS.len().div_ceil(columns.max(1)) as u16;
    intro_height(width, ui) + rows * CARD_HEIGHT
}

/// Top row of the card at `index`
pub fn card_top(index: usize, width: u16, columns: usize, ui: &RenderContext<'_>) -> u16 {
    intro_height(width, ui) + (index / columns.max(1)) as u16 * CARD_HEIGHT
}

pub fn render(area: Rect, buf: &mut Buffer, selected: usize, columns: usize, ui: &RenderContext<'_>) {
    let columns = columns.max(1);
    let theme = ui.theme;
    let alignment = if ui.tr.language().is_rtl() {
        Alignment::Right
    } else {
        Alignment::Center
    };

    let intro = intro_height(area.width, ui);
    Paragraph::new(vec![
        Line::from(Span::styled(
            ui.tr.t("home_title"),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            ui.tr.t("home_subtitle"),
            Style::default().fg(theme.text_secondary),
        )),
    ])
    .alignment(alignment)
    .wrap(Wrap { trim: true })
    .render(Rect::new(area.x, area.y, area.width, intro.min(area.height)), buf);

    let card_width = area.width / columns as u16;
    for (index, meta) in TOOLS.iter().enumerate() {
        let col = (index % columns) as u16;
        let y = area.y + card_top(index, area.width, columns, ui);
        if y + CARD_HEIGHT > area.bottom() {
            break;
        }
        let card = Rect::new(area.x + col * card_width, y, card_width, CARD_HEIGHT);
        let focused = index == selected;

        let (border, background) = if focused {
            (theme.border_focused, theme.surface_selected)
        } else {
            (theme.border, theme.surface)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(background));
        let inner = block.inner(card);
        block.render(card, buf);

        let card_alignment = if ui.tr.language().is_rtl() {
            Alignment::Right
        } else {
            Alignment::Left
        };
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled(format!("{} ", meta.icon), Style::default().fg(theme.primary)),
                Span::styled(
                    ui.tr.t(meta.title_key),
                    Style::default()
                        .fg(theme.text_primary)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                ui.tr.t(meta.description_key),
                Style::default().fg(theme.text_secondary),
            )),
        ])
        .alignment(card_alignment)
        .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, Tr};
    use crate::theme::{AppTheme, ThemeMode};

    #[test]
    fn test_columns_follow_width() {
        assert_eq!(columns_for(60), 1);
        assert_eq!(columns_for(80), 2);
        assert_eq!(columns_for(119), 2);
        assert_eq!(columns_for(160), 3);
    }

    #[test]
    fn test_grid_height_and_card_rows() {
        let theme = AppTheme::for_mode(ThemeMode::Light);
        let ui = RenderContext {
            theme: &theme,
            tr: Tr::new(Language::En),
        };
        let intro = card_top(0, 120, 3, &ui);
        // 20 cards in 3 columns is 7 rows
        assert_eq!(height(120, 3, &ui), intro + 7 * CARD_HEIGHT);
        assert_eq!(card_top(3, 120, 3, &ui), intro + CARD_HEIGHT);
        assert_eq!(card_top(19, 60, 1, &ui), card_top(0, 60, 1, &ui) + 19 * CARD_HEIGHT);
    }

    #[test]
    fn test_renders_every_card_title() {
        let theme = AppTheme::for_mode(ThemeMode::Dark);
        let ui = RenderContext {
            theme: &theme,
            tr: Tr::new(Language::En),
        };
        let area = Rect::new(0, 0, 120, height(120, 3, &ui));
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, 0, 3, &ui);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .filter_map(|pos| buf.cell(pos).map(|c| c.symbol().to_string()))
            .collect();
        assert!(text.contains("Password Generator"));
        assert!(text.contains("Markdown"));
    }
}
