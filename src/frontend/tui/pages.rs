//! Static pages: About, Privacy and Contact.

use crate::core::contact::ContactForm;
use crate::core::view::ViewState;
use crate::tools::form::wrapped_lines;
use crate::tools::RenderContext;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

/// Title row plus a gap
const TITLE_HEIGHT: u16 = 2;

fn title_key(view: ViewState) -> &'static str {
    match view {
        ViewState::Privacy => "privacy_title",
        ViewState::Contact => "contact_title",
        _ => "about_title",
    }
}

/// Body paragraphs of the text pages
fn paragraphs(view: ViewState, ui: &RenderContext<'_>) -> Vec<String> {
    match view {
        ViewState::Privacy => {
            let today = chrono::Local::now().format("%-m/%-d/%Y").to_string();
            let mut body = vec![ui.tr.fmt("privacy_updated", &[("date", today.as_str())])];
            body.extend(ui.tr.steps("privacy_body"));
            body
        }
        _ => ui.tr.steps("about_body"),
    }
}

fn paragraphs_height(paragraphs: &[String], width: u16) -> u16 {
    let lines: u16 = paragraphs.iter().map(|p| wrapped_lines(p, width)).sum();
    lines + paragraphs.len().saturating_sub(1) as u16
}

pub fn height(view: ViewState, width: u16, contact: &ContactForm, ui: &RenderContext<'_>) -> u16 {
    match view {
        ViewState::Contact => TITLE_HEIGHT + contact.height(width, ui),
        _ => TITLE_HEIGHT + paragraphs_height(&paragraphs(view, ui), width),
    }
}

/// Row of the focused control, for pages that have one
pub fn focus_row(view: ViewState, width: u16, contact: &ContactForm, ui: &RenderContext<'_>) -> Option<u16> {
    (view == ViewState::Contact).then(|| TITLE_HEIGHT + contact.focus_row(width, ui))
}

pub fn render(
    view: ViewState,
    area: Rect,
    buf: &mut Buffer,
    contact: &mut ContactForm,
    ui: &RenderContext<'_>,
) {
    let alignment = if ui.tr.language().is_rtl() {
        Alignment::Right
    } else {
        Alignment::Left
    };
    Paragraph::new(Line::from(Span::styled(
        ui.tr.t(title_key(view)),
        Style::default()
            .fg(ui.theme.text_primary)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )))
    .alignment(alignment)
    .render(Rect::new(area.x, area.y, area.width, 1.min(area.height)), buf);

    let body = Rect::new(
        area.x,
        area.y + TITLE_HEIGHT.min(area.height),
        area.width,
        area.height.saturating_sub(TITLE_HEIGHT),
    );
    if view == ViewState::Contact {
        contact.render(body, buf, ui);
        return;
    }

    let style = Style::default().fg(ui.theme.text_secondary);
    let mut lines = Vec::new();
    for (i, paragraph) in paragraphs(view, ui).into_iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(paragraph, style)));
    }
    Paragraph::new(lines)
        .alignment(alignment)
        .wrap(Wrap { trim: true })
        .render(body, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, Tr};
    use crate::theme::{AppTheme, ThemeMode};

    fn page_text(view: ViewState, width: u16) -> String {
        let theme = AppTheme::for_mode(ThemeMode::Light);
        let ui = RenderContext {
            theme: &theme,
            tr: Tr::new(Language::En),
        };
        let mut contact = ContactForm::new();
        let area = Rect::new(0, 0, width, height(view, width, &contact, &ui));
        let mut buf = Buffer::empty(area);
        render(view, area, &mut buf, &mut contact, &ui);
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
    fn test_about_page() {
        let text = page_text(ViewState::About, 80);
        assert!(text.starts_with("About Us"));
        assert!(text.contains("Welcome to SmartTools."));
    }

    #[test]
    fn test_privacy_shows_date() {
        let text = page_text(ViewState::Privacy, 80);
        assert!(text.contains("Last Updated: "));
    }

    #[test]
    fn test_contact_page_has_form() {
        let text = page_text(ViewState::Contact, 80);
        assert!(text.contains("Contact Us"));
        assert!(text.contains("Send Message"));
    }
}
