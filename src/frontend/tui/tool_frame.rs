//! Frame shared by every tool: title and back hint, the "how to use" panel,
//! the tool body and the download hint.

use crate::core::view::ToolMeta;
use crate::tools::form::{put, wrapped_lines};
use crate::tools::{RenderContext, Tool};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

fn info_lines(meta: &ToolMeta, ui: &RenderContext<'_>) -> (String, Vec<String>) {
    let description = ui.tr.t(&format!("info_desc_{}", meta.info_key)).to_string();
    let steps = ui
        .tr
        .steps(&format!("info_steps_{}", meta.info_key))
        .into_iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect();
    (description, steps)
}

/// Bordered info panel height at `width`
fn info_height(meta: &ToolMeta, width: u16, ui: &RenderContext<'_>) -> u16 {
    let inner = width.saturating_sub(2);
    let (description, steps) = info_lines(meta, ui);
    let steps_height = steps
        .iter()
        .fold(0u16, |acc, s| acc.saturating_add(wrapped_lines(s, inner)));
    3u16.saturating_add(wrapped_lines(&description, inner))
        .saturating_add(steps_height)
}

/// Title row and gap, then the info panel and gap
fn body_top(meta: &ToolMeta, width: u16, ui: &RenderContext<'_>) -> u16 {
    info_height(meta, width, ui).saturating_add(3)
}

pub fn height(meta: &ToolMeta, tool: &dyn Tool, width: u16, ui: &RenderContext<'_>) -> u16 {
    body_top(meta, width, ui)
        .saturating_add(tool.height(width))
        .saturating_add(2)
}

/// Content row of the tool's focused control
pub fn focus_row(meta: &ToolMeta, tool: &dyn Tool, width: u16, ui: &RenderContext<'_>) -> u16 {
    body_top(meta, width, ui).saturating_add(tool.focus_row())
}

pub fn render(meta: &ToolMeta, tool: &mut dyn Tool, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
    let theme = ui.theme;
    let rtl = ui.tr.language().is_rtl();

    // Title on one side, back hint on the other
    let back = format!("{} {} (Esc)", if rtl { "→" } else { "←" }, ui.tr.t("back_to_tools"));
    let back_width = (back.chars().count() as u16).min(area.width);
    let title = format!("{} {}", meta.icon, ui.tr.t(meta.title_key));
    let title_style = Style::default()
        .fg(theme.primary)
        .add_modifier(Modifier::BOLD);
    let back_style = Style::default().fg(theme.text_secondary);
    let title_width = area.width.saturating_sub(back_width + 1);
    if rtl {
        put(buf, area.x, area.y, &back, back_width, back_style);
        let title_len = (title.chars().count() as u16).min(title_width);
        put(buf, area.right() - title_len, area.y, &title, title_len, title_style);
    } else {
        put(buf, area.x, area.y, &title, title_width, title_style);
        put(buf, area.right() - back_width, area.y, &back, back_width, back_style);
    }

    // Info panel
    let (description, steps) = info_lines(meta, ui);
    let panel = Rect::new(
        area.x,
        area.y + 2,
        area.width,
        info_height(meta, area.width, ui).min(area.height.saturating_sub(2)),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.surface));
    let inner = block.inner(panel);
    block.render(panel, buf);

    let mut lines = vec![
        Line::from(Span::styled(description, Style::default().fg(theme.text_primary))),
        Line::from(Span::styled(
            ui.tr.t("how_to_use"),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    lines.extend(
        steps
            .into_iter()
            .map(|step| Line::from(Span::styled(step, Style::default().fg(theme.text_secondary)))),
    );
    Paragraph::new(lines)
        .alignment(if rtl { Alignment::Right } else { Alignment::Left })
        .wrap(Wrap { trim: true })
        .render(inner, buf);

    // Body
    let top = area.y.saturating_add(body_top(meta, area.width, ui));
    let body_height = tool.height(area.width);
    if top >= area.bottom() {
        return;
    }
    let body = Rect {
        x: area.x,
        y: top,
        width: area.width,
        height: body_height.min(area.bottom() - top),
    };
    tool.render(body, buf, ui);

    let hint_y = top.saturating_add(body_height).saturating_add(1);
    if tool.can_download() && hint_y < area.bottom() {
        let hint = format!(
            "⤓ Ctrl+S {}  ·  Ctrl+Y {}",
            ui.tr.t("download_result"),
            ui.tr.t("copy_result")
        );
        put(
            buf,
            area.x,
            hint_y,
            &hint,
            area.width,
            Style::default()
                .fg(theme.status_success)
                .add_modifier(Modifier::BOLD),
        );
    }
}
