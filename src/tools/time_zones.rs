//! World clock over a user-chosen list of time zones.

use super::form::{label_style, put, render_button, Choice, Focus, Rows};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::messages::ToolMessage;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crate::tasks::TaskHandle;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};
use std::time::Duration;

/// Zones offered in the "add" select, with display names
pub const CATALOG: [(&str, &str); 24] = [
    ("UTC", "UTC"),
    ("America/New_York", "New York"),
    ("America/Chicago", "Chicago"),
    ("America/Denver", "Denver"),
    ("America/Los_Angeles", "Los Angeles"),
    ("America/Toronto", "Toronto"),
    ("America/Mexico_City", "Mexico City"),
    ("America/Sao_Paulo", "São Paulo"),
    ("Europe/London", "London"),
    ("Europe/Paris", "Paris"),
    ("Europe/Berlin", "Berlin"),
    ("Europe/Madrid", "Madrid"),
    ("Europe/Athens", "Athens"),
    ("Europe/Amsterdam", "Amsterdam"),
    ("Europe/Moscow", "Moscow"),
    ("Africa/Cairo", "Cairo"),
    ("Asia/Dubai", "Dubai"),
    ("Asia/Riyadh", "Riyadh"),
    ("Asia/Kolkata", "Mumbai"),
    ("Asia/Shanghai", "Beijing"),
    ("Asia/Singapore", "Singapore"),
    ("Asia/Tokyo", "Tokyo"),
    ("Australia/Sydney", "Sydney"),
    ("Pacific/Auckland", "Auckland"),
];

pub const DEFAULT_ZONES: [&str; 4] = ["UTC", "America/New_York", "Europe/London", "Asia/Tokyo"];

/// Catalog name, else the last path segment with underscores as spaces
pub fn city_name(zone: &str) -> String {
    if let Some((_, city)) = CATALOG.iter().find(|(z, _)| *z == zone) {
        return city.to_string();
    }
    zone.rsplit('/').next().unwrap_or(zone).replace('_', " ")
}

/// `h:mm:ss AM` in `zone`; `None` for unknown zones
pub fn format_time(now: &DateTime<Utc>, zone: &str) -> Option<String> {
    let tz: Tz = zone.parse().ok()?;
    Some(now.with_timezone(&tz).format("%-I:%M:%S %p").to_string())
}

/// `M/D/YYYY` in `zone`
pub fn format_date(now: &DateTime<Utc>, zone: &str) -> Option<String> {
    let tz: Tz = zone.parse().ok()?;
    Some(now.with_timezone(&tz).format("%-m/%-d/%Y").to_string())
}

/// Append `zone` unless already listed. Returns true if added.
pub fn add_zone(zones: &mut Vec<String>, zone: &str) -> bool {
    if zones.iter().any(|z| z == zone) {
        return false;
    }
    zones.push(zone.to_string());
    true
}

const PICKER: usize = 0;
const ADD: usize = 1;
/// Zone rows start after the picker, the button and a gap
const LIST_TOP: u16 = 3;

pub struct TimeZonesTool {
    picker: Choice<&'static str>,
    zones: Vec<String>,
    now: DateTime<Utc>,
    focus: Focus,
    ticker: Option<TaskHandle>,
}

impl TimeZonesTool {
    pub fn new() -> Self {
        let options = CATALOG
            .iter()
            .map(|(zone, city)| (*zone, city.to_string()))
            .collect();
        let zones: Vec<String> = DEFAULT_ZONES.iter().map(|z| z.to_string()).collect();
        Self {
            picker: Choice::new("label_add_zone", options, CATALOG[0].0),
            focus: Focus::new(2 + zones.len()),
            zones,
            now: Utc::now(),
            ticker: None,
        }
    }

    fn report(&self) -> String {
        self.zones
            .iter()
            .map(|zone| {
                let time = format_time(&self.now, zone).unwrap_or_else(|| "---".to_string());
                format!("{}: {}", zone, time)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn remove_focused(&mut self) -> bool {
        let Some(index) = self.focus.index().checked_sub(2) else {
            return false;
        };
        if index >= self.zones.len() {
            return false;
        }
        let removed = self.zones.remove(index);
        tracing::debug!("Removed time zone {}", removed);
        self.focus.set_count(2 + self.zones.len());
        true
    }
}

impl Tool for TimeZonesTool {
    fn view(&self) -> ViewState {
        ViewState::TimeZones
    }

    fn mount(&mut self, ctx: &ToolContext) {
        self.ticker = ctx.ticker("world-clock", Duration::from_secs(1));
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        if self.focus.handle_key(&key) {
            return InputResult::Continue;
        }
        let handled = match (self.focus.index(), key.code) {
            (PICKER, _) => self.picker.handle_key(&key),
            (ADD, KeyCode::Enter) => {
                if add_zone(&mut self.zones, self.picker.selected()) {
                    self.focus.set_count(2 + self.zones.len());
                }
                true
            }
            (ADD, _) => false,
            (_, KeyCode::Delete | KeyCode::Backspace | KeyCode::Enter) => self.remove_focused(),
            _ => false,
        };
        InputResult::handled(handled)
    }

    fn handle_message(&mut self, message: ToolMessage, _ctx: &ToolContext) {
        if let ToolMessage::Tick = message {
            self.now = Utc::now();
        }
    }

    fn height(&self, _width: u16) -> u16 {
        LIST_TOP + self.zones.len() as u16
    }

    fn focus_row(&self) -> u16 {
        match self.focus.index() {
            PICKER => 0,
            ADD => 1,
            index => LIST_TOP + (index - 2) as u16,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        self.picker.render(rows.take(1), buf, self.focus.is(PICKER), ui);
        render_button(rows.take(1), buf, ui.tr.t("add_zone"), self.focus.is(ADD), ui);
        rows.skip(1);

        for (i, zone) in self.zones.iter().enumerate() {
            let row = rows.take(1);
            if row.height == 0 {
                break;
            }
            let focused = self.focus.is(i + 2);
            let marker = if focused { "✕ " } else { "  " };
            put(
                buf,
                row.x,
                row.y,
                &format!("{}{}", marker, city_name(zone)),
                20.min(row.width),
                label_style(focused, ui),
            );
            let time = format_time(&self.now, zone).unwrap_or_else(|| "---".to_string());
            let date = format_date(&self.now, zone).unwrap_or_default();
            let x = row.x + 20.min(row.width);
            let width = row.right().saturating_sub(x);
            put(
                buf,
                x,
                row.y,
                &format!("{:>11}", time),
                width,
                Style::default()
                    .fg(ui.theme.primary)
                    .add_modifier(Modifier::BOLD),
            );
            let x = x + 13;
            if x < row.right() {
                put(
                    buf,
                    x,
                    row.y,
                    &format!("{:<10}  {}", date, zone),
                    row.right() - x,
                    Style::default().fg(ui.theme.text_secondary),
                );
            }
        }
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text("time.txt", self.report()))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;
    use chrono::TimeZone;

    #[test]
    fn test_city_name() {
        assert_eq!(city_name("Asia/Tokyo"), "Tokyo");
        assert_eq!(city_name("America/Argentina/Buenos_Aires"), "Buenos Aires");
        assert_eq!(city_name("UTC"), "UTC");
    }

    #[test]
    fn test_formatting() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 17, 5, 9).unwrap();
        assert_eq!(format_time(&now, "UTC").unwrap(), "5:05:09 PM");
        assert_eq!(format_time(&now, "Asia/Tokyo").unwrap(), "2:05:09 AM");
        assert_eq!(format_date(&now, "Asia/Tokyo").unwrap(), "1/16/2024");
        assert!(format_time(&now, "Mars/Olympus").is_none());
    }

    #[test]
    fn test_catalog_zones_parse() {
        for (zone, _) in CATALOG {
            assert!(zone.parse::<Tz>().is_ok(), "{}", zone);
        }
    }

    #[test]
    fn test_add_without_duplicates_and_remove() {
        let (ctx, _rx) = context(ViewState::TimeZones);
        let mut tool = TimeZonesTool::new();
        assert_eq!(tool.zones.len(), 4);

        // UTC is already listed
        tool.handle_key(key(KeyCode::Tab), &ctx);
        tool.handle_key(key(KeyCode::Enter), &ctx);
        assert_eq!(tool.zones.len(), 4);

        tool.focus.set(PICKER);
        tool.handle_key(key(KeyCode::Right), &ctx);
        tool.handle_key(key(KeyCode::Right), &ctx);
        tool.handle_key(key(KeyCode::Tab), &ctx);
        tool.handle_key(key(KeyCode::Enter), &ctx);
        assert_eq!(tool.zones.last().map(String::as_str), Some("America/Chicago"));

        tool.handle_key(key(KeyCode::Tab), &ctx);
        tool.handle_key(key(KeyCode::Delete), &ctx);
        assert_eq!(tool.zones[0], "America/New_York");
        assert_eq!(tool.zones.len(), 4);
    }

    #[test]
    fn test_download_lists_zones() {
        let tool = TimeZonesTool::new();
        let text = String::from_utf8(tool.download(tr()).unwrap().contents).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("UTC: "));
    }
}
