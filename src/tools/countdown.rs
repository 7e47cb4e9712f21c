//! Countdown to a local date and time, refreshed every second.

use super::form::{put, render_value, Rows, TextField, LABEL_WIDTH};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::messages::ToolMessage;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crate::tasks::TaskHandle;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};
use std::time::Duration;

const FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a local target time; a bare date means midnight
pub fn parse_target(input: &str) -> Option<DateTime<Local>> {
    let input = input.trim();
    let naive = FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Local.from_local_datetime(&naive).earliest()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Time left until `target`; zeros once it has passed
pub fn remaining<Tz: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz>) -> Remaining {
    let total = target.clone().signed_duration_since(now.clone()).num_seconds();
    if total <= 0 {
        return Remaining::default();
    }
    Remaining {
        days: total / 86_400,
        hours: (total % 86_400) / 3_600,
        minutes: (total % 3_600) / 60,
        seconds: total % 60,
    }
}

pub struct CountdownTool {
    target: TextField,
    left: Remaining,
    ticker: Option<TaskHandle>,
}

impl CountdownTool {
    pub fn new() -> Self {
        Self {
            target: TextField::single("label_target", "").with_placeholder("YYYY-MM-DD HH:MM"),
            left: Remaining::default(),
            ticker: None,
        }
    }

    fn refresh(&mut self) {
        self.left = match parse_target(&self.target.text()) {
            Some(target) => remaining(&target, &Local::now()),
            None => Remaining::default(),
        };
    }

    fn target_is_invalid(&self) -> bool {
        !self.target.is_empty() && parse_target(&self.target.text()).is_none()
    }
}

impl Tool for CountdownTool {
    fn view(&self) -> ViewState {
        ViewState::Countdown
    }

    fn mount(&mut self, ctx: &ToolContext) {
        self.ticker = ctx.ticker("countdown", Duration::from_secs(1));
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        let changed = self.target.input(key);
        if changed {
            self.refresh();
        }
        InputResult::handled(changed)
    }

    fn handle_paste(&mut self, text: &str, _ctx: &ToolContext) {
        if self.target.paste(text) {
            self.refresh();
        }
    }

    fn handle_message(&mut self, message: ToolMessage, _ctx: &ToolContext) {
        if let ToolMessage::Tick = message {
            self.refresh();
        }
    }

    fn height(&self, _width: u16) -> u16 {
        7
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        let row = rows.take(1);
        self.target.render(row, buf, true, ui);
        if self.target_is_invalid() && row.width > LABEL_WIDTH + 20 {
            let x = row.right().saturating_sub(ui.tr.t("invalid").chars().count() as u16);
            put(
                buf,
                x,
                row.y,
                ui.tr.t("invalid"),
                row.right() - x,
                Style::default().fg(ui.theme.status_error),
            );
        }
        rows.skip(1);

        let style = Style::default()
            .fg(ui.theme.primary)
            .add_modifier(Modifier::BOLD);
        let parts = [
            ("label_days", self.left.days),
            ("label_hours", self.left.hours),
            ("label_minutes", self.left.minutes),
            ("label_seconds", self.left.seconds),
        ];
        for (label, value) in parts {
            render_value(rows.take(1), buf, ui.tr.t(label), &value.to_string(), style, ui);
        }
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text("timer.txt", self.target.text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;
    use chrono::Utc;

    #[test]
    fn test_remaining_split() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let target = Utc.with_ymd_and_hms(2025, 1, 3, 4, 5, 6).unwrap();
        assert_eq!(
            remaining(&target, &now),
            Remaining {
                days: 2,
                hours: 4,
                minutes: 5,
                seconds: 6
            }
        );
        assert_eq!(remaining(&now, &target), Remaining::default());
    }

    #[test]
    fn test_parse_target_formats() {
        assert!(parse_target("2030-05-01 12:30").is_some());
        assert!(parse_target("2030-05-01T12:30").is_some());
        assert!(parse_target("2030-05-01").is_some());
        assert!(parse_target("tomorrow").is_none());
        assert!(parse_target("").is_none());
    }

    #[test]
    fn test_past_target_shows_zeros() {
        let (ctx, _rx) = context(ViewState::Countdown);
        let mut tool = CountdownTool::new();
        type_text(&mut tool, &ctx, "2000-01-01 00:00");
        assert_eq!(tool.left, Remaining::default());
        assert!(!tool.target_is_invalid());
        assert_eq!(tool.download(tr()).unwrap().contents, b"2000-01-01 00:00");
    }

    #[test]
    fn test_future_target_counts_down() {
        let (ctx, _rx) = context(ViewState::Countdown);
        let mut tool = CountdownTool::new();
        type_text(&mut tool, &ctx, "2999-01-01 00:00");
        tool.handle_message(ToolMessage::Tick, &ctx);
        assert!(tool.left.days > 300_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_runs_while_mounted() {
        let (ctx, mut rx) = context(ViewState::Countdown);
        let mut tool = CountdownTool::new();
        tool.mount(&ctx);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.view, ViewState::Countdown);
        assert!(matches!(event.message, ToolMessage::Tick));

        drop(tool);
        tokio::time::sleep(Duration::from_secs(3)).await;
        while let Ok(event) = rx.try_recv() {
            assert!(matches!(event.message, ToolMessage::Tick));
        }
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(rx.try_recv().is_err());
    }
}
