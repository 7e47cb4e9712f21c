//! System information: OS, terminal, screen size, locale, time zone and the
//! public IP address (fetched once when the tool opens).

use super::form::{render_value, Rows};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::messages::ToolMessage;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crate::tasks::TaskHandle;
use anyhow::{Context, Result};
use chrono::{Local, Offset};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::{Modifier, Style}};
use serde::Deserialize;
use std::time::Duration;

const LOADING: &str = "Loading...";
const IP_ERROR: &str = "Error fetching IP";
const UNKNOWN: &str = "---";

/// Friendly OS name for a `std::env::consts::OS` value
pub fn os_name(os: &str) -> &'static str {
    match os {
        "windows" => "Windows",
        "macos" => "MacOS",
        "linux" => "Linux",
        "android" => "Android",
        "ios" => "iOS",
        "freebsd" | "openbsd" | "netbsd" | "dragonfly" => "BSD",
        _ => "Unknown OS",
    }
}

/// `GMT+HH:MM` for an offset east of UTC in seconds
pub fn format_gmt_offset(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let minutes = offset_seconds.unsigned_abs() / 60;
    format!("GMT{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

/// IANA zone name from `TZ`, `/etc/timezone` or the `/etc/localtime` link
fn local_zone_name() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        let tz = tz.trim_start_matches(':').trim();
        if !tz.is_empty() {
            return tz.to_string();
        }
    }
    if let Ok(contents) = std::fs::read_to_string("/etc/timezone") {
        let name = contents.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    if let Ok(target) = std::fs::read_link("/etc/localtime") {
        let path = target.to_string_lossy();
        if let Some((_, name)) = path.split_once("zoneinfo/") {
            return name.to_string();
        }
    }
    "UTC".to_string()
}

fn terminal_program() -> String {
    std::env::var("TERM_PROGRAM")
        .or_else(|_| std::env::var("TERM"))
        .unwrap_or_else(|_| "Unknown Terminal".to_string())
}

fn locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .map(|value| value.split('.').next().unwrap_or_default().replace('_', "-"))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn screen_size() -> String {
    match crossterm::terminal::size() {
        Ok((cols, rows)) => format!("{} x {}", cols, rows),
        Err(_) => UNKNOWN.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub os: String,
    pub terminal: String,
    pub screen: String,
    pub locale: String,
    pub timezone: String,
}

impl SystemInfo {
    pub fn detect() -> Self {
        let offset = Local::now().offset().fix().local_minus_utc();
        Self {
            os: os_name(std::env::consts::OS).to_string(),
            terminal: terminal_program(),
            screen: screen_size(),
            locale: locale(),
            timezone: format!("{} ({})", format_gmt_offset(offset), local_zone_name()),
        }
    }

    pub fn report(&self, ip: &str) -> String {
        format!(
            "OS: {}\nTerminal: {}\nScreen: {}\nLanguage: {}\nTimeZone: {}\nIP: {}",
            self.os, self.terminal, self.screen, self.locale, self.timezone, ip
        )
    }
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// GET `url` and read `{"ip": "..."}`
pub async fn fetch_public_ip(url: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?
        .error_for_status()?;
    let body: IpResponse = response.json().await.context("Malformed IP response")?;
    Ok(body.ip)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum IpState {
    Loading,
    Ready(String),
    Failed,
}

pub struct SystemInfoTool {
    info: SystemInfo,
    ip: IpState,
    lookup: Option<TaskHandle>,
}

impl SystemInfoTool {
    pub fn new() -> Self {
        Self {
            info: SystemInfo::detect(),
            ip: IpState::Loading,
            lookup: None,
        }
    }

    fn ip_text(&self) -> &str {
        match &self.ip {
            IpState::Loading => LOADING,
            IpState::Ready(ip) => ip,
            IpState::Failed => IP_ERROR,
        }
    }
}

impl Tool for SystemInfoTool {
    fn view(&self) -> ViewState {
        ViewState::SystemInfo
    }

    fn mount(&mut self, ctx: &ToolContext) {
        let url = ctx.network.ip_lookup_url.clone();
        let timeout = Duration::from_secs(ctx.network.request_timeout_secs);
        self.lookup = ctx.spawn("ip-lookup", async move {
            let result = fetch_public_ip(&url, timeout).await.map_err(|e| {
                tracing::warn!("IP lookup failed: {:#}", e);
                e.to_string()
            });
            ToolMessage::IpResolved(result)
        });
        if self.lookup.is_none() {
            self.ip = IpState::Failed;
        }
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &ToolContext) -> InputResult {
        match key.code {
            KeyCode::Esc => InputResult::close(),
            _ => InputResult::Ignored,
        }
    }

    fn handle_message(&mut self, message: ToolMessage, _ctx: &ToolContext) {
        if let ToolMessage::IpResolved(result) = message {
            self.ip = match result {
                Ok(ip) => IpState::Ready(ip),
                Err(_) => IpState::Failed,
            };
            self.lookup = None;
        }
    }

    fn height(&self, _width: u16) -> u16 {
        6
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        let value = Style::default()
            .fg(ui.theme.text_primary)
            .add_modifier(Modifier::BOLD);
        let entries = [
            ("label_os", self.info.os.as_str()),
            ("label_terminal", self.info.terminal.as_str()),
            ("label_screen", self.info.screen.as_str()),
            ("label_locale", self.info.locale.as_str()),
            ("label_timezone", self.info.timezone.as_str()),
        ];
        for (label, text) in entries {
            render_value(rows.take(1), buf, ui.tr.t(label), text, value, ui);
        }
        let ip_text = match &self.ip {
            IpState::Loading => ui.tr.t("loading").to_string(),
            IpState::Ready(ip) => ip.clone(),
            IpState::Failed => ui.tr.t("ip_error").to_string(),
        };
        let ip_color = match self.ip {
            IpState::Failed => ui.theme.status_error,
            _ => ui.theme.primary,
        };
        render_value(
            rows.take(1),
            buf,
            ui.tr.t("label_ip"),
            &ip_text,
            value.fg(ip_color),
            ui,
        );
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        Some(Download::text("system-info.txt", self.info.report(self.ip_text())))
    }

    fn clipboard_text(&self) -> Option<String> {
        Some(self.info.report(self.ip_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_gmt_offset() {
        assert_eq!(format_gmt_offset(0), "GMT+00:00");
        assert_eq!(format_gmt_offset(19800), "GMT+05:30");
        assert_eq!(format_gmt_offset(-18000), "GMT-05:00");
    }

    #[test]
    fn test_os_name() {
        assert_eq!(os_name("linux"), "Linux");
        assert_eq!(os_name("macos"), "MacOS");
        assert_eq!(os_name("plan9"), "Unknown OS");
    }

    #[test]
    fn test_ip_states_in_report() {
        let (ctx, _rx) = context(ViewState::SystemInfo);
        let mut tool = SystemInfoTool::new();
        let report = String::from_utf8(tool.download(tr()).unwrap().contents).unwrap();
        assert!(report.ends_with("IP: Loading..."));

        tool.handle_message(ToolMessage::IpResolved(Err("offline".into())), &ctx);
        assert_eq!(tool.ip_text(), IP_ERROR);

        tool.handle_message(ToolMessage::IpResolved(Ok("203.0.113.7".into())), &ctx);
        assert!(tool.clipboard_text().unwrap().ends_with("IP: 203.0.113.7"));
    }

    /// One-shot HTTP server answering every request with `body`
    async fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_fetch_public_ip() {
        let url = serve_once(r#"{"ip":"198.51.100.4"}"#).await;
        let ip = fetch_public_ip(&url, Duration::from_secs(5)).await.unwrap();
        assert_eq!(ip, "198.51.100.4");
    }

    #[tokio::test]
    async fn test_fetch_public_ip_malformed() {
        let url = serve_once("not json").await;
        assert!(fetch_public_ip(&url, Duration::from_secs(5)).await.is_err());
    }
}
