//! Markdown to HTML converter with a plain-text preview.

use super::form::{put, Rows, TextField};
use super::{RenderContext, Tool, ToolContext};
use crate::core::input_result::InputResult;
use crate::core::messages::ToolMessage;
use crate::core::view::ViewState;
use crate::download::Download;
use crate::i18n::Tr;
use crate::tasks::TaskHandle;
use crossterm::event::{KeyCode, KeyEvent};
use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

pub const DEFAULT_INPUT: &str = "# Hello";

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

pub fn to_html(markdown: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(markdown, options()));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Text,
    Code,
    Quote,
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub kind: LineKind,
    pub text: String,
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Flatten the document into styled lines for the terminal preview
pub fn to_preview(markdown: &str) -> Vec<PreviewLine> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut kind = LineKind::Text;
    let mut quote_depth = 0usize;
    // Next number per open list; None for bullets
    let mut lists: Vec<Option<u64>> = Vec::new();

    let flush = |lines: &mut Vec<PreviewLine>, current: &mut String, kind: LineKind| {
        if !current.trim().is_empty() {
            lines.push(PreviewLine {
                kind,
                text: std::mem::take(current),
            });
        }
        current.clear();
    };

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut lines, &mut current, kind);
                kind = LineKind::Heading(heading_depth(level));
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut lines, &mut current, kind);
                kind = LineKind::Code;
            }
            Event::Start(Tag::BlockQuote(_)) => {
                flush(&mut lines, &mut current, kind);
                quote_depth += 1;
            }
            Event::Start(Tag::List(start)) => {
                flush(&mut lines, &mut current, kind);
                lists.push(start);
            }
            Event::Start(Tag::Item) => {
                flush(&mut lines, &mut current, kind);
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                current.push_str(&indent);
                current.push_str(&marker);
            }
            Event::End(TagEnd::Heading(_)) | Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Item) => {
                let line_kind = if quote_depth > 0 && kind == LineKind::Text {
                    LineKind::Quote
                } else {
                    kind
                };
                flush(&mut lines, &mut current, line_kind);
                kind = LineKind::Text;
            }
            Event::End(TagEnd::CodeBlock) => {
                kind = LineKind::Text;
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                quote_depth = quote_depth.saturating_sub(1);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Text(text) if kind == LineKind::Code => {
                for line in text.lines() {
                    lines.push(PreviewLine {
                        kind: LineKind::Code,
                        text: line.to_string(),
                    });
                }
            }
            Event::Text(text) | Event::Code(text) => current.push_str(&text),
            Event::TaskListMarker(done) => current.push_str(if done { "[x] " } else { "[ ] " }),
            Event::SoftBreak => current.push(' '),
            Event::HardBreak => {
                let line_kind = if quote_depth > 0 { LineKind::Quote } else { kind };
                flush(&mut lines, &mut current, line_kind);
            }
            Event::Rule => {
                flush(&mut lines, &mut current, kind);
                lines.push(PreviewLine {
                    kind: LineKind::Rule,
                    text: String::new(),
                });
            }
            _ => {}
        }
    }
    flush(&mut lines, &mut current, kind);
    lines
}

const INPUT_HEIGHT: u16 = 10;

enum Rendered {
    Loading,
    Ready {
        html: String,
        preview: Vec<PreviewLine>,
    },
}

pub struct MarkdownTool {
    input: TextField,
    rendered: Rendered,
    generation: u64,
    job: Option<TaskHandle>,
}

impl MarkdownTool {
    pub fn new() -> Self {
        Self {
            input: TextField::multiline("label_markdown", DEFAULT_INPUT),
            rendered: Rendered::Loading,
            generation: 0,
            job: None,
        }
    }

    fn request_render(&mut self, ctx: &ToolContext) {
        self.generation += 1;
        let generation = self.generation;
        let source = self.input.text();
        self.job = ctx.spawn_blocking("markdown-render", move || ToolMessage::MarkdownRendered {
            generation,
            html: to_html(&source),
            preview: to_preview(&source),
        });
    }

    fn preview_height(&self) -> u16 {
        match &self.rendered {
            Rendered::Loading => 1,
            Rendered::Ready { preview, .. } => u16::try_from(preview.len().max(1)).unwrap_or(u16::MAX),
        }
    }
}

impl Tool for MarkdownTool {
    fn view(&self) -> ViewState {
        ViewState::Markdown
    }

    fn mount(&mut self, ctx: &ToolContext) {
        self.request_render(ctx);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &ToolContext) -> InputResult {
        if key.code == KeyCode::Esc {
            return InputResult::close();
        }
        let changed = self.input.input(key);
        if changed {
            self.request_render(ctx);
        }
        InputResult::handled(changed)
    }

    fn handle_paste(&mut self, text: &str, ctx: &ToolContext) {
        if self.input.paste(text) {
            self.request_render(ctx);
        }
    }

    fn handle_message(&mut self, message: ToolMessage, _ctx: &ToolContext) {
        if let ToolMessage::MarkdownRendered {
            generation,
            html,
            preview,
        } = message
        {
            // Keep showing the previous preview until the latest one lands
            if generation == self.generation {
                self.rendered = Rendered::Ready { html, preview };
                self.job = None;
            }
        }
    }

    fn height(&self, _width: u16) -> u16 {
        (INPUT_HEIGHT + 1 + 2).saturating_add(self.preview_height())
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, ui: &RenderContext<'_>) {
        let mut rows = Rows::new(area);
        self.input.render(rows.take(INPUT_HEIGHT), buf, true, ui);
        rows.skip(1);

        let panel = rows.take(self.preview_height().saturating_add(2));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ui.theme.border))
            .title(ui.tr.t("label_preview").to_string());
        let inner = block.inner(panel);
        block.render(panel, buf);

        let preview = match &self.rendered {
            Rendered::Loading => {
                put(buf, inner.x, inner.y, ui.tr.t("loading"), inner.width, Style::default().fg(ui.theme.text_disabled));
                return;
            }
            Rendered::Ready { preview, .. } => preview,
        };
        for (i, line) in preview.iter().enumerate().take(inner.height as usize) {
            let y = inner.y + i as u16;
            let (text, style) = match line.kind {
                LineKind::Heading(1) => (
                    line.text.clone(),
                    Style::default()
                        .fg(ui.theme.text_primary)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ),
                LineKind::Heading(_) => (
                    line.text.clone(),
                    Style::default()
                        .fg(ui.theme.text_primary)
                        .add_modifier(Modifier::BOLD),
                ),
                LineKind::Text => (line.text.clone(), Style::default().fg(ui.theme.text_primary)),
                LineKind::Code => (
                    format!("  {}", line.text),
                    Style::default().fg(ui.theme.secondary),
                ),
                LineKind::Quote => (
                    format!("│ {}", line.text),
                    Style::default()
                        .fg(ui.theme.text_secondary)
                        .add_modifier(Modifier::ITALIC),
                ),
                LineKind::Rule => (
                    "─".repeat(inner.width as usize),
                    Style::default().fg(ui.theme.border),
                ),
            };
            put(buf, inner.x, y, &text, inner.width, style);
        }
    }

    fn can_download(&self) -> bool {
        matches!(self.rendered, Rendered::Ready { .. })
    }

    fn download(&self, _tr: Tr) -> Option<Download> {
        match &self.rendered {
            Rendered::Ready { html, .. } => Some(Download::text("doc.html", html.clone())),
            Rendered::Loading => None,
        }
    }

    fn clipboard_text(&self) -> Option<String> {
        match &self.rendered {
            Rendered::Ready { html, .. } => Some(html.clone()),
            Rendered::Loading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::*;

    #[test]
    fn test_to_html() {
        assert_eq!(to_html(DEFAULT_INPUT), "<h1>Hello</h1>\n");
        assert!(to_html("*a* and **b**").contains("<em>a</em> and <strong>b</strong>"));
    }

    #[test]
    fn test_preview_lines() {
        let preview = to_preview("# Title\n\nSome *text*\n\n- one\n- two\n\n1. first\n\n> quoted\n\n---\n\n```\nlet x = 1;\n```");
        let texts: Vec<_> = preview.iter().map(|l| (l.kind, l.text.as_str())).collect();
        assert_eq!(
            texts,
            vec![
                (LineKind::Heading(1), "Title"),
                (LineKind::Text, "Some text"),
                (LineKind::Text, "• one"),
                (LineKind::Text, "• two"),
                (LineKind::Text, "1. first"),
                (LineKind::Quote, "quoted"),
                (LineKind::Rule, ""),
                (LineKind::Code, "let x = 1;"),
            ]
        );
    }

    #[test]
    fn test_stale_render_ignored() {
        let (ctx, _rx) = context(ViewState::Markdown);
        let mut tool = MarkdownTool::new();
        tool.generation = 2;
        tool.handle_message(
            ToolMessage::MarkdownRendered {
                generation: 1,
                html: "<p>old</p>".into(),
                preview: Vec::new(),
            },
            &ctx,
        );
        assert!(tool.download(tr()).is_none());
    }

    #[test]
    fn test_huge_preview_height_saturates() {
        let (ctx, _rx) = context(ViewState::Markdown);
        let mut tool = MarkdownTool::new();
        let preview = vec![
            PreviewLine {
                kind: LineKind::Text,
                text: "para".into(),
            };
            70_000
        ];
        tool.handle_message(
            ToolMessage::MarkdownRendered {
                generation: tool.generation,
                html: String::new(),
                preview,
            },
            &ctx,
        );
        assert_eq!(tool.preview_height(), u16::MAX);
        assert_eq!(tool.height(40), u16::MAX);
    }

    #[tokio::test]
    async fn test_mount_renders_default_document() {
        let (ctx, mut rx) = context(ViewState::Markdown);
        let mut tool = MarkdownTool::new();
        tool.mount(&ctx);
        let event = rx.recv().await.unwrap();
        tool.handle_message(event.message, &ctx);
        let download = tool.download(tr()).unwrap();
        assert_eq!(download.filename, "doc.html");
        assert_eq!(download.contents, b"<h1>Hello</h1>\n");
        assert!(render_text(&mut tool, 40).contains("Hello"));
    }
}
