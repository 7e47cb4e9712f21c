use crate::clipboard;
use crate::config::Config;
use crate::core::contact::ContactForm;
use crate::core::input_result::InputResult;
use crate::core::menu::{MenuAction, MenuOutcome, PopupMenu};
use crate::core::messages::AsyncEvent;
use crate::core::scroll::ScrollState;
use crate::core::view::{Router, ViewState, NAV_ITEMS, TOOLS};
use crate::download;
use crate::i18n::{Language, Tr};
use crate::preferences::PreferenceStore;
use crate::theme::AppTheme;
use crate::tools::{create_tool, Tool, ToolContext};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

/// Where the app writes files
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub downloads: PathBuf,
    pub outbox: PathBuf,
}

/// Transient footer message
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    shown_at: Instant,
}

/// Core application state (frontend-agnostic)
///
/// AppCore owns the router, the mounted tool and the preference store, and
/// turns key events into state changes. The TUI frontend reads it to draw and
/// reports layout facts back (viewport size, home grid columns).
pub struct AppCore {
    pub config: Config,
    pub prefs: PreferenceStore,
    pub router: Router,

    /// Mounted tool; `None` on home and the static pages
    pub tool: Option<Box<dyn Tool>>,

    /// Scroll position of the main content area
    pub scroll: ScrollState,

    /// Selected card on the home grid
    pub home_selected: usize,
    /// Cards per row, set by the renderer for the current width
    pub home_columns: usize,

    pub contact: ContactForm,

    /// Open popup (navigation or language menu)
    pub menu: Option<PopupMenu>,

    pub status: Option<StatusMessage>,

    /// Application running flag
    pub running: bool,

    pub needs_render: bool,

    /// Set after focus moves so the renderer scrolls the focused row into view
    pub follow_focus: bool,

    theme: AppTheme,
    paths: AppPaths,
    events_tx: UnboundedSender<AsyncEvent>,
}

impl AppCore {
    pub fn new(
        config: Config,
        prefs: PreferenceStore,
        paths: AppPaths,
        events_tx: UnboundedSender<AsyncEvent>,
    ) -> Self {
        let theme = AppTheme::for_mode(prefs.theme());
        Self {
            config,
            prefs,
            router: Router::new(),
            tool: None,
            scroll: ScrollState::default(),
            home_selected: 0,
            home_columns: 1,
            contact: ContactForm::new(),
            menu: None,
            status: None,
            running: true,
            needs_render: true,
            follow_focus: false,
            theme,
            paths,
            events_tx,
        }
    }

    pub fn tr(&self) -> Tr {
        Tr::new(self.prefs.language())
    }

    pub fn theme(&self) -> &AppTheme {
        &self.theme
    }

    pub fn current_view(&self) -> ViewState {
        self.router.current()
    }

    fn tool_context(&self, view: ViewState) -> ToolContext {
        ToolContext::new(view, self.events_tx.clone(), self.config.network.clone())
    }

    /// Switch views. Leaving a tool drops it, which cancels its tasks.
    pub fn set_view(&mut self, view: ViewState) {
        let previous = self.router.current();
        if self.router.set_view(view) {
            self.enter_view(previous);
        }
    }

    pub fn go_back(&mut self) {
        let previous = self.router.current();
        if self.router.go_back() {
            self.enter_view(previous);
        }
    }

    /// Tear down `previous` and mount whatever the router now shows
    fn enter_view(&mut self, previous: ViewState) {
        let view = self.router.current();
        if let Some(tool) = self.tool.take() {
            tracing::debug!("Unmounting {:?}", tool.view());
        }
        self.scroll.to_top();
        self.follow_focus = false;

        if view == ViewState::Contact {
            self.contact = ContactForm::new();
        }
        if view == ViewState::Home {
            // Come back to the card that was opened
            if let Some(index) = TOOLS.iter().position(|meta| meta.view == previous) {
                self.home_selected = index;
                self.follow_focus = true;
            }
        }
        if let Some(mut tool) = create_tool(view, self.tr()) {
            tool.mount(&self.tool_context(view));
            self.tool = Some(tool);
        }
        self.needs_render = true;
    }

    /// Deliver a background result if its tool is still mounted.
    /// Returns false when the event was dropped.
    pub fn handle_async(&mut self, event: AsyncEvent) -> bool {
        let mounted = self.tool.as_ref().map(|tool| tool.view());
        if !event.is_for(mounted) {
            tracing::debug!("Dropping {:?} result for unmounted view", event.view);
            return false;
        }
        let ctx = self.tool_context(event.view);
        if let Some(tool) = self.tool.as_mut() {
            tool.handle_message(event.message, &ctx);
        }
        self.needs_render = true;
        true
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        let text = text.into();
        if is_error {
            tracing::warn!("Status: {}", text);
        }
        self.status = Some(StatusMessage {
            text,
            is_error,
            shown_at: Instant::now(),
        });
        self.needs_render = true;
    }

    /// Clear the status message once it has been visible long enough
    pub fn expire_status(&mut self, now: Instant) {
        let lifetime = Duration::from_secs(self.config.ui.status_seconds);
        if let Some(status) = &self.status {
            if now.duration_since(status.shown_at) >= lifetime {
                self.status = None;
                self.needs_render = true;
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        let result = self.prefs.toggle_theme();
        self.theme = AppTheme::for_mode(self.prefs.theme());
        let tr = self.tr();
        match result {
            Ok(mode) => {
                let text = tr.fmt("status_theme_saved", &[("theme", tr.t(mode.label_key()))]);
                self.set_status(text, false);
            }
            Err(e) => {
                let error = format!("{:#}", e);
                let text = tr.fmt("status_pref_failed", &[("error", error.as_str())]);
                self.set_status(text, true);
            }
        }
    }

    pub fn set_language(&mut self, language: Language) {
        let result = self.prefs.set_language(language);
        let tr = self.tr();
        if let Some(tool) = self.tool.as_mut() {
            tool.language_changed(tr);
        }
        match result {
            Ok(()) => {
                let text = tr.fmt("status_language_saved", &[("language", language.native_name())]);
                self.set_status(text, false);
            }
            Err(e) => {
                let error = format!("{:#}", e);
                let text = tr.fmt("status_pref_failed", &[("error", error.as_str())]);
                self.set_status(text, true);
            }
        }
    }

    /// Save the mounted tool's result into the downloads directory
    pub fn download(&mut self) {
        let tr = self.tr();
        let Some(file) = self.tool.as_ref().and_then(|tool| tool.download(tr)) else {
            self.set_status(tr.t("status_nothing_to_download"), false);
            return;
        };
        match download::save(&self.paths.downloads, &file) {
            Ok(path) => {
                let path = path.display().to_string();
                let text = tr.fmt("status_downloaded", &[("path", path.as_str())]);
                self.set_status(text, false);
            }
            Err(e) => {
                tracing::error!("Download of {} failed: {:#}", file.filename, e);
                let error = format!("{:#}", e);
                let text = tr.fmt("status_download_failed", &[("error", error.as_str())]);
                self.set_status(text, true);
            }
        }
    }

    pub fn copy_result(&mut self) {
        let tr = self.tr();
        let Some(text) = self.tool.as_ref().and_then(|tool| tool.clipboard_text()) else {
            self.set_status(tr.t("status_nothing_to_copy"), false);
            return;
        };
        match clipboard::copy(&text) {
            Ok(()) => self.set_status(tr.t("status_copied"), false),
            Err(e) => {
                let error = format!("{:#}", e);
                let text = tr.fmt("status_copy_failed", &[("error", error.as_str())]);
                self.set_status(text, true);
            }
        }
    }

    fn paste_from_clipboard(&mut self) {
        match clipboard::paste() {
            Ok(text) => self.handle_paste(&text),
            Err(e) => {
                let tr = self.tr();
                let error = format!("{:#}", e);
                let text = tr.fmt("status_copy_failed", &[("error", error.as_str())]);
                self.set_status(text, true);
            }
        }
    }

    /// Bracketed paste (or Ctrl+V) into whatever has focus
    pub fn handle_paste(&mut self, text: &str) {
        let view = self.router.current();
        if view == ViewState::Contact {
            self.contact.handle_paste(text);
        } else if let Some(mut tool) = self.tool.take() {
            tool.handle_paste(text, &self.tool_context(view));
            self.tool = Some(tool);
        }
        self.needs_render = true;
    }

    /// Mouse wheel and other relative scrolling
    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll.scroll_by(delta);
        self.needs_render = true;
    }

    fn apply_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::Navigate(view) => self.set_view(view),
            MenuAction::SetLanguage(language) => self.set_language(language),
            MenuAction::ToggleTheme => self.toggle_theme(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.needs_render = true;

        if let Some(menu) = self.menu.as_mut() {
            match menu.handle_key(&key) {
                MenuOutcome::Open => {}
                MenuOutcome::Dismissed => self.menu = None,
                MenuOutcome::Chosen(action) => {
                    self.menu = None;
                    self.apply_menu_action(action);
                }
            }
            return;
        }

        if self.handle_global_key(&key) {
            return;
        }

        match self.router.current() {
            ViewState::Home => self.handle_home_key(&key),
            ViewState::About | ViewState::Privacy => self.handle_page_key(&key),
            ViewState::Contact => {
                if key.code == KeyCode::Esc {
                    self.go_back();
                } else if self.contact.handle_key(key, &self.paths.outbox) {
                    self.follow_focus = true;
                } else {
                    self.handle_page_key(&key);
                }
            }
            view => {
                let Some(mut tool) = self.tool.take() else {
                    return;
                };
                let result = tool.handle_key(key, &self.tool_context(view));
                self.tool = Some(tool);
                match result {
                    InputResult::Close => self.go_back(),
                    InputResult::Continue => self.follow_focus = true,
                    InputResult::Ignored => self.handle_page_key(&key),
                }
            }
        }
    }

    /// Shortcuts that work on every view. Returns true if consumed.
    fn handle_global_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                tracing::info!("Quit requested");
                self.running = false;
            }
            KeyCode::Char('t') if ctrl => self.toggle_theme(),
            KeyCode::Char('l') if ctrl => self.menu = Some(PopupMenu::languages(self.tr())),
            KeyCode::Char('s') if ctrl => self.download(),
            KeyCode::Char('y') if ctrl => self.copy_result(),
            KeyCode::Char('v') if ctrl => self.paste_from_clipboard(),
            KeyCode::Home if ctrl => self.scroll.to_top(),
            KeyCode::End if ctrl => self.scroll.to_bottom(),
            KeyCode::F(10) => {
                self.menu = Some(PopupMenu::navigation(self.tr(), self.router.current()))
            }
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::PageDown => self.scroll.page_down(),
            code => match NAV_ITEMS.iter().find(|nav| nav.key == code) {
                Some(nav) => self.set_view(nav.view),
                None => return false,
            },
        }
        true
    }

    fn handle_home_key(&mut self, key: &KeyEvent) {
        let columns = self.home_columns.max(1);
        let last = TOOLS.len() - 1;
        let selected = self.home_selected;
        let rtl = self.prefs.language().is_rtl();
        let (left, right) = if rtl { (1, -1) } else { (-1, 1) };
        let step: isize = match key.code {
            KeyCode::Left => left,
            KeyCode::Right => right,
            KeyCode::Up | KeyCode::BackTab => -(columns as isize),
            KeyCode::Down | KeyCode::Tab => columns as isize,
            KeyCode::Home => -(selected as isize),
            KeyCode::End => (last - selected) as isize,
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.set_view(TOOLS[selected].view);
                return;
            }
            KeyCode::Char('q') => {
                tracing::info!("Quit requested");
                self.running = false;
                return;
            }
            _ => return,
        };
        let target = selected as isize + step;
        if (0..=last as isize).contains(&target) {
            self.home_selected = target as usize;
            self.follow_focus = true;
        }
    }

    fn handle_page_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Up => self.scroll.scroll_by(-1),
            KeyCode::Down => self.scroll.scroll_by(1),
            KeyCode::Home => self.scroll.to_top(),
            KeyCode::End => self.scroll.to_bottom(),
            _ => {}
        }
    }
}
