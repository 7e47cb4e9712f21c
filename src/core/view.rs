//! Views, the tool catalog and the router.

use crossterm::event::KeyCode;

/// Every screen the application can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewState {
    #[default]
    Home,
    About,
    Privacy,
    Contact,
    Password,
    WordCounter,
    UnitConverter,
    BaseConverter,
    Discount,
    Email,
    SystemInfo,
    RandomColor,
    ReadingProgress,
    StringCompare,
    Seo,
    Base64,
    RgbHex,
    QrCode,
    Countdown,
    ImageCompress,
    Bmi,
    TextCleaner,
    TimeZones,
    Markdown,
}

impl ViewState {
    pub fn is_tool(self) -> bool {
        !matches!(
            self,
            ViewState::Home | ViewState::About | ViewState::Privacy | ViewState::Contact
        )
    }

    /// Static pages reachable from the navigation bar
    pub fn is_page(self) -> bool {
        matches!(
            self,
            ViewState::About | ViewState::Privacy | ViewState::Contact
        )
    }

    /// Catalog entry for tool views
    pub fn meta(self) -> Option<&'static ToolMeta> {
        TOOLS.iter().find(|meta| meta.view == self)
    }
}

/// Home-grid card for one tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolMeta {
    pub view: ViewState,
    pub title_key: &'static str,
    pub description_key: &'static str,
    pub icon: &'static str,
    /// Suffix shared by `info_desc_*` and `info_steps_*`
    pub info_key: &'static str,
}

macro_rules! tool_meta {
    ($view:ident, $id:literal, $icon:literal) => {
        ToolMeta {
            view: ViewState::$view,
            title_key: concat!("tool_", $id),
            description_key: concat!("desc_", $id),
            icon: $icon,
            info_key: $id,
        }
    };
}

/// The 20 tools in home-grid order
pub const TOOLS: [ToolMeta; 20] = [
    tool_meta!(Password, "password", "⚷"),
    tool_meta!(WordCounter, "counter", "¶"),
    tool_meta!(UnitConverter, "unit", "⇄"),
    tool_meta!(BaseConverter, "base", "#"),
    tool_meta!(Discount, "discount", "%"),
    tool_meta!(Email, "email", "@"),
    tool_meta!(SystemInfo, "system", "ℹ"),
    tool_meta!(RandomColor, "color", "◐"),
    tool_meta!(ReadingProgress, "progress", "▤"),
    tool_meta!(StringCompare, "string", "≟"),
    tool_meta!(Seo, "seo", "⌕"),
    tool_meta!(Base64, "base64", "⊞"),
    tool_meta!(RgbHex, "rgb", "◉"),
    tool_meta!(QrCode, "qr", "▦"),
    tool_meta!(Countdown, "countdown", "◷"),
    tool_meta!(ImageCompress, "compress", "▣"),
    tool_meta!(Bmi, "bmi", "♥"),
    tool_meta!(TextCleaner, "cleaner", "✎"),
    tool_meta!(TimeZones, "timezone", "☉"),
    tool_meta!(Markdown, "markdown", "↓"),
];

/// Navigation bar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub view: ViewState,
    pub label_key: &'static str,
    pub key: KeyCode,
}

pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem {
        view: ViewState::Home,
        label_key: "nav_home",
        key: KeyCode::F(1),
    },
    NavItem {
        view: ViewState::About,
        label_key: "nav_about",
        key: KeyCode::F(2),
    },
    NavItem {
        view: ViewState::Privacy,
        label_key: "nav_privacy",
        key: KeyCode::F(3),
    },
    NavItem {
        view: ViewState::Contact,
        label_key: "nav_contact",
        key: KeyCode::F(4),
    },
];

/// Current view. There is no history: "back" always means home.
#[derive(Debug, Default)]
pub struct Router {
    current: ViewState,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ViewState {
        self.current
    }

    /// Switch views. Returns false if `view` is already showing.
    pub fn set_view(&mut self, view: ViewState) -> bool {
        if self.current == view {
            return false;
        }
        tracing::debug!("View {:?} -> {:?}", self.current, view);
        self.current = view;
        true
    }

    pub fn go_back(&mut self) -> bool {
        self.set_view(ViewState::Home)
    }
}
