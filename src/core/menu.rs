//! Popup menu state: the navigation menu (F10) and the language picker
//! (Ctrl+L). Rendering lives in `frontend::tui::popup_menu`.

use crate::core::view::{ViewState, NAV_ITEMS};
use crate::i18n::{Language, Tr};
use crossterm::event::{KeyCode, KeyEvent};

/// What choosing an item does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(ViewState),
    SetLanguage(Language),
    ToggleTheme,
}

/// A menu item with display text and the action it triggers
#[derive(Clone, Debug)]
pub struct MenuItem {
    pub text: String,
    pub action: MenuAction,
}

/// Result of feeding a key to an open menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Still open
    Open,
    Chosen(MenuAction),
    Dismissed,
}

pub struct PopupMenu {
    title: String,
    items: Vec<MenuItem>,
    selected: usize,
}

impl PopupMenu {
    pub fn with_selected(title: impl Into<String>, items: Vec<MenuItem>, selected: usize) -> Self {
        let selected = selected.min(items.len().saturating_sub(1));
        Self {
            title: title.into(),
            items,
            selected,
        }
    }

    /// Home, the static pages and the theme toggle
    pub fn navigation(tr: Tr, current: ViewState) -> Self {
        let mut items = vec![MenuItem {
            text: tr.t("nav_home").to_string(),
            action: MenuAction::Navigate(ViewState::Home),
        }];
        items.extend(NAV_ITEMS.iter().skip(1).map(|nav| MenuItem {
            text: tr.t(nav.label_key).to_string(),
            action: MenuAction::Navigate(nav.view),
        }));
        items.push(MenuItem {
            text: tr.t("toggle_theme").to_string(),
            action: MenuAction::ToggleTheme,
        });
        let selected = items
            .iter()
            .position(|item| item.action == MenuAction::Navigate(current))
            .unwrap_or(0);
        Self::with_selected(tr.t("nav_menu"), items, selected)
    }

    /// Every supported language by its own name, current one selected
    pub fn languages(tr: Tr) -> Self {
        let items = Language::ALL
            .iter()
            .map(|&lang| MenuItem {
                text: format!("{} ({})", lang.native_name(), lang.code()),
                action: MenuAction::SetLanguage(lang),
            })
            .collect();
        let selected = Language::ALL
            .iter()
            .position(|&lang| lang == tr.language())
            .unwrap_or(0);
        Self::with_selected(tr.t("language"), items, selected)
    }

    /// Navigate forward - wraps around
    pub fn select_next(&mut self) {
        if self.selected < self.items.len().saturating_sub(1) {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
    }

    /// Navigate backward - wraps around
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn selected_action(&self) -> Option<MenuAction> {
        self.items.get(self.selected).map(|item| item.action)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> MenuOutcome {
        match key.code {
            KeyCode::Down | KeyCode::Tab => self.select_next(),
            KeyCode::Up | KeyCode::BackTab => self.select_previous(),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.items.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                return match self.selected_action() {
                    Some(action) => MenuOutcome::Chosen(action),
                    None => MenuOutcome::Dismissed,
                };
            }
            KeyCode::Esc | KeyCode::F(10) => return MenuOutcome::Dismissed,
            _ => {}
        }
        MenuOutcome::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_menu_starts_on_current_view() {
        let menu = PopupMenu::navigation(Tr::new(Language::En), ViewState::Privacy);
        assert_eq!(menu.items().len(), 5);
        assert_eq!(
            menu.selected_action(),
            Some(MenuAction::Navigate(ViewState::Privacy))
        );
        assert_eq!(menu.items()[0].text, "Home");

        // Tools are not in the menu, so fall back to the first item
        let menu = PopupMenu::navigation(Tr::new(Language::En), ViewState::Bmi);
        assert_eq!(menu.selected_index(), 0);
    }

    #[test]
    fn test_language_menu_wraps_and_chooses() {
        let mut menu = PopupMenu::languages(Tr::new(Language::En));
        assert_eq!(menu.items().len(), Language::ALL.len());
        assert_eq!(menu.selected_action(), Some(MenuAction::SetLanguage(Language::En)));

        menu.handle_key(&key(KeyCode::Up));
        assert_eq!(menu.selected_index(), Language::ALL.len() - 1);
        menu.handle_key(&key(KeyCode::Down));
        assert_eq!(menu.selected_index(), 0);
        menu.handle_key(&key(KeyCode::Down));
        assert_eq!(
            menu.handle_key(&key(KeyCode::Enter)),
            MenuOutcome::Chosen(MenuAction::SetLanguage(Language::ALL[1]))
        );
        assert_eq!(menu.handle_key(&key(KeyCode::Esc)), MenuOutcome::Dismissed);
        assert_eq!(menu.handle_key(&key(KeyCode::Char('x'))), MenuOutcome::Open);
    }
}
