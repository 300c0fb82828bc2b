use serde::{Deserialize, Serialize};

use crate::i18n::Locale;
use crate::model::NotificationId;
use crate::{UnixTimeMs, DEFAULT_SIDEBAR_OPEN};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: UnixTimeMs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub theme: Theme,
    pub language: Locale,
    pub sidebar_open: bool,
    pub notifications: Vec<Notification>,
    next_notification_seq: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Locale::default(),
            sidebar_open: DEFAULT_SIDEBAR_OPEN,
            notifications: Vec::new(),
            next_notification_seq: 0,
        }
    }
}

impl UiState {
    #[must_use]
    pub const fn is_rtl(&self) -> bool {
        self.language.is_rtl()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_language(&mut self, language: Locale) {
        self.language = language;
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    /// Appends a notification and returns its id, `"{unix_ms}-{seq}"`.
    pub fn add_notification(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: UnixTimeMs,
    ) -> NotificationId {
        let id = NotificationId(format!("{}-{}", now.as_millis(), self.next_notification_seq));
        self.next_notification_seq += 1;

        self.notifications.push(Notification {
            id: id.clone(),
            kind,
            message: message.into(),
            created_at: now,
        });
        id
    }

    pub fn remove_notification(&mut self, id: &NotificationId) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| &n.id != id);
        self.notifications.len() != before
    }

    /// Drops every notification, returning the removed ids.
    pub fn clear_notifications(&mut self) -> Vec<NotificationId> {
        self.notifications.drain(..).map(|n| n.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ui = UiState::default();
        assert_eq!(ui.theme, Theme::Light);
        assert_eq!(ui.language, Locale::En);
        assert!(!ui.is_rtl());
        assert!(ui.sidebar_open);
    }

    #[test]
    fn test_theme_toggle() {
        let mut ui = UiState::default();
        assert_eq!(ui.toggle_theme(), Theme::Dark);
        assert_eq!(ui.toggle_theme(), Theme::Light);
        ui.set_theme(Theme::Dark);
        assert!(ui.theme.is_dark());
    }

    #[test]
    fn test_language_drives_rtl() {
        let mut ui = UiState::default();
        ui.set_language(Locale::Ar);
        assert!(ui.is_rtl());
        ui.set_language(Locale::En);
        assert!(!ui.is_rtl());
    }

    #[test]
    fn test_notification_ids_unique_within_same_millisecond() {
        let mut ui = UiState::default();
        let now = UnixTimeMs(1_700_000_000_000);
        let a = ui.add_notification(NotificationKind::Info, "a", now);
        let b = ui.add_notification(NotificationKind::Error, "b", now);

        assert_ne!(a, b);
        assert_eq!(a.as_str(), "1700000000000-0");
        assert_eq!(ui.notifications.len(), 2);

        assert!(ui.remove_notification(&a));
        assert!(!ui.remove_notification(&a));
        assert_eq!(ui.clear_notifications(), vec![b]);
        assert!(ui.notifications.is_empty());
    }
}
