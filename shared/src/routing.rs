use serde::{Deserialize, Serialize};

use crate::i18n::{Locale, Text};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Home,
    Diagnostics,
    ImageAnalysis,
    SymptomChecker,
    Dashboard,
    Chat,
    Login,
    Register,
    NotFound,
}

impl Route {
    pub const ALL: [Self; 9] = [
        Self::Home,
        Self::Diagnostics,
        Self::ImageAnalysis,
        Self::SymptomChecker,
        Self::Dashboard,
        Self::Chat,
        Self::Login,
        Self::Register,
        Self::NotFound,
    ];

    /// Entries shown in the main navigation, in display order.
    pub const NAVIGATION: [Self; 6] = [
        Self::Home,
        Self::Diagnostics,
        Self::ImageAnalysis,
        Self::SymptomChecker,
        Self::Chat,
        Self::Dashboard,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Diagnostics => "/diagnostics",
            Self::ImageAnalysis => "/image-analysis",
            Self::SymptomChecker => "/symptom-checker",
            Self::Dashboard => "/dashboard",
            Self::Chat => "/chat",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::NotFound => "/404",
        }
    }

    /// Resolves a location path. Query strings, fragments and a trailing
    /// slash are ignored; anything unknown is `NotFound`.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        Self::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .unwrap_or(Self::NotFound)
    }

    #[must_use]
    pub const fn title(self, locale: Locale) -> &'static str {
        let text = match self {
            Self::Home => Text::HomeTitle,
            Self::Diagnostics => Text::DiagnosticsTitle,
            Self::ImageAnalysis => Text::ImageAnalysisTitle,
            Self::SymptomChecker => Text::SymptomCheckerTitle,
            Self::Dashboard => Text::DashboardTitle,
            Self::Chat => Text::ChatTitle,
            Self::Login => Text::LoginTitle,
            Self::Register => Text::RegisterTitle,
            Self::NotFound => Text::NotFoundTitle,
        };
        text.get(locale)
    }

    #[must_use]
    pub const fn nav_label(self, locale: Locale) -> &'static str {
        let text = match self {
            Self::Home | Self::NotFound => Text::NavHome,
            Self::Diagnostics => Text::NavDiagnostics,
            Self::ImageAnalysis => Text::NavImageAnalysis,
            Self::SymptomChecker => Text::NavSymptomChecker,
            Self::Dashboard => Text::NavDashboard,
            Self::Chat => Text::NavChat,
            Self::Login => Text::NavLogin,
            Self::Register => Text::NavRegister,
        };
        text.get(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_unknown_paths_are_not_found() {
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
        assert_eq!(Route::from_path("/image-analysis/extra"), Route::NotFound);
        assert_eq!(Route::from_path("image-analysis"), Route::NotFound);
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/chat/"), Route::Chat);
        assert_eq!(Route::from_path("/dashboard?tab=recent"), Route::Dashboard);
        assert_eq!(Route::from_path("/#top"), Route::Home);
    }

    #[test]
    fn test_labels_follow_locale() {
        assert_eq!(Route::Chat.nav_label(Locale::En), "Chat Assistant");
        assert_eq!(Route::Chat.nav_label(Locale::Ar), "مساعد الدردشة");
        assert_eq!(Route::NotFound.title(Locale::En), "Page not found");
    }
}
