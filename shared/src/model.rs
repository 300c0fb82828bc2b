use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ApiConfig;
use crate::pages::PageState;
use crate::routing::Route;
use crate::slices::{AuthState, DiagnosticsState, UiState};
use crate::UnixTimeMs;

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(ResultId);
typed_id!(UserId);
typed_id!(NotificationId);

impl ResultId {
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisType {
    Imaging,
    Symptoms,
    Chat,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// The normalized body of a diagnosis.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnalysisOutcome {
    pub condition: String,
    /// Always within `0.0..=1.0`.
    pub confidence: f64,
    pub description: String,
    pub recommendations: Vec<String>,
    pub severity: Severity,
}

/// A completed analysis. Never mutated after it is stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DiagnosticResult {
    pub id: ResultId,
    pub diagnosis_type: DiagnosisType,
    pub result: AnalysisOutcome,
    pub timestamp: UnixTimeMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct Model {
    pub auth: AuthState,
    pub ui: UiState,
    pub diagnostics: DiagnosticsState,
    pub route: Route,
    pub pages: PageState,
    pub api: ApiConfig,
    /// Id of the request behind `diagnostics.pending`; also names its timeout timer.
    pub in_flight_request: Option<String>,
    pub started: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            auth: AuthState::default(),
            ui: UiState::default(),
            diagnostics: DiagnosticsState::default(),
            route: Route::default(),
            pages: PageState::default(),
            api: ApiConfig::from_env(),
            in_flight_request: None,
            started: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_with_lowercase_tags() {
        let result = DiagnosticResult {
            id: ResultId::new("r1"),
            diagnosis_type: DiagnosisType::Imaging,
            result: AnalysisOutcome {
                condition: "Fractured".into(),
                confidence: 0.9,
                description: "d".into(),
                recommendations: vec![],
                severity: Severity::High,
            },
            timestamp: UnixTimeMs(1),
            image_url: None,
            symptoms: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["diagnosis_type"], "imaging");
        assert_eq!(json["result"]["severity"], "high");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn test_generated_result_ids_are_unique() {
        assert_ne!(ResultId::generate(), ResultId::generate());
    }

    #[test]
    fn test_default_model() {
        let model = Model::default();
        assert_eq!(model.route, Route::Home);
        assert!(model.diagnostics.results.is_empty());
        assert!(!model.auth.is_authenticated);
        assert!(model.ui.sidebar_open);
    }
}
