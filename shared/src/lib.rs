// lib.rs - DoctorAI diagnostics client core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod event;
pub mod gateway;
pub mod i18n;
pub mod model;
pub mod orchestration;
pub mod pages;
pub mod routing;
pub mod slices;
pub mod upload;
pub mod view;

#[cfg(feature = "ml")]
pub mod inference;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use i18n::{tr, Locale};
pub use model::Model;
pub use view::ViewModel;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const ACCEPTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
pub const NOTIFICATION_DISMISS_DELAY: Duration = Duration::from_millis(5000);
pub const PREDICTION_TIMEOUT: Duration = Duration::from_secs(60);
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(30);
pub const SIDEBAR_STORAGE_KEY: &str = "sidebarOpen";
pub const DEFAULT_SIDEBAR_OPEN: bool = true;
pub const FREE_DIAGNOSTICS_QUOTA: usize = 10;
pub const RECENT_RESULTS_LIMIT: usize = 5;
pub const PALM_FEATURE_MIN: f64 = 0.0;
pub const PALM_FEATURE_MAX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Authentication,
    Authorization,
    Validation,
    NotFound,
    RateLimited,
    Server,
    Storage,
    Serialization,
    Deserialization,
    ImageTooLarge,
    ImageFormatUnsupported,
    InvalidState,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Authentication => "AUTH_ERROR",
            Self::Authorization => "FORBIDDEN",
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::Server => "SERVER_ERROR",
            Self::Storage => "STORAGE_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::ImageTooLarge => "IMAGE_TOO_LARGE",
            Self::ImageFormatUnsupported => "IMAGE_FORMAT_UNSUPPORTED",
            Self::InvalidState => "INVALID_STATE",
            Self::Internal => "INTERNAL_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::Timeout | Self::RateLimited | Self::Server | Self::Storage => {
                ErrorSeverity::Transient
            }

            Self::Serialization | Self::Internal | Self::InvalidState => ErrorSeverity::Fatal,

            Self::Authentication
            | Self::Authorization
            | Self::Validation
            | Self::NotFound
            | Self::Deserialization
            | Self::ImageTooLarge
            | Self::ImageFormatUnsupported
            | Self::Unknown => ErrorSeverity::Permanent,
        }
    }

    /// Whether resubmitting the same input could succeed. Nothing is retried
    /// automatically; this only drives the "try again" hint in the view.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network | Self::Timeout | Self::RateLimited | Self::Server | Self::Storage
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable() && !matches!(self.severity, ErrorSeverity::Fatal)
    }

    #[must_use]
    pub fn user_facing_message(&self, locale: Locale) -> String {
        match self.kind {
            ErrorKind::Network => tr(
                locale,
                "Unable to reach the analysis service. Please check your connection and try again.",
                "تعذر الوصول إلى خدمة التحليل. يرجى التحقق من اتصالك والمحاولة مرة أخرى.",
            )
            .into(),
            ErrorKind::Timeout => tr(
                locale,
                "The analysis took too long. Please try again.",
                "استغرق التحليل وقتًا طويلاً. يرجى المحاولة مرة أخرى.",
            )
            .into(),
            ErrorKind::Authentication | ErrorKind::Validation => self.message.clone(),
            ErrorKind::Authorization => tr(
                locale,
                "You don't have permission to perform this action.",
                "ليس لديك إذن لتنفيذ هذا الإجراء.",
            )
            .into(),
            ErrorKind::NotFound => tr(
                locale,
                "The requested analysis is not available.",
                "التحليل المطلوب غير متوفر.",
            )
            .into(),
            ErrorKind::RateLimited => tr(
                locale,
                "Too many requests. Please wait a moment and try again.",
                "طلبات كثيرة جدًا. يرجى الانتظار قليلاً والمحاولة مرة أخرى.",
            )
            .into(),
            ErrorKind::Server => tr(
                locale,
                "The analysis service encountered an error. Please try again later.",
                "واجهت خدمة التحليل خطأ. يرجى المحاولة لاحقًا.",
            )
            .into(),
            ErrorKind::Storage => tr(
                locale,
                "Unable to save your preferences locally.",
                "تعذر حفظ تفضيلاتك محليًا.",
            )
            .into(),
            ErrorKind::Serialization | ErrorKind::Deserialization => tr(
                locale,
                "The analysis service returned an unexpected response.",
                "أعادت خدمة التحليل استجابة غير متوقعة.",
            )
            .into(),
            ErrorKind::ImageTooLarge => tr(
                locale,
                "File size should be less than 10MB",
                "يجب أن يكون حجم الملف أقل من 10 ميجابايت",
            )
            .into(),
            ErrorKind::ImageFormatUnsupported => tr(
                locale,
                "Please upload an image file",
                "يرجى تحميل ملف صورة",
            )
            .into(),
            ErrorKind::InvalidState | ErrorKind::Internal | ErrorKind::Unknown => tr(
                locale,
                "An unexpected error occurred. Please try again.",
                "حدث خطأ غير متوقع. يرجى المحاولة مرة أخرى.",
            )
            .into(),
        }
    }

    #[must_use]
    pub fn from_http_status(status: u16, body: Option<&[u8]>) -> Self {
        let kind = match status {
            400 | 422 => ErrorKind::Validation,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::Timeout,
            429 => ErrorKind::RateLimited,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        };

        // FastAPI reports failures as {"detail": "..."}
        let message = body
            .and_then(|b| serde_json::from_slice::<ApiErrorResponse>(b).ok())
            .and_then(|e| e.detail.or(e.message))
            .unwrap_or_else(|| format!("HTTP error: {status}"));

        Self::new(kind, message).with_context("http_status", status.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub type AppResult<T> = Result<T, AppError>;

/// Explicit timestamp unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    #[must_use]
    pub fn now() -> Self {
        Self(get_current_time_ms())
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

impl Default for UnixTimeMs {
    fn default() -> Self {
        Self::now()
    }
}

#[must_use]
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let error = AppError::new(ErrorKind::Network, "Connection failed");

        assert_eq!(error.kind, ErrorKind::Network);
        assert_eq!(error.severity, ErrorSeverity::Transient);
        assert_eq!(error.message, "Connection failed");
        assert!(error.internal_message.is_none());
        assert!(error.is_retryable());
    }

    #[test]
    fn test_app_error_with_internal_and_context() {
        let error = AppError::new(ErrorKind::Server, "boom")
            .with_internal("stack trace")
            .with_context("capability", "xray");

        assert_eq!(error.internal_message.as_deref(), Some("stack trace"));
        assert_eq!(error.context.get("capability").map(String::as_str), Some("xray"));
        assert_eq!(error.to_string(), "[SERVER_ERROR] boom (internal: stack trace)");
    }

    #[test]
    fn test_app_error_from_http_status() {
        let error = AppError::from_http_status(500, Some(br#"{"detail":"model crashed"}"#));
        assert_eq!(error.kind, ErrorKind::Server);
        assert_eq!(error.message, "model crashed");
        assert_eq!(error.context.get("http_status").map(String::as_str), Some("500"));

        let error = AppError::from_http_status(404, None);
        assert_eq!(error.kind, ErrorKind::NotFound);
        assert_eq!(error.message, "HTTP error: 404");

        let error = AppError::from_http_status(422, Some(b"not json"));
        assert_eq!(error.kind, ErrorKind::Validation);

        let error = AppError::from_http_status(418, None);
        assert_eq!(error.kind, ErrorKind::Unknown);
    }

    #[test]
    fn test_error_kind_retryable() {
        assert!(ErrorKind::Network.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(ErrorKind::Server.is_retryable());
        assert!(!ErrorKind::Validation.is_retryable());
        assert!(!ErrorKind::Deserialization.is_retryable());
        assert!(!AppError::new(ErrorKind::Internal, "x").is_retryable());
    }

    #[test]
    fn test_user_facing_message_is_localized() {
        let error = AppError::new(ErrorKind::ImageFormatUnsupported, "bad file");

        assert_eq!(error.user_facing_message(Locale::En), "Please upload an image file");
        assert_eq!(error.user_facing_message(Locale::Ar), "يرجى تحميل ملف صورة");

        let error = AppError::new(ErrorKind::Validation, "Invalid credentials");
        assert_eq!(error.user_facing_message(Locale::Ar), "Invalid credentials");
    }

    #[test]
    fn test_unix_time_now() {
        let before = get_current_time_ms();
        let now = UnixTimeMs::now();
        assert!(now.as_millis() >= before);
    }
}
