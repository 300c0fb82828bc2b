//! Independent state slices composed into [`crate::Model`]. Each slice owns
//! its transitions; side effects are requested by the app, never here.

pub mod auth;
pub mod diagnostics;
pub mod ui;

pub use self::auth::{AuthError, AuthState, Role, Session, User};
pub use self::diagnostics::{AnalysisKind, DiagnosticsState, ScopedError, SelectedImage};
pub use self::ui::{Notification, NotificationKind, Theme, UiState};
