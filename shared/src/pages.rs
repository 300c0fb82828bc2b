//! Page-local form state that lives outside the three shared slices.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::BodyRegion;
use crate::gateway::{ImagingModel, PALM_FEATURE_COUNT};
use crate::i18n::Text;
use crate::{AppError, UnixTimeMs, PALM_FEATURE_MAX, PALM_FEATURE_MIN};

#[derive(Debug, Default)]
pub struct PageState {
    pub image: ImagePage,
    pub symptoms: SymptomPage,
    pub chat: ChatPage,
    pub register: RegisterPage,
}

#[derive(Debug, Default)]
pub struct ImagePage {
    pub model: ImagingModel,
    /// Set when a dropped file is rejected; cleared by the next valid drop.
    pub upload_error: Option<AppError>,
    /// Preview of the image currently being analysed. Never released while set.
    pub in_flight_preview: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PalmFeatureError {
    #[error("no palm feature at index {index}")]
    UnknownFeature { index: usize },

    #[error("palm feature value {value} is outside 0..=10")]
    OutOfRange { value: f64 },
}

#[derive(Debug, Default)]
pub struct SymptomPage {
    pub search: String,
    pub region: Option<BodyRegion>,
    pub palm_features: [f64; PALM_FEATURE_COUNT],
    /// Localised when rendered.
    pub validation_error: Option<Text>,
}

impl SymptomPage {
    #[must_use]
    pub fn is_palm(&self) -> bool {
        self.region == Some(BodyRegion::Palm)
    }

    /// Stores one feature value. Rejected values leave the previous one in place.
    pub fn set_palm_feature(&mut self, index: usize, value: f64) -> Result<(), PalmFeatureError> {
        let slot = self
            .palm_features
            .get_mut(index)
            .ok_or(PalmFeatureError::UnknownFeature { index })?;

        if !value.is_finite() || !(PALM_FEATURE_MIN..=PALM_FEATURE_MAX).contains(&value) {
            self.validation_error = Some(Text::PalmFeatureOutOfRange);
            return Err(PalmFeatureError::OutOfRange { value });
        }

        *slot = value;
        self.validation_error = None;
        Ok(())
    }

    /// A palm analysis needs at least one non-zero feature.
    #[must_use]
    pub fn has_palm_input(&self) -> bool {
        self.palm_features.iter().any(|v| *v != 0.0)
    }

    pub fn reset_palm_features(&mut self) {
        self.palm_features = [0.0; PALM_FEATURE_COUNT];
        self.validation_error = None;
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: UnixTimeMs,
}

#[derive(Debug, Default)]
pub struct ChatPage {
    pub draft: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatPage {
    /// Moves the trimmed draft into the transcript. Blank drafts are kept
    /// as they are and yield `None`.
    pub fn take_draft(&mut self, now: UnixTimeMs) -> Option<String> {
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.draft.clear();
        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: text.clone(),
            timestamp: now,
        });
        Some(text)
    }

    pub fn push_bot(&mut self, text: impl Into<String>, timestamp: UnixTimeMs) {
        self.messages.push(ChatMessage {
            sender: Sender::Bot,
            text: text.into(),
            timestamp,
        });
    }
}

#[derive(Debug, Default)]
pub struct RegisterPage {
    pub password_strength: u8,
}

/// 25 points each for: length of at least 8, a lower-case letter, an
/// upper-case letter, and a digit or symbol.
#[must_use]
pub fn password_strength(password: &str) -> u8 {
    const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password
            .chars()
            .any(|c| c.is_ascii_digit() || SYMBOLS.contains(c)),
    ];

    checks.iter().filter(|passed| **passed).map(|_| 25).sum()
}

#[must_use]
pub const fn strength_label(score: u8) -> Text {
    match score {
        0..=25 => Text::StrengthWeak,
        26..=50 => Text::StrengthFair,
        51..=75 => Text::StrengthGood,
        _ => Text::StrengthStrong,
    }
}
