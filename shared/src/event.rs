use serde::{Deserialize, Serialize};

use crate::capabilities::{HttpResult, KvResult, TimerOutput};
use crate::catalog::BodyRegion;
use crate::gateway::{ImagingModel, PALM_FEATURE_COUNT};
use crate::i18n::Locale;
use crate::model::{NotificationId, ResultId};
use crate::slices::{NotificationKind, Theme};

// Capability responses are boxed to keep the enum small.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle & navigation
    AppStarted,
    Navigate {
        path: String,
    },
    ApiConfigured {
        base_url: String,
    },

    // Preferences
    ThemeToggled,
    ThemeSet {
        theme: Theme,
    },
    LanguageToggled,
    LanguageSet {
        language: Locale,
    },
    SidebarToggled,
    SidebarSet {
        open: bool,
    },

    // Notifications
    NotificationPosted {
        kind: NotificationKind,
        message: String,
    },
    NotificationDismissed {
        id: NotificationId,
    },
    NotificationsCleared,

    // Auth
    LoginSubmitted {
        email: String,
        password: String,
    },
    RegisterPasswordChanged {
        password: String,
    },
    RegisterSubmitted {
        name: String,
        email: String,
        password: String,
    },
    LogoutRequested,

    // Image analysis
    ModelSelected {
        model: ImagingModel,
    },
    ImageDropped {
        name: String,
        mime_type: String,
        #[serde(with = "serde_bytes")]
        bytes: Vec<u8>,
        preview_url: String,
    },
    ImageCleared,
    AnalyzeImage,

    // Symptom checker
    SymptomSearchChanged {
        query: String,
    },
    RegionSelected {
        region: Option<BodyRegion>,
    },
    SymptomToggled {
        id: String,
    },
    SymptomRemoved {
        id: String,
    },
    SymptomsCleared,
    PalmFeatureChanged {
        index: usize,
        value: f64,
    },
    PalmFeaturesReset,
    AnalyzeSymptoms,

    // Chat
    ChatDraftChanged {
        text: String,
    },
    ChatSubmitted,

    // History
    ResultSelected {
        id: ResultId,
    },
    ResultsCleared,
    ErrorDismissed,

    // Capability responses
    ImagePredicted {
        model: ImagingModel,
        image_url: Option<String>,
        request_id: String,
        result: Box<HttpResult>,
    },
    PalmPredicted {
        features: [f64; PALM_FEATURE_COUNT],
        request_id: String,
        result: Box<HttpResult>,
    },
    ChatReplied {
        request_id: String,
        result: Box<HttpResult>,
    },
    SidebarLoaded(Box<KvResult>),
    SidebarSaved(Box<KvResult>),
    NotificationTimer(TimerOutput),
    AnalysisTimer(TimerOutput),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::Navigate { .. } => "navigate",
            Self::ApiConfigured { .. } => "api_configured",
            Self::ThemeToggled => "theme_toggled",
            Self::ThemeSet { .. } => "theme_set",
            Self::LanguageToggled => "language_toggled",
            Self::LanguageSet { .. } => "language_set",
            Self::SidebarToggled => "sidebar_toggled",
            Self::SidebarSet { .. } => "sidebar_set",
            Self::NotificationPosted { .. } => "notification_posted",
            Self::NotificationDismissed { .. } => "notification_dismissed",
            Self::NotificationsCleared => "notifications_cleared",
            Self::LoginSubmitted { .. } => "login_submitted",
            Self::RegisterPasswordChanged { .. } => "register_password_changed",
            Self::RegisterSubmitted { .. } => "register_submitted",
            Self::LogoutRequested => "logout_requested",
            Self::ModelSelected { .. } => "model_selected",
            Self::ImageDropped { .. } => "image_dropped",
            Self::ImageCleared => "image_cleared",
            Self::AnalyzeImage => "analyze_image",
            Self::SymptomSearchChanged { .. } => "symptom_search_changed",
            Self::RegionSelected { .. } => "region_selected",
            Self::SymptomToggled { .. } => "symptom_toggled",
            Self::SymptomRemoved { .. } => "symptom_removed",
            Self::SymptomsCleared => "symptoms_cleared",
            Self::PalmFeatureChanged { .. } => "palm_feature_changed",
            Self::PalmFeaturesReset => "palm_features_reset",
            Self::AnalyzeSymptoms => "analyze_symptoms",
            Self::ChatDraftChanged { .. } => "chat_draft_changed",
            Self::ChatSubmitted => "chat_submitted",
            Self::ResultSelected { .. } => "result_selected",
            Self::ResultsCleared => "results_cleared",
            Self::ErrorDismissed => "error_dismissed",
            Self::ImagePredicted { .. } => "image_predicted",
            Self::PalmPredicted { .. } => "palm_predicted",
            Self::ChatReplied { .. } => "chat_replied",
            Self::SidebarLoaded(_) => "sidebar_loaded",
            Self::SidebarSaved(_) => "sidebar_saved",
            Self::NotificationTimer(_) => "notification_timer",
            Self::AnalysisTimer(_) => "analysis_timer",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::AppStarted
                | Self::ApiConfigured { .. }
                | Self::ImagePredicted { .. }
                | Self::PalmPredicted { .. }
                | Self::ChatReplied { .. }
                | Self::SidebarLoaded(_)
                | Self::SidebarSaved(_)
                | Self::NotificationTimer(_)
                | Self::AnalysisTimer(_)
        )
    }
}
