//! Localised projection of the model handed to the shell on every render.

use serde::{Deserialize, Serialize};

use crate::catalog::{filter_symptoms, find_symptom, BodyRegion, PALM_FEATURES};
use crate::gateway::ImagingModel;
use crate::i18n::{tr, Locale, Text, TextDirection};
use crate::model::{DiagnosisType, DiagnosticResult, Severity};
use crate::pages::{strength_label, ChatMessage, Sender};
use crate::routing::Route;
use crate::slices::{AnalysisKind, NotificationKind, Theme};
use crate::{Model, FREE_DIAGNOSTICS_QUOTA, RECENT_RESULTS_LIMIT};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub route: Route,
    pub path: String,
    pub title: String,
    pub app_name: String,
    pub locale: Locale,
    pub direction: TextDirection,
    pub is_rtl: bool,
    pub theme: Theme,
    pub sidebar_open: bool,
    pub nav: Vec<NavItemView>,
    pub notifications: Vec<NotificationView>,
    pub auth: AuthView,
    pub is_analyzing: bool,
    pub current_result: Option<ResultView>,
    pub image: ImagePageView,
    pub symptoms: SymptomPageView,
    pub chat: ChatPageView,
    pub dashboard: DashboardView,
    pub register: RegisterView,
    pub disclaimer: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NavItemView {
    pub route: Route,
    pub path: String,
    pub label: String,
    pub active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NotificationView {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthView {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user_name: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ResultView {
    pub id: String,
    pub diagnosis_type: DiagnosisType,
    pub type_label: String,
    pub condition: String,
    pub confidence: f64,
    pub confidence_percent: u8,
    pub severity: Severity,
    pub severity_label: String,
    pub description: String,
    pub recommendations: Vec<String>,
    pub timestamp_ms: u64,
    pub image_url: Option<String>,
    pub symptoms: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ImagePageView {
    pub models: Vec<OptionView>,
    pub file_name: Option<String>,
    pub preview_url: Option<String>,
    pub uploaded_message: Option<String>,
    pub error: Option<String>,
    pub can_analyze: bool,
    pub analyze_label: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PalmFeatureView {
    pub id: String,
    pub label: String,
    pub value: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SymptomPageView {
    pub search: String,
    pub regions: Vec<OptionView>,
    pub catalogue: Vec<OptionView>,
    pub empty_message: Option<String>,
    pub selected: Vec<OptionView>,
    pub is_palm: bool,
    pub palm_features: Vec<PalmFeatureView>,
    pub nothing_selected_message: Option<String>,
    pub validation_error: Option<String>,
    pub error: Option<String>,
    pub can_analyze: bool,
    pub analyze_label: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessageView {
    pub from_user: bool,
    pub text: String,
    pub timestamp_ms: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatPageView {
    pub messages: Vec<ChatMessageView>,
    pub draft: String,
    pub can_send: bool,
    pub is_waiting: bool,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DashboardView {
    pub welcome: Option<String>,
    pub total: usize,
    pub quota_label: String,
    pub last_activity: String,
    pub last_activity_ms: Option<u64>,
    pub recent: Vec<ResultView>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterView {
    pub password_strength: u8,
    pub strength_label: String,
}

#[must_use]
pub fn build(model: &Model) -> ViewModel {
    let locale = model.ui.language;

    ViewModel {
        route: model.route,
        path: model.route.path().to_string(),
        title: model.route.title(locale).to_string(),
        app_name: Text::AppName.get(locale).to_string(),
        locale,
        direction: locale.direction(),
        is_rtl: model.ui.is_rtl(),
        theme: model.ui.theme,
        sidebar_open: model.ui.sidebar_open,
        nav: nav_items(model.route, locale),
        notifications: model
            .ui
            .notifications
            .iter()
            .map(|n| NotificationView {
                id: n.id.to_string(),
                kind: n.kind,
                message: n.message.clone(),
            })
            .collect(),
        auth: AuthView {
            is_authenticated: model.auth.is_authenticated,
            is_loading: model.auth.is_loading,
            user_name: model.auth.user.as_ref().map(|u| u.name.clone()),
            error: model.auth.error.clone(),
        },
        is_analyzing: model.diagnostics.is_analyzing,
        current_result: model
            .diagnostics
            .current_result
            .as_ref()
            .map(|r| result_view(r, locale)),
        image: image_page(model, locale),
        symptoms: symptom_page(model, locale),
        chat: chat_page(model, locale),
        dashboard: dashboard(model, locale),
        register: RegisterView {
            password_strength: model.pages.register.password_strength,
            strength_label: strength_label(model.pages.register.password_strength)
                .get(locale)
                .to_string(),
        },
        disclaimer: Text::Disclaimer.get(locale).to_string(),
    }
}

fn nav_items(active: Route, locale: Locale) -> Vec<NavItemView> {
    Route::NAVIGATION
        .iter()
        .map(|&route| NavItemView {
            route,
            path: route.path().to_string(),
            label: route.nav_label(locale).to_string(),
            active: route == active,
        })
        .collect()
}

const fn type_label(diagnosis_type: DiagnosisType, locale: Locale) -> &'static str {
    match diagnosis_type {
        DiagnosisType::Imaging => tr(locale, "Image Analysis", "تحليل الصورة"),
        DiagnosisType::Symptoms => tr(locale, "Symptom Check", "فحص الأعراض"),
        DiagnosisType::Chat => tr(locale, "Chat", "دردشة"),
    }
}

const fn severity_label(severity: Severity, locale: Locale) -> &'static str {
    match severity {
        Severity::Low => tr(locale, "Low", "منخفضة"),
        Severity::Medium => tr(locale, "Medium", "متوسطة"),
        Severity::High => tr(locale, "High", "عالية"),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn result_view(result: &DiagnosticResult, locale: Locale) -> ResultView {
    let confidence = result.result.confidence.clamp(0.0, 1.0);

    ResultView {
        id: result.id.to_string(),
        diagnosis_type: result.diagnosis_type,
        type_label: type_label(result.diagnosis_type, locale).to_string(),
        condition: result.result.condition.clone(),
        confidence,
        confidence_percent: (confidence * 100.0).round() as u8,
        severity: result.result.severity,
        severity_label: severity_label(result.result.severity, locale).to_string(),
        description: result.result.description.clone(),
        recommendations: result.result.recommendations.clone(),
        timestamp_ms: result.timestamp.as_millis(),
        image_url: result.image_url.clone(),
        symptoms: result.symptoms.clone().unwrap_or_default(),
    }
}

fn image_page(model: &Model, locale: Locale) -> ImagePageView {
    let page = &model.pages.image;
    let diagnostics = &model.diagnostics;
    let selected = diagnostics.selected_image.as_ref();

    let error = page
        .upload_error
        .as_ref()
        .or_else(|| diagnostics.error_for(|kind| matches!(kind, AnalysisKind::Imaging(_))))
        .map(|e| e.user_facing_message(locale));

    ImagePageView {
        models: ImagingModel::ALL
            .iter()
            .map(|&m| OptionView {
                id: m.id().to_string(),
                label: m.label(locale).to_string(),
                selected: m == page.model,
            })
            .collect(),
        file_name: selected.map(|img| img.file.name.clone()),
        preview_url: selected.map(|img| img.preview_url.clone()),
        uploaded_message: selected.map(|_| Text::ImageUploaded.get(locale).to_string()),
        error,
        can_analyze: selected.is_some() && !diagnostics.is_analyzing,
        analyze_label: analyze_label(diagnostics.is_analyzing, locale),
    }
}

fn analyze_label(is_analyzing: bool, locale: Locale) -> String {
    if is_analyzing {
        Text::Analyzing.get(locale).to_string()
    } else {
        Text::Analyze.get(locale).to_string()
    }
}

fn symptom_page(model: &Model, locale: Locale) -> SymptomPageView {
    let page = &model.pages.symptoms;
    let diagnostics = &model.diagnostics;
    let is_palm = page.is_palm();

    let catalogue: Vec<OptionView> = if is_palm {
        Vec::new()
    } else {
        filter_symptoms(&page.search, page.region, locale)
            .into_iter()
            .map(|s| OptionView {
                id: s.id.to_string(),
                label: s.label(locale).to_string(),
                selected: diagnostics.selected_symptoms.iter().any(|id| id == s.id),
            })
            .collect()
    };

    let selected: Vec<OptionView> = diagnostics
        .selected_symptoms
        .iter()
        .map(|id| OptionView {
            id: id.clone(),
            label: find_symptom(id).map_or_else(|| id.clone(), |s| s.label(locale).to_string()),
            selected: true,
        })
        .collect();

    let has_input = if is_palm {
        page.has_palm_input()
    } else {
        !selected.is_empty()
    };

    let error = diagnostics
        .error_for(|kind| matches!(kind, AnalysisKind::Symptoms | AnalysisKind::PalmDisease))
        .map(|e| e.user_facing_message(locale));

    SymptomPageView {
        search: page.search.clone(),
        regions: BodyRegion::ALL
            .iter()
            .map(|&r| OptionView {
                id: r.id().to_string(),
                label: r.label(locale).to_string(),
                selected: page.region == Some(r),
            })
            .collect(),
        empty_message: (!is_palm && catalogue.is_empty())
            .then(|| Text::NoSymptomsFound.get(locale).to_string()),
        catalogue,
        selected,
        is_palm,
        palm_features: PALM_FEATURES
            .iter()
            .zip(page.palm_features)
            .map(|(feature, value)| PalmFeatureView {
                id: feature.id.to_string(),
                label: feature.label(locale).to_string(),
                value,
            })
            .collect(),
        nothing_selected_message: (!has_input)
            .then(|| Text::NothingSelected.get(locale).to_string()),
        validation_error: page.validation_error.map(|t| t.get(locale).to_string()),
        error,
        can_analyze: has_input && !diagnostics.is_analyzing,
        analyze_label: analyze_label(diagnostics.is_analyzing, locale),
    }
}

fn chat_page(model: &Model, locale: Locale) -> ChatPageView {
    let page = &model.pages.chat;
    let diagnostics = &model.diagnostics;

    ChatPageView {
        messages: page.messages.iter().map(chat_message).collect(),
        draft: page.draft.clone(),
        can_send: !page.draft.trim().is_empty() && !diagnostics.is_analyzing,
        is_waiting: diagnostics.pending == Some(AnalysisKind::Chat),
        error: diagnostics
            .error_for(|kind| kind == AnalysisKind::Chat)
            .map(|e| e.user_facing_message(locale)),
    }
}

fn chat_message(message: &ChatMessage) -> ChatMessageView {
    ChatMessageView {
        from_user: message.sender == Sender::User,
        text: message.text.clone(),
        timestamp_ms: message.timestamp.as_millis(),
    }
}

fn dashboard(model: &Model, locale: Locale) -> DashboardView {
    let results = &model.diagnostics.results;
    let total = results.len();
    let latest = results.first();

    let quota_label = match locale {
        Locale::En => format!("{total} of {FREE_DIAGNOSTICS_QUOTA} free diagnostics used"),
        Locale::Ar => format!("تم استخدام {total} من {FREE_DIAGNOSTICS_QUOTA} تشخيصات مجانية"),
    };

    let welcome = model.auth.user.as_ref().map(|u| match locale {
        Locale::En => format!("Welcome, {}", u.name),
        Locale::Ar => format!("مرحبًا، {}", u.name),
    });

    DashboardView {
        welcome,
        total,
        quota_label,
        last_activity: latest.map_or_else(
            || tr(locale, "No activity yet", "لا يوجد نشاط بعد").to_string(),
            |r| type_label(r.diagnosis_type, locale).to_string(),
        ),
        last_activity_ms: latest.map(|r| r.timestamp.as_millis()),
        recent: results
            .iter()
            .take(RECENT_RESULTS_LIMIT)
            .map(|r| result_view(r, locale))
            .collect(),
    }
}
