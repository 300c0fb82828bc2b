use crate::capabilities::{kv, Capabilities, HttpResult, KvResult, TimerOutput};
use crate::catalog::find_symptom;
use crate::config::ApiConfig;
use crate::gateway::{self, ApiRequest, ImagingModel, PALM_FEATURE_COUNT};
use crate::i18n::Text;
use crate::model::{DiagnosticResult, NotificationId};
use crate::orchestration;
use crate::pages::password_strength;
use crate::routing::Route;
use crate::slices::auth::{self, AuthError};
use crate::slices::{AnalysisKind, NotificationKind, SelectedImage};
use crate::upload::validate_image;
use crate::{
    view, AppError, AppResult, ErrorKind, Event, Model, UnixTimeMs, ViewModel,
    NOTIFICATION_DISMISS_DELAY, SIDEBAR_STORAGE_KEY,
};

#[derive(Default)]
pub struct App;

impl App {
    fn persist_sidebar(model: &Model, caps: &Capabilities) {
        match kv::encode_json(SIDEBAR_STORAGE_KEY, &model.ui.sidebar_open) {
            Ok(data) => caps.kv.set(SIDEBAR_STORAGE_KEY.to_string(), data, |result| {
                Event::SidebarSaved(Box::new(result))
            }),
            Err(e) => tracing::error!(error = %e, "could not encode sidebar state"),
        }
    }

    fn load_sidebar(caps: &Capabilities) {
        caps.kv.get(SIDEBAR_STORAGE_KEY.to_string(), |result| {
            Event::SidebarLoaded(Box::new(result))
        });
    }

    fn handle_sidebar_loaded(model: &mut Model, result: KvResult) {
        match kv::decode_json::<bool>(result) {
            Ok(Some(open)) => model.ui.set_sidebar_open(open),
            Ok(None) => tracing::debug!("no stored sidebar preference"),
            Err(e) => tracing::warn!(error = %e, "unreadable sidebar preference, keeping default"),
        }
    }

    fn navigate(model: &mut Model, caps: &Capabilities, path: &str) {
        let route = Route::from_path(path);
        if route == Route::NotFound {
            tracing::debug!(path, "unknown path");
        }
        model.route = route;

        if model.ui.sidebar_open {
            model.ui.set_sidebar_open(false);
            Self::persist_sidebar(model, caps);
        }
    }

    fn configure_api(model: &mut Model, base_url: &str) {
        match ApiConfig::with_base_url(base_url) {
            Ok(mut config) => {
                config.prediction_timeout = model.api.prediction_timeout;
                config.chat_timeout = model.api.chat_timeout;
                tracing::info!(base_url = config.base_url().as_str(), "api base url configured");
                model.api = config;
            }
            Err(e) => tracing::warn!(error = %e, "rejected api base url"),
        }
    }

    fn post_notification(
        model: &mut Model,
        caps: &Capabilities,
        kind: NotificationKind,
        message: String,
    ) {
        let id = model.ui.add_notification(kind, message, UnixTimeMs::now());
        caps.timer
            .start(id.as_str(), NOTIFICATION_DISMISS_DELAY, Event::NotificationTimer);
    }

    fn handle_notification_timer(model: &mut Model, output: &TimerOutput) {
        match output {
            TimerOutput::Elapsed { id } => {
                model.ui.remove_notification(&NotificationId::new(id.as_str()));
            }
            TimerOutput::Cancelled { id } => tracing::trace!(id, "notification timer cancelled"),
        }
    }

    fn auth_error_text(error: &AuthError) -> Text {
        match error {
            AuthError::InvalidCredentials => Text::InvalidCredentials,
            AuthError::MissingField { .. } => Text::FieldsRequired,
        }
    }

    fn login(model: &mut Model, email: &str, password: &str) {
        model.auth.begin();
        match auth::authenticate(email, password) {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "signed in");
                model.auth.set_credentials(session);
                model.route = Route::Dashboard;
            }
            Err(e) => {
                tracing::info!(error = %e, "sign in rejected");
                model
                    .auth
                    .fail(Self::auth_error_text(&e).get(model.ui.language));
            }
        }
    }

    fn register(model: &mut Model, name: &str, email: &str, password: &str) {
        model.auth.begin();
        match auth::register(name, email, password) {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "registered");
                model.auth.set_credentials(session);
                model.route = Route::Dashboard;
            }
            Err(e) => {
                tracing::info!(error = %e, "registration rejected");
                model
                    .auth
                    .fail(Self::auth_error_text(&e).get(model.ui.language));
            }
        }
    }

    /// Releases a preview URL unless the selection, the history or an
    /// in-flight analysis still points at it.
    fn release_preview(model: &Model, caps: &Capabilities, url: String) {
        let selected = model
            .diagnostics
            .selected_image
            .as_ref()
            .is_some_and(|img| img.preview_url == url);
        let in_flight = model.pages.image.in_flight_preview.as_deref() == Some(url.as_str());

        if !selected && !in_flight && !model.diagnostics.is_url_referenced(&url) {
            caps.document.revoke_object_url(url);
        }
    }

    fn drop_image(
        model: &mut Model,
        caps: &Capabilities,
        name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
        preview_url: String,
    ) {
        match validate_image(name, mime_type, bytes) {
            Ok(file) => {
                tracing::debug!(file = %file.name, size = file.size(), "image selected");
                model.pages.image.upload_error = None;
                let released = model
                    .diagnostics
                    .set_selected_image(Some(SelectedImage { file, preview_url }));
                if let Some(url) = released {
                    Self::release_preview(model, caps, url);
                }
            }
            Err(e) => {
                tracing::info!(error = %e, file = name, "image rejected");
                model.pages.image.upload_error = Some(e.into());
                Self::release_preview(model, caps, preview_url);
            }
        }
    }

    fn clear_image(model: &mut Model, caps: &Capabilities) {
        model.pages.image.upload_error = None;
        if let Some(url) = model.diagnostics.set_selected_image(None) {
            Self::release_preview(model, caps, url);
        }
    }

    /// Marks `kind` in flight, hands the request to the shell and arms its
    /// timeout. A request that could not be built fails the analysis straight away.
    fn dispatch<F>(
        model: &mut Model,
        caps: &Capabilities,
        kind: AnalysisKind,
        request: AppResult<ApiRequest>,
        make_event: F,
    ) -> bool
    where
        F: FnOnce(String, HttpResult) -> Event + Send + 'static,
    {
        if !model.diagnostics.begin_analysis(kind) {
            tracing::debug!(kind = kind.name(), "analysis already running, ignoring");
            return false;
        }

        match request {
            Ok(request) => {
                let request_id = format!("analysis-{}", uuid::Uuid::new_v4().simple());
                tracing::info!(kind = kind.name(), request_id = %request_id, "analysis requested");

                caps.timer
                    .start(request_id.as_str(), request.timeout, Event::AnalysisTimer);
                let token = request_id.clone();
                request.send(&caps.http, move |result| make_event(token, result));
                model.in_flight_request = Some(request_id);
                true
            }
            Err(e) => {
                tracing::error!(kind = kind.name(), error = %e, "could not build request");
                model.diagnostics.fail_analysis(kind, e);
                false
            }
        }
    }

    fn analyze_image(model: &mut Model, caps: &Capabilities) {
        if model.diagnostics.is_analyzing {
            tracing::debug!("analysis already running, ignoring");
            return;
        }
        let Some(image) = model.diagnostics.selected_image.as_ref() else {
            tracing::debug!("analyze requested without an image");
            return;
        };

        let imaging_model = model.pages.image.model;
        let image_url = image.preview_url.clone();
        let request = gateway::predict_image(&model.api, imaging_model, &image.file);

        let event_url = Some(image_url.clone());
        let sent = Self::dispatch(
            model,
            caps,
            AnalysisKind::Imaging(imaging_model),
            request,
            move |request_id, result| Event::ImagePredicted {
                model: imaging_model,
                image_url: event_url,
                request_id,
                result: Box::new(result),
            },
        );
        if sent {
            model.pages.image.in_flight_preview = Some(image_url);
        }
    }

    fn analyze_symptoms(model: &mut Model, caps: &Capabilities) {
        if model.diagnostics.is_analyzing {
            tracing::debug!("analysis already running, ignoring");
            return;
        }

        if model.pages.symptoms.is_palm() {
            if !model.pages.symptoms.has_palm_input() {
                model.pages.symptoms.validation_error = Some(Text::NothingSelected);
                return;
            }
            let features = model.pages.symptoms.palm_features;
            let request = gateway::predict_palm_disease(&model.api, &features);
            Self::dispatch(
                model,
                caps,
                AnalysisKind::PalmDisease,
                request,
                move |request_id, result| Event::PalmPredicted {
                    features,
                    request_id,
                    result: Box::new(result),
                },
            );
            return;
        }

        if model.diagnostics.selected_symptoms.is_empty() {
            model.pages.symptoms.validation_error = Some(Text::NothingSelected);
            return;
        }

        model.pages.symptoms.validation_error = None;
        if model.diagnostics.begin_analysis(AnalysisKind::Symptoms) {
            let result = orchestration::symptom_result(
                &model.diagnostics.selected_symptoms,
                model.ui.language,
                UnixTimeMs::now(),
            );
            model.diagnostics.complete_analysis(result);
        }
    }

    fn submit_chat(model: &mut Model, caps: &Capabilities) {
        if model.diagnostics.is_analyzing {
            tracing::debug!("analysis already running, ignoring");
            return;
        }
        let Some(text) = model.pages.chat.take_draft(UnixTimeMs::now()) else {
            return;
        };

        let request = gateway::chat(&model.api, &text);
        Self::dispatch(
            model,
            caps,
            AnalysisKind::Chat,
            request,
            |request_id, result| Event::ChatReplied {
                request_id,
                result: Box::new(result),
            },
        );
    }

    /// Whether a response belongs to the analysis still in flight. Replies to
    /// requests that already timed out are dropped.
    fn is_current(model: &Model, kind: AnalysisKind, request_id: &str) -> bool {
        model.diagnostics.pending == Some(kind)
            && model.in_flight_request.as_deref() == Some(request_id)
    }

    /// Applies a finished analysis, or records the failure against `kind`.
    fn finish(
        model: &mut Model,
        caps: &Capabilities,
        kind: AnalysisKind,
        request_id: &str,
        outcome: AppResult<DiagnosticResult>,
    ) {
        if !Self::is_current(model, kind, request_id) {
            tracing::warn!(
                kind = kind.name(),
                request_id,
                "response for an analysis that is not pending"
            );
            return;
        }
        if let Some(timer) = model.in_flight_request.take() {
            caps.timer.cancel(timer);
        }

        match outcome {
            Ok(result) => model.diagnostics.complete_analysis(result),
            Err(error) => {
                tracing::warn!(
                    kind = kind.name(),
                    request_id,
                    code = error.code(),
                    error = %error,
                    "analysis failed"
                );
                model.diagnostics.fail_analysis(kind, error);
            }
        }
    }

    fn release_in_flight_preview(model: &mut Model, caps: &Capabilities) {
        if let Some(url) = model.pages.image.in_flight_preview.take() {
            Self::release_preview(model, caps, url);
        }
    }

    fn handle_image_predicted(
        model: &mut Model,
        caps: &Capabilities,
        imaging_model: ImagingModel,
        image_url: Option<String>,
        request_id: &str,
        result: HttpResult,
    ) {
        let kind = AnalysisKind::Imaging(imaging_model);
        let current = Self::is_current(model, kind, request_id);
        let locale = model.ui.language;
        let outcome = result
            .map_err(AppError::from)
            .and_then(|response| gateway::parse_prediction(&response))
            .map(|prediction| {
                orchestration::imaging_result(
                    imaging_model,
                    &prediction,
                    image_url,
                    locale,
                    UnixTimeMs::now(),
                )
            });

        Self::finish(model, caps, kind, request_id, outcome);
        if current {
            Self::release_in_flight_preview(model, caps);
        }
    }

    fn handle_palm_predicted(
        model: &mut Model,
        caps: &Capabilities,
        features: &[f64; PALM_FEATURE_COUNT],
        request_id: &str,
        result: HttpResult,
    ) {
        let locale = model.ui.language;
        let outcome = result
            .map_err(AppError::from)
            .and_then(|response| gateway::parse_prediction(&response))
            .map(|prediction| {
                orchestration::palm_result(&prediction, features, locale, UnixTimeMs::now())
            });

        Self::finish(model, caps, AnalysisKind::PalmDisease, request_id, outcome);
    }

    fn handle_chat_replied(
        model: &mut Model,
        caps: &Capabilities,
        request_id: &str,
        result: HttpResult,
    ) {
        let locale = model.ui.language;
        let outcome = result
            .map_err(AppError::from)
            .and_then(|response| gateway::parse_chat(&response))
            .map(|reply| orchestration::chat_result(&reply, locale, UnixTimeMs::now()));

        if let Ok(result) = &outcome {
            if Self::is_current(model, AnalysisKind::Chat, request_id) {
                model
                    .pages
                    .chat
                    .push_bot(result.result.condition.clone(), result.timestamp);
            }
        }
        Self::finish(model, caps, AnalysisKind::Chat, request_id, outcome);
    }

    fn handle_analysis_timer(model: &mut Model, caps: &Capabilities, output: &TimerOutput) {
        let TimerOutput::Elapsed { id } = output else {
            tracing::trace!(id = output.id(), "analysis timer cancelled");
            return;
        };
        if model.in_flight_request.as_deref() != Some(id.as_str()) {
            tracing::debug!(id = %id, "stale analysis timer");
            return;
        }
        model.in_flight_request = None;

        if let Some(kind) = model.diagnostics.pending {
            tracing::warn!(kind = kind.name(), request_id = %id, "analysis timed out");
            model
                .diagnostics
                .fail_analysis(kind, AppError::new(ErrorKind::Timeout, "Request timed out"));
        }
        Self::release_in_flight_preview(model, caps);
    }

    fn toggle_symptom(model: &mut Model, id: String) {
        if find_symptom(&id).is_none() {
            tracing::warn!(id, "unknown symptom id");
            return;
        }
        if !model.diagnostics.remove_symptom(&id) {
            model.diagnostics.add_symptom(id);
        }
        model.pages.symptoms.validation_error = None;
    }

    fn clear_results(model: &mut Model, caps: &Capabilities) {
        for url in model.diagnostics.clear_results() {
            Self::release_preview(model, caps, url);
        }
    }

    fn dismiss_errors(model: &mut Model) {
        model.diagnostics.clear_error();
        model.pages.image.upload_error = None;
        model.pages.symptoms.validation_error = None;
        model.auth.error = None;
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        if event.is_user_initiated() {
            tracing::debug!(event = event_name, "user action");
        } else {
            tracing::trace!(event = event_name, "event");
        }

        match event {
            Event::AppStarted => {
                if model.started {
                    tracing::debug!("app already started");
                } else {
                    model.started = true;
                    caps.document.set_dark_mode(model.ui.theme.is_dark());
                    caps.document.apply_locale(model.ui.language);
                    Self::load_sidebar(caps);
                }
            }

            Event::Navigate { path } => Self::navigate(model, caps, &path),

            Event::ApiConfigured { base_url } => Self::configure_api(model, &base_url),

            Event::ThemeToggled => {
                let theme = model.ui.toggle_theme();
                caps.document.set_dark_mode(theme.is_dark());
            }

            Event::ThemeSet { theme } => {
                model.ui.set_theme(theme);
                caps.document.set_dark_mode(theme.is_dark());
            }

            Event::LanguageToggled => {
                let language = model.ui.language.toggle();
                model.ui.set_language(language);
                caps.document.apply_locale(language);
            }

            Event::LanguageSet { language } => {
                model.ui.set_language(language);
                caps.document.apply_locale(language);
            }

            Event::SidebarToggled => {
                model.ui.toggle_sidebar();
                Self::persist_sidebar(model, caps);
            }

            Event::SidebarSet { open } => {
                model.ui.set_sidebar_open(open);
                Self::persist_sidebar(model, caps);
            }

            Event::SidebarLoaded(result) => Self::handle_sidebar_loaded(model, *result),

            Event::SidebarSaved(result) => {
                if let Err(e) = *result {
                    tracing::warn!(error = %e, "could not persist sidebar state");
                }
            }

            Event::NotificationPosted { kind, message } => {
                Self::post_notification(model, caps, kind, message);
            }

            Event::NotificationDismissed { id } => {
                if model.ui.remove_notification(&id) {
                    caps.timer.cancel(id.as_str());
                }
            }

            Event::NotificationsCleared => {
                for id in model.ui.clear_notifications() {
                    caps.timer.cancel(id.as_str());
                }
            }

            Event::NotificationTimer(output) => Self::handle_notification_timer(model, &output),

            Event::AnalysisTimer(output) => Self::handle_analysis_timer(model, caps, &output),

            Event::LoginSubmitted { email, password } => Self::login(model, &email, &password),

            Event::RegisterPasswordChanged { password } => {
                model.pages.register.password_strength = password_strength(&password);
            }

            Event::RegisterSubmitted {
                name,
                email,
                password,
            } => Self::register(model, &name, &email, &password),

            Event::LogoutRequested => {
                model.auth.logout();
                model.route = Route::Home;
                tracing::info!("signed out");
            }

            Event::ModelSelected { model: imaging_model } => {
                model.pages.image.model = imaging_model;
            }

            Event::ImageDropped {
                name,
                mime_type,
                bytes,
                preview_url,
            } => Self::drop_image(model, caps, &name, &mime_type, bytes, preview_url),

            Event::ImageCleared => Self::clear_image(model, caps),

            Event::AnalyzeImage => Self::analyze_image(model, caps),

            Event::SymptomSearchChanged { query } => model.pages.symptoms.search = query,

            Event::RegionSelected { region } => {
                model.pages.symptoms.region = region;
                model.pages.symptoms.validation_error = None;
            }

            Event::SymptomToggled { id } => Self::toggle_symptom(model, id),

            Event::SymptomRemoved { id } => {
                model.diagnostics.remove_symptom(&id);
            }

            Event::SymptomsCleared => model.diagnostics.clear_symptoms(),

            Event::PalmFeatureChanged { index, value } => {
                if let Err(e) = model.pages.symptoms.set_palm_feature(index, value) {
                    tracing::debug!(error = %e, "palm feature rejected");
                }
            }

            Event::PalmFeaturesReset => model.pages.symptoms.reset_palm_features(),

            Event::AnalyzeSymptoms => Self::analyze_symptoms(model, caps),

            Event::ChatDraftChanged { text } => model.pages.chat.draft = text,

            Event::ChatSubmitted => Self::submit_chat(model, caps),

            Event::ImagePredicted {
                model: imaging_model,
                image_url,
                request_id,
                result,
            } => Self::handle_image_predicted(
                model,
                caps,
                imaging_model,
                image_url,
                &request_id,
                *result,
            ),

            Event::PalmPredicted {
                features,
                request_id,
                result,
            } => Self::handle_palm_predicted(model, caps, &features, &request_id, *result),

            Event::ChatReplied { request_id, result } => {
                Self::handle_chat_replied(model, caps, &request_id, *result);
            }

            Event::ResultSelected { id } => {
                if !model.diagnostics.select_result(&id) {
                    tracing::warn!(id = %id, "unknown result id");
                }
            }

            Event::ResultsCleared => Self::clear_results(model, caps),

            Event::ErrorDismissed => Self::dismiss_errors(model),
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(model)
    }
}
