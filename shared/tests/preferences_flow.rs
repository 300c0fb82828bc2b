use crux_core::testing::AppTester;
use crux_core::Request;
use crux_kv::{KeyValueOperation, KeyValueResponse, KeyValueResult};
use doctorai_core::capabilities::{DocumentOperation, TimerOperation, TimerOutput};
use doctorai_core::i18n::TextDirection;
use doctorai_core::routing::Route;
use doctorai_core::slices::{NotificationKind, Theme};
use doctorai_core::{App, Effect, Event, Locale, Model};

fn document_ops(effects: &[Effect]) -> Vec<DocumentOperation> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Document(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect()
}

fn kv_requests(effects: Vec<Effect>) -> Vec<Request<KeyValueOperation>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::KeyValue(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn stored(value: Option<&[u8]>) -> KeyValueResult {
    KeyValueResult::Ok {
        response: KeyValueResponse::Get {
            value: value.map(<[u8]>::to_vec).into(),
        },
    }
}

fn timer_requests(effects: Vec<Effect>) -> Vec<Request<TimerOperation>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Timer(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn attribute(name: &str, value: &str) -> DocumentOperation {
    DocumentOperation::SetRootAttribute {
        name: name.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn test_startup_applies_document_and_loads_sidebar() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    assert!(model.ui.sidebar_open);

    let update = app.update(Event::AppStarted, &mut model);
    let ops = document_ops(&update.effects);
    assert!(ops.contains(&DocumentOperation::SetRootClass {
        class: "dark".into(),
        enabled: false,
    }));
    assert!(ops.contains(&attribute("dir", "ltr")));
    assert!(ops.contains(&attribute("lang", "en")));

    let mut requests = kv_requests(update.effects);
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].operation,
        KeyValueOperation::Get {
            key: "sidebarOpen".into()
        }
    );

    let loaded = app
        .resolve(&mut requests[0], stored(Some(b"false")))
        .expect("resolves");
    for event in loaded.events {
        app.update(event, &mut model);
    }
    assert!(!model.ui.sidebar_open);

    // A second start is a no-op.
    let update = app.update(Event::AppStarted, &mut model);
    assert!(document_ops(&update.effects).is_empty());
    assert!(kv_requests(update.effects).is_empty());
}

#[test]
fn test_missing_or_corrupt_sidebar_keeps_default() {
    let app = AppTester::<App, Effect>::default();

    for value in [None, Some(b"not json".as_slice())] {
        let mut model = Model::default();
        let mut requests = kv_requests(app.update(Event::AppStarted, &mut model).effects);
        let loaded = app
            .resolve(&mut requests[0], stored(value))
            .expect("resolves");
        for event in loaded.events {
            app.update(event, &mut model);
        }
        assert!(model.ui.sidebar_open);
    }
}

#[test]
fn test_sidebar_toggle_is_persisted() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::SidebarToggled, &mut model);
    assert!(!model.ui.sidebar_open);

    let mut requests = kv_requests(update.effects);
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].operation,
        KeyValueOperation::Set {
            key: "sidebarOpen".into(),
            value: b"false".to_vec(),
        }
    );

    // A failed write keeps the in-memory state.
    let saved = app
        .resolve(
            &mut requests[0],
            KeyValueResult::Err {
                error: crux_kv::error::KeyValueError::Io {
                    message: "quota exceeded".into(),
                },
            },
        )
        .expect("resolves");
    for event in saved.events {
        app.update(event, &mut model);
    }
    assert!(!model.ui.sidebar_open);
}

#[test]
fn test_navigation_closes_sidebar_and_resolves_routes() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::Navigate {
            path: "/image-analysis".into(),
        },
        &mut model,
    );
    assert_eq!(model.route, Route::ImageAnalysis);
    assert!(!model.ui.sidebar_open);
    assert_eq!(kv_requests(update.effects).len(), 1);

    // Already closed, nothing to persist.
    let update = app.update(
        Event::Navigate {
            path: "/no/such/page".into(),
        },
        &mut model,
    );
    assert_eq!(model.route, Route::NotFound);
    assert!(kv_requests(update.effects).is_empty());
}

#[test]
fn test_language_toggle_switches_direction() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::LanguageToggled, &mut model);
    assert_eq!(model.ui.language, Locale::Ar);

    let ops = document_ops(&update.effects);
    assert!(ops.contains(&attribute("dir", "rtl")));
    assert!(ops.contains(&attribute("lang", "ar")));
    assert!(ops.contains(&DocumentOperation::SetRootClass {
        class: "rtl".into(),
        enabled: true,
    }));

    let view = app.view(&model);
    assert!(view.is_rtl);
    assert_eq!(view.direction, TextDirection::Rtl);
    assert_eq!(view.locale, Locale::Ar);

    app.update(Event::LanguageToggled, &mut model);
    assert!(!app.view(&model).is_rtl);
}

#[test]
fn test_theme_toggle_sets_dark_class() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::ThemeToggled, &mut model);
    assert_eq!(model.ui.theme, Theme::Dark);
    assert_eq!(
        document_ops(&update.effects),
        vec![DocumentOperation::SetRootClass {
            class: "dark".into(),
            enabled: true,
        }]
    );

    app.update(Event::ThemeSet { theme: Theme::Light }, &mut model);
    assert_eq!(model.ui.theme, Theme::Light);
    assert_eq!(app.view(&model).theme, Theme::Light);
}

#[test]
fn test_notification_expires_after_timer() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::NotificationPosted {
            kind: NotificationKind::Success,
            message: "Saved".into(),
        },
        &mut model,
    );
    assert_eq!(model.ui.notifications.len(), 1);
    let id = model.ui.notifications[0].id.as_str().to_string();

    let mut timers = timer_requests(update.effects);
    assert_eq!(timers.len(), 1);
    assert_eq!(
        timers[0].operation,
        TimerOperation::Start {
            id: id.clone(),
            millis: 5000,
        }
    );

    let elapsed = app
        .resolve(&mut timers[0], TimerOutput::Elapsed { id })
        .expect("resolves");
    for event in elapsed.events {
        app.update(event, &mut model);
    }
    assert!(model.ui.notifications.is_empty());
}

#[test]
fn test_dismissed_notification_cancels_timer() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    for message in ["one", "two"] {
        app.update(
            Event::NotificationPosted {
                kind: NotificationKind::Info,
                message: message.into(),
            },
            &mut model,
        );
    }
    let first = model.ui.notifications[0].id.clone();

    let update = app.update(Event::NotificationDismissed { id: first.clone() }, &mut model);
    assert_eq!(model.ui.notifications.len(), 1);
    assert_eq!(
        timer_requests(update.effects)
            .into_iter()
            .map(|r| r.operation)
            .collect::<Vec<_>>(),
        vec![TimerOperation::Cancel {
            id: first.as_str().to_string(),
        }]
    );

    // Dismissing twice cancels nothing.
    let update = app.update(Event::NotificationDismissed { id: first }, &mut model);
    assert!(timer_requests(update.effects).is_empty());

    let update = app.update(Event::NotificationsCleared, &mut model);
    assert!(model.ui.notifications.is_empty());
    assert_eq!(timer_requests(update.effects).len(), 1);
}

#[test]
fn test_login_logout_flow() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::LoginSubmitted {
            email: "demo@doctorai.com".into(),
            password: "wrong".into(),
        },
        &mut model,
    );
    assert!(!model.auth.is_authenticated);
    assert!(!model.auth.is_loading);
    assert_eq!(model.auth.error.as_deref(), Some("Invalid credentials"));

    app.update(
        Event::LoginSubmitted {
            email: "demo@doctorai.com".into(),
            password: "password".into(),
        },
        &mut model,
    );
    assert!(model.auth.is_authenticated);
    assert!(model.auth.error.is_none());
    assert_eq!(model.route, Route::Dashboard);
    assert_eq!(
        app.view(&model).auth.user_name.as_deref(),
        Some("Demo User")
    );

    app.update(Event::LogoutRequested, &mut model);
    assert!(!model.auth.is_authenticated);
    assert!(model.auth.user.is_none());
    assert_eq!(model.route, Route::Home);
}

#[test]
fn test_registration_requires_every_field() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::RegisterPasswordChanged {
            password: "Abcdefg1".into(),
        },
        &mut model,
    );
    assert_eq!(model.pages.register.password_strength, 100);

    app.update(
        Event::RegisterSubmitted {
            name: "  ".into(),
            email: "sam@example.com".into(),
            password: "Abcdefg1".into(),
        },
        &mut model,
    );
    assert!(!model.auth.is_authenticated);
    assert!(model.auth.error.is_some());

    app.update(
        Event::RegisterSubmitted {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            password: "Abcdefg1".into(),
        },
        &mut model,
    );
    assert!(model.auth.is_authenticated);
    assert_eq!(model.auth.user.as_ref().map(|u| u.name.as_str()), Some("Sam"));
}
