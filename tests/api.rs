use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use pomodoro_server::{
    create_router,
    services::{FileStore, ManualClock, MemoryStore, Silent, SettingsStore},
    state::{AppState, Settings, TickReceiver, TimerController, SETTINGS_KEY},
};

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    clock: Arc<ManualClock>,
    ticks: TickReceiver,
}

impl TestApp {
    fn with_store(store: Arc<dyn SettingsStore>) -> Self {
        let clock = Arc::new(ManualClock::new());
        let (controller, ticks) = TimerController::new(store, clock.clone(), Arc::new(Silent));
        let state = Arc::new(AppState::new(controller, 20554, "127.0.0.1".to_string()));
        Self {
            router: create_router(Arc::clone(&state)),
            state,
            clock,
            ticks,
        }
    }

    fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn advance(&mut self, n: u64) {
        for _ in 0..n {
            self.clock.fire();
            while let Ok(generation) = self.ticks.try_recv() {
                self.state.tick(generation).unwrap();
            }
        }
    }
}

#[tokio::test]
async fn status_reports_initial_work_session() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["mode"], "work");
    assert_eq!(body["timer"]["modeLabel"], "Work Session");
    assert_eq!(body["timer"]["display"], "25:00");
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["title"], "Pomodoro Timer");
    assert_eq!(body["settings"], json!({"work": 25, "shortBreak": 5, "longBreak": 15}));
    assert_eq!(body["lastAction"], Value::Null);
}

#[tokio::test]
async fn toggle_runs_and_pauses_countdown() {
    let mut app = TestApp::new();

    let (_, body) = app.call("POST", "/toggle", None).await;
    assert_eq!(body["running"], true);

    app.advance(61);
    let (_, body) = app.call("GET", "/status", None).await;
    assert_eq!(body["timer"]["display"], "23:59");
    assert_eq!(body["timer"]["title"], "23:59 - Work | Pomodoro Timer");
    assert_eq!(body["lastAction"], "toggle");

    let (_, body) = app.call("POST", "/toggle", None).await;
    assert_eq!(body["running"], false);
    assert_eq!(app.clock.active(), 0);
}

#[tokio::test]
async fn start_twice_keeps_one_tick_source() {
    let app = TestApp::new();
    app.call("POST", "/start", None).await;
    app.call("POST", "/start", None).await;
    assert_eq!(app.clock.active(), 1);

    app.call("POST", "/pause", None).await;
    let (_, body) = app.call("POST", "/pause", None).await;
    assert_eq!(body["running"], false);
    assert_eq!(app.clock.active(), 0);
}

#[tokio::test]
async fn completed_work_session_moves_to_short_break() {
    let mut app = TestApp::new();
    let mut events = app.state.subscribe_events().unwrap();

    app.call("POST", "/start", None).await;
    app.advance(1500);

    let (_, body) = app.call("GET", "/status", None).await;
    assert_eq!(body["timer"]["mode"], "shortBreak");
    assert_eq!(body["timer"]["remainingSeconds"], 300);
    assert_eq!(body["timer"]["running"], false);

    let mut completed = 0;
    while let Ok(event) = events.try_recv() {
        let event = serde_json::to_value(event).unwrap();
        if event["type"] == "completed" {
            completed += 1;
            assert_eq!(event["message"], "Work session completed! Time for a break.");
        }
    }
    assert_eq!(completed, 1);
}

#[tokio::test]
async fn long_break_is_reachable_by_explicit_selection() {
    let app = TestApp::new();
    let (status, body) = app.call("POST", "/mode/longBreak", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "longBreak");
    assert_eq!(body["display"], "15:00");

    let (status, body) = app.call("POST", "/mode/siesta", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "unknown timer mode: siesta");
}

#[tokio::test]
async fn reset_restores_current_mode() {
    let mut app = TestApp::new();
    app.call("POST", "/mode/shortBreak", None).await;
    app.call("POST", "/start", None).await;
    app.advance(30);

    let (_, body) = app.call("POST", "/reset", None).await;
    assert_eq!(body["mode"], "shortBreak");
    assert_eq!(body["remainingSeconds"], 300);
    assert_eq!(body["running"], false);
}

#[tokio::test]
async fn settings_are_clamped_and_applied() {
    let app = TestApp::new();
    let (status, body) = app
        .call("PUT", "/settings", Some(json!({"work": 999, "shortBreak": "abc", "longBreak": 0})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["committed"], true);
    assert_eq!(body["settings"], json!({"work": 60, "shortBreak": 5, "longBreak": 1}));

    let (_, body) = app.call("GET", "/status", None).await;
    assert_eq!(body["timer"]["display"], "60:00");

    let (_, body) = app.call("GET", "/settings", None).await;
    assert_eq!(body["settings"]["work"], 60);
}

#[tokio::test]
async fn settings_body_that_is_not_an_object_uses_defaults() {
    let app = TestApp::new();
    app.call("PUT", "/settings", Some(json!({"work": 40, "shortBreak": 10, "longBreak": 20})))
        .await;

    for body in [json!("forty"), json!(12), json!(null)] {
        let (status, body) = app.call("PUT", "/settings", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["settings"], json!({"work": 25, "shortBreak": 5, "longBreak": 15}));
    }

    let request = Request::builder()
        .method("PUT")
        .uri("/settings")
        .body(Body::from("work=40"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn stored_record_with_out_of_range_values_is_clamped() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(SETTINGS_KEY, r#"{"work":-5,"shortBreak":10,"longBreak":5000000000}"#)
        .unwrap();

    let app = TestApp::with_store(store);
    let (_, body) = app.call("GET", "/settings", None).await;
    assert_eq!(body["settings"], json!({"work": 1, "shortBreak": 10, "longBreak": 60}));
}

#[tokio::test]
async fn restoring_defaults_only_stages_them() {
    let app = TestApp::new();
    app.call("PUT", "/settings", Some(json!({"work": 40, "shortBreak": 10, "longBreak": 20})))
        .await;

    let (_, body) = app.call("POST", "/settings/defaults", None).await;
    assert_eq!(body["committed"], false);
    assert_eq!(body["settings"], json!({"work": 25, "shortBreak": 5, "longBreak": 15}));

    let (_, body) = app.call("GET", "/settings", None).await;
    assert_eq!(body["settings"]["work"], 40);
}

#[tokio::test]
async fn settings_persist_across_restarts() {
    let dir = tempfile::tempdir().unwrap();

    let first = TestApp::with_store(Arc::new(FileStore::new(dir.path()).unwrap()));
    first
        .call("PUT", "/settings", Some(json!({"work": "50", "shortBreak": 10, "longBreak": 30})))
        .await;
    drop(first);

    let second = TestApp::with_store(Arc::new(FileStore::new(dir.path()).unwrap()));
    let (_, body) = second.call("GET", "/status", None).await;
    assert_eq!(body["settings"], json!({"work": 50, "shortBreak": 10, "longBreak": 30}));
    assert_eq!(body["timer"]["display"], "50:00");
}

#[tokio::test]
async fn corrupt_settings_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    store.set(SETTINGS_KEY, "{\"work\": 3").unwrap();

    let app = TestApp::with_store(Arc::new(store));
    let (_, body) = app.call("GET", "/settings", None).await;
    let settings: Settings = serde_json::from_value(body["settings"].clone()).unwrap();
    assert_eq!(settings, Settings::factory());
}

#[tokio::test]
async fn health_check() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
