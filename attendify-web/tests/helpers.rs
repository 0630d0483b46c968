//! Integration test helpers
//!
//! Spawns the full application on a random port with an in-memory sink and a
//! clock the test can move forward.

#![allow(dead_code)]

use attendify_core::{AttendanceRecord, AttendifyConfig, Clock, MemorySink};
use attendify_web::{create_app, AppState};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, LazyLock};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const BASE_URL: &str = "https://attend.example.edu";

// Ensure tracing is only initialized once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// Clock that only moves when told to
#[derive(Clone)]
pub struct ManualClock {
    start: DateTime<Utc>,
    offset_ms: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Utc::now(),
            offset_ms: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_ms
            .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.start + Duration::milliseconds(self.offset_ms.load(Ordering::SeqCst))
    }
}

/// Running test application
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub clock: ManualClock,
    pub sink: MemorySink,
    pub static_dir: TempDir,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Start a session, optionally for a subject
    pub async fn post_generate_token(&self, subject: Option<&str>) -> reqwest::Response {
        let request = self
            .api_client
            .post(format!("{}/generate_token", &self.address));
        let request = match subject {
            Some(subject) => request.json(&json!({ "subject": subject })),
            None => request,
        };
        request.send().await.expect("Failed to execute request.")
    }

    /// Start a session and return its token
    pub async fn start_session(&self, subject: Option<&str>) -> String {
        let body: serde_json::Value = self
            .post_generate_token(subject)
            .await
            .json()
            .await
            .expect("Invalid generate_token response");
        body["token"]
            .as_str()
            .expect("token missing from response")
            .to_string()
    }

    pub async fn post_mark_attendance(
        &self,
        token: &str,
        name: &str,
        roll: &str,
    ) -> serde_json::Value {
        self.api_client
            .post(format!("{}/mark_attendance", &self.address))
            .json(&json!({ "token": token, "student_name": name, "roll": roll }))
            .send()
            .await
            .expect("Failed to execute request.")
            .json()
            .await
            .expect("Invalid mark_attendance response")
    }

    /// Wait for the background sink task to deliver `count` rows
    pub async fn wait_for_records(&self, count: usize) -> Vec<AttendanceRecord> {
        for _ in 0..50 {
            let records = self.sink.records().await;
            if records.len() >= count {
                return records;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        self.sink.records().await
    }
}

/// Start the application with default session settings
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Start the application after adjusting its configuration
pub async fn spawn_app_with<F>(configure: F) -> TestApp
where
    F: FnOnce(&mut AttendifyConfig),
{
    LazyLock::force(&TRACING);

    let static_dir = tempfile::tempdir().expect("Failed to create static dir");
    std::fs::write(
        static_dir.path().join("teacher.html"),
        "<html><body>Teacher</body></html>",
    )
    .expect("Failed to write teacher page");

    let mut config = AttendifyConfig {
        public_base_url: Some(BASE_URL.to_string()),
        ..Default::default()
    };
    config.server.host = "127.0.0.1".to_string();
    config.server.static_dir = static_dir.path().to_string_lossy().into_owned();
    configure(&mut config);

    let clock = ManualClock::new();
    let sink = MemorySink::new();
    let state = AppState::with_parts(config, Arc::new(sink.clone()), Arc::new(clock.clone()))
        .expect("Failed to build application state");
    let app = create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client: client,
        clock,
        sink,
        static_dir,
    }
}

/// Assert the response redirects to `location`
pub fn assert_is_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}
