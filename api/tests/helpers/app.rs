use api::routes::routes;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use db::test_utils::setup_test_db;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;
use util::{state::AppState, test_helpers::setup_test_storage_root};

/// A router over a fresh in-memory database and a temporary storage root.
///
/// Tests using it must be `#[serial]`, since the storage root is global configuration.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Keeps the storage root alive.
    pub _storage: TempDir,
}

pub async fn make_test_app() -> TestApp {
    let storage = setup_test_storage_root();
    let state = AppState::new(setup_test_db().await);
    let router = Router::new().nest("/api", routes(state.clone()));
    TestApp {
        router,
        state,
        _storage: storage,
    }
}

impl TestApp {
    /// Place a response file at `submissions/{assignment}/{student_id}/{file}`.
    pub fn submit(&self, assignment: &str, student_id: i64, file: &str, contents: &str) {
        let dir = util::paths::submissions_root()
            .join(assignment)
            .join(student_id.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), contents).unwrap();
    }

    /// Send a request and return its status with the decoded JSON body (`Null` if empty).
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
