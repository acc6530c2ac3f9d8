//! Shared test harness: in-memory collaborator fakes plus the production
//! router, so HTTP tests exercise the same middleware stack and handler
//! wiring as `main.rs`.

use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use tower::ServiceExt;

use vodify_core::traits::{
    ContentStore, ConversionStatusRecord, EventContext, EventDirectory, NewVideo,
    NotificationDispatcher, NotificationError, PublishedVideo, StatusStore, StoredThumbnail,
    ThumbnailError, ThumbnailProvider,
};
use vodify_core::types::DbId;
use vodify_core::{
    CompletionDetails, ContentMaterializer, ConversionService, ConversionStatus, CoreError,
};

use vodify_api::config::ServerConfig;
use vodify_api::converter::{ConversionJob, ConverterError, JobSubmitter};
use vodify_api::router::build_app_router;
use vodify_api::state::AppState;

pub const TEST_TOKEN: &str = "secret-token";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStatusStore {
    records: Mutex<HashMap<DbId, ConversionStatusRecord>>,
}

impl MemoryStatusStore {
    pub fn get(&self, event_instance_id: DbId) -> Option<ConversionStatusRecord> {
        self.records.lock().unwrap().get(&event_instance_id).cloned()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn get_or_create(
        &self,
        event_instance_id: DbId,
    ) -> Result<ConversionStatusRecord, CoreError> {
        let mut records = self.records.lock().unwrap();
        let next_id = records.len() as DbId + 1;
        Ok(records
            .entry(event_instance_id)
            .or_insert_with(|| ConversionStatusRecord {
                id: next_id,
                event_instance_id,
                status: ConversionStatus::Requested,
                details: String::new(),
                video_id: None,
                changed_at: Utc::now(),
            })
            .clone())
    }

    async fn save(&self, record: &ConversionStatusRecord) -> Result<(), CoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.event_instance_id, record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryContentStore {
    created: Mutex<Vec<NewVideo>>,
}

impl MemoryContentStore {
    pub fn created(&self) -> Vec<NewVideo> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn create_video(&self, video: NewVideo) -> Result<PublishedVideo, CoreError> {
        let mut created = self.created.lock().unwrap();
        created.push(video.clone());
        Ok(PublishedVideo {
            id: created.len() as DbId + 100,
            title: video.title,
            media_asset_id: created.len() as DbId + 500,
        })
    }
}

pub struct StaticEvents {
    pub context: Option<EventContext>,
}

#[async_trait]
impl EventDirectory for StaticEvents {
    async fn find(&self, _event_instance_id: DbId) -> Result<Option<EventContext>, CoreError> {
        Ok(self.context.clone())
    }
}

pub struct NoThumbnails;

#[async_trait]
impl ThumbnailProvider for NoThumbnails {
    async fn prepare_thumbnail(
        &self,
        _details: &CompletionDetails,
    ) -> Result<Option<StoredThumbnail>, ThumbnailError> {
        Ok(None)
    }
}

#[derive(Default)]
pub struct CountingNotifier {
    pub sent: AtomicUsize,
}

#[async_trait]
impl NotificationDispatcher for CountingNotifier {
    async fn video_published(&self, _video: &PublishedVideo) -> Result<(), NotificationError> {
        self.sent.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSubmitter {
    jobs: Mutex<Vec<ConversionJob>>,
    pub fail: bool,
}

impl RecordingSubmitter {
    pub fn jobs(&self) -> Vec<ConversionJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSubmitter for RecordingSubmitter {
    async fn submit(&self, job: &ConversionJob) -> Result<(), ConverterError> {
        if self.fail {
            return Err(ConverterError::Api {
                status: 503,
                body: "converter is down".into(),
            });
        }
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and the test token.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        public_base_url: "http://localhost:3000".to_string(),
        webhook_token: TEST_TOKEN.to_string(),
        converter_url: "http://converter.test/jobs".to_string(),
        preroll_video_id: Some("111".to_string()),
        postroll_video_id: None,
        notification_recipients: vec![],
        notification_template: "Video {name}: {edit_url}".to_string(),
        thumbnail_dir: "/tmp/vodify-test-thumbnails".to_string(),
        vimeo_access_token: None,
    }
}

/// A default event context. The empty `stream_url` keeps prefill from
/// attempting any video-host lookup in tests.
pub fn test_event_context() -> EventContext {
    EventContext {
        series_title: "Morning Yoga".to_string(),
        host_name: "Jo Doe".to_string(),
        description: "A gentle start to the day.".to_string(),
        category_ids: vec![3, 7],
        equipment_ids: vec![12],
        level_id: Some(4),
        stream_url: String::new(),
        starts_at: Utc::now(),
    }
}

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStatusStore>,
    pub content: Arc<MemoryContentStore>,
    pub notifier: Arc<CountingNotifier>,
    pub submitter: Arc<RecordingSubmitter>,
}

/// Build the application with default fakes.
pub fn build_test_app() -> TestApp {
    build_test_app_opts(Some(test_event_context()), false)
}

/// Build the application, controlling the known event context and whether
/// converter submission fails.
pub fn build_test_app_opts(context: Option<EventContext>, submit_fails: bool) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStatusStore::default());
    let content = Arc::new(MemoryContentStore::default());
    let notifier = Arc::new(CountingNotifier::default());
    let submitter = Arc::new(RecordingSubmitter {
        fail: submit_fails,
        ..Default::default()
    });
    let events: Arc<dyn EventDirectory> = Arc::new(StaticEvents { context });

    let materializer =
        ContentMaterializer::new(content.clone(), events.clone(), Arc::new(NoThumbnails));
    let service = Arc::new(ConversionService::new(
        store.clone(),
        materializer,
        notifier.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        service,
        events,
        submitter: submitter.clone(),
        vimeo: None,
    };

    TestApp {
        app: build_app_router(state, &config),
        store,
        content,
        notifier,
        submitter,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_form(app: Router, uri: &str, body: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a response status, consuming the response into its JSON body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
