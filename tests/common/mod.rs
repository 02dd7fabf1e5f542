#![allow(dead_code)]

//! Shared test fixtures: in-memory repositories and app construction.
//!
//! Handler tests run the real router against these fakes, so the full
//! middleware + handler + service stack is exercised without a database.

use async_trait::async_trait;
use axum::Router;
use axum::extract::ConnectInfo;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tower::Layer;

use linkcut::application::services::{AnalyticsService, AuthService, LinkService, ResolverService};
use linkcut::domain::click_event::ClickEvent;
use linkcut::domain::entities::{Click, DeviceClass, Link, LinkStatus, NewClick, NewLink};
use linkcut::domain::repositories::{
    ApiKey, ClickRepository, CreateOutcome, KeyRepository, LinkRepository,
};
use linkcut::error::AppError;
use linkcut::state::AppState;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://lcut.test";

// ── In-memory repositories ──────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryLinkRepository {
    rows: Mutex<HashMap<String, Link>>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn get(&self, code: &str) -> Option<Link> {
        self.rows.lock().unwrap().get(code).cloned()
    }

    /// Inserts a row directly, assigning the next id in sequence.
    pub fn seed(&self, mut link: Link) {
        link.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().unwrap().insert(link.code.clone(), link);
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<CreateOutcome, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&new_link.code) {
            return Ok(CreateOutcome::AlreadyExists);
        }

        let link = Link::new(
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            new_link.code.clone(),
            new_link.long_url,
            LinkStatus::Active,
            0,
            new_link.owner,
            new_link.credential,
            Utc::now(),
        );
        rows.insert(new_link.code, link.clone());
        Ok(CreateOutcome::Created(link))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.rows.lock().unwrap().get(code).cloned())
    }

    async fn increment_usage(&self, code: &str) -> Result<Option<i64>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(code).map(|link| {
            link.usage_count += 1;
            link.usage_count
        }))
    }

    async fn list_by_owner(
        &self,
        owner: &str,
        limit: i64,
        after: Option<i64>,
    ) -> Result<Vec<Link>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut links: Vec<Link> = rows
            .values()
            .filter(|l| l.owner.as_deref() == Some(owner))
            .filter(|l| after.is_none_or(|cursor| l.id < cursor))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.id.cmp(&a.id));
        links.truncate(limit as usize);
        Ok(links)
    }

    async fn set_status(&self, code: &str, status: LinkStatus) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(code) {
            Some(link) => {
                link.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryClickRepository {
    rows: Mutex<Vec<Click>>,
}

impl InMemoryClickRepository {
    pub fn all(&self) -> Vec<Click> {
        self.rows.lock().unwrap().clone()
    }

    pub fn seed(&self, click: Click) {
        self.rows.lock().unwrap().push(click);
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<(), AppError> {
        self.rows.lock().unwrap().push(Click {
            code: new_click.code,
            clicked_at: new_click.clicked_at,
            referrer: new_click.referrer,
            user_agent: new_click.user_agent,
            ip: new_click.ip,
            country: new_click.country,
            device: new_click.device,
            owner: new_click.owner,
        });
        Ok(())
    }

    async fn list_for_code_since(
        &self,
        code: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Click>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.code == code && c.clicked_at >= since)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryKeyRepository {
    rows: Mutex<HashMap<String, ApiKey>>,
}

#[async_trait]
impl KeyRepository for InMemoryKeyRepository {
    async fn resolve(&self, key_hash: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(key_hash)
            .filter(|k| !k.revoked)
            .map(|k| k.owner.clone()))
    }

    async fn touch(&self, _key_hash: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn register(&self, key_hash: &str, owner: &str, label: &str) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(key_hash) {
            return Err(AppError::conflict(
                "API key already registered",
                serde_json::json!({}),
            ));
        }
        rows.insert(
            key_hash.to_string(),
            ApiKey {
                key_hash: key_hash.to_string(),
                owner: owner.to_string(),
                label: label.to_string(),
                revoked: false,
            },
        );
        Ok(())
    }

    async fn revoke(&self, key_hash: &str) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(key_hash) {
            Some(key) if !key.revoked => {
                key.revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ApiKey>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|k| k.owner == owner)
            .cloned()
            .collect())
    }
}

// ── App construction ────────────────────────────────────────────────────────

pub struct TestApp {
    pub state: AppState,
    pub links: Arc<InMemoryLinkRepository>,
    pub clicks: Arc<InMemoryClickRepository>,
    pub keys: Arc<InMemoryKeyRepository>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
}

/// Builds an app over in-memory repositories, returning the click queue
/// receiver so tests can assert on (or drain into) the ledger.
pub fn test_app() -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::default());
    let clicks = Arc::new(InMemoryClickRepository::default());
    let keys = Arc::new(InMemoryKeyRepository::default());

    let (click_tx, click_rx) = mpsc::channel(100);

    let state = AppState {
        link_service: Arc::new(LinkService::new(
            links.clone(),
            BASE_URL.to_string(),
            6,
            8,
        )),
        resolver: Arc::new(ResolverService::new(links.clone(), click_tx.clone())),
        analytics_service: Arc::new(AnalyticsService::new(links.clone(), clicks.clone(), 30)),
        auth_service: Arc::new(AuthService::new(keys.clone(), SIGNING_SECRET.to_string())),
        click_tx,
        db: None,
        base_url: BASE_URL.to_string(),
        behind_proxy: false,
    };

    TestApp {
        state,
        links,
        clicks,
        keys,
        click_rx,
    }
}

impl TestApp {
    /// The full route tree with a fake peer address injected.
    pub fn router(&self) -> Router {
        linkcut::routes::router(self.state.clone()).layer(MockConnectInfoLayer)
    }

    /// Registers a raw API credential resolving to `owner`.
    pub async fn seed_key(&self, raw_key: &str, owner: &str) {
        let hash = self.state.auth_service.hash_credential(raw_key);
        self.keys.register(&hash, owner, "test").await.unwrap();
    }

    /// Inserts a link row directly into the store.
    pub fn seed_link(&self, code: &str, long_url: &str, status: LinkStatus, owner: Option<&str>) {
        self.links.seed(Link::new(
            0,
            code.to_string(),
            long_url.to_string(),
            status,
            0,
            owner.map(|o| o.to_string()),
            "seed".to_string(),
            Utc::now(),
        ));
    }

    /// Appends a click directly to the ledger.
    pub fn seed_click(
        &self,
        code: &str,
        country: Option<&str>,
        referrer: &str,
        device: DeviceClass,
        clicked_at: DateTime<Utc>,
    ) {
        self.clicks.seed(Click {
            code: code.to_string(),
            clicked_at,
            referrer: referrer.to_string(),
            user_agent: None,
            ip: None,
            country: country.map(|c| c.to_string()),
            device,
            owner: None,
        });
    }

    /// Spawns the background worker so enqueued events land in the ledger.
    /// Consumes the receiver; use `click_rx` assertions or this, not both.
    pub fn spawn_click_worker(self) -> (AppState, Arc<InMemoryClickRepository>) {
        let TestApp {
            state,
            clicks,
            click_rx,
            ..
        } = self;
        tokio::spawn(linkcut::domain::click_worker::run_click_worker(
            click_rx,
            clicks.clone(),
        ));
        (state, clicks)
    }
}

/// Route tree for a state whose `TestApp` has been consumed.
pub fn router_for(state: AppState) -> Router {
    linkcut::routes::router(state).layer(MockConnectInfoLayer)
}

// ── ConnectInfo shim ────────────────────────────────────────────────────────

/// Injects a fixed peer address so extractors and the rate limiter work
/// without a real TCP connection.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
