#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use tokio::sync::Notify;
use tower::ServiceExt;
use uuid::Uuid;

use patrimonio::common::cache::AssetCache;
use patrimonio::common::error::AppError;
use patrimonio::db::{MemoryStore, Store, UnitOfWork};
use patrimonio::models::asset::{Asset, NewAsset};
use patrimonio::models::catalog::{Category, Location, NewCategory, NewLocation};
use patrimonio::{build_router, AppState};

/// Estado completo sobre o armazenamento em memória, já com uma categoria
/// e uma localização cadastradas.
pub struct TestContext {
    pub state: AppState,
    pub category: Category,
    pub location: Location,
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub async fn setup() -> TestContext {
    setup_with_store(Arc::new(MemoryStore::new())).await
}

/// Mesmo cenário inicial sobre qualquer `Store` (memória, Postgres, com portão).
pub async fn setup_with_store(store: Arc<dyn Store>) -> TestContext {
    let cache = AssetCache::new(100, Duration::from_secs(60));
    let state = AppState::from_store(store, cache);

    let category = state
        .catalog_service
        .create_category(NewCategory {
            name: "Informática".into(),
            description: None,
        })
        .await
        .unwrap();
    let location = state
        .catalog_service
        .create_location(NewLocation {
            name: "Sala 101".into(),
            address: None,
            responsible: None,
        })
        .await
        .unwrap();

    TestContext { state, category, location }
}

impl TestContext {
    pub fn new_asset(&self, tag_number: &str) -> NewAsset {
        NewAsset {
            tag_number: tag_number.into(),
            serial_number: None,
            name: format!("Notebook {tag_number}"),
            description: None,
            acquisition_date: today(),
            acquisition_value: money(100000),
            current_value: None,
            condition: None,
            category_id: self.category.id,
            location_id: self.location.id,
            next_maintenance_date: None,
            observations: None,
        }
    }

    /// Cadastra um bem ACTIVE com valor de aquisição 1000.00.
    pub async fn create_asset(&self, tag_number: &str) -> Asset {
        self.state
            .asset_service
            .create_asset(self.new_asset(tag_number))
            .await
            .unwrap()
    }

    pub async fn reload(&self, id: Uuid) -> Asset {
        self.state.asset_service.find_by_id(id).await.unwrap()
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }
}

/// Envia uma requisição ao router e devolve status + corpo JSON (Null se vazio).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// `Store` sobre a memória que, quando armado, segura a próxima unidade de
/// trabalho logo depois do snapshot. Serve para intercalar duas operações:
///
/// ```ignore
/// gate.arm();
/// let slow = tokio::spawn(async move { service.op().await });
/// gate.paused().await;   // `slow` já leu o estado antigo
/// /* outra operação confirma aqui */
/// gate.resume();
/// ```
#[derive(Clone, Default)]
pub struct GatedStore {
    inner: MemoryStore,
    armed: Arc<AtomicBool>,
    paused: Arc<Notify>,
    resume: Arc<Notify>,
}

impl GatedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Só a próxima chamada a `begin` fica retida.
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub async fn paused(&self) {
        self.paused.notified().await;
    }

    pub fn resume(&self) {
        self.resume.notify_one();
    }
}

#[async_trait]
impl Store for GatedStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let uow = self.inner.begin().await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.paused.notify_one();
            self.resume.notified().await;
        }
        Ok(uow)
    }
}
