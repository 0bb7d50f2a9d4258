//! Test doubles for the HTTP and persistence collaborators.
//!
//! Compiled for unit tests and behind the `test-support` feature so the
//! integration test crate can script the shop API without a network.

#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use url::Url;

use crate::config::ShopApiConfig;
use crate::persistence::{KeyValueStore, StoreError};
use crate::shop::{ApiError, HttpResponse, HttpTransport};

enum Scripted {
    Respond(HttpResponse),
    Fail(String),
    Hang,
}

/// Transport that replays queued responses per endpoint and records every
/// request body.
///
/// Endpoints are keyed by the last path segment of the request URL, e.g.
/// `menu` or `products`. A request with nothing queued fails with
/// `ApiError::Transport`.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn push_json(&self, endpoint: &str, status: u16, body: Value) {
        self.push(
            endpoint,
            Scripted::Respond(HttpResponse::new(status, body.to_string())),
        );
    }

    /// Queue a raw body, for bodies that are not valid JSON.
    pub fn push_raw(&self, endpoint: &str, status: u16, body: &str) {
        self.push(endpoint, Scripted::Respond(HttpResponse::new(status, body)));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, endpoint: &str, message: &str) {
        self.push(endpoint, Scripted::Fail(message.to_string()));
    }

    /// Queue a request that never completes.
    pub fn push_hang(&self, endpoint: &str) {
        self.push(endpoint, Scripted::Hang);
    }

    /// Every request made so far, as `(endpoint, body)`.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().clone()
    }

    /// Bodies sent to one endpoint, in order.
    #[must_use]
    pub fn requests_to(&self, endpoint: &str) -> Vec<Value> {
        self.requests
            .lock()
            .iter()
            .filter(|(name, _)| name == endpoint)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn push(&self, endpoint: &str, scripted: Scripted) {
        self.scripts
            .lock()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(scripted);
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(&self, url: &Url, body: &Value) -> Result<HttpResponse, ApiError> {
        let endpoint = url
            .path_segments()
            .and_then(Iterator::last)
            .unwrap_or_default()
            .to_string();

        self.requests.lock().push((endpoint.clone(), body.clone()));
        let next = self
            .scripts
            .lock()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(ApiError::Transport(message)),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(ApiError::Transport(format!(
                "no scripted response for {endpoint}"
            ))),
        }
    }
}

/// Store whose reads find nothing and whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("writes disabled".to_string()))
    }
}

/// Store whose reads always fail.
#[derive(Debug, Default)]
pub struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("reads disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// API configuration against `http://shop.test/api/` with caching off.
#[must_use]
pub fn test_config() -> ShopApiConfig {
    let mut config = ShopApiConfig::new(
        Url::parse("http://shop.test/api/").expect("static test URL is valid"),
    );
    config.cache_ttl = Duration::ZERO;
    config
}

/// Category response listing `(id, url, name)` entries, plus one non-category
/// entry that decoding must skip.
#[must_use]
pub fn category_menu(entries: &[(&str, &str, &str)]) -> Value {
    let mut menu: Vec<Value> = entries
        .iter()
        .map(|(id, url, name)| json!({"type": "category", "id": id, "url": url, "name": name}))
        .collect();
    menu.push(json!({"type": "link", "id": "99", "url": "sale", "name": "Sale"}));
    json!({"api_data": {"aMenu": menu}})
}

/// Product response with `count` products numbered from `start_id`.
#[must_use]
pub fn product_page(start_id: i64, count: usize) -> Value {
    let products: Vec<Value> = (start_id..)
        .take(count)
        .map(|id| {
            json!({
                "id": id,
                "name": format!("Product {id}"),
                "price": "19.90",
                "photos": [{"big": format!("https://cdn.shop.test/{id}.jpg")}],
                "sizes": {"0": {"name": "S"}, "1": {"name": "M"}}
            })
        })
        .collect();
    json!({"api_data": {"aProduct": products}})
}
