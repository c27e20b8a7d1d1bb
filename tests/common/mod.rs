//! In-process mock of the transactions API for integration tests.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Behaviour of the mock API.
///
/// Serves `total_count` transactions, 10 per page. Transaction `n` (0-based,
/// across all pages) is booked on `2013-12-0{n % 3 + 1}` for `1.01`.
#[derive(Debug, Default)]
pub struct MockApi {
    /// Count advertised in every page body
    pub total_count: u32,
    /// Pages actually served; defaults to what `total_count` implies
    pub served_pages: Option<u32>,
    /// Pages answered with a fixed status instead of a body
    pub failing: HashMap<u32, StatusCode>,
    /// Pages answered with a raw body instead of generated JSON
    pub raw_bodies: HashMap<u32, String>,
    /// Requests received
    pub hits: AtomicUsize,
}

impl MockApi {
    pub fn with_total(total_count: u32) -> Self {
        MockApi {
            total_count,
            ..Default::default()
        }
    }

    pub fn failing(mut self, page: u32, status: StatusCode) -> Self {
        self.failing.insert(page, status);
        self
    }

    pub fn raw_body(mut self, page: u32, body: &str) -> Self {
        self.raw_bodies.insert(page, body.to_string());
        self
    }

    pub fn serving_pages(mut self, pages: u32) -> Self {
        self.served_pages = Some(pages);
        self
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn page_body(&self, index: u32) -> String {
        let start = (index - 1) * 10;
        let end = (start + 10).min(self.total_count);
        let transactions: Vec<_> = (start..end)
            .map(|n| {
                json!({
                    "Date": format!("2013-12-0{}", n % 3 + 1),
                    "Ledger": "Office Expense",
                    "Amount": "1.01",
                    "Company": format!("COMPANY {}", n),
                })
            })
            .collect();

        json!({
            "totalCount": self.total_count,
            "page": index,
            "transactions": transactions,
        })
        .to_string()
    }
}

async fn serve_page(State(api): State<Arc<MockApi>>, Path(file): Path<String>) -> Response {
    api.hits.fetch_add(1, Ordering::SeqCst);

    let Some(index) = file.strip_suffix(".json").and_then(|n| n.parse::<u32>().ok()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(status) = api.failing.get(&index) {
        return (*status).into_response();
    }
    if let Some(body) = api.raw_bodies.get(&index) {
        return body.clone().into_response();
    }

    let served = api.served_pages.unwrap_or_else(|| api.total_count.div_ceil(10).max(1));
    if index == 0 || index > served {
        return StatusCode::NOT_FOUND.into_response();
    }

    api.page_body(index).into_response()
}

fn router(api: Arc<MockApi>) -> Router {
    Router::new().route("/{file}", get(serve_page)).with_state(api)
}

/// Starts the mock on the current runtime and returns its base URL.
pub async fn spawn_server(api: Arc<MockApi>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(api)).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Starts the mock on its own thread and runtime, for tests that block.
pub fn spawn_server_blocking(api: Arc<MockApi>) -> String {
    let (url_tx, url_rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            url_tx.send(format!("http://{}", addr)).unwrap();
            axum::serve(listener, router(api)).await.unwrap();
        });
    });
    url_rx.recv().unwrap()
}
