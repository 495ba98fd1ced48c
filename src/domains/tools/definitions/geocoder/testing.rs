//! In-process stand-in for the upstream geocoder, used by tests.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::client::GeocoderClient;
use crate::core::config::GeocoderConfig;

/// A request observed by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub accept: Option<String>,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: String,
    delay: Duration,
}

#[derive(Clone)]
struct MockState {
    reply: Reply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Serves one canned reply for every request and records what it received.
pub struct MockUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn start(status: u16, content_type: Option<&'static str>, body: &str) -> Self {
        Self::spawn(Reply {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body: body.to_string(),
            delay: Duration::ZERO,
        })
        .await
    }

    pub async fn json(body: &str) -> Self {
        Self::start(200, Some("application/json"), body).await
    }

    pub async fn delayed(delay: Duration) -> Self {
        Self::spawn(Reply {
            status: StatusCode::OK,
            content_type: Some("application/json"),
            body: "{}".to_string(),
            delay,
        })
        .await
    }

    async fn spawn(reply: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            requests: requests.clone(),
        };

        let app = Router::new().fallback(respond).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Geocoder config pointing at this mock.
    pub fn config(&self) -> GeocoderConfig {
        GeocoderConfig {
            base_url: format!("{}/", self.base_url),
            geocode_prefix: "/geo/".to_string(),
            reverse_prefix: "rev".to_string(),
            router_prefix: "/route/dijkstra".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A client wired to the mock upstream.
pub fn client_for(upstream: &MockUpstream) -> GeocoderClient {
    GeocoderClient::new(upstream.config()).unwrap()
}

async fn respond(State(state): State<MockState>, request: Request<Body>) -> Response {
    let uri = request.uri();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: request.method().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        accept: request
            .headers()
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    let mut response = (state.reply.status, state.reply.body.clone()).into_response();
    match state.reply.content_type {
        Some(ct) => {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }
    response
}
