#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
pub mod agent;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod session;
pub mod types;

pub use crate::agent::{AgentBuilder, PageantAgent};
pub use crate::error::{Error, Result};
pub use crate::gateway::{Gateway, GatewayHooks, Notification, NotificationLevel};
pub use crate::session::Session;
pub use pageant_common as common;
pub use pageant_http as http_api;

#[cfg(test)]
pub(crate) mod tests {
    use http::{Request, Response, StatusCode};
    use pageant_http::{ApiClient, HttpClient};
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    /// A canned answer of [`MockClient`].
    #[derive(Debug, Clone)]
    pub(crate) struct MockResponse {
        status: u16,
        content_type: Option<&'static str>,
        body: String,
    }

    impl MockResponse {
        pub(crate) fn json(status: u16, body: &str) -> Self {
            Self { status, content_type: Some("application/json"), body: body.into() }
        }
        pub(crate) fn text(status: u16, body: &str) -> Self {
            Self { status, content_type: Some("text/html"), body: body.into() }
        }
        pub(crate) fn no_content() -> Self {
            Self { status: 204, content_type: None, body: String::new() }
        }
    }

    /// Answers by request path. Each path serves its responses in order and
    /// repeats the last one. Unknown paths get a 404.
    #[derive(Default)]
    pub(crate) struct MockClient {
        routes: Mutex<HashMap<String, VecDeque<MockResponse>>>,
        unreachable: bool,
        pub(crate) requests: Arc<Mutex<Vec<Request<Vec<u8>>>>>,
    }

    impl MockClient {
        pub(crate) fn refresh(response: MockResponse) -> Self {
            Self::default().route("auth/refresh/", response)
        }
        pub(crate) fn sequence(responses: Vec<MockResponse>) -> Self {
            let client = Self::default();
            client.routes.lock().unwrap().insert("auth/refresh/".into(), responses.into());
            client
        }
        pub(crate) fn unreachable() -> Self {
            Self { unreachable: true, ..Default::default() }
        }
        pub(crate) fn route(self, path: &str, response: MockResponse) -> Self {
            self.routes.lock().unwrap().entry(path.into()).or_default().push_back(response);
            self
        }
        fn next_response(&self, path: &str) -> Option<MockResponse> {
            let mut routes = self.routes.lock().unwrap();
            let queue = routes.get_mut(path.trim_start_matches('/'))?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        }
    }

    impl HttpClient for MockClient {
        async fn send_http(
            &self,
            request: Request<Vec<u8>>,
        ) -> Result<Response<Vec<u8>>, Box<dyn std::error::Error + Send + Sync + 'static>> {
            tokio::time::sleep(std::time::Duration::from_micros(10)).await;

            let path = request.uri().path().to_string();
            self.requests.lock().unwrap().push(request);
            if self.unreachable {
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )));
            }
            let response = self
                .next_response(&path)
                .unwrap_or_else(|| MockResponse::json(404, r#"{"detail":"Not found."}"#));
            let mut builder = Response::builder().status(StatusCode::from_u16(response.status)?);
            if let Some(content_type) = response.content_type {
                builder = builder.header(http::header::CONTENT_TYPE, content_type);
            }
            Ok(builder.body(response.body.into_bytes())?)
        }
    }

    impl ApiClient for MockClient {
        fn base_uri(&self) -> String {
            "http://localhost:8000".into()
        }
    }
}
