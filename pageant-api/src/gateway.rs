//! The authenticated-request gateway.
//!
//! Every protected operation goes through [`Gateway::run`]: the access token is
//! refreshed first, and the operation only runs once a fresh token is in the
//! store. The refresh ends in one of these outcomes:
//!
//! | backend answer            | store                 | hooks                                      | operation |
//! |---------------------------|-----------------------|--------------------------------------------|-----------|
//! | ok, `status: true`        | new `access_token`    | `on_session_refreshed`, info notification  | runs      |
//! | ok, `status: false`       | cleared               | `on_session_invalid`, error notification   | skipped   |
//! | non-success HTTP status   | untouched             | error notification                         | skipped   |
//! | transport/decoding failure| untouched             | error notification, `on_signed_out`        | skipped   |
//! | ok, any other `status`    | untouched             | none                                       | skipped   |
//!
//! Nothing is retried. Concurrent runs are not coordinated: each one sends its
//! own refresh and the last response to arrive decides the stored token.
use crate::session::{ACCESS_TOKEN, REFRESH_TOKEN};
use crate::endpoints;
use http::{Method, StatusCode};
use pageant_common::store::Store;
use pageant_http::{ApiClient, ApiRequest, OutputDataOrBytes};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a gateway run ended without running the operation.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend rejected the refresh token. The store has been cleared.
    #[error("session is no longer valid: {}", title.as_deref().unwrap_or("logged out"))]
    SessionInvalid { title: Option<String>, message: Option<String> },
    /// The refresh endpoint answered with a non-success status.
    #[error("token refresh failed with status {status}")]
    Transport { status: StatusCode },
    /// The refresh request could not be sent or its response could not be read.
    #[error("token refresh could not reach the server: {0}")]
    Network(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// The refresh endpoint answered with a body the gateway does not understand.
    #[error("token refresh returned an unreadable response: {0}")]
    Decode(String),
    /// The refresh endpoint answered without saying whether the session is valid.
    #[error("token refresh answered without a session status: {status:?}")]
    Inconclusive { status: Option<Value> },
    /// The store failed while reading or writing the session. When this comes
    /// from clearing a rejected session, the stale tokens may still be stored.
    #[error("session store error: {0}")]
    SessionStore(Box<dyn std::error::Error + Send + Sync + 'static>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A user-facing message emitted by the gateway.
///
/// Notifications carry no expiry; how long one stays visible is up to whoever
/// displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub details: Vec<String>,
}

impl Notification {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            message: message.into(),
            details: Vec::new(),
        }
    }
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: message.into(),
            details: Vec::new(),
        }
    }
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
    fn still_logged_in() -> Self {
        Self::info("Hey Just Checking...", "Yeah you're still logged in")
            .with_detail("Ignore this message and continue cruising")
    }
    fn refresh_failed(status: StatusCode) -> Self {
        Self::error(
            format!("Authentication Failed With Code {}", status.as_u16()),
            status.canonical_reason().unwrap_or_default(),
        )
    }
    fn unreachable() -> Self {
        Self::error("Could Not Authenticate", "Please Check Your Connection")
            .with_detail("You Can Try To Login Again")
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        for detail in self.details.iter().filter(|d| !d.is_empty()) {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// The payload of a successful refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshedSession {
    pub access_token: String,
    /// The full response body, `access_token` and `status` included.
    pub payload: Map<String, Value>,
}

type Hook<A> = Box<dyn Fn(A) + Send + Sync>;

/// Optional callbacks observing a gateway run. Each one is independent.
#[derive(Default)]
pub struct GatewayHooks {
    on_session_refreshed: Option<Box<dyn Fn(&RefreshedSession) + Send + Sync>>,
    on_session_invalid: Option<Hook<()>>,
    on_signed_out: Option<Hook<()>>,
    on_notify: Option<Hook<Notification>>,
}

impl GatewayHooks {
    pub fn new() -> Self {
        Self::default()
    }
    /// Called with the refreshed payload before the operation runs.
    pub fn on_session_refreshed(
        mut self,
        f: impl Fn(&RefreshedSession) + Send + Sync + 'static,
    ) -> Self {
        self.on_session_refreshed = Some(Box::new(f));
        self
    }
    /// Called after the store was cleared because the session is invalid.
    /// This is where a front end sends the user back to its login screen.
    pub fn on_session_invalid(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_invalid = Some(Box::new(move |()| f()));
        self
    }
    /// Called when the server could not be reached, to reset in-memory auth state.
    pub fn on_signed_out(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_signed_out = Some(Box::new(move |()| f()));
        self
    }
    pub fn on_notify(mut self, f: impl Fn(Notification) + Send + Sync + 'static) -> Self {
        self.on_notify = Some(Box::new(f));
        self
    }
    fn session_refreshed(&self, session: &RefreshedSession) {
        if let Some(f) = &self.on_session_refreshed {
            f(session);
        }
    }
    fn session_invalid(&self) {
        if let Some(f) = &self.on_session_invalid {
            f(());
        }
    }
    fn signed_out(&self) {
        if let Some(f) = &self.on_signed_out {
            f(());
        }
    }
    pub(crate) fn notify(&self, notification: Notification) {
        if let Some(f) = &self.on_notify {
            f(notification);
        }
    }
}

impl fmt::Debug for GatewayHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayHooks")
            .field("on_session_refreshed", &self.on_session_refreshed.is_some())
            .field("on_session_invalid", &self.on_session_invalid.is_some())
            .field("on_signed_out", &self.on_signed_out.is_some())
            .field("on_notify", &self.on_notify.is_some())
            .finish()
    }
}

#[derive(Serialize)]
struct RefreshInput {
    refresh_token: Option<String>,
}

enum RefreshOutcome {
    Valid(RefreshedSession),
    Invalid { title: Option<String>, message: Option<String> },
    Inconclusive(Option<Value>),
}

impl RefreshOutcome {
    fn from_payload(mut payload: Map<String, Value>) -> Result<Self, Error> {
        let status = payload.get("status").cloned();
        match status {
            Some(Value::Bool(true)) => {
                let Some(Value::String(access_token)) = payload.get("access_token").cloned()
                else {
                    return Err(Error::Decode("`access_token` missing from a valid session".into()));
                };
                Ok(Self::Valid(RefreshedSession { access_token, payload }))
            }
            Some(Value::Bool(false)) => {
                let mut text = |key: &str| match payload.remove(key) {
                    Some(Value::String(s)) => Some(s),
                    _ => None,
                };
                let title = text("title");
                let message = text("message").or_else(|| text("detail"));
                Ok(Self::Invalid { title, message })
            }
            other => Ok(Self::Inconclusive(other)),
        }
    }
}

/// Refreshes the access token before handing control to a protected operation.
pub struct Gateway<S, T> {
    store: Arc<S>,
    client: Arc<T>,
}

impl<S, T> Clone for Gateway<S, T> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), client: Arc::clone(&self.client) }
    }
}

impl<S, T> Gateway<S, T>
where
    S: Store<String, String> + Send + Sync,
    S::Error: Send + Sync + 'static,
    T: ApiClient + Send + Sync,
{
    /// `client` must not attach credentials of its own: the refresh token travels in the body.
    pub fn new(store: Arc<S>, client: Arc<T>) -> Self {
        Self { store, client }
    }
    /// Refresh the access token, then run `on_ready` and return its output.
    ///
    /// Errors produced by `on_ready` are part of its output and are passed back untouched.
    pub async fn run<F, Fut, O>(&self, hooks: &GatewayHooks, on_ready: F) -> Result<O, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = O>,
    {
        let refresh_token = self
            .store
            .get(&REFRESH_TOKEN.into())
            .await
            .map_err(|e| Error::SessionStore(Box::new(e)))?;
        if refresh_token.is_none() {
            debug!("no refresh token stored, refreshing with null");
        }
        match self.refresh(refresh_token).await {
            Ok(RefreshOutcome::Valid(session)) => {
                self.store
                    .set(ACCESS_TOKEN.into(), session.access_token.clone())
                    .await
                    .map_err(|e| Error::SessionStore(Box::new(e)))?;
                debug!("access token refreshed");
                hooks.session_refreshed(&session);
                hooks.notify(Notification::still_logged_in());
                Ok(on_ready().await)
            }
            Ok(RefreshOutcome::Invalid { title, message }) => {
                warn!(?title, ?message, "session rejected by the server, clearing the store");
                if let Err(e) = self.store.clear().await {
                    warn!(error = %e, "failed to clear the session store");
                    return Err(Error::SessionStore(Box::new(e)));
                }
                hooks.session_invalid();
                hooks.notify(Notification::error(
                    title.clone().unwrap_or_default(),
                    message.clone().unwrap_or_default(),
                ));
                Err(Error::SessionInvalid { title, message })
            }
            Ok(RefreshOutcome::Inconclusive(status)) => {
                debug!(?status, "refresh answered without a session status");
                Err(Error::Inconclusive { status })
            }
            Err(err @ Error::Transport { status }) => {
                warn!(%status, "token refresh failed");
                hooks.notify(Notification::refresh_failed(status));
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "token refresh did not complete");
                hooks.notify(Notification::unreachable());
                hooks.signed_out();
                Err(err)
            }
        }
    }
    async fn refresh(&self, refresh_token: Option<String>) -> Result<RefreshOutcome, Error> {
        let request =
            ApiRequest::json(Method::POST, endpoints::REFRESH, RefreshInput { refresh_token });
        let payload = match self.client.send_api::<(), _, Map<String, Value>>(&request).await {
            Ok(OutputDataOrBytes::Data(payload)) => payload,
            // The backend does not always label its JSON.
            Ok(OutputDataOrBytes::Bytes(bytes)) => {
                serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))?
            }
            Err(pageant_http::Error::ApiResponse(e)) => {
                return Err(Error::Transport { status: e.status })
            }
            Err(pageant_http::Error::SerdeJson(e)) => return Err(Error::Decode(e.to_string())),
            Err(e) => return Err(Error::Network(Box::new(e))),
        };
        RefreshOutcome::from_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{MockClient, MockResponse};
    use pageant_common::store::memory::MemoryStore;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn logged_in_store() -> MemoryStore<String, String> {
        [("access_token", "stale"), ("refresh_token", "refresh"), ("user", "{}"), ("theme", "dark")]
            .into_iter()
            .map(|(k, v)| (String::from(k), String::from(v)))
            .collect()
    }

    fn gateway(
        store: &MemoryStore<String, String>,
        client: MockClient,
    ) -> Gateway<MemoryStore<String, String>, MockClient> {
        Gateway::new(Arc::new(store.clone()), Arc::new(client))
    }

    #[derive(Default)]
    struct Recorder {
        refreshed: Mutex<Vec<RefreshedSession>>,
        invalid: AtomicUsize,
        signed_out: AtomicUsize,
        notifications: Mutex<Vec<Notification>>,
    }

    fn hooks(recorder: &Arc<Recorder>) -> GatewayHooks {
        let (r1, r2, r3, r4) =
            (recorder.clone(), recorder.clone(), recorder.clone(), recorder.clone());
        GatewayHooks::new()
            .on_session_refreshed(move |s| r1.refreshed.lock().unwrap().push(s.clone()))
            .on_session_invalid(move || {
                r2.invalid.fetch_add(1, Ordering::SeqCst);
            })
            .on_signed_out(move || {
                r3.signed_out.fetch_add(1, Ordering::SeqCst);
            })
            .on_notify(move |n| r4.notifications.lock().unwrap().push(n))
    }

    #[tokio::test]
    async fn valid_session_runs_callback_once() {
        let store = logged_in_store();
        let client = MockClient::refresh(MockResponse::json(
            200,
            r#"{"status":true,"access_token":"fresh","user":{"id":1}}"#,
        ));
        let requests = Arc::clone(&client.requests);
        let recorder = Arc::new(Recorder::default());
        let calls = AtomicUsize::new(0);
        let output = gateway(&store, client)
            .run(&hooks(&recorder), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                42
            })
            .await
            .expect("refresh should succeed");
        assert_eq!(output, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.snapshot().get(ACCESS_TOKEN).map(String::as_str), Some("fresh"));
        assert_eq!(store.snapshot().get(REFRESH_TOKEN).map(String::as_str), Some("refresh"));

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method(), Method::POST);
        assert_eq!(requests[0].uri(), "http://localhost:8000/auth/refresh/");
        assert_eq!(requests[0].body(), br#"{"refresh_token":"refresh"}"#);
        assert!(requests[0].headers().get(http::header::AUTHORIZATION).is_none());

        let refreshed = recorder.refreshed.lock().unwrap();
        assert_eq!(refreshed.len(), 1);
        assert_eq!(refreshed[0].access_token, "fresh");
        assert_eq!(refreshed[0].payload.get("user"), Some(&serde_json::json!({ "id": 1 })));
        let notifications = recorder.notifications.lock().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Info);
        assert_eq!(notifications[0].title, "Hey Just Checking...");
        assert_eq!(recorder.invalid.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.signed_out.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn callback_errors_pass_through() {
        let store = logged_in_store();
        let client =
            MockClient::refresh(MockResponse::json(200, r#"{"status":true,"access_token":"fresh"}"#));
        let output = gateway(&store, client)
            .run(&GatewayHooks::default(), || async { Err::<(), _>("category name taken") })
            .await
            .expect("refresh should succeed");
        assert_eq!(output, Err("category name taken"));
        assert_eq!(store.snapshot().get(ACCESS_TOKEN).map(String::as_str), Some("fresh"));
    }

    #[tokio::test]
    async fn invalid_session_clears_store() {
        let store = logged_in_store();
        let client = MockClient::refresh(MockResponse::json(
            200,
            r#"{"status":false,"title":"You Have Been Logged Out","message":"Login "}"#,
        ));
        let recorder = Arc::new(Recorder::default());
        let calls = AtomicUsize::new(0);
        let err = gateway(&store, client)
            .run(&hooks(&recorder), || async {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .expect_err("refresh should be rejected");
        match &err {
            Error::SessionInvalid { title, message } => {
                assert_eq!(title.as_deref(), Some("You Have Been Logged Out"));
                assert_eq!(message.as_deref(), Some("Login "));
            }
            _ => panic!("must be Error::SessionInvalid, got {err:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(store.is_empty());
        assert_eq!(recorder.invalid.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.signed_out.load(Ordering::SeqCst), 0);
        let notifications = recorder.notifications.lock().unwrap();
        assert_eq!(
            *notifications,
            vec![Notification::error("You Have Been Logged Out", "Login ")]
        );
    }

    #[tokio::test]
    async fn server_error_leaves_store_untouched() {
        let store = logged_in_store();
        let before = store.snapshot();
        let client = MockClient::refresh(MockResponse::json(500, r#"{"detail":"boom"}"#));
        let recorder = Arc::new(Recorder::default());
        let calls = AtomicUsize::new(0);
        let err = gateway(&store, client)
            .run(&hooks(&recorder), || async {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .expect_err("refresh should fail");
        assert!(
            matches!(err, Error::Transport { status } if status == StatusCode::INTERNAL_SERVER_ERROR),
            "got {err:?}"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.snapshot(), before);
        let notifications = recorder.notifications.lock().unwrap();
        assert_eq!(
            *notifications,
            vec![Notification::error(
                "Authentication Failed With Code 500",
                "Internal Server Error"
            )]
        );
        assert_eq!(recorder.signed_out.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.invalid.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn network_error_leaves_store_untouched() {
        let store = logged_in_store();
        let before = store.snapshot();
        let recorder = Arc::new(Recorder::default());
        let calls = AtomicUsize::new(0);
        let err = gateway(&store, MockClient::unreachable())
            .run(&hooks(&recorder), || async {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .expect_err("refresh should fail");
        assert!(matches!(err, Error::Network(_)), "got {err:?}");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.snapshot(), before);
        assert_eq!(recorder.signed_out.load(Ordering::SeqCst), 1);
        let notifications = recorder.notifications.lock().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Could Not Authenticate");
        assert_eq!(notifications[0].details, vec![String::from("You Can Try To Login Again")]);
    }

    #[tokio::test]
    async fn unreadable_body_is_treated_like_a_network_failure() {
        let store = logged_in_store();
        let before = store.snapshot();
        let recorder = Arc::new(Recorder::default());
        let client = MockClient::refresh(MockResponse::text(200, "<html>proxy error</html>"));
        let err = gateway(&store, client)
            .run(&hooks(&recorder), || async {})
            .await
            .expect_err("refresh should fail");
        assert!(matches!(err, Error::Decode(_)), "got {err:?}");
        assert_eq!(store.snapshot(), before);
        assert_eq!(recorder.signed_out.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.notifications.lock().unwrap()[0].title, "Could Not Authenticate");
    }

    #[tokio::test]
    async fn valid_status_without_token_is_a_decode_error() {
        let store = logged_in_store();
        let before = store.snapshot();
        let client = MockClient::refresh(MockResponse::json(200, r#"{"status":true}"#));
        let err = gateway(&store, client)
            .run(&GatewayHooks::default(), || async {})
            .await
            .expect_err("refresh should fail");
        assert!(matches!(err, Error::Decode(_)), "got {err:?}");
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn answer_without_status_is_silent() {
        let store = logged_in_store();
        let before = store.snapshot();
        let client = MockClient::refresh(MockResponse::json(200, r#"{"detail":"throttled"}"#));
        let recorder = Arc::new(Recorder::default());
        let calls = AtomicUsize::new(0);
        let err = gateway(&store, client)
            .run(&hooks(&recorder), || async {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .expect_err("refresh should not complete");
        assert!(matches!(err, Error::Inconclusive { status: None }), "got {err:?}");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.snapshot(), before);
        assert!(recorder.notifications.lock().unwrap().is_empty());
        assert_eq!(recorder.signed_out.load(Ordering::SeqCst), 0);
        assert_eq!(recorder.invalid.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_boolean_status_is_silent() {
        let store = logged_in_store();
        let client = MockClient::refresh(MockResponse::json(200, r#"{"status":"pending"}"#));
        let recorder = Arc::new(Recorder::default());
        let err = gateway(&store, client)
            .run(&hooks(&recorder), || async {})
            .await
            .expect_err("refresh should not complete");
        assert!(
            matches!(&err, Error::Inconclusive { status: Some(Value::String(s)) } if s == "pending"),
            "got {err:?}"
        );
        assert!(recorder.notifications.lock().unwrap().is_empty());
        assert_eq!(recorder.signed_out.load(Ordering::SeqCst), 0);
    }

    struct UnclearableStore(MemoryStore<String, String>);

    impl Store<String, String> for UnclearableStore {
        type Error = std::io::Error;

        async fn get(&self, key: &String) -> Result<Option<String>, Self::Error> {
            Ok(self.0.get(key).await.unwrap_or_default())
        }
        async fn set(&self, key: String, value: String) -> Result<(), Self::Error> {
            let _ = self.0.set(key, value).await;
            Ok(())
        }
        async fn del(&self, key: &String) -> Result<(), Self::Error> {
            let _ = self.0.del(key).await;
            Ok(())
        }
        async fn clear(&self) -> Result<(), Self::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[tokio::test]
    async fn invalid_session_with_failing_store_reports_the_store() {
        let store = logged_in_store();
        let client = MockClient::refresh(MockResponse::json(200, r#"{"status":false}"#));
        let recorder = Arc::new(Recorder::default());
        let err = Gateway::new(Arc::new(UnclearableStore(store.clone())), Arc::new(client))
            .run(&hooks(&recorder), || async {})
            .await
            .expect_err("refresh should be rejected");
        assert!(matches!(err, Error::SessionStore(_)), "got {err:?}");
        assert_eq!(store.snapshot().get(REFRESH_TOKEN).map(String::as_str), Some("refresh"));
        assert_eq!(recorder.invalid.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_store_sends_null_refresh_token() {
        let store = MemoryStore::<String, String>::default();
        let client = MockClient::refresh(MockResponse::json(
            200,
            r#"{"status":false,"detail":"Refresh token missing"}"#,
        ));
        let requests = Arc::clone(&client.requests);
        let err = gateway(&store, client)
            .run(&GatewayHooks::default(), || async {})
            .await
            .expect_err("refresh should be rejected");
        match &err {
            Error::SessionInvalid { title, message } => {
                assert_eq!(title, &None);
                assert_eq!(message.as_deref(), Some("Refresh token missing"));
            }
            _ => panic!("must be Error::SessionInvalid, got {err:?}"),
        }
        assert_eq!(requests.lock().unwrap()[0].body(), br#"{"refresh_token":null}"#);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn empty_store_with_rejecting_status() {
        let store = MemoryStore::<String, String>::default();
        let client = MockClient::refresh(MockResponse::json(
            400,
            r#"{"detail":"Refresh token missing","status":false}"#,
        ));
        let err = gateway(&store, client)
            .run(&GatewayHooks::default(), || async {})
            .await
            .expect_err("refresh should fail");
        assert!(matches!(err, Error::Transport { status } if status == StatusCode::BAD_REQUEST));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn concurrent_runs_each_run_their_callback() {
        let store = logged_in_store();
        let client = MockClient::sequence(vec![
            MockResponse::json(200, r#"{"status":true,"access_token":"first"}"#),
            MockResponse::json(200, r#"{"status":true,"access_token":"second"}"#),
        ]);
        let requests = Arc::clone(&client.requests);
        let gateway = Arc::new(gateway(&store, client));
        let calls = Arc::new(Mutex::new(HashMap::<usize, usize>::new()));
        let handles = (0..2).map(|i| {
            let gateway = Arc::clone(&gateway);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                gateway
                    .run(&GatewayHooks::default(), || async move {
                        *calls.lock().unwrap().entry(i).or_default() += 1;
                        i
                    })
                    .await
            })
        });
        let results = futures::future::join_all(handles).await;
        for (i, result) in results.into_iter().enumerate() {
            let output = result
                .expect("task should be successfully executed")
                .expect("refresh should succeed");
            assert_eq!(output, i);
        }
        assert_eq!(*calls.lock().unwrap(), HashMap::from_iter([(0, 1), (1, 1)]));
        assert_eq!(requests.lock().unwrap().len(), 2);
        let stored = store.snapshot().get(ACCESS_TOKEN).cloned();
        assert!(
            matches!(stored.as_deref(), Some("first") | Some("second")),
            "unexpected access token: {stored:?}"
        );
    }
}
