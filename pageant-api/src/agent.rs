//! The high-level client of the Pageantry API.
mod builder;
pub mod config;
mod inner;

pub use self::builder::AgentBuilder;
use self::inner::{Credentials, WrapperClient};
use crate::endpoints;
use crate::error::{Error, Result};
use crate::gateway::{Gateway, GatewayHooks, Notification};
use crate::session::{Session, REFRESH_TOKEN};
use crate::types::{
    CategoryInput, ContestantInput, EventInput, FormResponse, LoginInput, LogoutInput,
    PasswordResetDoneInput, PasswordResetInput, RegisterInput, SearchParameters,
    VerifyEmailInput, VoteInput,
};
use http::Method;
use pageant_common::store::Store;
use pageant_http::{ApiClient, ApiRequest, HttpClient, OutputDataOrBytes};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

const LOGIN_SUCCESSFUL: &str = "login_successful";
const REGISTRATION_SUCCESSFUL: &str = "registration_successful";
const EMAIL_VERIFIED: &str = "email_verified";
const SUCCESS: &str = "success";

/// A client of the Pageantry API that keeps its session in a [`Store`].
///
/// Every organizer call is wrapped in the [`Gateway`]: the access token is
/// refreshed first, and the call only goes out when the refresh succeeded.
/// Public calls (browsing published events, results, voting) skip it.
pub struct PageantAgent<S, T> {
    store: Arc<S>,
    gateway: Gateway<S, WrapperClient<S, T>>,
    public: WrapperClient<S, T>,
    protected: WrapperClient<S, T>,
    hooks: GatewayHooks,
}

impl<S, T> PageantAgent<S, T>
where
    S: Store<String, String> + Send + Sync,
    S::Error: Send + Sync + 'static,
    T: HttpClient + Send + Sync,
{
    /// Create a new agent. See [`AgentBuilder`] for the usual way to get one.
    pub fn new(client: T, store: S, config: config::Config, hooks: GatewayHooks) -> Self {
        let store = Arc::new(store);
        let client = Arc::new(client);
        let wrapper = |credentials| {
            WrapperClient::new(
                Arc::clone(&store),
                Arc::clone(&client),
                config.endpoint.clone(),
                config.csrf_token.clone(),
                credentials,
            )
        };
        let gateway = Gateway::new(Arc::clone(&store), Arc::new(wrapper(Credentials::None)));
        let public = wrapper(Credentials::Csrf);
        let protected = wrapper(Credentials::Bearer);
        Self { store, gateway, public, protected, hooks }
    }
    /// The base URL requests are sent to.
    pub fn endpoint(&self) -> String {
        self.public.base_uri()
    }
    /// The session currently kept in the store, if any.
    pub async fn get_session(&self) -> Result<Option<Session>> {
        Session::load(self.store.as_ref()).await.map_err(|e| Error::SessionStore(Box::new(e)))
    }
    /// Log in and persist the returned session.
    ///
    /// The backend answers refused logins with a success status and an error
    /// `code`; those come back as [`Error::Form`].
    pub async fn login(
        &self,
        username: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> Result<Session> {
        let input = LoginInput {
            username: username.as_ref().into(),
            password: password.as_ref().into(),
        };
        let response = self.submit_form(endpoints::LOGIN, input).await?;
        if response.code.as_deref() != Some(LOGIN_SUCCESSFUL) {
            return Err(Error::Form { messages: response.messages(), code: response.code });
        }
        let FormResponse {
            access_token: Some(access_token), refresh_token: Some(refresh_token), user, ..
        } = response
        else {
            return Err(pageant_http::Error::UnexpectedResponseType.into());
        };
        let session = Session { access_token, refresh_token, user };
        session.save(self.store.as_ref()).await.map_err(|e| Error::SessionStore(Box::new(e)))?;
        info!(endpoint = %self.endpoint(), "logged in");
        Ok(session)
    }
    /// Create an organizer account. Returns the backend's confirmation messages.
    pub async fn register(&self, input: RegisterInput) -> Result<Vec<String>> {
        let response = self.submit_form(endpoints::REGISTER, input).await?;
        if response.code.as_deref() == Some(REGISTRATION_SUCCESSFUL) {
            Ok(response.messages())
        } else {
            Err(Error::Form { messages: response.messages(), code: response.code })
        }
    }
    /// Confirm the address of a new account with the token from the verification link.
    pub async fn verify_email(&self, token: &str) -> Result<Vec<String>> {
        let response = self.submit_form(endpoints::VERIFY_EMAIL, VerifyEmailInput { token }).await?;
        if response.code.as_deref() == Some(EMAIL_VERIFIED) {
            Ok(response.messages())
        } else {
            Err(Error::Form { messages: response.messages(), code: response.code })
        }
    }
    /// Ask for a password reset link to be mailed to `address`.
    ///
    /// The backend confirms even when no account uses the address.
    pub async fn request_password_reset(&self, address: &str) -> Result<Vec<String>> {
        let response =
            self.submit_form(endpoints::PASSWORD_RESET, PasswordResetInput { address }).await?;
        if response.kind.as_deref() == Some(SUCCESS) {
            Ok(response.messages())
        } else {
            Err(Error::Form { messages: response.messages(), code: response.code })
        }
    }
    /// Set a new password with the token from the reset link.
    pub async fn complete_password_reset(
        &self,
        input: PasswordResetDoneInput,
    ) -> Result<Vec<String>> {
        let response = self.submit_form(endpoints::PASSWORD_RESET_DONE, input).await?;
        if response.code.as_deref() == Some(SUCCESS) {
            Ok(response.messages())
        } else {
            Err(Error::Form { messages: response.messages(), code: response.code })
        }
    }
    /// Refresh the access token without running anything else.
    pub async fn refresh(&self) -> Result<()> {
        self.with_fresh_token(|| async {}).await
    }
    /// Run `on_ready` once the access token has been refreshed.
    ///
    /// Whatever `on_ready` returns is handed back unchanged, errors included.
    pub async fn with_fresh_token<F, Fut, O>(&self, on_ready: F) -> Result<O>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = O>,
    {
        Ok(self.gateway.run(&self.hooks, on_ready).await?)
    }
    /// Blacklist the refresh token on the backend and forget the session.
    ///
    /// The local session is dropped as soon as the backend answers, whatever it
    /// answers. It is kept only when the backend could not be reached.
    pub async fn logout(&self) -> Result<Value> {
        self.with_fresh_token(|| async {
            let refresh_token = self
                .store
                .get(&REFRESH_TOKEN.into())
                .await
                .map_err(|e| Error::SessionStore(Box::new(e)))?;
            let request =
                ApiRequest::json(Method::POST, endpoints::LOGOUT, LogoutInput { refresh_token });
            let result = self.protected.send_api::<(), _, Value>(&request).await;
            let status = match &result {
                Ok(OutputDataOrBytes::Data(output)) => Some(output.get("status")),
                Ok(OutputDataOrBytes::Bytes(_)) => Some(None),
                Err(pageant_http::Error::ApiResponse(e)) => {
                    Some(e.error.as_ref().and_then(|body| body.status.as_ref()))
                }
                Err(_) => None,
            };
            // Any answer from the backend ends the session.
            if let Some(status) = status {
                let status = match status {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                self.store.clear().await.map_err(|e| Error::SessionStore(Box::new(e)))?;
                self.hooks.notify(Notification::info(
                    format!("Logout Successful {status}").trim_end().to_string(),
                    "You will be redirected to login soon",
                ));
                info!("logged out");
            }
            Ok::<_, Error>(unwrap_body(result?)?)
        })
        .await?
    }

    /// The organizer's profile.
    pub async fn profile(&self) -> Result<Value> {
        self.protected_call(ApiRequest::empty(Method::GET, endpoints::PROFILE)).await
    }
    /// Events created by the logged-in organizer.
    pub async fn my_events(&self) -> Result<Value> {
        self.protected_call(ApiRequest::empty(Method::GET, endpoints::PROFILE_EVENTS)).await
    }
    pub async fn unpublished_events(&self) -> Result<Value> {
        self.protected_call(ApiRequest::empty(Method::GET, endpoints::EVENTS_UNPUBLISHED)).await
    }
    pub async fn event(&self, event_id: u64) -> Result<Value> {
        self.protected_call(ApiRequest::empty(Method::GET, endpoints::event(event_id))).await
    }
    pub async fn create_event(&self, input: &EventInput) -> Result<Value> {
        self.protected_call(ApiRequest::json(Method::POST, endpoints::EVENT_CREATE, input)).await
    }
    /// Change the fields of `input` that are set, leaving the others as they are.
    pub async fn update_event(&self, event_id: u64, input: &EventInput) -> Result<Value> {
        self.protected_call(ApiRequest::json(Method::PATCH, endpoints::event(event_id), input))
            .await
    }
    pub async fn delete_event(&self, event_id: u64) -> Result<Value> {
        self.protected_call(ApiRequest::empty(Method::DELETE, endpoints::event(event_id))).await
    }
    /// Make an event visible to voters.
    pub async fn publish_event(&self, event_id: u64) -> Result<Value> {
        self.protected_call(ApiRequest::empty(Method::POST, endpoints::publish(event_id))).await
    }
    pub async fn add_category(&self, event_id: u64, input: &CategoryInput) -> Result<Value> {
        self.protected_call(ApiRequest::json(Method::POST, endpoints::categories(event_id), input))
            .await
    }
    pub async fn update_category(
        &self,
        event_id: u64,
        category_id: u64,
        input: &CategoryInput,
    ) -> Result<Value> {
        let path = endpoints::category(event_id, category_id);
        self.protected_call(ApiRequest::json(Method::PATCH, path, input)).await
    }
    pub async fn delete_category(&self, event_id: u64, category_id: u64) -> Result<Value> {
        let path = endpoints::category(event_id, category_id);
        self.protected_call(ApiRequest::empty(Method::DELETE, path)).await
    }
    pub async fn add_contestant(&self, event_id: u64, input: &ContestantInput) -> Result<Value> {
        let path = endpoints::contestants(event_id);
        self.protected_call(ApiRequest::json(Method::POST, path, input)).await
    }
    pub async fn update_contestant(
        &self,
        event_id: u64,
        contestant_id: u64,
        input: &ContestantInput,
    ) -> Result<Value> {
        let path = endpoints::contestant(event_id, contestant_id);
        self.protected_call(ApiRequest::json(Method::PATCH, path, input)).await
    }
    pub async fn delete_contestant(&self, event_id: u64, contestant_id: u64) -> Result<Value> {
        let path = endpoints::contestant(event_id, contestant_id);
        self.protected_call(ApiRequest::empty(Method::DELETE, path)).await
    }
    /// Vote totals, revenue and timelines of one event.
    pub async fn analytics_dashboard(&self, event_id: u64) -> Result<Value> {
        let path = endpoints::analytics_dashboard(event_id);
        self.protected_call(ApiRequest::empty(Method::GET, path)).await
    }
    pub async fn live_votes(&self, event_id: u64) -> Result<Value> {
        self.protected_call(ApiRequest::empty(Method::GET, endpoints::live_votes(event_id))).await
    }
    pub async fn leaderboard(&self, event_id: u64) -> Result<Value> {
        self.protected_call(ApiRequest::empty(Method::GET, endpoints::leaderboard(event_id))).await
    }

    pub async fn published_events(&self) -> Result<Value> {
        self.public_call(ApiRequest::empty(Method::GET, endpoints::EVENTS_PUBLISHED)).await
    }
    pub async fn search_events(&self, query: &str) -> Result<Value> {
        self.public_call(ApiRequest::<_, ()> {
            method: Method::GET,
            path: endpoints::EVENTS_SEARCH.into(),
            parameters: Some(SearchParameters { q: query }),
            input: None,
            encoding: None,
        })
        .await
    }
    /// A published event with its categories and contestants.
    pub async fn public_event(&self, event_id: u64) -> Result<Value> {
        self.public_call(ApiRequest::empty(Method::GET, endpoints::public_event(event_id))).await
    }
    pub async fn results(&self, event_id: u64) -> Result<Value> {
        self.public_call(ApiRequest::empty(Method::GET, endpoints::results(event_id))).await
    }
    /// Cast votes for a contestant. The response carries the payment details.
    pub async fn vote(&self, event_id: u64, contestant_id: u64, input: &VoteInput) -> Result<Value> {
        let path = endpoints::vote(event_id, contestant_id);
        self.public_call(ApiRequest::json(Method::POST, path, input)).await
    }

    async fn submit_form<I>(&self, path: &str, input: I) -> Result<FormResponse>
    where
        I: Serialize + Send + Sync,
    {
        let request = ApiRequest::json(Method::POST, path, input);
        match self.public.send_api::<(), _, FormResponse>(&request).await {
            Ok(OutputDataOrBytes::Data(response)) => Ok(response),
            Ok(OutputDataOrBytes::Bytes(bytes)) => {
                Ok(serde_json::from_slice(&bytes).map_err(pageant_http::Error::from)?)
            }
            Err(pageant_http::Error::ApiResponse(e)) => match e.error {
                Some(body) if body.code.is_some() || body.status_text.is_some() => {
                    Err(Error::Form { messages: body.messages(), code: body.code })
                }
                error => Err(pageant_http::Error::ApiResponse(
                    pageant_http::error::ApiError { status: e.status, error },
                )
                .into()),
            },
            Err(e) => Err(e.into()),
        }
    }
    async fn protected_call<P, I>(&self, request: ApiRequest<P, I>) -> Result<Value>
    where
        P: Serialize + Send + Sync,
        I: Serialize + Send + Sync,
    {
        debug!(method = %request.method, path = %request.path, "protected call");
        self.with_fresh_token(|| async {
            unwrap_body(self.protected.send_api::<P, I, Value>(&request).await?)
        })
        .await?
    }
    async fn public_call<P, I>(&self, request: ApiRequest<P, I>) -> Result<Value>
    where
        P: Serialize + Send + Sync,
        I: Serialize + Send + Sync,
    {
        unwrap_body(self.public.send_api::<P, I, Value>(&request).await?)
    }
}

/// Strip the `{ status, data, message }` envelope most endpoints answer with.
fn unwrap_body(output: OutputDataOrBytes<Value>) -> Result<Value> {
    let value = match output {
        OutputDataOrBytes::Data(value) => value,
        OutputDataOrBytes::Bytes(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
            return Ok(Value::Null)
        }
        OutputDataOrBytes::Bytes(bytes) => {
            serde_json::from_slice(&bytes).map_err(pageant_http::Error::from)?
        }
    };
    let rejected = match value.get("status") {
        Some(Value::String(s)) => s == "error",
        Some(Value::Bool(b)) => !b,
        _ => false,
    };
    if rejected {
        let message = ["message", "detail"]
            .into_iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .map(String::from);
        return Err(Error::Rejected { message });
    }
    match value {
        Value::Object(mut map)
            if map.get("status").and_then(Value::as_str) == Some("success")
                && map.contains_key("data") =>
        {
            Ok(map.remove("data").unwrap_or_default())
        }
        value => Ok(value),
    }
}
