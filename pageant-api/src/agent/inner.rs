use crate::session::ACCESS_TOKEN;
use pageant_common::store::Store;
use pageant_http::types::AuthorizationToken;
use pageant_http::{ApiClient, HttpClient};
use http::{Request, Response};
use std::sync::Arc;

/// Which credentials a [`WrapperClient`] attaches to its requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Credentials {
    /// Nothing at all. Used for the token refresh.
    None,
    /// The CSRF token only. Used for the public endpoints and the auth forms.
    Csrf,
    /// The CSRF token and the stored access token as a bearer credential.
    Bearer,
}

/// Sends requests through the shared HTTP client against the configured
/// endpoint, adding headers according to its [`Credentials`].
pub(crate) struct WrapperClient<S, T> {
    store: Arc<S>,
    endpoint: String,
    csrf_token: Option<String>,
    credentials: Credentials,
    inner: Arc<T>,
}

impl<S, T> WrapperClient<S, T> {
    pub(crate) fn new(
        store: Arc<S>,
        inner: Arc<T>,
        endpoint: String,
        csrf_token: Option<String>,
        credentials: Credentials,
    ) -> Self {
        Self { store, endpoint, csrf_token, credentials, inner }
    }
}

impl<S, T> Clone for WrapperClient<S, T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            endpoint: self.endpoint.clone(),
            csrf_token: self.csrf_token.clone(),
            credentials: self.credentials,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, T> HttpClient for WrapperClient<S, T>
where
    S: Send + Sync,
    T: HttpClient + Send + Sync,
{
    async fn send_http(
        &self,
        request: Request<Vec<u8>>,
    ) -> core::result::Result<Response<Vec<u8>>, Box<dyn std::error::Error + Send + Sync + 'static>>
    {
        self.inner.send_http(request).await
    }
}

impl<S, T> ApiClient for WrapperClient<S, T>
where
    S: Store<String, String> + Send + Sync,
    T: HttpClient + Send + Sync,
{
    fn base_uri(&self) -> String {
        self.endpoint.clone()
    }
    async fn authorization_token(&self) -> Option<AuthorizationToken> {
        if self.credentials != Credentials::Bearer {
            return None;
        }
        self.store
            .get(&ACCESS_TOKEN.into())
            .await
            .ok()
            .flatten()
            .map(AuthorizationToken::Bearer)
    }
    async fn csrf_token(&self) -> Option<String> {
        match self.credentials {
            Credentials::None => None,
            Credentials::Csrf | Credentials::Bearer => self.csrf_token.clone(),
        }
    }
}
