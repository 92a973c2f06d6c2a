#![doc = "ApiClient implementation for [reqwest]"]
use http::header::USER_AGENT;
use http::{HeaderValue, Request, Response};
use pageant_http::{ApiClient, HttpClient};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// A [`reqwest`] based client.
///
/// ```
/// use pageant_http::ApiClient;
/// use pageant_http_client::reqwest::ReqwestClient;
///
/// let client = ReqwestClient::new("http://localhost:8000");
/// assert_eq!(client.base_uri(), "http://localhost:8000");
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    base_uri: String,
    client: Arc<Client>,
    timeout: Option<Duration>,
    user_agent: Option<HeaderValue>,
}

impl ReqwestClient {
    /// Create a new [`ReqwestClient`] using the default configuration.
    ///
    /// Requests have no time limit and no `User-Agent` of their own.
    pub fn new(base_uri: impl AsRef<str>) -> ReqwestClient {
        ReqwestClientBuilder::new(base_uri).build()
    }
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// A client builder, capable of creating custom [`ReqwestClient`] instances.
///
/// ```
/// use pageant_http_client::reqwest::ReqwestClientBuilder;
/// use std::time::Duration;
///
/// let client = ReqwestClientBuilder::new("http://localhost:8000")
///     .timeout(Duration::from_secs(30))
///     .user_agent("pageant-cli/0.1.0")
///     .build();
/// assert_eq!(client.timeout(), Some(Duration::from_secs(30)));
/// ```
pub struct ReqwestClientBuilder {
    base_uri: String,
    client: Option<Client>,
    timeout: Option<Duration>,
    user_agent: Option<HeaderValue>,
}

impl ReqwestClientBuilder {
    /// Create a new [`ReqwestClientBuilder`] for building a custom client.
    pub fn new(base_uri: impl AsRef<str>) -> Self {
        Self { base_uri: base_uri.as_ref().into(), client: None, timeout: None, user_agent: None }
    }
    /// Sets the [`reqwest::Client`] to use.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }
    /// Give up on a request once it has taken this long, reading the body included.
    ///
    /// Applied per request, so it also holds for a client set with [`client`](Self::client).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
    /// Sets the `User-Agent` sent with requests which carry none. Invalid header
    /// values are ignored.
    pub fn user_agent(mut self, user_agent: impl AsRef<str>) -> Self {
        self.user_agent = HeaderValue::from_str(user_agent.as_ref()).ok();
        self
    }
    /// Build an [`ReqwestClient`] using the configured options.
    pub fn build(self) -> ReqwestClient {
        ReqwestClient {
            base_uri: self.base_uri,
            client: Arc::new(self.client.unwrap_or_default()),
            timeout: self.timeout,
            user_agent: self.user_agent,
        }
    }
}

impl HttpClient for ReqwestClient {
    async fn send_http(
        &self,
        mut request: Request<Vec<u8>>,
    ) -> core::result::Result<Response<Vec<u8>>, Box<dyn std::error::Error + Send + Sync + 'static>>
    {
        if let Some(user_agent) = &self.user_agent {
            request.headers_mut().entry(USER_AGENT).or_insert_with(|| user_agent.clone());
        }
        let mut request = reqwest::Request::try_from(request)?;
        if let Some(timeout) = self.timeout {
            *request.timeout_mut() = Some(timeout);
        }
        let response = self.client.execute(request).await?;
        let mut builder = Response::builder().status(response.status());
        for (k, v) in response.headers() {
            builder = builder.header(k, v);
        }
        builder.body(response.bytes().await?.to_vec()).map_err(Into::into)
    }
}

impl ApiClient for ReqwestClient {
    fn base_uri(&self) -> String {
        self.base_uri.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::io::Write;

    fn get(path: &str) -> Request<Vec<u8>> {
        Request::get(path).body(Vec::new()).expect("request should be built")
    }

    #[test]
    fn builder_defaults() {
        let client = ReqwestClientBuilder::new("http://localhost:8000").build();
        assert_eq!(client.base_uri(), "http://localhost:8000");
        assert_eq!(client.timeout(), None);
        assert!(client.user_agent.is_none());
    }

    #[test]
    fn invalid_user_agent_is_ignored() {
        let client = ReqwestClientBuilder::new("http://localhost:8000").user_agent("bad\nagent").build();
        assert!(client.user_agent.is_none());
    }

    #[tokio::test]
    async fn sends_user_agent() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/event/published/")
            .match_header("user-agent", "pageant-cli/0.1.0")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let client = ReqwestClientBuilder::new(server.url()).user_agent("pageant-cli/0.1.0").build();
        let response =
            client.send_http(get(&format!("{}/event/published/", server.url()))).await?;
        assert_eq!(response.status(), 200);
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn slow_response_times_out() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/event/1/results/")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(500));
                w.write_all(b"{}")
            })
            .create_async()
            .await;
        let client = ReqwestClientBuilder::new(server.url())
            .client(Client::new())
            .timeout(Duration::from_millis(50))
            .build();
        let err = client
            .send_http(get(&format!("{}/event/1/results/", server.url())))
            .await
            .expect_err("request should time out");
        let err = err.downcast_ref::<reqwest::Error>().expect("must be a reqwest error");
        assert!(err.is_timeout(), "unexpected error: {err:?}");
    }
}
