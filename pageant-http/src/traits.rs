use crate::error::{ApiError, Error, ErrorResponseBody, Result};
use crate::types::{AuthorizationToken, Header, APPLICATION_JSON};
use crate::{ApiRequest, InputDataOrBytes, OutputDataOrBytes};
use http::{Request, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;

/// An abstract HTTP client.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait HttpClient {
    /// Send an HTTP request and return the response.
    fn send_http(
        &self,
        request: Request<Vec<u8>>,
    ) -> impl Future<
        Output = core::result::Result<
            Response<Vec<u8>>,
            Box<dyn std::error::Error + Send + Sync + 'static>,
        >,
    >;
}

/// An abstract client of the Pageantry API.
///
/// [`send_api()`](ApiClient::send_api) method has a default implementation,
/// which wraps the [`HttpClient::send_http()`] method to handle input and output as JSON.
#[cfg_attr(not(target_arch = "wasm32"), trait_variant::make(Send))]
pub trait ApiClient: HttpClient {
    /// The base URI of the API server, e.g. `http://localhost:8000`.
    fn base_uri(&self) -> String;
    /// Get the authorization token to use `Authorization` header.
    fn authorization_token(&self) -> impl Future<Output = Option<AuthorizationToken>> {
        async { None }
    }
    /// Get the value for the `X-CSRFToken` header.
    fn csrf_token(&self) -> impl Future<Output = Option<String>> {
        async { None }
    }
    /// Send an API request and return the response.
    #[cfg(not(target_arch = "wasm32"))]
    fn send_api<P, I, O>(
        &self,
        request: &ApiRequest<P, I>,
    ) -> impl Future<Output = Result<OutputDataOrBytes<O>>>
    where
        P: Serialize + Send + Sync,
        I: Serialize + Send + Sync,
        O: DeserializeOwned + Send + Sync,
        // `Self` has to be `Sync` for `Future` to be `Send`.
        Self: Sync,
    {
        send_api(self, request)
    }
    #[cfg(target_arch = "wasm32")]
    fn send_api<P, I, O>(
        &self,
        request: &ApiRequest<P, I>,
    ) -> impl Future<Output = Result<OutputDataOrBytes<O>>>
    where
        P: Serialize + Send + Sync,
        I: Serialize + Send + Sync,
        O: DeserializeOwned + Send + Sync,
    {
        send_api(self, request)
    }
}

/// Join a base URI and a relative path with exactly one slash between them.
pub fn join_uri(base_uri: &str, path: &str) -> String {
    format!("{}/{}", base_uri.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[inline(always)]
async fn send_api<P, I, O, C: ApiClient + ?Sized>(
    client: &C,
    request: &ApiRequest<P, I>,
) -> Result<OutputDataOrBytes<O>>
where
    P: Serialize + Send + Sync,
    I: Serialize + Send + Sync,
    O: DeserializeOwned + Send + Sync,
{
    let mut uri = join_uri(&client.base_uri(), &request.path);
    // Query parameters
    if let Some(p) = &request.parameters {
        let qs = serde_html_form::to_string(p)?;
        if !qs.is_empty() {
            uri += "?";
            uri += &qs;
        }
    };
    let mut builder = http::Request::builder().method(&request.method).uri(&uri);
    // Headers
    if let Some(encoding) = &request.encoding {
        builder = builder.header(Header::ContentType, encoding);
    }
    if let Some(token) = client.authorization_token().await {
        builder = builder.header(Header::Authorization, token);
    }
    if let Some(csrf) = client.csrf_token().await {
        builder = builder.header(Header::CsrfToken, csrf);
    }
    // Body
    let body = if let Some(input) = &request.input {
        match input {
            InputDataOrBytes::Data(data) => serde_json::to_vec(&data)?,
            InputDataOrBytes::Bytes(bytes) => bytes.clone(),
        }
    } else {
        Vec::new()
    };
    // Send
    tracing::debug!(method = %request.method, %uri, "sending api request");
    let (parts, body) =
        client.send_http(builder.body(body)?).await.map_err(Error::HttpClient)?.into_parts();
    tracing::debug!(status = %parts.status, %uri, "received api response");
    if parts.status.is_success() {
        if parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |content_type| content_type.starts_with(APPLICATION_JSON))
        {
            Ok(OutputDataOrBytes::Data(serde_json::from_slice(&body)?))
        } else {
            Ok(OutputDataOrBytes::Bytes(body))
        }
    } else {
        Err(Error::ApiResponse(ApiError {
            status: parts.status,
            error: serde_json::from_slice::<ErrorResponseBody>(&body).ok(),
        }))
    }
}
