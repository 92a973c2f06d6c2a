use http::header::{HeaderName, HeaderValue, InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use serde::{de::DeserializeOwned, Serialize};

pub const APPLICATION_JSON: &str = "application/json";

/// A credential for the `Authorization` header.
pub enum AuthorizationToken {
    Bearer(String),
}

impl TryFrom<AuthorizationToken> for HeaderValue {
    type Error = InvalidHeaderValue;

    fn try_from(token: AuthorizationToken) -> Result<Self, Self::Error> {
        HeaderValue::from_str(&match token {
            AuthorizationToken::Bearer(t) => format!("Bearer {t}"),
        })
    }
}

/// HTTP headers which can be used in API requests.
pub enum Header {
    ContentType,
    Authorization,
    CsrfToken,
}

impl From<Header> for HeaderName {
    fn from(value: Header) -> Self {
        match value {
            Header::ContentType => CONTENT_TYPE,
            Header::Authorization => AUTHORIZATION,
            Header::CsrfToken => HeaderName::from_static("x-csrftoken"),
        }
    }
}

/// A request which can be executed with [`ApiClient::send_api()`](crate::ApiClient::send_api).
///
/// `path` is relative to the client's base URI, e.g. `event/12/categories/`.
pub struct ApiRequest<P, I>
where
    I: Serialize,
{
    pub method: Method,
    pub path: String,
    pub parameters: Option<P>,
    pub input: Option<InputDataOrBytes<I>>,
    pub encoding: Option<String>,
}

impl<I> ApiRequest<(), I>
where
    I: Serialize,
{
    /// A request carrying a JSON body and no query parameters.
    pub fn json(method: Method, path: impl Into<String>, input: I) -> Self {
        Self {
            method,
            path: path.into(),
            parameters: None,
            input: Some(InputDataOrBytes::Data(input)),
            encoding: Some(APPLICATION_JSON.into()),
        }
    }
}

impl ApiRequest<(), ()> {
    /// A request with neither query parameters nor body.
    pub fn empty(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), parameters: None, input: None, encoding: None }
    }
}

/// A type which can be used as a parameter of [`ApiRequest`].
///
/// JSON serializable data or raw bytes.
pub enum InputDataOrBytes<T>
where
    T: Serialize,
{
    Data(T),
    Bytes(Vec<u8>),
}

/// A type which can be used as a return value of [`ApiClient::send_api()`](crate::ApiClient::send_api).
///
/// JSON deserializable data or raw bytes.
pub enum OutputDataOrBytes<T>
where
    T: DeserializeOwned,
{
    Data(T),
    Bytes(Vec<u8>),
}
