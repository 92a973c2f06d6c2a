#![doc = "Error types."]
use http::StatusCode;
use std::fmt::{self, Debug, Display};

/// The JSON body the backend sends along with an error status.
///
/// The backend is not consistent about which fields it fills in, so all of them
/// are optional. `status` is sometimes a boolean and sometimes a string.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Form validation messages, either a single string or a list of them.
    #[serde(default, rename = "statusText", skip_serializing_if = "Option::is_none")]
    pub status_text: Option<serde_json::Value>,
}

impl ErrorResponseBody {
    /// The form messages carried in `statusText`, in order.
    pub fn messages(&self) -> Vec<String> {
        match &self.status_text {
            Some(serde_json::Value::String(s)) => vec![s.clone()],
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Display for ErrorResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [&self.code, &self.title, &self.message, &self.detail]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join(": "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: Option<ErrorResponseBody>,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(body) = &self.error {
            let body = body.to_string();
            if !body.is_empty() {
                write!(f, " ({body})")?;
            }
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("api response error: {0}")]
    ApiResponse(ApiError),
    #[error("http request error: {0}")]
    HttpRequest(#[from] http::Error),
    #[error("http client error: {0}")]
    HttpClient(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("serde_html_form error: {0}")]
    SerdeHtmlForm(#[from] serde_html_form::ser::Error),
    #[error("unexpected response type")]
    UnexpectedResponseType,
}

/// Type alias to use this crate's [`Error`] type in a [`Result`](core::result::Result).
pub type Result<T> = core::result::Result<T, Error>;
