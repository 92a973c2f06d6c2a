#![doc = "Error types."]
use thiserror::Error;

/// Error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The token refresh in front of a protected call did not succeed.
    #[error(transparent)]
    Gateway(#[from] crate::gateway::Error),
    #[error("api error: {0}")]
    Api(#[from] pageant_http::Error),
    /// An auth form was refused. `messages` are the backend's `statusText` lines.
    #[error("{}: {}", code.as_deref().unwrap_or("form rejected"), messages.join(" "))]
    Form { code: Option<String>, messages: Vec<String> },
    /// The backend answered a call with `status: "error"`.
    #[error("request rejected: {}", message.as_deref().unwrap_or("no reason given"))]
    Rejected { message: Option<String> },
    #[error("session store error: {0}")]
    SessionStore(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("loading config error: {0}")]
    ConfigLoad(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("saving config error: {0}")]
    ConfigSave(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Type alias to use this crate's [`Error`] type in a [`Result`](core::result::Result).
pub type Result<T> = core::result::Result<T, Error>;
