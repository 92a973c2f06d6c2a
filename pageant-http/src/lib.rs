#![doc = include_str!("../README.md")]
pub mod error;
mod traits;
pub mod types;

pub use crate::error::{Error, Result};
pub use crate::traits::{join_uri, ApiClient, HttpClient};
pub use crate::types::{ApiRequest, InputDataOrBytes, OutputDataOrBytes};
pub use http;
