pub mod client;
pub mod envelope;
pub mod keyring;

use std::future::Future;

use crate::core::insight::Insights;
use crate::core::raw::RawTaskRecord;

pub use client::HttpMailApi;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("not signed in: no MailSync token available")]
    MissingCredential,
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("invalid response format: {0}")]
    InvalidFormat(String),
}

/// What the update endpoint answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The refreshed mail list came back inline.
    Tasks(Vec<RawTaskRecord>),
    /// Only a success flag; the caller lists separately.
    Acknowledged,
}

/// The remote MailSync backend, as the store sees it.
pub trait MailApi: Send + Sync + 'static {
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<RawTaskRecord>, ApiError>> + Send;

    fn update_mail(&self) -> impl Future<Output = Result<UpdateOutcome, ApiError>> + Send;

    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<RawTaskRecord>, ApiError>> + Send;

    fn insights(&self) -> impl Future<Output = Result<Insights, ApiError>> + Send;
}
