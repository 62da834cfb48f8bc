use crate::Result;
use async_trait::async_trait;
use linkpulse_core::ShortId;

/// The request metadata a visit is classified from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitRequest {
    /// Raw `User-Agent` header, empty when absent.
    pub user_agent: String,
    /// Raw `Referer` header.
    pub referrer: Option<String>,
}

impl VisitRequest {
    pub fn new(user_agent: impl Into<String>, referrer: Option<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            referrer,
        }
    }
}

/// Where a recorded visit should be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub long_url: String,
}

#[async_trait]
pub trait Recorder: Send + Sync + 'static {
    /// Records one visit to `id` and returns its redirect target.
    ///
    /// Returns [`NotFound`](crate::RedirectorError::NotFound) for an unknown
    /// id, in which case nothing is recorded.
    async fn record_visit(&self, id: &ShortId, request: VisitRequest) -> Result<RedirectTarget>;
}
