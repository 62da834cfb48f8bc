use crate::classifier::{Classifier, SubstringClassifier};
use crate::error::{RedirectorError, Result};
use crate::recorder::{RedirectTarget, Recorder, VisitRequest};
use async_trait::async_trait;
use jiff::Timestamp;
use linkpulse_core::{Repository, ShortId, VisitRecord};
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolves short ids and records every redirect as a visit.
///
/// The lookup, the counter increment and the visit append are a single
/// [`Repository::record_visit`] call, so concurrent visits to the same link
/// are never lost and a deleted link is never recorded.
#[derive(Debug)]
pub struct RecorderService<R, C = SubstringClassifier> {
    repository: Arc<R>,
    classifier: Arc<C>,
}

impl<R, C> Clone for RecorderService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl<R: Repository> RecorderService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    /// Creates a service over a repository handle shared with other services.
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self {
            repository,
            classifier: Arc::new(SubstringClassifier),
        }
    }
}

impl<R: Repository, C: Classifier> RecorderService<R, C> {
    /// Replaces the client classifier.
    pub fn with_classifier<N: Classifier>(self, classifier: N) -> RecorderService<R, N> {
        RecorderService {
            repository: self.repository,
            classifier: Arc::new(classifier),
        }
    }
}

#[async_trait]
impl<R: Repository, C: Classifier> Recorder for RecorderService<R, C> {
    async fn record_visit(&self, id: &ShortId, request: VisitRequest) -> Result<RedirectTarget> {
        let client = self.classifier.classify(&request.user_agent);
        trace!(
            short_id = %id,
            browser = %client.browser,
            os = %client.os,
            device = %client.device,
            "classified visit"
        );

        let visit = VisitRecord::new(
            Timestamp::now(),
            request.referrer.as_deref(),
            request.user_agent,
            client,
        );

        let long_url = self
            .repository
            .record_visit(id, visit)
            .await?
            .ok_or_else(|| RedirectorError::NotFound(id.to_string()))?;

        debug!(short_id = %id, "redirecting");
        Ok(RedirectTarget { long_url })
    }
}
