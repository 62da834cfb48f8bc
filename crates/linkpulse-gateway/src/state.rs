use std::sync::Arc;

use linkpulse_core::{ShortId, Shortener};
use linkpulse_redirector::Recorder;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    recorder: Arc<dyn Recorder>,
    base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        recorder: Arc<dyn Recorder>,
        public_base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = public_base_url.into();
        Self {
            shortener,
            recorder,
            base_url: base_url.trim_end_matches('/').into(),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn recorder(&self) -> &dyn Recorder {
        self.recorder.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public URL that redirects through `id`.
    pub fn short_url(&self, id: &ShortId) -> String {
        id.to_url(&self.base_url)
    }
}
