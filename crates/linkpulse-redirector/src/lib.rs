//! Redirect and visit recording.
//!
//! A [`RecorderService`] resolves a short id, classifies the visiting
//! client, and records the visit in the same store operation that yields the
//! redirect target. A target is only ever returned for a recorded visit.
//!
//! ```rust,no_run
//! use linkpulse_core::ShortId;
//! use linkpulse_redirector::{Recorder, RecorderService, VisitRequest};
//! use linkpulse_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RecorderService::new(InMemoryRepository::new());
//!
//! let id = ShortId::new("Ab3dE6gH")?;
//! let request = VisitRequest::new("Mozilla/5.0 (X11; Linux x86_64) Firefox/126.0", None);
//! let target = service.record_visit(&id, request).await?;
//! println!("Redirect to: {}", target.long_url);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod error;
pub mod recorder;
pub mod service;

pub use classifier::{Classifier, SubstringClassifier};
pub use error::{RedirectorError, Result};
pub use recorder::{RedirectTarget, Recorder, VisitRequest};
pub use service::RecorderService;
