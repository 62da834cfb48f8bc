mod health;
mod redirect;
mod url;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use url::{create_url_handler, delete_url_handler, get_url_handler, list_urls_handler};

use crate::error::AppError;
use linkpulse_core::ShortId;

/// A path segment that is not a well-formed id cannot name a stored link.
fn parse_short_id(raw: String) -> Result<ShortId, AppError> {
    ShortId::new(raw.as_str()).map_err(|_| AppError::NotFound(raw))
}
