//! HTTP surface of linkpulse: the owner dashboard API under `/v1/urls` and
//! the public redirect endpoint `/{short_id}`.

pub mod app;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::{AppError, Result};
pub use extract::{OwnerId, OWNER_HEADER};
pub use state::AppState;
