//! Record store backends for short links and their visits.

pub mod memory;
pub mod mysql;

pub use linkpulse_core::repository::{ReadRepository, Repository, Result};
pub use linkpulse_core::StorageError;
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
