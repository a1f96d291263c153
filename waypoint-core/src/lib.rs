pub mod dates;
pub mod fares;
pub mod flight;
pub mod inventory;
pub mod memory;
pub mod repository;
pub mod search;

pub use flight::{FlightLeg, LegKey};
pub use memory::InMemoryInventory;
pub use repository::InventoryStore;
pub use search::{search, DayAlternatives, SearchQuery, SearchResult};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Inventory storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
