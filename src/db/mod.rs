pub mod migrations;
pub mod repository;
pub mod store;

#[cfg(test)]
pub use store::MemoryStore;
pub use store::{SqliteStore, Store, StoreError};
