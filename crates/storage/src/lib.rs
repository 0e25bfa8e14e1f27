#![forbid(unsafe_code)]

pub mod codec;
pub mod repository;
pub mod sqlite;

pub use repository::{AppDataRepository, InMemoryRepository, STORAGE_KEY, Storage, StorageError};
