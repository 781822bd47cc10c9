#![forbid(unsafe_code)]

pub mod media;
pub mod repository;
pub mod seed;
pub mod sqlite;

pub use repository::{Storage, StorageError};
