//! Storage abstractions for the service layer
//!
//! Everything persists through [`KvStore`]: opaque string keys mapped to
//! JSON-serialized strings. Per-user data lives under keys derived by
//! [`namespace::UserScope`] and is read and written as whole collections.

pub mod kv_store;
pub mod json_file_store;
pub mod memory_store;
pub mod namespace;
pub mod collection;

pub use collection::Collection;
pub use json_file_store::JsonFileKvStore;
pub use kv_store::{get_json, set_json, KvStore};
pub use memory_store::MemoryKvStore;
pub use namespace::{DataKind, Namespace, UserScope};
