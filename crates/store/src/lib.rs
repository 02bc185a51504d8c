//! Persistence layer: one JSON document per entity (week, client, request)
//! behind an abstract [`document::DocumentStore`], with the entity stores
//! providing the operations and concurrency discipline on top.

pub mod clients;
pub mod document;
pub mod ids;
pub mod locks;
pub mod requests;
pub mod weeks;

pub use clients::ClientRegistry;
pub use document::{DocumentStore, FileStore, MemoryStore};
pub use ids::{IdGenerator, IdNamespace};
pub use requests::{NewRequest, RequestStore};
pub use weeks::WeekStore;
