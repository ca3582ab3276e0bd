//! External collaborators of the edit engine
//!
//! - `traits`: reference data, remote update and persistence interfaces
//! - `store`: sled-backed and in-memory persistence
//! - `mock`: scriptable services for tests and demos

pub mod error;
pub mod mock;
pub mod store;
pub mod traits;

pub use error::{ServiceError, StoreError, StoreResult};
pub use mock::{MockReferenceService, MockUpdateService, UpdateCall};
pub use store::{MemoryStore, SledStore};
pub use traits::{ListPage, PersistenceService, ReferenceDataService, RemoteUpdateService};
