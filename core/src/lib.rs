pub mod budget;
pub mod catalog;
pub mod clock;
pub mod controller;
pub mod error;
pub mod label;
pub mod models;
pub mod nutrition;
pub mod state;
pub mod storage;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Change, SubscriptionId, TrackerController};
pub use error::TrackerError;
pub use storage::{KeyValueStore, MemoryStore, PersistenceGateway, SqliteStore};
