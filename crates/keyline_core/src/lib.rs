//! Keyline Core
//!
//! Host-facing seams shared by the tween engine and the timeline editor:
//!
//! - **Events**: pointer input delivered by the host, in surface coordinates
//! - **Store**: an opaque string key-value store used for persistence
//!
//! # Example
//!
//! ```rust
//! use keyline_core::{KeyValueStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! store.set("keyline.settings.timeScale", "0.5".to_string()).unwrap();
//! assert_eq!(store.get("keyline.settings.timeScale").as_deref(), Some("0.5"));
//! ```

pub mod events;
pub mod store;

pub use events::{Event, EventData, EventType};
pub use store::{KeyValueStore, MemoryStore, StoreError};
