//! Storage tiers and the persistence policy
//!
//! The trait-based tier design allows swapping between in-memory and
//! file-backed storage; `PersistentStore` layers the migration and
//! blob-split policy on top of two tiers.

mod file;
mod memory;
mod persist;
mod traits;

pub use file::{FileTier, LOCAL_FILENAME, SYNCED_FILENAME, SYNCED_QUOTA_BYTES};
pub use memory::MemoryTier;
pub use persist::{LoadedData, PersistentStore};
pub use traits::{KEY_BG_IMAGE, KEY_PREFERENCES, KEY_SHORTCUTS, StorageTier};
