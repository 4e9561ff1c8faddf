//! Process-wide "current token" slot and its synchronisation with an external store.
pub mod holder;
pub mod store;
pub mod sync;

pub use holder::TokenHolder;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
pub use sync::TokenSync;
