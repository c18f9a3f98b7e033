//! External collaborators: history providers and persistence sinks.

pub mod market_data;
pub mod persistence;

pub use market_data::{FileHistoryProvider, HistoryProvider};
pub use persistence::{MemorySink, PersistenceSink, StoredPrice, StoredSignal};
