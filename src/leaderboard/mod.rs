pub mod entry;
pub mod ranker;
pub mod recovery;
pub mod store;
