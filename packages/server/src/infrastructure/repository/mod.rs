//! Repository 実装
//!
//! - `inmemory`: プロセス内メモリを使った実装

pub mod inmemory;

pub use inmemory::InMemoryConnectionRepository;
