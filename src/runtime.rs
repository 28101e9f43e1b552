//! Runtime state shared by every program in a run.

pub mod store;

pub use store::Store;
