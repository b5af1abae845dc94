//! Result persistence
//!
//! [`JsonResultStore`] implements the [`ResultStore`](tq_application::ResultStore)
//! port as one pretty-printed JSON file.

mod json_store;

pub use json_store::JsonResultStore;
