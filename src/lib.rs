pub mod consolidate;
pub mod discover;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod store;
