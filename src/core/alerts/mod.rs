pub mod dedup;
pub mod model;
pub mod rules;
pub mod store;
pub mod suggestions;
