pub mod career;
pub mod common_opponents;
pub mod comparison;
pub mod config;
pub mod error;
pub mod fetch;
pub mod head_to_head;
pub mod http_client;
pub mod model;
pub mod profile;
pub mod progress;
pub mod reconcile;
pub mod report;
pub mod resolve;
pub mod summary;
pub mod transport;
