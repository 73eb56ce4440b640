pub mod error;
pub mod inventory_client;
pub mod progress;
pub mod view;
