pub mod error;
pub mod handlers;
pub mod server;
pub mod templates;
pub mod utils;
