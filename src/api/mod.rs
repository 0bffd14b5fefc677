pub mod auth;
pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;
