mod config;
mod error;
mod models;

pub(crate) use config::*;
pub use error::*;
pub use models::*;
