pub mod common;
pub mod config;
pub mod vdxnl;

pub use config::*;
