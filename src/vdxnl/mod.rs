mod client;
mod config;
mod models;
mod scrape;
mod transport;

pub use client::*;
pub use config::*;
pub use scrape::{HtmlScraper, Markup};
pub use transport::{Transport, UreqTransport};

pub const PROVIDER_NAME: &str = "VDX.nl";
