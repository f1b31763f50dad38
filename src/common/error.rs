use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{method} {url} failed: {source}"))]
    RequestError {
        url: String,
        method: String,
        source: ureq::Error,
    },
    #[snafu(display("Failed to read response body from {url}: {source}"))]
    BodyError {
        url: String,
        source: std::io::Error,
    },
    #[snafu(display("{message}"))]
    ResponseError { message: String },
    #[snafu(display("Domain {domain} not found in account"))]
    DomainNotFoundError { domain: String },
    #[snafu(display("Not authenticated, call authenticate first"))]
    NotAuthenticatedError,
    #[snafu(display("Unsupported record type {kind}, expected one of {supported}"))]
    UnsupportedRecordTypeError { kind: String, supported: String },
    #[snafu(display("{message}"))]
    InvalidInputError { message: String },
    #[snafu(display("Failed to build HTML scraper: {message}"))]
    ScraperError { message: String },
    #[snafu(display("{prefix}: {message}"))]
    ConfigError { prefix: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
