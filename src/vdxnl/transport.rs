use snafu::ResultExt;

use crate::common::{BodySnafu, RequestSnafu, Result};

use super::PROVIDER_NAME;

/// A cookie-carrying HTTP session.
pub trait Transport {
    /// Drop all session state and start over.
    fn reset(&mut self);

    fn get(&mut self, url: &str) -> Result<String>;

    fn post_form(&mut self, url: &str, form: &[(String, String)]) -> Result<String>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn reset(&mut self) {
        self.agent = ureq::AgentBuilder::new().build();
    }

    fn get(&mut self, url: &str) -> Result<String> {
        tracing::debug!(url, method = "GET", provider = PROVIDER_NAME, "Sending request");
        read_body(self.agent.get(url).call(), url, "GET")
    }

    fn post_form(&mut self, url: &str, form: &[(String, String)]) -> Result<String> {
        tracing::debug!(
            url,
            method = "POST",
            provider = PROVIDER_NAME,
            fields = form.len(),
            "Sending request"
        );
        let pairs: Vec<(&str, &str)> = form
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        read_body(self.agent.post(url).send_form(&pairs), url, "POST")
    }
}

/// The console answers rejected logins and saves with error statuses, and the
/// page body is still what decides the outcome. Only transport failures are
/// errors here.
fn read_body(
    result: std::result::Result<ureq::Response, ureq::Error>,
    url: &str,
    method: &str,
) -> Result<String> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(status, response)) => {
            tracing::debug!(
                url,
                method,
                status,
                provider = PROVIDER_NAME,
                "Request returned error status"
            );
            response
        }
        Err(err) => return Err(err).context(RequestSnafu { url, method }),
    };
    response.into_string().context(BodySnafu { url })
}
