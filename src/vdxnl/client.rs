use crate::common::{
    DomainNotFoundSnafu, InvalidInputSnafu, NotAuthenticatedSnafu, Provider, Record,
    RecordFilter, RecordKind, ResponseSnafu, Result,
};

use super::models::{
    accounts_url, create_form, delete_form, dns_url, login_form, save_url, LOGIN_URL, PORTAL_URL,
};
use super::scrape::{HtmlScraper, Markup};
use super::transport::{Transport, UreqTransport};
use super::PROVIDER_NAME;

/// DNS client for the VDX.nl account console.
///
/// The console has no API, so every operation drives the web forms of an
/// authenticated session and reads state back from the rendered HTML.
/// [`Provider::authenticate`] must succeed before any record operation.
///
/// A client owns one cookie session. It is not meant to be shared between
/// threads.
pub struct VdxClient<T: Transport = UreqTransport, M: Markup = HtmlScraper> {
    config: super::Config,
    transport: T,
    markup: M,
    domain_id: Option<String>,
}

impl VdxClient {
    pub fn new(config: super::Config) -> Result<Self> {
        let markup = HtmlScraper::new()?;
        Ok(Self::with_parts(config, UreqTransport::new(), markup))
    }
}

impl<T: Transport, M: Markup> VdxClient<T, M> {
    pub fn with_parts(config: super::Config, transport: T, markup: M) -> Self {
        Self {
            config,
            transport,
            markup,
            domain_id: None,
        }
    }

    /// Identifier of the configured domain, known after authenticating.
    pub fn domain_id(&self) -> Option<&str> {
        self.domain_id.as_deref()
    }

    fn require_domain_id(&self) -> Result<String> {
        match &self.domain_id {
            Some(id) => Ok(id.clone()),
            None => NotAuthenticatedSnafu.fail(),
        }
    }

    /// Log in with explicit credentials and look up the domain identifier.
    pub fn authenticate_with(&mut self, username: &str, password: &str) -> Result<bool> {
        self.domain_id = None;
        self.transport.reset();

        // Picks up the portal session cookie
        self.transport.get(&format!("{PORTAL_URL}/"))?;

        let login_page = self
            .transport
            .post_form(LOGIN_URL, &login_form(username, password))?;

        let link = match self.markup.continue_link(&login_page) {
            Some(link) => link,
            None => {
                tracing::warn!(
                    provider = PROVIDER_NAME,
                    username,
                    "Login failed, check username and password"
                );
                return Ok(false);
            }
        };

        let link = url::Url::parse(LOGIN_URL)
            .and_then(|base| base.join(&link))
            .map_err(|err| {
                ResponseSnafu {
                    message: format!("Invalid login continue link {link}: {err}"),
                }
                .build()
            })?;
        self.transport.get(link.as_str())?;

        let accounts = self.transport.get(&accounts_url())?;
        let Some(domain_id) = self.markup.domain_id(&accounts, &self.config.domain) else {
            tracing::warn!(
                provider = PROVIDER_NAME,
                domain = self.config.domain,
                "Domain not found in account"
            );
            return DomainNotFoundSnafu {
                domain: &self.config.domain,
            }
            .fail();
        };

        tracing::debug!(provider = PROVIDER_NAME, domain_id, "Authenticated");
        self.domain_id = Some(domain_id);
        Ok(true)
    }

    /// The save reply is ignored, whatever its status. Outcomes are read
    /// back from the DNS page.
    fn post_save(&mut self, domain_id: &str, form: Vec<(String, String)>) -> Result<()> {
        self.transport.post_form(&save_url(domain_id), &form)?;
        Ok(())
    }
}

impl<T: Transport, M: Markup> Provider for VdxClient<T, M> {
    fn get_domain(&self) -> &str {
        &self.config.domain
    }

    fn authenticate(&mut self) -> Result<bool> {
        let username = self.config.auth_username.clone();
        let password = self.config.auth_password.clone();
        self.authenticate_with(&username, &password)
    }

    fn list_records(&mut self, filter: &RecordFilter) -> Result<Vec<Record>> {
        let domain_id = self.require_domain_id()?;
        let page = self.transport.get(&dns_url(&domain_id))?;
        let records = filter.apply(self.markup.records(&page)?);

        tracing::debug!(
            provider = PROVIDER_NAME,
            records = records.len(),
            "Listed records"
        );
        Ok(records)
    }

    fn create_record(&mut self, kind: &str, name: &str, content: &str) -> Result<bool> {
        let kind: RecordKind = kind.parse()?;
        let domain_id = self.require_domain_id()?;

        let existing = self.list_records(
            &RecordFilter::new()
                .kind(kind.as_str())
                .name(name)
                .content(content),
        )?;
        if !existing.is_empty() {
            tracing::warn!(
                provider = PROVIDER_NAME,
                kind = kind.as_str(),
                name,
                content,
                "Duplicate record, NOOP"
            );
            return Ok(true);
        }

        tracing::info!(
            provider = PROVIDER_NAME,
            kind = kind.as_str(),
            name,
            content,
            "Creating record"
        );
        self.post_save(&domain_id, create_form(kind, name, content))?;

        // The save response says nothing useful, so look for the record
        let created = self.list_records(&RecordFilter::new().kind(kind.as_str()).name(name))?;
        if created.is_empty() {
            tracing::warn!(
                provider = PROVIDER_NAME,
                kind = kind.as_str(),
                name,
                "Record not found after create"
            );
            return Ok(false);
        }

        tracing::info!(
            provider = PROVIDER_NAME,
            kind = kind.as_str(),
            name,
            "Created record"
        );
        Ok(true)
    }

    fn update_record(
        &mut self,
        identifier: &str,
        kind: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<bool> {
        self.require_domain_id()?;
        if identifier.is_empty() {
            return InvalidInputSnafu {
                message: "Record identifier is required for update",
            }
            .fail();
        }

        // Missing fields are taken from the record being replaced
        let current = if kind.is_none() || name.is_none() || content.is_none() {
            self.list_records(&RecordFilter::new().id(identifier))?
                .into_iter()
                .next()
        } else {
            None
        };
        let (Some(kind), Some(name), Some(content)) = (
            pick(kind, current.as_ref(), |r| r.kind.as_str()),
            pick(name, current.as_ref(), |r| r.name.as_str()),
            pick(content, current.as_ref(), |r| r.content.as_str()),
        ) else {
            return InvalidInputSnafu {
                message: format!(
                    "Record {identifier} not found, type, name and content are required"
                ),
            }
            .fail();
        };

        // Refuse before deleting anything
        let kind: RecordKind = kind.parse()?;

        tracing::info!(
            provider = PROVIDER_NAME,
            record_id = identifier,
            kind = kind.as_str(),
            name,
            content,
            "Updating record"
        );
        self.delete_record(Some(identifier), &RecordFilter::new())?;
        self.create_record(kind.as_str(), &name, &content)
    }

    fn delete_record(&mut self, identifier: Option<&str>, filter: &RecordFilter) -> Result<bool> {
        let domain_id = self.require_domain_id()?;

        let ids: Vec<String> = match identifier.filter(|id| !id.is_empty()) {
            Some(id) => vec![id.to_string()],
            None => {
                if filter.is_empty() {
                    tracing::warn!(
                        provider = PROVIDER_NAME,
                        "No filters given, deleting every record"
                    );
                }
                self.list_records(filter)?
                    .into_iter()
                    .map(|record| record.id)
                    .filter(|id| !id.is_empty())
                    .collect()
            }
        };
        tracing::debug!(provider = PROVIDER_NAME, ids = ?ids, "Record IDs to delete");

        for id in ids {
            tracing::info!(provider = PROVIDER_NAME, record_id = id, "Deleting record");
            self.post_save(&domain_id, delete_form(&id))?;
        }

        Ok(true)
    }
}

fn pick(
    given: Option<&str>,
    current: Option<&Record>,
    field: fn(&Record) -> &str,
) -> Option<String> {
    given.or_else(|| current.map(field)).map(str::to_string)
}

impl TryFrom<super::Config> for VdxClient {
    type Error = crate::common::Error;

    fn try_from(mut value: super::Config) -> Result<Self> {
        value.auth_password =
            crate::common::key_file_or_string(value.auth_password, "vdxnl.auth_password")?;
        Self::new(value)
    }
}
