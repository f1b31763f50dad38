use std::fmt;
use std::str::FromStr;

use super::{Result, UnsupportedRecordTypeSnafu};

/// Point-in-time view of one DNS record as shown by a provider.
///
/// `id` is only meaningful within the session and domain it was read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

/// The record types that can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    A,
    Cname,
    Mx,
    Txt,
    Aaaa,
    Srv,
    Caa,
}

impl RecordKind {
    pub const ALL: [RecordKind; 7] = [
        RecordKind::A,
        RecordKind::Cname,
        RecordKind::Mx,
        RecordKind::Txt,
        RecordKind::Aaaa,
        RecordKind::Srv,
        RecordKind::Caa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::A => "A",
            RecordKind::Cname => "CNAME",
            RecordKind::Mx => "MX",
            RecordKind::Txt => "TXT",
            RecordKind::Aaaa => "AAAA",
            RecordKind::Srv => "SRV",
            RecordKind::Caa => "CAA",
        }
    }

    /// Numeric type used by the VDX.nl save form.
    pub fn type_code(&self) -> u8 {
        match self {
            RecordKind::A => 2,
            RecordKind::Cname => 3,
            RecordKind::Mx => 4,
            RecordKind::Txt => 7,
            RecordKind::Aaaa => 8,
            RecordKind::Srv => 9,
            RecordKind::Caa => 10,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = super::Error;

    fn from_str(value: &str) -> Result<Self> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                UnsupportedRecordTypeSnafu {
                    kind: value,
                    supported: RecordKind::ALL
                        .iter()
                        .map(RecordKind::as_str)
                        .collect::<Vec<_>>()
                        .join(", "),
                }
                .build()
            })
    }
}

/// Client side record filter. Empty values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        [&self.id, &self.kind, &self.name, &self.content]
            .iter()
            .all(|v| set(v).is_none())
    }

    /// Filters by id, then type, then name, then content.
    ///
    /// id and type must match exactly. name matches when the record name
    /// contains the query with one trailing dot removed. content is compared
    /// case-insensitively.
    pub fn apply(&self, mut records: Vec<Record>) -> Vec<Record> {
        if let Some(id) = set(&self.id) {
            tracing::debug!(records = records.len(), id, "Filtering records by id");
            records.retain(|record| record.id == id);
        }
        if let Some(kind) = set(&self.kind) {
            tracing::debug!(records = records.len(), kind, "Filtering records by type");
            records.retain(|record| record.kind == kind);
        }
        if let Some(name) = set(&self.name) {
            tracing::debug!(records = records.len(), name, "Filtering records by name");
            let name = name.strip_suffix('.').unwrap_or(name);
            records.retain(|record| record.name.contains(name));
        }
        if let Some(content) = set(&self.content) {
            tracing::debug!(
                records = records.len(),
                content,
                "Filtering records by content"
            );
            let content = content.to_lowercase();
            records.retain(|record| record.content.to_lowercase() == content);
        }
        records
    }
}

fn set(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A DNS provider reachable through an authenticated session.
///
/// Implementations hold mutable session state. Use one instance from one
/// thread at a time.
pub trait Provider {
    fn get_domain(&self) -> &str;

    /// Returns false when the login was rejected. Fails when the configured
    /// domain is not part of the account.
    fn authenticate(&mut self) -> Result<bool>;

    fn list_records(&mut self, filter: &RecordFilter) -> Result<Vec<Record>>;

    fn create_record(&mut self, kind: &str, name: &str, content: &str) -> Result<bool>;

    fn update_record(
        &mut self,
        identifier: &str,
        kind: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<bool>;

    fn delete_record(&mut self, identifier: Option<&str>, filter: &RecordFilter) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, kind: &str, name: &str, content: &str) -> Record {
        Record {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            content: content.into(),
        }
    }

    fn fixture() -> Vec<Record> {
        vec![
            record("11", "A", "host.example.com", "192.0.2.1"),
            record("12", "CNAME", "www.example.com", "target.com"),
            record("13", "TXT", "example.com", "v=spf1 -all"),
            record("14", "A", "other.example.com", "192.0.2.2"),
        ]
    }

    #[test]
    fn type_codes_match_save_form() {
        let codes: Vec<(&str, u8)> = RecordKind::ALL
            .iter()
            .map(|k| (k.as_str(), k.type_code()))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("A", 2),
                ("CNAME", 3),
                ("MX", 4),
                ("TXT", 7),
                ("AAAA", 8),
                ("SRV", 9),
                ("CAA", 10)
            ]
        );
    }

    #[test]
    fn parses_kinds_case_insensitively() {
        assert_eq!("cname".parse::<RecordKind>().unwrap(), RecordKind::Cname);
        assert_eq!("AAAA".parse::<RecordKind>().unwrap(), RecordKind::Aaaa);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "NS".parse::<RecordKind>().unwrap_err();
        assert!(matches!(
            err,
            crate::common::Error::UnsupportedRecordTypeError { ref kind, .. } if kind == "NS"
        ));
    }

    #[test]
    fn empty_filter_keeps_everything() {
        assert!(RecordFilter::new().is_empty());
        assert!(RecordFilter::new().name("").is_empty());
        assert_eq!(RecordFilter::new().apply(fixture()).len(), 4);
    }

    #[test]
    fn name_matches_by_containment_after_trailing_dot() {
        let found = RecordFilter::new().name("host.").apply(fixture());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "host.example.com");

        let found = RecordFilter::new().name("example.com.").apply(fixture());
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn only_one_trailing_dot_is_stripped() {
        let found = RecordFilter::new().name("host..").apply(fixture());
        assert!(found.is_empty());
    }

    #[test]
    fn content_is_case_insensitive_and_exact() {
        let found = RecordFilter::new().content("TARGET.COM").apply(fixture());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "12");

        assert!(RecordFilter::new().content("target").apply(fixture()).is_empty());
    }

    #[test]
    fn id_and_type_are_exact() {
        assert_eq!(RecordFilter::new().id("1").apply(fixture()).len(), 0);
        assert_eq!(RecordFilter::new().kind("a").apply(fixture()).len(), 0);

        let found = RecordFilter::new()
            .kind("A")
            .name("example.com")
            .content("192.0.2.2")
            .apply(fixture());
        assert_eq!(found, vec![record("14", "A", "other.example.com", "192.0.2.2")]);
    }

    #[test]
    fn record_serializes_kind_as_type() {
        let json = serde_json::to_value(record("11", "A", "host.example.com", "192.0.2.1")).unwrap();
        assert_eq!(json["type"], "A");
        assert!(json.get("kind").is_none());
    }
}
