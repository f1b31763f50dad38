use crate::common::RecordKind;

pub(super) const PORTAL_URL: &str = "https://mijn.vdx.nl";
pub(super) const LOGIN_URL: &str = "https://accounts.vdx.nl/login?service=aHR0cHM6Ly9taWpuLnZkeC5ubC9sb2dpbj9mcm9tPWFjY291bnRz";
pub(super) const LOGIN_SERVICE: &str = "https://mijn.vdx.nl/login";

/// Row index the console uses for a new, unsaved record.
const NEW_ROW: &str = "1";

pub(super) type Form = Vec<(String, String)>;

pub(super) fn accounts_url() -> String {
    format!("{PORTAL_URL}/accounts")
}

pub(super) fn dns_url(domain_id: &str) -> String {
    format!("{PORTAL_URL}/accounts/{domain_id}/dns")
}

pub(super) fn save_url(domain_id: &str) -> String {
    format!("{PORTAL_URL}/accounts/{domain_id}/dns/save")
}

pub(super) fn login_form(username: &str, password: &str) -> Form {
    vec![
        ("username".into(), username.into()),
        ("password".into(), password.into()),
        ("action".into(), "login".into()),
        ("service".into(), LOGIN_SERVICE.into()),
    ]
}

pub(super) fn create_form(kind: RecordKind, name: &str, content: &str) -> Form {
    vec![
        (format!("XvalA_{NEW_ROW}"), name.into()),
        (format!("Xtype_{NEW_ROW}"), kind.type_code().to_string()),
        (format!("XvalB_{NEW_ROW}"), String::new()),
        (format!("XvalC_{NEW_ROW}"), content.into()),
        (format!("Xdel_{NEW_ROW}"), "0".into()),
    ]
}

/// Deleting is a save of the existing row with its fields cleared and
/// the delete flag set.
pub(super) fn delete_form(record_id: &str) -> Form {
    vec![
        (format!("type_{record_id}"), String::new()),
        (format!("valA_{record_id}"), String::new()),
        (format!("valB_{record_id}"), String::new()),
        (format!("valC_{record_id}"), String::new()),
        (format!("del_{record_id}"), "1".into()),
    ]
}
