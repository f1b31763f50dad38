#[derive(Clone, serde::Deserialize)]
pub struct Config {
    /// Zone to manage, as listed on the account page.
    pub domain: String,
    pub auth_username: String,
    /// Either the password or `@/path/to/file` holding it.
    pub auth_password: String,
}
