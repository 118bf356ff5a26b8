use url::Url;

const LOGIN_PATH: &str = "login/login.php";
const REUPLOAD_PATH: &str = "reupload/songAdd.php";

/// Dashboard URLs derived from its base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardEndpoints {
    login: Url,
    reupload: Url,
}

impl DashboardEndpoints {
    /// `base` is the dashboard root, e.g. `https://geodash.click/dashboard`.
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        // without the trailing slash `join` would replace the last segment
        let base = Url::parse(&format!("{}/", base.trim_end_matches('/')))?;
        Ok(Self {
            login: base.join(LOGIN_PATH)?,
            reupload: base.join(REUPLOAD_PATH)?,
        })
    }

    pub fn login(&self) -> &Url {
        &self.login
    }

    pub fn reupload(&self) -> &Url {
        &self.reupload
    }
}
