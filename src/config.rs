use crate::error::{
    BadEnvVarSnafu, InvalidUrlSnafu, ParseNumberSnafu, RosterResult, UnusableBaseUrlSnafu,
};
use dotenvy::var;
use snafu::{ResultExt, ensure};
use std::{env::VarError, sync::Arc};
use url::Url;

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_ip: String,
    api_config: Arc<ApiConfig>,
    table_config: TableConfig,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        Ok(Self {
            server_ip: optional_env_var("ROSTER_SERVER_IP")?
                .unwrap_or_else(|| DEFAULT_SERVER_IP.to_string()),
            api_config: Arc::new(ApiConfig::new()?),
            table_config: TableConfig::new()?,
        })
    }

    #[cfg(test)]
    pub fn from_parts(server_ip: String, api_config: ApiConfig, table_config: TableConfig) -> Self {
        Self {
            server_ip,
            api_config: Arc::new(api_config),
            table_config,
        }
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub const fn table_config(&self) -> TableConfig {
        self.table_config
    }
}

/// Where the student service lives, and where it keeps avatar images.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: Url,
    avatar_base_url: String,
}

impl ApiConfig {
    pub fn new() -> RosterResult<Self> {
        let base_url = optional_env_var("STUDENT_API_URL")?
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let avatar_base_url = optional_env_var("AVATAR_BASE_URL")?;

        Self::with_base_url(base_url, avatar_base_url)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        avatar_base_url: Option<String>,
    ) -> RosterResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let avatar_base_url = avatar_base_url.map_or_else(
            || format!("{base_url}/images"),
            |url| url.trim_end_matches('/').to_string(),
        );

        let parsed = Url::parse(&base_url).context(InvalidUrlSnafu { url: &base_url })?;
        //ids are appended as path segments later on
        ensure!(!parsed.cannot_be_a_base(), UnusableBaseUrlSnafu { url: base_url });

        Ok(Self {
            base_url: parsed,
            avatar_base_url,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn avatar_url(&self, avatar: &str) -> String {
        format!("{}/{}", self.avatar_base_url, avatar.trim_start_matches('/'))
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TableConfig {
    pub page_size: usize,
    pub max_avatar_bytes: usize,
}

impl TableConfig {
    pub fn new() -> RosterResult<Self> {
        Ok(Self {
            page_size: optional_number_env_var("ROSTER_PAGE_SIZE")?
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .max(1),
            max_avatar_bytes: optional_number_env_var("MAX_AVATAR_BYTES")?
                .unwrap_or(DEFAULT_MAX_AVATAR_BYTES),
        })
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
        }
    }
}

fn optional_env_var(name: &'static str) -> RosterResult<Option<String>> {
    match var(name) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(e) => Err(e).context(BadEnvVarSnafu { name }),
    }
}

fn optional_number_env_var(name: &'static str) -> RosterResult<Option<usize>> {
    optional_env_var(name)?
        .map(|value| value.trim().parse().context(ParseNumberSnafu { name }))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_base_defaults_to_images_under_api() {
        let config = ApiConfig::with_base_url("http://localhost:8000/", None).unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(
            config.avatar_url("abc.png"),
            "http://localhost:8000/images/abc.png"
        );
    }

    #[test]
    fn avatar_base_can_be_overridden() {
        let config = ApiConfig::with_base_url(
            "http://localhost:8000",
            Some("https://cdn.example.org/avatars/".to_string()),
        )
        .unwrap();
        assert_eq!(
            config.avatar_url("/abc.png"),
            "https://cdn.example.org/avatars/abc.png"
        );
    }

    #[test]
    fn rejects_unusable_service_urls() {
        assert!(matches!(
            ApiConfig::with_base_url("not a url", None),
            Err(crate::error::RosterError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ApiConfig::with_base_url("mailto:admin@example.org", None),
            Err(crate::error::RosterError::UnusableBaseUrl { .. })
        ));
    }
}
