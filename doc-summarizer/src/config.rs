use crate::types::{Result, WorkflowError};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const ENV_STORAGE_URL: &str = "DOC_SUMMARIZER_STORAGE_URL";
pub const ENV_AI_URL: &str = "DOC_SUMMARIZER_AI_URL";
pub const ENV_API_TOKEN: &str = "DOC_SUMMARIZER_API_TOKEN";
pub const ENV_USER_ID: &str = "DOC_SUMMARIZER_USER_ID";
pub const ENV_APP_SLUG: &str = "DOC_SUMMARIZER_APP_SLUG";
pub const ENV_UPLOAD_TIMEOUT: &str = "DOC_SUMMARIZER_UPLOAD_TIMEOUT";
pub const ENV_SUMMARIZE_TIMEOUT: &str = "DOC_SUMMARIZER_SUMMARIZE_TIMEOUT";
pub const ENV_THREAD_LENGTH: &str = "DOC_SUMMARIZER_THREAD_LENGTH";

/// Everything the workflow needs to reach its two endpoints.
///
/// Passed to the controller at construction; nothing in the request path
/// reads the environment directly.
#[derive(Clone)]
pub struct WorkflowConfig {
    pub storage_base_url: String,
    pub ai_base_url: String,
    pub api_token: String,
    pub user_id: String,
    pub app_slug: String,
    pub upload_timeout_seconds: u64,
    pub summarize_timeout_seconds: u64,
    pub user_agent: String,
    /// Append the selected summary length to the prompt
    pub thread_summary_length: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            storage_base_url: "http://localhost:8080".to_string(),
            ai_base_url: "http://localhost:8080".to_string(),
            api_token: String::new(),
            user_id: "anonymous".to_string(),
            app_slug: "doc-summarizer".to_string(),
            upload_timeout_seconds: 60,
            summarize_timeout_seconds: 120,
            user_agent: "Doc-Summarizer/1.0".to_string(),
            thread_summary_length: false,
        }
    }
}

// Keep the token out of logs
impl fmt::Debug for WorkflowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowConfig")
            .field("storage_base_url", &self.storage_base_url)
            .field("ai_base_url", &self.ai_base_url)
            .field("api_token", &if self.api_token.is_empty() { "<unset>" } else { "***" })
            .field("user_id", &self.user_id)
            .field("app_slug", &self.app_slug)
            .field("upload_timeout_seconds", &self.upload_timeout_seconds)
            .field("summarize_timeout_seconds", &self.summarize_timeout_seconds)
            .field("user_agent", &self.user_agent)
            .field("thread_summary_length", &self.thread_summary_length)
            .finish()
    }
}

impl WorkflowConfig {
    /// Build a configuration from `DOC_SUMMARIZER_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with `KEY=VALUE` lines from a dotenv file filling
    /// in whatever the process environment leaves unset.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let unreadable = |e: dotenvy::Error| WorkflowError::Config(format!("cannot read {}: {}", path.display(), e));

        let mut file_values = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(unreadable)? {
            let (key, value) = item.map_err(unreadable)?;
            file_values.insert(key, value);
        }

        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file_values.get(key).cloned()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_STORAGE_URL) {
            config.storage_base_url = value;
        }
        if let Some(value) = lookup(ENV_AI_URL) {
            config.ai_base_url = value;
        }
        if let Some(value) = lookup(ENV_API_TOKEN) {
            config.api_token = value;
        }
        if let Some(value) = lookup(ENV_USER_ID) {
            config.user_id = value;
        }
        if let Some(value) = lookup(ENV_APP_SLUG) {
            config.app_slug = value;
        }
        if let Some(value) = lookup(ENV_UPLOAD_TIMEOUT) {
            config.upload_timeout_seconds = parse_seconds(ENV_UPLOAD_TIMEOUT, &value)?;
        }
        if let Some(value) = lookup(ENV_SUMMARIZE_TIMEOUT) {
            config.summarize_timeout_seconds = parse_seconds(ENV_SUMMARIZE_TIMEOUT, &value)?;
        }
        if let Some(value) = lookup(ENV_THREAD_LENGTH) {
            config.thread_summary_length = parse_flag(ENV_THREAD_LENGTH, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.storage_base_url)?;
        Url::parse(&self.ai_base_url)?;

        if self.upload_timeout_seconds == 0 || self.summarize_timeout_seconds == 0 {
            return Err(WorkflowError::Config("timeouts must be greater than zero".to_string()));
        }
        if self.user_id.trim().is_empty() {
            return Err(WorkflowError::Config("user id must not be empty".to_string()));
        }
        if self.app_slug.trim().is_empty() {
            return Err(WorkflowError::Config("app slug must not be empty".to_string()));
        }

        Ok(())
    }

    /// The HTTP backends refuse to run without a token.
    pub fn require_credentials(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(WorkflowError::Config(format!("{} is not set", ENV_API_TOKEN)));
        }
        Ok(())
    }

    pub fn upload_endpoint(&self) -> String {
        format!("{}/storage/upload", self.storage_base_url.trim_end_matches('/'))
    }

    pub fn ai_endpoint(&self) -> String {
        format!("{}/ai", self.ai_base_url.trim_end_matches('/'))
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_seconds)
    }

    pub fn summarize_timeout(&self) -> Duration {
        Duration::from_secs(self.summarize_timeout_seconds)
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| WorkflowError::Config(format!("{} must be a whole number of seconds, got '{}'", key, value)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(WorkflowError::Config(format!("{} must be a boolean, got '{}'", key, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = WorkflowConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.upload_timeout_seconds, 60);
        assert_eq!(config.summarize_timeout_seconds, 120);
        assert!(!config.thread_summary_length);
        assert!(config.require_credentials().is_err());
    }

    #[test]
    fn reads_dotenv_file() {
        let path = std::env::temp_dir().join(format!("doc-summarizer-{}.env", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "DOC_SUMMARIZER_USER_ID=from-file\nDOC_SUMMARIZER_SUMMARIZE_TIMEOUT=7\n# comment\n",
        )
        .unwrap();

        let config = WorkflowConfig::from_env_file(&path).unwrap();
        assert_eq!(config.user_id, "from-file");
        assert_eq!(config.summarize_timeout_seconds, 7);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_dotenv_file_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("doc-summarizer-{}.env", uuid::Uuid::new_v4()));
        let err = WorkflowConfig::from_env_file(&path).unwrap_err();
        assert!(matches!(err, WorkflowError::Config(ref msg) if msg.contains("cannot read")));
    }

    #[test]
    fn reads_overrides() {
        let config = WorkflowConfig::from_lookup(lookup_from(&[
            (ENV_STORAGE_URL, "https://store.example.com/"),
            (ENV_AI_URL, "https://ai.example.com"),
            (ENV_API_TOKEN, "secret"),
            (ENV_USER_ID, "user-7"),
            (ENV_APP_SLUG, "summaries"),
            (ENV_UPLOAD_TIMEOUT, "5"),
            (ENV_THREAD_LENGTH, "yes"),
        ]))
        .unwrap();

        assert_eq!(config.upload_endpoint(), "https://store.example.com/storage/upload");
        assert_eq!(config.ai_endpoint(), "https://ai.example.com/ai");
        assert_eq!(config.upload_timeout(), Duration::from_secs(5));
        assert_eq!(config.user_id, "user-7");
        assert!(config.thread_summary_length);
        assert!(config.require_credentials().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(WorkflowConfig::from_lookup(lookup_from(&[(ENV_UPLOAD_TIMEOUT, "soon")])).is_err());
        assert!(WorkflowConfig::from_lookup(lookup_from(&[(ENV_SUMMARIZE_TIMEOUT, "0")])).is_err());
        assert!(WorkflowConfig::from_lookup(lookup_from(&[(ENV_AI_URL, "not a url")])).is_err());
        assert!(WorkflowConfig::from_lookup(lookup_from(&[(ENV_THREAD_LENGTH, "maybe")])).is_err());
    }

    #[test]
    fn debug_hides_token() {
        let config = WorkflowConfig {
            api_token: "super-secret".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }
}
