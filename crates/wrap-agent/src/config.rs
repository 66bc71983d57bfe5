use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use mail_dispatch::{MailerConfig, TlsMode};
use narrative_client::NarrativeConfig;

/// All runtime settings, read from the environment exactly once before any
/// network I/O. Missing required values fail the run here.
#[derive(Debug, Clone)]
pub struct WrapConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_tls: TlsMode,
    pub sender_email: String,
    pub sender_password: String,
    pub recipients: Vec<String>,

    pub template_path: PathBuf,
    pub output_dir: PathBuf,

    pub providers: Vec<String>,
    pub fetch_max_attempts: u32,
    pub http_timeout: Duration,
    pub nse_rate_limit: usize,

    pub narrative: Option<NarrativeConfig>,
}

const DEFAULT_PROVIDERS: &str = "indices,movers,sectors,flows,commodities,narrative";

impl WrapConfig {
    pub fn from_env() -> Result<Self> {
        let sender_email = required("SENDER_EMAIL")?;
        let sender_password = required("SENDER_PASSWORD")?;
        let recipients = split_list(&required("RECIPIENT_EMAILS")?);
        if recipients.is_empty() {
            anyhow::bail!("RECIPIENT_EMAILS contains no addresses");
        }
        let template_path = PathBuf::from(required("TEMPLATE_PATH")?);

        Ok(Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT is not a valid port")?,
            smtp_tls: TlsMode::parse(&env::var("SMTP_TLS").unwrap_or_default()),
            sender_email,
            sender_password,
            recipients,
            template_path,
            output_dir: PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| ".".to_string())),
            providers: split_list(
                &env::var("PROVIDERS").unwrap_or_else(|_| DEFAULT_PROVIDERS.to_string()),
            ),
            fetch_max_attempts: env::var("FETCH_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("FETCH_MAX_ATTEMPTS is not a number")?,
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("HTTP_TIMEOUT_SECS is not a number")?,
            ),
            nse_rate_limit: env::var("NSE_RATE_LIMIT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("NSE_RATE_LIMIT is not a number")?,
            narrative: NarrativeConfig::from_env(),
        })
    }

    pub fn mailer_config(&self) -> MailerConfig {
        MailerConfig {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            tls: self.smtp_tls.clone(),
            username: self.sender_email.clone(),
            password: self.sender_password.clone(),
            from: self.sender_email.clone(),
            recipients: self.recipients.clone(),
        }
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{key} not set"))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(
            split_list(" a@x.com, b@x.com ,,c@x.com"),
            vec!["a@x.com", "b@x.com", "c@x.com"]
        );
        assert!(split_list("  ,  ").is_empty());
    }

    #[test]
    fn default_provider_list_covers_all_sources() {
        let providers = split_list(DEFAULT_PROVIDERS);
        assert_eq!(
            providers,
            vec![
                "indices",
                "movers",
                "sectors",
                "flows",
                "commodities",
                "narrative"
            ]
        );
    }
}
