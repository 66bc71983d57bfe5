mod smtp;

pub use smtp::ReportMailer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Message build error: {0}")]
    Message(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    #[default]
    StartTls,
    Tls,
    None,
}

impl TlsMode {
    /// Parse the `SMTP_TLS` setting; anything unrecognized falls back to
    /// STARTTLS, the submission default.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "tls" => TlsMode::Tls,
            "none" => TlsMode::None,
            _ => TlsMode::StartTls,
        }
    }
}

/// Transport and addressing settings for one run's delivery.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    pub tls: TlsMode,
    pub username: String,
    pub password: String,
    pub from: String,
    pub recipients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_mode_parses_known_values() {
        assert!(matches!(TlsMode::parse("tls"), TlsMode::Tls));
        assert!(matches!(TlsMode::parse("NONE"), TlsMode::None));
        assert!(matches!(TlsMode::parse("starttls"), TlsMode::StartTls));
        assert!(matches!(TlsMode::parse("whatever"), TlsMode::StartTls));
    }
}
