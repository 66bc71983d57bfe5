use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{DispatchError, MailerConfig, TlsMode};

/// One-shot mailer for the rendered report: a single message per run with a
/// plain-text body and the HTML artifact attached.
#[derive(Debug)]
pub struct ReportMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl ReportMailer {
    pub fn new(config: &MailerConfig) -> Result<Self, DispatchError> {
        if config.host.is_empty() {
            return Err(DispatchError::Config("SMTP host not set".into()));
        }

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| DispatchError::Config(format!("Invalid sender address: {e}")))?;

        let to: Vec<Mailbox> = config
            .recipients
            .iter()
            .filter_map(|addr| addr.parse().ok())
            .collect();
        if to.is_empty() {
            return Err(DispatchError::Config(
                "No valid recipient addresses".into(),
            ));
        }

        let mut builder = match config.tls {
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host),
            TlsMode::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            }
            TlsMode::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                &config.host,
            )),
        }
        .map_err(|e| DispatchError::Smtp(format!("SMTP transport error: {e}")))?;

        builder = builder.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    /// Deliver the report. Any transport or auth failure propagates; there
    /// is no delivery retry.
    pub async fn send_report(
        &self,
        subject: &str,
        body: &str,
        attachment_name: &str,
        attachment_html: &str,
    ) -> Result<(), DispatchError> {
        let email = self.build_message(subject, body, attachment_name, attachment_html)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| DispatchError::Smtp(format!("Failed to send email: {e}")))?;

        tracing::info!(
            "Report email sent to {} recipient(s): {}",
            self.to.len(),
            subject
        );
        Ok(())
    }

    fn build_message(
        &self,
        subject: &str,
        body: &str,
        attachment_name: &str,
        attachment_html: &str,
    ) -> Result<Message, DispatchError> {
        let attachment = Attachment::new(attachment_name.to_string()).body(
            attachment_html.as_bytes().to_vec(),
            ContentType::TEXT_HTML,
        );

        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }

        builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(attachment),
            )
            .map_err(|e| DispatchError::Message(format!("Failed to build email: {e}")))
    }
}
