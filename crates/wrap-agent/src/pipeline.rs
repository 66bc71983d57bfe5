use anyhow::{Context, Result};
use mail_dispatch::ReportMailer;
use report_template::{render_html, Document};
use tracing::{debug, info};

use crate::collector::Collector;
use crate::config::WrapConfig;
use crate::providers::build_providers;

/// One full run: collect, fill, render, deliver.
pub async fn run(config: &WrapConfig) -> Result<()> {
    // Stage 1: collect. Never fails; missing data degrades to fallbacks.
    let providers = build_providers(config);
    let collector = Collector::new(providers, config.fetch_max_attempts);
    let record = collector.collect().await;
    info!(fields = record.len(), "collection complete");
    if let Ok(dump) = serde_json::to_string(&record) {
        debug!(record = %dump, "collected record");
    }

    // Stage 2: fill. An unreadable template is the one legitimate abort
    // before any artifact exists.
    let template = Document::load(&config.template_path)?;
    let filled = template.fill(&record);

    // Stage 3: render and deliver.
    let date = record.get_or_fallback("DATE").to_string();
    let html = render_html(&filled, &format!("Indian Market Wrap {date}"));

    let artifact_name = format!("Indian_Market_Wrap_{date}.html");
    let artifact_path = config.output_dir.join(&artifact_name);
    std::fs::write(&artifact_path, &html).with_context(|| {
        format!(
            "failed to write report artifact {}",
            artifact_path.display()
        )
    })?;
    info!(path = %artifact_path.display(), "report artifact written");

    let mailer = ReportMailer::new(&config.mailer_config())?;
    let subject = format!("Indian Market Daily Wrap - {date}");
    let body = format!("Attached is your daily market wrap for {date}.");
    mailer
        .send_report(&subject, &body, &artifact_name, &html)
        .await
        .context("failed to deliver report email")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use report_core::{
        FieldProvider, ProviderError, ProviderResult, ReportRecord, FALLBACK_VALUE,
    };
    use report_template::{render_html, Document};

    use crate::collector::Collector;

    struct QuotesProvider;

    #[async_trait]
    impl FieldProvider for QuotesProvider {
        fn name(&self) -> &'static str {
            "indices"
        }
        fn fields(&self) -> &'static [&'static str] {
            &["NIFTY_CLOSING", "SENSEX_CLOSING"]
        }
        async fn fetch(&self, _record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
            Ok(vec![
                ("NIFTY_CLOSING".into(), "25108.30".into()),
                ("SENSEX_CLOSING".into(), "82596.00".into()),
            ])
        }
    }

    struct DownProvider;

    #[async_trait]
    impl FieldProvider for DownProvider {
        fn name(&self) -> &'static str {
            "flows"
        }
        fn fields(&self) -> &'static [&'static str] {
            &["FII_NET_BUY", "DII_NET_BUY"]
        }
        async fn fetch(&self, _record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
            Err(ProviderError::Api("connection timed out".into()))
        }
    }

    // Collect -> fill -> render with one healthy and one dead source: the
    // fetched values land in the output, the dead source degrades to the
    // fallback sentinel, and nothing aborts.
    #[tokio::test]
    async fn stages_compose_with_a_failing_source() {
        let collector = Collector::new(vec![Box::new(QuotesProvider), Box::new(DownProvider)], 1);
        let record = collector.collect().await;

        let template = Document::parse(
            "Nifty: {{NIFTY_CLOSING}}, Sensex: {{SENSEX_CLOSING}}\n| FII | {{FII_NET_BUY}} |\nUnknown: {{NOT_A_FIELD}}",
        );
        let filled = template.fill(&record);
        let text = filled.to_text();

        assert!(text.contains("Nifty: 25108.30, Sensex: 82596.00"));
        assert!(text.contains(&format!("| FII | {FALLBACK_VALUE} |")));
        // field absent from the record stays verbatim
        assert!(text.contains("Unknown: {{NOT_A_FIELD}}"));

        let html = render_html(&filled, "Indian Market Wrap");
        assert!(html.contains("25108.30"));
        assert!(html.contains(FALLBACK_VALUE));
    }
}
