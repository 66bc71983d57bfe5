use std::time::Duration;

use chrono::Local;
use report_core::{is_schema_field, retry_with_backoff, FieldProvider, ReportRecord, FALLBACK_VALUE};
use tracing::{debug, warn};

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Walks the configured providers strictly one at a time and folds every
/// failure into fallback values. Always returns a complete record.
pub struct Collector {
    providers: Vec<Box<dyn FieldProvider>>,
    max_attempts: u32,
}

impl Collector {
    pub fn new(providers: Vec<Box<dyn FieldProvider>>, max_attempts: u32) -> Self {
        Self {
            providers,
            max_attempts,
        }
    }

    pub async fn collect(&self) -> ReportRecord {
        let mut record = ReportRecord::new();
        record.insert("DATE", Local::now().format("%d-%b-%Y").to_string());

        for provider in &self.providers {
            let outcome = retry_with_backoff(
                provider.name(),
                self.max_attempts,
                RETRY_BASE_DELAY,
                || provider.fetch(&record),
            )
            .await;

            match outcome {
                Ok(values) => {
                    debug!(
                        provider = provider.name(),
                        fields = values.len(),
                        "provider succeeded"
                    );
                    for (key, value) in values {
                        if !is_schema_field(&key) {
                            debug!(
                                provider = provider.name(),
                                field = %key,
                                "provider returned a non-schema field"
                            );
                        }
                        record.insert(key, value);
                    }
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider failed; {} field(s) fall back to {}",
                        provider.fields().len(),
                        FALLBACK_VALUE
                    );
                }
            }
        }

        let missing = record.missing_fields();
        if !missing.is_empty() {
            warn!(
                "{} schema field(s) missing after collection, defaulting to {}",
                missing.len(),
                FALLBACK_VALUE
            );
        }
        record.finalize();
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use report_core::{ProviderError, ProviderResult, SCHEMA};

    struct StaticProvider;

    #[async_trait]
    impl FieldProvider for StaticProvider {
        fn name(&self) -> &'static str {
            "static"
        }
        fn fields(&self) -> &'static [&'static str] {
            &["NIFTY_CLOSING"]
        }
        async fn fetch(&self, _record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
            Ok(vec![("NIFTY_CLOSING".into(), "25108.30".into())])
        }
    }

    struct TimingOutProvider;

    #[async_trait]
    impl FieldProvider for TimingOutProvider {
        fn name(&self) -> &'static str {
            "flaky"
        }
        fn fields(&self) -> &'static [&'static str] {
            &["FII_NET_BUY", "DII_NET_BUY"]
        }
        async fn fetch(&self, _record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
            Err(ProviderError::Api("connection timed out".into()))
        }
    }

    struct RecordReadingProvider;

    #[async_trait]
    impl FieldProvider for RecordReadingProvider {
        fn name(&self) -> &'static str {
            "reader"
        }
        fn fields(&self) -> &'static [&'static str] {
            &["EXECUTIVE_SUMMARY"]
        }
        async fn fetch(&self, record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
            Ok(vec![(
                "EXECUTIVE_SUMMARY".into(),
                format!("Nifty closed at {}.", record.get_or_fallback("NIFTY_CLOSING")),
            )])
        }
    }

    #[tokio::test]
    async fn record_is_complete_after_collection() {
        let collector = Collector::new(vec![Box::new(StaticProvider)], 1);
        let record = collector.collect().await;

        for field in SCHEMA {
            assert!(record.contains(field), "missing {field}");
        }
        assert_eq!(record.get("NIFTY_CLOSING"), Some("25108.30"));
    }

    #[tokio::test]
    async fn failing_provider_falls_back_and_run_continues() {
        let collector = Collector::new(
            vec![Box::new(TimingOutProvider), Box::new(StaticProvider)],
            1,
        );
        let record = collector.collect().await;

        assert_eq!(record.get("FII_NET_BUY"), Some(FALLBACK_VALUE));
        assert_eq!(record.get("DII_NET_BUY"), Some(FALLBACK_VALUE));
        // the provider after the failing one still ran
        assert_eq!(record.get("NIFTY_CLOSING"), Some("25108.30"));
    }

    #[tokio::test]
    async fn all_providers_failing_still_yields_complete_record() {
        let collector = Collector::new(vec![Box::new(TimingOutProvider)], 1);
        let record = collector.collect().await;

        assert!(record.missing_fields().is_empty());
        assert_ne!(record.get("DATE"), Some(FALLBACK_VALUE));
    }

    #[tokio::test]
    async fn later_providers_see_earlier_values() {
        let collector = Collector::new(
            vec![Box::new(StaticProvider), Box::new(RecordReadingProvider)],
            1,
        );
        let record = collector.collect().await;

        assert_eq!(
            record.get("EXECUTIVE_SUMMARY"),
            Some("Nifty closed at 25108.30.")
        );
    }

    #[tokio::test]
    async fn date_is_stamped_by_collector() {
        let collector = Collector::new(vec![], 1);
        let record = collector.collect().await;
        let date = record.get("DATE").unwrap();
        // dd-Mon-YYYY
        assert_eq!(date.len(), 11);
        assert_eq!(date.matches('-').count(), 2);
    }
}
