use async_trait::async_trait;
use report_core::{FieldProvider, ProviderResult, ReportRecord};

/// Deterministic stand-in for the narrative fields, used when no
/// chat-completions endpoint is configured. Builds one factual sentence per
/// field from the record-so-far; never fails.
pub struct LocalSummaryProvider;

#[async_trait]
impl FieldProvider for LocalSummaryProvider {
    fn name(&self) -> &'static str {
        "narrative"
    }

    fn fields(&self) -> &'static [&'static str] {
        &["EXECUTIVE_SUMMARY", "MARKET_OUTLOOK"]
    }

    async fn fetch(&self, record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
        let summary = format!(
            "Nifty closed at {} ({}%) and Sensex at {} ({}%). {} led the gainers \
             while {} lagged; {} was the strongest sector.",
            record.get_or_fallback("NIFTY_CLOSING"),
            record.get_or_fallback("NIFTY_CHANGE_PCT"),
            record.get_or_fallback("SENSEX_CLOSING"),
            record.get_or_fallback("SENSEX_CHANGE_PCT"),
            record.get_or_fallback("GAINER_1_NAME"),
            record.get_or_fallback("LOSER_1_NAME"),
            record.get_or_fallback("TOP_SECTOR_1_NAME"),
        );

        let outlook = format!(
            "FII net flows stood at {} cr against DII net flows of {} cr. Gold at {}, \
             Brent crude at {} and USD/INR at {} set the backdrop for the next session.",
            record.get_or_fallback("FII_NET_BUY"),
            record.get_or_fallback("DII_NET_BUY"),
            record.get_or_fallback("GOLD_PRICE"),
            record.get_or_fallback("CRUDE_PRICE"),
            record.get_or_fallback("USD_INR"),
        );

        Ok(vec![
            ("EXECUTIVE_SUMMARY".into(), summary),
            ("MARKET_OUTLOOK".into(), outlook),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn summary_quotes_record_values() {
        let mut record = ReportRecord::new();
        record.insert("NIFTY_CLOSING", "25108.30");
        record.insert("SENSEX_CLOSING", "82596.00");
        record.insert("FII_NET_BUY", "-1444.44");

        let values = LocalSummaryProvider.fetch(&record).await.unwrap();
        let summary = &values[0].1;
        let outlook = &values[1].1;

        assert!(summary.contains("25108.30"));
        assert!(summary.contains("82596.00"));
        assert!(outlook.contains("-1444.44"));
    }

    #[tokio::test]
    async fn summary_never_fails_on_empty_record() {
        let record = ReportRecord::new();
        let values = LocalSummaryProvider.fetch(&record).await.unwrap();
        assert_eq!(values.len(), 2);
        assert!(values[0].1.contains("NA"));
    }
}
