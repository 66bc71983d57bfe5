use async_trait::async_trait;
use report_core::{FieldProvider, ProviderError, ProviderResult, ReportRecord};

use crate::NarrativeClient;

const SYSTEM_PROMPT: &str = "You are a financial journalist writing a daily Indian \
market wrap. Write plain prose, two to four sentences, no headings, no bullet \
points, no disclaimers.";

/// Generates the two narrative fields from the numbers collected earlier in
/// the run.
pub struct NarrativeProvider {
    client: NarrativeClient,
}

impl NarrativeProvider {
    pub fn new(client: NarrativeClient) -> Self {
        Self { client }
    }

    fn market_context(record: &ReportRecord) -> String {
        format!(
            "Nifty closed at {} ({}%), Sensex at {} ({}%). Top gainer {} ({}), \
             top loser {} ({}). Best sector {} ({}). FII net {} cr, DII net {} cr. \
             Gold {}, Brent crude {}, USD/INR {}.",
            record.get_or_fallback("NIFTY_CLOSING"),
            record.get_or_fallback("NIFTY_CHANGE_PCT"),
            record.get_or_fallback("SENSEX_CLOSING"),
            record.get_or_fallback("SENSEX_CHANGE_PCT"),
            record.get_or_fallback("GAINER_1_NAME"),
            record.get_or_fallback("GAINER_1_CHANGE"),
            record.get_or_fallback("LOSER_1_NAME"),
            record.get_or_fallback("LOSER_1_CHANGE"),
            record.get_or_fallback("TOP_SECTOR_1_NAME"),
            record.get_or_fallback("TOP_SECTOR_1_CHANGE"),
            record.get_or_fallback("FII_NET_BUY"),
            record.get_or_fallback("DII_NET_BUY"),
            record.get_or_fallback("GOLD_PRICE"),
            record.get_or_fallback("CRUDE_PRICE"),
            record.get_or_fallback("USD_INR"),
        )
    }
}

#[async_trait]
impl FieldProvider for NarrativeProvider {
    fn name(&self) -> &'static str {
        "narrative"
    }

    fn fields(&self) -> &'static [&'static str] {
        &["EXECUTIVE_SUMMARY", "MARKET_OUTLOOK"]
    }

    async fn fetch(&self, record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
        let context = Self::market_context(record);

        let summary = self
            .client
            .complete(
                SYSTEM_PROMPT,
                &format!("Summarize today's session for the report. Data: {context}"),
            )
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        let outlook = self
            .client
            .complete(
                SYSTEM_PROMPT,
                &format!(
                    "Give a brief, neutral outlook for the next session based on \
                     today's data. Data: {context}"
                ),
            )
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        Ok(vec![
            ("EXECUTIVE_SUMMARY".into(), summary),
            ("MARKET_OUTLOOK".into(), outlook),
        ])
    }
}
