use std::time::Duration;

use report_core::{ProviderError, ProviderResult};

use crate::BROWSER_USER_AGENT;

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Quote client over the Yahoo Finance chart endpoint. Works for indices,
/// futures, and currency pairs alike, which is all the report needs.
#[derive(Clone)]
pub struct YahooChartClient {
    client: reqwest::Client,
}

#[derive(Debug, Clone)]
pub struct ChartQuote {
    pub symbol: String,
    pub last: f64,
    pub change_percent: f64,
}

impl YahooChartClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    pub async fn quote(&self, symbol: &str) -> ProviderResult<ChartQuote> {
        let url = format!("{CHART_URL}/{symbol}");
        let response = self
            .client
            .get(&url)
            .query(&[("range", "5d"), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        parse_chart_quote(symbol, &json)
    }
}

fn parse_chart_quote(symbol: &str, json: &serde_json::Value) -> ProviderResult<ChartQuote> {
    let meta = json
        .get("chart")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.get("meta"))
        .ok_or_else(|| ProviderError::MissingData(format!("no chart result for {symbol}")))?;

    let last = meta
        .get("regularMarketPrice")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ProviderError::MissingData(format!("no market price for {symbol}")))?;

    let previous_close = meta
        .get("chartPreviousClose")
        .and_then(|v| v.as_f64())
        .or_else(|| meta.get("previousClose").and_then(|v| v.as_f64()));

    let change_percent = match previous_close {
        Some(prev) if prev != 0.0 => (last - prev) / prev * 100.0,
        _ => 0.0,
    };

    Ok(ChartQuote {
        symbol: symbol.to_string(),
        last,
        change_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_quote_from_chart_payload() {
        let payload = json!({
            "chart": {
                "result": [{
                    "meta": {
                        "regularMarketPrice": 25108.30,
                        "chartPreviousClose": 24860.50
                    }
                }]
            }
        });

        let quote = parse_chart_quote("^NSEI", &payload).unwrap();
        assert_eq!(quote.symbol, "^NSEI");
        assert!((quote.last - 25108.30).abs() < 1e-9);
        assert!((quote.change_percent - 0.9967).abs() < 1e-3);
    }

    #[test]
    fn missing_price_is_missing_data() {
        let payload = json!({
            "chart": { "result": [{ "meta": {} }] }
        });
        match parse_chart_quote("^BSESN", &payload) {
            Err(ProviderError::MissingData(msg)) => assert!(msg.contains("^BSESN")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_previous_close_yields_zero_change() {
        let payload = json!({
            "chart": { "result": [{ "meta": { "regularMarketPrice": 88.5 } }] }
        });
        let quote = parse_chart_quote("BZ=F", &payload).unwrap();
        assert_eq!(quote.change_percent, 0.0);
    }

    #[test]
    fn empty_result_array_is_missing_data() {
        let payload = json!({ "chart": { "result": [] } });
        assert!(parse_chart_quote("INR=X", &payload).is_err());
    }
}
