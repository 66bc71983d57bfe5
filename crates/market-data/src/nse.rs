use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use report_core::{ProviderError, ProviderResult};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::BROWSER_USER_AGENT;

const BASE_URL: &str = "https://www.nseindia.com";

/// Sectoral indices considered for the top-sector fields. The allIndices
/// feed also carries broad-market and thematic indices, which the report
/// does not rank.
const SECTORAL_INDICES: &[&str] = &[
    "NIFTY BANK",
    "NIFTY AUTO",
    "NIFTY FMCG",
    "NIFTY IT",
    "NIFTY MEDIA",
    "NIFTY METAL",
    "NIFTY PHARMA",
    "NIFTY PSU BANK",
    "NIFTY PVT BANK",
    "NIFTY REALTY",
    "NIFTY ENERGY",
    "NIFTY FIN SERVICE",
    "NIFTY HEALTHCARE",
    "NIFTY CONSR DURBL",
    "NIFTY OIL AND GAS",
];

/// Sliding-window throttle: at most `max_requests` per `window`.
#[derive(Clone)]
struct Throttle {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl Throttle {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            let oldest = *ts.front().expect("non-empty window");
            let wait = self.window.saturating_sub(now.duration_since(oldest))
                + Duration::from_millis(50);
            drop(ts);
            tracing::debug!("NSE throttle: waiting {:.1}s for a slot", wait.as_secs_f64());
            tokio::time::sleep(wait).await;
        }
    }
}

/// Client for the public NSE India JSON API (movers, sectoral indices,
/// FII/DII provisional flows).
///
/// The API refuses requests without browser-looking headers and a session
/// cookie from the landing page, so the first request primes the cookie jar.
#[derive(Clone)]
pub struct NseClient {
    client: reqwest::Client,
    throttle: Throttle,
    primed: Arc<Mutex<bool>>,
}

#[derive(Debug, Clone)]
pub struct Mover {
    pub symbol: String,
    pub change_percent: f64,
}

#[derive(Debug, Clone)]
pub struct SectorMove {
    pub name: String,
    pub change_percent: f64,
}

#[derive(Debug, Deserialize)]
struct StockIndicesResponse {
    data: Vec<StockIndexRow>,
}

#[derive(Debug, Deserialize)]
struct StockIndexRow {
    symbol: Option<String>,
    #[serde(rename = "pChange")]
    p_change: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AllIndicesResponse {
    data: Vec<IndexRow>,
}

#[derive(Debug, Deserialize)]
struct IndexRow {
    index: Option<String>,
    #[serde(rename = "percentChange")]
    percent_change: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FlowRow {
    category: Option<String>,
    #[serde(rename = "netValue")]
    net_value: Option<serde_json::Value>,
}

impl NseClient {
    pub fn new(timeout: Duration, requests_per_minute: usize) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static(BASE_URL));

        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            throttle: Throttle::new(requests_per_minute, Duration::from_secs(60)),
            primed: Arc::new(Mutex::new(false)),
        }
    }

    /// Top `count` gainers and losers of NIFTY 50 by day change percent.
    /// Losers are ordered worst first.
    pub async fn top_movers(&self, count: usize) -> ProviderResult<(Vec<Mover>, Vec<Mover>)> {
        let json = self
            .get_json("/api/equity-stockIndices?index=NIFTY%2050")
            .await?;
        parse_movers(json, count)
    }

    /// Top `count` sectoral indices by day change percent.
    pub async fn top_sectors(&self, count: usize) -> ProviderResult<Vec<SectorMove>> {
        let json = self.get_json("/api/allIndices").await?;
        parse_sectors(json, count)
    }

    /// Provisional FII and DII net buy values in crore rupees.
    pub async fn fii_dii_net(&self) -> ProviderResult<(f64, f64)> {
        let json = self.get_json("/api/fiidiiTradeReact").await?;
        parse_flows(json)
    }

    async fn ensure_session(&self) -> ProviderResult<()> {
        let mut primed = self.primed.lock().await;
        if *primed {
            return Ok(());
        }
        self.client
            .get(BASE_URL)
            .send()
            .await
            .map_err(|e| ProviderError::Api(format!("NSE session priming failed: {e}")))?;
        *primed = true;
        Ok(())
    }

    async fn get_json(&self, path: &str) -> ProviderResult<serde_json::Value> {
        self.throttle.acquire().await;
        self.ensure_session().await?;

        let url = format!("{BASE_URL}{path}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "HTTP {} for {}",
                response.status(),
                path
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

fn parse_movers(
    json: serde_json::Value,
    count: usize,
) -> ProviderResult<(Vec<Mover>, Vec<Mover>)> {
    let response: StockIndicesResponse =
        serde_json::from_value(json).map_err(|e| ProviderError::Parse(e.to_string()))?;

    // The first row of the feed is the index aggregate itself; skip it along
    // with anything that lacks a change figure.
    let mut rows: Vec<Mover> = response
        .data
        .into_iter()
        .filter_map(|row| {
            let symbol = row.symbol?;
            if symbol.eq_ignore_ascii_case("NIFTY 50") {
                return None;
            }
            let change_percent = row.p_change.filter(|c| c.is_finite())?;
            Some(Mover {
                symbol,
                change_percent,
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(ProviderError::MissingData("no constituent rows".into()));
    }

    rows.sort_by(|a, b| {
        b.change_percent
            .partial_cmp(&a.change_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let gainers = rows.iter().take(count).cloned().collect();
    let losers = rows.iter().rev().take(count).cloned().collect();
    Ok((gainers, losers))
}

fn parse_sectors(json: serde_json::Value, count: usize) -> ProviderResult<Vec<SectorMove>> {
    let response: AllIndicesResponse =
        serde_json::from_value(json).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let mut sectors: Vec<SectorMove> = response
        .data
        .into_iter()
        .filter_map(|row| {
            let name = row.index?;
            if !SECTORAL_INDICES.iter().any(|s| s.eq_ignore_ascii_case(&name)) {
                return None;
            }
            let change_percent = row.percent_change?;
            Some(SectorMove {
                name,
                change_percent,
            })
        })
        .collect();

    if sectors.is_empty() {
        return Err(ProviderError::MissingData("no sectoral index rows".into()));
    }

    sectors.sort_by(|a, b| {
        b.change_percent
            .partial_cmp(&a.change_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sectors.truncate(count);
    Ok(sectors)
}

fn parse_flows(json: serde_json::Value) -> ProviderResult<(f64, f64)> {
    let rows: Vec<FlowRow> =
        serde_json::from_value(json).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let mut fii = None;
    let mut dii = None;
    for row in rows {
        let category = row.category.unwrap_or_default().to_ascii_uppercase();
        let net = row.net_value.as_ref().and_then(lenient_number);
        if category.contains("FII") {
            fii = net.or(fii);
        } else if category.contains("DII") {
            dii = net.or(dii);
        }
    }

    match (fii, dii) {
        (Some(f), Some(d)) => Ok((f, d)),
        _ => Err(ProviderError::MissingData(
            "FII or DII row absent from flows payload".into(),
        )),
    }
}

/// The flows feed has historically served net values both as numbers and as
/// comma-grouped strings.
fn lenient_number(value: &serde_json::Value) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    value.as_str()?.replace(',', "").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn movers_skip_index_row_and_rank_by_change() {
        let payload = json!({
            "data": [
                { "symbol": "NIFTY 50", "pChange": 0.95 },
                { "symbol": "TATAMOTORS", "pChange": 2.45 },
                { "symbol": "INFY", "pChange": -1.80 },
                { "symbol": "HDFCBANK", "pChange": 0.42 },
                { "symbol": "ADANIPORTS", "pChange": -2.91 }
            ]
        });

        let (gainers, losers) = parse_movers(payload, 2).unwrap();
        assert_eq!(gainers[0].symbol, "TATAMOTORS");
        assert_eq!(gainers[1].symbol, "HDFCBANK");
        assert_eq!(losers[0].symbol, "ADANIPORTS");
        assert_eq!(losers[1].symbol, "INFY");
    }

    #[test]
    fn movers_tolerate_rows_without_change_figures() {
        let payload = json!({
            "data": [
                { "symbol": "NIFTY 50", "pChange": 0.95 },
                { "symbol": "RELIANCE" },
                { "symbol": "INFY", "pChange": 1.10 }
            ]
        });

        let (gainers, _) = parse_movers(payload, 3).unwrap();
        assert_eq!(gainers.len(), 1);
        assert_eq!(gainers[0].symbol, "INFY");
    }

    #[test]
    fn movers_with_no_constituents_is_missing_data() {
        let payload = json!({ "data": [ { "symbol": "NIFTY 50", "pChange": 0.95 } ] });
        assert!(parse_movers(payload, 3).is_err());
    }

    #[test]
    fn sectors_filter_to_sectoral_indices() {
        let payload = json!({
            "data": [
                { "index": "NIFTY 50", "percentChange": 0.95 },
                { "index": "NIFTY BANK", "percentChange": 1.32 },
                { "index": "NIFTY IT", "percentChange": -0.54 },
                { "index": "NIFTY NEXT 50", "percentChange": 3.00 },
                { "index": "NIFTY PHARMA", "percentChange": 0.88 }
            ]
        });

        let sectors = parse_sectors(payload, 2).unwrap();
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].name, "NIFTY BANK");
        assert_eq!(sectors[1].name, "NIFTY PHARMA");
    }

    #[test]
    fn flows_accept_string_and_numeric_net_values() {
        let payload = json!([
            { "category": "FII/FPI *", "netValue": "-1,444.44" },
            { "category": "DII **", "netValue": 1234.56 }
        ]);

        let (fii, dii) = parse_flows(payload).unwrap();
        assert!((fii + 1444.44).abs() < 1e-9);
        assert!((dii - 1234.56).abs() < 1e-9);
    }

    #[test]
    fn flows_missing_dii_row_errors() {
        let payload = json!([ { "category": "FII/FPI", "netValue": "10.0" } ]);
        assert!(parse_flows(payload).is_err());
    }
}
