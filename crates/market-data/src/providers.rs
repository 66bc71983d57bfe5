use async_trait::async_trait;
use report_core::{FieldProvider, ProviderError, ProviderResult, ReportRecord};

use crate::nse::NseClient;
use crate::yahoo::YahooChartClient;

/// NIFTY and SENSEX closing levels with day change percent.
pub struct IndexQuotesProvider {
    yahoo: YahooChartClient,
}

impl IndexQuotesProvider {
    pub fn new(yahoo: YahooChartClient) -> Self {
        Self { yahoo }
    }
}

#[async_trait]
impl FieldProvider for IndexQuotesProvider {
    fn name(&self) -> &'static str {
        "indices"
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            "NIFTY_CLOSING",
            "NIFTY_CHANGE_PCT",
            "SENSEX_CLOSING",
            "SENSEX_CHANGE_PCT",
        ]
    }

    async fn fetch(&self, _record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
        let nifty = self.yahoo.quote("^NSEI").await?;
        let sensex = self.yahoo.quote("^BSESN").await?;

        Ok(vec![
            ("NIFTY_CLOSING".into(), format!("{:.2}", nifty.last)),
            (
                "NIFTY_CHANGE_PCT".into(),
                format!("{:+.2}", nifty.change_percent),
            ),
            ("SENSEX_CLOSING".into(), format!("{:.2}", sensex.last)),
            (
                "SENSEX_CHANGE_PCT".into(),
                format!("{:+.2}", sensex.change_percent),
            ),
        ])
    }
}

/// Top-3 NIFTY 50 gainers and losers.
pub struct MoversProvider {
    nse: NseClient,
}

impl MoversProvider {
    pub fn new(nse: NseClient) -> Self {
        Self { nse }
    }
}

#[async_trait]
impl FieldProvider for MoversProvider {
    fn name(&self) -> &'static str {
        "movers"
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            "GAINER_1_NAME",
            "GAINER_1_CHANGE",
            "GAINER_2_NAME",
            "GAINER_2_CHANGE",
            "GAINER_3_NAME",
            "GAINER_3_CHANGE",
            "LOSER_1_NAME",
            "LOSER_1_CHANGE",
            "LOSER_2_NAME",
            "LOSER_2_CHANGE",
            "LOSER_3_NAME",
            "LOSER_3_CHANGE",
        ]
    }

    async fn fetch(&self, _record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
        let (gainers, losers) = self.nse.top_movers(3).await?;

        let mut values = Vec::with_capacity(12);
        for (i, mover) in gainers.iter().enumerate() {
            values.push((format!("GAINER_{}_NAME", i + 1), mover.symbol.clone()));
            values.push((
                format!("GAINER_{}_CHANGE", i + 1),
                format!("{:+.2}%", mover.change_percent),
            ));
        }
        for (i, mover) in losers.iter().enumerate() {
            values.push((format!("LOSER_{}_NAME", i + 1), mover.symbol.clone()));
            values.push((
                format!("LOSER_{}_CHANGE", i + 1),
                format!("{:+.2}%", mover.change_percent),
            ));
        }
        Ok(values)
    }
}

/// Best-performing sectoral indices of the day.
pub struct SectorsProvider {
    nse: NseClient,
}

impl SectorsProvider {
    pub fn new(nse: NseClient) -> Self {
        Self { nse }
    }
}

#[async_trait]
impl FieldProvider for SectorsProvider {
    fn name(&self) -> &'static str {
        "sectors"
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            "TOP_SECTOR_1_NAME",
            "TOP_SECTOR_1_CHANGE",
            "TOP_SECTOR_2_NAME",
            "TOP_SECTOR_2_CHANGE",
        ]
    }

    async fn fetch(&self, _record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
        let sectors = self.nse.top_sectors(2).await?;

        let mut values = Vec::with_capacity(4);
        for (i, sector) in sectors.iter().enumerate() {
            values.push((format!("TOP_SECTOR_{}_NAME", i + 1), sector.name.clone()));
            values.push((
                format!("TOP_SECTOR_{}_CHANGE", i + 1),
                format!("{:+.2}%", sector.change_percent),
            ));
        }
        Ok(values)
    }
}

/// FII and DII provisional net buy figures (crore rupees).
pub struct FlowsProvider {
    nse: NseClient,
}

impl FlowsProvider {
    pub fn new(nse: NseClient) -> Self {
        Self { nse }
    }
}

#[async_trait]
impl FieldProvider for FlowsProvider {
    fn name(&self) -> &'static str {
        "flows"
    }

    fn fields(&self) -> &'static [&'static str] {
        &["FII_NET_BUY", "DII_NET_BUY"]
    }

    async fn fetch(&self, _record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
        let (fii, dii) = self.nse.fii_dii_net().await?;
        Ok(vec![
            ("FII_NET_BUY".into(), format!("{fii:+.2}")),
            ("DII_NET_BUY".into(), format!("{dii:+.2}")),
        ])
    }
}

/// Gold and Brent crude front-month futures plus USD/INR.
pub struct CommoditiesProvider {
    yahoo: YahooChartClient,
}

impl CommoditiesProvider {
    pub fn new(yahoo: YahooChartClient) -> Self {
        Self { yahoo }
    }
}

const COMMODITY_SYMBOLS: &[(&str, &str)] = &[
    ("GC=F", "GOLD_PRICE"),
    ("BZ=F", "CRUDE_PRICE"),
    ("INR=X", "USD_INR"),
];

#[async_trait]
impl FieldProvider for CommoditiesProvider {
    fn name(&self) -> &'static str {
        "commodities"
    }

    fn fields(&self) -> &'static [&'static str] {
        &["GOLD_PRICE", "CRUDE_PRICE", "USD_INR"]
    }

    async fn fetch(&self, _record: &ReportRecord) -> ProviderResult<Vec<(String, String)>> {
        // The three symbols are independent quotes; a partial result is
        // worth keeping, so only a full miss is reported as failure.
        let mut values = Vec::with_capacity(3);
        let mut last_err = None;
        for (symbol, field) in COMMODITY_SYMBOLS {
            match self.yahoo.quote(symbol).await {
                Ok(quote) => values.push(((*field).to_string(), format!("{:.2}", quote.last))),
                Err(e) => {
                    tracing::warn!("commodities: {} failed: {}", symbol, e);
                    last_err = Some(e);
                }
            }
        }

        if values.is_empty() {
            return Err(last_err.unwrap_or_else(|| {
                ProviderError::MissingData("no commodity quotes".into())
            }));
        }
        Ok(values)
    }
}
