/// Sentinel substituted for every schema field a provider could not supply.
pub const FALLBACK_VALUE: &str = "NA";

/// The fixed set of fields a market wrap report carries. Values are plain
/// text regardless of whether the field is numeric, a short label, or a
/// narrative block.
pub const SCHEMA: &[&str] = &[
    "DATE",
    "NIFTY_CLOSING",
    "NIFTY_CHANGE_PCT",
    "SENSEX_CLOSING",
    "SENSEX_CHANGE_PCT",
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
    "TOP_SECTOR_1_NAME",
    "TOP_SECTOR_1_CHANGE",
    "TOP_SECTOR_2_NAME",
    "TOP_SECTOR_2_CHANGE",
    "FII_NET_BUY",
    "DII_NET_BUY",
    "GOLD_PRICE",
    "CRUDE_PRICE",
    "USD_INR",
    "EXECUTIVE_SUMMARY",
    "MARKET_OUTLOOK",
];

pub fn is_schema_field(name: &str) -> bool {
    SCHEMA.iter().any(|f| f.eq_ignore_ascii_case(name))
}
