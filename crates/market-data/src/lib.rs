mod nse;
mod providers;
mod yahoo;

pub use nse::{Mover, NseClient, SectorMove};
pub use providers::{
    CommoditiesProvider, FlowsProvider, IndexQuotesProvider, MoversProvider, SectorsProvider,
};
pub use yahoo::{ChartQuote, YahooChartClient};

// Public web endpoints throttle aggressive clients, so both HTTP clients
// identify as a desktop browser.
pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
