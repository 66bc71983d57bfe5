use market_data::{
    CommoditiesProvider, FlowsProvider, IndexQuotesProvider, MoversProvider, NseClient,
    SectorsProvider, YahooChartClient,
};
use narrative_client::{LocalSummaryProvider, NarrativeClient, NarrativeProvider};
use report_core::FieldProvider;
use tracing::{info, warn};

use crate::config::WrapConfig;

/// Build the provider set named by the `PROVIDERS` configuration, in the
/// configured order. Unknown names are logged and skipped.
pub fn build_providers(config: &WrapConfig) -> Vec<Box<dyn FieldProvider>> {
    let yahoo = YahooChartClient::new(config.http_timeout);
    let nse = NseClient::new(config.http_timeout, config.nse_rate_limit);

    let mut providers: Vec<Box<dyn FieldProvider>> = Vec::new();
    for name in &config.providers {
        match name.as_str() {
            "indices" => providers.push(Box::new(IndexQuotesProvider::new(yahoo.clone()))),
            "movers" => providers.push(Box::new(MoversProvider::new(nse.clone()))),
            "sectors" => providers.push(Box::new(SectorsProvider::new(nse.clone()))),
            "flows" => providers.push(Box::new(FlowsProvider::new(nse.clone()))),
            "commodities" => providers.push(Box::new(CommoditiesProvider::new(yahoo.clone()))),
            "narrative" => match &config.narrative {
                Some(narrative_config) => {
                    info!(model = %narrative_config.model, "narrative generation enabled");
                    providers.push(Box::new(NarrativeProvider::new(NarrativeClient::new(
                        narrative_config.clone(),
                    ))));
                }
                None => {
                    info!("no narrative endpoint configured, using local summary");
                    providers.push(Box::new(LocalSummaryProvider));
                }
            },
            other => warn!("unknown provider '{}' ignored", other),
        }
    }
    providers
}
