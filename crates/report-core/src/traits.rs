use async_trait::async_trait;

use crate::{ProviderResult, ReportRecord};

/// One external data source feeding the report record.
///
/// Providers are queried strictly one at a time by the collector. The
/// record-so-far is passed read-only so narrative providers can reference
/// values fetched earlier in the run; most providers ignore it.
#[async_trait]
pub trait FieldProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// The schema fields this provider owns. Used for logging which fields
    /// fall back when the provider fails; completeness is enforced by
    /// [`ReportRecord::finalize`] regardless.
    fn fields(&self) -> &'static [&'static str];

    async fn fetch(&self, record: &ReportRecord) -> ProviderResult<Vec<(String, String)>>;
}
