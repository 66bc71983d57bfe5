mod error;
mod record;
mod retry;
mod schema;
mod traits;

pub use error::{ProviderError, ProviderResult};
pub use record::ReportRecord;
pub use retry::retry_with_backoff;
pub use schema::{is_schema_field, FALLBACK_VALUE, SCHEMA};
pub use traits::FieldProvider;
