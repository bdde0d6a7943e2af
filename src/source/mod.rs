//! Record sources
//!
//! The pipeline only needs two things from the scanning platform: the
//! repository catalog and the raw analysis results for a set of filters.

use serde_json::Value;

use crate::error::Result;
use crate::selector::{Criterion, RepositoryCatalog};

pub mod security_center;

pub use security_center::{ClientSettings, SecurityCenterClient};

#[allow(async_fn_in_trait)]
pub trait RecordSource {
    /// Repositories the authenticated user can query
    async fn repositories(&self) -> Result<RepositoryCatalog>;

    /// Raw per-host plugin results matching every filter
    async fn analysis(&self, filters: &[Criterion]) -> Result<Vec<Value>>;
}
