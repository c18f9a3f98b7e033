//! Raw price history sources.

use crate::error::ProviderError;
use crate::models::RawBar;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Daily history for a quote symbol. An empty vector means "no data".
    async fn fetch(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<RawBar>, ProviderError>;
}

/// Reads `<dir>/<SYMBOL>.json`, a JSON array of raw bars.
///
/// The file holds whatever history was exported, so `period` and `interval`
/// are not applied here.
pub struct FileHistoryProvider {
    dir: PathBuf,
}

impl FileHistoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", symbol.to_uppercase()))
    }
}

#[async_trait]
impl HistoryProvider for FileHistoryProvider {
    async fn fetch(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<RawBar>, ProviderError> {
        let path = self.path_for(symbol);
        debug!(symbol = %symbol, period = %period, interval = %interval, path = %path.display(), "reading history file");

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ProviderError::Io {
                    symbol: symbol.to_string(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| ProviderError::Parse {
            symbol: symbol.to_string(),
            source,
        })
    }
}
