//! Weather lookup service
//!
//! Resolves an area name to its provider code, fetches the provider page
//! and extracts the weather record. Stages run strictly in order and the
//! first failure aborts the lookup.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::areas::AreaCodeTable;
use crate::config::AppConfig;
use crate::error::LookupError;
use crate::extract::extract_fragment;
use crate::fetch::{DocumentFetcher, HttpDocumentFetcher};
use crate::models::WeatherRecord;

pub struct WeatherLookupService {
    table_path: PathBuf,
    fetcher: Arc<dyn DocumentFetcher>,
}

impl WeatherLookupService {
    pub fn new(table_path: impl Into<PathBuf>, fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self {
            table_path: table_path.into(),
            fetcher,
        }
    }

    /// Build the service with an HTTP fetcher for the configured provider
    pub fn from_config(config: &AppConfig) -> Result<Self, LookupError> {
        let fetcher = HttpDocumentFetcher::new(&config.provider)?;
        Ok(Self::new(config.areas.table_path.clone(), Arc::new(fetcher)))
    }

    /// Resolve an area name to its provider code.
    ///
    /// The table is read fresh on every call.
    pub async fn resolve(&self, area: &str) -> Result<String, LookupError> {
        let table = AreaCodeTable::load(&self.table_path).await?;
        table
            .get(area)
            .map(str::to_string)
            .ok_or_else(|| LookupError::AreaNotFound {
                area: area.to_string(),
            })
    }

    #[instrument(skip(self))]
    pub async fn lookup(&self, area: &str) -> Result<WeatherRecord, LookupError> {
        let code = self.resolve(area).await?;
        let document = self.fetcher.fetch(&code).await?;
        let fragment = extract_fragment(&document)?;

        info!(code = %code, "Weather lookup complete");
        Ok(WeatherRecord::new(area, fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherFragment;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;

    /// Records requested codes and serves a fixed result
    struct StubFetcher {
        requested: Mutex<Vec<String>>,
        result: fn() -> Result<Vec<u8>, LookupError>,
    }

    impl StubFetcher {
        fn new(result: fn() -> Result<Vec<u8>, LookupError>) -> Arc<Self> {
            Arc::new(Self {
                requested: Mutex::new(Vec::new()),
                result,
            })
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DocumentFetcher for StubFetcher {
        async fn fetch(&self, code: &str) -> Result<Vec<u8>, LookupError> {
            self.requested.lock().unwrap().push(code.to_string());
            (self.result)()
        }
    }

    fn summary_page() -> Result<Vec<u8>, LookupError> {
        Ok(r#"<html><body><input type="hidden" id="hidden_title" value="10月5日14时 周三 多云转晴 20/28°C"></body></html>"#
            .as_bytes()
            .to_vec())
    }

    fn table_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "北京 = 101010100\n上海 = 101020100").unwrap();
        file
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let table = table_file();
        let fetcher = StubFetcher::new(summary_page);
        let service = WeatherLookupService::new(table.path(), fetcher.clone());

        let record = service.lookup("北京").await.unwrap();

        assert_eq!(record.city, "北京");
        assert_eq!(record.fragment.date, "10月5日14时");
        assert_eq!(record.weekday(), Some("周三"));
        assert_eq!(record.weather(), Some("多云转晴"));
        assert_eq!(record.fragment.temperature, "20/28°C");
        assert_eq!(fetcher.requested(), vec!["101010100".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_area_never_fetches() {
        let table = table_file();
        let fetcher = StubFetcher::new(summary_page);
        let service = WeatherLookupService::new(table.path(), fetcher.clone());

        let result = service.lookup("广州").await;

        assert!(matches!(result, Err(LookupError::AreaNotFound { area }) if area == "广州"));
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_missing_table_never_fetches() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StubFetcher::new(summary_page);
        let service = WeatherLookupService::new(dir.path().join("tqdm.txt"), fetcher.clone());

        let result = service.lookup("北京").await;

        assert!(matches!(result, Err(LookupError::SourceUnavailable { .. })));
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_lookup() {
        let table = table_file();
        let fetcher = StubFetcher::new(|| Err(LookupError::network("connection reset")));
        let service = WeatherLookupService::new(table.path(), fetcher);

        let result = service.lookup("上海").await;

        assert!(matches!(result, Err(LookupError::Network(_))));
    }

    #[tokio::test]
    async fn test_non_utf8_page_yields_empty_fields() {
        let table = table_file();
        // GBK-encoded "<html>页面不存在</html>"
        let fetcher = StubFetcher::new(|| {
            Ok(vec![
                0x3c, 0x68, 0x74, 0x6d, 0x6c, 0x3e, 0xd2, 0xb3, 0xc3, 0xe6, 0xb2, 0xbb, 0xb4,
                0xe6, 0xd4, 0xda, 0x3c, 0x2f, 0x68, 0x74, 0x6d, 0x6c, 0x3e,
            ])
        });
        let service = WeatherLookupService::new(table.path(), fetcher);

        let record = service.lookup("上海").await.unwrap();

        assert_eq!(record.city, "上海");
        assert_eq!(record.fragment, WeatherFragment::default());
    }

    #[tokio::test]
    async fn test_resolve_reads_table_each_time() {
        let mut table = table_file();
        let service = WeatherLookupService::new(table.path(), StubFetcher::new(summary_page));

        assert!(service.resolve("天津").await.is_err());

        writeln!(table, "天津 = 101030100").unwrap();
        assert_eq!(service.resolve("天津").await.unwrap(), "101030100");
    }
}
