use crate::open_data::error::OpenDataError;
use crate::types::feed::Feed;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use reqwest::Client;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::{fs, task};

pub struct OpenDataLoader {
    cache_dir: PathBuf,
    download_client: Client,
}

impl OpenDataLoader {
    pub fn new(cache_dir: &Path) -> OpenDataLoader {
        let download_client = Client::new();
        OpenDataLoader {
            cache_dir: cache_dir.to_path_buf(),
            download_client,
        }
    }

    /// Loads the DataFrame for a feed, downloading and caching it as parquet
    /// on a cache miss. Returns a LazyFrame scanning the cached file.
    pub async fn get_frame(&self, feed: Feed) -> Result<LazyFrame, OpenDataError> {
        let parquet_path = self.cache_dir.join(feed.cache_file_name());

        if fs::metadata(&parquet_path).await.is_ok() {
            info!("Cache hit for the {} feed at {:?}", feed, parquet_path);
        } else {
            warn!("Cache miss for the {} feed. Downloading and processing.", feed);

            let raw_bytes = self.download(feed).await?;
            let df = Self::json_to_dataframe(raw_bytes, feed).await?;

            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(|e| OpenDataError::CacheDirCreation(self.cache_dir.clone(), e))?;

            Self::cache_dataframe(df, &parquet_path).await?;
            info!("Cached the {} feed to {:?}", feed, parquet_path);
        }

        LazyFrame::scan_parquet(&parquet_path, Default::default())
            .map_err(|e| OpenDataError::ParquetScan(parquet_path.clone(), e))
    }

    /// Path of the cached parquet file for a feed; used for cache deletion.
    pub fn cache_path(&self, feed: Feed) -> PathBuf {
        self.cache_dir.join(feed.cache_file_name())
    }

    /// Downloads the raw JSON array for a feed.
    async fn download(&self, feed: Feed) -> Result<Vec<u8>, OpenDataError> {
        let url = feed.url();
        info!("Downloading {} records from {}", feed, url);

        let response = self
            .download_client
            .get(&url)
            .send()
            .await
            .map_err(|e| OpenDataError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    OpenDataError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    OpenDataError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| OpenDataError::NetworkRequest(url, e))?;
        info!(
            "Successfully downloaded {} bytes for the {} feed",
            body.len(),
            feed
        );
        Ok(body.to_vec())
    }

    /// Parses a raw JSON array of flat records into a DataFrame using a
    /// blocking task, then checks the columns the join depends on are present.
    /// Socrata serves every value as a string; type coercion happens later in
    /// the pipeline.
    async fn json_to_dataframe(bytes: Vec<u8>, feed: Feed) -> Result<DataFrame, OpenDataError> {
        task::spawn_blocking(move || {
            let df = JsonReader::new(Cursor::new(bytes))
                .with_json_format(JsonFormat::Json)
                .finish()
                .map_err(|source| OpenDataError::JsonRead { feed, source })?;

            for &column in feed.required_columns() {
                if df.column(column).is_err() {
                    warn!("The {} feed is missing expected column '{}'", feed, column);
                    return Err(OpenDataError::MissingColumn { feed, column });
                }
            }

            Ok(df)
        })
        .await?
    }

    /// Writes a DataFrame to a parquet file using spawn_blocking.
    /// ParquetWriter needs `&mut df`.
    async fn cache_dataframe(mut df: DataFrame, path: &Path) -> Result<(), OpenDataError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let file = std::fs::File::create(&path_buf)
                .map_err(|e| OpenDataError::ParquetWriteIo(path_buf.clone(), e))?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| OpenDataError::ParquetWritePolars(path_buf, e))?;
            Ok::<(), OpenDataError>(())
        })
        .await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READINGS_JSON: &str = r#"[
        {"channel": "1", "name": "Bowness", "year": "1995", "rainfall": "10.5"},
        {"channel": "1", "name": "Bowness", "year": "1995", "rainfall": "5.5"},
        {"channel": "7", "name": "Forest Lawn", "year": "1996", "rainfall": "3.25"}
    ]"#;

    #[tokio::test]
    async fn test_json_array_becomes_dataframe() -> Result<(), OpenDataError> {
        let df =
            OpenDataLoader::json_to_dataframe(READINGS_JSON.as_bytes().to_vec(), Feed::Readings)
                .await?;

        assert_eq!(df.height(), 3);
        let names = df.get_column_names();
        for required in Feed::Readings.required_columns() {
            assert!(
                names.iter().any(|name| name.as_str() == *required),
                "expected column '{}' in parsed frame",
                required
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_required_column_is_reported() {
        let body = r#"[{"channel": "1", "name": "Bowness"}]"#;
        let result =
            OpenDataLoader::json_to_dataframe(body.as_bytes().to_vec(), Feed::Readings).await;

        assert!(matches!(
            result,
            Err(OpenDataError::MissingColumn {
                feed: Feed::Readings,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_json_error() {
        let body = b"not json at all".to_vec();
        let result = OpenDataLoader::json_to_dataframe(body, Feed::Gauges).await;

        assert!(matches!(
            result,
            Err(OpenDataError::JsonRead {
                feed: Feed::Gauges,
                ..
            })
        ));
    }
}
