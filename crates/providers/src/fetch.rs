//! Plain HTTP download of the knowledge document.

use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;

use rd_domain::error::{Error, Result};

use crate::traits::{DocumentFetcher, FetchedDocument};
use crate::util::from_reqwest;

/// Streams a GET response body into a local file.
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
}

impl HttpDocumentFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(from_reqwest)?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<FetchedDocument> {
        let mut resp = self.client.get(url).send().await.map_err(from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Download {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let mut file = tokio::fs::File::create(dest).await?;
        let mut bytes = 0u64;
        while let Some(chunk) = resp.chunk().await.map_err(from_reqwest)? {
            file.write_all(&chunk).await?;
            bytes += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(url = %url, bytes, dest = %dest.display(), "knowledge document downloaded");

        Ok(FetchedDocument {
            bytes,
            content_type,
        })
    }
}
