use formats::{BoxFuture, ResourceSource, SourceError};
use reqwest::Client;

/// Fetches story resources relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: String,
    client: Client,
}

impl HttpSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl ResourceSource for HttpSource {
    fn describe(&self) -> String {
        self.base.clone()
    }

    fn fetch(&self, path: &str) -> BoxFuture<'_, Result<String, SourceError>> {
        let url = self.url(path);
        let path = path.to_string();
        Box::pin(async move {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| SourceError::with_source(path.as_str(), "request failed", e))?;
            if !resp.status().is_success() {
                return Err(SourceError::new(
                    path.as_str(),
                    format!("HTTP {} from {url}", resp.status()),
                ));
            }
            resp.text()
                .await
                .map_err(|e| SourceError::with_source(path.as_str(), "reading body failed", e))
        })
    }
}
