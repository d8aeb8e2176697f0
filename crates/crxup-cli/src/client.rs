//! HTTP client for a running update server.

use anyhow::{Context, Result};
use crxup_core::VersionListing;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

/// Multipart field the server reads the archive from.
pub const UPLOAD_FIELD: &str = "extension";

#[derive(Clone, Debug)]
pub struct UpdateClient {
    client: Client,
    base_url: String,
    route_prefix: String,
}

impl UpdateClient {
    pub fn new(base_url: &str, route_prefix: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            route_prefix: route_prefix.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a route under the server's prefix.
    pub fn route_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.route_prefix, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Request failed with status {}: {}",
                status,
                error_text
            ));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.send(self.client.get(url))
            .await?
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    pub async fn health(&self) -> Result<serde_json::Value> {
        self.get_json(&format!("{}/health", self.base_url)).await
    }

    pub async fn versions(&self) -> Result<VersionListing> {
        self.get_json(&self.route_url("/versions")).await
    }

    pub async fn update_xml(&self, extension_id: &str) -> Result<String> {
        let request = self
            .client
            .get(self.route_url("/update.xml"))
            .query(&[("id", extension_id)]);
        self.send(request)
            .await?
            .text()
            .await
            .context("Failed to read update descriptor")
    }

    /// Upload an archive file. Returns the server's JSON reply.
    pub async fn upload_archive(&self, path: &Path) -> Result<serde_json::Value> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid archive path: {}", path.display()))?
            .to_string();

        let buffer = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let part = reqwest::multipart::Part::bytes(buffer)
            .file_name(filename)
            .mime_str("application/zip")
            .context("Invalid content type")?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        self.send(self.client.post(self.route_url("/upload")).multipart(form))
            .await?
            .json()
            .await
            .context("Failed to parse upload response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_url() {
        let client = UpdateClient::new("http://localhost:3000/", "/pp-ext").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.route_url("/upload"),
            "http://localhost:3000/pp-ext/upload"
        );
    }
}
