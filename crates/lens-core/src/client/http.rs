use super::{refresh_target, ImageSource, LensTransport};
use crate::config::LensConfig;
use crate::error::{LensError, Result};
use crate::results::RawPage;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Talks to the search service over HTTP. Both clients share one cookie jar
/// so the upload and the follow-up fetch belong to the same session.
pub struct HttpTransport {
    base_url: Url,
    client: reqwest::Client,
    upload_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: LensConfig) -> Result<Self> {
        let base_url = base_url(&config.base_url)?;
        let jar = Arc::new(Jar::default());
        let timeout = Duration::from_millis(config.timeout_ms);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .cookie_provider(jar.clone())
            .timeout(timeout)
            .build()?;
        let upload_client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .cookie_provider(jar)
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            base_url,
            client,
            upload_client,
        })
    }

    async fn fetch_by_url(&self, image_url: &str) -> Result<RawPage> {
        let endpoint = self.base_url.join("uploadbyurl")?;
        let body = self
            .client
            .get(endpoint)
            .query(&[("url", image_url)])
            .send()
            .await?
            .text()
            .await?;
        Ok(RawPage::new(body))
    }

    async fn upload_bytes(&self, bytes: Vec<u8>, file_name: String) -> Result<RawPage> {
        let endpoint = self.base_url.join("upload")?;
        let form = Form::new()
            .part("encoded_image", Part::bytes(bytes).file_name(file_name))
            .text("image_content", "");

        let response = self.upload_client.post(endpoint).multipart(form).send().await?;
        debug!("Upload answered with {}", response.status());
        let body = response.text().await?;

        let target = refresh_target(&body).ok_or(LensError::RedirectNotFound)?;
        let search_url = self.base_url.join(&target)?;
        debug!("Following upload redirect to {}", search_url);

        let body = self.client.get(search_url).send().await?.text().await?;
        Ok(RawPage::new(body))
    }
}

#[async_trait]
impl LensTransport for HttpTransport {
    async fn fetch(&self, source: &ImageSource) -> Result<RawPage> {
        match source {
            ImageSource::Url(url) => self.fetch_by_url(url).await,
            ImageSource::Path(path) => {
                let bytes = tokio::fs::read(path).await?;
                self.upload_bytes(bytes, upload_file_name(path)).await
            }
            ImageSource::Bytes(bytes) => self.upload_bytes(bytes.clone(), "image.png".to_string()).await,
        }
    }
}

/// Parses the service root so that joining `upload` appends to its path
/// instead of replacing the last segment.
fn base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image.png")
        .to_string()
}
