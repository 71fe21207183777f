pub mod http;

pub use http::HttpTransport;

use crate::config::LensConfig;
use crate::error::Result;
use crate::results::{LensResults, RawPage};
use async_trait::async_trait;
use kuchikiki::traits::TendrilSink;
use std::path::PathBuf;

/// Where the image to search for comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// `http://` and `https://` inputs are remote images, anything else is a
    /// local file path.
    pub fn from_input(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            ImageSource::Url(input.to_string())
        } else {
            ImageSource::Path(PathBuf::from(input))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Url(_) => "url",
            ImageSource::Path(_) => "path",
            ImageSource::Bytes(_) => "bytes",
        }
    }
}

impl From<&str> for ImageSource {
    fn from(input: &str) -> Self {
        Self::from_input(input)
    }
}

impl From<String> for ImageSource {
    fn from(input: String) -> Self {
        Self::from_input(&input)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// Uploads an image and returns the body of the resulting search page.
#[async_trait]
pub trait LensTransport: Send + Sync {
    async fn fetch(&self, source: &ImageSource) -> Result<RawPage>;
}

pub struct Lens<T: LensTransport = HttpTransport> {
    transport: T,
}

impl Lens<HttpTransport> {
    pub fn new() -> Result<Self> {
        Self::with_config(LensConfig::from_env())
    }

    pub fn with_config(config: LensConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }
}

impl<T: LensTransport> Lens<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn upload_image(&self, source: impl Into<ImageSource>) -> Result<LensResults> {
        let source = source.into();
        tracing::info!("Searching by {} image", source.kind());
        let page = self.transport.fetch(&source).await?;
        Ok(LensResults::new(page))
    }
}

/// Pulls the redirect target out of a `<meta http-equiv="refresh">` tag, e.g.
/// `0; URL='https://host/search?p=abc'`.
pub(crate) fn refresh_target(html: &str) -> Option<String> {
    let document = kuchikiki::parse_html().one(html);
    let metas = document.select("meta").ok()?;

    for meta in metas {
        let attrs = meta.attributes.borrow();
        let is_refresh = attrs
            .get("http-equiv")
            .is_some_and(|v| v.eq_ignore_ascii_case("refresh"));
        if !is_refresh {
            continue;
        }
        let content = attrs.get("content")?;
        let start = content.to_ascii_lowercase().find("url=")? + "url=".len();
        let target = content[start..].trim().trim_matches(|c| c == '\'' || c == '"');
        if !target.is_empty() {
            return Some(target.to_string());
        }
    }

    None
}
