use crate::error::Result;
use crate::navigator::{self, VisualBlocks, VisualResultSet};
use crate::payload::{self, PayloadKey};
use serde::{Deserialize, Serialize};

/// Body of a results page, exactly as the service returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPage(String);

impl RawPage {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A results page and the read operations over it.
///
/// Every call locates and parses its payload afresh; nothing is cached, so
/// repeated calls return identical output and results can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct LensResults {
    page: RawPage,
}

impl LensResults {
    pub fn new(page: RawPage) -> Self {
        Self { page }
    }

    pub fn from_html(html: impl Into<String>) -> Self {
        Self::new(RawPage::new(html))
    }

    pub fn page(&self) -> &RawPage {
        &self.page
    }

    /// Text recognized on the uploaded image.
    pub fn extract_raw_text(&self) -> Result<Vec<String>> {
        let payload = payload::locate(self.page.as_str(), PayloadKey::Primary)?;
        navigator::extract_text(&payload)
    }

    /// Principal match (if any) and the visually similar images.
    pub fn extract_visual_results(&self) -> Result<VisualResultSet> {
        let payload = payload::locate(self.page.as_str(), PayloadKey::Prerender)?;
        navigator::extract_visual(&payload)
    }

    /// Untyped visual-match blocks from the primary payload; `format_output`
    /// selects the flattened form over the verbatim branch.
    pub fn visual_blocks(&self, format_output: bool) -> Result<VisualBlocks> {
        let payload = payload::locate(self.page.as_str(), PayloadKey::Primary)?;
        navigator::extract_visual_blocks(&payload, format_output)
    }
}

impl From<RawPage> for LensResults {
    fn from(page: RawPage) -> Self {
        Self::new(page)
    }
}
