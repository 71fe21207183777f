use super::paths::*;
use super::{is_present, lookup, required_text, Lookup};
use crate::error::{LensError, Result};
use crate::payload::EmbeddedPayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualMatch {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(rename = "pageURL")]
    pub page_url: Option<String>,
    /// Only similar matches carry their source site.
    #[serde(rename = "sourceWebsite", skip_serializing_if = "Option::is_none", default)]
    pub source_website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisualResultSet {
    #[serde(rename = "match")]
    pub principal_match: Option<VisualMatch>,
    pub similar: Vec<VisualMatch>,
}

/// Visual-match blocks of the primary payload, either verbatim or with each
/// entry's visual-data groups flattened into lists of raw values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VisualBlocks {
    Raw(Value),
    Structured(Vec<Vec<Vec<Value>>>),
}

/// Reads the principal match and the similar matches from the prerender
/// payload. Missing branches degrade to `None` / an empty list; only a present
/// similar-match entry with missing fields is an error.
pub fn extract_visual(payload: &EmbeddedPayload) -> Result<VisualResultSet> {
    let mut results = VisualResultSet::default();

    let Some(root) = lookup(&payload.data, VISUAL_ROOT_PATH).found() else {
        debug!("No visual root in {} payload", payload.key);
        return Ok(results);
    };

    results.principal_match = principal_match(root);

    let branch = if results.principal_match.is_some() {
        SIMILAR_WITH_PRINCIPAL_PATH
    } else {
        SIMILAR_WITHOUT_PRINCIPAL_PATH
    };
    debug!(
        "Principal match {}, reading similar matches at {:?}",
        if results.principal_match.is_some() { "present" } else { "absent" },
        branch
    );

    let entries = match lookup(root, branch) {
        Lookup::Found(Value::Array(entries)) => entries,
        Lookup::Found(_) | Lookup::Absent { .. } => return Ok(results),
    };

    results.similar = entries
        .iter()
        .map(similar_match)
        .collect::<Result<Vec<_>>>()?;

    Ok(results)
}

fn principal_match(root: &Value) -> Option<VisualMatch> {
    // Presence is decided by the slots existing; their values may be null.
    let title = lookup(root, PRINCIPAL_TITLE_PATH).found()?;
    let thumbnail = lookup(root, PRINCIPAL_THUMBNAIL_PATH).found()?;
    let page_url = lookup(root, PRINCIPAL_PAGE_URL_PATH).found()?;

    Some(VisualMatch {
        title: title.as_str().map(str::to_string),
        thumbnail: thumbnail.as_str().map(str::to_string),
        page_url: page_url.as_str().map(str::to_string),
        source_website: None,
    })
}

fn similar_match(entry: &Value) -> Result<VisualMatch> {
    let has_thumbnail = lookup(entry, SIMILAR_THUMBNAIL_CONTAINER_PATH)
        .found()
        .is_some_and(is_present);
    let thumbnail = if has_thumbnail {
        lookup(entry, SIMILAR_THUMBNAIL_PATH)
            .found()
            .and_then(Value::as_str)
            .map(str::to_string)
    } else {
        None
    };

    Ok(VisualMatch {
        title: required_text(entry, "similar match title", SIMILAR_TITLE_PATH)?,
        thumbnail,
        page_url: required_text(entry, "similar match page url", SIMILAR_PAGE_URL_PATH)?,
        source_website: required_text(entry, "similar match source website", SIMILAR_SOURCE_WEBSITE_PATH)?,
    })
}

/// Reads the visual-match blocks of the primary payload. With `format_output`
/// unset the branch is returned as-is.
pub fn extract_visual_blocks(payload: &EmbeddedPayload, format_output: bool) -> Result<VisualBlocks> {
    let entries = lookup(&payload.data, VISUAL_BLOCKS_PATH)
        .required("visual match blocks", VISUAL_BLOCKS_PATH)?;

    if !format_output {
        return Ok(VisualBlocks::Raw(entries.clone()));
    }

    let entries = as_array(entries, "visual match blocks", VISUAL_BLOCKS_PATH)?;
    let mut structured = Vec::new();

    for entry in entries {
        let guarded = lookup(entry, VISUAL_BLOCK_GUARD_PATH).found().is_some_and(is_present)
            && lookup(entry, VISUAL_BLOCK_DATA_PATH).found().is_some_and(is_present);
        if !guarded {
            continue;
        }

        let items = lookup(entry, VISUAL_BLOCK_ITEMS_PATH)
            .required("visual data groups", VISUAL_BLOCK_ITEMS_PATH)?;
        let groups = as_array(items, "visual data groups", VISUAL_BLOCK_ITEMS_PATH)?
            .iter()
            .map(|item| {
                let sub_items = lookup(item, VISUAL_BLOCK_SUB_ITEMS_PATH)
                    .required("visual data values", VISUAL_BLOCK_SUB_ITEMS_PATH)?;
                Ok(as_array(sub_items, "visual data values", VISUAL_BLOCK_SUB_ITEMS_PATH)?.clone())
            })
            .collect::<Result<Vec<_>>>()?;

        structured.push(groups);
    }

    Ok(VisualBlocks::Structured(structured))
}

fn as_array<'a>(value: &'a Value, field: &'static str, path: &[usize]) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| LensError::SchemaMismatch {
        field,
        path: path.to_vec(),
    })
}
