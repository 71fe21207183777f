//! Fixed index paths into the embedded payloads. The upstream data has no
//! field names, so every field is addressed by array position; a schema
//! change on the service side means editing this table.

/// Recognized text lines, in the primary payload.
pub const RAW_TEXT_PATH: &[usize] = &[3, 4, 0, 0];

/// Visual-match entries carrying inline visual data, in the primary payload.
pub const VISUAL_BLOCKS_PATH: &[usize] = &[2, 3, 0];
/// Guard: an entry without this slot has no visual data.
pub const VISUAL_BLOCK_GUARD_PATH: &[usize] = &[2];
/// Guard: the visual-data container itself.
pub const VISUAL_BLOCK_DATA_PATH: &[usize] = &[2, 0, 5];
/// Groups inside the visual-data container.
pub const VISUAL_BLOCK_ITEMS_PATH: &[usize] = &[2, 0, 5, 3, 0];
/// Raw values inside one group.
pub const VISUAL_BLOCK_SUB_ITEMS_PATH: &[usize] = &[0];

/// Root of the visual results inside the prerender payload's `data`.
pub const VISUAL_ROOT_PATH: &[usize] = &[1];

pub const PRINCIPAL_TITLE_PATH: &[usize] = &[0, 1, 8, 12, 0, 0, 0];
pub const PRINCIPAL_THUMBNAIL_PATH: &[usize] = &[0, 1, 8, 12, 0, 2, 0, 0];
pub const PRINCIPAL_PAGE_URL_PATH: &[usize] = &[0, 1, 8, 12, 0, 2, 0, 4];

/// Similar matches when a principal match is present.
pub const SIMILAR_WITH_PRINCIPAL_PATH: &[usize] = &[1, 1, 8, 8, 0, 12];
/// Similar matches when no principal match is present.
pub const SIMILAR_WITHOUT_PRINCIPAL_PATH: &[usize] = &[0, 1, 8, 8, 0, 12];

// Fields of one similar-match entry.
pub const SIMILAR_THUMBNAIL_CONTAINER_PATH: &[usize] = &[0];
pub const SIMILAR_THUMBNAIL_PATH: &[usize] = &[0, 0];
pub const SIMILAR_TITLE_PATH: &[usize] = &[3];
pub const SIMILAR_PAGE_URL_PATH: &[usize] = &[5];
pub const SIMILAR_SOURCE_WEBSITE_PATH: &[usize] = &[14];
