pub mod paths;
pub mod text;
pub mod visual;

pub use text::extract_text;
pub use visual::{extract_visual, extract_visual_blocks, VisualBlocks, VisualMatch, VisualResultSet};

use crate::error::{LensError, Result};
use serde_json::Value;

/// Outcome of walking a fixed index path. A miss is an ordinary value here;
/// callers decide whether it means "feature absent" or "schema mismatch".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Value),
    /// `depth` is how many indices were followed before the walk stopped.
    Absent { depth: usize },
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent { .. } => None,
        }
    }

    pub fn required(self, field: &'static str, path: &[usize]) -> Result<&'a Value> {
        self.found().ok_or_else(|| LensError::SchemaMismatch {
            field,
            path: path.to_vec(),
        })
    }
}

/// Walks `path` from `root`. Out-of-range indices and indexing into anything
/// but an array both end the walk as `Absent`.
pub fn lookup<'a>(root: &'a Value, path: &[usize]) -> Lookup<'a> {
    let mut current = root;
    for (depth, &index) in path.iter().enumerate() {
        match current.as_array().and_then(|items| items.get(index)) {
            Some(next) => current = next,
            None => return Lookup::Absent { depth },
        }
    }
    Lookup::Found(current)
}

/// The slot at `path` must exist; a non-string value in it reads as `None`.
pub(crate) fn required_text(root: &Value, field: &'static str, path: &[usize]) -> Result<Option<String>> {
    Ok(lookup(root, path)
        .required(field, path)?
        .as_str()
        .map(str::to_string))
}

/// Presence in the loose sense the service uses: null, false, zero, empty
/// strings and empty containers all mean "nothing here".
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
