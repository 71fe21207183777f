#![allow(dead_code)]

use serde_json::{json, Value};

/// Sets `value` at `path`, growing arrays with nulls along the way.
pub fn put(root: &mut Value, path: &[usize], value: Value) {
    let Some((&last, parents)) = path.split_last() else {
        *root = value;
        return;
    };

    let mut current = root;
    for &index in parents {
        current = slot(current, index);
        if !current.is_array() {
            *current = json!([]);
        }
    }
    *slot(current, last) = value;
}

fn slot(value: &mut Value, index: usize) -> &mut Value {
    if !value.is_array() {
        *value = json!([]);
    }
    let items = value.as_array_mut().unwrap();
    if items.len() <= index {
        items.resize(index + 1, Value::Null);
    }
    &mut items[index]
}

pub fn with_prefix(prefix: &[usize], path: &[usize]) -> Vec<usize> {
    prefix.iter().chain(path).copied().collect()
}

/// One similar-match entry with the given fields at their fixed slots.
pub fn similar_entry(title: &str, thumbnail: Option<&str>, page_url: &str, site: &str) -> Value {
    let mut entry = json!([]);
    put(&mut entry, &[14], json!(site));
    put(
        &mut entry,
        &[0],
        thumbnail.map_or(json!([]), |t| json!([t, 200, 150])),
    );
    put(&mut entry, &[3], json!(title));
    put(&mut entry, &[5], json!(page_url));
    entry
}

pub fn script(key: &str, data: &Value) -> String {
    format!(
        "<script nonce=\"n0nce\">AF_initDataCallback({{key: '{key}', hash: '4', data:{data}, sideChannel: {{}}}});</script>"
    )
}

pub fn page(scripts: &[String]) -> String {
    format!(
        "<!doctype html><html><head><title>Results</title><script>window.WIZ_global_data = {{}};</script></head><body>{}</body></html>",
        scripts.concat()
    )
}
