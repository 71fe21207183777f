pub mod normalize;

pub use normalize::WrapperStrategy;

use crate::error::{LensError, Result};
use kuchikiki::traits::TendrilSink;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

pub const INIT_CALL: &str = "AF_initDataCallback(";

/// Which embedded data block of a results page to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKey {
    /// Search data: recognized text and the visual-match blocks.
    Primary,
    /// The initial server-rendered visual matches.
    Prerender,
}

impl PayloadKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKey::Primary => "ds:1",
            PayloadKey::Prerender => "ds:0",
        }
    }

    pub fn strategy(&self) -> WrapperStrategy {
        match self {
            PayloadKey::Primary => WrapperStrategy::Slice,
            PayloadKey::Prerender => WrapperStrategy::QuoteKeys,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedPayload {
    pub key: String,
    /// Opaque version token, kept only so the payload can be written back out.
    pub hash: String,
    pub data: Value,
}

fn call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)AF_initDataCallback\(\s*(\{.*\})\s*\)\s*;?").unwrap())
}

fn key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"key:\s*['"]([^'"]*)['"]"#).unwrap())
}

/// Locates and parses the payload for one of the known keys.
pub fn locate(html: &str, key: PayloadKey) -> Result<EmbeddedPayload> {
    locate_with(html, key.as_str(), key.strategy())
}

/// Locates the first inline script whose initializer call carries `key` and
/// parses its data literal, trying `strategy` first and its fallback second.
pub fn locate_with(html: &str, key: &str, strategy: WrapperStrategy) -> Result<EmbeddedPayload> {
    let script = find_script(html, key)
        .ok_or_else(|| LensError::payload_not_found(key, "no script carries this key"))?;

    let wrapper = call_regex()
        .captures(&script)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| LensError::payload_not_found(key, "initializer call is malformed"))?;

    let normalized = match strategy.normalize(wrapper) {
        Ok(normalized) => normalized,
        Err(reason) => {
            debug!(
                "{} strategy failed for {}: {}; trying {}",
                strategy.name(),
                key,
                reason,
                strategy.fallback().name()
            );
            strategy
                .fallback()
                .normalize(wrapper)
                .map_err(|_| LensError::payload_not_found(key, reason))?
        }
    };

    if normalized.key != key {
        return Err(LensError::payload_not_found(
            key,
            format!("wrapper is keyed '{}'", normalized.key),
        ));
    }

    Ok(EmbeddedPayload {
        key: normalized.key,
        hash: normalized.hash,
        data: normalized.data,
    })
}

fn find_script(html: &str, key: &str) -> Option<String> {
    let document = kuchikiki::parse_html().one(html);
    let scripts = document.select("script").ok()?;

    for script in scripts {
        let text = script.text_contents();
        if !text.contains(INIT_CALL) {
            continue;
        }
        let script_key = key_regex()
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        if script_key == Some(key) {
            debug!("Found {} payload script ({} bytes)", key, text.len());
            return Some(text);
        }
    }

    None
}
