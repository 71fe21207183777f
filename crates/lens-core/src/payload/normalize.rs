use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

/// The wrapper object passed to the initializer call is written in a relaxed
/// notation (`{key: 'ds:1', hash: '2', data:[...], sideChannel: {}}`) that a
/// strict JSON parser rejects. Each strategy turns it into valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperStrategy {
    /// Slice out the `data` literal between the metadata prefix and the
    /// trailing `sideChannel` field; key and hash come from the prefix.
    Slice,
    /// Quote the bare keys, drop `sideChannel`, and parse the whole object.
    QuoteKeys,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Normalized {
    pub key: String,
    pub hash: String,
    pub data: Value,
}

#[derive(Deserialize)]
struct QuotedWrapper {
    key: String,
    #[serde(default)]
    hash: String,
    data: Value,
}

fn slice_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)^\{\s*key:\s*['"](?P<key>[^'"]*)['"]\s*,\s*hash:\s*['"](?P<hash>[^'"]*)['"]\s*,\s*data:(?P<data>.*),\s*sideChannel:\s*\{[^{}]*\}\s*\}$"#,
        )
        .unwrap()
    })
}

fn head_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)^\{\s*key:\s*['"](?P<key>[^'"]*)['"]\s*,\s*(?:hash:\s*['"](?P<hash>[^'"]*)['"]\s*,\s*)?data:"#,
        )
        .unwrap()
    })
}

fn side_channel_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s),\s*sideChannel:\s*\{[^{}]*\}\s*\}$").unwrap())
}

impl WrapperStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            WrapperStrategy::Slice => "slice",
            WrapperStrategy::QuoteKeys => "quote-keys",
        }
    }

    /// The other strategy, tried when this one cannot read a wrapper.
    pub fn fallback(&self) -> WrapperStrategy {
        match self {
            WrapperStrategy::Slice => WrapperStrategy::QuoteKeys,
            WrapperStrategy::QuoteKeys => WrapperStrategy::Slice,
        }
    }

    pub(crate) fn normalize(&self, wrapper: &str) -> Result<Normalized, String> {
        let wrapper = wrapper.trim();
        match self {
            WrapperStrategy::Slice => {
                let caps = slice_regex()
                    .captures(wrapper)
                    .ok_or_else(|| "wrapper does not end in a sideChannel field".to_string())?;
                let data = serde_json::from_str(caps["data"].trim())
                    .map_err(|e| format!("data literal is not valid JSON: {e}"))?;
                Ok(Normalized {
                    key: caps["key"].to_string(),
                    hash: caps["hash"].to_string(),
                    data,
                })
            }
            WrapperStrategy::QuoteKeys => {
                let caps = head_regex()
                    .captures(wrapper)
                    .ok_or_else(|| "wrapper has no key/data prefix".to_string())?;
                let key = serde_json::to_string(&caps["key"]).map_err(|e| e.to_string())?;
                let hash = serde_json::to_string(caps.name("hash").map_or("", |m| m.as_str()))
                    .map_err(|e| e.to_string())?;

                let body = &wrapper[caps.get(0).map_or(0, |m| m.end())..];
                let body = side_channel_regex().replace(body, "}");
                let quoted = format!(r#"{{"key":{key},"hash":{hash},"data":{body}"#);

                let parsed: QuotedWrapper = serde_json::from_str(&quoted)
                    .map_err(|e| format!("normalized wrapper is not valid JSON: {e}"))?;
                Ok(Normalized {
                    key: parsed.key,
                    hash: parsed.hash,
                    data: parsed.data,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WRAPPER: &str = "{key: 'ds:1', hash: '2', data:[[\"a\",1],null,[true]], sideChannel: {}}";

    #[test]
    fn test_slice_reads_data_literal() {
        let normalized = WrapperStrategy::Slice.normalize(WRAPPER).unwrap();
        assert_eq!(normalized.key, "ds:1");
        assert_eq!(normalized.hash, "2");
        assert_eq!(normalized.data, json!([["a", 1], null, [true]]));
    }

    #[test]
    fn test_quote_keys_reads_whole_object() {
        let normalized = WrapperStrategy::QuoteKeys.normalize(WRAPPER).unwrap();
        assert_eq!(normalized.key, "ds:1");
        assert_eq!(normalized.hash, "2");
        assert_eq!(normalized.data, json!([["a", 1], null, [true]]));
    }

    #[test]
    fn test_quote_keys_tolerates_missing_side_channel() {
        let wrapper = "{key: 'ds:0', hash: '7', data:[1,2]}";
        let normalized = WrapperStrategy::QuoteKeys.normalize(wrapper).unwrap();
        assert_eq!(normalized.data, json!([1, 2]));
        assert!(WrapperStrategy::Slice.normalize(wrapper).is_err());
    }

    #[test]
    fn test_data_strings_mentioning_keys_are_untouched() {
        let wrapper = "{key: 'ds:0', hash: '1', data:[\"data: key: 'x'\"], sideChannel: {}}";
        for strategy in [WrapperStrategy::Slice, WrapperStrategy::QuoteKeys] {
            let normalized = strategy.normalize(wrapper).unwrap();
            assert_eq!(normalized.data, json!(["data: key: 'x'"]), "{}", strategy.name());
        }
    }

    #[test]
    fn test_invalid_inner_data_fails_both_strategies() {
        let wrapper = "{key: 'ds:1', hash: '2', data:[1,,2], sideChannel: {}}";
        assert!(WrapperStrategy::Slice.normalize(wrapper).is_err());
        assert!(WrapperStrategy::QuoteKeys.normalize(wrapper).is_err());
    }

    #[test]
    fn test_missing_prefix_fails() {
        let wrapper = "{data:[1], sideChannel: {}}";
        assert!(WrapperStrategy::Slice.normalize(wrapper).is_err());
        assert!(WrapperStrategy::QuoteKeys.normalize(wrapper).is_err());
    }
}
