//! Parsing of semicolon-delimited cell style strings.
//!
//! Cell styles look like `shape=rect;shapeELXXX=Generator;fillColor=#fff`.
//! Only `key=value` segments are meaningful here; bare tokens such as
//! `ellipse` or `html=1;;` noise are skipped without complaint.

use crate::constants::{NOT_EDITABLE_LINE, STYLE_TAG_KEY};
use std::collections::{BTreeMap, HashMap};

/// Parsed style: trimmed key to trimmed value, ordered by key.
pub type StyleMap = BTreeMap<String, String>;

/// Parses a style string into a [`StyleMap`].
///
/// Segments without `=` or with an empty key are ignored. When a key
/// appears twice, the later value wins.
pub fn parse_style(style: &str) -> StyleMap {
    let mut map = StyleMap::new();
    for segment in style.split(';') {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), value.trim().to_string());
    }
    map
}

/// Renders a [`StyleMap`] back to `key=value;` form in key order.
pub fn serialize_style(map: &StyleMap) -> String {
    let mut out = String::new();
    for (key, value) in map {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push(';');
    }
    out
}

/// Returns the component tag of a parsed style, if the cell takes part in
/// flattening at all.
///
/// Cells without the tag key, with an empty tag, or tagged with the
/// connector sentinel yield `None`.
pub fn component_tag(map: &StyleMap) -> Option<&str> {
    match map.get(STYLE_TAG_KEY).map(String::as_str) {
        None | Some("") | Some(NOT_EDITABLE_LINE) => None,
        Some(tag) => Some(tag),
    }
}

/// Replaces (or inserts) a single key within a raw style string.
///
/// Used when the editor creates cells; the rest of the style is preserved
/// in its parsed, key-ordered form.
pub fn with_style_value(style: &str, key: &str, value: &str) -> String {
    let mut map = parse_style(style);
    map.insert(key.to_string(), value.to_string());
    serialize_style(&map)
}

/// Memoizes parsed styles per distinct style string.
///
/// A diagram typically has hundreds of cells but only a handful of distinct
/// styles, so one flattening pass keeps a cache like this alive.
#[derive(Debug, Default)]
pub struct StyleCache {
    parsed: HashMap<String, StyleMap>,
}

impl StyleCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parsed form of `style`, parsing it on first use.
    pub fn get(&mut self, style: &str) -> &StyleMap {
        self.parsed
            .entry(style.to_string())
            .or_insert_with(|| parse_style(style))
    }

    /// Number of distinct styles parsed so far.
    pub fn len(&self) -> usize {
        self.parsed.len()
    }

    /// Whether nothing has been parsed yet.
    pub fn is_empty(&self) -> bool {
        self.parsed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_pairs() {
        let map = parse_style(" shapeELXXX = Generator ;fillColor=#ffffff;");
        assert_eq!(map.get("shapeELXXX").map(String::as_str), Some("Generator"));
        assert_eq!(map.get("fillColor").map(String::as_str), Some("#ffffff"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn skips_malformed_segments() {
        let map = parse_style("ellipse;;=orphan;html=1;whiteSpace");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("html").map(String::as_str), Some("1"));
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(parse_style("").is_empty());
        assert!(parse_style(";;;").is_empty());
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let map = parse_style("label=a=b");
        assert_eq!(map.get("label").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn later_duplicate_key_wins() {
        let map = parse_style("shapeELXXX=Load;shapeELXXX=Motor");
        assert_eq!(component_tag(&map), Some("Motor"));
    }

    #[test]
    fn reparse_after_serialize_is_stable() {
        let samples = [
            "shapeELXXX=Bus;strokeWidth=4;",
            "  b = 2 ; a=1;;junk;c=",
            "",
            "verticalLabelPosition=bottom;shapeELXXX=Three Winding Transformer",
        ];
        for sample in samples {
            let first = parse_style(sample);
            let second = parse_style(&serialize_style(&first));
            assert_eq!(first, second, "style {sample:?} did not survive a round trip");
        }
    }

    #[test]
    fn sentinel_and_missing_tag_are_not_components() {
        assert_eq!(component_tag(&parse_style("shapeELXXX=NotEditableLine")), None);
        assert_eq!(component_tag(&parse_style("edgeStyle=orthogonal")), None);
        assert_eq!(component_tag(&parse_style("shapeELXXX=")), None);
        assert_eq!(component_tag(&parse_style("shapeELXXX=Line")), Some("Line"));
    }

    #[test]
    fn with_style_value_overrides_existing_key() {
        let style = with_style_value("shapeELXXX=Load;fillColor=red", "shapeELXXX", "Motor");
        let map = parse_style(&style);
        assert_eq!(component_tag(&map), Some("Motor"));
        assert_eq!(map.get("fillColor").map(String::as_str), Some("red"));
    }

    #[test]
    fn cache_parses_each_distinct_style_once() {
        let mut cache = StyleCache::new();
        assert!(cache.is_empty());
        cache.get("shapeELXXX=Bus");
        cache.get("shapeELXXX=Bus");
        cache.get("shapeELXXX=Load");
        assert_eq!(cache.len(), 2);
        assert_eq!(component_tag(cache.get("shapeELXXX=Load")), Some("Load"));
    }
}
