//! Per-query document scanning
//!
//! A [`QueryScanner`] is built once per query (regexes compiled up front) and
//! run against every document. It decides whether the document contributes an
//! observation for its date, and with what value:
//!
//! - **Tag**: front-matter tag list matches plus inline `#tag` occurrences,
//!   summed into one per-document value
//! - **FrontmatterField**: one numeric front-matter value at most
//! - **FrontmatterExists**: the constant value when the key exists
//! - **Text**: constant value per literal occurrence
//!
//! Inline tags follow the user-facing grammar: `#target`, optional `/subtag`
//! segments, optional `:value` with a unit suffix, delimited by whitespace or
//! string boundaries with trailing punctuation tolerated. An occurrence whose
//! attached value fails the decimal parse degrades to a bare occurrence; it
//! is never an error.

use crate::collect::document::{deep_get, frontmatter_tags, value_exists, Document};
use crate::config::QuerySpec;
use crate::series::{Query, QueryKind};
use regex::Regex;
use serde_json::Value;

/// Punctuation tolerated between a tag and its right delimiter
const TRAILING_PUNCTUATION: &str = ".!,?;~-";

/// One query's compiled matching state
#[derive(Debug)]
pub(crate) struct QueryScanner {
    query: Query,
    spec: QuerySpec,
    /// `#target(/subtag)*`, Tag queries only
    tag_re: Option<Regex>,
    /// Escaped literal, Text queries only
    text_re: Option<Regex>,
    /// Attached-value chunk: decimal, unit, trailing punctuation
    value_re: Regex,
}

impl QueryScanner {
    /// Compile the matching state for one query
    pub fn new(query: Query, spec: &QuerySpec) -> Result<Self, regex::Error> {
        let tag_re = match query.kind {
            QueryKind::Tag => Some(Regex::new(&format!(
                r"#{}(?:/[\w-]+)*",
                regex::escape(&query.target)
            ))?),
            _ => None,
        };
        let text_re = match query.kind {
            QueryKind::Text => Some(Regex::new(&regex::escape(&query.target))?),
            _ => None,
        };
        let value_re = Regex::new(r"^(?P<value>-?\d+(?:\.\d+)?)(?P<unit>[A-Za-z%]*)[.!,?;~-]*$")?;

        Ok(Self {
            query,
            spec: spec.clone(),
            tag_re,
            text_re,
            value_re,
        })
    }

    /// The query this scanner matches
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Scan one document, returning its merged contribution
    ///
    /// `None` means the document contributes nothing for this query, which
    /// must stay distinct from contributing the value 0.
    pub fn scan(&self, doc: &Document) -> Option<f64> {
        match self.query.kind {
            QueryKind::Tag => {
                // Front-matter list and body scan are independent; both land
                // on the same date.
                let from_list = self.scan_frontmatter_tags(doc);
                let from_body = self.scan_inline_tags(&doc.body);
                match (from_list, from_body) {
                    (None, None) => None,
                    (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
                }
            }
            QueryKind::FrontmatterField => self.scan_frontmatter_field(doc),
            QueryKind::FrontmatterExists => self.scan_frontmatter_exists(doc),
            QueryKind::Text => self.scan_text(&doc.body),
        }
    }

    /// Count matching entries in the front-matter tag list
    ///
    /// An entry matches when it equals the target or nests under it
    /// (`target/...`). List entries never carry attached values.
    fn scan_frontmatter_tags(&self, doc: &Document) -> Option<f64> {
        let fm = doc.frontmatter.as_ref()?;
        let target = self.query.target.as_str();
        let nested = format!("{target}/");

        let count = frontmatter_tags(fm)
            .iter()
            .filter(|t| t.as_str() == target || t.starts_with(&nested))
            .count();

        if count > 0 {
            Some(count as f64 * self.spec.const_value)
        } else {
            None
        }
    }

    /// Sum inline `#tag` occurrences in the body
    fn scan_inline_tags(&self, body: &str) -> Option<f64> {
        let re = self.tag_re.as_ref()?;
        let mut total = 0.0;
        let mut matched = false;

        for m in re.find_iter(body) {
            if !left_delimited(body, m.start()) {
                continue;
            }

            let rest = &body[m.end()..];
            match rest.strip_prefix(':') {
                Some(suffix) => {
                    let end = suffix
                        .find(char::is_whitespace)
                        .unwrap_or(suffix.len());
                    match self.parse_attached_value(&suffix[..end]) {
                        Some(value) if !self.spec.ignore_attached_value => {
                            if value == 0.0 && self.spec.ignore_zero_value {
                                continue;
                            }
                            total += value;
                            matched = true;
                        }
                        // Ignored or unparseable values degrade to bare occurrences
                        _ => {
                            total += self.spec.const_value;
                            matched = true;
                        }
                    }
                }
                None => {
                    if !right_delimited(rest) {
                        continue;
                    }
                    total += self.spec.const_value;
                    matched = true;
                }
            }
        }

        if matched {
            Some(total)
        } else {
            None
        }
    }

    /// Parse the chunk after the colon: signed decimal, unit, punctuation
    fn parse_attached_value(&self, chunk: &str) -> Option<f64> {
        let caps = self.value_re.captures(chunk)?;
        caps.name("value")?.as_str().parse::<f64>().ok()
    }

    /// One numeric front-matter value at most; arrays are unsupported
    fn scan_frontmatter_field(&self, doc: &Document) -> Option<f64> {
        let fm = doc.frontmatter.as_ref()?;
        match deep_get(fm, &self.query.target)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Constant value when the key exists per the existence predicate
    fn scan_frontmatter_exists(&self, doc: &Document) -> Option<f64> {
        let fm = doc.frontmatter.as_ref()?;
        if value_exists(deep_get(fm, &self.query.target)) {
            Some(self.spec.const_value)
        } else {
            None
        }
    }

    /// Constant value per literal occurrence in the body
    fn scan_text(&self, body: &str) -> Option<f64> {
        let re = self.text_re.as_ref()?;
        let count = re.find_iter(body).count();
        if count > 0 {
            Some(count as f64 * self.spec.const_value)
        } else {
            None
        }
    }
}

/// The character before the match must be whitespace or the string start
fn left_delimited(body: &str, start: usize) -> bool {
    body[..start]
        .chars()
        .next_back()
        .map_or(true, |c| c.is_whitespace())
}

/// After tolerated punctuation the tag must hit whitespace or the string end
fn right_delimited(rest: &str) -> bool {
    rest.trim_start_matches(|c| TRAILING_PUNCTUATION.contains(c))
        .chars()
        .next()
        .map_or(true, |c| c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scanner(kind: QueryKind, target: &str) -> QueryScanner {
        let spec = QuerySpec::new(kind, target);
        QueryScanner::new(Query::new(0, kind, target), &spec).unwrap()
    }

    fn scanner_with(spec: QuerySpec) -> QueryScanner {
        QueryScanner::new(Query::new(0, spec.kind, spec.target.clone()), &spec).unwrap()
    }

    fn doc(body: &str) -> Document {
        Document::new("2024-01-01", body)
    }

    #[test]
    fn test_tag_with_attached_value() {
        let s = scanner(QueryKind::Tag, "weight");
        assert_eq!(s.scan(&doc("Morning weigh-in #weight:72.5kg done")), Some(72.5));
    }

    #[test]
    fn test_bare_tag_contributes_constant() {
        let s = scanner(QueryKind::Tag, "meditation");
        assert_eq!(s.scan(&doc("#meditation before breakfast")), Some(1.0));
    }

    #[test]
    fn test_no_match_contributes_nothing() {
        let s = scanner(QueryKind::Tag, "weight");
        assert_eq!(s.scan(&doc("nothing relevant today")), None);
    }

    #[test]
    fn test_multiple_occurrences_sum() {
        let s = scanner(QueryKind::Tag, "pushups");
        assert_eq!(
            s.scan(&doc("#pushups:20 morning\n#pushups:30 evening")),
            Some(50.0)
        );
    }

    #[test]
    fn test_bare_and_valued_mix() {
        let s = scanner(QueryKind::Tag, "exercise");
        // 15 from the valued occurrence plus the constant for the bare one
        assert_eq!(s.scan(&doc("#exercise:15 then later #exercise")), Some(16.0));
    }

    #[test]
    fn test_negative_and_fractional_values() {
        let s = scanner(QueryKind::Tag, "balance");
        assert_eq!(s.scan(&doc("#balance:-2.5")), Some(-2.5));
    }

    #[test]
    fn test_nested_subtag_matches() {
        let s = scanner(QueryKind::Tag, "health");
        assert_eq!(s.scan(&doc("slept well #health/sleep:7.5h")), Some(7.5));
    }

    #[test]
    fn test_longer_tag_does_not_match() {
        let s = scanner(QueryKind::Tag, "weight");
        assert_eq!(s.scan(&doc("#weightlifting session")), None);
    }

    #[test]
    fn test_tag_must_be_left_delimited() {
        let s = scanner(QueryKind::Tag, "run");
        assert_eq!(s.scan(&doc("mid#run is not a tag")), None);
        assert_eq!(s.scan(&doc("#run at start")), Some(1.0));
    }

    #[test]
    fn test_trailing_punctuation_tolerated() {
        let s = scanner(QueryKind::Tag, "done");
        assert_eq!(s.scan(&doc("all #done!")), Some(1.0));
        assert_eq!(s.scan(&doc("all #done.")), Some(1.0));
        assert_eq!(s.scan(&doc("all #done?! indeed")), Some(1.0));
    }

    #[test]
    fn test_malformed_value_degrades_to_bare() {
        let s = scanner(QueryKind::Tag, "mood");
        assert_eq!(s.scan(&doc("#mood:great")), Some(1.0));
    }

    #[test]
    fn test_ignore_attached_value() {
        let s = scanner_with(QuerySpec::new(QueryKind::Tag, "weight").ignore_attached_value());
        assert_eq!(s.scan(&doc("#weight:72.5kg")), Some(1.0));
    }

    #[test]
    fn test_ignore_zero_value() {
        let s = scanner_with(QuerySpec::new(QueryKind::Tag, "steps").ignore_zero_value());
        // The lone suppressed occurrence leaves the document without a match
        assert_eq!(s.scan(&doc("#steps:0")), None);
        // A real value alongside it still counts
        assert_eq!(s.scan(&doc("#steps:0 #steps:800")), Some(800.0));
    }

    #[test]
    fn test_value_with_unit_and_punctuation() {
        let s = scanner(QueryKind::Tag, "distance");
        assert_eq!(s.scan(&doc("ran #distance:5.2km, felt good")), Some(5.2));
    }

    #[test]
    fn test_frontmatter_tag_list() {
        let s = scanner(QueryKind::Tag, "health");
        let d = doc("no inline tags").frontmatter(json!({ "tags": ["health", "work"] }));
        assert_eq!(s.scan(&d), Some(1.0));

        let nested = doc("").frontmatter(json!({ "tags": ["health/sleep", "health/diet"] }));
        assert_eq!(s.scan(&nested), Some(2.0));
    }

    #[test]
    fn test_frontmatter_and_inline_combine() {
        let s = scanner(QueryKind::Tag, "exercise");
        let d = doc("#exercise:30").frontmatter(json!({ "tags": ["exercise"] }));
        assert_eq!(s.scan(&d), Some(31.0));
    }

    #[test]
    fn test_frontmatter_field() {
        let s = scanner(QueryKind::FrontmatterField, "mood");
        assert_eq!(s.scan(&doc("").frontmatter(json!({ "mood": 7 }))), Some(7.0));
        assert_eq!(
            s.scan(&doc("").frontmatter(json!({ "mood": "6.5" }))),
            Some(6.5)
        );
        assert_eq!(s.scan(&doc("").frontmatter(json!({ "mood": [1, 2] }))), None);
        assert_eq!(s.scan(&doc("").frontmatter(json!({ "other": 1 }))), None);
        assert_eq!(s.scan(&doc("")), None);
    }

    #[test]
    fn test_frontmatter_field_nested() {
        let s = scanner(QueryKind::FrontmatterField, "sleep.hours");
        let d = doc("").frontmatter(json!({ "sleep": { "hours": 6.5 } }));
        assert_eq!(s.scan(&d), Some(6.5));
    }

    #[test]
    fn test_frontmatter_exists() {
        let s = scanner(QueryKind::FrontmatterExists, "done");
        assert_eq!(s.scan(&doc("").frontmatter(json!({ "done": false }))), Some(1.0));
        assert_eq!(s.scan(&doc("").frontmatter(json!({ "done": null }))), None);
        assert_eq!(s.scan(&doc("").frontmatter(json!({}))), None);
    }

    #[test]
    fn test_text_occurrences() {
        let s = scanner(QueryKind::Text, "coffee");
        assert_eq!(s.scan(&doc("coffee at 9, more coffee at 15")), Some(2.0));
        assert_eq!(s.scan(&doc("tea only")), None);
    }

    #[test]
    fn test_text_target_is_literal() {
        // Regex metacharacters in the target must not be interpreted
        let s = scanner(QueryKind::Text, "a+b");
        assert_eq!(s.scan(&doc("computed a+b twice: a+b")), Some(2.0));
        assert_eq!(s.scan(&doc("aab does not count")), None);
    }
}
