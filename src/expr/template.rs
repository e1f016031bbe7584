//! Template resolution
//!
//! Scans a template string for `{{ expr }}` and `{{ expr :: format }}`
//! markers, evaluates each expression over the collection and substitutes the
//! formatted result back into the text. Identical markers are resolved once
//! and substituted everywhere. Resolution is all-or-nothing: if any marker
//! fails, the caller gets the error and none of the text.

use crate::date::{date_to_str, is_valid_format};
use crate::expr::error::{EvalError, EvalResult};
use crate::expr::eval::{evaluate, Value};
use crate::expr::format::format_number;
use crate::expr::parser::parse_expression;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Default rendering for numeric results without an explicit format
const DEFAULT_NUMBER_FORMAT: &str = "%.1f";

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("marker pattern is well-formed"))
}

/// Resolve every marker in a template
///
/// Numeric results use the `::` printf format or one decimal place; date
/// results use the `::` chrono format or `default_date_format`. A bare
/// pure-numeral template is returned as-is without touching the parser.
pub fn resolve_template(
    template: &str,
    collection: &crate::series::SeriesCollection,
    default_date_format: &str,
) -> EvalResult<String> {
    if template.trim().parse::<f64>().is_ok() {
        return Ok(template.to_string());
    }

    let mut output = template.to_string();
    let mut seen: HashSet<&str> = HashSet::new();

    for caps in marker_regex().captures_iter(template) {
        let source = caps.get(0).map_or("", |m| m.as_str());
        if !seen.insert(source) {
            continue;
        }

        let content = &caps[1];
        let (expr_text, format) = match content.split_once("::") {
            Some((expr, fmt)) => (expr, Some(fmt.trim())),
            None => (content, None),
        };

        let expr = parse_expression(expr_text)?;
        let rendered = match evaluate(&expr, collection)? {
            Value::Number(n) => format_number(format.unwrap_or(DEFAULT_NUMBER_FORMAT), n)?,
            Value::Date(d) => {
                let fmt = format.unwrap_or(default_date_format);
                if !is_valid_format(fmt) {
                    return Err(EvalError::BadFormat(fmt.to_string()));
                }
                date_to_str(d, fmt)
            }
            Value::Series(_) => return Err(EvalError::SeriesSubstitution),
        };

        output = output.replace(source, &rendered);
    }

    Ok(output)
}
