//! Printf-style numeric formatting
//!
//! Template markers carry an optional `:: format` suffix in the familiar
//! printf notation (`%.2f`, `%5d`, `100%%`). Only the numeric conversions the
//! templates need are supported: `%d`/`%i` for integers and `%f` for fixed
//! decimals, with the `-`, `+`, ` ` and `0` flags plus width and precision.
//! Surrounding literal text passes through untouched.

use crate::expr::error::{EvalError, EvalResult};

/// Render a number with a printf-style format string
///
/// Every conversion directive in the string formats the same value; an
/// unsupported conversion is an error that aborts template resolution.
pub fn format_number(format: &str, value: f64) -> EvalResult<String> {
    let mut out = String::new();
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut left = false;
        let mut zero = false;
        let mut plus = false;
        let mut space = false;
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => left = true,
                '0' => zero = true,
                '+' => plus = true,
                ' ' => space = true,
                _ => break,
            }
            chars.next();
        }

        let mut width = 0usize;
        while let Some(&d) = chars.peek() {
            let Some(digit) = d.to_digit(10) else { break };
            width = width * 10 + digit as usize;
            chars.next();
        }

        let mut precision = None;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut p = 0usize;
            while let Some(&d) = chars.peek() {
                let Some(digit) = d.to_digit(10) else { break };
                p = p * 10 + digit as usize;
                chars.next();
            }
            precision = Some(p);
        }

        let conversion = chars
            .next()
            .ok_or_else(|| EvalError::BadFormat(format.to_string()))?;
        let core = match conversion {
            // Integer conversions truncate toward zero
            'd' | 'i' => format!("{}", value.trunc() as i64),
            'f' | 'F' => format!("{:.*}", precision.unwrap_or(6), value),
            _ => return Err(EvalError::BadFormat(format.to_string())),
        };

        let signed = if core.starts_with('-') {
            core
        } else if plus {
            format!("+{core}")
        } else if space {
            format!(" {core}")
        } else {
            core
        };

        out.push_str(&pad(signed, width, left, zero));
    }

    Ok(out)
}

/// Pad to the field width; zero-padding keeps the sign out front
fn pad(core: String, width: usize, left: bool, zero: bool) -> String {
    if core.len() >= width {
        return core;
    }
    let fill = width - core.len();

    if left {
        return format!("{core}{}", " ".repeat(fill));
    }
    if zero {
        if let Some(sign @ ('-' | '+' | ' ')) = core.chars().next() {
            return format!("{sign}{}{}", "0".repeat(fill), &core[1..]);
        }
        return format!("{}{core}", "0".repeat(fill));
    }
    format!("{}{core}", " ".repeat(fill))
}
