use std::fmt;
use std::fmt::Write as _;

use super::Value;
use crate::builtins::Callable;

/// `str(x)`: text is shown raw, everything else uses its repr.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => f.write_str(&other.repr()),
        }
    }
}

impl Value {
    /// `repr(x)`: the developer-facing rendering. Self-referencing
    /// containers render the repeated reference as `[...]` / `{...}`.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        write_repr(self, &mut out, &mut Vec::new());
        out
    }
}

fn write_repr(value: &Value, out: &mut String, active: &mut Vec<usize>) {
    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Float(f) => out.push_str(&format_float(f.0)),
        Value::Str(s) => out.push_str(&repr_str(s)),
        Value::List(list) => {
            if active.contains(&list.identity()) {
                out.push_str("[...]");
                return;
            }
            active.push(list.identity());
            out.push('[');
            write_items(list.snapshot().iter(), out, active);
            out.push(']');
            active.pop();
        }
        Value::Tuple(tuple) => {
            out.push('(');
            write_items(tuple.values().iter(), out, active);
            if tuple.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Value::Dict(dict) => {
            if active.contains(&dict.identity()) {
                out.push_str("{...}");
                return;
            }
            active.push(dict.identity());
            out.push('{');
            for (i, (key, item)) in dict.entries().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(key, out, active);
                out.push_str(": ");
                write_repr(item, out, active);
            }
            out.push('}');
            active.pop();
        }
        Value::Set(set) => {
            let members = set.members();
            if members.is_empty() {
                out.push_str("set()");
                return;
            }
            out.push('{');
            write_items(members.iter(), out, active);
            out.push('}');
        }
        Value::Object(object) => {
            let _ = write!(
                out,
                "<{} object at {:#x}>",
                object.class_name(),
                object.identity()
            );
        }
        Value::Range(range) => {
            if range.step == 1 {
                let _ = write!(out, "range({}, {})", range.start, range.stop);
            } else {
                let _ = write!(out, "range({}, {}, {})", range.start, range.stop, range.step);
            }
        }
        Value::LazySequence(seq) => {
            let _ = write!(out, "<{} object at {:#x}>", seq.borrow().kind(), value.identity());
        }
        Value::Function(function) => match function.as_ref() {
            Callable::Builtin(id) => {
                let _ = write!(out, "<built-in function {}>", id.name());
            }
            Callable::Method { receiver, name } => {
                let _ = write!(
                    out,
                    "<built-in method {} of {} object at {:#x}>",
                    name,
                    receiver.type_name(),
                    receiver.identity()
                );
            }
            Callable::Native { name, .. } => {
                let _ = write!(out, "<function {} at {:#x}>", name, value.identity());
            }
        },
        Value::Type(tag) => {
            let _ = write!(out, "<class '{}'>", tag.name());
        }
    }
}

fn write_items<'a>(
    items: impl Iterator<Item = &'a Value>,
    out: &mut String,
    active: &mut Vec<usize>,
) {
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_repr(item, out, active);
    }
}

/// Shortest round-tripping rendering: positional notation for decimal
/// exponents in `-4..16`, scientific (`1e+16`, `1.5e-05`) otherwise.
/// Integral values keep a trailing `.0`.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let sign = if x.is_sign_negative() { "-" } else { "" };
    let magnitude = x.abs();
    if magnitude == 0.0 {
        return format!("{sign}0.0");
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. `1.2345e-5`
    let scientific = format!("{magnitude:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{sign}{scientific}");
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if (-4..16).contains(&exponent) {
        if exponent >= 0 {
            let point = exponent as usize + 1;
            if digits.len() <= point {
                format!("{digits}{}.0", "0".repeat(point - digits.len()))
            } else {
                format!("{}.{}", &digits[..point], &digits[point..])
            }
        } else {
            format!("0.{}{digits}", "0".repeat((-exponent - 1) as usize))
        }
    } else {
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() {
            String::new()
        } else {
            format!(".{tail}")
        };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!("{head}{fraction}e{exponent_sign}{:02}", exponent.abs())
    };
    format!("{sign}{body}")
}

/// Quoted text: single quotes unless the text contains a single quote and
/// no double quote.
pub(crate) fn repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || (0x7f..0xa0).contains(&(c as u32)) => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
