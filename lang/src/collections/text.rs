//! Text methods. Positions and lengths count code points, not bytes.

use std::rc::Rc;

use super::{List, normalize_index, slice_positions};
use crate::error::RuntimeError;
use crate::protocols::Iterable;
use crate::value::Value;

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// `s[index]`: a one-character string.
pub fn char_at(s: &str, index: i64) -> Result<Value, RuntimeError> {
    normalize_index(index, char_len(s))
        .and_then(|position| s.chars().nth(position))
        .map(|c| Value::from(c.to_string()))
        .ok_or_else(|| RuntimeError::index_error("string index out of range"))
}

pub fn slice(
    s: &str,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> Result<Value, RuntimeError> {
    let chars: Vec<char> = s.chars().collect();
    let positions = slice_positions(chars.len(), start, stop, step)?;
    Ok(Value::from(
        positions.into_iter().map(|i| chars[i]).collect::<String>(),
    ))
}

/// `s.split(sep)`: runs of whitespace when `sep` is None. At most
/// `maxsplit` splits when given.
pub fn split(s: &str, sep: Option<&str>, maxsplit: Option<usize>) -> Result<List, RuntimeError> {
    let limit = maxsplit.unwrap_or(usize::MAX);
    let parts: Vec<Value> = match sep {
        Some("") => return Err(RuntimeError::value_error("empty separator")),
        Some(sep) => match maxsplit {
            Some(n) => s.splitn(n.saturating_add(1), sep).map(Value::from).collect(),
            None => s.split(sep).map(Value::from).collect(),
        },
        None => {
            let mut parts = Vec::new();
            let mut rest = s.trim_start();
            while !rest.is_empty() {
                if parts.len() == limit {
                    parts.push(Value::from(rest));
                    break;
                }
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                parts.push(Value::from(&rest[..end]));
                rest = rest[end..].trim_start();
            }
            parts
        }
    };
    Ok(List::from_values(parts))
}

/// `sep.join(iterable)`: every element must be a string.
pub fn join(sep: &str, iterable: &Value) -> Result<Value, RuntimeError> {
    let mut out = String::new();
    for (position, item) in iterable.py_iter()?.enumerate() {
        let Value::Str(piece) = &item else {
            return Err(RuntimeError::type_error(format!(
                "sequence item {position}: expected str instance, {} found",
                item.type_name()
            )));
        };
        if position > 0 {
            out.push_str(sep);
        }
        out.push_str(piece);
    }
    Ok(Value::from(out))
}

/// `s.strip(chars)`: whitespace when `chars` is None.
pub fn strip(s: &str, chars: Option<&str>) -> Value {
    match chars {
        Some(chars) => Value::from(s.trim_matches(|c| chars.contains(c))),
        None => Value::from(s.trim()),
    }
}

pub fn lower(s: &str) -> Value {
    Value::from(s.to_lowercase())
}

pub fn upper(s: &str) -> Value {
    Value::from(s.to_uppercase())
}

pub fn replace(s: &str, old: &str, new: &str) -> Value {
    Value::from(s.replace(old, new))
}

pub fn startswith(s: &str, prefix: &str) -> bool {
    s.starts_with(prefix)
}

pub fn endswith(s: &str, suffix: &str) -> bool {
    s.ends_with(suffix)
}

/// Code-point position of the first occurrence of `sub`, or -1.
pub fn find(s: &str, sub: &str) -> i64 {
    match s.find(sub) {
        Some(byte) => char_len(&s[..byte]) as i64,
        None => -1,
    }
}

/// Non-overlapping occurrences of `sub`; an empty `sub` matches between
/// every pair of characters and at both ends.
pub fn count(s: &str, sub: &str) -> usize {
    s.matches(sub).count()
}

/// `sub in s`
pub fn contains(s: &str, sub: &str) -> bool {
    s.contains(sub)
}

/// `template.format(*args, **kwargs)`.
///
/// `{}` takes the next positional argument, `{0}` one by position and
/// `{name}` a keyword argument. Fields render with `str()`, or with
/// `repr()` after `!r`. `{{` and `}}` are literal braces. Format specs
/// after `:` are not supported.
pub fn format(
    template: &str,
    positional: &[Value],
    keywords: &[(Rc<str>, Value)],
) -> Result<Value, RuntimeError> {
    let mut out = String::with_capacity(template.len());
    let mut numbering = Numbering::Unset;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.next_if_eq(&'{').is_some() => out.push('{'),
            '}' if chars.next_if_eq(&'}').is_some() => out.push('}'),
            '}' => {
                return Err(RuntimeError::value_error(
                    "Single '}' encountered in format string",
                ));
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => {
                            return Err(RuntimeError::value_error(
                                "unexpected '{' in field name",
                            ));
                        }
                        Some(ch) => field.push(ch),
                        None if field.is_empty() => {
                            return Err(RuntimeError::value_error(
                                "Single '{' encountered in format string",
                            ));
                        }
                        None => {
                            return Err(RuntimeError::value_error(
                                "expected '}' before end of string",
                            ));
                        }
                    }
                }
                let (field, spec) = field.split_once(':').unwrap_or((field.as_str(), ""));
                if !spec.is_empty() {
                    return Err(RuntimeError::value_error(format!(
                        "format spec '{spec}' is not supported"
                    )));
                }
                let (name, conversion) = match field.split_once('!') {
                    Some((name, conversion)) => (name, Some(conversion)),
                    None => (field, None),
                };
                let value = numbering.resolve(name, positional, keywords)?;
                match conversion {
                    None | Some("s") => out.push_str(&value.to_string()),
                    Some("r") => out.push_str(&value.repr()),
                    Some(other) => {
                        return Err(RuntimeError::value_error(format!(
                            "Unknown conversion specifier {other}"
                        )));
                    }
                }
            }
            _ => out.push(c),
        }
    }
    Ok(Value::from(out))
}

const MANUAL_TO_AUTOMATIC: &str =
    "cannot switch from manual field specification to automatic field numbering";
const AUTOMATIC_TO_MANUAL: &str =
    "cannot switch from automatic field numbering to manual field specification";

/// Field numbering mode of a format string; the two modes cannot mix.
enum Numbering {
    Unset,
    Automatic(usize),
    Manual,
}

impl Numbering {
    fn resolve<'a>(
        &mut self,
        name: &str,
        positional: &'a [Value],
        keywords: &'a [(Rc<str>, Value)],
    ) -> Result<&'a Value, RuntimeError> {
        let index = if name.is_empty() {
            let next = match self {
                Numbering::Unset => 0,
                Numbering::Automatic(next) => *next,
                Numbering::Manual => {
                    return Err(RuntimeError::value_error(MANUAL_TO_AUTOMATIC));
                }
            };
            *self = Numbering::Automatic(next + 1);
            next
        } else if name.bytes().all(|b| b.is_ascii_digit()) {
            if let Numbering::Automatic(_) = self {
                return Err(RuntimeError::value_error(AUTOMATIC_TO_MANUAL));
            }
            *self = Numbering::Manual;
            name.parse().map_err(|_| {
                RuntimeError::value_error("Too many decimal digits in format string")
            })?
        } else {
            return keywords
                .iter()
                .find(|(key, _)| key.as_ref() == name)
                .map(|(_, value)| value)
                .ok_or_else(|| RuntimeError::key_error(Value::from(name).repr()));
        };
        positional.get(index).ok_or_else(|| {
            RuntimeError::index_error(format!(
                "Replacement index {index} out of range for positional args tuple"
            ))
        })
    }
}
