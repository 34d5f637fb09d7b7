//! Compact JSON-style rendering of values, used by `Display` and by the
//! codec's error messages.

use core::fmt::{self, Display, Formatter, Write};

use crate::Value;

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write_escaped(f, s),
            Value::Sequence(seq) => {
                f.write_char('[')?;
                for (i, child) in seq.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_char(']')
            }
            Value::Mapping(mapping) => {
                f.write_char('{')?;
                for (i, (key, child)) in mapping.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write_escaped(f, key)?;
                    f.write_char(':')?;
                    write!(f, "{child}")?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_escaped(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

#[cfg(test)]
mod tests {
    use crate::{Mapping, Value};

    #[test]
    fn renders_compact_json() {
        let node = Value::from(Mapping::from_iter([
            ("name", Value::from("a\"b")),
            ("n", Value::from(-3)),
            ("seq", Value::from(vec![Value::Null, Value::from(true)])),
        ]));
        assert_eq!(node.to_string(), r#"{"name":"a\"b","n":-3,"seq":[null,true]}"#);
    }
}
