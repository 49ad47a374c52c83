//! Conversion of values to their default human readable text.
//!
//! Conventions:
//! - `null`, `true`, `false`, integers in decimal;
//! - floats in their shortest round-trip form (`2`, `1.5`, `NaN`, `inf`);
//! - a top-level string is its own text, a nested one is quoted and escaped;
//! - lists as `[a, b]`, records as `{}` / `{key: value}`;
//! - builtins as `<builtin name>`;
//! - host objects produce their own text.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;

use crate::obj::{Obj, ObjRef, Record};
use crate::value::Value;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StringifyError {
    #[error("cannot convert cyclic {0} to text")]
    Cycle(&'static str),
    #[error("cannot convert an object while it is being modified")]
    Borrowed,
    #[error("{0}")]
    Host(String),
    #[error("cannot convert a value nested this deeply to text")]
    TooDeep,
}

/// Deepest object nesting converted before giving up.
pub const MAX_DEPTH: usize = 128;

/// A value split by whether it already is text.
#[derive(Debug, Clone, Copy)]
pub enum Printable<'a> {
    Text(&'a str),
    Other(&'a Value),
}

impl<'a> From<&'a Value> for Printable<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Str(s) => Self::Text(s),
            other => Self::Other(other),
        }
    }
}

impl<'a> Printable<'a> {
    pub fn to_text(self) -> Result<Cow<'a, str>, StringifyError> {
        match self {
            Self::Text(text) => Ok(Cow::Borrowed(text)),
            Self::Other(value) => {
                let mut out = String::new();
                Stringify::default().value(&mut out, value, false)?;
                Ok(Cow::Owned(out))
            }
        }
    }
}

impl Value {
    pub fn to_text(&self) -> Result<Cow<'_, str>, StringifyError> {
        Printable::from(self).to_text()
    }
}

#[derive(Default)]
struct Stringify {
    /// objects currently being converted, innermost last
    open: Vec<*const RefCell<Obj>>,
}

impl Stringify {
    fn value(
        &mut self,
        out: &mut String,
        value: &Value,
        nested: bool,
    ) -> Result<(), StringifyError> {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => {
                let _ = write!(out, "{b}");
            }
            Value::Int(x) => {
                let _ = write!(out, "{x}");
            }
            Value::Float(x) => {
                let _ = write!(out, "{x}");
            }
            Value::Str(s) if nested => quote(out, s),
            Value::Str(s) => out.push_str(s),
            Value::Builtin(builtin) => {
                let _ = write!(out, "{builtin}");
            }
            Value::Obj(obj) => self.object(out, obj)?,
        }
        Ok(())
    }

    fn object(&mut self, out: &mut String, obj: &ObjRef) -> Result<(), StringifyError> {
        let ptr = Rc::as_ptr(obj);
        let obj = obj.try_borrow().map_err(|_| StringifyError::Borrowed)?;
        if self.open.contains(&ptr) {
            return Err(StringifyError::Cycle(obj.type_name()));
        }
        if self.open.len() >= MAX_DEPTH {
            return Err(StringifyError::TooDeep);
        }

        self.open.push(ptr);
        let result = match &*obj {
            Obj::List(items) => self.list(out, items),
            Obj::Record(record) => self.record(out, record),
            Obj::Host(host) => host.to_text().map(|text| out.push_str(&text)),
        };
        self.open.pop();
        result
    }

    fn list(&mut self, out: &mut String, items: &[Value]) -> Result<(), StringifyError> {
        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.value(out, item, true)?;
        }
        out.push(']');
        Ok(())
    }

    fn record(&mut self, out: &mut String, record: &Record) -> Result<(), StringifyError> {
        out.push('{');
        for (i, (key, value)) in record.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if is_bare_key(key) {
                out.push_str(key);
            } else {
                quote(out, key);
            }
            out.push_str(": ");
            self.value(out, value, true)?;
        }
        out.push('}');
        Ok(())
    }
}

const KEYWORDS: [&str; 4] = ["null", "true", "false", "let"];

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&key)
}

fn quote(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::builtin::Builtin;
    use crate::obj::HostObject;

    fn text(value: &Value) -> String {
        value.to_text().unwrap().into_owned()
    }

    fn record(fields: &[(&str, Value)]) -> Value {
        Value::record(
            fields
                .iter()
                .map(|(k, v)| (Rc::from(*k), v.clone()))
                .collect(),
        )
    }

    #[derive(Debug)]
    struct Broken;

    impl HostObject for Broken {
        fn type_name(&self) -> &'static str {
            "broken"
        }

        fn to_text(&self) -> Result<String, StringifyError> {
            Err(StringifyError::Host("no text for you".to_string()))
        }
    }

    #[test]
    fn strings_are_borrowed_verbatim() {
        let value = Value::from("a \"quoted\"\nline");
        let text = value.to_text().unwrap();

        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(text, "a \"quoted\"\nline");
    }

    #[test]
    fn scalars() {
        assert_eq!(text(&Value::Null), "null");
        assert_eq!(text(&Value::Bool(true)), "true");
        assert_eq!(text(&Value::Int(-42)), "-42");
        assert_eq!(text(&Value::Float(2.0)), "2");
        assert_eq!(text(&Value::Float(1.5)), "1.5");
        assert_eq!(text(&Value::Float(f64::NAN)), "NaN");
        assert_eq!(text(&Value::Float(f64::NEG_INFINITY)), "-inf");
        assert_eq!(text(&Value::Builtin(Builtin::print())), "<builtin print>");
    }

    #[test]
    fn collections() {
        let list = Value::list(vec![Value::Int(1), Value::from("a\tb"), Value::Null]);
        assert_eq!(text(&list), r#"[1, "a\tb", null]"#);
        assert_eq!(text(&Value::list(Vec::new())), "[]");

        assert_eq!(text(&record(&[])), "{}");
        let nested = record(&[
            ("name", Value::from("quill")),
            ("two words", Value::Int(2)),
            ("null", Value::Null),
            ("items", list),
        ]);
        assert_eq!(
            text(&nested),
            r#"{name: "quill", "two words": 2, "null": null, items: [1, "a\tb", null]}"#
        );
    }

    #[test]
    fn shared_objects_are_not_cycles() {
        let shared = Value::list(vec![Value::Int(1)]);
        let outer = Value::list(vec![shared.clone(), shared]);

        assert_eq!(text(&outer), "[[1], [1]]");
    }

    #[test]
    fn cycles_fail() {
        let list = Value::list(Vec::new());
        if let Value::Obj(obj) = &list {
            if let Obj::List(items) = &mut *obj.borrow_mut() {
                items.push(list.clone());
            }
        }

        assert_eq!(list.to_text(), Err(StringifyError::Cycle("list")));
    }

    #[test]
    fn nesting_is_limited() {
        let nest = |depth: usize| {
            (1..depth).fold(Value::list(Vec::new()), |inner, _| Value::list(vec![inner]))
        };

        let fits = text(&nest(MAX_DEPTH));
        assert!(fits.starts_with("[[") && fits.ends_with("]]"));
        assert_eq!(nest(MAX_DEPTH + 1).to_text(), Err(StringifyError::TooDeep));
    }

    #[test]
    fn borrowed_objects_fail() {
        let list = Value::list(Vec::new());
        let obj = list.as_obj().unwrap().clone();
        let _guard = obj.borrow_mut();

        assert_eq!(list.to_text(), Err(StringifyError::Borrowed));
    }

    #[test]
    fn host_failures_pass_through() {
        let value = Value::list(vec![Value::host(Broken)]);

        assert_eq!(
            value.to_text(),
            Err(StringifyError::Host("no text for you".to_string()))
        );
    }
}
