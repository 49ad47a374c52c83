use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use crate::text::StringifyError;
use crate::value::Value;

pub type ObjRef = Rc<RefCell<Obj>>;

#[derive(Debug)]
pub enum Obj {
    List(Vec<Value>),
    Record(Record),
    Host(Box<dyn HostObject>),
}

impl Obj {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Host(host) => host.type_name(),
        }
    }

    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::List(items) => Some(items.len()),
            Self::Record(record) => Some(record.len()),
            Self::Host(_) => None,
        }
    }
}

/// An object provided by the embedding application.
///
/// Host objects choose their own text form, and that conversion is allowed
/// to fail. A failure is handed back to whoever asked for the text as is.
pub trait HostObject: Debug {
    fn type_name(&self) -> &'static str;

    fn to_text(&self) -> Result<String, StringifyError>;
}

/// Key/value fields kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(Rc<str>, Value)>,
}

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Sets `key`, keeping its original position if it was already present.
    pub fn insert(&mut self, key: Rc<str>, value: Value) -> Option<Value> {
        if let Some((_, slot)) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(std::mem::replace(slot, value))
        } else {
            self.fields.push((key, value));
            None
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (&**k, v))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(Rc<str>, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (Rc<str>, Value)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}
