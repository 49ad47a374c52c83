use std::cell::RefCell;
use std::ops::Neg;
use std::rc::Rc;

use crate::builtin::Builtin;
use crate::obj::{HostObject, Obj, ObjRef, Record};
use crate::{RuntimeError, RuntimeResult};

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Builtin(Builtin),
    Obj(ObjRef),
}

impl Value {
    #[must_use]
    pub fn list(items: Vec<Self>) -> Self {
        Self::from(Obj::List(items))
    }

    #[must_use]
    pub fn record(record: Record) -> Self {
        Self::from(Obj::Record(record))
    }

    #[must_use]
    pub fn host(host: impl HostObject + 'static) -> Self {
        Self::from(Obj::Host(Box::new(host)))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_obj(&self) -> RuntimeResult<&ObjRef> {
        if let Self::Obj(v) = self {
            Ok(v)
        } else {
            Err(RuntimeError::TypeError)
        }
    }

    pub fn type_name(&self) -> RuntimeResult<&'static str> {
        let name = match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Builtin(_) => "builtin",
            Self::Obj(obj) => obj
                .try_borrow()
                .map_err(|_| RuntimeError::BorrowError)?
                .type_name(),
        };
        Ok(name)
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(lhs), Self::Bool(rhs)) => lhs == rhs,
            (Self::Int(lhs), Self::Int(rhs)) => lhs == rhs,
            (Self::Float(lhs), Self::Float(rhs)) => lhs == rhs,
            (Self::Str(lhs), Self::Str(rhs)) => lhs == rhs,
            (Self::Builtin(lhs), Self::Builtin(rhs)) => lhs == rhs,
            (Self::Obj(lhs), Self::Obj(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

macro_rules! value_impl {
    ($val:ty, $variant:ident) => {
        impl From<$val> for Value {
            #[inline]
            fn from(value: $val) -> Self {
                Self::$variant(value)
            }
        }
    };
}

value_impl!(f64, Float);
value_impl!(i64, Int);
value_impl!(bool, Bool);
value_impl!(Rc<str>, Str);
value_impl!(ObjRef, Obj);
value_impl!(Builtin, Builtin);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<Obj> for Value {
    fn from(value: Obj) -> Self {
        Self::Obj(Rc::new(RefCell::new(value)))
    }
}

impl Neg for &Value {
    type Output = RuntimeResult<Value>;

    fn neg(self) -> Self::Output {
        match self {
            Value::Int(int) => int
                .checked_neg()
                .map(Value::Int)
                .ok_or(RuntimeError::OutOfBoundsInteger),
            Value::Float(float) => Ok(Value::Float(-float)),
            _ => Err(RuntimeError::TypeError),
        }
    }
}
