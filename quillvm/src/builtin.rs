use std::fmt::Display;
use std::rc::Rc;

use crate::obj::Obj;
use crate::value::Value;
use crate::{RuntimeError, RuntimeResult, Vm};

pub type BuiltinFn = fn(vm: &mut Vm, args: &[Value]) -> RuntimeResult<Value>;

fn args<const N: usize>(args: &[Value]) -> RuntimeResult<&[Value; N]> {
    args.try_into().map_err(|_| RuntimeError::ArityError {
        expected: N,
        found:    args.len(),
    })
}

fn print(vm: &mut Vm, args: &[Value]) -> RuntimeResult<Value> {
    let [value] = self::args::<1>(args)?;
    vm.print(value)?;
    Ok(Value::Null)
}

fn str_(_: &mut Vm, args: &[Value]) -> RuntimeResult<Value> {
    let [value] = self::args::<1>(args)?;
    if let Value::Str(_) = value {
        return Ok(value.clone());
    }
    let text = value.to_text()?;
    Ok(Value::Str(Rc::from(&*text)))
}

fn len(_: &mut Vm, args: &[Value]) -> RuntimeResult<Value> {
    let [value] = self::args::<1>(args)?;
    let len = match value {
        Value::Str(s) => s.chars().count(),
        Value::Obj(obj) => obj
            .try_borrow()
            .map_err(|_| RuntimeError::BorrowError)?
            .size()
            .ok_or(RuntimeError::TypeError)?,
        _ => return Err(RuntimeError::TypeError),
    };
    try_cast_int_value(len)
}

/// Appends to a list in place.
///
/// Objects are reference counted without a collector, so a list that ends
/// up containing itself (`push(xs, xs)`) is never freed.
fn push(_: &mut Vm, args: &[Value]) -> RuntimeResult<Value> {
    let [list, item] = self::args::<2>(args)?;
    let mut obj = list
        .as_obj()?
        .try_borrow_mut()
        .map_err(|_| RuntimeError::BorrowError)?;
    if let Obj::List(items) = &mut *obj {
        items.push(item.clone());
        Ok(Value::Null)
    } else {
        Err(RuntimeError::TypeError)
    }
}

fn typ_(_: &mut Vm, args: &[Value]) -> RuntimeResult<Value> {
    let [value] = self::args::<1>(args)?;
    Ok(Value::from(value.type_name()?))
}

#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    ptr:  BuiltinFn,
}

impl Builtin {
    pub const fn new(name: &'static str, ptr: BuiltinFn) -> Self {
        Self { name, ptr }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(self, vm: &mut Vm, args: &[Value]) -> RuntimeResult<Value> {
        (self.ptr)(vm, args)
    }
}

fn try_cast_int_value<T>(from: T) -> RuntimeResult<Value>
where
    i64: TryFrom<T>,
{
    from.try_into()
        .map_err(|_| RuntimeError::OutOfBoundsInteger)
        .map(Value::Int)
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Builtin {}

impl Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}

macro_rules! core_builtin {
    [$($name:ident),* $(,)?] => {
        [$(Builtin::$name()),*]
    };
}

macro_rules! builtin_name {
    ($name:ident) => {
        stringify!($name)
    };
    ($_:ident, $name:literal) => {
        $name
    };
}

macro_rules! impl_core {
    [$($name:ident $($method_name:literal)?),* $(,)?] => {
        impl Builtin {
            const CORE_LEN: usize = core_builtin![$($name),*].len();
            const CORE: [Builtin; Self::CORE_LEN] = core_builtin![$($name),*];

            #[must_use]
            pub const fn core_builtins() -> [Builtin; Self::CORE_LEN] {
                Self::CORE
            }

            $(
                #[must_use]
                pub const fn $name() -> Builtin {
                    Self::new(builtin_name!($name $(,$method_name)?), $name)
                }
            )*
        }
    };
}

impl_core![print, str_ "str", len, push, typ_ "typeof"];

#[cfg(test)]
mod test {
    use super::*;
    use crate::obj::Record;
    use crate::sink::Capture;
    use crate::text::StringifyError;

    fn vm() -> (Vm, Capture) {
        let out = Capture::default();
        (Vm::with_sink(out.clone()), out)
    }

    #[test]
    fn core_names() {
        let names: Vec<_> = Builtin::core_builtins().iter().map(Builtin::name).collect();
        assert_eq!(names, ["print", "str", "len", "push", "typeof"]);
    }

    #[test]
    fn print_checks_arity() {
        let (mut vm, out) = vm();

        let err = Builtin::print()
            .call(&mut vm, &[Value::Int(1), Value::Int(2)])
            .unwrap_err();

        assert_eq!(err, RuntimeError::ArityError { expected: 1, found: 2 });
        assert!(out.writes().is_empty());
    }

    #[test]
    fn str_matches_print() {
        let (mut vm, out) = vm();
        let value = Value::list(vec![Value::Float(0.25), Value::from("q")]);

        let text = Builtin::str_().call(&mut vm, &[value.clone()]).unwrap();
        Builtin::print().call(&mut vm, &[value]).unwrap();

        assert_eq!(text, Value::from(r#"[0.25, "q"]"#));
        assert_eq!(out.contents(), "[0.25, \"q\"]\n");
    }

    #[test]
    fn push_and_len() {
        let (mut vm, _) = vm();
        let list = Value::list(Vec::new());

        Builtin::push().call(&mut vm, &[list.clone(), Value::Int(7)]).unwrap();
        Builtin::push().call(&mut vm, &[list.clone(), Value::Null]).unwrap();

        assert_eq!(Builtin::len().call(&mut vm, &[list]), Ok(Value::Int(2)));
        assert_eq!(Builtin::len().call(&mut vm, &[Value::from("héllo")]), Ok(Value::Int(5)));
        assert_eq!(
            Builtin::len().call(&mut vm, &[Value::record(Record::new())]),
            Ok(Value::Int(0))
        );
        assert_eq!(
            Builtin::len().call(&mut vm, &[Value::Int(3)]),
            Err(RuntimeError::TypeError)
        );
    }

    #[test]
    fn self_containing_list_cannot_be_printed() {
        let (mut vm, out) = vm();
        let list = Value::list(Vec::new());

        Builtin::push().call(&mut vm, &[list.clone(), list.clone()]).unwrap();
        let err = Builtin::print().call(&mut vm, &[list]).unwrap_err();

        assert_eq!(err, RuntimeError::Stringify(StringifyError::Cycle("list")));
        assert!(out.writes().is_empty());
    }

    #[test]
    fn typeof_names() {
        let (mut vm, _) = vm();
        let typ = |vm: &mut Vm, v: Value| Builtin::typ_().call(vm, &[v]).unwrap();

        assert_eq!(typ(&mut vm, Value::Int(1)), Value::from("int"));
        assert_eq!(typ(&mut vm, Value::from("s")), Value::from("str"));
        assert_eq!(typ(&mut vm, Value::Builtin(Builtin::print())), Value::from("builtin"));
        assert_eq!(typ(&mut vm, Value::list(Vec::new())), Value::from("list"));
    }
}
