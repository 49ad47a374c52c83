pub mod builtin;
pub mod obj;
pub mod printer;
pub mod sink;
pub mod text;
pub mod value;

use std::collections::HashMap;
use std::rc::Rc;

use crate::builtin::Builtin;
use crate::printer::Printer;
use crate::sink::{Sink, Stdout};
use crate::text::StringifyError;
use crate::value::Value;

/// Host state shared by every piece of evaluated code: the global scope and
/// the printer that `print` writes through.
pub struct Vm {
    global:  HashMap<Rc<str>, Value>,
    printer: Printer,
}

impl Default for Vm {
    fn default() -> Self {
        Self::with_sink(Stdout)
    }
}

impl Vm {
    /// Creates a host writing to the process standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host whose `print` writes to `sink`.
    ///
    /// The core builtins are installed into the global scope before this
    /// returns, so any code evaluated afterwards can call them by name.
    #[must_use]
    pub fn with_sink(sink: impl Sink + 'static) -> Self {
        let mut vm = Self {
            global:  HashMap::new(),
            printer: Printer::new(Box::new(sink)),
        };
        for builtin in Builtin::core_builtins() {
            vm.define_global(builtin.name(), Value::Builtin(builtin));
        }
        tracing::debug!(count = vm.global.len(), "installed core builtins");
        vm
    }

    /// Binds `name` in the global scope, returning the value it shadowed.
    pub fn define_global(&mut self, name: &str, value: Value) -> Option<Value> {
        self.global.insert(Rc::from(name), value)
    }

    pub fn global(&self, name: &str) -> RuntimeResult<&Value> {
        self.global
            .get(name)
            .ok_or_else(|| RuntimeError::GlobalNotFound(Rc::from(name)))
    }

    pub fn assign_global(&mut self, name: &str, value: Value) -> RuntimeResult<()> {
        let global = self
            .global
            .get_mut(name)
            .ok_or_else(|| RuntimeError::GlobalNotFound(Rc::from(name)))?;
        *global = value;
        Ok(())
    }

    pub fn call(&mut self, callee: &Value, args: &[Value]) -> RuntimeResult<Value> {
        if let Value::Builtin(builtin) = callee {
            builtin.call(self, args)
        } else {
            Err(RuntimeError::NotCallable)
        }
    }

    pub fn call_global(&mut self, name: &str, args: &[Value]) -> RuntimeResult<Value> {
        let callee = self.global(name)?.clone();
        self.call(&callee, args)
    }

    /// Writes the text form of `value` and a line terminator to the sink.
    pub fn print(&mut self, value: &Value) -> RuntimeResult<()> {
        self.printer.print(value)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error(transparent)]
    Stringify(#[from] StringifyError),
    #[error("could not write output: {0}")]
    Output(std::io::ErrorKind),
    #[error("type error")]
    TypeError,
    #[error("expected {expected} argument(s), found {found}")]
    ArityError { expected: usize, found: usize },
    #[error("borrow error")]
    BorrowError,
    #[error("global '{0}' not found")]
    GlobalNotFound(Rc<str>),
    #[error("value is not callable")]
    NotCallable,
    #[error("integer out of bounds")]
    OutOfBoundsInteger,
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod test {
    use super::*;
    use crate::sink::Capture;

    #[test]
    fn print_is_installed_as_global() {
        let out = Capture::default();
        let mut vm = Vm::with_sink(out.clone());

        let ret = vm.call_global("print", &[Value::from("hello")]);

        assert_eq!(ret, Ok(Value::Null));
        assert_eq!(out.writes(), ["hello\n"]);
    }

    #[test]
    fn globals_can_be_defined_and_reassigned() {
        let mut vm = Vm::with_sink(Capture::default());

        assert!(vm.define_global("answer", Value::Int(41)).is_none());
        vm.assign_global("answer", Value::Int(42)).unwrap();

        assert_eq!(vm.global("answer"), Ok(&Value::Int(42)));
    }

    #[test]
    fn missing_global() {
        let mut vm = Vm::with_sink(Capture::default());

        let err = vm.assign_global("nope", Value::Null).unwrap_err();
        assert_eq!(err, RuntimeError::GlobalNotFound(Rc::from("nope")));
        assert_eq!(err.to_string(), "global 'nope' not found");
    }

    #[test]
    fn print_can_be_shadowed() {
        let out = Capture::default();
        let mut vm = Vm::with_sink(out.clone());
        vm.define_global("print", Value::Int(1));

        let err = vm.call_global("print", &[Value::Null]).unwrap_err();

        assert_eq!(err, RuntimeError::NotCallable);
        assert!(out.writes().is_empty());
    }
}
