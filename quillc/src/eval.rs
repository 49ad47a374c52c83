use std::rc::Rc;

use quillvm::obj::Record;
use quillvm::value::Value;
use quillvm::{RuntimeError, Vm};

use crate::ast::{Expr, ExprKind, Stmt, StmtKind};
use crate::span::{Span, Spand};

pub type EvalError = Spand<RuntimeError>;
pub type EvalResult<T> = Result<T, EvalError>;

/// Tree-walking evaluator running statements against a [`Vm`].
pub struct Eval<'vm> {
    vm: &'vm mut Vm,
}

fn at(span: Span) -> impl FnOnce(RuntimeError) -> EvalError {
    move |err| EvalError::new(err, span)
}

impl<'vm> Eval<'vm> {
    pub const fn new(vm: &'vm mut Vm) -> Self {
        Self { vm }
    }

    /// Runs `stmts` in order, stopping at the first error.
    ///
    /// Returns the value of the last statement, or `null` if there is none.
    pub fn eval_all(&mut self, stmts: &[Stmt<'_>]) -> EvalResult<Value> {
        let mut last = Value::Null;
        for stmt in stmts {
            last = self.eval_stmt(stmt)?;
        }
        Ok(last)
    }

    pub fn eval_stmt(&mut self, stmt: &Stmt<'_>) -> EvalResult<Value> {
        match &stmt.kind {
            StmtKind::Let { name, bind } => {
                let value = self.eval_expr(bind)?;
                self.vm.define_global(name, value);
                Ok(Value::Null)
            }
            StmtKind::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                self.vm.assign_global(name, value).map_err(at(stmt.span))?;
                Ok(Value::Null)
            }
            StmtKind::Expr(expr) => self.eval_expr(expr),
            StmtKind::Semi(expr) => {
                self.eval_expr(expr)?;
                Ok(Value::Null)
            }
        }
    }

    pub fn eval_expr(&mut self, expr: &Expr<'_>) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Integer(x) => Ok(Value::Int(*x)),
            ExprKind::Float(x) => Ok(Value::Float(*x)),
            ExprKind::String(s) => Ok(Value::from(&**s)),
            ExprKind::Ident(name) => self.vm.global(name).cloned().map_err(at(expr.span)),
            ExprKind::List(items) => {
                let items = self.eval_args(items)?;
                Ok(Value::list(items))
            }
            ExprKind::Record(fields) => {
                let mut record = Record::new();
                for field in fields {
                    let value = self.eval_expr(&field.value)?;
                    record.insert(Rc::from(&*field.key.kind), value);
                }
                Ok(Value::record(record))
            }
            ExprKind::Neg(inner) => {
                let value = self.eval_expr(inner)?;
                (-&value).map_err(at(expr.span))
            }
            ExprKind::Call { callee, args } => {
                let callee = self.eval_expr(callee)?;
                let args = self.eval_args(args)?;
                self.vm.call(&callee, &args).map_err(at(expr.span))
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr<'_>]) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }
}

#[cfg(test)]
mod test {
    use quillvm::sink::Capture;
    use quillvm::text::StringifyError;

    use super::*;
    use crate::parse;

    fn run(source: &str) -> (EvalResult<Value>, Capture) {
        let out = Capture::default();
        let mut vm = Vm::with_sink(out.clone());
        let stmts = parse(source).unwrap();
        let result = Eval::new(&mut vm).eval_all(&stmts);
        (result, out)
    }

    #[test]
    fn print_scenarios() {
        let (result, out) = run(r#"
            print("hello")
            print(42)
            print(true)
            print({})
            print(null)
        "#);

        assert_eq!(result, Ok(Value::Null));
        assert_eq!(out.writes(), ["hello\n", "42\n", "true\n", "{}\n", "null\n"]);
    }

    #[test]
    fn globals_and_nesting() {
        let (result, out) = run(r#"
            let xs = [1, -2.5, "three"];
            push(xs, {name: "four", "with space": [null]});
            print(xs);
            print(len(xs));
            print(typeof(xs));
            xs = str(xs);
            print(typeof(xs));
            xs
        "#);

        let text = r#"[1, -2.5, "three", {name: "four", "with space": [null]}]"#;
        assert_eq!(result, Ok(Value::from(text)));
        assert_eq!(
            out.contents(),
            format!("{text}\n4\nlist\nstr\n")
        );
    }

    #[test]
    fn print_returns_null_and_can_be_aliased() {
        let (result, out) = run("let say = print; say(say(1))");

        assert_eq!(result, Ok(Value::Null));
        assert_eq!(out.writes(), ["1\n", "null\n"]);
    }

    #[test]
    fn cycle_error_carries_call_span() {
        let source = "let a = []; push(a, a); print(a);";
        let (result, out) = run(source);

        let err = result.unwrap_err();
        assert_eq!(
            err.kind,
            RuntimeError::Stringify(StringifyError::Cycle("list"))
        );
        assert_eq!(&source[std::ops::Range::from(err.span)], "print(a)");
        assert!(out.writes().is_empty());
    }

    #[test]
    fn evaluation_stops_at_first_error() {
        let (result, out) = run("print(1); missing(2); print(3);");

        assert_eq!(
            result.unwrap_err().kind,
            RuntimeError::GlobalNotFound(Rc::from("missing"))
        );
        assert_eq!(out.writes(), ["1\n"]);
    }

    #[test]
    fn assignment_requires_definition() {
        let (result, _) = run("y = 1");

        assert_eq!(
            result.unwrap_err().kind,
            RuntimeError::GlobalNotFound(Rc::from("y"))
        );
    }

    #[test]
    fn calling_non_functions() {
        let (result, _) = run("1(2)");
        assert_eq!(result.unwrap_err().kind, RuntimeError::NotCallable);

        let (result, _) = run(r#"-"a""#);
        assert_eq!(result.unwrap_err().kind, RuntimeError::TypeError);
    }
}
