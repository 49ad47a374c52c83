use std::fmt::Write;
use std::io::Read;
use std::process::ExitCode;

use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use quillc::ast::{Stmt, StmtKind};
use quillc::eval::{Eval, EvalError};
use quillc::CompileError;
use quillvm::Vm;

use crate::cli::Cli;
use crate::editor::{Editor, EditorRead};
use crate::report::Report;

pub struct Driver {
    file:       Option<SimpleFile<String, String>>,
    max_errors: usize,
    quiet:      bool,
}

impl Driver {
    fn read_stdin() -> std::io::Result<String> {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    }

    pub fn from_config(cfg: Cli) -> std::io::Result<Self> {
        let file = if cfg.stdin {
            Some(SimpleFile::new("<stdin>".to_string(), Self::read_stdin()?))
        } else {
            cfg.file
                .map(|path| {
                    let source = std::fs::read_to_string(&path)?;
                    Ok::<_, std::io::Error>(SimpleFile::new(path, source))
                })
                .transpose()?
        };
        Ok(Self {
            file,
            quiet: cfg.quiet,
            max_errors: cfg.max_errors,
        })
    }

    pub fn run(self) -> ExitCode {
        if let Some(file) = &self.file {
            tracing::debug!(file = %file.name(), "running script");
            self.run_file(file)
        } else {
            tracing::debug!("starting repl");
            match self.repl() {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("error: {err}");
                    ExitCode::from(2)
                }
            }
        }
    }

    fn run_file(&self, file: &SimpleFile<String, String>) -> ExitCode {
        let stmts = match quillc::parse(file.source()) {
            Ok(stmts) => stmts,
            Err(err) => {
                self.report_compile_error(file, err);
                return ExitCode::FAILURE;
            }
        };

        let mut vm = Vm::new();
        match Eval::new(&mut vm).eval_all(&stmts) {
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                self.report_runtime_error(file, &err);
                ExitCode::FAILURE
            }
        }
    }

    fn report<E: Report>(&self, errors: &[E], file: &SimpleFile<String, String>) {
        if self.quiet {
            return;
        }
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();
        let mut displayed = 0;
        {
            let mut writer = writer.lock();
            for e in errors.iter().take(self.max_errors) {
                let report = e.report();
                let _ = term::emit(&mut writer, &config, file, &report);
                displayed += 1;
            }
        }

        let mut message = format!("could not run {}", file.name());

        let _ = message.write_fmt(format_args!(
            " due to {} previous {} ({} emitted)",
            errors.len(),
            if errors.len() > 1 { "errors" } else { "error" },
            displayed
        ));

        let error = Diagnostic::error().with_message(message);

        let _ = term::emit(&mut writer.lock(), &config, file, &error);
    }

    fn report_compile_error(&self, file: &SimpleFile<String, String>, error: CompileError) {
        tracing::debug!(file = %file.name(), "compile error");
        match error {
            CompileError::Lex(spands) => self.report(&spands, file),
            CompileError::Parse(spands) => self.report(&spands, file),
        }
    }

    fn report_runtime_error(&self, file: &SimpleFile<String, String>, error: &EvalError) {
        tracing::debug!(file = %file.name(), error = %error, "runtime error");
        self.report(std::slice::from_ref(error), file);
    }

    /// Runs one statement, echoing the value of a bare expression through
    /// the same printer scripts use.
    fn repl_stmt(vm: &mut Vm, stmt: &Stmt<'_>) -> Result<(), EvalError> {
        let value = Eval::new(vm).eval_stmt(stmt)?;
        if matches!(stmt.kind, StmtKind::Expr(_)) && !value.is_null() {
            vm.print(&value)
                .map_err(|err| EvalError::new(err, stmt.span))?;
        }
        Ok(())
    }

    fn repl(&self) -> std::io::Result<()> {
        let mut vm = Vm::new();
        let mut editor = Editor::default();
        loop {
            let signal = editor.read()?;
            let input = match signal {
                EditorRead::Read(input) => input,
                EditorRead::Break => break,
                EditorRead::Continue => continue,
            };

            let file = SimpleFile::new("<stdin>".to_string(), input);
            let stmts = match quillc::parse(file.source()) {
                Ok(stmts) => stmts,
                Err(err) => {
                    self.report_compile_error(&file, err);
                    continue;
                }
            };

            for stmt in &stmts {
                if let Err(err) = Self::repl_stmt(&mut vm, stmt) {
                    self.report_runtime_error(&file, &err);
                    break;
                }
            }
        }

        tracing::debug!("leaving repl");
        Ok(())
    }
}
