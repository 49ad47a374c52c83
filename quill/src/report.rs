use std::error::Error;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use quillc::span::Spand;

/// Anything that can be rendered as a diagnostic against its source.
pub trait Report {
    fn report(&self) -> Diagnostic<()>;
}

impl<T: Error> Report for Spand<T> {
    fn report(&self) -> Diagnostic<()> {
        Diagnostic::error()
            .with_message(self.kind().to_string())
            .with_label(Label::primary((), self.span))
    }
}
