use crate::sink::Sink;
use crate::text::Printable;
use crate::value::Value;
use crate::{RuntimeError, RuntimeResult};

pub struct Printer {
    sink: Box<dyn Sink>,
}

impl Printer {
    #[must_use]
    pub const fn new(sink: Box<dyn Sink>) -> Self {
        Self { sink }
    }

    /// Converts `value` to text and writes it with a trailing `\n` as a
    /// single write.
    ///
    /// A failed conversion is returned unchanged and nothing is written.
    pub fn print(&mut self, value: &Value) -> RuntimeResult<()> {
        let text = Printable::from(value).to_text()?;

        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(&text);
        line.push('\n');

        tracing::trace!(bytes = line.len(), "print");
        self.sink
            .write_text(&line)
            .map_err(|err| RuntimeError::Output(err.kind()))
    }
}
