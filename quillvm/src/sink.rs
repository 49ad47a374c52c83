use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Destination of printed lines.
///
/// Every call receives one complete line, terminator included.
pub trait Sink {
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

/// The process standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Sink for Stdout {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

/// Keeps every write in memory, one entry per write.
///
/// Clones share the same storage, so a clone can be handed to a [`Vm`]
/// while the original is kept around to inspect the output.
///
/// [`Vm`]: crate::Vm
#[derive(Debug, Default, Clone)]
pub struct Capture {
    writes: Rc<RefCell<Vec<String>>>,
}

impl Capture {
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    #[must_use]
    pub fn contents(&self) -> String {
        self.writes.borrow().concat()
    }
}

impl Sink for Capture {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.writes.borrow_mut().push(text.to_owned());
        Ok(())
    }
}
