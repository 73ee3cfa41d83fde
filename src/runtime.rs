use crate::object::Object;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Cursor, Write};
use std::rc::Rc;

/// What a builtin may ask of the interpreter that is running it.
pub trait Runtime {
    /// Invokes a user function or builtin with already evaluated arguments.
    fn call_function(&mut self, function: &Object, args: Vec<Object>) -> Object;

    fn input_reader(&self) -> InputReader;
}

/// Shared handle to the stream program output is written to.
#[derive(Clone)]
pub struct OutputSink(Rc<RefCell<Box<dyn Write>>>);

impl OutputSink {
    pub fn new(writer: impl Write + 'static) -> Self {
        Self(Rc::new(RefCell::new(Box::new(writer))))
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn write_str(&self, s: &str) -> io::Result<()> {
        let mut writer = self.0.borrow_mut();
        writer.write_all(s.as_bytes())?;
        writer.flush()
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OutputSink")
    }
}

/// Shared buffered input. Every reader reuses the same buffer so
/// consecutive reads never drop bytes.
#[derive(Clone)]
pub struct InputReader(Rc<RefCell<Box<dyn BufRead>>>);

impl InputReader {
    pub fn new(reader: impl BufRead + 'static) -> Self {
        Self(Rc::new(RefCell::new(Box::new(reader))))
    }

    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()))
    }

    pub fn from_string(input: impl Into<String>) -> Self {
        Self::new(Cursor::new(input.into().into_bytes()))
    }

    /// Reads one line without its terminator, or `None` at end of input.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.0.borrow_mut().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

impl fmt::Debug for InputReader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InputReader")
    }
}

/// In-memory writer whose contents stay readable after it is handed to an [`OutputSink`].
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_output_sink_shares_writer() {
        let buffer = SharedBuffer::new();
        let sink = OutputSink::new(buffer.clone());
        let alias = sink.clone();
        sink.write_str("a").unwrap();
        alias.write_str("b\n").unwrap();
        assert_eq!(buffer.contents(), "ab\n");
    }

    #[test]
    fn test_input_reader_keeps_buffer_between_reads() {
        let reader = InputReader::from_string("first\r\nsecond\nthird");
        let alias = reader.clone();
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("first"));
        assert_eq!(alias.read_line().unwrap().as_deref(), Some("second"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("third"));
        assert_eq!(alias.read_line().unwrap(), None);
    }
}
