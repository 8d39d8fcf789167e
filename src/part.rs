use std::io::{self, Write};

/// Writes the body of a single part.
///
/// Handed out by [`FormBuilder::create_part`](crate::FormBuilder::create_part)
/// after the part's delimiter and headers were written. The part ends when the
/// next part is created or the form is closed, so only one `PartWriter` can be
/// alive at a time.
#[derive(Debug)]
pub struct PartWriter<'a, W: Write> {
    writer: &'a mut W,
    idx: usize,
    written: u64,
}

impl<'a, W: Write> PartWriter<'a, W> {
    pub(crate) fn new(writer: &'a mut W, idx: usize) -> Self {
        PartWriter { writer, idx, written: 0 }
    }

    /// The position of this part in the form, starting at zero.
    pub fn index(&self) -> usize {
        self.idx
    }

    /// Number of body bytes written to this part so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }
}

impl<'a, W: Write> Write for PartWriter<'a, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
