// A write-through fan-out file handle: writes go to every underlying sink,
// and the reported byte count is the minimum across all of them, so a
// short write or failure on any single sink is observable to the caller.

use std::fs::File;
use std::io::{self, Write};

pub struct MultiFile {
    files: Vec<File>,
}

impl MultiFile {
    pub fn new(files: Vec<File>) -> Self {
        Self { files }
    }
}

impl Write for MultiFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut min_written = buf.len();
        for file in &mut self.files {
            let written = file.write(buf)?;
            min_written = min_written.min(written);
        }
        Ok(min_written)
    }

    fn flush(&mut self) -> io::Result<()> {
        for file in &mut self.files {
            file.flush()?;
        }
        Ok(())
    }
}
