//! Bounded-buffer line reader.
//!
//! Reads lines from any `Read` source through a fixed-size buffer that lives
//! inside the reader (on the caller's stack). A line longer than the buffer
//! is returned truncated with `full_line == false` and the remainder of that
//! line is discarded, so memory use is bounded regardless of input.

use super::StringView;
use std::io::{ErrorKind, Read};
use tracing::debug;

/// Default buffer size for [`StackLineReader`].
pub const STACK_LINE_READER_BUFFER_SIZE: usize = 1024;

/// One line produced by [`StackLineReader::next_line`].
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    /// Line contents without the trailing newline.
    pub view: StringView<'a>,
    /// False when the line did not fit in the buffer and was cut short.
    pub full_line: bool,
}

/// Line reader over a fixed `N`-byte buffer.
///
/// Not an `Iterator`: each returned [`Line`] borrows the internal buffer
/// until the next call.
pub struct StackLineReader<R, const N: usize = STACK_LINE_READER_BUFFER_SIZE> {
    source: R,
    buffer: [u8; N],
    start: usize,
    end: usize,
    eof: bool,
    skipping: bool,
}

impl<R: Read, const N: usize> StackLineReader<R, N> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buffer: [0; N],
            start: 0,
            end: 0,
            eof: false,
            skipping: false,
        }
    }

    /// Returns the next line, or `None` at end of input.
    ///
    /// Read errors other than `Interrupted` are treated as end of input.
    pub fn next_line(&mut self) -> Option<Line<'_>> {
        let (start, end, full_line) = self.next_range()?;
        Some(Line {
            view: StringView::new(&self.buffer[start..end]),
            full_line,
        })
    }

    fn next_range(&mut self) -> Option<(usize, usize, bool)> {
        loop {
            let pending = &self.buffer[self.start..self.end];
            if let Some(offset) = pending.iter().position(|&b| b == b'\n') {
                let line_start = self.start;
                let line_end = self.start + offset;
                self.start = line_end + 1;
                if self.skipping {
                    // Tail of a truncated line.
                    self.skipping = false;
                    continue;
                }
                return Some((line_start, line_end, true));
            }

            if self.eof {
                if self.start == self.end {
                    return None;
                }
                let range = (self.start, self.end);
                self.start = self.end;
                if self.skipping {
                    self.skipping = false;
                    return None;
                }
                // Final line without a trailing newline.
                return Some((range.0, range.1, true));
            }

            if self.start > 0 {
                self.buffer.copy_within(self.start..self.end, 0);
                self.end -= self.start;
                self.start = 0;
            }

            if self.end == N {
                // Buffer full and no newline in sight.
                if self.skipping {
                    self.end = 0;
                } else {
                    self.skipping = true;
                    self.start = N;
                    return Some((0, N, false));
                }
            }

            self.fill();
        }
    }

    fn fill(&mut self) {
        loop {
            match self.source.read(&mut self.buffer[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return;
                }
                Ok(count) => {
                    self.end += count;
                    return;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!(error = %err, "line reader stopped on read error");
                    self.eof = true;
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that hands out at most `chunk` bytes per call.
    struct Chunked<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Chunked<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let count = self.chunk.min(buf.len()).min(self.data.len());
            buf[..count].copy_from_slice(&self.data[..count]);
            self.data = &self.data[count..];
            Ok(count)
        }
    }

    fn collect<R: Read, const N: usize>(reader: &mut StackLineReader<R, N>) -> Vec<(String, bool)> {
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line() {
            lines.push((line.view.to_string(), line.full_line));
        }
        lines
    }

    #[test]
    fn test_reads_lines_and_final_line_without_newline() {
        let mut reader: StackLineReader<_> = StackLineReader::new(&b"a : 1\nb : 2\nlast"[..]);
        assert_eq!(
            collect(&mut reader),
            vec![
                ("a : 1".to_string(), true),
                ("b : 2".to_string(), true),
                ("last".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_empty_input_and_blank_lines() {
        let mut reader: StackLineReader<_> = StackLineReader::new(&b""[..]);
        assert!(reader.next_line().is_none());

        let mut reader: StackLineReader<_> = StackLineReader::new(&b"\n\nx\n"[..]);
        assert_eq!(
            collect(&mut reader),
            vec![
                (String::new(), true),
                (String::new(), true),
                ("x".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_long_line_is_truncated_and_next_line_intact() {
        let input = b"0123456789ABCDEF\nshort\n";
        let mut reader = StackLineReader::<_, 8>::new(&input[..]);
        assert_eq!(
            collect(&mut reader),
            vec![
                ("01234567".to_string(), false),
                ("short".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_truncated_final_line_without_newline() {
        let mut reader = StackLineReader::<_, 4>::new(&b"ok\ntoolongline"[..]);
        assert_eq!(
            collect(&mut reader),
            vec![("ok".to_string(), true), ("tool".to_string(), false)]
        );
    }

    #[test]
    fn test_line_exactly_buffer_sized() {
        let mut reader = StackLineReader::<_, 4>::new(&b"abc\nabcd\nz\n"[..]);
        assert_eq!(
            collect(&mut reader),
            vec![
                ("abc".to_string(), true),
                ("abcd".to_string(), false),
                ("z".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_small_reads_are_stitched_together() {
        let data = b"Features\t: fp asimd evtstrm aes\nCPU part\t: 0xd0c\n";
        let source = Chunked {
            data: &data[..],
            chunk: 3,
        };
        let mut reader = StackLineReader::<_, 64>::new(source);
        assert_eq!(
            collect(&mut reader),
            vec![
                ("Features\t: fp asimd evtstrm aes".to_string(), true),
                ("CPU part\t: 0xd0c".to_string(), true),
            ]
        );
    }
}
