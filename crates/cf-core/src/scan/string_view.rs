//! Non-owning byte-string view.
//!
//! `StringView` wraps a borrowed byte slice and provides the handful of
//! operations the text probers need (trimming, key/value splitting,
//! whitespace tokenization, number parsing) without ever allocating.
//! Pseudo-files are not guaranteed to be UTF-8, so everything works on bytes.

use std::fmt;

/// Borrowed view over a run of bytes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StringView<'a> {
    bytes: &'a [u8],
}

impl<'a> StringView<'a> {
    /// View over raw bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// View over a string literal.
    pub const fn of(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
        }
    }

    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The viewed bytes as `&str`, if they are valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.bytes).ok()
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Index of the first occurrence of `byte`.
    pub fn index_of(&self, byte: u8) -> Option<usize> {
        self.bytes.iter().position(|&b| b == byte)
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes.starts_with(prefix)
    }

    /// Exact byte comparison.
    pub fn equals(&self, other: &[u8]) -> bool {
        self.bytes == other
    }

    /// ASCII case-insensitive comparison.
    pub fn equals_ignore_ascii_case(&self, other: &[u8]) -> bool {
        self.bytes.eq_ignore_ascii_case(other)
    }

    /// Drops the first `count` bytes (saturating).
    pub fn pop_front(&self, count: usize) -> Self {
        Self::new(&self.bytes[count.min(self.bytes.len())..])
    }

    /// Keeps only the first `count` bytes (saturating).
    pub fn keep_front(&self, count: usize) -> Self {
        Self::new(&self.bytes[..count.min(self.bytes.len())])
    }

    /// Removes leading and trailing ASCII whitespace (space, tab, CR, LF).
    pub fn trim_whitespace(&self) -> Self {
        let start = self
            .bytes
            .iter()
            .position(|b| !is_space(*b))
            .unwrap_or(self.bytes.len());
        let end = self
            .bytes
            .iter()
            .rposition(|b| !is_space(*b))
            .map_or(start, |idx| idx + 1);
        Self::new(&self.bytes[start..end])
    }

    /// Splits `key : value` at the first colon; both halves are trimmed.
    ///
    /// Returns `None` when there is no colon or the key is empty.
    pub fn split_key_value(&self) -> Option<(Self, Self)> {
        let colon = self.index_of(b':')?;
        let key = self.keep_front(colon).trim_whitespace();
        if key.is_empty() {
            return None;
        }
        let value = self.pop_front(colon + 1).trim_whitespace();
        Some((key, value))
    }

    /// Iterates whitespace-delimited tokens, skipping empty runs.
    pub fn tokens(&self) -> Tokens<'a> {
        Tokens { rest: self.bytes }
    }

    /// Parses a non-negative number, decimal or `0x`-prefixed hexadecimal.
    ///
    /// Returns `None` for empty input, stray characters or overflow.
    pub fn parse_positive_number(&self) -> Option<u32> {
        let view = self.trim_whitespace();
        let (digits, radix) = if view.starts_with(b"0x") || view.starts_with(b"0X") {
            (view.pop_front(2), 16)
        } else {
            (view, 10)
        };
        if digits.is_empty() {
            return None;
        }
        let mut value: u32 = 0;
        for &byte in digits.bytes {
            let digit = (byte as char).to_digit(radix)?;
            value = value.checked_mul(radix)?.checked_add(digit)?;
        }
        Some(value)
    }

    /// Copies as many bytes as fit into `dst`, returning the count copied.
    pub fn copy_into(&self, dst: &mut [u8]) -> usize {
        let count = self.bytes.len().min(dst.len());
        dst[..count].copy_from_slice(&self.bytes[..count]);
        count
    }
}

impl fmt::Debug for StringView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.bytes))
    }
}

impl fmt::Display for StringView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Byte-wise so formatting never allocates.
        for chunk in self.bytes.utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Iterator over the whitespace-delimited tokens of a [`StringView`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Tokens<'a> {
    type Item = StringView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.rest.iter().position(|b| !is_space(*b))?;
        let rest = &self.rest[start..];
        let len = rest.iter().position(|b| is_space(*b)).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(len);
        self.rest = tail;
        Some(StringView::new(token))
    }
}
