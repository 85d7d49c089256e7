//! Platform identification strings.
//!
//! PowerPC kernels describe the machine in free-form cpuinfo keys
//! (`platform`, `model`, `machine`, `cpu`) and in the `AT_PLATFORM` /
//! `AT_BASE_PLATFORM` auxiliary vector entries. These are copied into
//! fixed-capacity buffers, truncated when too long, so gathering them
//! allocates nothing.

use crate::config::DetectConfig;
use crate::scan::{StackLineReader, StringView};
use serde::{Serialize, Serializer};
use std::io::Read;
use tracing::debug;

/// Capacity of each [`PlatformStrings`] field.
pub const PLATFORM_STRING_CAPACITY: usize = 64;

/// Inline string of at most `N` bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStr<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> FixedStr<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
        }
    }

    /// Copies `src`, truncated to `N` bytes and to the last whole UTF-8
    /// character.
    pub fn from_bytes(src: &[u8]) -> Self {
        let mut out = Self::new();
        let copied = StringView::new(src).copy_into(&mut out.bytes);
        out.len = match std::str::from_utf8(&out.bytes[..copied]) {
            Ok(_) => copied,
            Err(err) => err.valid_up_to(),
        };
        out
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> std::fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> std::fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> Serialize for FixedStr<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

type Field = FixedStr<PLATFORM_STRING_CAPACITY>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformStrings {
    /// cpuinfo `platform`, e.g. `PowerNV`.
    pub platform: Field,
    /// cpuinfo `model`.
    pub model: Field,
    /// cpuinfo `machine`.
    pub machine: Field,
    /// cpuinfo `cpu`, e.g. `POWER9, altivec supported`.
    pub cpu: Field,
    /// `AT_PLATFORM`, e.g. `power9`.
    pub aux_platform: Field,
    /// `AT_BASE_PLATFORM`.
    pub aux_base_platform: Field,
}

impl PlatformStrings {
    fn slot(&mut self, key: StringView<'_>) -> Option<&mut Field> {
        let slot = if key.equals_ignore_ascii_case(b"platform") {
            &mut self.platform
        } else if key.equals_ignore_ascii_case(b"model") {
            &mut self.model
        } else if key.equals_ignore_ascii_case(b"machine") {
            &mut self.machine
        } else if key.equals_ignore_ascii_case(b"cpu") {
            &mut self.cpu
        } else {
            return None;
        };
        Some(slot)
    }
}

/// Gathers platform strings from the configured cpuinfo file and, on
/// Linux, the auxiliary vector. Missing sources leave fields empty.
pub fn platform_strings(config: &DetectConfig) -> PlatformStrings {
    let mut strings = match std::fs::File::open(&config.cpuinfo_path) {
        Ok(file) => scan_platform(file),
        Err(err) => {
            debug!(path = %config.cpuinfo_path.display(), error = %err, "cpuinfo not opened");
            PlatformStrings::default()
        }
    };
    let (platform, base_platform) = aux_platform();
    strings.aux_platform = platform;
    strings.aux_base_platform = base_platform;
    strings
}

/// Extracts the cpuinfo platform keys from any reader. The first value for
/// each key wins.
pub fn scan_platform<R: Read>(reader: R) -> PlatformStrings {
    let mut strings = PlatformStrings::default();
    let mut lines: StackLineReader<R> = StackLineReader::new(reader);
    while let Some(line) = lines.next_line() {
        let Some((key, value)) = line.view.split_key_value() else {
            continue;
        };
        if let Some(slot) = strings.slot(key) {
            if slot.is_empty() {
                *slot = Field::from_bytes(value.as_bytes());
            }
        }
    }
    strings
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn aux_platform() -> (Field, Field) {
    const AT_PLATFORM: libc::c_ulong = 15;
    const AT_BASE_PLATFORM: libc::c_ulong = 24;

    fn read(tag: libc::c_ulong) -> Field {
        // SAFETY: for these tags getauxval returns either 0 or a pointer to
        // a NUL-terminated string that lives for the whole process.
        let ptr = unsafe { libc::getauxval(tag) } as *const libc::c_char;
        if ptr.is_null() {
            return Field::new();
        }
        // SAFETY: non-null pointer from the auxiliary vector, see above.
        let text = unsafe { std::ffi::CStr::from_ptr(ptr) };
        Field::from_bytes(text.to_bytes())
    }

    (read(AT_PLATFORM), read(AT_BASE_PLATFORM))
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn aux_platform() -> (Field, Field) {
    (Field::new(), Field::new())
}
