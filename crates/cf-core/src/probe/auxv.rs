//! Auxiliary-vector capability words (`AT_HWCAP`, `AT_HWCAP2`).

use super::{ProbeResult, Prober, SourceKind, SourceUnavailable};
use crate::registry::{Registry, Word};
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use tracing::debug;

const AT_NULL: usize = 0;
const AT_HWCAP: usize = 16;
const AT_HWCAP2: usize = 26;

const WORD_BYTES: usize = std::mem::size_of::<usize>();
const ENTRY_BYTES: usize = 2 * WORD_BYTES;

/// A source of the two raw capability words.
pub trait AuxvSource {
    const KIND: SourceKind;

    fn words(&self) -> Result<[u32; 2], SourceUnavailable>;
}

/// `getauxval(3)` from the C library.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetAuxval;

impl AuxvSource for GetAuxval {
    const KIND: SourceKind = SourceKind::Getauxval;

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn words(&self) -> Result<[u32; 2], SourceUnavailable> {
        // SAFETY: getauxval only reads the process auxiliary vector and
        // returns 0 for unknown tags.
        let (hwcap, hwcap2) = unsafe {
            (
                libc::getauxval(AT_HWCAP as libc::c_ulong),
                libc::getauxval(AT_HWCAP2 as libc::c_ulong),
            )
        };
        if hwcap == 0 && hwcap2 == 0 {
            return Err(SourceUnavailable::EmptyWords);
        }
        Ok([hwcap as u32, hwcap2 as u32])
    }

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn words(&self) -> Result<[u32; 2], SourceUnavailable> {
        Err(SourceUnavailable::NotSupportedOnOs)
    }
}

/// The auxiliary vector read from a file, `/proc/self/auxv` by default.
#[derive(Debug, Clone)]
pub struct AuxvFile {
    path: PathBuf,
}

impl AuxvFile {
    pub const DEFAULT_PATH: &'static str = "/proc/self/auxv";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for AuxvFile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl AuxvSource for AuxvFile {
    const KIND: SourceKind = SourceKind::AuxvFile;

    fn words(&self) -> Result<[u32; 2], SourceUnavailable> {
        let file = std::fs::File::open(&self.path).map_err(|err| {
            debug!(path = %self.path.display(), error = %err, "auxv file not opened");
            match err.kind() {
                ErrorKind::NotFound => SourceUnavailable::FileMissing,
                _ => SourceUnavailable::Unreadable,
            }
        })?;
        parse_auxv(file).ok_or(SourceUnavailable::EmptyWords)
    }
}

/// Decodes native-endian `(tag, value)` word pairs up to `AT_NULL`.
///
/// Returns `None` when neither capability tag is present. A truncated
/// trailing entry ends decoding.
pub fn parse_auxv<R: Read>(mut reader: R) -> Option<[u32; 2]> {
    let mut entry = [0u8; ENTRY_BYTES];
    let mut hwcap = None;
    let mut hwcap2 = None;

    loop {
        if let Err(err) = reader.read_exact(&mut entry) {
            if err.kind() != ErrorKind::UnexpectedEof {
                debug!(error = %err, "auxv read stopped");
            }
            break;
        }
        let (tag, value) = split_entry(&entry);
        match tag {
            AT_NULL => break,
            AT_HWCAP => hwcap = Some(value as u32),
            AT_HWCAP2 => hwcap2 = Some(value as u32),
            _ => {}
        }
    }

    if hwcap.is_none() && hwcap2.is_none() {
        return None;
    }
    Some([hwcap.unwrap_or(0), hwcap2.unwrap_or(0)])
}

fn split_entry(entry: &[u8; ENTRY_BYTES]) -> (usize, usize) {
    let mut tag = [0u8; WORD_BYTES];
    let mut value = [0u8; WORD_BYTES];
    tag.copy_from_slice(&entry[..WORD_BYTES]);
    value.copy_from_slice(&entry[WORD_BYTES..]);
    (usize::from_ne_bytes(tag), usize::from_ne_bytes(value))
}

/// Fills both words from an [`AuxvSource`], masked to the registry.
#[derive(Debug, Clone, Default)]
pub struct AuxvProber<A> {
    source: A,
}

impl<A: AuxvSource> AuxvProber<A> {
    pub fn new(source: A) -> Self {
        Self { source }
    }
}

impl<A: AuxvSource> Prober for AuxvProber<A> {
    fn source(&self) -> SourceKind {
        A::KIND
    }

    fn probe(&self, registry: &Registry) -> ProbeResult {
        let words = match self.source.words() {
            Ok(words) => words,
            Err(reason) => {
                debug!(source = %A::KIND, %reason, "auxv source unavailable");
                return ProbeResult::unavailable(reason);
            }
        };

        let mut result = ProbeResult::probed();
        result.words = [
            words[0] & registry.known_mask(Word::Hwcap),
            words[1] & registry.known_mask(Word::Hwcap2),
        ];
        debug!(
            source = %A::KIND,
            hwcap = format_args!("{:#010x}", words[0]),
            hwcap2 = format_args!("{:#010x}", words[1]),
            "auxv words read"
        );
        result
    }
}
