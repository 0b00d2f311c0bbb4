use thiserror::Error;

pub type Result<T> = std::result::Result<T, ObjError>;

/// The only two failure classes the format actually has: a bad magic at
/// construction, and (only with the `mmap` feature) the environmental I/O
/// error of opening or mapping the backing file. Everything else — an
/// unknown string passed to `string_ref`, an out-of-range symbol index — is
/// a contract violation and panics rather than returning here; see the
/// module docs on `Writer`/`Reader` for why.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("bad magic: expected {expected:02x?}, got {found:02x?}")]
    BadMagic {
        expected: [u8; 8],
        found: [u8; 8],
    },

    #[error("artifact shorter than the fixed header ({header_size} bytes, got {len})")]
    Truncated { header_size: u32, len: usize },

    #[cfg(feature = "mmap")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
