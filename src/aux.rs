//! The 9-byte auxiliary-symbol record: a kind tag plus the symbol it
//! attaches metadata to (type descriptor, DWARF info, etc).

use byteorder::{ByteOrder, LittleEndian};

use crate::format::AUX_SIZE;
use crate::sym::SymRef;

/// A borrowed view over one 9-byte aux record. No setters are defined —
/// unlike relocations, aux records are never patched in place downstream.
#[derive(Debug, Clone, Copy)]
pub struct AuxView<'a> {
    bytes: &'a [u8],
}

impl<'a> AuxView<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len(), AUX_SIZE as usize);
        AuxView { bytes }
    }

    /// Raw kind byte. Unknown kinds are preserved rather than rejected; use
    /// [`AuxKind::from_u8`](crate::format::AuxKind::from_u8) to decode.
    pub fn kind(&self) -> u8 {
        self.bytes[0]
    }

    pub fn sym(&self) -> SymRef {
        SymRef::decode(&self.bytes[1..9])
    }
}

/// In-memory description of an aux record, as handed to
/// [`crate::builder::Builder`] before it is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxData {
    pub kind: u8,
    pub sym: SymRef,
}
