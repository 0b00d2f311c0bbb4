//! The 20-byte symbol record and the flag bits packed into it.

use byteorder::{ByteOrder, LittleEndian};

use crate::format::{SYM_SIZE, sym_flag};
use crate::reader::Reader;

/// A `{PkgIdx, SymIdx}` pair identifying a symbol within or across packages.
/// `{0, 0}` is the nil symbol reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymRef {
    pub pkg_idx: u32,
    pub sym_idx: u32,
}

impl SymRef {
    pub const NIL: SymRef = SymRef {
        pkg_idx: 0,
        sym_idx: 0,
    };

    pub(crate) fn decode(b: &[u8]) -> Self {
        debug_assert!(b.len() >= 8);
        SymRef {
            pkg_idx: LittleEndian::read_u32(&b[0..4]),
            sym_idx: LittleEndian::read_u32(&b[4..8]),
        }
    }

    pub(crate) fn encode(self, out: &mut [u8]) {
        debug_assert!(out.len() >= 8);
        LittleEndian::write_u32(&mut out[0..4], self.pkg_idx);
        LittleEndian::write_u32(&mut out[4..8], self.sym_idx);
    }
}

/// A borrowed view over one 20-byte symbol record. Decoding is per-field on
/// access, not eager: constructing a `SymView` is just a bounds-checked
/// slice, no copy and no up-front parsing.
#[derive(Debug, Clone, Copy)]
pub struct SymView<'a> {
    bytes: &'a [u8],
}

impl<'a> SymView<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len(), SYM_SIZE as usize);
        SymView { bytes }
    }

    /// The symbol's name, resolved through the string pool of the `Reader`
    /// this view was obtained from.
    pub fn name(&self, reader: &Reader) -> std::borrow::Cow<'a, str> {
        let len = LittleEndian::read_u32(&self.bytes[0..4]);
        let off = LittleEndian::read_u32(&self.bytes[4..8]);
        reader.string_ref_at(len, off)
    }

    pub fn name_ref(&self) -> (u32, u32) {
        (
            LittleEndian::read_u32(&self.bytes[0..4]),
            LittleEndian::read_u32(&self.bytes[4..8]),
        )
    }

    /// `0xFFFF` means this symbol is file-static.
    pub fn abi(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[8..10])
    }

    pub fn sym_type(&self) -> u8 {
        self.bytes[10]
    }

    pub fn flag(&self) -> u8 {
        self.bytes[11]
    }

    pub fn siz(&self) -> u32 {
        LittleEndian::read_u32(&self.bytes[12..16])
    }

    pub fn align(&self) -> u32 {
        LittleEndian::read_u32(&self.bytes[16..20])
    }

    pub fn dupok(&self) -> bool {
        self.flag() & sym_flag::DUPOK != 0
    }

    pub fn local(&self) -> bool {
        self.flag() & sym_flag::LOCAL != 0
    }

    pub fn typelink(&self) -> bool {
        self.flag() & sym_flag::TYPELINK != 0
    }

    pub fn leaf(&self) -> bool {
        self.flag() & sym_flag::LEAF != 0
    }

    pub fn nosplit(&self) -> bool {
        self.flag() & sym_flag::NOSPLIT != 0
    }

    pub fn reflect_method(&self) -> bool {
        self.flag() & sym_flag::REFLECT_METHOD != 0
    }

    pub fn is_gotype(&self) -> bool {
        self.flag() & sym_flag::GO_TYPE != 0
    }

    pub fn top_frame(&self) -> bool {
        self.flag() & sym_flag::TOP_FRAME != 0
    }
}

/// In-memory description of a symbol, as handed to [`crate::builder::Builder`]
/// before it is encoded. Mirrors the on-disk record field for field.
#[derive(Debug, Clone, Default)]
pub struct SymData {
    pub name: String,
    pub abi: u16,
    pub sym_type: u8,
    pub flag: u8,
    pub siz: u32,
    pub align: u32,
}
