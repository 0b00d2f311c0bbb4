//! An in-memory accumulator that drives a [`Writer`] through the block-order
//! driver contract automatically, so callers don't have to hand-sequence the
//! "intern every string before the block that references it, then emit
//! blocks in the fixed order" protocol themselves. Purely a convenience: it
//! adds no on-disk semantics beyond what [`Writer`]'s primitives already
//! express, and a caller is always free to drive `Writer` directly instead.

use std::io::{Seek, Write};

use crate::aux::AuxData;
use crate::format::{BLOCK_ORDER, BlockKind, N_BLOCKS};
use crate::reloc::RelocData;
use crate::sym::{SymData, SymRef};
use crate::writer::Writer;

/// Opaque handle to a symbol definition accumulated in a [`Builder`], used to
/// attach relocations, aux records and data payloads to it before `finish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymHandle {
    Pkg(u32),
    NonPkg(u32),
}

struct SymEntry {
    data: SymData,
    relocs: Vec<RelocData>,
    aux: Vec<AuxData>,
    payload: Vec<u8>,
}

impl SymEntry {
    fn new(data: SymData) -> Self {
        SymEntry {
            data,
            relocs: Vec::new(),
            aux: Vec::new(),
            payload: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct Builder {
    flags: u32,
    autolib: Vec<String>,
    pkg_idx: Vec<String>,
    dwarf_file: Vec<String>,
    pkg_syms: Vec<SymEntry>,
    nonpkg_syms: Vec<SymEntry>,
    non_pkg_ref: Vec<SymData>,
    pcdata: Vec<u8>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_flags(&mut self, flags: u32) -> &mut Self {
        self.flags = flags;
        self
    }

    pub fn push_autolib(&mut self, name: impl Into<String>) -> &mut Self {
        self.autolib.push(name.into());
        self
    }

    pub fn push_dwarf_file(&mut self, name: impl Into<String>) -> &mut Self {
        self.dwarf_file.push(name.into());
        self
    }

    /// Registers a package name in the `PkgIdx` block and returns the
    /// 1-based index a [`SymRef`] uses to point at it.
    pub fn push_pkg(&mut self, name: impl Into<String>) -> u32 {
        self.pkg_idx.push(name.into());
        self.pkg_idx.len() as u32
    }

    pub fn define_pkg_sym(&mut self, sym: SymData) -> SymHandle {
        let idx = self.pkg_syms.len() as u32;
        self.pkg_syms.push(SymEntry::new(sym));
        SymHandle::Pkg(idx)
    }

    pub fn define_nonpkg_sym(&mut self, sym: SymData) -> SymHandle {
        let idx = self.nonpkg_syms.len() as u32;
        self.nonpkg_syms.push(SymEntry::new(sym));
        SymHandle::NonPkg(idx)
    }

    /// Registers a name-only non-package reference; returns its index within
    /// the combined `Self` symbol-index space (after all def symbols).
    pub fn add_nonpkg_ref(&mut self, sym: SymData) -> u32 {
        self.non_pkg_ref.push(sym);
        (self.pkg_syms.len() + self.nonpkg_syms.len() + self.non_pkg_ref.len() - 1) as u32
    }

    fn entry_mut(&mut self, handle: SymHandle) -> &mut SymEntry {
        match handle {
            SymHandle::Pkg(i) => &mut self.pkg_syms[i as usize],
            SymHandle::NonPkg(i) => &mut self.nonpkg_syms[i as usize],
        }
    }

    pub fn add_reloc(&mut self, handle: SymHandle, reloc: RelocData) -> &mut Self {
        self.entry_mut(handle).relocs.push(reloc);
        self
    }

    pub fn add_aux(&mut self, handle: SymHandle, aux: AuxData) -> &mut Self {
        self.entry_mut(handle).aux.push(aux);
        self
    }

    pub fn set_data(&mut self, handle: SymHandle, payload: Vec<u8>) -> &mut Self {
        self.entry_mut(handle).payload = payload;
        self
    }

    pub fn set_pcdata(&mut self, payload: Vec<u8>) -> &mut Self {
        self.pcdata = payload;
        self
    }

    /// `SymRef` naming `self` package, index `sym_idx` in the combined
    /// def/ref order this builder will emit.
    pub fn self_ref(sym_idx: u32) -> SymRef {
        SymRef {
            pkg_idx: crate::format::pkg_idx::SELF_PKG,
            sym_idx,
        }
    }

    /// Drains the accumulated state into `sink` in the exact block order the
    /// format requires, interning every string before the first block that
    /// can reference it, and returns the fully-stamped `Writer`.
    pub fn finish<W: Write + Seek>(self, sink: W) -> std::io::Result<Writer<W>> {
        let mut w = Writer::new(sink);
        w.reserve_header()?;

        for name in &self.autolib {
            w.add_string(name.as_bytes())?;
        }
        for name in &self.pkg_idx {
            w.add_string(name.as_bytes())?;
        }
        for name in &self.dwarf_file {
            w.add_string(name.as_bytes())?;
        }
        for e in self.pkg_syms.iter().chain(&self.nonpkg_syms) {
            w.add_string(e.data.name.as_bytes())?;
        }
        for s in &self.non_pkg_ref {
            w.add_string(s.name.as_bytes())?;
        }

        let mut offsets = [0u32; N_BLOCKS];
        for kind in BLOCK_ORDER {
            offsets[kind.index()] = w.offset();
            match kind {
                BlockKind::Autolib => {
                    for name in &self.autolib {
                        w.string_ref(name.as_bytes())?;
                    }
                }
                BlockKind::PkgIdx => {
                    for name in &self.pkg_idx {
                        w.string_ref(name.as_bytes())?;
                    }
                }
                BlockKind::DwarfFile => {
                    for name in &self.dwarf_file {
                        w.string_ref(name.as_bytes())?;
                    }
                }
                BlockKind::SymDef => {
                    for e in &self.pkg_syms {
                        write_sym(&mut w, &e.data)?;
                    }
                }
                BlockKind::NonPkgDef => {
                    for e in &self.nonpkg_syms {
                        write_sym(&mut w, &e.data)?;
                    }
                }
                BlockKind::NonPkgRef => {
                    for s in &self.non_pkg_ref {
                        write_sym(&mut w, s)?;
                    }
                }
                BlockKind::RelocIdx => {
                    let mut cum = 0u32;
                    w.u32(cum)?;
                    for e in self.pkg_syms.iter().chain(&self.nonpkg_syms) {
                        cum += e.relocs.len() as u32;
                        w.u32(cum)?;
                    }
                }
                BlockKind::AuxIdx => {
                    let mut cum = 0u32;
                    w.u32(cum)?;
                    for e in self.pkg_syms.iter().chain(&self.nonpkg_syms) {
                        cum += e.aux.len() as u32;
                        w.u32(cum)?;
                    }
                }
                BlockKind::DataIdx => {
                    let mut cum = 0u32;
                    w.u32(cum)?;
                    for e in self.pkg_syms.iter().chain(&self.nonpkg_syms) {
                        cum += e.payload.len() as u32;
                        w.u32(cum)?;
                    }
                }
                BlockKind::Reloc => {
                    for e in self.pkg_syms.iter().chain(&self.nonpkg_syms) {
                        for r in &e.relocs {
                            write_reloc(&mut w, r)?;
                        }
                    }
                }
                BlockKind::Aux => {
                    for e in self.pkg_syms.iter().chain(&self.nonpkg_syms) {
                        for a in &e.aux {
                            write_aux(&mut w, a)?;
                        }
                    }
                }
                BlockKind::Data => {
                    for e in self.pkg_syms.iter().chain(&self.nonpkg_syms) {
                        w.bytes(&e.payload)?;
                    }
                }
                BlockKind::Pcdata => {
                    w.bytes(&self.pcdata)?;
                }
            }
        }

        w.patch_header(self.flags, &offsets)?;
        Ok(w)
    }
}

fn write_sym<W: Write + Seek>(w: &mut Writer<W>, sym: &SymData) -> std::io::Result<()> {
    w.string_ref(sym.name.as_bytes())?;
    w.u16(sym.abi)?;
    w.u8(sym.sym_type)?;
    w.u8(sym.flag)?;
    w.u32(sym.siz)?;
    w.u32(sym.align)
}

fn write_reloc<W: Write + Seek>(w: &mut Writer<W>, r: &RelocData) -> std::io::Result<()> {
    w.i32(r.off)?;
    w.u8(r.siz)?;
    w.u8(r.reloc_type)?;
    w.i64(r.add)?;
    w.u32(r.sym.pkg_idx)?;
    w.u32(r.sym.sym_idx)
}

fn write_aux<W: Write + Seek>(w: &mut Writer<W>, a: &AuxData) -> std::io::Result<()> {
    w.u8(a.kind)?;
    w.u32(a.sym.pkg_idx)?;
    w.u32(a.sym.sym_idx)
}
