//! A binary object-file codec: reader/writer pair for a compiler's
//! linker-input artifact.
//!
//! An artifact is `Header ‖ StringPool ‖ Block₀ … Block₁₂`: a fixed 64-byte
//! header naming a dense offset table, a string pool, and thirteen
//! fixed-order blocks carrying symbol definitions, relocations, aux records
//! and raw data. [`writer::Writer`] (optionally driven by
//! [`builder::Builder`]) serializes one of these in a single forward pass;
//! [`reader::Reader`] answers any "symbol i's j-th relocation" query in O(1)
//! by pure arithmetic over the header's offsets and the three index blocks,
//! without copying out of the backing byte slice.
//!
//! The format's own shape — block kinds, record strides, flag bits — lives
//! in [`format`] as the single source of truth both sides refer to.

pub mod aux;
pub mod builder;
pub mod error;
pub mod format;
pub mod reader;
pub mod reloc;
pub mod sym;
pub mod writer;

#[cfg(feature = "mmap")]
pub mod mmap;

pub use aux::{AuxData, AuxView};
pub use builder::{Builder, SymHandle};
pub use error::{ObjError, Result};
pub use reader::{Header, Reader};
pub use reloc::{RelocData, RelocView, RelocViewMut};
pub use sym::{SymData, SymRef, SymView};
pub use writer::Writer;

#[cfg(feature = "mmap")]
pub use mmap::MappedObject;

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::format::{AuxKind, pkg_idx, sym_flag};

    fn sym(name: &str, abi: u16, sym_type: u8, flag: u8, siz: u32, align: u32) -> SymData {
        SymData {
            name: name.to_string(),
            abi,
            sym_type,
            flag,
            siz,
            align,
        }
    }

    #[test]
    fn empty_artifact_matches_fixed_layout() {
        let mut out = Cursor::new(Vec::new());
        Builder::new().finish(&mut out).unwrap();
        let bytes = out.into_inner();

        assert_eq!(&bytes[0..8], &format::MAGIC);
        assert_eq!(&bytes[8..12], &0u32.to_le_bytes());
        // RelocIdx/AuxIdx/DataIdx each still carry their mandatory
        // `N_defined + 1 = 1` cumulative-count entry, so the empty artifact
        // is not header-only: those three entries push it to 76 bytes.
        assert_eq!(bytes.len(), 76);
        let expected_offsets: [u32; format::N_BLOCKS] =
            [64, 64, 64, 64, 64, 64, 64, 68, 72, 76, 76, 76, 76];
        for k in 0..format::N_BLOCKS {
            let off = u32::from_le_bytes(bytes[12 + 4 * k..16 + 4 * k].try_into().unwrap());
            assert_eq!(off, expected_offsets[k], "block {k} offset mismatch");
        }

        let r = Reader::new(&bytes).unwrap();
        assert_eq!(r.n_sym(), 0);
        assert_eq!(r.n_nonpkgdef(), 0);
        assert_eq!(r.n_nonpkgref(), 0);
        assert_eq!(r.n_pkg(), 0);
    }

    #[test]
    fn single_symbol_no_relocations() {
        let mut b = Builder::new();
        let h = b.define_pkg_sym(sym("foo", 0, 1, sym_flag::DUPOK, 4, 4));
        b.set_data(h, vec![0x01, 0x02, 0x03, 0x04]);

        let mut out = Cursor::new(Vec::new());
        b.finish(&mut out).unwrap();
        let bytes = out.into_inner();

        let r = Reader::new(&bytes).unwrap();
        assert_eq!(r.n_sym(), 1);
        assert_eq!(r.sym(0).name(&r), "foo");
        assert!(r.sym(0).dupok());
        assert_eq!(r.data(0), &[1, 2, 3, 4]);
        assert_eq!(r.n_reloc(0), 0);
    }

    #[test]
    fn single_relocation() {
        let mut b = Builder::new();
        let h = b.define_pkg_sym(sym("foo", 0, 1, sym_flag::DUPOK, 4, 4));
        b.set_data(h, vec![0x01, 0x02, 0x03, 0x04]);
        b.add_reloc(
            h,
            RelocData {
                off: 0,
                siz: 4,
                reloc_type: 7,
                add: -42,
                sym: Builder::self_ref(0),
            },
        );

        let mut out = Cursor::new(Vec::new());
        b.finish(&mut out).unwrap();
        let bytes = out.into_inner();

        let r = Reader::new(&bytes).unwrap();
        assert_eq!(r.n_reloc(0), 1);
        let rv = r.reloc(0, 0);
        assert_eq!(rv.add(), -42);
        assert_eq!(rv.sym().pkg_idx, pkg_idx::SELF_PKG);
        assert_eq!(rv.sym().sym_idx, 0);
    }

    #[test]
    fn two_symbols_asymmetric_counts() {
        let mut b = Builder::new();
        let s0 = b.define_pkg_sym(sym("a", 0, 1, 0, 0, 1));
        let s1 = b.define_pkg_sym(sym("b", 0, 1, 0, 0, 1));

        for off in 0..3 {
            b.add_reloc(
                s0,
                RelocData {
                    off,
                    siz: 1,
                    reloc_type: 0,
                    add: 0,
                    sym: Builder::self_ref(1),
                },
            );
        }
        b.add_aux(
            s0,
            AuxData {
                kind: AuxKind::Gotype as u8,
                sym: Builder::self_ref(1),
            },
        );
        for _ in 0..2 {
            b.add_aux(
                s1,
                AuxData {
                    kind: AuxKind::FuncInfo as u8,
                    sym: Builder::self_ref(0),
                },
            );
        }

        let mut out = Cursor::new(Vec::new());
        b.finish(&mut out).unwrap();
        let bytes = out.into_inner();
        let r = Reader::new(&bytes).unwrap();

        assert_eq!(r.relocs(1).len(), 0);
        assert_eq!(r.auxs(1).len(), 2);
        assert_eq!(r.relocs(0).count(), 3);
        assert_eq!(r.auxs(0).count(), 1);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut out = Cursor::new(Vec::new());
        Builder::new().finish(&mut out).unwrap();
        let mut bytes = out.into_inner();
        bytes[0] = 0x01;

        assert!(matches!(
            Reader::new(&bytes),
            Err(ObjError::BadMagic { .. })
        ));
    }

    #[test]
    fn static_abi_round_trips() {
        let mut b = Builder::new();
        b.define_pkg_sym(sym("x", format::SYM_ABI_STATIC, 0, 0, 0, 1));

        let mut out = Cursor::new(Vec::new());
        b.finish(&mut out).unwrap();
        let bytes = out.into_inner();

        let r = Reader::new(&bytes).unwrap();
        assert_eq!(r.sym(0).abi(), format::SYM_ABI_STATIC);
    }

    #[test]
    fn reloc_mut_patches_addend_in_place() {
        let mut b = Builder::new();
        let h = b.define_pkg_sym(sym("foo", 0, 1, 0, 0, 1));
        b.add_reloc(
            h,
            RelocData {
                off: 0,
                siz: 4,
                reloc_type: 7,
                add: -42,
                sym: Builder::self_ref(0),
            },
        );

        let mut out = Cursor::new(Vec::new());
        b.finish(&mut out).unwrap();
        let mut bytes = out.into_inner();

        {
            let mut r = Reader::new_mut(&mut bytes).unwrap();
            assert_eq!(r.reloc(0, 0).add(), -42);
            let mut rv = r.reloc_mut(0, 0);
            assert_eq!(rv.add(), -42);
            rv.set_add(100);
            rv.set_off(4);
        }

        let r = Reader::new(&bytes).unwrap();
        let rv = r.reloc(0, 0);
        assert_eq!(rv.add(), 100);
        assert_eq!(rv.off(), 4);
        // Untouched fields survive the in-place patch.
        assert_eq!(rv.siz(), 4);
        assert_eq!(rv.reloc_type(), 7);
    }

    #[test]
    #[should_panic(expected = "reloc_mut: reader was constructed read-only")]
    fn reloc_mut_panics_on_readonly_reader() {
        let mut b = Builder::new();
        let h = b.define_pkg_sym(sym("foo", 0, 1, 0, 0, 1));
        b.add_reloc(
            h,
            RelocData {
                off: 0,
                siz: 4,
                reloc_type: 0,
                add: 0,
                sym: Builder::self_ref(0),
            },
        );
        let mut out = Cursor::new(Vec::new());
        b.finish(&mut out).unwrap();
        let bytes = out.into_inner();

        let mut r = Reader::new(&bytes).unwrap();
        let _ = r.reloc_mut(0, 0);
    }
}
