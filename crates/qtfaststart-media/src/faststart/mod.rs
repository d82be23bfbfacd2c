//! Fast-start conversion.
//!
//! [`QtFile`] loads a whole movie, checks it, and rewrites it so `moov`
//! comes right after `ftyp`:
//!
//! 1. Scan the top-level atoms and pick out `ftyp`, `mdat` and `moov`
//! 2. Validate that all three exist and `moov` is not compressed
//! 3. Compute the shift applied to chunk offsets
//! 4. Patch every `stco`/`co64` in a copy of `moov`
//! 5. Concatenate `ftyp`, patched `moov`, and the remaining atoms

mod patch;
#[cfg(test)]
mod test_fixtures;
mod validate;
mod writer;

pub use patch::{find_chunk_offset_tables, patch_chunk_offsets, read_chunk_offsets};

use crate::mp4::{Atom, AtomIter, AtomType};
use crate::{Error, Result};
use std::io::{Read, Write};

/// Options controlling how strictly a file is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail when `ftyp`, `mdat` or `moov` appears more than once at the top
    /// level. Off by default, in which case the last occurrence is used.
    pub reject_duplicate_atoms: bool,
    /// Accept top-level atoms with an all-zero tag as filler. Off by default,
    /// in which case they are unknown atoms.
    pub allow_zero_tag_filler: bool,
}

impl ParseOptions {
    /// Reject duplicate mandatory atoms.
    pub fn strict() -> Self {
        Self {
            reject_duplicate_atoms: true,
            ..Self::default()
        }
    }

    /// Accept all-zero tags as top-level filler.
    pub fn allow_zero_tag_filler(mut self, allow: bool) -> Self {
        self.allow_zero_tag_filler = allow;
        self
    }
}

/// How removed filler in front of `mdat` enters the chunk-offset shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillerShift {
    /// Add the filler size to the shift, as qt-faststart tools traditionally
    /// do.
    #[default]
    Additive,
    /// Subtract the filler size, so offsets follow `mdat` to its new position.
    Net,
}

/// Options for [`QtFile::convert_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Leave top-level filler atoms out of the output.
    pub remove_filler: bool,
    /// Sign of the filler term in the shift.
    pub filler_shift: FillerShift,
}

impl ConvertOptions {
    pub fn new(remove_filler: bool) -> Self {
        Self {
            remove_filler,
            ..Self::default()
        }
    }

    /// Set how removed filler affects the shift.
    pub fn filler_shift(mut self, filler_shift: FillerShift) -> Self {
        self.filler_shift = filler_shift;
        self
    }
}

/// What a conversion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Amount added to every chunk offset.
    pub shift: i64,
    /// Number of `stco`/`co64` tables rewritten.
    pub chunk_offset_tables: usize,
    /// Bytes of filler atoms left out of the output.
    pub filler_removed: u64,
    /// Size of the file before conversion.
    pub input_size: u64,
    /// Size of the file after conversion.
    pub output_size: u64,
}

/// Top-level layout of a movie buffer.
#[derive(Debug, Clone, Default)]
struct TopLevel {
    atoms: Vec<Atom>,
    ftyp: Atom,
    mdat: Atom,
    moov: Atom,
}

impl TopLevel {
    fn scan(buf: &[u8], options: ParseOptions) -> Result<Self> {
        let mut top = Self::default();

        for atom in AtomIter::top_level(buf) {
            let atom = atom?;
            top.atoms.push(atom);

            let slot = match atom.atom_type {
                AtomType::FTYP => &mut top.ftyp,
                AtomType::MDAT => &mut top.mdat,
                AtomType::MOOV => &mut top.moov,
                AtomType::FREE
                | AtomType::JUNK
                | AtomType::PICT
                | AtomType::PNOT
                | AtomType::SKIP
                | AtomType::UUID
                | AtomType::WIDE => continue,
                AtomType::ZERO if options.allow_zero_tag_filler => continue,
                atom_type => {
                    return Err(Error::UnknownTopLevelAtom {
                        atom_type,
                        offset: atom.offset,
                    })
                }
            };

            if options.reject_duplicate_atoms && !slot.is_unset() {
                return Err(Error::DuplicateAtom {
                    atom_type: atom.atom_type,
                    offset: atom.offset,
                });
            }
            *slot = atom;
        }

        Ok(top)
    }
}

/// A QuickTime movie held entirely in memory.
///
/// The buffer is the only source of truth: every [`Atom`] exposed here is a
/// position inside [`QtFile::bytes`]. Conversion replaces the buffer as a
/// whole and re-indexes it.
#[derive(Debug, Clone)]
pub struct QtFile {
    bytes: Vec<u8>,
    top: TopLevel,
    options: ParseOptions,
}

impl QtFile {
    /// Parse and validate a movie with default options.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        Self::with_options(bytes, ParseOptions::default())
    }

    /// Parse and validate a movie.
    pub fn with_options(bytes: Vec<u8>, options: ParseOptions) -> Result<Self> {
        let top = TopLevel::scan(&bytes, options)?;
        validate::validate(&bytes, &top.ftyp, &top.mdat, &top.moov)?;
        Ok(Self {
            bytes,
            top,
            options,
        })
    }

    /// Read a whole stream into memory and parse it.
    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::new(bytes)
    }

    /// Whether `moov` already precedes `mdat`.
    pub fn is_fast_start_enabled(&self) -> bool {
        self.top.moov.offset < self.top.mdat.offset
    }

    /// Amount every chunk offset moves when converting with the default
    /// [`FillerShift::Additive`] rule.
    ///
    /// With `remove_filler`, the size of every filler atom in front of `mdat`
    /// is added. Moving `moov` from behind `mdat` to the front adds `moov`'s
    /// size.
    pub fn shift_amount(&self, remove_filler: bool) -> i64 {
        self.shift_amount_with(ConvertOptions::new(remove_filler))
    }

    /// Amount every chunk offset moves when converting with `options`.
    pub fn shift_amount_with(&self, options: ConvertOptions) -> i64 {
        let TopLevel {
            atoms, mdat, moov, ..
        } = &self.top;

        let mut shift = 0i64;
        if options.remove_filler {
            let filler = atoms
                .iter()
                .filter(|a| a.is_filler() && a.offset < mdat.offset)
                .map(|a| a.size as i64)
                .sum::<i64>();
            match options.filler_shift {
                FillerShift::Additive => shift += filler,
                FillerShift::Net => shift -= filler,
            }
        }
        if moov.offset > mdat.offset {
            shift += moov.size as i64;
        }
        shift
    }

    /// Rearrange the file so `moov` sits directly after `ftyp`.
    ///
    /// With `remove_filler`, top-level filler atoms are left out. On error the
    /// file is unchanged.
    pub fn convert(&mut self, remove_filler: bool) -> Result<ConvertSummary> {
        self.convert_with(ConvertOptions::new(remove_filler))
    }

    /// Like [`QtFile::convert`], with full control over the shift rule.
    pub fn convert_with(&mut self, options: ConvertOptions) -> Result<ConvertSummary> {
        let shift = self.shift_amount_with(options);
        let moov = self.top.moov;

        let tables = find_chunk_offset_tables(&self.bytes, &moov)?;
        let patched = patch_chunk_offsets(&self.bytes, &moov, &tables, shift)?;
        let out = writer::reassemble(
            &self.bytes,
            &self.top.atoms,
            &self.top.ftyp,
            &patched,
            options.remove_filler,
        );

        let top = TopLevel::scan(&out.data, self.options)?;
        let summary = ConvertSummary {
            shift,
            chunk_offset_tables: tables.len(),
            filler_removed: out.filler_removed,
            input_size: self.bytes.len() as u64,
            output_size: out.data.len() as u64,
        };

        self.bytes = out.data;
        self.top = top;
        Ok(summary)
    }

    /// Every chunk offset in `moov`, in table order.
    pub fn chunk_offsets(&self) -> Result<Vec<u64>> {
        let mut offsets = Vec::new();
        for table in find_chunk_offset_tables(&self.bytes, &self.top.moov)? {
            offsets.extend(read_chunk_offsets(&self.bytes, &table)?);
        }
        Ok(offsets)
    }

    /// The current buffer, converted if [`QtFile::convert`] succeeded.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the current buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the current buffer to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.bytes)?;
        Ok(())
    }

    /// Top-level atoms in file order.
    pub fn atoms(&self) -> &[Atom] {
        &self.top.atoms
    }

    pub fn ftyp(&self) -> &Atom {
        &self.top.ftyp
    }

    pub fn mdat(&self) -> &Atom {
        &self.top.mdat
    }

    pub fn moov(&self) -> &Atom {
        &self.top.moov
    }
}

impl AsRef<[u8]> for QtFile {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
