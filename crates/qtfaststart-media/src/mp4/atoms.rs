//! MP4 atom definitions.

use std::fmt;

/// Four-character atom type code.
///
/// Tags are raw bytes. Most are printable ASCII but filler atoms may carry an
/// all-zero tag, so nothing here assumes UTF-8.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtomType(pub [u8; 4]);

impl AtomType {
    pub const FTYP: Self = Self(*b"ftyp");
    pub const MOOV: Self = Self(*b"moov");
    pub const MDAT: Self = Self(*b"mdat");
    pub const CMOV: Self = Self(*b"cmov");
    pub const TRAK: Self = Self(*b"trak");
    pub const MDIA: Self = Self(*b"mdia");
    pub const MINF: Self = Self(*b"minf");
    pub const STBL: Self = Self(*b"stbl");
    pub const STCO: Self = Self(*b"stco");
    pub const CO64: Self = Self(*b"co64");
    pub const FREE: Self = Self(*b"free");
    pub const JUNK: Self = Self(*b"junk");
    pub const PICT: Self = Self(*b"pict");
    pub const PNOT: Self = Self(*b"pnot");
    pub const SKIP: Self = Self(*b"skip");
    pub const UUID: Self = Self(*b"uuid");
    pub const WIDE: Self = Self(*b"wide");
    pub const ZERO: Self = Self([0; 4]);

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Whether every byte of the tag is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Get the 4-char code as a string, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{}", std::ascii::escape_default(b))?;
        }
        Ok(())
    }
}

impl fmt::Debug for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

impl From<&[u8; 4]> for AtomType {
    fn from(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }
}

/// Parsed atom header, positioned within the buffer it was read from.
///
/// `Atom::default()` doubles as the "not found" value for the mandatory
/// top-level atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Atom {
    /// Atom type code.
    pub atom_type: AtomType,
    /// Absolute offset of the header start.
    pub offset: u64,
    /// Atom size including header.
    pub size: u64,
    /// Size of the header (8 or 16 bytes).
    pub header_size: u8,
}

impl Atom {
    /// Offset one past the last byte of the atom.
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// Offset of the first byte after the header.
    pub fn header_end(&self) -> u64 {
        self.offset + self.header_size as u64
    }

    /// Get the data size (size - header).
    pub fn data_size(&self) -> u64 {
        self.size.saturating_sub(self.header_size as u64)
    }

    /// Whether this is the zero value, i.e. no atom was recorded.
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the header used the 64-bit extended size form.
    pub fn has_extended_size(&self) -> bool {
        self.header_size == 16
    }

    /// Filler atoms carry nothing and may be dropped during conversion.
    pub fn is_filler(&self) -> bool {
        self.atom_type == AtomType::FREE || self.atom_type.is_zero()
    }

    /// Check if this atom may contain chunk-offset tables.
    pub fn is_sample_table_path(&self) -> bool {
        matches!(
            self.atom_type,
            AtomType::TRAK | AtomType::MDIA | AtomType::MINF | AtomType::STBL
        )
    }

    /// Check if this atom is a chunk-offset table.
    pub fn is_chunk_offset_table(&self) -> bool {
        matches!(self.atom_type, AtomType::STCO | AtomType::CO64)
    }
}
