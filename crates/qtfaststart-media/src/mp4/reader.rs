//! Bounded atom header decoding.
//!
//! Every traversal (top level, the `cmov` scan, the chunk-offset search) goes
//! through [`read_atom`], which never reads outside `[offset, end)`.

use super::{Atom, AtomType};
use crate::{Error, Result};
use bytes::Buf;

/// Size of a standard atom header (32-bit size + tag).
pub const HEADER_SIZE: u8 = 8;

/// Size of a header using the 64-bit extended size.
pub const EXTENDED_HEADER_SIZE: u8 = 16;

/// Size field value announcing an extended 64-bit size.
const EXTENDED_SIZE_MARKER: u32 = 1;

/// Borrow `len` bytes at `offset`, failing if they extend past `end`.
fn bounded(buf: &[u8], offset: u64, len: u64, end: u64) -> Result<&[u8]> {
    let available = end.saturating_sub(offset);
    if len > available {
        return Err(Error::truncated(offset, len, available));
    }
    let start = offset as usize;
    Ok(&buf[start..start + len as usize])
}

/// Decode the atom whose header starts at `offset`.
///
/// `end` is the exclusive limit of the enclosing range: the buffer length for
/// top-level atoms, the parent's end for nested ones. Both the header and the
/// declared body must fit inside it.
pub fn read_atom(buf: &[u8], offset: u64, end: u64) -> Result<Atom> {
    let end = end.min(buf.len() as u64);

    let mut header = bounded(buf, offset, HEADER_SIZE as u64, end)?;
    let size = header.get_u32();
    let mut tag = [0u8; 4];
    header.copy_to_slice(&mut tag);
    let atom_type = AtomType(tag);

    let (size, header_size) = if size == EXTENDED_SIZE_MARKER {
        let mut ext = &bounded(buf, offset, EXTENDED_HEADER_SIZE as u64, end)?[8..];
        (ext.get_u64(), EXTENDED_HEADER_SIZE)
    } else {
        (size as u64, HEADER_SIZE)
    };

    if size < header_size as u64 {
        return Err(Error::AtomTooSmall {
            atom_type,
            offset,
            size,
            header_size,
        });
    }

    let available = end - offset;
    if size > available {
        return Err(Error::truncated(offset, size, available));
    }

    Ok(Atom {
        atom_type,
        offset,
        size,
        header_size,
    })
}

/// Iterator over sibling atoms in `[start, end)`.
///
/// Yields each atom in physical order. After the first error it yields that
/// error once and then stops.
#[derive(Debug, Clone)]
pub struct AtomIter<'a> {
    buf: &'a [u8],
    pos: u64,
    end: u64,
    failed: bool,
}

impl<'a> AtomIter<'a> {
    /// Iterate the atoms between `start` and `end`.
    pub fn new(buf: &'a [u8], start: u64, end: u64) -> Self {
        Self {
            buf,
            pos: start,
            end: end.min(buf.len() as u64),
            failed: false,
        }
    }

    /// Iterate the top-level atoms of a whole file.
    pub fn top_level(buf: &'a [u8]) -> Self {
        Self::new(buf, 0, buf.len() as u64)
    }

    /// Iterate the direct children of `parent`.
    pub fn children(buf: &'a [u8], parent: &Atom) -> Self {
        Self::new(buf, parent.header_end(), parent.end())
    }
}

impl Iterator for AtomIter<'_> {
    type Item = Result<Atom>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.end {
            return None;
        }
        match read_atom(self.buf, self.pos, self.end) {
            Ok(atom) => {
                self.pos = atom.end();
                Some(Ok(atom))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for AtomIter<'_> {}
