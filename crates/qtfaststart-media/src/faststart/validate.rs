//! Structural checks run once after the top-level scan.

use crate::mp4::{Atom, AtomIter, AtomType};
use crate::{Error, Result};

/// Check the mandatory atoms and reject compressed movies.
///
/// Missing atoms are reported in the order `ftyp`, `mdat`, `moov`.
pub(crate) fn validate(buf: &[u8], ftyp: &Atom, mdat: &Atom, moov: &Atom) -> Result<()> {
    if ftyp.is_unset() {
        return Err(Error::MissingAtom("ftyp"));
    }
    if mdat.is_unset() {
        return Err(Error::MissingAtom("mdat"));
    }
    if moov.is_unset() {
        return Err(Error::MissingAtom("moov"));
    }
    if contains_compressed_moov(buf, moov)? {
        return Err(Error::CompressedMoov);
    }
    Ok(())
}

/// Look for `cmov` among the direct children of `moov`.
///
/// Only one level is inspected; `cmov` lives under `moov` directly.
fn contains_compressed_moov(buf: &[u8], moov: &Atom) -> Result<bool> {
    for child in AtomIter::children(buf, moov) {
        if child?.atom_type == AtomType::CMOV {
            return Ok(true);
        }
    }
    Ok(false)
}
