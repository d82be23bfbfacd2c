//! Output reassembly.

use crate::mp4::{Atom, AtomType};
use bytes::{BufMut, BytesMut};

/// Assembled output buffer plus the number of filler bytes left out.
pub(crate) struct Reassembled {
    pub data: Vec<u8>,
    pub filler_removed: u64,
}

/// Build the fast-start layout: `ftyp`, the patched `moov`, then every other
/// top-level atom in its original order.
///
/// All `ftyp` and `moov` atoms in `atoms` are skipped in the tail, so
/// duplicates collapse into the distinguished pair. With `remove_filler`,
/// `free` and zero-tagged atoms are dropped wherever they sit.
pub(crate) fn reassemble(
    buf: &[u8],
    atoms: &[Atom],
    ftyp: &Atom,
    patched_moov: &[u8],
    remove_filler: bool,
) -> Reassembled {
    let mut out = BytesMut::with_capacity(buf.len());
    let mut filler_removed = 0;

    out.put_slice(slice(buf, ftyp));
    out.put_slice(patched_moov);

    for atom in atoms {
        if atom.atom_type == AtomType::FTYP || atom.atom_type == AtomType::MOOV {
            continue;
        }
        if remove_filler && atom.is_filler() {
            filler_removed += atom.size;
            continue;
        }
        out.put_slice(slice(buf, atom));
    }

    Reassembled {
        data: out.to_vec(),
        filler_removed,
    }
}

fn slice<'a>(buf: &'a [u8], atom: &Atom) -> &'a [u8] {
    &buf[atom.offset as usize..atom.end() as usize]
}
