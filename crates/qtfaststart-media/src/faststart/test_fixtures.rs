use super::{find_chunk_offset_tables, read_chunk_offsets};
use crate::mp4::{AtomIter, AtomType};
use bytes::{BufMut, BytesMut};

pub fn atom(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(8 + payload.len());
    buf.put_u32(8 + payload.len() as u32);
    buf.put_slice(tag);
    buf.put_slice(payload);
    buf.to_vec()
}

pub fn extended_atom(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(16 + payload.len());
    buf.put_u32(1);
    buf.put_slice(tag);
    buf.put_u64(16 + payload.len() as u64);
    buf.put_slice(payload);
    buf.to_vec()
}

pub fn ftyp() -> Vec<u8> {
    atom(b"ftyp", b"qt  \0\0\x02\0qt  ")
}

pub fn stco(entries: &[u32]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u32(0); // version/flags
    buf.put_u32(entries.len() as u32);
    for entry in entries {
        buf.put_u32(*entry);
    }
    atom(b"stco", &buf)
}

pub fn co64(entries: &[u64]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u32(0);
    buf.put_u32(entries.len() as u32);
    for entry in entries {
        buf.put_u64(*entry);
    }
    atom(b"co64", &buf)
}

/// `trak/mdia/minf/stbl` wrapping the given sample-table children.
pub fn trak(stbl_children: &[Vec<u8>]) -> Vec<u8> {
    let stbl = atom(b"stbl", &stbl_children.concat());
    let minf = atom(b"minf", &stbl);
    let mdia = atom(b"mdia", &[atom(b"mdhd", &[0; 24]), minf].concat());
    atom(b"trak", &[atom(b"tkhd", &[0; 84]), mdia].concat())
}

pub fn moov(children: &[Vec<u8>]) -> Vec<u8> {
    atom(b"moov", &[vec![atom(b"mvhd", &[0; 100])], children.to_vec()].concat().concat())
}

/// Read the entries of every `stco`/`co64` table of every top-level `moov`,
/// in file order.
pub fn chunk_offsets(file: &[u8]) -> Vec<u64> {
    let mut offsets = Vec::new();
    for top in AtomIter::top_level(file) {
        let top = top.unwrap();
        if top.atom_type != AtomType::MOOV {
            continue;
        }
        for table in find_chunk_offset_tables(file, &top).unwrap() {
            offsets.extend(read_chunk_offsets(file, &table).unwrap());
        }
    }
    offsets
}
