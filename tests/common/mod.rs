//! Shared synthetic movie builders for integration tests.
//!
//! [`Movie`] lays out a minimal QuickTime file whose chunk offsets point at
//! known bytes inside `mdat`, so tests can check that every offset still
//! addresses the same media after conversion.

#![allow(dead_code)]

use bytes::{BufMut, BytesMut};
use qtfaststart_media::faststart::{find_chunk_offset_tables, read_chunk_offsets};
use qtfaststart_media::mp4::AtomIter;
use qtfaststart_media::AtomType;

pub fn atom(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(8 + payload.len());
    buf.put_u32(8 + payload.len() as u32);
    buf.put_slice(tag);
    buf.put_slice(payload);
    buf.to_vec()
}

fn table(tag: &[u8; 4], entries: &[u64], width: usize) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u32(0);
    buf.put_u32(entries.len() as u32);
    for entry in entries {
        if width == 4 {
            buf.put_u32(*entry as u32);
        } else {
            buf.put_u64(*entry);
        }
    }
    atom(tag, &buf)
}

/// Chunk-offset table encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Stco,
    Co64,
}

/// Where `moov` goes relative to `mdat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    MoovLast,
    MoovFirst,
}

/// Builder for a single-track movie.
pub struct Movie {
    layout: Layout,
    table: Table,
    filler_before_mdat: usize,
    chunks: usize,
    chunk_size: usize,
}

impl Movie {
    pub fn new() -> Self {
        Self {
            layout: Layout::MoovLast,
            table: Table::Stco,
            filler_before_mdat: 0,
            chunks: 4,
            chunk_size: 32,
        }
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn table(mut self, table: Table) -> Self {
        self.table = table;
        self
    }

    /// Insert a `free` atom of `size` bytes (header included) before `mdat`.
    pub fn filler(mut self, size: usize) -> Self {
        self.filler_before_mdat = size;
        self
    }

    pub fn chunks(mut self, count: usize, size: usize) -> Self {
        self.chunks = count;
        self.chunk_size = size;
        self
    }

    fn ftyp() -> Vec<u8> {
        atom(b"ftyp", b"qt  \0\0\x02\0qt  ")
    }

    fn free(&self) -> Vec<u8> {
        if self.filler_before_mdat == 0 {
            Vec::new()
        } else {
            atom(b"free", &vec![0; self.filler_before_mdat - 8])
        }
    }

    fn mdat(&self) -> Vec<u8> {
        let payload: Vec<u8> = (0..self.chunks * self.chunk_size)
            .map(|i| (i % 251) as u8)
            .collect();
        atom(b"mdat", &payload)
    }

    fn moov(&self, mdat_data: u64) -> Vec<u8> {
        let offsets: Vec<u64> = (0..self.chunks)
            .map(|i| mdat_data + (i * self.chunk_size) as u64)
            .collect();
        let offsets = match self.table {
            Table::Stco => table(b"stco", &offsets, 4),
            Table::Co64 => table(b"co64", &offsets, 8),
        };
        let stbl = atom(b"stbl", &[atom(b"stsz", &[0; 12]), offsets].concat());
        let minf = atom(b"minf", &stbl);
        let mdia = atom(b"mdia", &[atom(b"hdlr", &[0; 24]), minf].concat());
        let trak = atom(b"trak", &[atom(b"tkhd", &[0; 84]), mdia].concat());
        atom(b"moov", &[atom(b"mvhd", &[0; 100]), trak].concat())
    }

    /// Serialize the movie.
    pub fn build(&self) -> Vec<u8> {
        let ftyp = Self::ftyp();
        let free = self.free();
        let mdat = self.mdat();

        match self.layout {
            Layout::MoovLast => {
                let mdat_data = (ftyp.len() + free.len() + 8) as u64;
                let moov = self.moov(mdat_data);
                [ftyp, free, mdat, moov].concat()
            }
            Layout::MoovFirst => {
                // moov's size does not depend on the offsets it holds.
                let moov_len = self.moov(0).len();
                let mdat_data = (ftyp.len() + moov_len + free.len() + 8) as u64;
                let moov = self.moov(mdat_data);
                [ftyp, moov, free, mdat].concat()
            }
        }
    }
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

/// Top-level tags in file order.
pub fn top_level_tags(file: &[u8]) -> Vec<[u8; 4]> {
    AtomIter::top_level(file)
        .map(|atom| atom.unwrap().atom_type.0)
        .collect()
}
