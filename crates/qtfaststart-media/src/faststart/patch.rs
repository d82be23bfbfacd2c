//! Chunk-offset table discovery and patching.
//!
//! `stco` and `co64` hold absolute file offsets of every media chunk. Moving
//! atoms around the file moves the chunks, so each entry has to be shifted by
//! the same amount. Table sizes never change, which keeps `moov`'s own size
//! (and therefore the shift) fixed.

use crate::mp4::{Atom, AtomIter, AtomType};
use crate::{Error, Result};
use bytes::{Buf, BufMut};

/// Version/flags plus entry count, following the atom header.
const TABLE_PREAMBLE: usize = 8;

/// Find every `stco`/`co64` beneath `parent`, in physical order.
///
/// Only `trak`, `mdia`, `minf` and `stbl` are descended into. A table found
/// anywhere else (e.g. directly inside `moov`) is not a chunk-offset table of
/// any track and is ignored.
pub fn find_chunk_offset_tables(buf: &[u8], parent: &Atom) -> Result<Vec<Atom>> {
    let mut tables = Vec::new();
    collect_tables(buf, parent, &mut tables)?;
    Ok(tables)
}

fn collect_tables(buf: &[u8], parent: &Atom, tables: &mut Vec<Atom>) -> Result<()> {
    for child in AtomIter::children(buf, parent) {
        let child = child?;
        if child.is_chunk_offset_table() {
            tables.push(child);
        } else if child.is_sample_table_path() {
            collect_tables(buf, &child, tables)?;
        }
    }
    Ok(())
}

/// Copy `moov` out of `buf` and add `shift` to every entry of `tables`.
///
/// `tables` must lie inside `moov`. `stco` entries use 32-bit wrapping
/// arithmetic to match the field width; `co64` entries use 64-bit.
pub fn patch_chunk_offsets(
    buf: &[u8],
    moov: &Atom,
    tables: &[Atom],
    shift: i64,
) -> Result<Vec<u8>> {
    let mut patched = buf[moov.offset as usize..moov.end() as usize].to_vec();
    for table in tables {
        let start = (table.header_end() - moov.offset) as usize;
        let end = (table.end() - moov.offset) as usize;
        patch_table(&mut patched[start..end], table, shift)?;
    }
    Ok(patched)
}

/// Read the entries of one `stco`/`co64` table, widened to 64 bits.
pub fn read_chunk_offsets(buf: &[u8], table: &Atom) -> Result<Vec<u64>> {
    let body = &buf[table.header_end() as usize..table.end() as usize];
    let Some((width, table_end)) = entry_layout(body, table)? else {
        return Ok(Vec::new());
    };

    let mut entries = &body[TABLE_PREAMBLE..table_end];
    let mut offsets = Vec::with_capacity(entries.len() / width);
    while entries.has_remaining() {
        offsets.push(if width == 4 {
            entries.get_u32() as u64
        } else {
            entries.get_u64()
        });
    }
    Ok(offsets)
}

/// Entry width and end of the entry array within a table body, or `None` for
/// an atom that is not a chunk-offset table.
fn entry_layout(body: &[u8], table: &Atom) -> Result<Option<(usize, usize)>> {
    if body.len() < TABLE_PREAMBLE {
        return Err(Error::truncated(
            table.header_end(),
            TABLE_PREAMBLE as u64,
            body.len() as u64,
        ));
    }

    let entries = (&body[4..TABLE_PREAMBLE]).get_u32();
    let width = match table.atom_type {
        AtomType::STCO => 4,
        AtomType::CO64 => 8,
        _ => return Ok(None),
    };
    let table_end = TABLE_PREAMBLE as u64 + entries as u64 * width as u64;
    if table_end > body.len() as u64 {
        return Err(Error::InvalidChunkOffsetTable {
            atom_type: table.atom_type,
            offset: table.offset,
            entries,
        });
    }
    Ok(Some((width, table_end as usize)))
}

/// Shift the entries of one table body (everything after the atom header).
fn patch_table(body: &mut [u8], table: &Atom, shift: i64) -> Result<()> {
    let Some((width, table_end)) = entry_layout(body, table)? else {
        return Ok(());
    };

    let entries = body[TABLE_PREAMBLE..table_end].chunks_exact_mut(width);
    if width == 4 {
        for mut entry in entries {
            let value = (&*entry).get_u32();
            entry.put_u32(value.wrapping_add(shift as u32));
        }
    } else {
        for mut entry in entries {
            let value = (&*entry).get_u64();
            entry.put_u64(value.wrapping_add(shift as u64));
        }
    }
    Ok(())
}
