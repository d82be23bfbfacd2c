//! MP4 container structure.
//!
//! This module knows how atoms are laid out on disk and how to walk them.
//! It knows nothing about which atoms matter for fast start; that lives in
//! [`crate::faststart`].

mod atoms;
mod reader;

pub use atoms::{Atom, AtomType};
pub use reader::{read_atom, AtomIter, EXTENDED_HEADER_SIZE, HEADER_SIZE};
