//! qtfaststart - Move the moov atom of QuickTime/MP4 files to the front
//!
//! This library crate exposes the CLI's configuration and file handling for
//! integration testing. The atom-level work lives in `qtfaststart-media`.

pub mod config;
pub mod convert;
