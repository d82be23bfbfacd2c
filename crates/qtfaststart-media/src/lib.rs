//! Qtfaststart-Media: QuickTime/MP4 atom parsing and fast-start conversion
//!
//! QuickTime movies are a sequence of length-prefixed, tagged records called
//! atoms. The `moov` atom indexes the media: it holds the track descriptions
//! and the chunk-offset tables (`stco`/`co64`) that point at sample data in
//! `mdat`. Encoders usually write `moov` last, which means a player has to
//! download the whole file before it can start. This crate moves `moov` in
//! front of `mdat` and rewrites every chunk offset so the file stays valid.
//!
//! # Modules
//!
//! - `mp4` - Atom headers and the bounded atom reader shared by all traversals
//! - `faststart` - Validation, chunk-offset patching and reassembly
//!
//! # Example
//!
//! ```no_run
//! use qtfaststart_media::QtFile;
//!
//! # fn main() -> qtfaststart_media::Result<()> {
//! let data = std::fs::read("movie.mov")?;
//! let mut file = QtFile::new(data)?;
//! if !file.is_fast_start_enabled() {
//!     file.convert(true)?;
//! }
//! std::fs::write("movie-faststart.mov", file.bytes())?;
//! # Ok(())
//! # }
//! ```
//!
//! Everything operates on a buffer that is already fully in memory. There is
//! no I/O besides the optional [`QtFile::read`] and [`QtFile::write_to`]
//! helpers, and no logging.

pub mod error;
pub mod faststart;
pub mod mp4;

pub use error::{Error, Result};
pub use faststart::{ConvertOptions, ConvertSummary, FillerShift, ParseOptions, QtFile};
pub use mp4::{Atom, AtomType};
