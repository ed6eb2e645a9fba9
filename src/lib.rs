//! # mediathumb
//!
//! Bounded-size representative thumbnails from arbitrary, untrusted media
//! files — video, audio with embedded cover art, or still/animated raster
//! images — without ever trusting the file extension.
//!
//! # Architecture: One Linear Pipeline
//!
//! Every call walks the same strictly linear sequence, coordinated only by
//! the orchestrator:
//!
//! ```text
//! sniff → dispatch → isolated decode → frame select (video)
//!       → orientation normalize → geometry fit → resize
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`sniff`] | Content-based format detection from leading bytes (magic numbers) |
//! | `decode` | One backend per family: `image`-crate pictures, FFmpeg cover art, FFmpeg video |
//! | `select` | Luminance-histogram frame selection — skips black fade-in frames |
//! | [`orient`] | EXIF-style orientation normalization (rotate, then mirror) |
//! | [`geometry`] | Pure aspect-preserving fit of source dimensions into the bounding box |
//! | `isolate` | Fault-isolation boundary — a crashing decoder becomes an ordinary error |
//! | [`process`] | The public orchestrator, [`process()`](process::process) |
//! | [`types`] | [`Options`], [`SourceMeta`], [`RawFrame`], [`Outcome`] |
//! | [`error`] | Hard error taxonomy ([`ThumbError`]) |
//!
//! # Design Decisions
//!
//! ## Content Sniffing, Never Extensions
//!
//! Classification reads only leading bytes. A renamed file classifies
//! identically to its canonically-named twin; a file with its signature
//! stripped is unsupported even if the rest would decode. Archive formats
//! are recognized precisely so they can be skipped up front.
//!
//! ## Soft Outcomes Are Values, Not Errors
//!
//! "This input has no thumbnail" is an expected terminal state — audio
//! without cover art, an unrecognized signature, a zip file. Those come
//! back as [`Outcome::Skipped`] on the ordinary return path, one comparison
//! away ([`Outcome::is_skipped`]); batch callers skip the item and move on.
//! Hard [`ThumbError`]s always mean corrupt data, a crashed decoder, or an
//! unreadable stream.
//!
//! ## Crash Containment for Native Decoders
//!
//! FFmpeg does the demuxing and video decoding, and adversarial inputs have
//! a history of taking decoders down with them. Every backend call runs on
//! its own supervised thread; abnormal termination is observed at `join`
//! and converted to [`ThumbError::DecodeCrash`] without corrupting the
//! caller or leaking the failed unit's buffers. The rest of the pipeline is
//! pure Rust (`image`, `kamadak-exif`).
//!
//! ## Per-Call Decode State
//!
//! No global decoder instance exists. Format contexts, codec contexts, and
//! scalers are constructed inside the call that uses them and dropped on
//! every exit path, so concurrent calls share nothing mutable and results
//! are independent of interleaving.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use mediathumb::{process, Options, Outcome};
//!
//! let outcome = process(Path::new("clip.webm"), &Options::new(150, 150))?;
//! match outcome {
//!     Outcome::Thumbnail { meta, image } => {
//!         println!("{}: {}x{}", meta.container, image.width(), image.height());
//!     }
//!     Outcome::Skipped { reason, .. } => println!("skipped: {reason:?}"),
//! }
//! # Ok::<(), mediathumb::ThumbError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod orient;
pub mod sniff;
pub mod types;

pub(crate) mod decode;
pub(crate) mod isolate;
pub(crate) mod select;

pub mod process;

pub use error::ThumbError;
pub use process::process;
pub use types::{Dims, Family, Options, Orientation, Outcome, RawFrame, SkipReason, SourceMeta};
