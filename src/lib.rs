#![forbid(unsafe_code)]

//! A crate for pulling character card metadata out of PNG files.
//!
//! Character cards are PNG images with a JSON description of the character
//! hidden in a `tEXt` chunk, usually under the keyword `chara`. Getting it back
//! out sounds easy, but the text has been through a lot of different tools:
//! sometimes it's Base64, sometimes raw JSON, sometimes re-encoded as Latin-1.
//!
//! * [`png`] walks the chunks and splits text chunks.
//! * [`keyword_matches`] decides which keyword is the card.
//! * [`decode`] turns the value bytes into JSON.
//! * [`Scanner`] ties it all together.
//!
//! ```
//! use chara_card::{png::PngWriter, scan_for_metadata};
//! let png = PngWriter::new().text_chunk("chara", b"eyJuYW1lIjoiRm9vIn0=").finish();
//! let card = scan_for_metadata(&png, "chara").unwrap();
//! assert_eq!(card["name"], "Foo");
//! ```
//!
//! The crate never does I/O, reading the file is up to you.

mod parser_helpers;

pub mod card;
pub use card::*;

pub mod decode;

mod error;
pub use error::*;

mod keyword;
pub use keyword::*;

pub mod observe;
pub use observe::{NoopObserver, ScanObserver, TracingObserver};

pub mod png;

mod scan;
pub use scan::*;
