//! Log file compression and text encoding.
//!
//! Log files embedded in a bug report are compressed and then base64-encoded
//! so they can live inside a JSON string.  The compressed layout matches what
//! iTALC's Qt-based tooling reads (`qUncompress`):
//!
//! ```text
//! ┌──────────────────────────────┬─────────────────────────────┐
//! │ uncompressed length (u32 BE) │ zlib stream (RFC 1950)      │
//! └──────────────────────────────┴─────────────────────────────┘
//! ```

pub mod compress;

pub use compress::{compress, decode_log, encode_log, uncompress, CodecError};
