//! Cursor encoding and cursor paging arguments

mod codec;
mod paging;

pub use codec::{
    decode_cursor, decode_offset_cursor, encode_cursor, encode_offset_cursor, CursorKind,
    KeysetCursorPayload, KeysetField,
};
pub use paging::CursorPaging;

pub(crate) use paging::page_size;
