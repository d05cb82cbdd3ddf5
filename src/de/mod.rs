mod ascii;
mod binary;
mod sniff;

pub mod val_reader;

pub use ascii::decode_text;
pub use binary::{decode_binary, HEADER_LEN, RECORD_LEN};
pub use sniff::{is_text_format, is_text_format_within, SNIFF_WINDOW};
