use std::io::{self, Read};

use crate::LookaheadReader;

/// Bytes inspected when guessing the format of a stream.
pub const SNIFF_WINDOW: usize = 300;

const TEXT_MARKER: &str = "format ascii";
const BINARY_MARKER: &str = "format binary_";

/// Guess whether the stream holds the text format.
///
/// Looks at the first [`SNIFF_WINDOW`] bytes without consuming them. This is a
/// heuristic: anything that does not clearly announce the text format,
/// including short or garbled headers, is reported as binary.
pub fn is_text_format<R: Read>(reader: &mut LookaheadReader<R>) -> io::Result<bool> {
    is_text_format_within(reader, SNIFF_WINDOW)
}

/// [`is_text_format`] with an explicit lookahead window.
pub fn is_text_format_within<R: Read>(
    reader: &mut LookaheadReader<R>,
    window: usize,
) -> io::Result<bool> {
    let head = String::from_utf8_lossy(reader.peek(window)?);
    Ok(head.contains(TEXT_MARKER) && !head.contains(BINARY_MARKER))
}
