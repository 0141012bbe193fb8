use encoding_rs::{Encoding, WINDOWS_1252};
use std::borrow::Cow;
use tracing::warn;

/// Decode a delimited text export to UTF-8.
///
/// A byte-order mark selects the encoding; otherwise the bytes are taken as
/// UTF-8 when valid and as Windows-1252 when not.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                warn!("Input is neither UTF-8 nor Windows-1252; some characters were replaced");
            }
            text
        }
    }
}
