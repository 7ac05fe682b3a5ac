use tracing::debug;

use crate::errors::DecodeAttempt;
use crate::model::{DecodedText, TextEncoding};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decodes an upload as UTF-8, falling back to Latin-1 when the bytes are not valid
/// UTF-8. Latin-1 assigns a character to every byte, so the fallback cannot fail.
pub fn decode_text(bytes: &[u8]) -> DecodedText {
    let mut attempts = Vec::new();

    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => {
            return DecodedText {
                text: text.to_string(),
                encoding: TextEncoding::Utf8,
                attempts,
            }
        }
        Err(err) => {
            debug!(error = %err, "upload is not valid UTF-8, retrying as Latin-1");
            attempts.push(DecodeAttempt::new(TextEncoding::Utf8, err.to_string()));
        }
    }

    DecodedText {
        text: decode_latin1(body),
        encoding: TextEncoding::Latin1,
        attempts,
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}
