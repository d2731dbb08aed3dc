//! Adapted base64, the byte encoding of salts and keys in hash strings.
//!
//! Standard base64 with `.` in place of `+` and no `=` padding. Decoding
//! restores the padding from the length, so `len % 4 == 1` is always invalid.

use base64::{
    DecodeError, Engine,
    alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
};

const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true),
);

/// Encode bytes as adapted base64.
pub fn encode(bytes: &[u8]) -> String {
    ENGINE.encode(bytes).replace('+', ".")
}

/// Decode adapted base64. The empty string decodes to no bytes.
///
/// # Errors
///
/// Returns the underlying [`DecodeError`] for characters outside the
/// alphabet or a length that cannot be padded to a valid block.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let padding = (4 - text.len() % 4) % 4;

    let mut padded = String::with_capacity(text.len() + padding);
    padded.extend(text.chars().map(|c| if c == '.' { '+' } else { c }));
    padded.extend(std::iter::repeat_n('=', padding));

    ENGINE.decode(padded)
}
