// Chunk codec — base64 tokens sized for a length-constrained status field.
//
// A payload is split into groups of at most CHUNK_SIZE raw bytes and each
// group is base64-encoded independently, so every token fits in one status
// update and round-trips on its own. Decoding is best-effort: anything that
// isn't valid base64-of-UTF-8 is simply "not a payload".

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Maximum raw payload bytes carried by one chunk token.
///
/// 105 bytes of payload base64-encode to 140 characters, which fits the
/// status service's length limit.
pub const CHUNK_SIZE: usize = 105;

/// Encode a payload into an ordered sequence of chunk tokens.
///
/// The payload's UTF-8 bytes are split into consecutive groups of at most
/// [`CHUNK_SIZE`] bytes; group boundaries fall wherever the byte count says,
/// not at character boundaries — only the reassembled whole is valid UTF-8.
pub fn encode_chunks(payload: &str) -> Vec<String> {
    payload
        .as_bytes()
        .chunks(CHUNK_SIZE)
        .map(|group| BASE64.encode(group))
        .collect()
}

/// Attempt to decode a single token back to a payload string.
///
/// Returns `None` if the text isn't valid standard base64 or the decoded
/// bytes aren't well-formed UTF-8 (strict — no replacement characters).
/// `None` means "not a codec payload", not an error. The empty string is
/// not a token (it would decode to itself, and iterative decoding must
/// terminate).
pub fn try_decode(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    let bytes = BASE64.decode(token).ok()?;
    String::from_utf8(bytes).ok()
}

/// Decode iteratively until the text stops being a valid token.
///
/// A payload may be multiply chunk-encoded (the relayed text was itself a
/// token), so decoding loops until [`try_decode`] fails and returns the last
/// successful result. `None` if the very first attempt fails — plain text is
/// not a relay payload at all.
pub fn decode_fully(text: &str) -> Option<String> {
    let mut current = try_decode(text)?;
    while let Some(next) = try_decode(&current) {
        current = next;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chunk_round_trip() {
        let tokens = encode_chunks("hello");
        assert_eq!(tokens.len(), 1);
        assert_eq!(try_decode(&tokens[0]).unwrap(), "hello");
    }

    #[test]
    fn exactly_chunk_size_yields_one_token() {
        let payload = "a".repeat(CHUNK_SIZE);
        let tokens = encode_chunks(&payload);
        assert_eq!(tokens.len(), 1);
        assert_eq!(try_decode(&tokens[0]).unwrap(), payload);
    }

    #[test]
    fn one_byte_over_yields_second_token_with_one_byte() {
        let payload = "a".repeat(CHUNK_SIZE + 1);
        let tokens = encode_chunks(&payload);
        assert_eq!(tokens.len(), 2);
        assert_eq!(try_decode(&tokens[1]).unwrap(), "a");
    }

    #[test]
    fn multi_chunk_tokens_reassemble_in_order() {
        let payload = "x".repeat(CHUNK_SIZE * 2 + 7);
        let tokens = encode_chunks(&payload);
        assert_eq!(tokens.len(), 3);
        let reassembled: String = tokens
            .iter()
            .map(|t| try_decode(t).unwrap())
            .collect();
        assert_eq!(reassembled, payload);
    }

    #[test]
    fn multibyte_payload_splits_on_bytes_not_chars() {
        // 36 four-byte emoji = 144 bytes; the split lands mid-character,
        // so the individual groups are not valid UTF-8 on their own.
        let payload = "\u{1F980}".repeat(36);
        let tokens = encode_chunks(&payload);
        assert_eq!(tokens.len(), 2);
        assert!(try_decode(&tokens[0]).is_none());
        // Raw bytes still reassemble to the original.
        let mut bytes = Vec::new();
        for t in &tokens {
            bytes.extend(BASE64.decode(t).unwrap());
        }
        assert_eq!(String::from_utf8(bytes).unwrap(), payload);
    }

    #[test]
    fn plain_text_is_not_a_payload() {
        assert!(try_decode("this is just prose, not base64!").is_none());
        assert!(decode_fully("this is just prose, not base64!").is_none());
    }

    #[test]
    fn valid_base64_of_invalid_utf8_is_rejected() {
        let token = BASE64.encode([0xff, 0xfe, 0xfd]);
        assert!(try_decode(&token).is_none());
    }

    #[test]
    fn double_encoding_needs_two_passes() {
        let once = encode_chunks("hi").remove(0);
        let twice = encode_chunks(&once).remove(0);

        // A single decode reaches the intermediate token, not the original.
        let intermediate = try_decode(&twice).unwrap();
        assert_eq!(intermediate, once);
        assert_ne!(intermediate, "hi");

        // Iterative decode runs all the way down.
        assert_eq!(decode_fully(&twice).unwrap(), "hi");
    }

    #[test]
    fn decode_fully_stops_at_last_valid_layer() {
        let token = encode_chunks("hello").remove(0);
        assert_eq!(decode_fully(&token).unwrap(), "hello");
    }

    #[test]
    fn empty_payload_yields_no_tokens() {
        assert!(encode_chunks("").is_empty());
    }

    #[test]
    fn empty_text_is_not_a_token() {
        assert!(try_decode("").is_none());
        assert!(decode_fully("").is_none());
    }
}
