//! Incremental UTF-8 decoding across chunk boundaries.

/// Decodes byte chunks into text, holding back a multi-byte sequence that is
/// split across two reads until the rest of it arrives.
///
/// Invalid sequences decode to U+FFFD. Feeding the same bytes in any chunking
/// produces the same text.
#[derive(Debug, Default)]
pub(crate) struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Decode `chunk` (prefixed by any held-back bytes) and append the text
    /// to `out`.
    pub(crate) fn decode_into(&mut self, chunk: &[u8], out: &mut String) {
        self.pending.extend_from_slice(chunk);

        let mut input: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    input = &[];
                    break;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        // Truncated sequence at the end: wait for more bytes.
                        None => {
                            input = rest;
                            break;
                        }
                    }
                }
            }
        }

        let held = input.len();
        let consumed = self.pending.len() - held;
        self.pending.drain(..consumed);
    }

    /// Number of bytes held back waiting for the rest of a code point.
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_chunks(chunks: &[&[u8]]) -> String {
        let mut decoder = Utf8Decoder::default();
        let mut out = String::new();
        for chunk in chunks {
            decoder.decode_into(chunk, &mut out);
        }
        out
    }

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(decode_chunks(&[b"hello ", b"world"]), "hello world");
    }

    #[test]
    fn test_split_multibyte_sequence_is_held() {
        let bytes = "안녕".as_bytes();
        let mut decoder = Utf8Decoder::default();
        let mut out = String::new();

        decoder.decode_into(&bytes[..2], &mut out);
        assert_eq!(out, "");
        assert_eq!(decoder.pending_len(), 2);

        decoder.decode_into(&bytes[2..], &mut out);
        assert_eq!(out, "안녕");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_every_split_point_matches_whole() {
        let text = "a😀b안c";
        let bytes = text.as_bytes();
        for split in 0..=bytes.len() {
            let (left, right) = bytes.split_at(split);
            assert_eq!(decode_chunks(&[left, right]), text, "split at {split}");
        }
    }

    #[test]
    fn test_invalid_bytes_become_replacement() {
        assert_eq!(decode_chunks(&[b"a\xFFb"]), "a\u{FFFD}b");
        assert_eq!(decode_chunks(&[b"a\xE2\x82", b"Ab"]), "a\u{FFFD}Ab");
    }
}
