//! Permissive UTF-8 decoding for the unshaped line
//!
//! The lead byte alone decides how many bytes a sequence takes. Continuation
//! bytes are not checked for their `10xxxxxx` marker, overlong forms and
//! surrogates are not rejected, so malformed input yields odd code points
//! instead of errors. Stray continuation bytes and invalid lead bytes are
//! skipped one byte at a time. A sequence cut short by the end of input is
//! dropped and ends the iteration.

use std::iter::FusedIterator;

use crate::types::CodePoint;

/// Number of bytes a sequence starting with `lead` occupies, `None` for a
/// byte that cannot start a sequence
#[inline]
pub const fn sequence_len(lead: u8) -> Option<usize> {
    if lead & 0x80 == 0 {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        Some(2)
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else if lead & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

/// Lazy code point iterator over a byte string.
///
/// A clone keeps the current position, so a clone taken before iterating
/// walks the whole string again.
#[derive(Debug, Clone)]
pub struct CodePoints<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> CodePoints<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Byte offset of the next unread byte
    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl Iterator for CodePoints<'_> {
    type Item = CodePoint;

    fn next(&mut self) -> Option<CodePoint> {
        while let Some(&lead) = self.bytes.get(self.pos) {
            let Some(len) = sequence_len(lead) else {
                self.pos += 1;
                continue;
            };

            let Some(seq) = self.bytes.get(self.pos..self.pos + len) else {
                self.pos = self.bytes.len();
                return None;
            };
            self.pos += len;

            let tail = |i: usize| (seq[i] & 0x3F) as u32;
            let cp = match len {
                1 => lead as u32,
                2 => (((lead & 0x1F) as u32) << 6) | tail(1),
                3 => (((lead & 0x0F) as u32) << 12) | (tail(1) << 6) | tail(2),
                _ => {
                    (((lead & 0x07) as u32) << 18) | (tail(1) << 12) | (tail(2) << 6) | tail(3)
                },
            };
            return Some(cp);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Invalid bytes yield nothing, so the lower bound is zero.
        (0, Some(self.bytes.len() - self.pos))
    }
}

impl FusedIterator for CodePoints<'_> {}

/// Decode `bytes` lazily
pub fn decode(bytes: &[u8]) -> CodePoints<'_> {
    CodePoints::new(bytes)
}

/// Count source units the way the console summary reports them.
///
/// Every lead byte counts once and jumps by its table length; invalid lead
/// bytes count once and jump by one. This can differ from the number of
/// code points [`decode`] yields on malformed input.
pub fn count_code_points(bytes: &[u8]) -> usize {
    let mut pos = 0;
    let mut count = 0;
    while pos < bytes.len() {
        pos += sequence_len(bytes[pos]).unwrap_or(1);
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn collect(bytes: &[u8]) -> Vec<u32> {
        decode(bytes).collect()
    }

    #[test]
    fn decodes_every_sequence_length() {
        assert_eq!(collect(b"A"), vec![0x41]);
        assert_eq!(collect("é".as_bytes()), vec![0xE9]);
        assert_eq!(collect("م".as_bytes()), vec![0x645]);
        assert_eq!(collect("€".as_bytes()), vec![0x20AC]);
        assert_eq!(collect("😀".as_bytes()), vec![0x1F600]);
    }

    #[test]
    fn arabic_phrase_decodes_to_chars() {
        let text = "اللغة العربية مرحبا";
        let expected: Vec<u32> = text.chars().map(|c| c as u32).collect();
        assert_eq!(collect(text.as_bytes()), expected);
        assert_eq!(expected.len(), 19);
    }

    #[test]
    fn stray_continuation_bytes_are_skipped() {
        assert_eq!(collect(&[0x80, 0x41, 0xBF, 0x42]), vec![0x41, 0x42]);
    }

    #[test]
    fn invalid_lead_bytes_are_skipped() {
        assert_eq!(collect(&[0xF8, 0xFF, 0x41]), vec![0x41]);
    }

    #[test]
    fn continuation_markers_are_not_validated() {
        // 0xC3 claims two bytes; 0x41 is taken as its tail regardless.
        assert_eq!(collect(&[0xC3, 0x41]), vec![0xC1]);
    }

    #[test]
    fn truncated_tail_ends_iteration() {
        assert_eq!(collect(&[0x41, 0xE2, 0x82]), vec![0x41]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn iterator_is_restartable() {
        let bytes = "AB ".as_bytes();
        let first: Vec<_> = decode(bytes).collect();
        let second: Vec<_> = decode(bytes).collect();
        assert_eq!(first, second);

        let mut it = decode(bytes);
        let snapshot = it.clone();
        it.next();
        assert_eq!(snapshot.count(), 3);
        assert_eq!(it.offset(), 1);
    }

    #[test]
    fn count_matches_summary_rules() {
        assert_eq!(count_code_points("اللغة العربية مرحبا".as_bytes()), 19);
        assert_eq!(count_code_points(&[0x80, 0x41]), 2);
        assert_eq!(count_code_points(&[0xE2, 0x82]), 1);
    }

    proptest! {
        #[test]
        fn prop_valid_utf8_round_trips(s in "\\PC*") {
            let mut reencoded = String::new();
            for cp in decode(s.as_bytes()) {
                let ch = char::from_u32(cp);
                prop_assert!(ch.is_some(), "decoded invalid scalar {:#x}", cp);
                if let Some(ch) = ch {
                    reencoded.push(ch);
                }
            }
            prop_assert_eq!(reencoded, s);
        }

        #[test]
        fn prop_never_yields_more_than_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assert!(decode(&bytes).count() <= bytes.len());
        }
    }
}
