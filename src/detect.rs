use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Best-guess verdict for a byte buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Detection {
    /// Already valid UTF-8 (with or without BOM), or the detector's best
    /// guess is UTF-8.
    Canonical,
    /// Best-guess legacy source encoding.
    Legacy(&'static Encoding),
    /// Nothing to judge (empty input).
    Inconclusive,
}

/// Guess the encoding of `bytes`.
///
/// BOMs are authoritative; otherwise UTF-8 validity wins, and the
/// statistical detector only gets a say on byte sequences UTF-8 rejects.
pub fn detect(bytes: &[u8]) -> Detection {
    if bytes.is_empty() {
        return Detection::Inconclusive;
    }

    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        if encoding == UTF_8 {
            return Detection::Canonical;
        }
        return Detection::Legacy(encoding);
    }

    if simdutf8::basic::from_utf8(bytes).is_ok() {
        return Detection::Canonical;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, true);
    if guess == UTF_8 {
        // The label matches the target; stray invalid bytes are not ours
        // to rewrite lossily.
        return Detection::Canonical;
    }
    Detection::Legacy(guess)
}
