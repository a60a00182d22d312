//! Resumable scanners over a growing text buffer.
//!
//! Every scanner keeps a byte offset into the caller's buffer and picks up
//! where it stopped on the next call, so a chunk is examined once instead of
//! rescanning the whole response after every token. The buffer must only ever
//! be appended to between calls.
//!
//! Offsets are always left on an ASCII byte (`"`, `\`, `:`, …) or at the end
//! of the buffer, so slicing the buffer `&str` at them never splits a
//! character.

/// Decodes one JSON string literal whose opening quote is already consumed.
#[derive(Debug, Clone, Default)]
pub(crate) struct StringScanner {
    cursor: usize,
    decoded: String,
    end: Option<usize>,
}

impl StringScanner {
    /// `start` is the offset right after the opening quote.
    pub(crate) fn starting_at(start: usize) -> Self {
        Self {
            cursor: start,
            decoded: String::new(),
            end: None,
        }
    }

    /// Text decoded so far.
    pub(crate) fn decoded(&self) -> &str {
        &self.decoded
    }

    pub(crate) fn into_decoded(self) -> String {
        self.decoded
    }

    /// Decode as far as `raw` allows. Returns the offset just past the closing
    /// quote once the literal is complete.
    pub(crate) fn advance(&mut self, raw: &str) -> Option<usize> {
        if self.end.is_some() {
            return self.end;
        }

        let bytes = raw.as_bytes();
        while self.cursor < bytes.len() {
            let Some(offset) = bytes[self.cursor..]
                .iter()
                .position(|b| *b == b'"' || *b == b'\\')
            else {
                self.decoded.push_str(&raw[self.cursor..]);
                self.cursor = bytes.len();
                break;
            };

            let at = self.cursor + offset;
            self.decoded.push_str(&raw[self.cursor..at]);
            self.cursor = at;

            if bytes[at] == b'"' {
                self.cursor = at + 1;
                self.end = Some(self.cursor);
                return self.end;
            }

            match decode_escape(&raw[at..]) {
                Escape::Decoded { ch, len } => {
                    self.decoded.push(ch);
                    self.cursor = at + len;
                }
                // Split across chunks; wait on the backslash.
                Escape::Incomplete => break,
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    Decoded { ch: char, len: usize },
    Incomplete,
}

/// `s` starts with a backslash.
fn decode_escape(s: &str) -> Escape {
    let Some(&kind) = s.as_bytes().get(1) else {
        return Escape::Incomplete;
    };

    let ch = match kind {
        b'"' => '"',
        b'\\' => '\\',
        b'/' => '/',
        b'n' => '\n',
        b't' => '\t',
        b'r' => '\r',
        b'b' => '\u{8}',
        b'f' => '\u{c}',
        b'u' => return decode_unicode(s),
        _ => {
            // Not a JSON escape: keep the escaped character as written.
            let Some(ch) = s[1..].chars().next() else {
                return Escape::Incomplete;
            };
            return Escape::Decoded {
                ch,
                len: 1 + ch.len_utf8(),
            };
        }
    };
    Escape::Decoded { ch, len: 2 }
}

/// `s` starts with `\u`.
fn decode_unicode(s: &str) -> Escape {
    let high = match hex4(&s.as_bytes()[2..]) {
        Hex::Value(v) => v,
        Hex::Short => return Escape::Incomplete,
        Hex::Invalid => return Escape::Decoded {
            ch: char::REPLACEMENT_CHARACTER,
            len: 2,
        },
    };

    if !(0xD800..=0xDBFF).contains(&high) {
        let ch = char::from_u32(u32::from(high)).unwrap_or(char::REPLACEMENT_CHARACTER);
        return Escape::Decoded { ch, len: 6 };
    }

    // High surrogate: the pair's second half must follow as `\uXXXX`.
    let rest = &s.as_bytes()[6..];
    let lone = Escape::Decoded {
        ch: char::REPLACEMENT_CHARACTER,
        len: 6,
    };
    match rest {
        [] | [b'\\'] => Escape::Incomplete,
        [b'\\', b'u', tail @ ..] => match hex4(tail) {
            Hex::Value(low) if (0xDC00..=0xDFFF).contains(&low) => {
                let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                Escape::Decoded {
                    ch: char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
                    len: 12,
                }
            }
            Hex::Short => Escape::Incomplete,
            _ => lone,
        },
        _ => lone,
    }
}

enum Hex {
    Value(u16),
    Short,
    Invalid,
}

fn hex4(bytes: &[u8]) -> Hex {
    let mut value: u16 = 0;
    for i in 0..4 {
        let Some(&b) = bytes.get(i) else {
            return Hex::Short;
        };
        let Some(digit) = (b as char).to_digit(16) else {
            return Hex::Invalid;
        };
        value = (value << 4) | digit as u16;
    }
    Hex::Value(value)
}

/// Where a field's value opener was found relative to its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    /// Offset just past the opener.
    Found(usize),
    /// The buffer ends before the question can be decided.
    Pending,
    Mismatch,
}

/// Skip whitespace from `from`, then expect `expected`.
fn expect_after_whitespace(bytes: &[u8], from: usize, expected: u8) -> Opener {
    match bytes[from.min(bytes.len())..]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
    {
        None => Opener::Pending,
        Some(offset) if bytes[from + offset] == expected => Opener::Found(from + offset + 1),
        Some(_) => Opener::Mismatch,
    }
}

/// Finds `"label"` `:` `opener` (whitespace allowed between the parts) and
/// reports the offset just past the opener.
#[derive(Debug, Clone)]
pub(crate) struct FieldSeeker {
    label: &'static [u8],
    opener: u8,
    resume: usize,
}

impl FieldSeeker {
    /// `label` must include its surrounding quotes.
    pub(crate) fn new(label: &'static str, opener: u8, resume: usize) -> Self {
        Self {
            label: label.as_bytes(),
            opener,
            resume,
        }
    }

    pub(crate) fn seek(&mut self, raw: &str) -> Option<usize> {
        let bytes = raw.as_bytes();
        let mut from = self.resume;

        while let Some(offset) = find(&bytes[from.min(bytes.len())..], self.label) {
            let at = from + offset;
            let after_colon = match expect_after_whitespace(bytes, at + self.label.len(), b':') {
                Opener::Found(pos) => expect_after_whitespace(bytes, pos, self.opener),
                other => other,
            };
            match after_colon {
                Opener::Found(end) => {
                    self.resume = end;
                    return Some(end);
                }
                Opener::Pending => {
                    self.resume = at;
                    return None;
                }
                Opener::Mismatch => from = at + 1,
            }
        }

        // Keep just enough tail to match a label that is still arriving.
        self.resume = bytes
            .len()
            .saturating_sub(self.label.len() - 1)
            .max(from);
        None
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// What follows a closed string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Separator {
    /// Offset just past the comma.
    Comma(usize),
    Pending,
    /// Anything else, e.g. `}` when no further field follows.
    Other,
}

pub(crate) fn separator_after(raw: &str, from: usize) -> Separator {
    match expect_after_whitespace(raw.as_bytes(), from, b',') {
        Opener::Found(end) => Separator::Comma(end),
        Opener::Pending => Separator::Pending,
        Opener::Mismatch => Separator::Other,
    }
}

/// Collects the string elements of a JSON array whose `[` is already
/// consumed. Non-string elements are skipped, nested objects and arrays
/// whole, including the strings inside them.
#[derive(Debug, Clone)]
pub(crate) struct ArrayScanner {
    cursor: usize,
    current: Option<StringScanner>,
    /// Nesting below the top-level array.
    depth: usize,
    closed: bool,
}

impl ArrayScanner {
    pub(crate) fn starting_at(start: usize) -> Self {
        Self {
            cursor: start,
            current: None,
            depth: 0,
            closed: false,
        }
    }

    /// `true` once the closing `]` was seen.
    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    /// Return every element that closed since the last call, in order.
    pub(crate) fn advance(&mut self, raw: &str) -> Vec<String> {
        let bytes = raw.as_bytes();
        let mut finished = Vec::new();

        while !self.closed {
            if let Some(scanner) = self.current.as_mut() {
                let Some(end) = scanner.advance(raw) else {
                    break;
                };
                let done = self.current.take();
                if self.depth == 0 {
                    finished.extend(done.map(StringScanner::into_decoded));
                }
                self.cursor = end;
            }

            match bytes.get(self.cursor) {
                None => break,
                Some(b'"') => {
                    self.current = Some(StringScanner::starting_at(self.cursor + 1));
                }
                Some(b'[' | b'{') => {
                    self.depth += 1;
                    self.cursor += 1;
                }
                Some(b']') if self.depth == 0 => {
                    self.closed = true;
                    self.cursor += 1;
                }
                Some(b']' | b'}') => {
                    self.depth = self.depth.saturating_sub(1);
                    self.cursor += 1;
                }
                Some(_) => self.cursor += 1,
            }
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_whole(literal_body: &str) -> (String, Option<usize>) {
        let mut scanner = StringScanner::starting_at(0);
        let end = scanner.advance(literal_body);
        (scanner.into_decoded(), end)
    }

    #[test]
    fn decodes_standard_escapes() {
        let (text, end) = scan_whole(r#"a\"b\\c\nd\te\/fé" tail"#);
        assert_eq!(text, "a\"b\\c\nd\te/fé");
        assert_eq!(end, Some(r#"a\"b\\c\nd\te\/fé""#.len()));
    }

    #[test]
    fn open_literal_decodes_available_prefix() {
        let (text, end) = scan_whole("He opened the ");
        assert_eq!(text, "He opened the ");
        assert_eq!(end, None);
    }

    #[test]
    fn escape_split_across_chunks_waits() {
        let mut raw = String::from(r"say \");
        let mut scanner = StringScanner::starting_at(0);
        assert_eq!(scanner.advance(&raw), None);
        assert_eq!(scanner.decoded(), "say ");

        raw.push_str(r#""hi\"""#);
        assert_eq!(scanner.advance(&raw), Some(raw.len()));
        assert_eq!(scanner.decoded(), "say \"hi\"");
    }

    #[test]
    fn unicode_escape_split_across_chunks() {
        let mut raw = String::from(r"caf\u00");
        let mut scanner = StringScanner::starting_at(0);
        scanner.advance(&raw);
        assert_eq!(scanner.decoded(), "caf");

        raw.push_str("e9\"");
        assert!(scanner.advance(&raw).is_some());
        assert_eq!(scanner.decoded(), "café");
    }

    #[test]
    fn surrogate_pairs_combine() {
        let (text, _) = scan_whole(r#"\ud83d\ude00""#);
        assert_eq!(text, "😀");

        let mut raw = String::from(r"\ud83d\u");
        let mut scanner = StringScanner::starting_at(0);
        scanner.advance(&raw);
        assert_eq!(scanner.decoded(), "");
        raw.push_str("de00\"");
        scanner.advance(&raw);
        assert_eq!(scanner.decoded(), "😀");
    }

    #[test]
    fn lone_surrogate_and_bad_hex_become_replacement() {
        let (text, _) = scan_whole(r#"\ud83dx""#);
        assert_eq!(text, "\u{FFFD}x");

        let (text, _) = scan_whole(r#"\uzzzz""#);
        assert_eq!(text, "\u{FFFD}zzzz");
    }

    #[test]
    fn unknown_escape_keeps_character() {
        let (text, _) = scan_whole(r#"\q\é""#);
        assert_eq!(text, "qé");
    }

    #[test]
    fn multibyte_text_passes_through() {
        let (text, end) = scan_whole("naïve – ünïcødé\" rest");
        assert_eq!(text, "naïve – ünïcødé");
        assert!(end.is_some());
    }

    #[test]
    fn seeker_allows_whitespace_around_colon() {
        let raw = "{\n  \"content\" :\n \"Once";
        let mut seeker = FieldSeeker::new("\"content\"", b'"', 0);
        let start = seeker.seek(raw).unwrap();
        assert_eq!(&raw[start..], "Once");
    }

    #[test]
    fn seeker_waits_for_split_label() {
        let mut raw = String::from("{\"con");
        let mut seeker = FieldSeeker::new("\"content\"", b'"', 0);
        assert_eq!(seeker.seek(&raw), None);

        raw.push_str("tent\": ");
        assert_eq!(seeker.seek(&raw), None);

        raw.push_str("\"x");
        assert_eq!(seeker.seek(&raw), Some(raw.len() - 1));
    }

    #[test]
    fn seeker_skips_label_with_wrong_opener() {
        let raw = r#"{"content": 42, "content": "real"#;
        let mut seeker = FieldSeeker::new("\"content\"", b'"', 0);
        let start = seeker.seek(raw).unwrap();
        assert_eq!(&raw[start..], "real");
    }

    #[test]
    fn separator_detection() {
        assert_eq!(separator_after("\" ,", 1), Separator::Comma(3));
        assert_eq!(separator_after("\"  ", 1), Separator::Pending);
        assert_eq!(separator_after("\"}", 1), Separator::Other);
    }

    #[test]
    fn array_emits_only_closed_elements() {
        let mut raw = String::from(r#" "Go in", "Run a"#);
        let mut array = ArrayScanner::starting_at(0);
        assert_eq!(array.advance(&raw), vec!["Go in".to_string()]);

        raw.push_str(r#"way", "Say \"hi\""]}"#);
        assert_eq!(
            array.advance(&raw),
            vec!["Run away".to_string(), "Say \"hi\"".to_string()]
        );
        assert!(array.is_closed());
        assert!(array.advance(&raw).is_empty());
    }

    #[test]
    fn array_skips_non_string_elements() {
        let raw = r#"1, null, "kept"]"#;
        let mut array = ArrayScanner::starting_at(0);
        assert_eq!(array.advance(raw), vec!["kept".to_string()]);
        assert!(array.is_closed());
    }

    #[test]
    fn array_skips_nested_containers() {
        let raw = r#"{"text":"a"}, ["b"], "c"]"#;
        let mut array = ArrayScanner::starting_at(0);
        assert_eq!(array.advance(raw), vec!["c".to_string()]);
        assert!(array.is_closed());
    }

    #[test]
    fn brackets_inside_nested_strings_are_text() {
        let mut raw = String::from(r#"{"note": "a ] and } b"#);
        let mut array = ArrayScanner::starting_at(0);
        assert!(array.advance(&raw).is_empty());
        assert!(!array.is_closed());

        raw.push_str(r#""}, [[1], "x"], "kept"]"#);
        assert_eq!(array.advance(&raw), vec!["kept".to_string()]);
        assert!(array.is_closed());
    }
}
