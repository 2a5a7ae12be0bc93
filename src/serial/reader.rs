//! Text format reader
//!
//! Parses the indented `key: value` block format produced by the writer.
//! A [`Deserializer`] is an immutable input view plus a byte cursor that
//! only moves forward; the one sanctioned exception is
//! [`Deserializer::set_position`], which lets a caller rewind to a saved
//! block start to re-scan it (layered base/derived record reading).
//!
//! This is a best-effort parser for trusted, engine-authored save data:
//! malformed input makes parsing functions return false or empty slices,
//! and the caller is responsible for noticing an incomplete read. There
//! is no structured error channel here.

use glam::{Vec2, Vec3, Vec4};

/// Cursor over an input text buffer.
pub struct Deserializer<'a> {
    src: &'a str,
    cursor: usize,
}

impl<'a> Deserializer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, cursor: 0 }
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to a previously saved [`position`](Self::position).
    ///
    /// This exists to support two-pass reading: save the position before
    /// entering a block, scan it once, then rewind and scan again with a
    /// different field matcher.
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.src.len());
        self.cursor = pos.min(self.src.len());
    }

    /// True once the cursor has consumed the whole input.
    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.src.len()
    }

    /// Advance past spaces, tabs, CR and LF.
    pub fn skip_whitespace(&mut self) {
        let bytes = self.src.as_bytes();
        while self.cursor < bytes.len() {
            match bytes[self.cursor] {
                b' ' | b'\n' | b'\r' | b'\t' => self.cursor += 1,
                _ => break,
            }
        }
    }

    /// Consume the opening `{` of a block. False if the next
    /// non-whitespace byte is anything else.
    pub fn enter_block(&mut self) -> bool {
        self.skip_whitespace();
        let bytes = self.src.as_bytes();
        if self.cursor >= bytes.len() || bytes[self.cursor] != b'{' {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Look ahead: is the next non-whitespace byte the block's closing
    /// `}`? Consumes nothing. Loop condition for "read fields until the
    /// block closes".
    pub fn peek_block_end(&self) -> bool {
        let bytes = self.src.as_bytes();
        let mut tmp = self.cursor;
        while tmp < bytes.len() {
            match bytes[tmp] {
                b' ' | b'\n' | b'\r' | b'\t' => tmp += 1,
                _ => break,
            }
        }
        tmp < bytes.len() && bytes[tmp] == b'}'
    }

    /// Consume the closing `}` of a block. False if absent.
    pub fn exit_block(&mut self) -> bool {
        self.skip_whitespace();
        let bytes = self.src.as_bytes();
        if self.cursor >= bytes.len() || bytes[self.cursor] != b'}' {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Read a field key: everything up to the first `:` or newline on
    /// the current line, with trailing spaces trimmed. Consumes the `:`
    /// and one following space if present.
    pub fn read_key(&mut self) -> &'a str {
        self.skip_whitespace();
        let bytes = self.src.as_bytes();

        let start = self.cursor;
        while self.cursor < bytes.len()
            && bytes[self.cursor] != b':'
            && bytes[self.cursor] != b'\n'
        {
            self.cursor += 1;
        }

        let mut end = self.cursor;
        while end > start && bytes[end - 1] == b' ' {
            end -= 1;
        }
        let key = &self.src[start..end];

        if self.cursor < bytes.len() && bytes[self.cursor] == b':' {
            self.cursor += 1;
        }
        if self.cursor < bytes.len() && bytes[self.cursor] == b' ' {
            self.cursor += 1;
        }

        key
    }

    /// Return the rest of the current line verbatim and consume through
    /// the newline.
    pub fn read_line_value(&mut self) -> &'a str {
        let bytes = self.src.as_bytes();
        let start = self.cursor;
        while self.cursor < bytes.len() && bytes[self.cursor] != b'\n' {
            self.cursor += 1;
        }
        let value = &self.src[start..self.cursor];
        if self.cursor < bytes.len() {
            self.cursor += 1;
        }
        value
    }

    /// Skip a field whose key was just read but is not recognized.
    ///
    /// Distinguishes a scalar field (non-blank rest of line) from a
    /// composite field (blank rest of line, block on the next line) by
    /// peeking ahead. A composite field is skipped as a full
    /// balanced-brace block using a depth counter, so unknown nested
    /// structures of any depth pass through without corrupting the
    /// cursor. The depth counter, not call-stack recursion, bounds stack
    /// usage on deeply nested input.
    pub fn skip_field(&mut self) {
        let bytes = self.src.as_bytes();

        let mut tmp = self.cursor;
        while tmp < bytes.len() && bytes[tmp] == b' ' {
            tmp += 1;
        }
        let composite = tmp >= bytes.len() || bytes[tmp] == b'\n' || bytes[tmp] == b'\r';

        self.skip_line();
        if !composite {
            return;
        }

        self.skip_whitespace();
        if self.cursor < bytes.len() && bytes[self.cursor] == b'{' {
            let mut depth = 0usize;
            while self.cursor < bytes.len() {
                let c = bytes[self.cursor];
                self.cursor += 1;
                if c == b'{' {
                    depth += 1;
                } else if c == b'}' {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
            }
            if self.cursor < bytes.len() && bytes[self.cursor] == b'\n' {
                self.cursor += 1;
            }
        }
    }

    /// Consume through the end of the current line.
    pub fn skip_line(&mut self) {
        let bytes = self.src.as_bytes();
        while self.cursor < bytes.len() && bytes[self.cursor] != b'\n' {
            self.cursor += 1;
        }
        if self.cursor < bytes.len() {
            self.cursor += 1;
        }
    }
}

/// A value that can be read back from the text format.
///
/// Deserialization is in-place: fields missing from the input keep the
/// value they already had, which is how defaults and forward
/// compatibility fall out. Returns false on malformed input; the value
/// may be partially updated in that case.
pub trait Deserialize {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool;
}

impl Deserialize for bool {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        let raw = d.read_line_value().trim();
        *self = raw == "true" || raw == "1";
        true
    }
}

impl Deserialize for i32 {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        match d.read_line_value().trim().parse() {
            Ok(v) => {
                *self = v;
                true
            }
            Err(_) => false,
        }
    }
}

impl Deserialize for u32 {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        match d.read_line_value().trim().parse() {
            Ok(v) => {
                *self = v;
                true
            }
            Err(_) => false,
        }
    }
}

impl Deserialize for f32 {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        match d.read_line_value().trim().parse() {
            Ok(v) => {
                *self = v;
                true
            }
            Err(_) => false,
        }
    }
}

impl Deserialize for String {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        *self = d.read_line_value().to_string();
        true
    }
}

impl Deserialize for Vec2 {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        if !d.enter_block() {
            return false;
        }
        while !d.peek_block_end() {
            if d.is_at_end() {
                return false;
            }
            match d.read_key() {
                "x" => {
                    self.x.deserialize(d);
                }
                "y" => {
                    self.y.deserialize(d);
                }
                _ => d.skip_field(),
            }
        }
        d.exit_block()
    }
}

impl Deserialize for Vec3 {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        if !d.enter_block() {
            return false;
        }
        while !d.peek_block_end() {
            if d.is_at_end() {
                return false;
            }
            match d.read_key() {
                "x" => {
                    self.x.deserialize(d);
                }
                "y" => {
                    self.y.deserialize(d);
                }
                "z" => {
                    self.z.deserialize(d);
                }
                _ => d.skip_field(),
            }
        }
        d.exit_block()
    }
}

impl Deserialize for Vec4 {
    fn deserialize(&mut self, d: &mut Deserializer<'_>) -> bool {
        if !d.enter_block() {
            return false;
        }
        while !d.peek_block_end() {
            if d.is_at_end() {
                return false;
            }
            match d.read_key() {
                "x" => {
                    self.x.deserialize(d);
                }
                "y" => {
                    self.y.deserialize(d);
                }
                "z" => {
                    self.z.deserialize(d);
                }
                "w" => {
                    self.w.deserialize(d);
                }
                _ => d.skip_field(),
            }
        }
        d.exit_block()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::writer::{Serialize, Serializer};

    #[test]
    fn test_read_key_trims_and_consumes() {
        let mut d = Deserializer::new("  pos : value\n");
        assert_eq!(d.read_key(), "pos");
        assert_eq!(d.read_line_value(), "value");
        assert!(d.is_at_end());
    }

    #[test]
    fn test_block_primitives() {
        let mut d = Deserializer::new("{\n    x: 1\n}\n");
        assert!(d.enter_block());
        assert!(!d.peek_block_end());
        assert_eq!(d.read_key(), "x");
        assert_eq!(d.read_line_value(), "1");
        assert!(d.peek_block_end());
        assert!(d.exit_block());
    }

    #[test]
    fn test_enter_block_rejects_garbage() {
        let mut d = Deserializer::new("not a block");
        assert!(!d.enter_block());

        let mut d = Deserializer::new("");
        assert!(!d.enter_block());
        assert!(!d.exit_block());
        assert!(!d.peek_block_end());
    }

    #[test]
    fn test_vec3_round_trip() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let mut s = Serializer::new();
        v.serialize(&mut s);

        let text = s.finish();
        let mut d = Deserializer::new(&text);
        let mut back = Vec3::ZERO;
        assert!(back.deserialize(&mut d));
        assert_eq!(back, v);
    }

    #[test]
    fn test_vec4_negative_and_fractional() {
        let v = Vec4::new(-1.5, 0.25, 100.0, -0.125);
        let mut s = Serializer::new();
        v.serialize(&mut s);

        let text = s.finish();
        let mut d = Deserializer::new(&text);
        let mut back = Vec4::ZERO;
        assert!(back.deserialize(&mut d));
        assert_eq!(back, v);
    }

    #[test]
    fn test_unknown_scalar_field_skipped() {
        let text = "{\n    x: 1\n    mystery: 42\n    y: 2\n    z: 3\n}\n";
        let mut d = Deserializer::new(text);
        let mut v = Vec3::ZERO;
        assert!(v.deserialize(&mut d));
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
        d.skip_whitespace();
        assert!(d.is_at_end());
    }

    #[test]
    fn test_unknown_nested_block_skipped() {
        let text = "{\n\
                    \x20   x: 1\n\
                    \x20   mystery: \n\
                    \x20   {\n\
                    \x20       inner: \n\
                    \x20       {\n\
                    \x20           a: 9\n\
                    \x20       }\n\
                    \x20       b: 8\n\
                    \x20   }\n\
                    \x20   y: 2\n\
                    \x20   z: 3\n\
                    }\n";
        let mut d = Deserializer::new(text);
        let mut v = Vec3::ZERO;
        assert!(v.deserialize(&mut d));
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
        d.skip_whitespace();
        assert!(d.is_at_end());
    }

    #[test]
    fn test_truncated_block_returns_false() {
        let mut d = Deserializer::new("{\n    x: 1\n");
        let mut v = Vec3::ZERO;
        assert!(!v.deserialize(&mut d));
        // The recognized prefix was still applied.
        assert_eq!(v.x, 1.0);
    }

    #[test]
    fn test_bad_number_leaves_value() {
        let mut d = Deserializer::new("{\n    x: pancake\n    y: 2\n}\n");
        let mut v = Vec2::new(7.0, 0.0);
        assert!(v.deserialize(&mut d));
        assert_eq!(v, Vec2::new(7.0, 2.0));
    }

    #[test]
    fn test_rewind_allows_second_pass() {
        let text = "{\n    x: 1\n    y: 2\n}\n";
        let mut d = Deserializer::new(text);

        let start = d.position();
        let mut first = Vec2::ZERO;
        assert!(first.deserialize(&mut d));

        d.set_position(start);
        let mut second = Vec2::ZERO;
        assert!(second.deserialize(&mut d));
        assert_eq!(first, second);
    }

    #[test]
    fn test_bool_forms() {
        for (raw, expected) in [("true", true), ("1", true), ("false", false), ("yes", false)] {
            let mut d = Deserializer::new(raw);
            let mut b = false;
            assert!(b.deserialize(&mut d));
            assert_eq!(b, expected, "raw input {:?}", raw);
        }
    }
}
