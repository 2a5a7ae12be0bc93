//! Text format writer
//!
//! Emits the indented `key: value` block format:
//!
//! ```text
//! {
//!     pos:
//!     {
//!         x: 1
//!         y: 2
//!         z: 3
//!     }
//!
//!     sprite: 4
//! }
//! ```
//!
//! Scalar values sit on the key's line; composite values open a nested
//! block on the next line. Indentation is recomputed from a single depth
//! counter, never stored as accumulated whitespace.
//!
//! No escaping is performed: keys and scalar text must not contain `:`
//! or newlines, or the output will not round-trip. That is a constraint
//! of the format, not something the writer repairs.

use glam::{Vec2, Vec3, Vec4};

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Accumulates output text plus the current nesting depth.
pub struct Serializer {
    out: String,
    indent: usize,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    /// The output produced so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consume the serializer and return the output text.
    pub fn finish(self) -> String {
        self.out
    }

    /// Write a named field. Inline values continue on the key's line;
    /// composite values get a newline and then a nested block.
    pub fn field<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.write_indent();
        self.out.push_str(key);
        self.out.push_str(": ");
        if !T::INLINE {
            self.out.push('\n');
        }
        value.serialize(self);
        self.out.push('\n');
    }

    /// Open a nested block: an indented `{` line, then one level deeper.
    pub fn begin_block(&mut self) {
        self.write_indent();
        self.out.push_str("{\n");
        self.indent += 1;
    }

    /// Close the current block: back one level, then an indented `}` line.
    pub fn end_block(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.write_indent();
        self.out.push_str("}\n");
    }

    /// Append raw value text. Used by inline [`Serialize`] impls.
    pub fn write_raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn write_indent(&mut self) {
        let spaces = self.indent * INDENT_WIDTH;
        self.out.extend(std::iter::repeat(' ').take(spaces));
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// A value that can be written to the text format.
///
/// `INLINE` types render on the key's own line; everything else writes a
/// nested block via [`Serializer::begin_block`]/[`Serializer::end_block`].
pub trait Serialize {
    const INLINE: bool = false;

    fn serialize(&self, s: &mut Serializer);
}

impl Serialize for bool {
    const INLINE: bool = true;

    fn serialize(&self, s: &mut Serializer) {
        s.write_raw(if *self { "true" } else { "false" });
    }
}

impl Serialize for i32 {
    const INLINE: bool = true;

    fn serialize(&self, s: &mut Serializer) {
        s.write_raw(&self.to_string());
    }
}

impl Serialize for u32 {
    const INLINE: bool = true;

    fn serialize(&self, s: &mut Serializer) {
        s.write_raw(&self.to_string());
    }
}

impl Serialize for f32 {
    const INLINE: bool = true;

    fn serialize(&self, s: &mut Serializer) {
        s.write_raw(&self.to_string());
    }
}

impl Serialize for str {
    const INLINE: bool = true;

    fn serialize(&self, s: &mut Serializer) {
        s.write_raw(self);
    }
}

impl Serialize for String {
    const INLINE: bool = true;

    fn serialize(&self, s: &mut Serializer) {
        s.write_raw(self);
    }
}

impl Serialize for Vec2 {
    fn serialize(&self, s: &mut Serializer) {
        s.begin_block();
        s.field("x", &self.x);
        s.field("y", &self.y);
        s.end_block();
    }
}

impl Serialize for Vec3 {
    fn serialize(&self, s: &mut Serializer) {
        s.begin_block();
        s.field("x", &self.x);
        s.field("y", &self.y);
        s.field("z", &self.z);
        s.end_block();
    }
}

impl Serialize for Vec4 {
    fn serialize(&self, s: &mut Serializer) {
        s.begin_block();
        s.field("x", &self.x);
        s.field("y", &self.y);
        s.field("z", &self.z);
        s.field("w", &self.w);
        s.end_block();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_fields() {
        let mut s = Serializer::new();
        s.begin_block();
        s.field("sprite", &4);
        s.field("enabled", &true);
        s.field("name", "monk");
        s.end_block();

        assert_eq!(
            s.as_str(),
            "{\n    sprite: 4\n    enabled: true\n    name: monk\n}\n"
        );
    }

    #[test]
    fn test_vec3_block_shape() {
        let mut s = Serializer::new();
        Vec3::new(1.0, 2.0, 3.0).serialize(&mut s);

        assert_eq!(s.as_str(), "{\n    x: 1\n    y: 2\n    z: 3\n}\n");
    }

    #[test]
    fn test_nested_block_indentation() {
        let mut s = Serializer::new();
        s.begin_block();
        s.field("pos", &Vec3::new(1.0, 2.0, 3.0));
        s.end_block();

        let expected = "{\n\
                        \x20   pos: \n\
                        \x20   {\n\
                        \x20       x: 1\n\
                        \x20       y: 2\n\
                        \x20       z: 3\n\
                        \x20   }\n\
                        \n\
                        }\n";
        assert_eq!(s.as_str(), expected);
    }

    #[test]
    fn test_indent_recomputed_from_depth() {
        let mut s = Serializer::new();
        s.begin_block();
        s.begin_block();
        s.field("deep", &1);
        s.end_block();
        s.end_block();

        // Two levels in: 8 spaces. Closing braces step back one level each.
        assert!(s.as_str().contains("\n        deep: 1\n"));
        assert!(s.as_str().ends_with("    }\n}\n"));
    }
}
