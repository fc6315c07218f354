//! JSON text formatter.
//!
//! A [`serde_json::ser::Formatter`] covering compact and indented output with
//! configurable item/key separators and optional `\uXXXX` escaping of
//! non-ASCII characters.

use std::io::{self, Write};

use serde_json::ser::Formatter;

/// Formatter used by the output encoder.
///
/// # Example
///
/// ```
/// use jsonresponse_core::JsonFormatter;
/// use serde::Serialize;
/// use serde_json::json;
///
/// let mut out = Vec::new();
/// let formatter = JsonFormatter::compact().with_separators(",  ", ":  ");
/// let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
/// json!(["a", {"b": 1}]).serialize(&mut ser).unwrap();
///
/// assert_eq!(String::from_utf8(out).unwrap(), r#"["a",  {"b":  1}]"#);
/// ```
#[derive(Debug, Clone)]
pub struct JsonFormatter<'a> {
    indent: Option<&'a [u8]>,
    item_separator: &'a [u8],
    key_separator: &'a [u8],
    ensure_ascii: bool,
    current_indent: usize,
    has_value: bool,
}

impl JsonFormatter<'static> {
    /// Single-line output with `", "` and `": "` separators.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            indent: None,
            item_separator: b", ",
            key_separator: b": ",
            ensure_ascii: false,
            current_indent: 0,
            has_value: false,
        }
    }
}

impl<'a> JsonFormatter<'a> {
    /// Multi-line output, one value per line, using `indent` per level.
    #[must_use]
    pub fn pretty(indent: &'a [u8]) -> Self {
        Self {
            indent: Some(indent),
            item_separator: b",",
            key_separator: b": ",
            ensure_ascii: false,
            current_indent: 0,
            has_value: false,
        }
    }

    /// Replaces the item and key separators.
    #[must_use]
    pub fn with_separators(self, item: &'a str, key: &'a str) -> JsonFormatter<'a> {
        JsonFormatter {
            item_separator: item.as_bytes(),
            key_separator: key.as_bytes(),
            ..self
        }
    }

    /// Escapes every non-ASCII character as `\uXXXX`.
    #[must_use]
    pub fn with_ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.ensure_ascii = ensure_ascii;
        self
    }

    fn open<W: ?Sized + Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(bracket)
    }

    fn close<W: ?Sized + Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.current_indent -= 1;
        if let Some(indent) = self.indent {
            if self.has_value {
                writer.write_all(b"\n")?;
                write_indent(writer, self.current_indent, indent)?;
            }
        }
        writer.write_all(bracket)
    }

    fn begin_entry<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if !first {
            writer.write_all(self.item_separator)?;
        }
        if let Some(indent) = self.indent {
            writer.write_all(b"\n")?;
            write_indent(writer, self.current_indent, indent)?;
        }
        Ok(())
    }
}

impl Formatter for JsonFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"[")
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.begin_entry(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"{")
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.begin_entry(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.key_separator)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if !self.ensure_ascii {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..index])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

fn write_indent<W: ?Sized + Write>(writer: &mut W, depth: usize, indent: &[u8]) -> io::Result<()> {
    for _ in 0..depth {
        writer.write_all(indent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::{json, Value};

    fn render(value: &Value, formatter: JsonFormatter<'_>) -> String {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut ser).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_compact_spacing() {
        let value = json!({"data": [1, {"a": null}, []], "err": 0});
        assert_eq!(
            render(&value, JsonFormatter::compact()),
            r#"{"data": [1, {"a": null}, []], "err": 0}"#
        );
    }

    #[test]
    fn test_tight_separators() {
        let value = json!({"data": [1, 2], "err": 0});
        assert_eq!(
            render(&value, JsonFormatter::compact().with_separators(",", ":")),
            serde_json::to_string(&value).unwrap()
        );
    }

    #[test]
    fn test_pretty_four_spaces() {
        let value = json!({"data": {"good": "bye"}, "err": 0});
        assert_eq!(
            render(&value, JsonFormatter::pretty(b"    ")),
            "{\n    \"data\": {\n        \"good\": \"bye\"\n    },\n    \"err\": 0\n}"
        );
    }

    #[test]
    fn test_pretty_matches_serde_json_two_spaces() {
        let value = json!({"a": [1, 2, {"b": []}], "c": {}});
        assert_eq!(
            render(&value, JsonFormatter::pretty(b"  ")),
            serde_json::to_string_pretty(&value).unwrap()
        );
    }

    #[test]
    fn test_custom_separators() {
        let value = json!(["a", {"b": 1}]);
        assert_eq!(
            render(&value, JsonFormatter::compact().with_separators(",  ", ":  ")),
            r#"["a",  {"b":  1}]"#
        );
    }

    #[test]
    fn test_ensure_ascii() {
        let value = json!({"name": "Zoë 😀"});
        assert_eq!(
            render(&value, JsonFormatter::compact().with_ensure_ascii(true)),
            r#"{"name": "Zo\u00eb \ud83d\ude00"}"#
        );
        assert_eq!(
            render(&value, JsonFormatter::compact()),
            r#"{"name": "Zoë 😀"}"#
        );
    }

    #[test]
    fn test_ensure_ascii_keeps_escapes() {
        let value = json!("é\"\n");
        let text = render(&value, JsonFormatter::compact().with_ensure_ascii(true));
        assert_eq!(text, r#""\u00e9\"\n""#);
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), value);
    }
}
