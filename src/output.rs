//! # Manifest Output
//!
//! The expanded manifest is consumed by Composer and diffed by humans in CI
//! logs, so it is written in the exact shape PHP's `json_encode` produces with
//! `JSON_PRETTY_PRINT | JSON_UNESCAPED_SLASHES | JSON_HEX_TAG | JSON_HEX_APOS |
//! JSON_HEX_AMP | JSON_HEX_QUOT`:
//!
//! - four-space indentation, `": "` between keys and values;
//! - `/` is never escaped;
//! - `<`, `>`, `&`, `'` and `"` are written as `\u003C`, `\u003E`, `\u0026`,
//!   `\u0027` and `\u0022`;
//! - non-ASCII characters are written as lowercase `\uXXXX` escapes (UTF-16
//!   surrogate pairs outside the BMP);
//! - no trailing newline.
//!
//! PHP reads manifests into associative arrays, which do not remember whether
//! they were JSON objects. An object with no entries, or whose keys are exactly
//! `"0"`, `"1"`, ... in order, is therefore written back as a list.

use std::fs;
use std::io;
use std::path::Path;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::Serialize;
use serde_json::ser::{CharEscape, Formatter, PrettyFormatter};
use serde_json::{Map, Serializer, Value};

use crate::error::Result;

/// `serde_json` formatter reproducing PHP's escaping rules.
pub struct ManifestFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl ManifestFormatter<'_> {
    pub fn new() -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(b"    "),
        }
    }
}

impl Default for ManifestFormatter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for ManifestFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if !needs_unicode_escape(ch) {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            write_unicode_escape(writer, ch)?;
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        char_escape: CharEscape,
    ) -> io::Result<()> {
        match char_escape {
            CharEscape::Quote => writer.write_all(b"\\u0022"),
            other => self.pretty.write_char_escape(writer, other),
        }
    }
}

fn needs_unicode_escape(ch: char) -> bool {
    matches!(ch, '<' | '>' | '&' | '\'') || !ch.is_ascii()
}

fn write_unicode_escape<W: ?Sized + io::Write>(writer: &mut W, ch: char) -> io::Result<()> {
    let mut units = [0u16; 2];
    for unit in ch.encode_utf16(&mut units) {
        if ch.is_ascii() {
            write!(writer, "\\u{:04X}", unit)?;
        } else {
            write!(writer, "\\u{:04x}", unit)?;
        }
    }
    Ok(())
}

/// Serializes a manifest with the container shapes of a PHP array.
struct PhpArray<'a>(&'a Value);

impl Serialize for PhpArray<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.0 {
            Value::Object(entries) if is_list_like(entries) => {
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for item in entries.values() {
                    seq.serialize_element(&PhpArray(item))?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(key, &PhpArray(item))?;
                }
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&PhpArray(item))?;
                }
                seq.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}

/// Whether PHP would encode these entries as a JSON list.
fn is_list_like(entries: &Map<String, Value>) -> bool {
    entries
        .keys()
        .enumerate()
        .all(|(index, key)| *key == index.to_string())
}

/// Render a manifest as PHP-compatible pretty JSON.
pub fn to_manifest_string(value: &Value) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, ManifestFormatter::new());
    PhpArray(value).serialize(&mut serializer)?;
    // The formatter only ever writes ASCII.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write a manifest to `path`, replacing any existing file.
pub fn write_manifest(path: &Path, value: &Value) -> Result<()> {
    let content = to_manifest_string(value)?;
    fs::write(path, content)?;
    Ok(())
}
