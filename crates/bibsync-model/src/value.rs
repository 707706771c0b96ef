//! Encoding of field values that mix literal text and macro references.
//!
//! A stored value is a single string: `#name#` is a reference to the
//! `@string` macro `name` and `##` is a literal `#`. Every other character is
//! literal text. The BibTeX reader escapes literal text with [`escape_text`],
//! so `{Issue #3#}` and the concatenation `{Issue } # 3` stay distinct.

use std::borrow::Cow;

/// One piece of a stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuePart<'a> {
    Text(Cow<'a, str>),
    Macro(&'a str),
}

/// Escape literal text for storage.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if text.contains('#') {
        Cow::Owned(text.replace('#', "##"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Encode a macro reference for storage.
pub fn macro_ref(name: &str) -> String {
    format!("#{}#", name)
}

/// Split a stored value into text and macro parts.
///
/// A `#` that neither starts `##` nor a well-formed `#name#` is read as
/// literal text, so hand-built values without escapes still decode.
pub fn value_parts(value: &str) -> Vec<ValuePart<'_>> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut rest = value;

    while let Some(idx) = rest.find('#') {
        text.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        if let Some(tail) = after.strip_prefix('#') {
            text.push('#');
            rest = tail;
            continue;
        }

        let name_len = after.bytes().take_while(|&b| is_macro_byte(b)).count();
        if name_len > 0 && after.as_bytes().get(name_len) == Some(&b'#') {
            if !text.is_empty() {
                parts.push(ValuePart::Text(Cow::Owned(std::mem::take(&mut text))));
            }
            parts.push(ValuePart::Macro(&after[..name_len]));
            rest = &after[name_len + 1..];
        } else {
            text.push('#');
            rest = after;
        }
    }

    text.push_str(rest);
    if !text.is_empty() {
        parts.push(ValuePart::Text(Cow::Owned(text)));
    }
    parts
}

/// Human-readable form: literal text as is, macros by name.
pub fn display(value: &str) -> String {
    value_parts(value)
        .into_iter()
        .map(|part| match part {
            ValuePart::Text(text) => text.into_owned(),
            ValuePart::Macro(name) => name.to_string(),
        })
        .collect()
}

/// Bytes allowed in a macro name.
pub(crate) fn is_macro_byte(b: u8) -> bool {
    !b.is_ascii_whitespace()
        && !matches!(b, b'=' | b'{' | b'}' | b',' | b'#' | b'"' | b'(' | b')' | b'@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(t: &str) -> ValuePart<'_> {
        ValuePart::Text(Cow::Borrowed(t))
    }

    #[test]
    fn test_escaped_hash_is_text() {
        assert_eq!(value_parts("Issue ##3## fixed"), vec![text("Issue #3# fixed")]);
    }

    #[test]
    fn test_macro_between_text() {
        assert_eq!(
            value_parts("Vol. #v# x"),
            vec![text("Vol. "), ValuePart::Macro("v"), text(" x")]
        );
    }

    #[test]
    fn test_adjacent_macro_and_escape() {
        assert_eq!(
            value_parts("#a####b#"),
            vec![ValuePart::Macro("a"), text("#"), ValuePart::Macro("b")]
        );
    }

    #[test]
    fn test_stray_hash_is_text() {
        assert_eq!(value_parts("C# in depth"), vec![text("C# in depth")]);
    }

    #[test]
    fn test_escape_then_decode() {
        let stored = format!("{}{}", escape_text("see #jan# here"), macro_ref("feb"));
        assert_eq!(
            value_parts(&stored),
            vec![text("see #jan# here"), ValuePart::Macro("feb")]
        );
        assert_eq!(display(&stored), "see #jan# herefeb");
    }
}
