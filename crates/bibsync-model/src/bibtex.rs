//! BibTeX reader and canonical writer.
//!
//! Reads entries of the form:
//! ```text
//! @Article{key,
//!   title = {A {GPU} Study},
//!   month = jan # {~1},
//!   year  = 2020,
//! }
//! ```
//! `@string`, `@preamble` and `@comment` blocks are understood; free text
//! between entries is ignored. Values are stored in the encoding of
//! [`crate::value`] so concatenations survive a round trip.

use crate::record::normalize_value;
use crate::value::{ValuePart, escape_text, is_macro_byte, macro_ref, value_parts};
use crate::{Error, ImportPreferences, Record, RecordFormat, RecordSet, Result};

/// BibTeX implementation of [`RecordFormat`].
#[derive(Debug, Clone, Default)]
pub struct BibtexFormat {
    preferences: ImportPreferences,
}

impl BibtexFormat {
    pub fn new(preferences: ImportPreferences) -> Self {
        Self { preferences }
    }

    pub fn preferences(&self) -> &ImportPreferences {
        &self.preferences
    }
}

impl RecordFormat for BibtexFormat {
    fn parse(&self, text: &str) -> Result<RecordSet> {
        let database = Parser::new(text, &self.preferences).parse_database()?;
        tracing::debug!(records = database.len(), "Parsed BibTeX database");
        Ok(database)
    }

    fn write(&self, database: &RecordSet) -> String {
        let mut out = String::new();

        if let Some(preamble) = database.preamble() {
            out.push_str(&format!("@Preamble{{{}}}\n\n", format_value(preamble)));
        }

        if !database.strings().is_empty() {
            for (name, value) in database.strings() {
                out.push_str(&format!("@String{{{} = {}}}\n", name, format_value(value)));
            }
            out.push('\n');
        }

        for record in database.records() {
            out.push_str(&format!(
                "@{}{{{},\n",
                capitalize(record.entry_type()),
                record.citation_key().unwrap_or("")
            ));
            for (name, value) in record.fields() {
                out.push_str(&format!("  {} = {},\n", name, format_value(value)));
            }
            out.push_str("}\n\n");
        }

        for comment in database.comments() {
            out.push_str(&format!("@Comment{{{}}}\n\n", comment));
        }

        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Render a stored value as a BibTeX expression: braced text, bare macro
/// names, joined with `#`.
fn format_value(value: &str) -> String {
    let parts = value_parts(value);
    if parts.is_empty() {
        return "{}".to_string();
    }

    parts
        .into_iter()
        .map(|part| match part {
            ValuePart::Text(text) => format!("{{{}}}", text),
            ValuePart::Macro(name) => name.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" # ")
}

fn capitalize(entry_type: &str) -> String {
    let mut chars = entry_type.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    preferences: &'a ImportPreferences,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, preferences: &'a ImportPreferences) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            preferences,
        }
    }

    fn parse_database(mut self) -> Result<RecordSet> {
        let mut database = RecordSet::empty();

        while let Some(offset) = self.text[self.pos..].find('@') {
            self.pos += offset + 1;

            let entry_type = self.read_while(|b| b.is_ascii_alphanumeric() || b == b'_');
            if entry_type.is_empty() {
                continue;
            }
            self.skip_whitespace();
            let close = match self.peek() {
                Some(b'{') => b'}',
                Some(b'(') => b')',
                // an '@' inside free text, e.g. an e-mail address
                _ => continue,
            };
            self.pos += 1;

            match entry_type.to_lowercase().as_str() {
                "comment" => {
                    let content = self.read_block(close)?.trim();
                    if !content.is_empty() {
                        database.push_comment(content);
                    }
                }
                "preamble" => {
                    let value = self.read_value()?;
                    self.expect_close(close, "@preamble")?;
                    database.set_preamble(Some(normalize_value(&value)));
                }
                "string" => {
                    self.skip_whitespace();
                    let name = self.read_while(is_macro_byte).to_string();
                    if name.is_empty() {
                        return Err(self.error("expected macro name in @string"));
                    }
                    self.expect_byte(b'=', "after @string name")?;
                    let value = self.read_value()?;
                    self.expect_close(close, "@string")?;
                    database.set_string(&name, &normalize_value(&value));
                }
                _ => {
                    let record = self.read_entry(entry_type, close)?;
                    database.push(record);
                }
            }
        }

        Ok(database)
    }

    fn read_entry(&mut self, entry_type: &str, close: u8) -> Result<Record> {
        self.skip_whitespace();
        let key = self.read_while(|b| b != b',' && b != close).trim();
        let mut record = Record::new(entry_type);
        record.set_citation_key(Some(key));

        match self.peek() {
            None => {
                return Err(Error::UnexpectedEof {
                    context: format!("@{} entry", entry_type),
                });
            }
            Some(b) if b == close => {
                self.pos += 1;
                return Ok(record);
            }
            Some(_) => self.pos += 1,
        }

        loop {
            self.skip_while(|b| b.is_ascii_whitespace() || b == b',');
            match self.peek() {
                None => {
                    return Err(Error::UnexpectedEof {
                        context: format!("entry '{}'", key),
                    });
                }
                Some(b) if b == close => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {}
            }

            let name = self.read_while(is_macro_byte).to_string();
            if name.is_empty() {
                return Err(self.error(&format!("expected field name in entry '{}'", key)));
            }
            self.expect_byte(b'=', &format!("after field '{}'", name))?;
            let value = self.read_value()?;
            record.set_field(&name, &self.normalize_field(&name, &value));
        }

        Ok(record)
    }

    fn normalize_field(&self, name: &str, value: &str) -> String {
        let value = normalize_value(value);
        if self.preferences.is_keyword_field(name) {
            self.preferences.normalize_keywords(&value)
        } else {
            value
        }
    }

    /// Read a value expression: parts joined by `#`.
    fn read_value(&mut self) -> Result<String> {
        let mut value = String::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'{') => {
                    self.pos += 1;
                    value.push_str(&escape_text(self.read_delimited(b'}')?));
                }
                Some(b'"') => {
                    self.pos += 1;
                    value.push_str(&escape_text(self.read_delimited(b'"')?));
                }
                Some(b) if is_macro_byte(b) => {
                    let token = self.read_while(is_macro_byte);
                    if token.bytes().all(|b| b.is_ascii_digit()) {
                        value.push_str(token);
                    } else {
                        value.push_str(&macro_ref(&token.to_lowercase()));
                    }
                }
                Some(_) => return Err(self.error("expected a value")),
                None => {
                    return Err(Error::UnexpectedEof {
                        context: "field value".into(),
                    });
                }
            }

            self.skip_whitespace();
            if self.peek() == Some(b'#') {
                self.pos += 1;
            } else {
                return Ok(value);
            }
        }
    }

    /// Read up to the terminator at brace depth zero. The opening delimiter
    /// has already been consumed.
    fn read_delimited(&mut self, terminator: u8) -> Result<&'a str> {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(b) = self.peek() {
            match b {
                b'{' => depth += 1,
                b'}' if depth > 0 => depth -= 1,
                _ if b == terminator && depth == 0 => {
                    let content = &self.text[start..self.pos];
                    self.pos += 1;
                    return Ok(content);
                }
                _ => {}
            }
            self.pos += 1;
        }

        Err(Error::UnexpectedEof {
            context: "delimited value".into(),
        })
    }

    /// Raw content of a block up to its closing delimiter.
    fn read_block(&mut self, close: u8) -> Result<&'a str> {
        if close == b'}' {
            return self.read_delimited(b'}');
        }
        match self.text[self.pos..].find(')') {
            Some(offset) => {
                let content = &self.text[self.pos..self.pos + offset];
                self.pos += offset + 1;
                Ok(content)
            }
            None => Err(Error::UnexpectedEof {
                context: "@comment".into(),
            }),
        }
    }

    fn expect_close(&mut self, close: u8, context: &str) -> Result<()> {
        self.skip_while(|b| b.is_ascii_whitespace() || b == b',');
        self.expect_byte(close, &format!("to close {}", context))
    }

    fn expect_byte(&mut self, expected: u8, context: &str) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.error(&format!("expected '{}' {}", expected as char, context))),
            None => Err(Error::UnexpectedEof {
                context: context.to_string(),
            }),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        self.skip_while(|b| b.is_ascii_whitespace());
    }

    fn skip_while(&mut self, predicate: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
    }

    fn read_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        self.skip_while(predicate);
        &self.text[start..self.pos]
    }

    fn error(&self, message: &str) -> Error {
        Error::Parse {
            line: self.bytes[..self.pos.min(self.bytes.len())]
                .iter()
                .filter(|&&b| b == b'\n')
                .count()
                + 1,
            message: message.to_string(),
        }
    }
}
