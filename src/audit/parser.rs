use super::types::{AuditEntry, ParseFailure};
use serde_json::Value;
use std::io::BufRead;

/// Parse one line of an audit trail.
///
/// Each line yields exactly one of an entry or a failure; nothing here panics
/// or returns early on bad input.
pub fn parse_line(
    source: &str,
    line_number: usize,
    line: &str,
) -> Result<AuditEntry, ParseFailure> {
    let fail = |reason: String| ParseFailure {
        source: source.to_string(),
        line_number,
        reason,
    };

    let line = line.trim();
    if line.is_empty() {
        return Err(fail("empty line".to_string()));
    }

    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Ok(AuditEntry::from_object(map)),
        Ok(other) => Err(fail(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(fail(format!("invalid JSON: {}", e))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Iterator over the parse outcomes of a line-oriented audit source.
///
/// Yields `Ok(outcome)` for every line and `Err` only when the underlying
/// reader fails, after which iteration stops.
pub struct AuditLogReader<R> {
    source: String,
    reader: R,
    line_buffer: Vec<u8>,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> AuditLogReader<R> {
    pub fn new(source: impl Into<String>, reader: R) -> Self {
        Self {
            source: source.into(),
            reader,
            line_buffer: Vec::new(),
            line_number: 0,
            done: false,
        }
    }

    /// Number of lines read so far
    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for AuditLogReader<R> {
    type Item = std::io::Result<Result<AuditEntry, ParseFailure>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.line_buffer.clear();
        match self.reader.read_until(b'\n', &mut self.line_buffer) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                let outcome = match std::str::from_utf8(&self.line_buffer) {
                    Ok(line) => parse_line(&self.source, self.line_number, line),
                    Err(e) => Err(ParseFailure {
                        source: self.source.clone(),
                        line_number: self.line_number,
                        reason: format!("invalid UTF-8: {}", e),
                    }),
                };
                Some(Ok(outcome))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
