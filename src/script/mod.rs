//! Line-oriented reader for policy scripts and class files.
//!
//! Each physical line is split into words with POSIX shell rules: quotes
//! group words containing spaces, and a `#` outside quotes starts a comment
//! running to the end of the line, even in the middle of a word. Lines that produce no words are
//! skipped. Lines are produced lazily, so a malformed line is only reported
//! once the reader reaches it.

use std::iter::{Enumerate, FusedIterator};
use std::str::Lines;

use crate::error::PolicyError;

/// One non-empty script line, already split into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-indexed physical line number.
    pub number: usize,
    pub tokens: Vec<String>,
}

impl ScriptLine {
    /// The directive name (first token).
    pub fn command(&self) -> &str {
        &self.tokens[0]
    }

    /// Everything after the directive name.
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }
}

/// Lazy iterator over the directives of a script.
///
/// Yields `Err` at most once; after an error the iterator is exhausted.
pub struct ScriptReader<'a> {
    lines: Enumerate<Lines<'a>>,
    failed: bool,
}

impl<'a> ScriptReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate(),
            failed: false,
        }
    }
}

impl Iterator for ScriptReader<'_> {
    type Item = Result<ScriptLine, PolicyError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        for (index, raw) in self.lines.by_ref() {
            let number = index + 1;
            match shlex::split(strip_comment(raw)) {
                Some(tokens) if tokens.is_empty() => continue,
                Some(tokens) => return Some(Ok(ScriptLine { number, tokens })),
                None => {
                    self.failed = true;
                    return Some(Err(PolicyError::ScriptSyntax {
                        line: number,
                        message: "unterminated quote or trailing escape".to_string(),
                    }));
                }
            }
        }

        None
    }
}

impl FusedIterator for ScriptReader<'_> {}

/// Cut `raw` at the first `#` that is neither quoted nor escaped.
///
/// A line whose quote is still open is returned whole so the splitter
/// reports it.
fn strip_comment(raw: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (index, c) in raw.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (None | Some('"'), '\\') => escaped = true,
            (None, '\'' | '"') => quote = Some(c),
            (Some(open), c) if c == open => quote = None,
            (None, '#') => return &raw[..index],
            _ => {}
        }
    }

    raw
}
