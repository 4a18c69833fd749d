//! Annotation mini-language.
//!
//! An annotation is a comma-separated list of entries. Each entry is either a
//! bare key (`skip`) or a `key=value` pair. Values may be wrapped in single
//! quotes so they can contain commas (`alias='foo,bar'`); `\'` is a literal
//! quote anywhere in the input.
//!
//! Parsing is a single left-to-right scan with one character of lookahead.

use indexmap::IndexMap;
use thiserror::Error;

const SEP: char = ',';
const QUOTE: char = '\'';
const ASSIGN: char = '=';
const ESCAPE: char = '\\';

/// Parsed annotation: every key with the values it was given, in the order
/// the keys first appeared.
pub type Annotations = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// A closing quote was followed by something other than `,` or end of input.
    #[error("`{input}` has an unexpected character {found:?} at position {position}")]
    UnexpectedChar {
        input: String,
        position: usize,
        found: char,
    },
    #[error("`{input}` is not quoted properly")]
    Unterminated { input: String },
}

/// Entry being read: the key, and the value once `=` has been seen.
#[derive(Default)]
struct Entry {
    key: String,
    value: Option<String>,
}

impl Entry {
    fn push(&mut self, ch: char) {
        match self.value {
            Some(ref mut value) => value.push(ch),
            None => self.key.push(ch),
        }
    }

    fn in_value(&self) -> bool {
        self.value.is_some()
    }

    fn commit(&mut self, into: &mut Annotations) {
        let entry = std::mem::take(self);
        let values = into.entry(entry.key).or_default();
        if let Some(value) = entry.value {
            values.push(value);
        }
    }
}

/// Parse one raw annotation string.
///
/// A bare key records the key with no values. The last entry is always
/// committed, so an empty input yields a single empty key.
pub fn parse(raw: &str) -> Result<Annotations, AnnotationError> {
    let mut annotations = Annotations::new();
    let mut entry = Entry::default();
    let mut quoted = false;
    let chars: Vec<char> = raw.chars().collect();

    let mut i = 0;
    while i < chars.len() {
        let mut ch = chars[i];
        let next = chars.get(i + 1).copied();

        if !quoted && ch == SEP {
            entry.commit(&mut annotations);
            i += 1;
            continue;
        }

        // Only the first `=` of an entry is grammar.
        if ch == ASSIGN && !entry.in_value() {
            entry.value = Some(String::new());
            i += 1;
            continue;
        }

        if ch == ESCAPE && next == Some(QUOTE) {
            ch = QUOTE;
            i += 1;
        } else if ch == QUOTE && entry.in_value() {
            if quoted {
                quoted = false;
                match next {
                    None | Some(SEP) => {
                        i += 1;
                        continue;
                    }
                    Some(found) => {
                        return Err(AnnotationError::UnexpectedChar {
                            input: raw.to_string(),
                            position: i + 1,
                            found,
                        });
                    }
                }
            }
            quoted = true;
            i += 1;
            continue;
        }

        entry.push(ch);
        i += 1;
    }

    if quoted {
        return Err(AnnotationError::Unterminated {
            input: raw.to_string(),
        });
    }

    entry.commit(&mut annotations);
    Ok(annotations)
}

/// Reduce parsed annotations to one value per key.
///
/// The first value wins; a key with no value, or an empty first value,
/// becomes `"true"`.
pub fn flatten(annotations: &Annotations) -> IndexMap<String, String> {
    annotations
        .iter()
        .map(|(key, values)| {
            let value = match values.first() {
                Some(v) if !v.is_empty() => v.clone(),
                _ => "true".to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// [`parse`] followed by [`flatten`].
pub fn parse_flat(raw: &str) -> Result<IndexMap<String, String>, AnnotationError> {
    parse(raw).map(|annotations| flatten(&annotations))
}
