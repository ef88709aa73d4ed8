use std::borrow::Cow;

use crate::core::error::{Result, StoreError};

/// The `LineRewriter` trait defines how a single line of text is transformed
/// during an update pass.
///
/// The store feeds it one line at a time, without the line terminator, and
/// writes whatever comes back to the replacement file.
pub trait LineRewriter {
    /// Rewrites `line` and reports how many replacements were made.
    ///
    /// Implementations return `Cow::Borrowed` when nothing changed so the
    /// common no-match case does not allocate.
    fn rewrite_line<'a>(&self, line: &'a str) -> (Cow<'a, str>, usize);
}

/// A literal find-and-replace of `old` with `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    old: String,
    new: String,
}

impl Substitution {
    /// Builds a substitution, rejecting an empty search string since there
    /// would be no way to advance past an empty match.
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Result<Self> {
        let old = old.into();
        if old.is_empty() {
            return Err(StoreError::EmptySearchText);
        }
        Ok(Self {
            old,
            new: new.into(),
        })
    }
}

impl LineRewriter for Substitution {
    /// Replaces every occurrence of the search text in `line`.
    ///
    /// After each replacement the search resumes right after the inserted
    /// text, never inside it, so a replacement that contains the search text
    /// (`"a"` -> `"bb"` or `"a"` -> `"aa"`) is not matched again.
    fn rewrite_line<'a>(&self, line: &'a str) -> (Cow<'a, str>, usize) {
        let Some(first) = line.find(&self.old) else {
            return (Cow::Borrowed(line), 0);
        };

        let mut text = line.to_string();
        let mut count = 0;
        let mut pos = Some(first);

        while let Some(found) = pos {
            text.replace_range(found..found + self.old.len(), &self.new);
            count += 1;
            let resume = found + self.new.len();
            pos = text[resume..].find(&self.old).map(|offset| resume + offset);
        }

        (Cow::Owned(text), count)
    }
}
