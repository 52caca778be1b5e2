use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Default text substituted for unsupported symbols.
pub const DEFAULT_PLACEHOLDER: &str = "[]";

/// Note that can be appended to messages in which symbols were replaced.
pub const DEFAULT_UNSUPPORTED_NOTE: &str =
    "[] = Emojis are not supported by FreeMobile API. Try to avoid them.";

/// Symbols known to survive the gateway unchanged.
const DEFAULT_ALLOWED: &[&str] = &[
    "\u{263A}",
    "\u{263A}\u{FE0F}",
    "\u{2639}",
    "\u{2639}\u{FE0F}",
    "\u{2665}",
    "\u{2665}\u{FE0F}",
    "\u{2764}",
    "\u{2764}\u{FE0F}",
    "\u{2600}",
    "\u{2600}\u{FE0F}",
    "\u{2601}",
    "\u{2601}\u{FE0F}",
    "\u{260E}",
    "\u{260E}\u{FE0F}",
    "\u{2709}",
    "\u{2709}\u{FE0F}",
    "\u{270C}",
    "\u{270C}\u{FE0F}",
    "\u{2714}",
    "\u{2714}\u{FE0F}",
    "\u{2716}",
    "\u{2716}\u{FE0F}",
    "\u{2605}",
    "\u{00A9}",
    "\u{00AE}",
    "\u{2122}",
];

// A pictographic symbol, then an optional variation selector, then an optional keycap.
static SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Emoji_Presentation}\p{Extended_Pictographic}][\x{FE0E}\x{FE0F}]?\x{20E3}?")
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
/// Exact symbol sequences exempt from placeholder replacement.
///
/// Entries are compared against the whole matched sequence, so `"\u{2764}"` and
/// `"\u{2764}\u{FE0F}"` are distinct entries.
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    /// An allow-list that lets no symbol through.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    /// Add one symbol sequence.
    pub fn insert(&mut self, symbol: impl Into<String>) -> bool {
        self.0.insert(symbol.into())
    }

    /// Builder-style variant of [`AllowList::insert`].
    pub fn with(mut self, symbol: impl Into<String>) -> Self {
        self.insert(symbol);
        self
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for AllowList {
    /// The built-in list of symbols the gateway is known to carry.
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED.iter().copied())
    }
}

impl<S: Into<String>> Extend<S> for AllowList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of [`Sanitizer::sanitize`].
pub struct Sanitized {
    pub text: String,
    /// Number of symbol sequences replaced by the placeholder.
    pub replaced: usize,
}

#[derive(Debug, Clone)]
/// Masks pictographic symbols the gateway cannot carry.
///
/// Every leftmost, non-overlapping match of "pictographic symbol, optional variation
/// selector, optional keycap" is kept when the whole sequence is allow-listed and
/// replaced by the placeholder otherwise. All other text is left untouched.
///
/// The placeholder is inserted verbatim and never re-scanned; it should not contain
/// pictographic symbols itself, otherwise sanitizing twice is not a no-op.
pub struct Sanitizer {
    allow_list: AllowList,
    placeholder: String,
}

impl Sanitizer {
    pub fn new(allow_list: AllowList, placeholder: impl Into<String>) -> Self {
        Self {
            allow_list,
            placeholder: placeholder.into(),
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn sanitize(&self, input: &str) -> Sanitized {
        let mut text = String::with_capacity(input.len());
        let mut replaced = 0;
        let mut last = 0;

        for symbol in SYMBOL.find_iter(input) {
            text.push_str(&input[last..symbol.start()]);
            if self.allow_list.contains(symbol.as_str()) {
                text.push_str(symbol.as_str());
            } else {
                text.push_str(&self.placeholder);
                replaced += 1;
            }
            last = symbol.end();
        }
        text.push_str(&input[last..]);

        Sanitized { text, replaced }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(AllowList::default(), DEFAULT_PLACEHOLDER)
    }
}
