// Words excluded from keyword analysis: common English function words, boilerplate
// web copy, and identifiers that leak in from inline scripts.

use std::collections::HashSet;
use std::sync::LazyLock;

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "cannot", "could", "did", "do", "does", "doing", "down", "during",
    "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into",
    "is", "it", "its", "itself", "me", "more", "most", "my", "myself", "no", "nor", "not",
    "of", "off", "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves",
    "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "with",
    "would", "you", "your", "yours", "yourself", "yourselves",
];

const WEB: &[&str] = &[
    "site", "website", "page", "copyright", "rights", "reserved", "loading", "menu", "home",
    "contact", "login", "sign", "click", "read", "view", "details",
];

const CODE: &[&str] = &[
    "const", "var", "let", "function", "class", "import", "export", "return", "true",
    "false", "null", "undefined", "async", "await", "console", "log", "window", "document",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ENGLISH
        .iter()
        .chain(WEB)
        .chain(CODE)
        .copied()
        .collect()
});

/// True if `word` (already lowercased) never counts as a content word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}
