//! Tokenization of a command line into words.
//!
//! The shell has no quoting, escaping or substitutions: a word is simply a
//! maximal run of characters that are not the delimiter.

/// The only character that separates words.
pub const DELIMITER: char = ' ';

/// Split `line` into its words, left to right.
///
/// Runs of consecutive delimiters collapse, so no empty word is ever produced.
/// Tabs and other whitespace are ordinary characters. An empty or all-space
/// line yields no words at all.
pub fn split_into_tokens(line: &str) -> Vec<&str> {
    line.split(DELIMITER).filter(|word| !word.is_empty()).collect()
}
