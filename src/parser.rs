//! Classification and splitting of a raw command line.
//!
//! A line is turned into an [`ExecRequest`] in three steps:
//! 1. a trailing `&` is stripped and recorded as the background flag;
//! 2. the line is scanned left to right for the first `|`, `>` or `<`;
//! 3. the text on either side of that operator is tokenized on its own.
//!
//! Operators are recognized by their character alone. There is no quoting,
//! so an operator inside what was meant as an argument is still an operator.

use crate::command::{Argv, ExecRequest, Shape};
use crate::error::ParseError;
use crate::lexer::split_into_tokens;

/// Marks a line that should run without the shell waiting for it.
pub const BACKGROUND_MARKER: char = '&';

/// The three operators that split a line in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `|`
    Pipe,
    /// `>`
    RedirectOut,
    /// `<`
    RedirectIn,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '|' => Some(Operator::Pipe),
            '>' => Some(Operator::RedirectOut),
            '<' => Some(Operator::RedirectIn),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Pipe => '|',
            Operator::RedirectOut => '>',
            Operator::RedirectIn => '<',
        }
    }
}

/// How much validation [`parse_line`] applies to malformed lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// No validation: empty segments become empty argument vectors and fail
    /// later as "not found" inside the child.
    #[default]
    Permissive,
    /// Reject empty segments around an operator and operators at the end of the line.
    Strict,
}

/// Remove a trailing background marker.
///
/// Returns the remaining line and whether the marker was present. Only the
/// very last character is inspected, so `ls & ` is not a background line.
pub fn strip_background(line: &str) -> (&str, bool) {
    match line.strip_suffix(BACKGROUND_MARKER) {
        Some(rest) => (rest, true),
        None => (line, false),
    }
}

/// Find the leftmost operator and its byte index.
///
/// The last character of the line is never considered, since an operator
/// there would have nothing on its right-hand side.
pub fn classify(line: &str) -> Option<(Operator, usize)> {
    let last = line.char_indices().next_back().map(|(idx, _)| idx)?;
    line.char_indices()
        .take_while(|&(idx, _)| idx < last)
        .find_map(|(idx, c)| Operator::from_char(c).map(|op| (op, idx)))
}

/// Split `line` around the single-byte operator at `index` and tokenize both halves.
///
/// The operator itself belongs to neither side.
pub fn split_at_operator(line: &str, index: usize) -> (Argv, Argv) {
    let left = &line[..index];
    let right = &line[index + 1..];
    (
        split_into_tokens(left).into_iter().collect(),
        split_into_tokens(right).into_iter().collect(),
    )
}

/// Turn a line (without its newline) into an execution request.
pub fn parse_line(line: &str, mode: ParseMode) -> Result<ExecRequest, ParseError> {
    let (line, background) = strip_background(line);

    if mode == ParseMode::Strict {
        if let Some(op) = line.chars().next_back().and_then(Operator::from_char) {
            return Err(ParseError::TrailingOperator(op.symbol()));
        }
    }

    let shape = match classify(line) {
        None => Shape::Plain(split_into_tokens(line).into_iter().collect()),
        Some((op, index)) => {
            let (left, right) = split_at_operator(line, index);
            if mode == ParseMode::Strict {
                if left.is_empty() {
                    return Err(ParseError::MissingLeft(op.symbol()));
                }
                if right.is_empty() {
                    return Err(ParseError::MissingRight(op.symbol()));
                }
            }
            match op {
                Operator::Pipe => Shape::Pipe { left, right },
                Operator::RedirectOut => Shape::RedirectOut {
                    command: left,
                    target: right,
                },
                Operator::RedirectIn => Shape::RedirectIn {
                    command: left,
                    target: right,
                },
            }
        }
    };

    Ok(ExecRequest { shape, background })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(words: &[&str]) -> Argv {
        words.iter().copied().collect()
    }

    fn parse(line: &str) -> ExecRequest {
        parse_line(line, ParseMode::Permissive).unwrap()
    }

    #[test]
    fn test_plain_command() {
        let request = parse("ls -la");
        assert_eq!(request, ExecRequest::foreground(Shape::Plain(argv(&["ls", "-la"]))));
    }

    #[test]
    fn test_pipe() {
        let request = parse("ls | wc -l");
        assert!(!request.background);
        assert_eq!(
            request.shape,
            Shape::Pipe {
                left: argv(&["ls"]),
                right: argv(&["wc", "-l"]),
            }
        );
    }

    #[test]
    fn test_redirect_out() {
        let request = parse("echo hi > out.txt");
        assert_eq!(
            request.shape,
            Shape::RedirectOut {
                command: argv(&["echo", "hi"]),
                target: argv(&["out.txt"]),
            }
        );
    }

    #[test]
    fn test_redirect_in_background() {
        let request = parse("sort < in.txt &");
        assert!(request.background);
        assert_eq!(
            request.shape,
            Shape::RedirectIn {
                command: argv(&["sort"]),
                target: argv(&["in.txt"]),
            }
        );
    }

    #[test]
    fn test_background_marker_never_reaches_argv() {
        let request = parse("sleep 5&");
        assert!(request.background);
        assert_eq!(request.shape, Shape::Plain(argv(&["sleep", "5"])));
    }

    #[test]
    fn test_only_last_character_marks_background() {
        let request = parse("echo a&b");
        assert!(!request.background);
        assert_eq!(request.shape, Shape::Plain(argv(&["echo", "a&b"])));

        let request = parse("sleep 1 & ");
        assert!(!request.background);
        assert_eq!(request.shape, Shape::Plain(argv(&["sleep", "1", "&"])));
    }

    #[test]
    fn test_operators_need_no_surrounding_spaces() {
        let request = parse("cat<in.txt");
        assert_eq!(
            request.shape,
            Shape::RedirectIn {
                command: argv(&["cat"]),
                target: argv(&["in.txt"]),
            }
        );
    }

    #[test]
    fn test_leftmost_operator_wins() {
        let request = parse("cat < in.txt | wc");
        assert_eq!(
            request.shape,
            Shape::RedirectIn {
                command: argv(&["cat"]),
                target: argv(&["in.txt", "|", "wc"]),
            }
        );

        let request = parse("ls | grep x > out");
        assert_eq!(
            request.shape,
            Shape::Pipe {
                left: argv(&["ls"]),
                right: argv(&["grep", "x", ">", "out"]),
            }
        );
    }

    #[test]
    fn test_operator_in_last_position_is_plain_text() {
        assert_eq!(parse("ls |").shape, Shape::Plain(argv(&["ls", "|"])));
        assert_eq!(parse(">").shape, Shape::Plain(argv(&[">"])));
        assert_eq!(classify("ls >"), None);
    }

    #[test]
    fn test_blank_line_yields_empty_plain_command() {
        let request = parse("     ");
        assert_eq!(request, ExecRequest::foreground(Shape::Plain(Argv::default())));
        assert_eq!(parse("").shape, Shape::Plain(Argv::default()));
    }

    #[test]
    fn test_lone_marker_is_empty_background_command() {
        let request = parse("&");
        assert!(request.background);
        assert_eq!(request.shape, Shape::Plain(Argv::default()));
    }

    #[test]
    fn test_permissive_keeps_empty_segments() {
        assert_eq!(
            parse("| wc").shape,
            Shape::Pipe {
                left: Argv::default(),
                right: argv(&["wc"]),
            }
        );
        assert_eq!(
            parse("ls >  ").shape,
            Shape::RedirectOut {
                command: argv(&["ls"]),
                target: Argv::default(),
            }
        );
    }

    #[test]
    fn test_strict_rejects_malformed_lines() {
        assert_eq!(
            parse_line("| wc", ParseMode::Strict),
            Err(ParseError::MissingLeft('|'))
        );
        assert_eq!(
            parse_line("ls >  ", ParseMode::Strict),
            Err(ParseError::MissingRight('>'))
        );
        assert_eq!(
            parse_line("ls <&", ParseMode::Strict),
            Err(ParseError::TrailingOperator('<'))
        );
        assert!(parse_line("ls | wc -l &", ParseMode::Strict).is_ok());
    }

    #[test]
    fn test_split_discards_operator() {
        let (left, right) = split_at_operator("a b|c d", 3);
        assert_eq!(left, argv(&["a", "b"]));
        assert_eq!(right, argv(&["c", "d"]));
    }

    #[test]
    fn test_non_ascii_words_survive() {
        let request = parse("echo héllo > fïle");
        assert_eq!(
            request.shape,
            Shape::RedirectOut {
                command: argv(&["echo", "héllo"]),
                target: argv(&["fïle"]),
            }
        );
    }
}
