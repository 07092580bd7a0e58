use proptest::prelude::*;

use lark_parser::scanner::Scanner;
use lark_parser::token::{Token, TokenKind};

fn scan_all(input: &[u8]) -> Vec<Token> {
    let mut scanner = Scanner::new(input, None);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.scan();
        let end = token.kind == TokenKind::Endmarker;
        tokens.push(token);
        if end {
            break;
        }
    }
    tokens
}

fn scan_count_errors(input: &[u8]) -> (Vec<Token>, usize) {
    use std::cell::RefCell;
    use std::rc::Rc;

    let count = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&count);
    let mut scanner = Scanner::new(
        input,
        Some(Box::new(move |_, _| {
            *sink.borrow_mut() += 1;
        })),
    );

    let mut tokens = Vec::new();
    loop {
        let token = scanner.scan();
        let end = token.kind == TokenKind::Endmarker;
        tokens.push(token);
        if end {
            break;
        }
    }
    let errors = *count.borrow();
    (tokens, errors)
}

// Lexemes that scan cleanly on their own; used to build well-formed-ish
// token streams for the round-trip property.
const VOCAB: &[&str] = &[
    "const", "import", "type", "struct", "as", "true", "false", "null", "func", "interface",
    "embed", "x", "items", "list", "_tmp", "1", "42", "1_000", "0x1f", "0b101", "1.5", ".25",
    "2e10", "\"s\"", "\"a b\"", "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "&&",
    "||", "!", "=", "->", "(", ")", "[", "]", "{", "}", ",", ".", ":", ";", "?", "@",
];

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn parse_terminates_on_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let parsed = lark_parser::parse(&bytes);
        // errors may sit at the endmarker, at most one line past the input
        for err in &parsed.errors {
            prop_assert!(
                (err.pos.line as usize) <= parsed.lines.len(),
                "error at {} with {} lines",
                err.pos,
                parsed.lines.len()
            );
        }
    }

    #[test]
    fn parsing_twice_is_deterministic(s in ".*") {
        let a = lark_parser::parse(s.as_bytes());
        let b = lark_parser::parse(s.as_bytes());
        prop_assert_eq!(a.file, b.file);
        prop_assert_eq!(a.errors, b.errors);
        prop_assert_eq!(a.symbols, b.symbols);
        prop_assert_eq!(a.lines, b.lines);
    }

    #[test]
    fn scanner_terminates_and_positions_are_monotonic(s in ".*") {
        let tokens = scan_all(s.as_bytes());

        // bounded: every token except the endmarker consumes at least one char
        prop_assert!(tokens.len() <= s.chars().count() + 2);

        for pair in tokens.windows(2) {
            prop_assert!(
                pair[0].pos <= pair[1].pos,
                "positions regressed: {} then {}",
                pair[0].pos,
                pair[1].pos
            );
        }
    }

    #[test]
    fn token_values_round_trip(
        picks in proptest::collection::vec(proptest::sample::select(VOCAB.to_vec()), 0..24),
        newlines in proptest::collection::vec(any::<bool>(), 0..24),
    ) {
        let mut src = String::new();
        for (i, lexeme) in picks.iter().enumerate() {
            src.push_str(lexeme);
            if newlines.get(i).copied().unwrap_or(false) {
                src.push('\n');
            } else {
                src.push(' ');
            }
        }

        let (tokens, errors) = scan_count_errors(src.as_bytes());
        prop_assert_eq!(errors, 0, "vocabulary input must scan cleanly: {:?}", src);

        let joined = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Endmarker))
            .map(|t| t.value.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let (again, reerrors) = scan_count_errors(joined.as_bytes());
        prop_assert_eq!(reerrors, 0, "joined values must scan cleanly: {:?}", joined);

        let kinds = |ts: &[Token]| {
            ts.iter()
                .map(|t| t.kind)
                .filter(|k| !matches!(k, TokenKind::Newline | TokenKind::Endmarker))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(kinds(&tokens), kinds(&again), "src={:?} joined={:?}", src, joined);
    }
}
