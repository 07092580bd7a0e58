//! Token kinds, source positions and the token triple shared by the scanner
//! and the parser.

use std::fmt;

/// A line/column pair, both zero-based. Columns count decoded characters,
/// not bytes. The derived ordering is lexicographic, which is the total
/// order the parser's recovery guard relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Closed set of token kinds, in the order of the reference token table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    Illegal = 0,
    Endmarker,
    Newline,

    LeftParen,
    RightParen,
    LeftBrack,
    RightBrack,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Colon,
    Semicolon,
    Arrow,
    Qmark,
    Assign,
    At,

    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    And,
    Or,
    Eq,
    Ge,
    Gt,
    Le,
    Lt,
    Neq,
    Not,

    Comment,
    Identifier,
    String,
    Integer,
    Float,

    As,
    Const,
    Embed,
    False,
    Import,
    Interface,
    Null,
    Struct,
    True,
    Type,
    Func,
}

/// Number of token kinds; sized for kind-indexed lookup tables.
pub const NUM_TOKEN_KINDS: usize = TokenKind::Func as usize + 1;

#[rustfmt::skip]
static TOKEN_NAMES: [&str; NUM_TOKEN_KINDS] = [
    "ILLEGAL", "ENDMARKER", "NEWLINE",

    "(", ")", "[", "]", "{", "}",
    ",", ".", ":", ";", "->", "?", "=", "@",

    "+", "-", "*", "/", "%", "&&", "||",
    "==", ">=", ">", "<=", "<", "!=", "!",

    "COMMENT", "IDENTIFIER", "STRING", "INTEGER", "FLOAT",

    "as", "const", "embed", "false", "import", "interface",
    "null", "struct", "true", "type", "func",
];

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(TOKEN_NAMES[*self as usize])
    }
}

/// Maps an identifier lexeme to its keyword kind, if any.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    let kind = match ident {
        "as" => TokenKind::As,
        "const" => TokenKind::Const,
        "embed" => TokenKind::Embed,
        "false" => TokenKind::False,
        "import" => TokenKind::Import,
        "interface" => TokenKind::Interface,
        "null" => TokenKind::Null,
        "struct" => TokenKind::Struct,
        "true" => TokenKind::True,
        "type" => TokenKind::Type,
        "func" => TokenKind::Func,
        _ => return None,
    };
    Some(kind)
}

/// A scanned token. `value` holds the verbatim lexeme, except for the
/// synthetic `NEWLINE` and `ENDMARKER` tokens whose values are the literal
/// strings `"newline"` and `"endmarker"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
    pub value: String,
}
