//! Parser for Lark source files.
//!
//! The parser owns its scanner and wraps it with a token pre-filter that
//! drops comments and illegal tokens and performs automatic semicolon
//! insertion. Expressions are parsed with a Pratt table shared by prefix
//! and infix forms; declarations are recursive-descent with panic-mode
//! recovery bounded by a progress guard. Errors are collected, never
//! thrown: `parse` always returns a tree.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::ast::{
    BadNode, BasicLit, BinaryExpr, ConstSpec, Field, File, ImportSpec, Name, Node, QualName,
    StructDef, Type, TypeAlias, UnaryExpr,
};
use crate::error::ErrorInfo;
use crate::scanner::Scanner;
use crate::token::{Pos, Token, TokenKind, NUM_TOKEN_KINDS};

/// Result of [`parse`]. `file` is always present, even when `errors` is
/// non-empty; recovery regions show up as `BadNode`s in the tree.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub file: File,
    pub imports: Vec<ImportSpec>,
    pub symbols: Vec<Symbol>,
    pub lines: Vec<String>,
    pub errors: Vec<ErrorInfo>,
}

/// A top-level symbol noted while parsing. `decl` indexes the declaration
/// in `ParsedFile::file.nodes`. The parser performs no lookup; this is a
/// by-product for downstream passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: Name,
    pub decl: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Const,
    Struct,
    TypeAlias,
    Interface,
    Func,
}

// Expression precedence levels, lowest to highest.
const PREC_NONE: u8 = 0;
const PREC_LOGIC_OR: u8 = 1; // a || b
const PREC_LOGIC_AND: u8 = 2; // a && b
const PREC_CMP: u8 = 3; // a == b, a != b, a < b, a <= b, a > b, a >= b
const PREC_TERM: u8 = 4; // a + b, a - b
const PREC_FACTOR: u8 = 5; // a * b, a / b, a % b
const PREC_UNARY: u8 = 6; // !a, -a

// Tokens after which a newline (or the end of input) becomes a semicolon.
const INSERT_SEMI: [bool; NUM_TOKEN_KINDS] = {
    let mut t = [false; NUM_TOKEN_KINDS];
    t[TokenKind::RightBrace as usize] = true;
    t[TokenKind::RightBrack as usize] = true;
    t[TokenKind::RightParen as usize] = true;
    t[TokenKind::Integer as usize] = true;
    t[TokenKind::Float as usize] = true;
    t[TokenKind::Identifier as usize] = true;
    t[TokenKind::String as usize] = true;
    t[TokenKind::True as usize] = true;
    t[TokenKind::False as usize] = true;
    t[TokenKind::Null as usize] = true;
    t
};

// Recovery sets.
const SYNC_DECL: &[TokenKind] = &[
    TokenKind::Const,
    TokenKind::Func,
    TokenKind::Import,
    TokenKind::Interface,
    TokenKind::Struct,
    TokenKind::Type,
];
const SYNC_IMPORT: &[TokenKind] = &[TokenKind::Semicolon];

type NudFn<'src> = fn(&mut Parser<'src>) -> Node;
type LedFn<'src> = fn(&mut Parser<'src>, Node, u8) -> Node;

#[derive(Clone, Copy)]
struct ExprRule<'src> {
    nud: Option<NudFn<'src>>,
    led: Option<LedFn<'src>>,
    prec: u8,
}

impl<'src> ExprRule<'src> {
    const NONE: Self = ExprRule {
        nud: None,
        led: None,
        prec: PREC_NONE,
    };
}

struct Parser<'src> {
    scanner: Scanner<'src>,
    current: Token,
    errors: Rc<RefCell<Vec<ErrorInfo>>>,
    imports: Vec<ImportSpec>,
    symbols: Vec<Symbol>,
    ndef: usize, // non-import declarations emitted so far
    sync_pos: Pos,
    sync_count: u32,
}

impl<'src> Parser<'src> {
    fn new(text: &'src [u8]) -> Self {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);
        let scanner = Scanner::new(
            text,
            Some(Box::new(move |pos, message| {
                sink.borrow_mut().push(ErrorInfo { pos, message });
            })),
        );

        let mut p = Parser {
            scanner,
            current: Token {
                kind: TokenKind::Illegal,
                pos: Pos::default(),
                value: String::new(),
            },
            errors,
            imports: Vec::new(),
            symbols: Vec::new(),
            ndef: 0,
            sync_pos: Pos::default(),
            sync_count: 0,
        };
        p.next();
        p
    }

    // Next token from the scanner, with comments and illegal tokens
    // discarded. Newlines are returned only when `newline` is set.
    fn scan(&mut self, newline: bool) -> Token {
        loop {
            let token = self.scanner.scan();
            match token.kind {
                TokenKind::Comment | TokenKind::Illegal => continue,
                TokenKind::Newline if !newline => continue,
                _ => return token,
            }
        }
    }

    // Advances to the next token, applying automatic semicolon insertion:
    // a newline (or the end of input) following a token that may terminate
    // a declaration is rewritten into a semicolon at the same position.
    fn next(&mut self) {
        let mut token = self.scan(true);
        if matches!(token.kind, TokenKind::Newline | TokenKind::Endmarker) {
            if INSERT_SEMI[self.current.kind as usize] {
                token.kind = TokenKind::Semicolon;
            } else if token.kind == TokenKind::Newline {
                token = self.scan(false);
            }
        }
        self.current = token;
    }

    fn err(&mut self, pos: Pos, message: String) {
        self.errors.borrow_mut().push(ErrorInfo { pos, message });
    }

    fn expect_msg(&mut self, what: &str) {
        let message = format!("expected {}, found '{}'", what, self.current.value);
        self.err(self.current.pos, message);
    }

    fn expect(&mut self, kind: TokenKind) -> Token {
        let token = self.current.clone();
        if token.kind != kind {
            self.expect_msg(&format!("'{kind}'"));
        }
        self.next(); // make progress
        token
    }

    fn accept(&mut self, kind: TokenKind) -> bool {
        if self.current.kind == kind {
            self.next();
            return true;
        }
        false
    }

    // Panic-mode recovery: skips forward to a token in `to` or the end of
    // input. May return at the position of the previous return at most 10
    // consecutive times; past that it keeps scanning until it has made
    // progress, which rules out livelock when `to` contains the current
    // token.
    fn sync(&mut self, to: &[TokenKind]) {
        loop {
            let kind = self.current.kind;
            if kind == TokenKind::Endmarker {
                return;
            }
            if to.contains(&kind) {
                if self.current.pos == self.sync_pos && self.sync_count < 10 {
                    self.sync_count += 1;
                    return;
                }
                if self.current.pos > self.sync_pos {
                    self.sync_pos = self.current.pos;
                    self.sync_count = 0;
                    return;
                }
            }
            self.next();
        }
    }

    // =========================================================================
    // Expressions (Pratt)
    // =========================================================================

    fn rule(kind: TokenKind) -> ExprRule<'src> {
        use TokenKind as K;

        match kind {
            K::Null | K::True | K::False | K::String | K::Integer | K::Float => ExprRule {
                nud: Some(Self::parse_basic_lit),
                ..ExprRule::NONE
            },
            K::Identifier => ExprRule {
                nud: Some(Self::parse_qual_name_expr),
                ..ExprRule::NONE
            },
            K::Minus => ExprRule {
                nud: Some(Self::parse_unary_expr),
                led: Some(Self::parse_binary_expr),
                prec: PREC_TERM,
            },
            K::Not => ExprRule {
                nud: Some(Self::parse_unary_expr),
                ..ExprRule::NONE
            },
            K::Plus => ExprRule {
                led: Some(Self::parse_binary_expr),
                prec: PREC_TERM,
                ..ExprRule::NONE
            },
            K::Mult | K::Div | K::Mod => ExprRule {
                led: Some(Self::parse_binary_expr),
                prec: PREC_FACTOR,
                ..ExprRule::NONE
            },
            K::And => ExprRule {
                led: Some(Self::parse_binary_expr),
                prec: PREC_LOGIC_AND,
                ..ExprRule::NONE
            },
            K::Or => ExprRule {
                led: Some(Self::parse_binary_expr),
                prec: PREC_LOGIC_OR,
                ..ExprRule::NONE
            },
            K::Eq | K::Ge | K::Gt | K::Le | K::Lt | K::Neq => ExprRule {
                led: Some(Self::parse_binary_expr),
                prec: PREC_CMP,
                ..ExprRule::NONE
            },
            _ => ExprRule::NONE,
        }
    }

    // Parses an expression, consuming infix operators that bind tighter
    // than `prec`. Infix operators are left-associative: the right-hand
    // side re-enters at the operator's own precedence.
    fn parse_expr(&mut self, prec: u8) -> Node {
        let token = self.current.clone();
        let Some(nud) = Self::rule(token.kind).nud else {
            self.expect_msg("expression");
            self.next();
            return Node::Bad(BadNode {
                from: token.pos,
                to: self.current.pos,
            });
        };

        let mut root = nud(self);
        loop {
            let rule = Self::rule(self.current.kind);
            if rule.prec <= prec {
                break;
            }
            // Every token with a precedence above NONE carries a led.
            let Some(led) = rule.led else { break };
            root = led(self, root, rule.prec);
        }
        root
    }

    fn basic_lit(&mut self) -> BasicLit {
        let lit = self.current.clone();
        self.next();
        BasicLit {
            kind: lit.kind,
            pos: lit.pos,
            value: lit.value,
        }
    }

    fn parse_basic_lit(&mut self) -> Node {
        Node::BasicLit(self.basic_lit())
    }

    // Expects an identifier. On a mismatch this reports the token, still
    // consumes it, and produces the sentinel name `_`.
    fn parse_name(&mut self) -> Name {
        let ident = self.expect(TokenKind::Identifier);
        let name = if ident.kind == TokenKind::Identifier {
            ident.value
        } else {
            "_".to_string()
        };
        Name {
            pos: ident.pos,
            name,
        }
    }

    fn parse_qual_name(&mut self) -> QualName {
        let tmp = self.parse_name();
        let pos = tmp.pos;
        if self.accept(TokenKind::Dot) {
            let name = self.parse_name();
            QualName {
                pos,
                name,
                module: Some(tmp),
            }
        } else {
            QualName {
                pos,
                name: tmp,
                module: None,
            }
        }
    }

    fn parse_qual_name_expr(&mut self) -> Node {
        Node::QualName(self.parse_qual_name())
    }

    fn parse_unary_expr(&mut self) -> Node {
        let op = self.current.clone();
        self.next();
        Node::Unary(UnaryExpr {
            op_pos: op.pos,
            op: op.kind,
            expr: Box::new(self.parse_expr(PREC_UNARY)),
        })
    }

    fn parse_binary_expr(&mut self, lhs: Node, prec: u8) -> Node {
        let op = self.current.kind;
        self.next();
        Node::Binary(BinaryExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(self.parse_expr(prec)),
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    // item (',' item)* ','? stop
    fn parse_items(&mut self, item: fn(&mut Self) -> Node, stop: TokenKind) -> Vec<Node> {
        if self.accept(stop) {
            return Vec::new();
        }

        let mut items = vec![item(self)];
        while self.accept(TokenKind::Comma) {
            // trailing comma
            if self.current.kind == stop {
                break;
            }
            items.push(item(self));
        }

        self.expect(stop);
        items
    }

    fn parse_type(&mut self) -> Type {
        let name = self.parse_qual_name();
        let args = if self.accept(TokenKind::LeftBrack) {
            self.parse_items(|p| Node::Type(p.parse_type()), TokenKind::RightBrack)
                .into_iter()
                .map(Box::new)
                .collect()
        } else {
            SmallVec::new()
        };
        Type { name, args }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_import(&mut self) -> Node {
        let kw = self.current.clone();
        self.next();

        if self.current.kind != TokenKind::String {
            self.err(self.current.pos, "import path must be a string".to_string());
            self.sync(SYNC_IMPORT);
            return Node::Bad(BadNode {
                from: kw.pos,
                to: self.current.pos,
            });
        }

        let path = self.basic_lit();
        let alias = if self.accept(TokenKind::As) {
            Some(self.parse_name())
        } else {
            None
        };

        let spec = ImportSpec { path, alias };
        self.imports.push(spec.clone());
        Node::Import(spec)
    }

    fn parse_const(&mut self) -> Node {
        self.next(); // const
        let name = self.parse_name();
        // the '=' may already have been consumed by name recovery
        self.accept(TokenKind::Assign);
        let expr = self.parse_expr(PREC_NONE);
        Node::Const(ConstSpec {
            name,
            expr: Box::new(expr),
        })
    }

    fn parse_type_alias(&mut self) -> Node {
        let kw = self.current.clone();
        self.next(); // type
        let name = self.parse_name();
        self.accept(TokenKind::Assign);
        let ty = self.parse_type();
        Node::TypeAlias(TypeAlias {
            type_pos: kw.pos,
            name,
            ty,
        })
    }

    fn parse_field(&mut self) -> Field {
        let name = self.parse_name();
        self.expect(TokenKind::Colon);
        let ty = self.parse_type();
        Field { name, ty }
    }

    fn parse_struct(&mut self) -> Node {
        let kw = self.current.clone();
        self.next(); // struct
        let name = self.parse_name();
        self.expect(TokenKind::LeftBrace);

        let mut fields = Vec::new();
        while !matches!(
            self.current.kind,
            TokenKind::RightBrace | TokenKind::Endmarker
        ) {
            fields.push(self.parse_field());
            if self.current.kind == TokenKind::RightBrace {
                break;
            }
            self.expect(TokenKind::Semicolon);
        }
        self.expect(TokenKind::RightBrace);

        Node::Struct(StructDef {
            struct_pos: kw.pos,
            name,
            fields,
        })
    }

    fn declare(&mut self, kind: SymbolKind, node: &Node, decl: usize) {
        let name = match node {
            Node::Const(n) => &n.name,
            Node::TypeAlias(n) => &n.name,
            Node::Struct(n) => &n.name,
            _ => return,
        };
        self.symbols.push(Symbol {
            kind,
            name: name.clone(),
            decl,
        });
    }

    fn parse_file(&mut self) -> File {
        let mut nodes: Vec<Node> = Vec::new();

        while self.current.kind != TokenKind::Endmarker {
            let node = match self.current.kind {
                TokenKind::Semicolon => {
                    // empty declaration
                    self.next();
                    continue;
                }
                TokenKind::Import => {
                    let node = self.parse_import();
                    if self.ndef > 0 {
                        self.err(
                            node.pos(),
                            "imports must appear before other declarations".to_string(),
                        );
                    }
                    node
                }
                TokenKind::Const => {
                    let node = self.parse_const();
                    self.ndef += 1;
                    self.declare(SymbolKind::Const, &node, nodes.len());
                    node
                }
                TokenKind::Type => {
                    let node = self.parse_type_alias();
                    self.ndef += 1;
                    self.declare(SymbolKind::TypeAlias, &node, nodes.len());
                    node
                }
                TokenKind::Struct => {
                    let node = self.parse_struct();
                    self.ndef += 1;
                    self.declare(SymbolKind::Struct, &node, nodes.len());
                    node
                }
                _ => {
                    self.expect_msg("declaration");
                    let from = self.current.pos;
                    self.next();
                    self.sync(SYNC_DECL);
                    nodes.push(Node::Bad(BadNode {
                        from,
                        to: self.current.pos,
                    }));
                    continue;
                }
            };

            nodes.push(node);
            self.expect(TokenKind::Semicolon);
        }

        File { nodes }
    }
}

/// Parses `text` and returns the tree together with the scanned source
/// lines and every diagnostic the scanner and the parser produced, in
/// creation order.
pub fn parse(text: &[u8]) -> ParsedFile {
    let mut p = Parser::new(text);
    let file = p.parse_file();

    let Parser {
        scanner,
        errors,
        imports,
        symbols,
        ..
    } = p;

    // Consuming the scanner releases its handle on the error sink.
    let lines = scanner.into_lines();
    let errors = match Rc::try_unwrap(errors) {
        Ok(cell) => cell.into_inner(),
        Err(shared) => shared.borrow().clone(),
    };

    ParsedFile {
        file,
        imports,
        symbols,
        lines,
        errors,
    }
}
