//! Syntax tree for Lark source files.
//!
//! Nodes are uniquely owned: heterogeneous children are `Node` values (boxed
//! where recursive), typed children are stored directly. Every node answers
//! `pos()`, the position of its first character; the root `File` sits at
//! `0:0`.

use smallvec::SmallVec;

use crate::token::{Pos, TokenKind};

/// Placeholder for a region the parser gave up on. Always paired with at
/// least one diagnostic inside `[from, to]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadNode {
    pub from: Pos,
    pub to: Pos,
}

/// A literal token promoted into the tree. `value` is the verbatim lexeme,
/// quotes and escapes included for strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: TokenKind,
    pub pos: Pos,
    pub value: String,
}

/// One identifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub pos: Pos,
    pub name: String,
}

/// `name` or `module.name`. The position is the module's when present,
/// otherwise the name's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualName {
    pub pos: Pos,
    pub name: Name,
    pub module: Option<Name>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryExpr {
    pub op_pos: Pos,
    pub op: TokenKind,
    pub expr: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpr {
    pub op: TokenKind,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
}

/// `import "path"` with an optional `as alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub path: BasicLit,
    pub alias: Option<Name>,
}

/// `const name = expr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstSpec {
    pub name: Name,
    pub expr: Box<Node>,
}

/// A possibly parameterized type reference, e.g. `list[int]`. The arguments
/// are `Type` nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub name: QualName,
    pub args: SmallVec<[Box<Node>; 2]>,
}

/// `type name = type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAlias {
    pub type_pos: Pos,
    pub name: Name,
    pub ty: Type,
}

/// One `name: type` entry in a struct body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Name,
    pub ty: Type,
}

/// `struct name { fields }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub struct_pos: Pos,
    pub name: Name,
    pub fields: Vec<Field>,
}

/// The root of a parsed file; children appear in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
    pub nodes: Vec<Node>,
}

/// Closed sum of every tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Bad(BadNode),
    BasicLit(BasicLit),
    Name(Name),
    QualName(QualName),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Import(ImportSpec),
    Const(ConstSpec),
    Type(Type),
    TypeAlias(TypeAlias),
    Field(Field),
    Struct(StructDef),
    File(File),
}

/// Borrowed view of a node, used by the walker so that typed children
/// (`Name`, `Field`, ...) can be visited uniformly.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Bad(&'a BadNode),
    BasicLit(&'a BasicLit),
    Name(&'a Name),
    QualName(&'a QualName),
    Unary(&'a UnaryExpr),
    Binary(&'a BinaryExpr),
    Import(&'a ImportSpec),
    Const(&'a ConstSpec),
    Type(&'a Type),
    TypeAlias(&'a TypeAlias),
    Field(&'a Field),
    Struct(&'a StructDef),
    File(&'a File),
}

impl Node {
    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::Bad(n) => NodeRef::Bad(n),
            Node::BasicLit(n) => NodeRef::BasicLit(n),
            Node::Name(n) => NodeRef::Name(n),
            Node::QualName(n) => NodeRef::QualName(n),
            Node::Unary(n) => NodeRef::Unary(n),
            Node::Binary(n) => NodeRef::Binary(n),
            Node::Import(n) => NodeRef::Import(n),
            Node::Const(n) => NodeRef::Const(n),
            Node::Type(n) => NodeRef::Type(n),
            Node::TypeAlias(n) => NodeRef::TypeAlias(n),
            Node::Field(n) => NodeRef::Field(n),
            Node::Struct(n) => NodeRef::Struct(n),
            Node::File(n) => NodeRef::File(n),
        }
    }

    pub fn pos(&self) -> Pos {
        self.as_node_ref().pos()
    }
}

impl NodeRef<'_> {
    pub fn pos(&self) -> Pos {
        match self {
            NodeRef::Bad(n) => n.from,
            NodeRef::BasicLit(n) => n.pos,
            NodeRef::Name(n) => n.pos,
            NodeRef::QualName(n) => n.pos,
            NodeRef::Unary(n) => n.op_pos,
            NodeRef::Binary(n) => n.lhs.pos(),
            NodeRef::Import(n) => n.path.pos,
            NodeRef::Const(n) => n.name.pos,
            NodeRef::Type(n) => n.name.pos,
            NodeRef::TypeAlias(n) => n.type_pos,
            NodeRef::Field(n) => n.name.pos,
            NodeRef::Struct(n) => n.struct_pos,
            NodeRef::File(_) => Pos::new(0, 0),
        }
    }
}
