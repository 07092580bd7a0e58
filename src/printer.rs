//! Indented textual dump of a syntax tree.

use crate::ast::NodeRef;
use crate::walk::{walk, Visitor};

struct Printer {
    indent: usize,
    out: String,
}

impl Printer {
    fn emit(&mut self, line: String) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(&line);
        self.out.push('\n');
    }
}

impl Visitor for Printer {
    fn visit(&mut self, node: NodeRef<'_>) -> bool {
        match node {
            NodeRef::Bad(n) => {
                self.emit(format!("BadNode: From={} To={}", n.from, n.to));
            }
            NodeRef::BasicLit(n) => {
                self.emit(format!(
                    "BasicLit: Kind={}, Value={}, Pos={}",
                    n.kind, n.value, n.pos
                ));
            }
            NodeRef::Name(n) => {
                self.emit(format!("Name: Name={}, Pos={}", n.name, n.pos));
            }
            NodeRef::QualName(n) => {
                let module = n.module.as_ref().map(|m| m.name.as_str()).unwrap_or("");
                self.emit(format!(
                    "QualName: Module={}, Name={}, Pos={}",
                    module, n.name.name, n.pos
                ));
                return false;
            }
            NodeRef::Unary(n) => {
                self.emit(format!("UnaryExpr: Op={}, Pos={}", n.op, node.pos()));
                self.indent += 1;
            }
            NodeRef::Binary(n) => {
                self.emit(format!("BinaryExpr: Op={}, Pos={}", n.op, node.pos()));
                self.indent += 1;
            }
            NodeRef::Import(n) => {
                let alias = n.alias.as_ref().map(|a| a.name.as_str()).unwrap_or("");
                self.emit(format!(
                    "Import: Path={}, Alias={}, Pos={}",
                    n.path.value,
                    alias,
                    node.pos()
                ));
                return false;
            }
            NodeRef::Const(_) => {
                self.emit(format!("Const: Pos={}", node.pos()));
                self.indent += 1;
            }
            NodeRef::Type(_) => {
                self.emit(format!("Type: Pos={}", node.pos()));
                self.indent += 1;
            }
            NodeRef::TypeAlias(_) => {
                self.emit(format!("TypeDef: Pos={}", node.pos()));
                self.indent += 1;
            }
            NodeRef::Field(_) => {
                self.emit(format!("Field: Pos={}", node.pos()));
                self.indent += 1;
            }
            NodeRef::Struct(_) => {
                self.emit(format!("StructDef: Pos={}", node.pos()));
                self.indent += 1;
            }
            NodeRef::File(_) => {}
        }
        true
    }

    fn exit(&mut self, node: NodeRef<'_>) {
        if matches!(
            node,
            NodeRef::Unary(_)
                | NodeRef::Binary(_)
                | NodeRef::Const(_)
                | NodeRef::Type(_)
                | NodeRef::TypeAlias(_)
                | NodeRef::Field(_)
                | NodeRef::Struct(_)
        ) {
            self.indent -= 1;
        }
    }
}

/// Renders the tree rooted at `node` as an indented dump, one node per line.
pub fn dump(node: NodeRef<'_>) -> String {
    let mut printer = Printer {
        indent: 0,
        out: String::new(),
    };
    walk(&mut printer, node);
    printer.out
}
