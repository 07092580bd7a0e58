//! Depth-first traversal with enter/exit hooks.

use crate::ast::NodeRef;

/// Visitor protocol for [`walk`].
pub trait Visitor {
    /// Called before a node's children. Return `false` to skip the subtree;
    /// `exit` is not called for a skipped node.
    fn visit(&mut self, node: NodeRef<'_>) -> bool;

    /// Called after a node's children.
    fn exit(&mut self, _node: NodeRef<'_>) {}
}

/// Pre-order traversal rooted at `node`, calling `visit` before and `exit`
/// after each node's children. Children are visited in a fixed per-variant
/// order.
pub fn walk(v: &mut dyn Visitor, node: NodeRef<'_>) {
    if !v.visit(node) {
        return;
    }

    match node {
        NodeRef::Bad(_) | NodeRef::BasicLit(_) | NodeRef::Name(_) => {}
        NodeRef::QualName(n) => {
            walk(v, NodeRef::Name(&n.name));
            if let Some(module) = &n.module {
                walk(v, NodeRef::Name(module));
            }
        }
        NodeRef::Unary(n) => {
            walk(v, n.expr.as_node_ref());
        }
        NodeRef::Binary(n) => {
            walk(v, n.lhs.as_node_ref());
            walk(v, n.rhs.as_node_ref());
        }
        NodeRef::Import(n) => {
            walk(v, NodeRef::BasicLit(&n.path));
            if let Some(alias) = &n.alias {
                walk(v, NodeRef::Name(alias));
            }
        }
        NodeRef::Const(n) => {
            walk(v, NodeRef::Name(&n.name));
            walk(v, n.expr.as_node_ref());
        }
        NodeRef::Type(n) => {
            walk(v, NodeRef::QualName(&n.name));
            for arg in &n.args {
                walk(v, arg.as_node_ref());
            }
        }
        NodeRef::TypeAlias(n) => {
            walk(v, NodeRef::Name(&n.name));
            walk(v, NodeRef::Type(&n.ty));
        }
        NodeRef::Field(n) => {
            walk(v, NodeRef::Name(&n.name));
            walk(v, NodeRef::Type(&n.ty));
        }
        NodeRef::Struct(n) => {
            walk(v, NodeRef::Name(&n.name));
            for field in &n.fields {
                walk(v, NodeRef::Field(field));
            }
        }
        NodeRef::File(n) => {
            for child in &n.nodes {
                walk(v, child.as_node_ref());
            }
        }
    }

    v.exit(node);
}
