//! Fixed-order walk over the validation tree
//!
//! The walk is depth-first: interchange, then each group, each transaction
//! set within the group, each segment within the transaction set, and each
//! element within the segment. Interchange, group and transaction nodes are
//! entered and left; segments and elements are leaves.

use crate::node::{
    ElementResult, GroupResult, InterchangeResult, SegmentResult, TransactionResult,
};
use tracing::trace;

/// A borrowed node of the validation tree
#[derive(Debug, Clone, Copy)]
pub enum ResultNode<'a> {
    Interchange(&'a InterchangeResult),
    Group(&'a GroupResult),
    Transaction(&'a TransactionResult),
    Segment(&'a SegmentResult),
    Element(&'a ElementResult),
}

impl ResultNode<'_> {
    /// Short name of the node kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Interchange(_) => "interchange",
            Self::Group(_) => "group",
            Self::Transaction(_) => "transaction",
            Self::Segment(_) => "segment",
            Self::Element(_) => "element",
        }
    }
}

/// Trait for traversing the validation tree
///
/// `enter` is called for every node before its children; `leave` is called
/// for interchange, group and transaction nodes after their children. The
/// first error stops the walk.
pub trait Traversal {
    /// Error returned by the visitor
    type Error;

    /// Called when entering a node
    fn enter(&mut self, node: ResultNode<'_>) -> Result<(), Self::Error>;

    /// Called when leaving a node with children
    fn leave(&mut self, _node: ResultNode<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk the tree using a visitor
///
/// # Errors
///
/// Returns the first error produced by the visitor; nodes after it are not
/// visited.
pub fn walk<T: Traversal>(tree: &InterchangeResult, visitor: &mut T) -> Result<(), T::Error> {
    let root = ResultNode::Interchange(tree);
    trace!(node = root.kind(), "enter");
    visitor.enter(root)?;

    for group in &tree.groups {
        walk_group(group, visitor)?;
    }

    trace!(node = root.kind(), "leave");
    visitor.leave(root)
}

fn walk_group<T: Traversal>(group: &GroupResult, visitor: &mut T) -> Result<(), T::Error> {
    let node = ResultNode::Group(group);
    visitor.enter(node)?;

    for st in &group.transactions {
        let st_node = ResultNode::Transaction(st);
        visitor.enter(st_node)?;

        for seg in &st.segments {
            visitor.enter(ResultNode::Segment(seg))?;
            for ele in &seg.elements {
                visitor.enter(ResultNode::Element(ele))?;
            }
        }

        visitor.leave(st_node)?;
    }

    visitor.leave(node)
}
