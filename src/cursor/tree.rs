//! Collaborator traits for the editable document and the platform selection

use super::range::Position;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Tree queries over the editable document
///
/// Implemented by the host on top of the live DOM. Node handles must be cheap
/// to clone and compare by identity.
pub trait DocumentTree {
    type Node: Clone + PartialEq + Debug;

    /// Root of the editable area
    fn root(&self) -> Self::Node;

    /// Whether `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Document order of `a` relative to `b` within `root`
    ///
    /// `Equal` means the order cannot be decided from the nodes alone, which
    /// happens when they are the same node.
    fn order_of_nodes(&self, a: &Self::Node, b: &Self::Node, root: &Self::Node) -> Ordering;

    /// Next node in document order, `None` past the end of `root`
    fn next_node(&self, node: &Self::Node, root: &Self::Node) -> Option<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Length of the node's text content in chars
    fn text_len(&self, node: &Self::Node) -> usize;

    /// Whether the node is an empty line-break placeholder (`<br>`)
    fn is_line_break(&self, node: &Self::Node) -> bool;
}

/// The browser's live selection
pub trait SelectionSurface<N> {
    /// Current range, `None` when the selection has no active range
    fn current(&self) -> Option<(Position<N>, Position<N>)>;

    /// Replace the selection; `start` never follows `end`
    fn select(&mut self, start: &Position<N>, end: &Position<N>);
}
