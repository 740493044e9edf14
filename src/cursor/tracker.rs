//! Selection tracking and repair
//!
//! The tracker never holds a live pointer into the platform selection. It
//! keeps the last known endpoints and re-derives them after content changes,
//! then writes a normalized range back through the `SelectionSurface`.

use super::range::{EndpointMask, Position, Range};
use super::tree::{DocumentTree, SelectionSurface};
use super::{CursorError, Endpoint};
use crate::text::{diff, TextDelta};
use std::cmp::Ordering;
use tracing::debug;

/// Keeps the last known selection inside an editable tree
pub struct CursorTracker<T: DocumentTree> {
    tree: T,
    range: Range<T::Node>,
}

impl<T: DocumentTree> CursorTracker<T> {
    /// Start tracking with no known selection
    pub fn new(tree: T) -> Self {
        Self {
            tree,
            range: Range::default(),
        }
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    /// Last known selection
    pub fn range(&self) -> &Range<T::Node> {
        &self.range
    }

    /// Record the platform selection
    ///
    /// Returns `false` and keeps the previous range when the selection has no
    /// active range; the previous range stays the last known good one.
    pub fn update(&mut self, selection: &dyn SelectionSurface<T::Node>) -> bool {
        match selection.current() {
            Some((start, end)) => {
                self.range = Range {
                    start: Some(start),
                    end: Some(end),
                };
                true
            }
            None => false,
        }
    }

    /// Which endpoints are known
    pub fn exists_mask(&self) -> EndpointMask {
        EndpointMask::from_flags(self.range.start.is_some(), self.range.end.is_some())
    }

    /// Which known endpoints lie within `node` (the node itself included)
    pub fn containing_mask(&self, node: &T::Node) -> EndpointMask {
        let inside = |pos: &Option<Position<T::Node>>| {
            pos.as_ref()
                .map(|p| self.tree.contains(node, &p.node))
                .unwrap_or(false)
        };
        EndpointMask::from_flags(inside(&self.range.start), inside(&self.range.end))
    }

    /// Clamp `offset` to the bounds of the node's text
    pub fn clamp_offset(&self, node: &T::Node, offset: usize) -> usize {
        offset.min(self.tree.text_len(node))
    }

    /// Set the start endpoint, keeping the recorded offset when none is given
    pub fn fix_start(&mut self, node: T::Node, offset: Option<usize>) {
        let pos = self.fixed_position(self.range.start.as_ref(), node, offset);
        self.range.start = Some(pos);
    }

    /// Set the end endpoint, keeping the recorded offset when none is given
    pub fn fix_end(&mut self, node: T::Node, offset: Option<usize>) {
        let pos = self.fixed_position(self.range.end.as_ref(), node, offset);
        self.range.end = Some(pos);
    }

    fn fixed_position(
        &self,
        previous: Option<&Position<T::Node>>,
        node: T::Node,
        offset: Option<usize>,
    ) -> Position<T::Node> {
        let offset = offset.or(previous.map(|p| p.offset)).unwrap_or(0);
        let offset = self.clamp_offset(&node, offset);
        Position::new(node, offset)
    }

    /// Normalize the recorded endpoints and write them to the platform
    ///
    /// Fails without touching anything when an endpoint is unknown or its
    /// node left the editable root; the caller may `update` and retry.
    pub fn fix_selection(
        &mut self,
        selection: &mut dyn SelectionSurface<T::Node>,
    ) -> Result<(), CursorError> {
        let start = self
            .range
            .start
            .clone()
            .ok_or(CursorError::MissingEndpoint(Endpoint::Start))?;
        let end = self
            .range
            .end
            .clone()
            .ok_or(CursorError::MissingEndpoint(Endpoint::End))?;

        let root = self.tree.root();
        if !self.tree.contains(&root, &start.node) {
            return Err(CursorError::OutsideRoot(Endpoint::Start));
        }
        if !self.tree.contains(&root, &end.node) {
            return Err(CursorError::OutsideRoot(Endpoint::End));
        }

        let start = Position::new(
            start.node.clone(),
            self.clamp_offset(&start.node, start.offset),
        );
        let end = Position::new(end.node.clone(), self.clamp_offset(&end.node, end.offset));

        let forward = match self.tree.order_of_nodes(&start.node, &end.node, &root) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => start.offset <= end.offset,
        };
        let (start, end) = if forward { (start, end) } else { (end, start) };

        selection.select(&start, &end);
        self.range = Range {
            start: Some(start),
            end: Some(end),
        };
        Ok(())
    }

    /// Delta between two observations of a node's text, plus `offset` mapped
    /// through it
    pub fn push_delta(&self, old: &str, new: &str, offset: usize) -> Option<(TextDelta, usize)> {
        diff(old, new).map(|delta| {
            let moved = delta.transform_offset(offset);
            (delta, moved)
        })
    }

    /// Carry the endpoints lying on `node` across a change of its text
    pub fn on_text_mutation(&mut self, node: &T::Node, old: &str, new: &str) -> Option<TextDelta> {
        let delta = diff(old, new)?;
        let len = self.tree.text_len(node);
        for pos in [self.range.start.as_mut(), self.range.end.as_mut()]
            .into_iter()
            .flatten()
        {
            if &pos.node == node {
                pos.offset = delta.transform_offset(pos.offset).min(len);
            }
        }
        Some(delta)
    }

    /// Repair a caret collapsed onto an empty line break
    ///
    /// Both endpoints move to offset 0 of the break's previous sibling, or its
    /// parent when it is the first child. Returns whether a repair happened.
    pub fn handle_line_break_collapse(
        &mut self,
        selection: &mut dyn SelectionSurface<T::Node>,
    ) -> Result<bool, CursorError> {
        let node = match (&self.range.start, &self.range.end) {
            (Some(start), Some(end)) if start == end && self.tree.is_line_break(&start.node) => {
                start.node.clone()
            }
            _ => return Ok(false),
        };

        let root = self.tree.root();
        let target = self
            .tree
            .previous_sibling(&node)
            .or_else(|| self.tree.parent(&node))
            .or_else(|| self.tree.next_node(&node, &root));
        let Some(target) = target else {
            debug!(?node, "line break has no predecessor to repair onto");
            return Ok(false);
        };

        self.range = Range {
            start: Some(Position::new(target.clone(), 0)),
            end: Some(Position::new(target, 0)),
        };
        self.fix_selection(selection)?;
        Ok(true)
    }
}
