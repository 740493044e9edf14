use proptest::prelude::*;
use rtsession_core::cursor::{CursorTracker, DocumentTree, Position, SelectionSurface};
use std::cmp::Ordering;

/// A root with one text child per entry; node 0 is the root
#[derive(Debug)]
struct FlatTree {
    texts: Vec<String>,
}

impl DocumentTree for FlatTree {
    type Node = usize;

    fn root(&self) -> usize {
        0
    }

    fn contains(&self, ancestor: &usize, node: &usize) -> bool {
        *node <= self.texts.len() && (*ancestor == 0 || ancestor == node)
    }

    fn order_of_nodes(&self, a: &usize, b: &usize, _root: &usize) -> Ordering {
        a.cmp(b)
    }

    fn next_node(&self, node: &usize, _root: &usize) -> Option<usize> {
        (*node < self.texts.len()).then(|| node + 1)
    }

    fn parent(&self, node: &usize) -> Option<usize> {
        (*node != 0).then_some(0)
    }

    fn previous_sibling(&self, node: &usize) -> Option<usize> {
        (*node > 1).then(|| node - 1)
    }

    fn text_len(&self, node: &usize) -> usize {
        match node {
            0 => self.texts.iter().map(|t| t.chars().count()).sum(),
            n => self.texts[n - 1].chars().count(),
        }
    }

    fn is_line_break(&self, _node: &usize) -> bool {
        false
    }
}

#[derive(Default)]
struct Selection {
    current: Option<(Position<usize>, Position<usize>)>,
}

impl SelectionSurface<usize> for Selection {
    fn current(&self) -> Option<(Position<usize>, Position<usize>)> {
        self.current.clone()
    }

    fn select(&mut self, start: &Position<usize>, end: &Position<usize>) {
        self.current = Some((start.clone(), end.clone()));
    }
}

fn flat_tree() -> impl Strategy<Value = FlatTree> {
    prop::collection::vec("[a-z ]{0,12}", 1..6).prop_map(|texts| FlatTree { texts })
}

proptest! {
    #[test]
    fn clamp_is_bounded_and_monotonic(
        tree in flat_tree(),
        node in 1usize..6,
        a in 0usize..20,
        b in 0usize..20,
    ) {
        let node = node.min(tree.texts.len());
        let len = tree.text_len(&node);
        let tracker = CursorTracker::new(tree);

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(tracker.clamp_offset(&node, hi) <= len);
        prop_assert!(tracker.clamp_offset(&node, lo) <= tracker.clamp_offset(&node, hi));
    }

    #[test]
    fn fix_selection_orders_and_is_idempotent(
        tree in flat_tree(),
        start in (1usize..6, 0usize..20),
        end in (1usize..6, 0usize..20),
    ) {
        let count = tree.texts.len();
        let mut tracker = CursorTracker::new(tree);
        let mut selection = Selection {
            current: Some((
                Position::new(start.0.min(count), start.1),
                Position::new(end.0.min(count), end.1),
            )),
        };
        prop_assert!(tracker.update(&selection));

        prop_assert!(tracker.fix_selection(&mut selection).is_ok());
        let first = tracker.range().clone();
        let (s, e) = (first.start.clone().unwrap(), first.end.clone().unwrap());
        prop_assert!(s.node < e.node || (s.node == e.node && s.offset <= e.offset));
        prop_assert!(s.offset <= tracker.tree().text_len(&s.node));

        prop_assert!(tracker.fix_selection(&mut selection).is_ok());
        prop_assert_eq!(tracker.range(), &first);
    }
}
