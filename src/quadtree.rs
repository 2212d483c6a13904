/*!
Region quadtree answering "which items overlap this rectangle" for the
broad collision phase.

The tree stores item indices, not items: callers keep their objects in a
vector and build the tree from the matching slice of bounding rectangles.
A tree is immutable once built. The simulator rebuilds the obstacle tree
only on world (re)construction and builds a fresh robot tree every step.
*/

use std::collections::BTreeSet;

use crate::constants::{DEFAULT_WORLD_SIDE, QUADTREE_MAX_DEPTH};
use crate::geometry::Rect;

#[derive(Debug)]
pub struct QuadTree {
    root: Node,
    max_depth: usize,
}

impl QuadTree {
    /// Builds a tree with the default depth over the union of the item
    /// rectangles. Item ids are the positions in `bounds`.
    pub fn new(bounds: &[Rect]) -> Self {
        Self::build(bounds, QUADTREE_MAX_DEPTH)
    }

    /// Same with an explicit maximum subdivision depth.
    pub fn build(bounds: &[Rect], max_depth: usize) -> Self {
        let world = Rect::sum(bounds.iter().copied())
            .unwrap_or_else(|| Rect::with_size(DEFAULT_WORLD_SIDE, DEFAULT_WORLD_SIDE));
        Self::build_in(world, bounds, max_depth)
    }

    /// Builds inside an explicit world rectangle.
    pub fn build_in(world: Rect, bounds: &[Rect], max_depth: usize) -> Self {
        let mut root = Node::new(world);
        for (id, rect) in bounds.iter().enumerate() {
            root.insert(id, *rect, max_depth);
        }
        Self { root, max_depth }
    }

    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Ids of the items whose rectangle overlaps `query`, deduplicated.
    /// Items straddling a quadrant boundary live in several quadrants, so
    /// collection goes through a set.
    pub fn find_items(&self, query: &Rect) -> BTreeSet<usize> {
        let mut found = BTreeSet::new();
        self.root.find(query, &mut found);
        found
    }
}

#[derive(Debug)]
struct Node {
    bounds: Rect,
    items: Vec<(usize, Rect)>,
    children: [Option<Box<Node>>; 4],
}

impl Node {
    fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            children: [None, None, None, None],
        }
    }

    /// The four sub-quadrants, split at the center.
    fn quadrants(&self) -> [Rect; 4] {
        let w = self.bounds.width / 2.;
        let h = self.bounds.height / 2.;
        let center = self.bounds.center();
        [
            Rect::new(self.bounds.left, self.bounds.bottom, w, h),
            Rect::new(center.x, self.bounds.bottom, w, h),
            Rect::new(self.bounds.left, center.y, w, h),
            Rect::new(center.x, center.y, w, h),
        ]
    }

    fn insert(&mut self, id: usize, rect: Rect, depth_left: usize) {
        if depth_left == 0 {
            self.items.push((id, rect));
            return;
        }
        let quadrants = self.quadrants();
        let overlapped: Vec<usize> = (0..4)
            .filter(|&i| rect.intersects(&quadrants[i]))
            .collect();
        // an item covering every quadrant, or outside the world rect,
        // stays here
        if overlapped.len() == 4 || overlapped.is_empty() {
            self.items.push((id, rect));
            return;
        }
        for i in overlapped {
            let child = self.children[i].get_or_insert_with(|| Box::new(Node::new(quadrants[i])));
            child.insert(id, rect, depth_left - 1);
        }
    }

    fn find(&self, query: &Rect, found: &mut BTreeSet<usize>) {
        for (id, rect) in &self.items {
            if rect.intersects(query) {
                found.insert(*id);
            }
        }
        for child in self.children.iter().flatten() {
            if child.bounds.intersects(query) {
                child.find(query, found);
            }
        }
    }
}
