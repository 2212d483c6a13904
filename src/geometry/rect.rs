/*!
Axis-aligned rectangle arithmetic for the broad collision phase.
*/

use std::ops::Add;

use nalgebra::Vector2;

/// Axis-aligned rectangle stored as `(left, bottom, width, height)`.
///
/// Point and overlap tests treat the boundary as part of the rectangle.
/// [`Rect::intersection`] is the one exception: rectangles have to be
/// strictly disjoint before it reports nothing, so touching rectangles
/// yield a zero-area intersection.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Rectangle of the given size with its bottom-left corner at the origin.
    pub fn with_size(width: f32, height: f32) -> Self {
        Self::new(0., 0., width, height)
    }

    /// Bounding box of a point cloud, `None` for an empty one.
    pub fn from_points(points: &[Vector2<f32>]) -> Option<Self> {
        let first = points.first()?;
        let mut left = first.x;
        let mut right = first.x;
        let mut bottom = first.y;
        let mut top = first.y;
        for p in &points[1..] {
            left = left.min(p.x);
            right = right.max(p.x);
            bottom = bottom.min(p.y);
            top = top.max(p.y);
        }
        Some(Self::new(left, bottom, right - left, top - bottom))
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Moves `left`, the width is kept.
    pub fn set_right(&mut self, right: f32) {
        self.left = right - self.width;
    }

    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }

    /// Moves `bottom`, the height is kept.
    pub fn set_top(&mut self, top: f32) {
        self.bottom = top - self.height;
    }

    pub fn center(&self) -> Vector2<f32> {
        Vector2::new(self.left + self.width / 2., self.bottom + self.height / 2.)
    }

    pub fn set_center(&mut self, center: Vector2<f32>) {
        self.left = center.x - self.width / 2.;
        self.bottom = center.y - self.height / 2.;
    }

    pub fn bottomleft(&self) -> Vector2<f32> {
        Vector2::new(self.left, self.bottom)
    }

    pub fn set_bottomleft(&mut self, corner: Vector2<f32>) {
        self.left = corner.x;
        self.bottom = corner.y;
    }

    pub fn bottomright(&self) -> Vector2<f32> {
        Vector2::new(self.right(), self.bottom)
    }

    pub fn set_bottomright(&mut self, corner: Vector2<f32>) {
        self.left = corner.x - self.width;
        self.bottom = corner.y;
    }

    pub fn topleft(&self) -> Vector2<f32> {
        Vector2::new(self.left, self.top())
    }

    pub fn set_topleft(&mut self, corner: Vector2<f32>) {
        self.left = corner.x;
        self.bottom = corner.y - self.height;
    }

    pub fn topright(&self) -> Vector2<f32> {
        Vector2::new(self.right(), self.top())
    }

    pub fn set_topright(&mut self, corner: Vector2<f32>) {
        self.left = corner.x - self.width;
        self.bottom = corner.y - self.height;
    }

    /// In-place union with `other`.
    pub fn add(&mut self, other: &Rect) {
        let right = self.right().max(other.right());
        let top = self.top().max(other.top());
        self.left = self.left.min(other.left);
        self.bottom = self.bottom.min(other.bottom);
        self.width = right - self.left;
        self.height = top - self.bottom;
    }

    /// Smallest rectangle containing `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let mut result = *self;
        Rect::add(&mut result, other);
        result
    }

    /// One-pass union of a sequence of rectangles, `None` for an empty one.
    pub fn sum<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Rect> {
        let mut rects = rects.into_iter();
        let mut total = rects.next()?;
        for r in rects {
            Rect::add(&mut total, &r);
        }
        Some(total)
    }

    /// Closed-boundary point test.
    pub fn collidepoint(&self, point: Vector2<f32>) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.bottom
            && point.y <= self.top()
    }

    /// Closed-boundary overlap test, touching rectangles overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.bottom <= other.top()
            && other.bottom <= self.top()
    }

    /// Overlapping sub-rectangle, `None` when strictly disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let bottom = self.bottom.max(other.bottom);
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());
        if right < left || top < bottom {
            return None;
        }
        Some(Rect::new(left, bottom, right - left, top - bottom))
    }

    /// True iff `other` lies entirely inside `self`, boundaries included.
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right() <= self.right()
            && other.bottom >= self.bottom
            && other.top() <= self.top()
    }
}

impl Add for Rect {
    type Output = Rect;

    fn add(self, other: Rect) -> Rect {
        self.union(&other)
    }
}
