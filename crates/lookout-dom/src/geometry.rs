//! Geometry primitives
//!
//! DOMRect and overflow classification. All rectangles live in the
//! coordinate space of the top-level viewport.

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create empty rect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create from edge coordinates. `right < left` yields a negative width,
    /// which never intersects anything.
    pub fn from_edges(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Enclosed area; degenerate and inverted rects have none
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// True when the rect encloses no area (a point, a line, or inverted)
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if point is inside, edges included
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Check if rects share at least one point, edges included
    pub fn intersects(&self, other: &DOMRect) -> bool {
        self.intersection(other).is_some()
    }

    /// Edge-inclusive intersection.
    ///
    /// Rects that only touch produce a zero-width or zero-height rect rather
    /// than `None`; `None` means the rects are disjoint.
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right >= left && bottom >= top {
            Some(DOMRect::from_edges(top, right, bottom, left))
        } else {
            None
        }
    }

    /// Grow each side outward by the given amounts. Negative amounts shrink.
    pub fn outset(&self, top: f64, right: f64, bottom: f64, left: f64) -> DOMRect {
        DOMRect::from_edges(
            self.top() - top,
            self.right() + right,
            self.bottom() + bottom,
            self.left() - left,
        )
    }

    /// Move by a delta
    pub fn translate(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Overflow policy of a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Overflow {
    /// Content may paint outside the box
    #[default]
    Visible,
    Hidden,
    Clip,
    Scroll,
    Auto,
}

impl Overflow {
    /// Does this policy restrict visible content to the box?
    #[inline]
    pub fn clips(&self) -> bool {
        !matches!(self, Overflow::Visible)
    }

    /// Can the user scroll the content?
    #[inline]
    pub fn is_scrollable(&self) -> bool {
        matches!(self, Overflow::Scroll | Overflow::Auto | Overflow::Hidden)
    }
}
