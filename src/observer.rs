//! Viewport intersection observation.
//!
//! A native stand-in for the browser's intersection facility. Elements are
//! identified by [`ElementId`]; their geometry comes from a layout lookup at
//! check time, so the observer itself holds no rectangles.
//!
//! The observation band is the viewport in document coordinates, grown or
//! shrunk by a [`RootMargin`]:
//!
//! ```ignore
//! let band_margin: RootMargin = "-30% 0px -60% 0px".parse()?;
//! let mut observer = IntersectionObserver::new(band_margin);
//! observer.observe(section);
//!
//! // Once per frame:
//! for entry in observer.check(viewport_rect, |id| layout.rect(id), now) {
//!     if entry.is_intersecting { /* ... */ }
//! }
//! ```

use std::str::FromStr;

use thiserror::Error;

/// Identifier of an observable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Axis-aligned rectangle in document coordinates (logical pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlapping region, if the rectangles share a positive area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 > x0 && y1 > y0 {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }

    /// Same rectangle moved vertically.
    #[inline]
    pub fn offset_y(&self, dy: f32) -> Rect {
        Rect { y: self.y + dy, ..*self }
    }
}

/// One side of a root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
    Px(f32),
    /// Percentage of the root's height (top/bottom) or width (left/right).
    Percent(f32),
}

impl MarginValue {
    fn resolve(self, extent: f32) -> f32 {
        match self {
            MarginValue::Px(v) => v,
            MarginValue::Percent(p) => extent * p / 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarginParseError {
    #[error("root margin `{0}` must have 1 to 4 values")]
    ValueCount(String),
    #[error("invalid root margin value `{0}`: expected a length in px or %")]
    Value(String),
}

impl FromStr for MarginValue {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MarginParseError::Value(s.to_string());
        let number = |n: &str| n.parse::<f32>().ok().filter(|v| v.is_finite()).ok_or_else(err);
        if let Some(n) = s.strip_suffix("px") {
            Ok(MarginValue::Px(number(n)?))
        } else if let Some(n) = s.strip_suffix('%') {
            Ok(MarginValue::Percent(number(n)?))
        } else if number(s)? == 0.0 {
            // Unitless lengths are only valid for zero.
            Ok(MarginValue::Px(0.0))
        } else {
            Err(err())
        }
    }
}

/// Grows (positive) or shrinks (negative) the observation band, CSS order:
/// top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin::uniform(MarginValue::Px(0.0));

    pub const fn uniform(v: MarginValue) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Apply the margin to `root`.
    pub fn apply(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        Rect::new(
            root.x - left,
            root.y - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for RootMargin {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(str::parse::<MarginValue>)
            .collect::<Result<Vec<_>, _>>()?;
        let (top, right, bottom, left) = match values.as_slice() {
            [a] => (*a, *a, *a, *a),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return Err(MarginParseError::ValueCount(s.to_string())),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

/// A change of intersection state for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub element: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the element inside the band, 0.0-1.0.
    pub ratio: f32,
    /// Time of the observation cycle, in seconds.
    pub time: f32,
}

#[derive(Debug, Clone, Copy)]
struct Observed {
    element: ElementId,
    /// `None` until the first cycle after observing.
    intersecting: Option<bool>,
}

/// Reports elements crossing into or out of the margin-adjusted viewport.
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    margin: RootMargin,
    observed: Vec<Observed>,
}

impl IntersectionObserver {
    pub fn new(margin: RootMargin) -> Self {
        Self {
            margin,
            observed: Vec::new(),
        }
    }

    #[inline]
    pub fn margin(&self) -> RootMargin {
        self.margin
    }

    /// Start observing `element`. Observing twice is a no-op.
    pub fn observe(&mut self, element: ElementId) {
        if !self.is_observing(element) {
            self.observed.push(Observed {
                element,
                intersecting: None,
            });
        }
    }

    /// Stop observing `element`.
    pub fn unobserve(&mut self, element: ElementId) {
        self.observed.retain(|o| o.element != element);
    }

    /// Stop observing everything.
    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed.iter().any(|o| o.element == element)
    }

    #[inline]
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// The band elements are tested against for a given viewport rectangle.
    pub fn band(&self, root: Rect) -> Rect {
        self.margin.apply(root)
    }

    /// Run one observation cycle.
    ///
    /// `root` is the viewport in document coordinates. Elements the layout
    /// cannot place count as not intersecting. Entries are produced for state
    /// changes only, plus one initial entry per newly observed element, in
    /// observation order.
    pub fn check<F>(&mut self, root: Rect, layout: F, time: f32) -> Vec<IntersectionEntry>
    where
        F: Fn(ElementId) -> Option<Rect>,
    {
        let band = self.band(root);
        let mut entries = Vec::new();
        for observed in &mut self.observed {
            let (is_intersecting, ratio) = match layout(observed.element) {
                Some(rect) => match rect.intersection(&band) {
                    Some(overlap) => {
                        let ratio = if rect.area() > 0.0 {
                            (overlap.area() / rect.area()).clamp(0.0, 1.0)
                        } else {
                            0.0
                        };
                        (true, ratio)
                    }
                    None => (false, 0.0),
                },
                None => (false, 0.0),
            };
            if observed.intersecting != Some(is_intersecting) {
                observed.intersecting = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    element: observed.element,
                    is_intersecting,
                    ratio,
                    time,
                });
            }
        }
        entries
    }
}
