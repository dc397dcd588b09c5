//! Scroll-derived page state: progress bar, nav bar state and the active
//! section indicator.

use crate::observer::{ElementId, IntersectionEntry, IntersectionObserver, Rect, RootMargin};

/// Band used to decide which section is "current": a strip between 30% and
/// 40% of the viewport height.
pub const ACTIVE_SECTION_MARGIN: &str = "-30% 0px -60% 0px";

/// Offset past which the nav bar switches to its compact, opaque look.
pub const NAV_SCROLLED_THRESHOLD: f32 = 60.0;

/// Fraction of the scrollable range covered, in [0, 1].
///
/// A page that cannot scroll (`max_offset <= 0`) reports 0.
pub fn scroll_progress(offset: f32, max_offset: f32) -> f32 {
    if max_offset.is_nan() || max_offset <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / max_offset).clamp(0.0, 1.0)
}

/// Document and viewport heights, from which the scroll range follows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub document_height: f32,
    pub viewport_height: f32,
}

impl ScrollMetrics {
    pub fn from_document(document_height: f32, viewport_height: f32) -> Self {
        Self {
            document_height,
            viewport_height,
        }
    }

    /// Largest valid scroll offset, never negative.
    #[inline]
    pub fn max_offset(&self) -> f32 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Clamp `offset` into the scrollable range.
    pub fn clamp(&self, offset: f32) -> f32 {
        if !offset.is_finite() {
            return 0.0;
        }
        offset.clamp(0.0, self.max_offset())
    }

    pub fn progress(&self, offset: f32) -> f32 {
        scroll_progress(offset, self.max_offset())
    }
}

/// Scroll position tracker feeding the progress bar.
#[derive(Debug, Clone)]
pub struct ScrollProgress {
    metrics: ScrollMetrics,
    offset: f32,
    supported: bool,
}

impl ScrollProgress {
    pub fn new(metrics: ScrollMetrics) -> Self {
        Self {
            metrics,
            offset: 0.0,
            supported: true,
        }
    }

    /// Tracker for an environment that reports no scroll metrics.
    /// Progress stays at 0.
    pub fn unsupported() -> Self {
        tracing::warn!("scroll metrics unavailable; progress fixed at 0");
        Self {
            metrics: ScrollMetrics::default(),
            offset: 0.0,
            supported: false,
        }
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    #[inline]
    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    pub fn set_metrics(&mut self, metrics: ScrollMetrics) {
        if self.supported {
            self.metrics = metrics;
            self.offset = metrics.clamp(self.offset);
        }
    }

    /// Record a new scroll offset. Returns the clamped value.
    pub fn set_offset(&mut self, offset: f32) -> f32 {
        if self.supported {
            self.offset = self.metrics.clamp(offset);
        }
        self.offset
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Current progress in [0, 1].
    pub fn progress(&self) -> f32 {
        if !self.supported {
            return 0.0;
        }
        self.metrics.progress(self.offset)
    }
}

/// Nav bar appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavState {
    threshold: f32,
    scrolled: bool,
}

impl NavState {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            scrolled: false,
        }
    }

    /// Update from a scroll offset. Returns whether the state flipped.
    pub fn update(&mut self, offset: f32) -> bool {
        let scrolled = offset > self.threshold;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    #[inline]
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for NavState {
    fn default() -> Self {
        Self::new(NAV_SCROLLED_THRESHOLD)
    }
}

/// Which section the reader is looking at.
///
/// Sections are observed against a narrow band near the top third of the
/// viewport. Every intersecting entry sets the active section, so the last
/// one in a batch wins. Leaving the band never clears it.
#[derive(Debug, Clone)]
pub struct ActiveSection {
    observer: IntersectionObserver,
    sections: Vec<(ElementId, String)>,
    active: Option<usize>,
}

impl ActiveSection {
    pub fn new(margin: RootMargin) -> Self {
        Self {
            observer: IntersectionObserver::new(margin),
            sections: Vec::new(),
            active: None,
        }
    }

    /// Register a section anchor.
    pub fn register(&mut self, element: ElementId, id: impl Into<String>) {
        if self.sections.iter().any(|(e, _)| *e == element) {
            return;
        }
        self.observer.observe(element);
        self.sections.push((element, id.into()));
    }

    /// Apply entries in the order they were delivered.
    ///
    /// Returns whether the active section changed.
    pub fn apply(&mut self, entries: &[IntersectionEntry]) -> bool {
        let before = self.active;
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            if let Some(index) = self.sections.iter().position(|(e, _)| *e == entry.element) {
                self.active = Some(index);
            }
        }
        if self.active != before {
            tracing::debug!(section = self.active_id(), "active section");
            true
        } else {
            false
        }
    }

    /// Run one observation cycle and apply the resulting entries.
    pub fn observe<F>(&mut self, root: Rect, layout: F, now: f32) -> bool
    where
        F: Fn(ElementId) -> Option<Rect>,
    {
        let entries = self.observer.check(root, layout, now);
        self.apply(&entries)
    }

    /// Id of the active section, if any has ever intersected.
    pub fn active_id(&self) -> Option<&str> {
        self.active.map(|i| self.sections[i].1.as_str())
    }

    pub fn active_element(&self) -> Option<ElementId> {
        self.active.map(|i| self.sections[i].0)
    }

    /// Registered section ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(_, id)| id.as_str())
    }

    pub fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}

impl Default for ActiveSection {
    fn default() -> Self {
        let margin = ACTIVE_SECTION_MARGIN
            .parse()
            .unwrap_or(RootMargin::ZERO);
        Self::new(margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bounds() {
        assert_eq!(scroll_progress(0.0, 400.0), 0.0);
        assert_eq!(scroll_progress(200.0, 400.0), 0.5);
        assert_eq!(scroll_progress(400.0, 400.0), 1.0);
        assert_eq!(scroll_progress(900.0, 400.0), 1.0);
        assert_eq!(scroll_progress(-10.0, 400.0), 0.0);
    }

    #[test]
    fn test_progress_zero_when_not_scrollable() {
        assert_eq!(scroll_progress(100.0, 0.0), 0.0);
        assert_eq!(scroll_progress(100.0, -50.0), 0.0);
        assert_eq!(scroll_progress(f32::NAN, 400.0), 0.0);
    }

    #[test]
    fn test_metrics_max_offset() {
        let m = ScrollMetrics::from_document(3000.0, 800.0);
        assert_eq!(m.max_offset(), 2200.0);
        assert_eq!(m.clamp(5000.0), 2200.0);
        assert_eq!(ScrollMetrics::from_document(500.0, 800.0).max_offset(), 0.0);
    }

    #[test]
    fn test_tracker_clamps_and_reports() {
        let mut p = ScrollProgress::new(ScrollMetrics::from_document(1200.0, 800.0));
        assert_eq!(p.set_offset(200.0), 200.0);
        assert_eq!(p.progress(), 0.5);
        assert_eq!(p.set_offset(-40.0), 0.0);

        // Shrinking the document pulls the offset back in range.
        p.set_offset(400.0);
        p.set_metrics(ScrollMetrics::from_document(1000.0, 800.0));
        assert_eq!(p.offset(), 200.0);
        assert_eq!(p.progress(), 1.0);
    }

    #[test]
    fn test_unsupported_tracker_stays_at_zero() {
        let mut p = ScrollProgress::unsupported();
        p.set_metrics(ScrollMetrics::from_document(5000.0, 800.0));
        p.set_offset(1000.0);
        assert_eq!(p.progress(), 0.0);
    }

    #[test]
    fn test_nav_threshold() {
        let mut nav = NavState::default();
        assert!(!nav.update(60.0));
        assert!(!nav.is_scrolled());
        assert!(nav.update(61.0));
        assert!(nav.is_scrolled());
        assert!(!nav.update(500.0));
        assert!(nav.update(0.0));
    }

    fn sections_layout(id: ElementId) -> Option<Rect> {
        // Four stacked sections, 1000px tall each.
        (id.0 < 4).then(|| Rect::new(0.0, id.0 as f32 * 1000.0, 1200.0, 1000.0))
    }

    fn section_tracker() -> ActiveSection {
        let mut active = ActiveSection::default();
        for (i, name) in ["hero", "work", "about", "contact"].iter().enumerate() {
            active.register(ElementId(i as u32), *name);
        }
        active
    }

    #[test]
    fn test_active_section_follows_band() {
        let mut active = section_tracker();
        let root = |scroll: f32| Rect::new(0.0, scroll, 1200.0, 1000.0);

        // Band is y in [scroll + 300, scroll + 400].
        assert!(active.observe(root(0.0), sections_layout, 0.0));
        assert_eq!(active.active_id(), Some("hero"));

        active.observe(root(800.0), sections_layout, 1.0);
        assert_eq!(active.active_id(), Some("work"));

        active.observe(root(2750.0), sections_layout, 2.0);
        assert_eq!(active.active_id(), Some("contact"));
    }

    #[test]
    fn test_active_section_retained_without_intersection() {
        let mut active = section_tracker();
        let entries = [IntersectionEntry {
            element: ElementId(2),
            is_intersecting: true,
            ratio: 0.1,
            time: 0.0,
        }];
        active.apply(&entries);
        assert_eq!(active.active_id(), Some("about"));

        let leaving = [IntersectionEntry {
            element: ElementId(2),
            is_intersecting: false,
            ratio: 0.0,
            time: 1.0,
        }];
        assert!(!active.apply(&leaving));
        assert_eq!(active.active_id(), Some("about"));
    }

    #[test]
    fn test_last_intersecting_entry_wins() {
        let mut active = section_tracker();
        let entry = |id: u32| IntersectionEntry {
            element: ElementId(id),
            is_intersecting: true,
            ratio: 0.5,
            time: 0.0,
        };
        active.apply(&[entry(1), entry(3), entry(2)]);
        assert_eq!(active.active_id(), Some("about"));
    }

    #[test]
    fn test_unregistered_entries_ignored() {
        let mut active = section_tracker();
        let entries = [IntersectionEntry {
            element: ElementId(42),
            is_intersecting: true,
            ratio: 1.0,
            time: 0.0,
        }];
        assert!(!active.apply(&entries));
        assert_eq!(active.active_id(), None);
    }
}
