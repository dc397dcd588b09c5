//! Scroll-triggered entrance animations.
//!
//! Content blocks register as reveal targets. When a target first intersects
//! its observation band it flips to [`Visibility::Revealed`] and plays a
//! fade-and-rise transition: opacity 0 → 1 while the block slides up from a
//! small offset, eased out, after an optional stagger delay.
//!
//! Targets are grouped by margin, one [`IntersectionObserver`] per distinct
//! margin, the same way each in-view hook owns its own observer.
//!
//! ```ignore
//! let mut reveals = RevealController::new(RevealAnimation::default());
//! let card = reveals.register_target(ElementId(4), RevealOptions::default().with_delay(0.1));
//!
//! // every frame
//! reveals.observe(viewport_rect, |id| layout.rect(id), now);
//! let style = reveals.style(card, now);
//! ```
//!
//! Without an intersection facility ([`RevealController::unsupported`]) every
//! target is visible from the moment it registers.

use crate::easing::{Easing, Transition};
use crate::observer::{ElementId, IntersectionEntry, IntersectionObserver, Rect, RootMargin};

/// Handle returned by [`RevealController::register_target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(usize);

/// Per-target options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    /// Reveal at most once and stop observing afterwards.
    pub once: bool,
    /// Adjusts the band used for triggering.
    pub margin: RootMargin,
    /// Stagger before the transition starts, in seconds.
    pub delay: f32,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            once: true,
            margin: RootMargin::ZERO,
            delay: 0.0,
        }
    }
}

impl RevealOptions {
    pub fn with_margin(mut self, margin: RootMargin) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn repeating(mut self) -> Self {
        self.once = false;
        self
    }
}

/// Shape of the entrance transition, shared by all targets of a controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealAnimation {
    /// Seconds.
    pub duration: f32,
    /// Starting vertical offset in logical pixels (positive is below).
    pub distance: f32,
    pub easing: Easing,
}

impl Default for RevealAnimation {
    fn default() -> Self {
        Self {
            duration: 0.5,
            distance: 24.0,
            easing: Easing::EaseOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Revealed,
}

/// Resolved presentation of a target at some instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    /// Vertical offset to add to the block's position.
    pub offset_y: f32,
}

impl RevealStyle {
    pub const VISIBLE: RevealStyle = RevealStyle {
        opacity: 1.0,
        offset_y: 0.0,
    };
}

#[derive(Debug, Clone)]
struct Target {
    element: ElementId,
    options: RevealOptions,
    observer: Option<usize>,
    visibility: Visibility,
    transition: Option<Transition>,
    reveals: u32,
}

/// Drives one-shot (or repeating) entrance transitions from intersection entries.
#[derive(Debug, Clone)]
pub struct RevealController {
    animation: RevealAnimation,
    observers: Vec<IntersectionObserver>,
    targets: Vec<Target>,
    supported: bool,
}

impl RevealController {
    pub fn new(animation: RevealAnimation) -> Self {
        Self {
            animation,
            observers: Vec::new(),
            targets: Vec::new(),
            supported: true,
        }
    }

    /// Controller for an environment without intersection observation.
    pub fn unsupported(animation: RevealAnimation) -> Self {
        tracing::warn!("intersection observation unavailable; content shown without reveals");
        Self {
            supported: false,
            ..Self::new(animation)
        }
    }

    #[inline]
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    #[inline]
    pub fn animation(&self) -> RevealAnimation {
        self.animation
    }

    /// Begin observing `element` for entrance.
    pub fn register_target(&mut self, element: ElementId, options: RevealOptions) -> TargetId {
        let id = TargetId(self.targets.len());
        if !self.supported {
            self.targets.push(Target {
                element,
                options,
                observer: None,
                visibility: Visibility::Revealed,
                transition: None,
                reveals: 0,
            });
            return id;
        }

        let observer = match self.observers.iter().position(|o| o.margin() == options.margin) {
            Some(index) => index,
            None => {
                self.observers.push(IntersectionObserver::new(options.margin));
                self.observers.len() - 1
            }
        };
        self.observers[observer].observe(element);
        self.targets.push(Target {
            element,
            options,
            observer: Some(observer),
            visibility: Visibility::Hidden,
            transition: None,
            reveals: 0,
        });
        id
    }

    /// The target crossed into its band. Returns whether a transition started.
    pub fn on_intersect(&mut self, target: TargetId, now: f32) -> bool {
        let animation = self.animation;
        let Some(t) = self.targets.get_mut(target.0) else {
            return false;
        };
        if t.visibility == Visibility::Revealed {
            return false;
        }

        t.visibility = Visibility::Revealed;
        t.transition = Some(Transition::new(
            now,
            t.options.delay,
            animation.duration,
            animation.easing,
        ));
        t.reveals += 1;
        tracing::debug!(element = t.element.0, delay = t.options.delay, "reveal");

        if t.options.once {
            if let Some(observer) = t.observer.take() {
                let element = t.element;
                self.observers[observer].unobserve(element);
            }
        }
        true
    }

    /// The target left its band. Repeating targets hide again.
    pub fn on_leave(&mut self, target: TargetId) {
        if let Some(t) = self.targets.get_mut(target.0) {
            if !t.options.once && t.visibility == Visibility::Revealed {
                t.visibility = Visibility::Hidden;
                t.transition = None;
            }
        }
    }

    /// Apply a batch of entries from the observer at `observer`.
    fn apply(&mut self, observer: usize, entries: &[IntersectionEntry]) -> usize {
        let mut fired = 0;
        for entry in entries {
            let matching: Vec<TargetId> = self
                .targets
                .iter()
                .enumerate()
                .filter(|(_, t)| t.element == entry.element && t.observer == Some(observer))
                .map(|(i, _)| TargetId(i))
                .collect();
            for id in matching {
                if entry.is_intersecting {
                    if self.on_intersect(id, entry.time) {
                        fired += 1;
                    }
                } else {
                    self.on_leave(id);
                }
            }
        }
        fired
    }

    /// Run one observation cycle over every observer.
    ///
    /// Returns the number of transitions started.
    pub fn observe<F>(&mut self, root: Rect, layout: F, now: f32) -> usize
    where
        F: Fn(ElementId) -> Option<Rect>,
    {
        let mut fired = 0;
        for index in 0..self.observers.len() {
            let entries = self.observers[index].check(root, &layout, now);
            if !entries.is_empty() {
                fired += self.apply(index, &entries);
            }
        }
        fired
    }

    pub fn visibility(&self, target: TargetId) -> Option<Visibility> {
        self.targets.get(target.0).map(|t| t.visibility)
    }

    /// How many transitions this target has started.
    pub fn reveal_count(&self, target: TargetId) -> u32 {
        self.targets.get(target.0).map_or(0, |t| t.reveals)
    }

    pub fn element(&self, target: TargetId) -> Option<ElementId> {
        self.targets.get(target.0).map(|t| t.element)
    }

    /// Presentation of `target` at `now`.
    pub fn style(&self, target: TargetId, now: f32) -> RevealStyle {
        let Some(t) = self.targets.get(target.0) else {
            return RevealStyle::VISIBLE;
        };
        match (t.visibility, t.transition) {
            (Visibility::Hidden, _) => RevealStyle {
                opacity: 0.0,
                offset_y: self.animation.distance,
            },
            (Visibility::Revealed, None) => RevealStyle::VISIBLE,
            (Visibility::Revealed, Some(tr)) => {
                let p = tr.progress(now);
                RevealStyle {
                    opacity: p,
                    offset_y: self.animation.distance * (1.0 - p),
                }
            }
        }
    }

    /// Whether any transition is still playing at `now`.
    pub fn is_animating(&self, now: f32) -> bool {
        self.targets
            .iter()
            .filter_map(|t| t.transition)
            .any(|tr| !tr.is_finished(now))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of elements still being watched across all observers.
    pub fn observed_count(&self) -> usize {
        self.observers.iter().map(|o| o.observed_count()).sum()
    }

    /// Number of distinct observers (one per margin).
    #[inline]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Stop observing everything.
    pub fn disconnect(&mut self) {
        for observer in &mut self.observers {
            observer.disconnect();
        }
    }
}
