//! Window-level signals and subscription handles.
//!
//! Components never hold on to the window. Instead they register interest in a
//! [`SignalKind`] with a [`SignalHub`] and get a [`Subscription`] back. The hub
//! only records *who* listens; the owner of the components routes each signal
//! to the listeners the hub returns. Releasing a subscription is the only way
//! to stop receiving a signal, and [`SubscriptionSet::release_all`] releases
//! everything a component registered in one step.
//!
//! ```ignore
//! let mut hub = SignalHub::new();
//! let mut subs = SubscriptionSet::new();
//! subs.push(hub.listen(SignalKind::Scroll, Listener::Progress));
//!
//! for listener in hub.listeners(SignalKind::Scroll) {
//!     page.deliver(listener, &signal);
//! }
//!
//! subs.release_all(&mut hub);
//! assert_eq!(hub.active_count(), 0);
//! ```

use glam::Vec2;

use crate::surface::Viewport;

/// Kinds of signal a component can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Scroll,
    Resize,
    PointerMove,
    PointerLeave,
}

/// A window event as seen by page components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Vertical scroll offset changed, in logical pixels.
    Scroll { offset: f32 },
    /// Viewport size or scale factor changed.
    Resize(Viewport),
    /// Pointer moved, viewport-relative logical pixels.
    PointerMove { position: Vec2 },
    /// Pointer left the window.
    PointerLeave,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Scroll { .. } => SignalKind::Scroll,
            Signal::Resize(_) => SignalKind::Resize,
            Signal::PointerMove { .. } => SignalKind::PointerMove,
            Signal::PointerLeave => SignalKind::PointerLeave,
        }
    }
}

/// Handle for one registration. Not `Clone`: it is released exactly once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a subscription that is dropped can never be released"]
pub struct Subscription {
    id: u64,
    kind: SignalKind,
}

impl Subscription {
    #[inline]
    pub fn kind(&self) -> SignalKind {
        self.kind
    }
}

#[derive(Debug)]
struct Entry<L> {
    id: u64,
    kind: SignalKind,
    listener: L,
}

/// Registry of active listeners, in registration order.
#[derive(Debug)]
pub struct SignalHub<L> {
    entries: Vec<Entry<L>>,
    next_id: u64,
}

impl<L: Copy> SignalHub<L> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Register `listener` for `kind`.
    pub fn listen(&mut self, kind: SignalKind, listener: L) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry { id, kind, listener });
        Subscription { id, kind }
    }

    /// Release a subscription. Returns whether it was still active.
    pub fn release(&mut self, subscription: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != subscription.id);
        self.entries.len() != before
    }

    /// Listeners for `kind`, in registration order.
    ///
    /// Returned by value so the caller can mutate the listeners' owner while
    /// iterating.
    pub fn listeners(&self, kind: SignalKind) -> Vec<L> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.listener)
            .collect()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }
}

impl<L: Copy> Default for SignalHub<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every subscription a component holds, released together on teardown.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every held subscription. Returns how many were still active.
    pub fn release_all<L: Copy>(&mut self, hub: &mut SignalHub<L>) -> usize {
        self.subscriptions
            .drain(..)
            .map(|sub| hub.release(sub))
            .filter(|released| *released)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Who {
        A,
        B,
    }

    #[test]
    fn test_listeners_in_registration_order() {
        let mut hub = SignalHub::new();
        let _a = hub.listen(SignalKind::Scroll, Who::A);
        let _b = hub.listen(SignalKind::Scroll, Who::B);
        let _c = hub.listen(SignalKind::Resize, Who::A);

        assert_eq!(hub.listeners(SignalKind::Scroll), vec![Who::A, Who::B]);
        assert_eq!(hub.listeners(SignalKind::Resize), vec![Who::A]);
        assert!(hub.listeners(SignalKind::PointerMove).is_empty());
    }

    #[test]
    fn test_release_stops_delivery() {
        let mut hub = SignalHub::new();
        let a = hub.listen(SignalKind::Scroll, Who::A);
        let _b = hub.listen(SignalKind::Scroll, Who::B);

        assert!(hub.release(a));
        assert_eq!(hub.listeners(SignalKind::Scroll), vec![Who::B]);
    }

    #[test]
    fn test_release_all_empties_hub() {
        let mut hub = SignalHub::new();
        let mut set = SubscriptionSet::new();
        set.push(hub.listen(SignalKind::Scroll, Who::A));
        set.push(hub.listen(SignalKind::Resize, Who::A));
        set.push(hub.listen(SignalKind::PointerMove, Who::A));
        let other = hub.listen(SignalKind::Scroll, Who::B);

        assert_eq!(set.release_all(&mut hub), 3);
        assert!(set.is_empty());
        assert_eq!(hub.active_count(), 1);
        assert!(hub.release(other));
        assert_eq!(hub.active_count(), 0);
    }

    #[test]
    fn test_repeated_mounts_do_not_leak() {
        let mut hub = SignalHub::new();
        for _ in 0..5 {
            let mut set = SubscriptionSet::new();
            set.push(hub.listen(SignalKind::Scroll, Who::A));
            set.push(hub.listen(SignalKind::Resize, Who::B));
            set.release_all(&mut hub);
        }
        assert_eq!(hub.active_count(), 0);
    }

    #[test]
    fn test_signal_kind() {
        assert_eq!(Signal::Scroll { offset: 1.0 }.kind(), SignalKind::Scroll);
        assert_eq!(Signal::PointerLeave.kind(), SignalKind::PointerLeave);
    }
}
