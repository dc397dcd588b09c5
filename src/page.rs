//! The portfolio page: every component wired to the window signals.
//!
//! A [`Page`] owns the layout, the particle field, the reveal controller and
//! the scroll-derived state. It registers what it listens to with a
//! [`SignalHub`] on mount, gets signals routed back through
//! [`Page::deliver`], and releases all of it in [`Page::teardown`].
//!
//! ```ignore
//! let mut hub = SignalHub::new();
//! let mut page = Page::mount(config, content, viewport, &mut hub, &mut rng);
//!
//! if let Some(signal) = page.scroll_by(120.0) {
//!     page.signal(&hub, signal);
//! }
//! page.frame(clock.now(), &mut draw_list);
//!
//! page.teardown(&mut hub);
//! ```

use glam::Vec2;
use rand::Rng;

use crate::config::PageConfig;
use crate::content::{CardImage, Content};
use crate::draw::{Color, DrawTarget};
use crate::field::{FieldRenderer, ParticleField};
use crate::frame_loop::LoopState;
use crate::input::ScrollCommand;
use crate::layout::{
    Block, BlockKind, MediaFill, PageLayout, BREAKPOINT_LG, NAV_HEIGHT, SECTION_IDS,
};
use crate::observer::{ElementId, Rect};
use crate::reveal::{RevealController, RevealOptions, RevealStyle, TargetId};
use crate::scroll::{ActiveSection, NavState, ScrollMetrics, ScrollProgress};
use crate::signals::{Signal, SignalHub, SignalKind, SubscriptionSet};
use crate::surface::Viewport;

/// Radius of the light that follows the pointer.
const CURSOR_GLOW_RADIUS: f32 = 280.0;
const PROGRESS_BAR_HEIGHT: f32 = 2.0;
const CARD_RADIUS: f32 = 16.0;

/// Page components that receive signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Field,
    Layout,
    Progress,
    Nav,
    CursorGlow,
}

/// A mounted page.
#[derive(Debug)]
pub struct Page {
    config: PageConfig,
    content: Content,
    images: Vec<Option<CardImage>>,
    viewport: Viewport,
    layout: PageLayout,
    field: FieldRenderer,
    reveals: RevealController,
    targets: Vec<(ElementId, TargetId)>,
    active: Option<ActiveSection>,
    progress: ScrollProgress,
    nav: NavState,
    scroll_offset: f32,
    pointer: Option<Vec2>,
    subscriptions: SubscriptionSet,
    mounted: bool,
}

impl Page {
    /// Build the page for `viewport` and subscribe its listeners on `hub`.
    pub fn mount<R: Rng + ?Sized>(
        config: PageConfig,
        content: Content,
        viewport: Viewport,
        hub: &mut SignalHub<Listener>,
        rng: &mut R,
    ) -> Self {
        let images: Vec<Option<CardImage>> = content
            .projects
            .iter()
            .map(|p| {
                p.image_path
                    .as_deref()
                    .and_then(|path| CardImage::load(&config.assets, path))
            })
            .collect();

        let layout = PageLayout::compute(
            &content,
            &images,
            viewport.width,
            viewport.height,
            config.layout,
        );

        let surface = config.capabilities.surface.then_some(viewport);
        let field = FieldRenderer::mount(config.field, surface, rng);

        let mut reveals = if config.capabilities.intersection {
            RevealController::new(config.reveal.animation)
        } else {
            RevealController::unsupported(config.reveal.animation)
        };
        let targets = layout
            .blocks()
            .iter()
            .filter_map(|block| {
                let delay = block.reveal_delay?;
                let mut options = RevealOptions::default()
                    .with_margin(config.reveal.margin)
                    .with_delay(delay);
                options.once = config.reveal.once;
                Some((block.element, reveals.register_target(block.element, options)))
            })
            .collect();

        let active = config.capabilities.intersection.then(|| {
            let mut active = ActiveSection::new(config.nav.active_margin);
            for section in layout.sections() {
                active.register(section.element, section.id);
            }
            active
        });

        let metrics = ScrollMetrics::from_document(layout.document_height(), viewport.height);
        let progress = if config.capabilities.scroll {
            ScrollProgress::new(metrics)
        } else {
            ScrollProgress::unsupported()
        };

        let mut subscriptions = SubscriptionSet::new();
        subscriptions.push(hub.listen(SignalKind::Scroll, Listener::Progress));
        subscriptions.push(hub.listen(SignalKind::Scroll, Listener::Nav));
        subscriptions.push(hub.listen(SignalKind::Resize, Listener::Layout));
        subscriptions.push(hub.listen(SignalKind::Resize, Listener::Field));
        subscriptions.push(hub.listen(SignalKind::PointerMove, Listener::Field));
        subscriptions.push(hub.listen(SignalKind::PointerLeave, Listener::Field));
        if config.cursor_glow {
            subscriptions.push(hub.listen(SignalKind::PointerMove, Listener::CursorGlow));
            subscriptions.push(hub.listen(SignalKind::PointerLeave, Listener::CursorGlow));
        }

        tracing::info!(
            variant = ?config.variant,
            projects = content.project_count(),
            reveal_targets = reveals.len(),
            "page mounted"
        );

        let nav = NavState::new(config.nav.scrolled_threshold);
        Self {
            config,
            content,
            images,
            viewport,
            layout,
            field,
            reveals,
            targets,
            active,
            progress,
            nav,
            scroll_offset: 0.0,
            pointer: None,
            subscriptions,
            mounted: true,
        }
    }

    // ========== Signals ==========

    /// Route `signal` to every listener `hub` has for it.
    pub fn signal(&mut self, hub: &SignalHub<Listener>, signal: Signal) {
        for listener in hub.listeners(signal.kind()) {
            self.deliver(listener, &signal);
        }
    }

    /// Hand one signal to one component.
    pub fn deliver(&mut self, listener: Listener, signal: &Signal) {
        match (listener, *signal) {
            (Listener::Progress, Signal::Scroll { offset }) => {
                self.progress.set_offset(offset);
            }
            (Listener::Nav, Signal::Scroll { offset }) => {
                self.nav.update(offset);
            }
            (Listener::Layout, Signal::Resize(viewport)) => self.relayout(viewport),
            (Listener::Field, Signal::Resize(viewport)) => self.field.resize(viewport),
            (Listener::Field, Signal::PointerMove { position }) => {
                let size = self.viewport.size();
                if size.x > 0.0 && size.y > 0.0 {
                    self.field.set_pointer(Some(position / size));
                }
            }
            (Listener::Field, Signal::PointerLeave) => self.field.set_pointer(None),
            (Listener::CursorGlow, Signal::PointerMove { position }) => {
                self.pointer = Some(position);
            }
            (Listener::CursorGlow, Signal::PointerLeave) => self.pointer = None,
            _ => {}
        }
    }

    fn relayout(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout = PageLayout::compute(
            &self.content,
            &self.images,
            viewport.width,
            viewport.height,
            self.config.layout,
        );
        let metrics = ScrollMetrics::from_document(self.layout.document_height(), viewport.height);
        self.progress.set_metrics(metrics);
        self.scroll_offset = metrics.clamp(self.scroll_offset);
        self.progress.set_offset(self.scroll_offset);
        self.nav.update(self.scroll_offset);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            document_height = self.layout.document_height(),
            "page relayout"
        );
    }

    // ========== Scrolling ==========

    /// Largest scroll offset for the current layout.
    pub fn max_scroll(&self) -> f32 {
        ScrollMetrics::from_document(self.layout.document_height(), self.viewport.height).max_offset()
    }

    /// Move to `offset`. Returns the scroll signal to dispatch, or `None`
    /// when the position did not change.
    pub fn scroll_to(&mut self, offset: f32) -> Option<Signal> {
        let metrics = ScrollMetrics::from_document(self.layout.document_height(), self.viewport.height);
        let offset = metrics.clamp(offset);
        if offset == self.scroll_offset {
            return None;
        }
        self.scroll_offset = offset;
        Some(Signal::Scroll { offset })
    }

    pub fn scroll_by(&mut self, delta: f32) -> Option<Signal> {
        self.scroll_to(self.scroll_offset + delta)
    }

    /// Jump to a section, leaving room for the nav bar above it.
    pub fn scroll_to_section(&mut self, id: &str) -> Option<Signal> {
        let anchor = self.layout.section_anchor(id)?;
        self.scroll_to(anchor)
    }

    pub fn apply_scroll(&mut self, command: ScrollCommand) -> Option<Signal> {
        match command {
            ScrollCommand::By(delta) => self.scroll_by(delta),
            ScrollCommand::Top => self.scroll_to(0.0),
            ScrollCommand::Bottom => self.scroll_to(self.max_scroll()),
            // Nav links skip the hero.
            ScrollCommand::Section(n) => {
                let id = *SECTION_IDS.get(n + 1)?;
                self.scroll_to_section(id)
            }
        }
    }

    // ========== Frame ==========

    /// Visible part of the document.
    pub fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_offset, self.viewport.width, self.viewport.height)
    }

    /// Run one frame: observation cycle, field tick, full repaint.
    ///
    /// Returns `false` once the page has been torn down.
    pub fn frame(&mut self, now: f32, target: &mut dyn DrawTarget) -> bool {
        if !self.mounted {
            return false;
        }

        let root = self.viewport_rect();
        let layout = &self.layout;
        self.reveals.observe(root, |id| layout.rect(id), now);
        if let Some(active) = &mut self.active {
            active.observe(root, |id| layout.rect(id), now);
        }

        target.clear(self.config.background);
        self.field.frame(target);
        self.paint_cursor_glow(target);
        for block in self.layout.blocks() {
            self.paint_block(block, now, target);
        }
        self.paint_chrome(target);
        true
    }

    fn paint_cursor_glow(&self, target: &mut dyn DrawTarget) {
        if !self.config.cursor_glow || self.viewport.width < BREAKPOINT_LG {
            return;
        }
        if let Some(pointer) = self.pointer {
            target.fill_glow(pointer, CURSOR_GLOW_RADIUS, Color::from_rgba8(114, 247, 184, 20));
        }
    }

    fn block_style(&self, element: ElementId, now: f32) -> RevealStyle {
        self.targets
            .iter()
            .find(|(e, _)| *e == element)
            .map_or(RevealStyle::VISIBLE, |(_, target)| self.reveals.style(*target, now))
    }

    fn paint_block(&self, block: &Block, now: f32, target: &mut dyn DrawTarget) {
        let style = self.block_style(block.element, now);
        if style.opacity <= 0.0 {
            return;
        }
        let dy = style.offset_y - self.scroll_offset;
        let rect = block.rect.offset_y(dy);
        if rect.bottom() < 0.0 || rect.y > self.viewport.height {
            return;
        }
        let alpha = style.opacity;
        let origin = Vec2::new(rect.x, rect.y);
        let size = Vec2::new(rect.width, rect.height);
        let panel = Color::WHITE.with_alpha(0.02 * alpha);
        let ink = Color::WHITE.with_alpha(0.14 * alpha);

        match block.kind {
            BlockKind::FeaturedCard { .. } | BlockKind::ProjectCard { .. } => {
                target.fill_rect(origin, size, CARD_RADIUS, panel);
                if matches!(block.kind, BlockKind::ProjectCard { .. }) {
                    target.fill_rect(origin, Vec2::new(rect.width, 2.0), 0.0, block.accent.fade(alpha));
                }
            }
            BlockKind::Stat(_) | BlockKind::PhilosophyPanel => {
                target.fill_rect(origin, size, 12.0, panel);
            }
            BlockKind::Principle(_) => {
                target.fill_circle(origin + Vec2::new(4.0, 10.0), 4.0, block.accent.fade(alpha));
            }
            BlockKind::Marquee | BlockKind::Footer => {
                target.fill_rect(origin, Vec2::new(rect.width, 1.0), 0.0, Color::WHITE.with_alpha(0.06));
            }
            _ => {}
        }

        if let Some(media) = block.media {
            let m = media.rect.offset_y(dy);
            let color = match media.fill {
                MediaFill::Image(average) => average.fade(alpha),
                MediaFill::Pattern => block.accent.with_alpha(0.08 * alpha),
            };
            target.fill_rect(Vec2::new(m.x, m.y), Vec2::new(m.width, m.height), 8.0, color);
        }

        for line in &block.text_lines {
            let l = line.offset_y(dy);
            target.fill_rect(Vec2::new(l.x, l.y), Vec2::new(l.width, l.height), l.height * 0.5, ink);
        }
    }

    fn paint_chrome(&self, target: &mut dyn DrawTarget) {
        let width = self.viewport.width;
        let accent = Color::from_rgba8(114, 247, 184, 255);

        let bar = if self.nav.is_scrolled() {
            self.config.background.with_alpha(0.85)
        } else {
            Color::TRANSPARENT
        };
        target.fill_rect(Vec2::ZERO, Vec2::new(width, NAV_HEIGHT), 0.0, bar);

        // One marker per nav link, right aligned; the active one lit.
        let container = self.layout.container();
        let active = self.active_section();
        for (i, id) in SECTION_IDS.iter().skip(1).enumerate() {
            let x = container.x + container.width - (3 - i) as f32 * 64.0;
            let color = if active == Some(*id) {
                accent
            } else {
                Color::WHITE.with_alpha(0.3)
            };
            target.fill_rect(Vec2::new(x, NAV_HEIGHT * 0.5 - 2.0), Vec2::new(40.0, 4.0), 2.0, color);
        }

        let progress = self.progress.progress();
        target.fill_rect(
            Vec2::ZERO,
            Vec2::new(width * progress, PROGRESS_BAR_HEIGHT),
            0.0,
            accent,
        );
    }

    // ========== Teardown ==========

    /// Stop the field loop, disconnect observers and release every
    /// subscription. Returns how many subscriptions were released.
    pub fn teardown(&mut self, hub: &mut SignalHub<Listener>) -> usize {
        let released = self.subscriptions.release_all(hub);
        self.field.teardown();
        self.reveals.disconnect();
        if let Some(active) = &mut self.active {
            active.disconnect();
        }
        self.mounted = false;
        tracing::info!(released, "page torn down");
        released
    }

    // ========== Accessors ==========

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[inline]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    #[inline]
    pub fn reveals(&self) -> &RevealController {
        &self.reveals
    }

    /// Reveal target registered for a block.
    pub fn target_for(&self, element: ElementId) -> Option<TargetId> {
        self.targets.iter().find(|(e, _)| *e == element).map(|(_, t)| *t)
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.field.field()
    }

    #[inline]
    pub fn field_state(&self) -> LoopState {
        self.field.state()
    }

    /// Whether the page wants another frame.
    #[inline]
    pub fn wants_frame(&self) -> bool {
        self.mounted
    }

    #[inline]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn progress(&self) -> f32 {
        self.progress.progress()
    }

    pub fn nav_scrolled(&self) -> bool {
        self.nav.is_scrolled()
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.as_ref().and_then(|a| a.active_id())
    }

    #[inline]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    #[inline]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
