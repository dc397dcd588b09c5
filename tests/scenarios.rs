//! End-to-end behaviour of the page pieces, driven headless.
//!
//! Each test runs the same code the window host runs, minus the window: a
//! seeded RNG instead of entropy, a [`DrawList`] instead of the GPU, and
//! explicit timestamps instead of a wall clock.

use glowfolio::content::Content;
use glowfolio::observer::{ElementId, Rect, RootMargin};
use glowfolio::prelude::*;
use glowfolio::reveal::{RevealAnimation, Visibility};
use glowfolio::scroll::{scroll_progress, ActiveSection, ScrollMetrics, ScrollProgress};
use glowfolio::signals::SignalHub;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn in_unit_square(p: Vec2) -> bool {
    p.is_finite() && (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
}

// ============================================================================
// Particle field
// ============================================================================

#[test]
fn test_field_stays_in_bounds_for_a_thousand_ticks() {
    let mut rng = SmallRng::seed_from_u64(45);
    let mut field = ParticleField::new(FieldConfig::default(), Viewport::new(1024.0, 768.0, 1.0), &mut rng);
    assert_eq!(field.len(), 45);

    for _ in 0..1000 {
        field.tick();
    }
    for p in field.particles() {
        assert!(in_unit_square(p.position), "escaped: {:?}", p.position);
        assert!(p.velocity.is_finite());
    }
}

#[test]
fn test_bounds_hold_across_seeds_and_speeds() {
    for seed in 0..32u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let config = FieldConfig {
            count: 20,
            speed: 0.01 * (seed as f32 + 1.0),
            ..FieldConfig::default()
        };
        let mut field = ParticleField::new(config, Viewport::default(), &mut rng);
        for _ in 0..500 {
            field.tick();
            assert!(field.particles().iter().all(|p| in_unit_square(p.position)));
        }
    }
}

#[test]
fn test_reflection_reverses_velocity_at_walls() {
    let particle = Particle {
        position: Vec2::new(0.999, 0.001),
        velocity: Vec2::new(0.01, -0.01),
        radius: 1.0,
    };
    let mut field = ParticleField::from_particles(vec![particle], FieldConfig::default(), Viewport::default());
    field.tick();

    let p = field.particles()[0];
    assert!(in_unit_square(p.position));
    assert!(p.velocity.x < 0.0);
    assert!(p.velocity.y > 0.0);
    assert_eq!(p.velocity.abs(), Vec2::splat(0.01));
}

#[test]
fn test_resize_mid_animation_keeps_normalized_positions() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut field = ParticleField::new(FieldConfig::default(), Viewport::new(1024.0, 768.0, 1.0), &mut rng);
    for _ in 0..120 {
        field.tick();
    }

    let before: Vec<Particle> = field.particles().to_vec();
    let drawn_before: Vec<Vec2> = before.iter().map(|p| field.draw_position(p)).collect();

    field.resize(Viewport::new(1920.0, 1080.0, 1.0));

    let scale = Vec2::new(1920.0 / 1024.0, 1080.0 / 768.0);
    for (i, p) in field.particles().iter().enumerate() {
        assert_eq!(p.position, before[i].position);
        let drawn = field.draw_position(p);
        let expected = drawn_before[i] * scale;
        assert!((drawn - expected).abs().max_element() < 1e-3, "{drawn:?} vs {expected:?}");
    }
}

// ============================================================================
// Reveals
// ============================================================================

#[test]
fn test_trigger_once_fires_a_single_transition() {
    let margin: RootMargin = "-60px 0 0 0".parse().unwrap();
    let mut reveals = RevealController::new(RevealAnimation::default());
    let target = reveals.register_target(ElementId(1), RevealOptions::default().with_margin(margin));

    assert!(reveals.on_intersect(target, 0.0));
    assert!(!reveals.on_intersect(target, 0.1));
    assert_eq!(reveals.reveal_count(target), 1);
    assert_eq!(reveals.visibility(target), Some(Visibility::Revealed));
    assert_eq!(reveals.observed_count(), 0);
}

#[test]
fn test_trigger_once_survives_scrolling_back_and_forth() {
    let margin: RootMargin = "-60px 0px".parse().unwrap();
    let mut reveals = RevealController::new(RevealAnimation::default());
    let target = reveals.register_target(ElementId(3), RevealOptions::default().with_margin(margin));
    let block = Rect::new(0.0, 1200.0, 800.0, 300.0);
    let layout = |id: ElementId| (id == ElementId(3)).then_some(block);

    let mut fired = 0;
    for (i, offset) in [0.0, 600.0, 0.0, 600.0, 1200.0, 0.0].into_iter().enumerate() {
        fired += reveals.observe(Rect::new(0.0, offset, 800.0, 800.0), layout, i as f32);
        assert_eq!(
            reveals.visibility(target),
            Some(if fired == 0 { Visibility::Hidden } else { Visibility::Revealed })
        );
    }
    assert_eq!(fired, 1);
    assert_eq!(reveals.reveal_count(target), 1);
}

#[test]
fn test_reveal_style_eases_to_visible() {
    let mut reveals = RevealController::new(RevealAnimation::default());
    let target = reveals.register_target(ElementId(0), RevealOptions::default().with_delay(0.1));
    reveals.on_intersect(target, 1.0);

    let start = reveals.style(target, 1.05);
    assert_eq!(start.opacity, 0.0);
    assert_eq!(start.offset_y, 24.0);

    let mid = reveals.style(target, 1.35);
    assert!(mid.opacity > 0.5 && mid.opacity < 1.0);

    let end = reveals.style(target, 2.0);
    assert_eq!(end.opacity, 1.0);
    assert_eq!(end.offset_y, 0.0);
    assert!(!reveals.is_animating(2.0));
}

// ============================================================================
// Scroll progress and active section
// ============================================================================

#[test]
fn test_progress_sequence() {
    let mut progress = ScrollProgress::new(ScrollMetrics::from_document(1200.0, 800.0));
    let seen: Vec<f32> = [0.0, 200.0, 400.0]
        .into_iter()
        .map(|offset| {
            progress.set_offset(offset);
            progress.progress()
        })
        .collect();
    assert_eq!(seen, vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_progress_is_bounded_and_monotonic() {
    let max = 3000.0;
    let mut last = 0.0;
    for step in -20..=200 {
        let offset = step as f32 * 17.0;
        let p = scroll_progress(offset, max);
        assert!((0.0..=1.0).contains(&p));
        assert!(p >= last);
        last = p;
    }
    assert_eq!(scroll_progress(250.0, 0.0), 0.0);
    assert_eq!(scroll_progress(250.0, -10.0), 0.0);
}

#[test]
fn test_active_section_retained_between_sections() {
    let mut active = ActiveSection::default();
    active.register(ElementId(0), "work");
    active.register(ElementId(1), "about");
    let layout = |id: ElementId| match id.0 {
        0 => Some(Rect::new(0.0, 0.0, 1000.0, 500.0)),
        1 => Some(Rect::new(0.0, 600.0, 1000.0, 600.0)),
        _ => None,
    };
    let root = |offset: f32| Rect::new(0.0, offset, 1000.0, 1000.0);

    active.observe(root(0.0), layout, 0.0);
    assert_eq!(active.active_id(), Some("work"));

    active.observe(root(250.0), layout, 1.0);
    assert_eq!(active.active_id(), Some("about"));

    // Band 500..600 falls in the gap between the two sections.
    active.observe(root(200.0), layout, 2.0);
    assert_eq!(active.active_id(), Some("about"));
}

// ============================================================================
// Whole page
// ============================================================================

#[test]
fn test_page_scroll_round_trip() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut hub = SignalHub::new();
    let mut page = Page::mount(
        PageConfig::default(),
        Content::default(),
        Viewport::new(1280.0, 800.0, 1.0),
        &mut hub,
        &mut rng,
    );
    let mut list = DrawList::new();
    let mut clock = FrameClock::fixed(1.0 / 60.0);

    let max = page.max_scroll();
    assert!(max > 0.0);
    let mut offset = 0.0;
    while offset < max {
        offset += 240.0;
        if let Some(signal) = page.scroll_to(offset) {
            page.signal(&hub, signal);
        }
        clock.update();
        list.reset();
        assert!(page.frame(clock.now(), &mut list));
        assert!((0.0..=1.0).contains(&page.progress()));
    }
    assert_eq!(page.progress(), 1.0);
    assert!(page.nav_scrolled());
    assert!(page.active_section().is_some());

    if let Some(signal) = page.scroll_to(0.0) {
        page.signal(&hub, signal);
    }
    assert_eq!(page.progress(), 0.0);
    assert!(!page.nav_scrolled());

    let released = page.teardown(&mut hub);
    assert_eq!(released, 8);
    assert_eq!(hub.active_count(), 0);
    assert!(!page.frame(clock.now(), &mut list));
}
