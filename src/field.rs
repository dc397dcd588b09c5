//! Particle field background.
//!
//! A few dozen dots drift across the viewport in normalized coordinates and
//! bounce off its edges. Each frame the field is advanced once with
//! [`ParticleField::tick`] and painted with [`ParticleField::render`]; the
//! [`FieldRenderer`] wraps both in a start/stop [`FrameLoop`].
//!
//! # Example
//!
//! ```ignore
//! let mut rng = SmallRng::seed_from_u64(7);
//! let mut field = ParticleField::new(FieldConfig::default(), Viewport::default(), &mut rng);
//! let mut list = DrawList::new();
//!
//! field.tick();
//! field.render(&mut list);
//! ```
//!
//! Positions are resolution independent, so resizing the window only changes
//! where particles are drawn, never where they are.

use glam::Vec2;
use rand::Rng;
use serde::Deserialize;

use crate::draw::{Color, DrawTarget};
use crate::frame_loop::{FrameLoop, LoopState};
use crate::surface::{Surface, Viewport};

/// Glow painted beneath each particle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    /// Glow radius as a multiple of the particle radius.
    pub scale: f32,
    /// Alpha at the glow centre.
    pub alpha: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            scale: 6.0,
            alpha: 0.12,
        }
    }
}

/// How the pointer biases particle motion.
///
/// Each tick a particle is displaced by `(pointer - position) * weight`.
/// Positive weights pull particles toward the pointer, negative weights push
/// them away. With a `radius`, particles farther than that (in normalized
/// units) are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CursorInfluence {
    pub weight: f32,
    pub radius: Option<f32>,
}

impl CursorInfluence {
    pub const NONE: CursorInfluence = CursorInfluence {
        weight: 0.0,
        radius: None,
    };

    pub fn attract(weight: f32) -> Self {
        Self {
            weight: weight.abs(),
            radius: None,
        }
    }

    pub fn repel(weight: f32) -> Self {
        Self {
            weight: -weight.abs(),
            radius: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.weight != 0.0
    }

    /// Displacement for a particle at `position` given a normalized pointer.
    pub fn bias(&self, position: Vec2, pointer: Vec2) -> Vec2 {
        let offset = pointer - position;
        if let Some(radius) = self.radius {
            if offset.length_squared() > radius * radius {
                return Vec2::ZERO;
            }
        }
        offset * self.weight
    }
}

/// Tunables for a [`ParticleField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    /// Number of particles.
    pub count: usize,
    /// Width of the symmetric velocity range per axis, in normalized units per frame.
    pub speed: f32,
    /// Minimum particle radius in logical pixels.
    pub radius_min: f32,
    /// Maximum particle radius in logical pixels (exclusive).
    pub radius_max: f32,
    /// Particle fill colour.
    pub color: Color,
    /// Opacity of the whole layer.
    pub opacity: f32,
    /// Optional glow beneath each particle.
    pub glow: Option<GlowConfig>,
    /// Pointer influence.
    pub cursor: CursorInfluence,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 45,
            speed: 0.0004,
            radius_min: 0.3,
            radius_max: 1.3,
            color: Color::from_rgba8(200, 230, 255, 102),
            opacity: 0.5,
            glow: None,
            cursor: CursorInfluence::NONE,
        }
    }
}

/// A single dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Normalized position in `[0,1]^2`.
    pub position: Vec2,
    /// Normalized displacement per frame.
    pub velocity: Vec2,
    /// Radius in logical pixels.
    pub radius: f32,
}

impl Particle {
    /// Advance one frame with an extra displacement, reflecting off the
    /// unit square.
    ///
    /// Returns which axes bounced.
    pub fn step(&mut self, bias: Vec2) -> (bool, bool) {
        let next = self.position + self.velocity + bias;
        let (x, bounced_x) = reflect(next.x, &mut self.velocity.x);
        let (y, bounced_y) = reflect(next.y, &mut self.velocity.y);
        self.position = Vec2::new(x, y);
        (bounced_x, bounced_y)
    }
}

/// Reflect one axis into `[0,1]`.
///
/// The velocity is pointed back inside rather than blindly negated, so a bias
/// pushing a particle against the wall cannot make it flip every frame.
fn reflect(p: f32, v: &mut f32) -> (f32, bool) {
    if !p.is_finite() {
        *v = 0.0;
        return (0.5, true);
    }
    if p < 0.0 {
        let flipped = *v < 0.0;
        *v = v.abs();
        (0.0, flipped)
    } else if p > 1.0 {
        let flipped = *v > 0.0;
        *v = -v.abs();
        (1.0, flipped)
    } else {
        (p, false)
    }
}

/// The simulated particle set bound to a drawing surface.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    surface: Surface,
    config: FieldConfig,
    pointer: Option<Vec2>,
}

impl ParticleField {
    /// Allocate `config.count` particles with randomized state.
    pub fn new<R: Rng + ?Sized>(config: FieldConfig, viewport: Viewport, rng: &mut R) -> Self {
        let half_speed = (config.speed.abs() * 0.5).max(f32::EPSILON);
        let (r_lo, r_hi) = (config.radius_min, config.radius_max.max(config.radius_min));

        let particles = (0..config.count)
            .map(|_| Particle {
                position: Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()),
                velocity: Vec2::new(
                    rng.gen_range(-half_speed..half_speed),
                    rng.gen_range(-half_speed..half_speed),
                ),
                // A degenerate range pins every radius to the minimum.
                radius: if r_hi > r_lo { rng.gen_range(r_lo..r_hi) } else { r_lo },
            })
            .collect();

        Self::from_particles(particles, config, viewport)
    }

    /// Build a field from explicit particles (positions are clamped into range).
    pub fn from_particles(mut particles: Vec<Particle>, config: FieldConfig, viewport: Viewport) -> Self {
        for p in &mut particles {
            p.position = p.position.clamp(Vec2::ZERO, Vec2::ONE);
        }
        Self {
            particles,
            surface: Surface::new(viewport),
            config,
            pointer: None,
        }
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Rescale the drawing surface. Particle state is not touched.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.surface.resize(viewport)
    }

    /// Set or clear the normalized pointer position.
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer.filter(|p| p.is_finite());
    }

    #[inline]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Advance every particle by one frame.
    pub fn tick(&mut self) {
        let cursor = self.config.cursor;
        let pointer = self.pointer.filter(|_| cursor.is_active());
        for p in &mut self.particles {
            let bias = match pointer {
                Some(ptr) => cursor.bias(p.position, ptr),
                None => Vec2::ZERO,
            };
            p.step(bias);
        }
    }

    /// Where a particle is painted, in logical pixels.
    #[inline]
    pub fn draw_position(&self, particle: &Particle) -> Vec2 {
        self.surface.denormalize(particle.position)
    }

    /// Clear the target and paint every particle.
    pub fn render(&self, target: &mut dyn DrawTarget) {
        target.clear(Color::TRANSPARENT);
        self.paint(target);
    }

    /// Paint every particle without clearing, for compositing onto a page.
    pub fn paint(&self, target: &mut dyn DrawTarget) {
        let opacity = self.config.opacity;
        let color = self.config.color.fade(opacity);
        for p in &self.particles {
            let center = self.draw_position(p);
            if let Some(glow) = self.config.glow {
                target.fill_glow(
                    center,
                    p.radius * glow.scale,
                    self.config.color.with_alpha(glow.alpha * opacity),
                );
            }
            target.fill_circle(center, p.radius, color);
        }
    }
}

/// Field plus its frame loop, as mounted on a page.
///
/// Mounting without a surface leaves the renderer permanently inert: the loop
/// never starts and frames do nothing.
#[derive(Debug)]
pub struct FieldRenderer {
    field: Option<ParticleField>,
    frame_loop: FrameLoop,
}

impl FieldRenderer {
    /// Mount the field on `viewport`, or on nothing if no surface is attached.
    pub fn mount<R: Rng + ?Sized>(config: FieldConfig, viewport: Option<Viewport>, rng: &mut R) -> Self {
        let mut frame_loop = FrameLoop::new();
        let field = match viewport {
            Some(vp) => {
                frame_loop.start();
                tracing::debug!(count = config.count, "particle field mounted");
                Some(ParticleField::new(config, vp, rng))
            }
            None => {
                tracing::warn!("no drawing surface; particle field disabled");
                None
            }
        };
        Self { field, frame_loop }
    }

    #[inline]
    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.frame_loop.state()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.frame_loop.should_run()
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if let Some(field) = &mut self.field {
            if field.resize(viewport) {
                tracing::debug!(
                    width = viewport.width,
                    height = viewport.height,
                    scale = viewport.scale_factor,
                    "particle surface resized"
                );
            }
        }
    }

    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        if let Some(field) = &mut self.field {
            field.set_pointer(pointer);
        }
    }

    /// Run one tick and paint onto `target`. Returns whether a frame ran.
    pub fn frame(&mut self, target: &mut dyn DrawTarget) -> bool {
        if !self.frame_loop.record_frame() {
            return false;
        }
        match &mut self.field {
            Some(field) => {
                field.tick();
                field.paint(target);
                true
            }
            None => false,
        }
    }

    /// Stop the loop and drop the particles.
    pub fn teardown(&mut self) {
        self.frame_loop.stop();
        self.field = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawList;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn particle(pos: (f32, f32), vel: (f32, f32)) -> Particle {
        Particle {
            position: Vec2::new(pos.0, pos.1),
            velocity: Vec2::new(vel.0, vel.1),
            radius: 1.0,
        }
    }

    #[test]
    fn test_new_respects_ranges() {
        let mut rng = SmallRng::seed_from_u64(1);
        let config = FieldConfig::default();
        let field = ParticleField::new(config, Viewport::default(), &mut rng);

        assert_eq!(field.len(), 45);
        for p in field.particles() {
            assert!((0.0..=1.0).contains(&p.position.x));
            assert!((0.0..=1.0).contains(&p.position.y));
            assert!(p.velocity.x.abs() <= 0.0002);
            assert!(p.velocity.y.abs() <= 0.0002);
            assert!(p.radius >= 0.3 && p.radius < 1.3);
        }
    }

    #[test]
    fn test_equal_radii_pin_every_particle() {
        let mut rng = SmallRng::seed_from_u64(2);
        let config = FieldConfig {
            radius_min: 2.0,
            radius_max: 2.0,
            ..FieldConfig::default()
        };
        let field = ParticleField::new(config, Viewport::default(), &mut rng);
        assert_eq!(field.len(), 45);
        assert!(field.particles().iter().all(|p| p.radius == 2.0));
    }

    #[test]
    fn test_step_reflects_at_right_wall() {
        let mut p = particle((0.9999, 0.5), (0.001, 0.0));
        let (bx, by) = p.step(Vec2::ZERO);
        assert!(bx && !by);
        assert_eq!(p.position.x, 1.0);
        assert!(p.velocity.x < 0.0);

        // Next frame moves back inside without another flip.
        let (bx, _) = p.step(Vec2::ZERO);
        assert!(!bx);
        assert!(p.position.x < 1.0);
    }

    #[test]
    fn test_step_reflects_at_top_wall() {
        let mut p = particle((0.5, 0.0001), (0.0, -0.001));
        let (_, by) = p.step(Vec2::ZERO);
        assert!(by);
        assert_eq!(p.position.y, 0.0);
        assert!(p.velocity.y > 0.0);
    }

    #[test]
    fn test_bias_against_wall_does_not_oscillate() {
        // Strong pull past the left wall while moving inward.
        let mut p = particle((0.0, 0.5), (0.0001, 0.0));
        for _ in 0..10 {
            p.step(Vec2::new(-0.01, 0.0));
            assert!(p.velocity.x > 0.0);
            assert_eq!(p.position.x, 0.0);
        }
    }

    #[test]
    fn test_non_finite_position_recovers() {
        let mut p = particle((0.5, 0.5), (f32::NAN, 0.0));
        p.step(Vec2::ZERO);
        assert!(p.position.is_finite());
        assert_eq!(p.velocity.x, 0.0);
    }

    #[test]
    fn test_cursor_attracts_and_repels() {
        let pos = Vec2::new(0.2, 0.2);
        let ptr = Vec2::new(0.8, 0.2);
        assert!(CursorInfluence::attract(0.01).bias(pos, ptr).x > 0.0);
        assert!(CursorInfluence::repel(0.01).bias(pos, ptr).x < 0.0);
        assert_eq!(
            CursorInfluence::attract(0.01).with_radius(0.1).bias(pos, ptr),
            Vec2::ZERO
        );
    }

    #[test]
    fn test_tick_ignores_pointer_without_influence() {
        let config = FieldConfig::default();
        let mut a = ParticleField::from_particles(
            vec![particle((0.5, 0.5), (0.0, 0.0))],
            config,
            Viewport::default(),
        );
        a.set_pointer(Some(Vec2::new(1.0, 1.0)));
        a.tick();
        assert_eq!(a.particles()[0].position, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_tick_with_influence_drifts_to_pointer() {
        let config = FieldConfig {
            cursor: CursorInfluence::attract(0.01),
            ..FieldConfig::default()
        };
        let mut field = ParticleField::from_particles(
            vec![particle((0.5, 0.5), (0.0, 0.0))],
            config,
            Viewport::default(),
        );
        field.set_pointer(Some(Vec2::new(1.0, 0.5)));
        field.tick();
        assert!(field.particles()[0].position.x > 0.5);

        field.set_pointer(Some(Vec2::new(f32::NAN, 0.0)));
        assert_eq!(field.pointer(), None);
    }

    #[test]
    fn test_render_paints_each_particle() {
        let mut rng = SmallRng::seed_from_u64(3);
        let config = FieldConfig {
            count: 10,
            glow: Some(GlowConfig::default()),
            ..FieldConfig::default()
        };
        let field = ParticleField::new(config, Viewport::new(1000.0, 500.0, 2.0), &mut rng);
        let mut list = DrawList::new();
        field.render(&mut list);

        assert_eq!(list.clear_color(), Some(Color::TRANSPARENT));
        assert_eq!(list.circles().count(), 10);
        assert_eq!(list.glows().count(), 10);
        for ((center, radius), p) in list.circles().zip(field.particles()) {
            assert_eq!(center, Vec2::new(p.position.x * 1000.0, p.position.y * 500.0));
            assert_eq!(radius, p.radius);
        }
    }

    #[test]
    fn test_renderer_without_surface_is_inert() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut renderer = FieldRenderer::mount(FieldConfig::default(), None, &mut rng);
        assert_eq!(renderer.state(), LoopState::Idle);
        assert!(renderer.field().is_none());

        let mut list = DrawList::new();
        assert!(!renderer.frame(&mut list));
        assert!(list.is_empty());
    }

    #[test]
    fn test_renderer_teardown_stops_frames() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut renderer =
            FieldRenderer::mount(FieldConfig::default(), Some(Viewport::default()), &mut rng);
        let mut list = DrawList::new();
        assert!(renderer.frame(&mut list));

        renderer.teardown();
        assert_eq!(renderer.state(), LoopState::Stopped);
        assert!(!renderer.frame(&mut list));
        assert!(renderer.field().is_none());
    }
}
