//! # glowfolio
//!
//! A single-page portfolio rendered natively: a drifting particle field
//! behind the page, content blocks that fade in as they scroll into view,
//! a scroll progress bar and a nav bar that tracks the current section.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glowfolio::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     let config = PageConfig::load("page.toml")?;
//!     glowfolio::run(config)
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The field
//!
//! [`ParticleField`] holds a few dozen particles in normalized coordinates.
//! Each frame it advances once and paints through a [`DrawTarget`]:
//!
//! ```ignore
//! let mut rng = SmallRng::seed_from_u64(7);
//! let mut field = ParticleField::new(FieldConfig::default(), viewport, &mut rng);
//! field.tick();
//! field.render(&mut draw_list);
//! ```
//!
//! ### Reveals
//!
//! [`RevealController`] flips content blocks to visible the first time they
//! enter an observation band, and reports the eased fade-and-rise style for
//! each block:
//!
//! ```ignore
//! let target = reveals.register_target(element, RevealOptions::default().with_delay(0.1));
//! reveals.observe(viewport_rect, |id| layout.rect(id), now);
//! let style = reveals.style(target, now);
//! ```
//!
//! ### Signals
//!
//! Page components register for window signals on a [`SignalHub`] and
//! release every registration on teardown. [`Page`] wires it all together
//! and is what the window host drives.
//!
//! ## Headless use
//!
//! Nothing below [`app`] touches the window or the GPU. Tests and benches
//! mount a [`Page`] against a [`DrawList`] and inspect the recorded shapes.

pub mod app;
pub mod config;
pub mod content;
pub mod draw;
pub mod easing;
pub mod error;
pub mod field;
pub mod frame_loop;
pub mod gpu;
pub mod input;
pub mod layout;
pub mod observer;
pub mod page;
pub mod reveal;
pub mod scroll;
pub mod signals;
pub mod surface;

pub use app::run;
pub use config::{PageConfig, Variant};
pub use content::{Content, Project};
pub use draw::{Color, DrawCommand, DrawList, DrawTarget};
pub use error::{ConfigError, ContentError, GpuError, RunError};
pub use field::{CursorInfluence, FieldConfig, FieldRenderer, GlowConfig, Particle, ParticleField};
pub use frame_loop::{FrameClock, FrameLoop, LoopState};
pub use glam::Vec2;
pub use observer::{ElementId, IntersectionObserver, Rect, RootMargin};
pub use page::{Listener, Page};
pub use reveal::{RevealController, RevealOptions, Visibility};
pub use scroll::{scroll_progress, ActiveSection, NavState, ScrollProgress};
pub use signals::{Signal, SignalHub, SignalKind};
pub use surface::{Surface, Viewport};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use glowfolio::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{PageConfig, Variant};
    pub use crate::content::{Content, Project};
    pub use crate::draw::{Color, DrawList, DrawTarget};
    pub use crate::error::RunError;
    pub use crate::field::{FieldConfig, Particle, ParticleField};
    pub use crate::frame_loop::FrameClock;
    pub use crate::page::Page;
    pub use crate::reveal::{RevealController, RevealOptions};
    pub use crate::signals::{Signal, SignalHub};
    pub use crate::surface::Viewport;
    pub use crate::Vec2;
}
