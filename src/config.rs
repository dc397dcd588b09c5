//! Page configuration.
//!
//! A [`Variant`] picks a preset; a TOML file can then override any single
//! value. Everything in the file is optional:
//!
//! ```toml
//! variant = "reactive"
//! content = "content.toml"
//!
//! [field]
//! count = 80
//! glow = { scale = 8.0, alpha = 0.1 }
//! cursor = { weight = 0.001, radius = 0.3 }
//!
//! [reveal]
//! margin = "-60px"
//!
//! [capabilities]
//! intersection = false
//! ```
//!
//! Relative paths in a loaded file resolve against the file's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::draw::Color;
use crate::error::ConfigError;
use crate::field::{CursorInfluence, FieldConfig, GlowConfig};
use crate::layout::LayoutOptions;
use crate::observer::{MarginValue, RootMargin};
use crate::reveal::RevealAnimation;
use crate::scroll::{ACTIVE_SECTION_MARGIN, NAV_SCROLLED_THRESHOLD};

/// Visual flavour of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Plain drifting dots.
    #[default]
    Dots,
    /// Dots with a soft halo.
    Glow,
    /// Haloed dots drawn toward the pointer.
    Reactive,
}

impl Variant {
    /// Baseline configuration for this variant.
    pub fn preset(self) -> PageConfig {
        let mut config = PageConfig {
            variant: self,
            ..PageConfig::default()
        };
        match self {
            Variant::Dots => {}
            Variant::Glow => {
                config.field.glow = Some(GlowConfig::default());
            }
            Variant::Reactive => {
                config.field.glow = Some(GlowConfig::default());
                config.field.cursor = CursorInfluence::attract(0.0008).with_radius(0.25);
            }
        }
        config
    }
}

/// Reveal behaviour shared by every content block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealSettings {
    pub margin: RootMargin,
    pub once: bool,
    pub animation: RevealAnimation,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            margin: RootMargin::uniform(MarginValue::Px(-60.0)),
            once: true,
            animation: RevealAnimation::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavSettings {
    /// Band that decides the active section.
    pub active_margin: RootMargin,
    pub scrolled_threshold: f32,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            active_margin: ACTIVE_SECTION_MARGIN.parse().unwrap_or(RootMargin::ZERO),
            scrolled_threshold: NAV_SCROLLED_THRESHOLD,
        }
    }
}

/// Host facilities. Turning one off exercises the degraded path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Drawing surface for the particle field.
    pub surface: bool,
    /// Intersection observation for reveals and the active section.
    pub intersection: bool,
    /// Scroll metrics for the progress bar.
    pub scroll: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            surface: true,
            intersection: true,
            scroll: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "glowfolio".into(),
            width: 1280,
            height: 800,
        }
    }
}

/// Fully resolved page configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub variant: Variant,
    pub field: FieldConfig,
    /// Large soft light following the pointer on wide viewports.
    pub cursor_glow: bool,
    pub background: Color,
    pub reveal: RevealSettings,
    pub nav: NavSettings,
    pub capabilities: Capabilities,
    pub layout: LayoutOptions,
    pub window: WindowSettings,
    /// Content file; `None` uses the built-in project list.
    pub content: Option<PathBuf>,
    /// Root directory for card images.
    pub assets: PathBuf,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Dots,
            field: FieldConfig::default(),
            cursor_glow: true,
            background: Color::from_rgba8(5, 6, 11, 255),
            reveal: RevealSettings::default(),
            nav: NavSettings::default(),
            capabilities: Capabilities::default(),
            layout: LayoutOptions::default(),
            window: WindowSettings::default(),
            content: None,
            assets: PathBuf::from("assets"),
        }
    }
}

// ========== File schema ==========

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOverrides {
    pub count: Option<usize>,
    pub speed: Option<f32>,
    pub radius_min: Option<f32>,
    pub radius_max: Option<f32>,
    pub color: Option<Color>,
    pub opacity: Option<f32>,
    pub glow: Option<GlowConfig>,
    /// `false` removes a preset glow.
    pub halo: Option<bool>,
    pub cursor: Option<CursorInfluence>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealOverrides {
    pub margin: Option<String>,
    pub once: Option<bool>,
    pub duration: Option<f32>,
    pub distance: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavOverrides {
    pub active_margin: Option<String>,
    pub scrolled_threshold: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowOverrides {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub variant: Option<Variant>,
    pub content: Option<PathBuf>,
    pub assets: Option<PathBuf>,
    pub background: Option<Color>,
    pub cursor_glow: Option<bool>,
    pub pattern_placeholders: Option<bool>,
    pub field: FieldOverrides,
    pub reveal: RevealOverrides,
    pub nav: NavOverrides,
    pub capabilities: Option<Capabilities>,
    pub window: WindowOverrides,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn margin(field: &'static str, value: &str) -> Result<RootMargin, ConfigError> {
    value.parse().map_err(|e| invalid(field, format!("{e}")))
}

fn non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid(field, format!("expected a finite value >= 0, got {value}")))
    }
}

impl ConfigFile {
    /// Apply the file on top of its variant preset.
    pub fn resolve(self) -> Result<PageConfig, ConfigError> {
        let mut config = self.variant.unwrap_or_default().preset();

        if let Some(content) = self.content {
            config.content = Some(content);
        }
        if let Some(assets) = self.assets {
            config.assets = assets;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(cursor_glow) = self.cursor_glow {
            config.cursor_glow = cursor_glow;
        }
        if let Some(pattern) = self.pattern_placeholders {
            config.layout.pattern_placeholders = pattern;
        }

        let f = self.field;
        let field = &mut config.field;
        if let Some(count) = f.count {
            field.count = count;
        }
        if let Some(speed) = f.speed {
            field.speed = non_negative("field.speed", speed)?;
        }
        if let Some(min) = f.radius_min {
            field.radius_min = non_negative("field.radius_min", min)?;
        }
        if let Some(max) = f.radius_max {
            field.radius_max = non_negative("field.radius_max", max)?;
        }
        if field.radius_min > field.radius_max {
            return Err(invalid(
                "field.radius_min",
                format!("{} exceeds radius_max {}", field.radius_min, field.radius_max),
            ));
        }
        if let Some(color) = f.color {
            field.color = color;
        }
        if let Some(opacity) = f.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(invalid("field.opacity", format!("expected 0-1, got {opacity}")));
            }
            field.opacity = opacity;
        }
        if let Some(glow) = f.glow {
            field.glow = Some(glow);
        }
        if f.halo == Some(false) {
            field.glow = None;
        }
        if let Some(cursor) = f.cursor {
            if !cursor.weight.is_finite() {
                return Err(invalid("field.cursor.weight", "must be finite"));
            }
            if let Some(radius) = cursor.radius {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(invalid(
                        "field.cursor.radius",
                        format!("expected a finite value > 0, got {radius}"),
                    ));
                }
            }
            field.cursor = cursor;
        }

        let r = self.reveal;
        if let Some(m) = r.margin {
            config.reveal.margin = margin("reveal.margin", &m)?;
        }
        if let Some(once) = r.once {
            config.reveal.once = once;
        }
        if let Some(duration) = r.duration {
            config.reveal.animation.duration = non_negative("reveal.duration", duration)?;
        }
        if let Some(distance) = r.distance {
            if !distance.is_finite() {
                return Err(invalid("reveal.distance", "must be finite"));
            }
            config.reveal.animation.distance = distance;
        }

        let n = self.nav;
        if let Some(m) = n.active_margin {
            config.nav.active_margin = margin("nav.active_margin", &m)?;
        }
        if let Some(threshold) = n.scrolled_threshold {
            config.nav.scrolled_threshold = non_negative("nav.scrolled_threshold", threshold)?;
        }

        if let Some(capabilities) = self.capabilities {
            config.capabilities = capabilities;
        }

        let w = self.window;
        if let Some(title) = w.title {
            config.window.title = title;
        }
        if let Some(width) = w.width {
            if width == 0 {
                return Err(invalid("window.width", "must be non-zero"));
            }
            config.window.width = width;
        }
        if let Some(height) = w.height {
            if height == 0 {
                return Err(invalid("window.height", "must be non-zero"));
            }
            config.window.height = height;
        }

        tracing::debug!(variant = ?config.variant, "resolved page config");
        Ok(config)
    }
}

impl PageConfig {
    /// Parse and resolve a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)?;
        file.resolve()
    }

    /// Load a config file, resolving relative paths against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        if let Some(content) = &config.content {
            if content.is_relative() {
                config.content = Some(base.join(content));
            }
        }
        if config.assets.is_relative() {
            config.assets = base.join(&config.assets);
        }
        tracing::info!(path = %path.display(), variant = ?config.variant, "loaded config");
        Ok(config)
    }
}
