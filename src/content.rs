//! Static page content: project records and the smaller about/contact blocks.
//!
//! Content is an ordered list. Order is display order: featured projects
//! first (full width, alternating), then the rest in the masonry grid.
//!
//! ```ignore
//! let content = Content::load("content.toml")?;
//! for project in content.featured() {
//!     println!("{}", project.title);
//! }
//! ```
//!
//! A content file only needs the sections it overrides:
//!
//! ```toml
//! [[projects]]
//! title = "Drift"
//! description = "A bookmark manager that actually feels fast."
//! tags = ["React", "SQLite FTS5"]
//! image_path = "screenshots/drift.jpg"
//! accent_color = "#5bb7ff"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::draw::Color;
use crate::error::ContentError;

/// Accent used by cards that do not specify one.
pub const FALLBACK_ACCENT: Color = Color::rgba(90.0 / 255.0, 122.0 / 255.0, 150.0 / 255.0, 1.0);

/// One portfolio entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub source_link: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub accent_color: Option<Color>,
    /// Shown full width above the grid.
    #[serde(default)]
    pub featured: bool,
}

impl Project {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags: Vec::new(),
            link: None,
            source_link: None,
            image_path: None,
            accent_color: None,
            featured: false,
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_source(mut self, link: impl Into<String>) -> Self {
        self.source_link = Some(link.into());
        self
    }

    pub fn with_image(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn with_accent(mut self, color: Color) -> Self {
        self.accent_color = Some(color);
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// Accent colour, or [`FALLBACK_ACCENT`].
    #[inline]
    pub fn accent(&self) -> Color {
        self.accent_color.unwrap_or(FALLBACK_ACCENT)
    }
}

/// Headline number in the about section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
    pub color: Color,
}

/// One item of the philosophy list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Principle {
    pub title: String,
    pub description: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactLink {
    pub label: String,
    pub href: String,
    pub color: Color,
}

/// Everything the page displays.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Content {
    pub projects: Vec<Project>,
    pub stats: Vec<Stat>,
    pub principles: Vec<Principle>,
    pub contact: Vec<ContactLink>,
}

fn hex(s: &str) -> Color {
    Color::from_hex(s).unwrap_or(FALLBACK_ACCENT)
}

impl Default for Content {
    fn default() -> Self {
        let projects = vec![
            Project::new(
                "Socionics Galaxy",
                "An interactive 3D galaxy where each star is a personality type. Spiral quadra arms, \
                 algorithmically computed intertype relations, bloom postprocessing, and a search palette.",
            )
            .with_tags(&["R3F", "Three.js", "TypeScript", "Zustand"])
            .with_link("https://socionics-galaxy.vercel.app/")
            .with_source("https://github.com/spaceynyc/socionics-galaxy")
            .with_image("screenshots/socionics-galaxy.jpg")
            .with_accent(hex("#ff6b9d"))
            .featured(),
            Project::new(
                "Socionics Research Lab",
                "Four specialist agents analyze the same subject through different theoretical lenses, \
                 then a validator challenges their conclusions. Disagreement is surfaced, not hidden.",
            )
            .with_tags(&["AI Agents", "React", "Multi-Agent", "Socionics"])
            .with_link("https://socionics-web.vercel.app/")
            .with_source("https://github.com/spaceynyc/socionics-panel")
            .with_image("screenshots/socionics-lab.jpg")
            .with_accent(hex("#ffa64d"))
            .featured(),
            Project::new(
                "Drift",
                "A bookmark manager that actually feels fast. Masonry feed, FTS5 search, source filtering.",
            )
            .with_tags(&["React", "SQLite FTS5", "UI/UX"])
            .with_image("screenshots/drift.jpg")
            .with_accent(hex("#5bb7ff")),
            Project::new(
                "inner-system",
                "Audio-reactive 3D world. Sound becomes geometry, light becomes feeling.",
            )
            .with_tags(&["R3F", "Three.js", "Web Audio"])
            .with_link("https://inner-system-two.vercel.app/")
            .with_image("screenshots/inner-system.jpg")
            .with_accent(hex("#8b5dff")),
            Project::new(
                "AEROEDEN",
                "Solarpunk media engine: automated posting, reply scouting, creative pipelines.",
            )
            .with_tags(&["Brand Systems", "Content Automation", "Growth"])
            .with_link("https://x.com/enteraeroeden")
            .with_image("screenshots/aeroeden.jpg")
            .with_accent(hex("#72f7b8")),
            Project::new(
                "Zipchair AI Assistant",
                "Conversational shopping agent across 12K+ licensed sports furniture products.",
            )
            .with_tags(&["React", "AI Chat", "E-Commerce"])
            .with_link("https://zipchair-deploy.vercel.app/")
            .with_image("screenshots/zipchair.jpg")
            .with_accent(hex("#3b82f6")),
            Project::new(
                "Zipchair Intel",
                "Competitive intelligence dashboard. Daily AI insights, severity-ranked alerts, pricing radar.",
            )
            .with_tags(&["React", "AI Agents", "Analytics"])
            .with_link("https://zipchair-deploy.vercel.app/intel/")
            .with_image("screenshots/zipchair-intel.jpg")
            .with_accent(hex("#f59e0b")),
            Project::new(
                "OpenClaw Ecosystem",
                "Agent orchestration for sub-agents, cron automations, Discord bots, and device control.",
            )
            .with_tags(&["TypeScript", "Node", "Agents"])
            .with_accent(hex("#72f7b8")),
            Project::new(
                "SUE",
                "Screen Understanding Engine: local FastAPI for autonomous computer control via OCR and vision.",
            )
            .with_tags(&["Python", "FastAPI", "OCR", "Vision"])
            .with_accent(hex("#5bb7ff")),
            Project::new(
                "PhoneAgent",
                "RPC bridge for AI agents to operate iPhone flows: inspect UI trees, tap, type, automate.",
            )
            .with_tags(&["iOS", "RPC", "Automation"])
            .with_accent(hex("#8b5dff")),
            Project::new(
                "Shader Gallery",
                "GLSL/WebGL experiments in generative texture, motion fields, and surreal light.",
            )
            .with_tags(&["GLSL", "WebGL", "Creative Coding"])
            .with_accent(hex("#f0c674")),
        ];

        let stat = |value: &str, label: &str, color: &str| Stat {
            value: value.into(),
            label: label.into(),
            color: hex(color),
        };
        let principle = |title: &str, description: &str, color: &str| Principle {
            title: title.into(),
            description: description.into(),
            color: hex(color),
        };
        let contact = |label: &str, href: &str, color: &str| ContactLink {
            label: label.into(),
            href: href.into(),
            color: hex(color),
        };

        Self {
            projects,
            stats: vec![
                stat("11+", "Projects shipped", "#72f7b8"),
                stat("14+", "Technologies", "#5bb7ff"),
                stat("∞", "Curiosity", "#f0c674"),
            ],
            principles: vec![
                principle("Ship fast", "Perfect is the enemy of done. Iterate in public.", "#72f7b8"),
                principle("Automate taste", "AI should amplify creativity, not replace judgment.", "#f0c674"),
                principle("Design is function", "Beautiful systems work better.", "#5bb7ff"),
                principle("Build the tool", "If it doesn't exist, make it. Then make it good.", "#8b5dff"),
            ],
            contact: vec![
                contact("GitHub", "https://github.com/spaceynyc", "#72f7b8"),
                contact("@spaceynyc", "https://x.com/spaceynyc", "#5bb7ff"),
                contact("Email", "mailto:srich7x@gmail.com", "#f0c674"),
            ],
        }
    }
}

impl Content {
    /// Parse content from a TOML string. Missing sections keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ContentError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a content file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), projects = content.projects.len(), "loaded content");
        Ok(content)
    }

    /// Featured projects in display order.
    pub fn featured(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.featured)
    }

    /// Grid projects in display order.
    pub fn grid(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| !p.featured)
    }

    #[inline]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

/// Decoded facts about a card image, enough to lay out and tint the block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardImage {
    pub width: u32,
    pub height: u32,
    /// Mean colour of the image, used to paint the image block.
    pub average: Color,
}

impl CardImage {
    /// Resolve `path` under `asset_root`. Leading slashes are treated as
    /// relative to the root.
    pub fn resolve(asset_root: &Path, path: &str) -> PathBuf {
        asset_root.join(path.trim_start_matches('/'))
    }

    /// Decode the image at `path`.
    ///
    /// Returns `None` (and logs a warning) when the file is missing or cannot
    /// be decoded; the card is then drawn without an image block.
    pub fn load(asset_root: &Path, path: &str) -> Option<Self> {
        let full = Self::resolve(asset_root, path);
        let img = match image::open(&full) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(path = %full.display(), error = %e, "card image unavailable");
                return None;
            }
        };
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            tracing::warn!(path = %full.display(), "card image is empty");
            return None;
        }

        let thumb = img.thumbnail(16, 16).to_rgba8();
        let mut sum = [0u64; 3];
        let mut n = 0u64;
        for px in thumb.pixels() {
            sum[0] += px[0] as u64;
            sum[1] += px[1] as u64;
            sum[2] += px[2] as u64;
            n += 1;
        }
        let n = n.max(1);
        let average = Color::from_rgba8(
            (sum[0] / n) as u8,
            (sum[1] / n) as u8,
            (sum[2] / n) as u8,
            255,
        );

        Some(Self {
            width,
            height,
            average,
        })
    }

    /// Height over width.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_split() {
        let content = Content::default();
        assert_eq!(content.featured().count(), 2);
        assert_eq!(content.grid().count(), 9);
        assert_eq!(content.stats.len(), 3);
        assert_eq!(content.principles.len(), 4);
        assert_eq!(content.contact.len(), 3);
    }

    #[test]
    fn test_parse_projects_keeps_other_defaults() {
        let toml = r##"
            [[projects]]
            title = "Drift"
            description = "Bookmarks."
            tags = ["React"]
            accent_color = "#5bb7ff"

            [[projects]]
            title = "Galaxy"
            description = "Stars."
            featured = true
            image_path = "/shots/galaxy.jpg"
        "##;
        let content = Content::from_toml_str(toml).unwrap();
        assert_eq!(content.project_count(), 2);
        assert_eq!(content.featured().next().unwrap().title, "Galaxy");
        assert_eq!(content.grid().next().unwrap().accent(), Color::from_hex("#5bb7ff").unwrap());
        assert_eq!(content.stats.len(), 3);
    }

    #[test]
    fn test_missing_accent_falls_back() {
        let p = Project::new("x", "y");
        assert_eq!(p.accent(), FALLBACK_ACCENT);
        assert_eq!(FALLBACK_ACCENT, Color::from_hex("#5a7a96").unwrap());
    }

    #[test]
    fn test_bad_content_is_error() {
        assert!(Content::from_toml_str("projects = 3").is_err());
        assert!(Content::from_toml_str("[[projects]]\ntitle = \"no description\"").is_err());
    }

    #[test]
    fn test_missing_image_is_none() {
        let root = std::env::temp_dir();
        assert!(CardImage::load(&root, "/definitely/not/here.png").is_none());
    }

    #[test]
    fn test_card_image_average_and_aspect() {
        let dir = std::env::temp_dir().join("glowfolio-card-image-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("red.png");
        let img = image::RgbaImage::from_pixel(40, 20, image::Rgba([255, 0, 0, 255]));
        img.save(&path).unwrap();

        let card = CardImage::load(&dir, "/red.png").unwrap();
        assert_eq!((card.width, card.height), (40, 20));
        assert_eq!(card.aspect(), 0.5);
        assert_eq!(card.average, Color::from_rgba8(255, 0, 0, 255));
    }

    #[test]
    fn test_resolve_strips_leading_slash() {
        let p = CardImage::resolve(Path::new("assets"), "/screenshots/a.jpg");
        assert_eq!(p, Path::new("assets").join("screenshots/a.jpg"));
    }
}
