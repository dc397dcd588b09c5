//! Page geometry.
//!
//! Lays the content out as a single column of blocks in document coordinates
//! (logical pixels, y down, 0 at the top of the page). Text is not shaped;
//! blocks reserve an estimated height for their copy from character counts.
//!
//! Element ids are handed out in content order, never by position, so the
//! same content keeps the same ids across relayouts at different widths.

use crate::content::{CardImage, Content, Project};
use crate::draw::Color;
use crate::observer::{ElementId, Rect};

/// Widest the content column gets.
pub const MAX_CONTENT_WIDTH: f32 = 1280.0;
/// Small breakpoint: two grid columns, wider gutter.
pub const BREAKPOINT_SM: f32 = 640.0;
/// Large breakpoint: side-by-side featured cards, cursor glow.
pub const BREAKPOINT_LG: f32 = 1024.0;
/// Space kept above a section when jumping to it, so the nav bar does not
/// cover its heading.
pub const SECTION_ANCHOR_OFFSET: f32 = 96.0;
/// Height of the fixed nav bar.
pub const NAV_HEIGHT: f32 = 56.0;

/// Section anchors, in page order.
pub const SECTION_IDS: [&str; 4] = ["hero", "work", "about", "contact"];

// Approximate copy metrics.
const BODY_CHAR_WIDTH: f32 = 8.0;
const BODY_LINE_HEIGHT: f32 = 26.0;
const DEFAULT_IMAGE_ASPECT: f32 = 0.625;
const PATTERN_HEIGHT: f32 = 128.0;

/// Responsive horizontal frame for the page content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    /// Left edge of the content column.
    pub x: f32,
    pub width: f32,
    pub gutter: f32,
}

impl Container {
    pub fn for_width(viewport_width: f32) -> Self {
        let viewport_width = viewport_width.max(0.0);
        let gutter = if viewport_width >= BREAKPOINT_LG {
            48.0
        } else if viewport_width >= BREAKPOINT_SM {
            32.0
        } else {
            20.0
        };
        let outer = viewport_width.min(MAX_CONTENT_WIDTH);
        Self {
            x: (viewport_width - outer) * 0.5 + gutter,
            width: (outer - 2.0 * gutter).max(0.0),
            gutter,
        }
    }
}

/// Number of masonry columns at a viewport width.
pub fn grid_columns(viewport_width: f32) -> usize {
    if viewport_width >= BREAKPOINT_SM {
        2
    } else {
        1
    }
}

/// Fill of a card's media area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaFill {
    /// Decoded image, painted with its average colour.
    Image(Color),
    /// Grid-pattern placeholder in the card accent.
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Media {
    pub rect: Rect,
    pub fill: MediaFill,
}

/// What a block displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockKind {
    Hero,
    Marquee,
    SectionHeader,
    /// Full-width project card; `image_right` alternates per card.
    FeaturedCard { project: usize, image_right: bool },
    GridLabel,
    ProjectCard { project: usize },
    AboutIntro,
    Stat(usize),
    PhilosophyPanel,
    Principle(usize),
    Contact,
    Footer,
}

/// A laid-out element.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub element: ElementId,
    pub kind: BlockKind,
    pub rect: Rect,
    /// `Some(delay)` for blocks that enter with a reveal transition.
    pub reveal_delay: Option<f32>,
    pub accent: Color,
    pub media: Option<Media>,
    /// Bars standing in for lines of copy, in document coordinates.
    pub text_lines: Vec<Rect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    pub id: &'static str,
    pub element: ElementId,
    pub rect: Rect,
}

/// Layout knobs that come from the page variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Draw a pattern block for cards without an image path.
    pub pattern_placeholders: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            pattern_placeholders: true,
        }
    }
}

/// Estimated height of a paragraph of `chars` characters in `width`.
fn text_height(chars: usize, width: f32) -> f32 {
    let per_line = (width / BODY_CHAR_WIDTH).floor().max(1.0);
    (chars as f32 / per_line).ceil().max(1.0) * BODY_LINE_HEIGHT
}

/// Placeholder bars for a paragraph.
fn text_bars(x: f32, y: f32, width: f32, chars: usize) -> Vec<Rect> {
    let per_line = (width / BODY_CHAR_WIDTH).floor().max(1.0);
    let lines = (chars as f32 / per_line).ceil().max(1.0) as usize;
    (0..lines)
        .map(|i| {
            let w = if i + 1 == lines {
                let rest = chars as f32 - per_line * i as f32;
                (rest * BODY_CHAR_WIDTH).clamp(BODY_CHAR_WIDTH, width)
            } else {
                width
            };
            Rect::new(x, y + i as f32 * BODY_LINE_HEIGHT + 8.0, w, 10.0)
        })
        .collect()
}

struct Builder {
    next_id: u32,
    blocks: Vec<Block>,
}

impl Builder {
    fn id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, kind: BlockKind, rect: Rect, reveal_delay: Option<f32>, accent: Color) -> &mut Block {
        let element = self.id();
        self.blocks.push(Block {
            element,
            kind,
            rect,
            reveal_delay,
            accent,
            media: None,
            text_lines: Vec::new(),
        });
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }
}

/// Full page geometry for one viewport width.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    viewport_width: f32,
    container: Container,
    sections: Vec<SectionLayout>,
    blocks: Vec<Block>,
    document_height: f32,
}

impl PageLayout {
    /// Lay out `content` for a viewport of the given size.
    ///
    /// `images[i]` is the decoded image for `content.projects[i]`, if any.
    pub fn compute(
        content: &Content,
        images: &[Option<CardImage>],
        viewport_width: f32,
        viewport_height: f32,
        options: LayoutOptions,
    ) -> Self {
        let container = Container::for_width(viewport_width);
        let cx = container.x;
        let cw = container.width;
        let lg = viewport_width >= BREAKPOINT_LG;
        let sm = viewport_width >= BREAKPOINT_SM;
        let neutral = Color::from_rgba8(114, 247, 184, 255);

        let mut b = Builder {
            next_id: 0,
            blocks: Vec::new(),
        };
        let section_ids: Vec<ElementId> = SECTION_IDS.iter().map(|_| b.id()).collect();
        let mut sections = Vec::with_capacity(SECTION_IDS.len());
        let image_for = |index: usize| images.get(index).copied().flatten();
        let media_for = |project: &Project, index: usize, rect_at: &dyn Fn(f32) -> Rect| {
            match (&project.image_path, image_for(index)) {
                (Some(_), Some(img)) => Some(Media {
                    rect: rect_at(img.aspect()),
                    fill: MediaFill::Image(img.average),
                }),
                (Some(_), None) => None,
                (None, _) if options.pattern_placeholders => Some(Media {
                    rect: rect_at(-1.0),
                    fill: MediaFill::Pattern,
                }),
                (None, _) => None,
            }
        };

        let mut y = NAV_HEIGHT + 24.0;

        // ========== Hero ==========
        let hero_top = y;
        let hero_h = (viewport_height * 0.6).max(420.0);
        {
            let block = b.push(BlockKind::Hero, Rect::new(cx, y, cw, hero_h), Some(0.3), neutral);
            let headline_w = if lg { cw * 0.6 } else { cw };
            block.text_lines = (0..5)
                .map(|i| Rect::new(cx, y + 40.0 + i as f32 * 64.0, headline_w * (0.5 + 0.1 * (i % 3) as f32), 44.0))
                .collect();
        }
        y += hero_h;
        sections.push(SectionLayout {
            id: SECTION_IDS[0],
            element: section_ids[0],
            rect: Rect::new(cx, hero_top, cw, y - hero_top),
        });
        y += 128.0;

        b.push(BlockKind::Marquee, Rect::new(cx, y, cw, 56.0), None, neutral);
        y += 56.0 + 112.0;

        // ========== Work ==========
        let work_top = y;
        b.push(BlockKind::SectionHeader, Rect::new(cx, y, cw, 96.0), Some(0.0), neutral);
        y += 96.0 + 48.0;

        let mut featured_index = 0;
        for (index, project) in content.projects.iter().enumerate().filter(|(_, p)| p.featured) {
            let image_right = featured_index % 2 == 1;
            featured_index += 1;
            let pad = if lg { 32.0 } else if sm { 24.0 } else { 20.0 };
            let inner_w = cw - 2.0 * pad;
            let (media_w, text_w) = if lg {
                let col = (inner_w - 40.0) * 0.5;
                (col, col)
            } else {
                (inner_w, inner_w)
            };
            let text_h = 40.0 + 56.0 + text_height(project.description.chars().count(), text_w) + 24.0 + 28.0 + 24.0;
            let aspect = image_for(index).map_or(DEFAULT_IMAGE_ASPECT, |img| img.aspect());
            let media_h = media_w * aspect;
            let (height, media_x, media_y, text_x, text_y) = if lg {
                let h = media_h.max(text_h) + 2.0 * pad;
                let left = cx + pad;
                let right = left + media_w + 40.0;
                let (mx, tx) = if image_right { (right, left) } else { (left, right) };
                (h, mx, y + pad, tx, y + pad + (h - 2.0 * pad - text_h) * 0.5)
            } else {
                let h = media_h + 24.0 + text_h + 2.0 * pad;
                (h, cx + pad, y + pad, cx + pad, y + pad + media_h + 24.0)
            };

            let accent = project.accent();
            let block = b.push(
                BlockKind::FeaturedCard { project: index, image_right },
                Rect::new(cx, y, cw, height),
                Some(0.0),
                accent,
            );
            block.media = match (&project.image_path, image_for(index)) {
                (Some(_), Some(img)) => Some(Media {
                    rect: Rect::new(media_x, media_y, media_w, media_h),
                    fill: MediaFill::Image(img.average),
                }),
                _ => None,
            };
            block.text_lines = text_bars(text_x, text_y + 96.0, text_w, project.description.chars().count());
            y += height + 24.0;
        }
        if featured_index > 0 {
            y += 16.0;
        }

        b.push(BlockKind::GridLabel, Rect::new(cx, y, cw, 16.0), Some(0.0), neutral);
        y += 16.0 + 24.0;

        let columns = grid_columns(viewport_width);
        let gap = 20.0;
        let col_w = (cw - gap * (columns as f32 - 1.0)) / columns as f32;
        let mut column_bottoms = vec![y; columns];
        for (index, project) in content.projects.iter().enumerate().filter(|(_, p)| !p.featured) {
            // Shortest column first, leftmost on ties.
            let column = column_bottoms
                .iter()
                .enumerate()
                .fold(0, |best, (i, h)| if *h < column_bottoms[best] { i } else { best });
            let x = cx + column as f32 * (col_w + gap);
            let top = column_bottoms[column];
            let inner_x = x + 20.0;
            let inner_w = col_w - 40.0;

            let media = media_for(project, index, &|aspect| {
                let h = if aspect < 0.0 { PATTERN_HEIGHT } else { inner_w * aspect };
                Rect::new(inner_x, top + 20.0, inner_w, h)
            });
            let mut cursor = top + 20.0 + media.map_or(0.0, |m| m.rect.height + 16.0);
            cursor += 28.0 + 12.0;
            let chars = project.description.chars().count();
            let text_lines = text_bars(inner_x, cursor, inner_w, chars);
            cursor += text_height(chars, inner_w) + 16.0;
            cursor += 20.0 + 16.0 + 16.0;
            let height = cursor + 20.0 - top;

            let block = b.push(
                BlockKind::ProjectCard { project: index },
                Rect::new(x, top, col_w, height),
                Some(0.0),
                project.accent(),
            );
            block.media = media;
            block.text_lines = text_lines;
            column_bottoms[column] = top + height + gap;
        }
        y = column_bottoms.iter().copied().fold(y, f32::max);
        sections.push(SectionLayout {
            id: SECTION_IDS[1],
            element: section_ids[1],
            rect: Rect::new(cx, work_top, cw, y - work_top),
        });
        y += 112.0 + 48.0;

        // ========== About ==========
        let about_top = y;
        let (intro_w, panel_x, panel_w) = if lg {
            let total = cw - 48.0;
            let intro = total * 1.4 / 2.4;
            (intro, cx + intro + 48.0, total - intro)
        } else {
            (cw, cx, cw)
        };
        let intro_h = 40.0 + 96.0 + text_height(300, intro_w) + 16.0 + text_height(150, intro_w);
        {
            let block = b.push(BlockKind::AboutIntro, Rect::new(cx, y, intro_w, intro_h), Some(0.0), neutral);
            block.text_lines = text_bars(cx, y + 136.0, intro_w, 450);
        }
        let stats_y = y + intro_h + 32.0;
        let stat_w = (intro_w - 32.0) / 3.0;
        for (i, stat) in content.stats.iter().enumerate() {
            b.push(
                BlockKind::Stat(i),
                Rect::new(cx + i as f32 * (stat_w + 16.0), stats_y, stat_w, 88.0),
                Some(0.1),
                stat.color,
            );
        }
        let intro_bottom = stats_y + if content.stats.is_empty() { 0.0 } else { 88.0 };

        let panel_y = if lg { y } else { intro_bottom + 48.0 };
        let items = content.principles.len() as f32;
        let panel_h = 24.0 * 2.0 + 32.0 + items * 48.0 + (items - 1.0).max(0.0) * 20.0;
        b.push(
            BlockKind::PhilosophyPanel,
            Rect::new(panel_x, panel_y, panel_w, panel_h),
            Some(0.0),
            neutral,
        );
        for (i, principle) in content.principles.iter().enumerate() {
            let item_y = panel_y + 24.0 + 32.0 + i as f32 * 68.0;
            b.push(
                BlockKind::Principle(i),
                Rect::new(panel_x + 24.0, item_y, panel_w - 48.0, 48.0),
                Some(i as f32 * 0.08),
                principle.color,
            );
        }
        y = intro_bottom.max(panel_y + panel_h);
        sections.push(SectionLayout {
            id: SECTION_IDS[2],
            element: section_ids[2],
            rect: Rect::new(cx, about_top, cw, y - about_top),
        });
        y += 112.0 + 48.0;

        // ========== Contact ==========
        let contact_top = y;
        let contact_w = cw.min(768.0);
        {
            let block = b.push(BlockKind::Contact, Rect::new(cx, y, contact_w, 300.0), Some(0.0), neutral);
            block.text_lines = text_bars(cx, y + 150.0, contact_w, 80);
        }
        y += 300.0;
        sections.push(SectionLayout {
            id: SECTION_IDS[3],
            element: section_ids[3],
            rect: Rect::new(cx, contact_top, cw, y - contact_top),
        });
        y += 48.0;

        b.push(BlockKind::Footer, Rect::new(cx, y, cw, 48.0), None, neutral);
        y += 48.0 + 32.0;

        Self {
            viewport_width,
            container,
            sections,
            blocks: b.blocks,
            document_height: y,
        }
    }

    #[inline]
    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    #[inline]
    pub fn container(&self) -> Container {
        self.container
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn sections(&self) -> &[SectionLayout] {
        &self.sections
    }

    #[inline]
    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    pub fn block(&self, element: ElementId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.element == element)
    }

    pub fn section(&self, id: &str) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Rectangle of any element, block or section.
    pub fn rect(&self, element: ElementId) -> Option<Rect> {
        self.sections
            .iter()
            .find(|s| s.element == element)
            .map(|s| s.rect)
            .or_else(|| self.block(element).map(|b| b.rect))
    }

    /// Scroll offset that brings section `id` to the top, below the nav bar.
    pub fn section_anchor(&self, id: &str) -> Option<f32> {
        self.section(id).map(|s| (s.rect.y - SECTION_ANCHOR_OFFSET).max(0.0))
    }
}
