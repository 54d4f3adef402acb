//! Gallery content: the immutable list of showcased items.
//!
//! Items are loaded once at startup, either from the built-in demo set or
//! from a JSON file, and never change for the rest of the session.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("cannot read gallery file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid gallery JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("gallery has no items")]
    Empty,
    #[error("item {index} ({title:?}) has no detail sections")]
    NoSections { index: usize, title: String },
}

// ───────────────────────────────────────── layout ────────────

/// Physical card shape.  Unknown names in a gallery file fall back to
/// [`CardLayout::Desktop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardLayout {
    #[default]
    Desktop,
    Mobile,
    Square,
    A4Vertical,
    A4Horizontal,
}

/// Card geometry in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardDimensions {
    /// Width, thickness, depth of the card body.
    pub box_size: [f32; 3],
    /// Width and height of the printable face.
    pub plane: [f32; 2],
}

impl CardLayout {
    pub fn name(self) -> &'static str {
        match self {
            CardLayout::Desktop => "desktop",
            CardLayout::Mobile => "mobile",
            CardLayout::Square => "square",
            CardLayout::A4Vertical => "a4_vertical",
            CardLayout::A4Horizontal => "a4_horizontal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "desktop" | "wide" => Some(CardLayout::Desktop),
            "mobile" | "tall" => Some(CardLayout::Mobile),
            "square" => Some(CardLayout::Square),
            "a4_vertical" | "portrait" => Some(CardLayout::A4Vertical),
            "a4_horizontal" | "landscape" => Some(CardLayout::A4Horizontal),
            _ => None,
        }
    }

    pub fn dimensions(self) -> CardDimensions {
        match self {
            CardLayout::Desktop => CardDimensions {
                box_size: [4.5, 0.15, 3.2],
                plane: [4.45, 3.15],
            },
            CardLayout::Mobile => CardDimensions {
                box_size: [1.5, 0.15, 2.95],
                plane: [1.5, 2.95],
            },
            CardLayout::Square => CardDimensions {
                box_size: [3.5, 0.15, 3.5],
                plane: [3.45, 3.45],
            },
            CardLayout::A4Vertical => CardDimensions {
                box_size: [2.5, 0.15, 3.53],
                plane: [2.45, 3.48],
            },
            CardLayout::A4Horizontal => CardDimensions {
                box_size: [3.53, 0.15, 2.5],
                plane: [3.48, 2.45],
            },
        }
    }
}

impl From<String> for CardLayout {
    fn from(name: String) -> Self {
        CardLayout::from_name(&name).unwrap_or_else(|| {
            tracing::warn!(layout = %name, "unknown card layout, using default");
            CardLayout::default()
        })
    }
}

impl From<CardLayout> for String {
    fn from(layout: CardLayout) -> Self {
        layout.name().to_string()
    }
}

// ───────────────────────────────────────── colour ────────────

/// An sRGB accent colour, written as `#rrggbb` in gallery files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Accent {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Accent {
    /// The neutral grey used whenever nothing better is known.
    pub const NEUTRAL: Accent = Accent::rgb(0xb2, 0xbe, 0xc3);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Linear blend toward `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Accent, t: f32) -> Accent {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Accent::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl Default for Accent {
    fn default() -> Self {
        Accent::NEUTRAL
    }
}

impl From<String> for Accent {
    fn from(hex: String) -> Self {
        Accent::parse(&hex).unwrap_or_else(|| {
            tracing::warn!(colour = %hex, "invalid accent colour, using neutral");
            Accent::NEUTRAL
        })
    }
}

impl From<Accent> for String {
    fn from(c: Accent) -> Self {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    }
}

// ───────────────────────────────────────── items ─────────────

/// What a detail section says.  Each shape gets its own formatter in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    Overview {
        text: String,
    },
    ProblemSolution {
        problem: String,
        solution: String,
    },
    FeatureList {
        #[serde(default)]
        intro: Option<String>,
        features: Vec<String>,
    },
}

/// One page of an item's scrollytelling sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailSection {
    pub title: String,
    pub body: SectionBody,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub accent: Accent,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub layout: CardLayout,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub sections: Vec<DetailSection>,
}

impl GalleryItem {
    /// Every distinct image reference this item may display.
    pub fn image_refs(&self) -> impl Iterator<Item = &str> {
        self.cover_image
            .as_deref()
            .into_iter()
            .chain(self.sections.iter().filter_map(|s| s.image.as_deref()))
    }
}

/// The validated, immutable gallery.
#[derive(Debug, Clone)]
pub struct Gallery {
    items: Vec<GalleryItem>,
}

impl Gallery {
    /// Validate a list of items: at least one item, and every item has at
    /// least one detail section.
    pub fn new(items: Vec<GalleryItem>) -> Result<Self, GalleryError> {
        if items.is_empty() {
            return Err(GalleryError::Empty);
        }
        if let Some((index, item)) = items.iter().enumerate().find(|(_, i)| i.sections.is_empty()) {
            return Err(GalleryError::NoSections {
                index,
                title: item.title.clone(),
            });
        }
        Ok(Self { items })
    }

    pub fn from_json(json: &str) -> Result<Self, GalleryError> {
        let items: Vec<GalleryItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// Load a JSON gallery file.  Relative image references are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let json = std::fs::read_to_string(path).map_err(|source| GalleryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut gallery = Self::from_json(&json)?;
        if let Some(base) = path.parent() {
            gallery.resolve_images(base);
        }
        tracing::info!(items = gallery.len(), path = %path.display(), "gallery loaded");
        Ok(gallery)
    }

    fn resolve_images(&mut self, base: &Path) {
        let resolve = |r: &mut String| {
            if Path::new(r.as_str()).is_relative() {
                *r = base.join(r.as_str()).display().to_string();
            }
        };
        for item in &mut self.items {
            if let Some(cover) = item.cover_image.as_mut() {
                resolve(cover);
            }
            for section in &mut item.sections {
                if let Some(image) = section.image.as_mut() {
                    resolve(image);
                }
            }
        }
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn to_json(&self) -> Result<String, GalleryError> {
        Ok(serde_json::to_string_pretty(&self.items)?)
    }

    /// Unique image references across all items, in first-seen order.
    pub fn image_refs(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.items
            .iter()
            .flat_map(GalleryItem::image_refs)
            .filter(|r| seen.insert(*r))
            .map(str::to_string)
            .collect()
    }

    /// The demo gallery shipped with the binary.
    pub fn demo() -> Self {
        Self {
            items: demo_items(),
        }
    }
}

// ───────────────────────────────────────── demo content ──────

fn overview(title: &str, text: &str, accent: Accent) -> DetailSection {
    DetailSection {
        title: title.into(),
        body: SectionBody::Overview { text: text.into() },
        image: None,
        accent,
        tags: Vec::new(),
    }
}

fn problem_solution(title: &str, problem: &str, solution: &str, accent: Accent) -> DetailSection {
    DetailSection {
        title: title.into(),
        body: SectionBody::ProblemSolution {
            problem: problem.into(),
            solution: solution.into(),
        },
        image: None,
        accent,
        tags: Vec::new(),
    }
}

fn features(title: &str, intro: &str, list: &[&str], accent: Accent) -> DetailSection {
    DetailSection {
        title: title.into(),
        body: SectionBody::FeatureList {
            intro: Some(intro.into()),
            features: list.iter().map(|s| s.to_string()).collect(),
        },
        image: None,
        accent,
        tags: Vec::new(),
    }
}

fn tagged(mut section: DetailSection, tags: &[&str]) -> DetailSection {
    section.tags = tags.iter().map(|t| t.to_string()).collect();
    section
}

fn item(title: &str, category: &str, layout: CardLayout, sections: Vec<DetailSection>) -> GalleryItem {
    GalleryItem {
        title: title.into(),
        category: category.into(),
        layout,
        cover_image: None,
        sections,
    }
}

fn demo_items() -> Vec<GalleryItem> {
    vec![
        item(
            "Finance Dashboard",
            "UI Interface",
            CardLayout::Desktop,
            vec![
                problem_solution(
                    "The Problem",
                    "Users struggled to visualize their spending habits across multiple accounts, leading to poor financial decisions.",
                    "Unify every account into a single view before asking anyone to budget.",
                    Accent::rgb(0x81, 0xec, 0xec),
                ),
                overview(
                    "The Solution",
                    "We unified all data streams into a single, intuitive dashboard with real-time categorization and budget tracking.",
                    Accent::rgb(0x00, 0xce, 0xc9),
                ),
                tagged(
                    features(
                        "Key Features",
                        "What shipped in the first release:",
                        &[
                            "Interactive charts",
                            "Drag-and-drop budgeting",
                            "Savings recommendations",
                        ],
                        Accent::rgb(0x74, 0xb9, 0xff),
                    ),
                    &["Figma", "React", "D3.js"],
                ),
            ],
        ),
        item(
            "Travel App Mobile",
            "UX Research",
            CardLayout::Mobile,
            vec![
                overview(
                    "User Research",
                    "Conducted interviews with 20 frequent travelers to identify pain points in current booking flows.",
                    Accent::rgb(0xfd, 0x79, 0xa8),
                ),
                overview(
                    "Wireframing",
                    "Developed low-fidelity wireframes to test navigation structures and information hierarchy.",
                    Accent::rgb(0xe8, 0x43, 0x93),
                ),
                tagged(
                    overview(
                        "Prototyping",
                        "Created a high-fidelity interactive prototype demonstrating the seamless booking experience.",
                        Accent::rgb(0xfa, 0xb1, 0xa0),
                    ),
                    &["UserTesting", "Figma", "Protopie"],
                ),
            ],
        ),
        item(
            "Brand Identity",
            "Graphic Design",
            CardLayout::Square,
            vec![
                overview(
                    "Concept",
                    "Explored themes of modernization and reliability to reflect the client's core values.",
                    Accent::rgb(0xa2, 0x9b, 0xfe),
                ),
                overview(
                    "Typography",
                    "Selected a custom serif typeface to convey elegance and authority.",
                    Accent::rgb(0x6c, 0x5c, 0xe7),
                ),
                tagged(
                    overview(
                        "Application",
                        "Applied the identity across business cards, digital assets, and merchandise.",
                        Accent::rgb(0xdf, 0xe6, 0xe9),
                    ),
                    &["Illustrator", "Photoshop"],
                ),
            ],
        ),
        item(
            "E-Commerce Platform",
            "UI System",
            CardLayout::Desktop,
            vec![
                overview(
                    "Design System",
                    "Built an atomic design system to ensure consistency across the platform.",
                    Accent::rgb(0xfa, 0xb1, 0xa0),
                ),
                features(
                    "Components",
                    "Reusable building blocks:",
                    &["Buttons", "Inputs", "Product cards"],
                    Accent::rgb(0xff, 0x76, 0x75),
                ),
                tagged(
                    overview(
                        "Integration",
                        "Integrated components into the main application, improving development speed by 40%.",
                        Accent::rgb(0xfd, 0xcb, 0x6e),
                    ),
                    &["Storybook", "React", "Sass"],
                ),
            ],
        ),
        item(
            "Healthcare Portal",
            "UX Design",
            CardLayout::A4Horizontal,
            vec![
                overview(
                    "Accessibility",
                    "Ensured WCAG 2.1 AA compliance for users with visual impairments.",
                    Accent::rgb(0x55, 0xef, 0xc4),
                ),
                problem_solution(
                    "User Flow",
                    "Booking an appointment took too many steps.",
                    "Streamlined the appointment booking process to reduce steps by 50%.",
                    Accent::rgb(0x00, 0xb8, 0x94),
                ),
                tagged(
                    overview(
                        "Testing",
                        "Validated designs through usability testing with elderly patients.",
                        Accent::rgb(0x81, 0xec, 0xec),
                    ),
                    &["WCAG", "Sketch", "InVision"],
                ),
            ],
        ),
        item(
            "Event Posters",
            "Graphic Design",
            CardLayout::A4Vertical,
            vec![
                overview(
                    "Visual Language",
                    "Developed a bold, typographic visual language inspired by brutalism.",
                    Accent::rgb(0xff, 0xea, 0xa7),
                ),
                overview(
                    "Animation",
                    "Created motion posters for social media to drive engagement.",
                    Accent::rgb(0xfd, 0xcb, 0x6e),
                ),
                tagged(
                    overview(
                        "Print",
                        "Managed print production for high-quality large format displays.",
                        Accent::rgb(0xe1, 0x70, 0x55),
                    ),
                    &["InDesign", "After Effects"],
                ),
            ],
        ),
    ]
}
