//! Detail slideshow: maps detail-mode progress onto a cross-fade between
//! two adjacent sections of the open item.

use super::gallery::{Accent, DetailSection, GalleryItem};

/// Which two sections are blending, and how far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideBlend {
    pub idx_a: usize,
    pub idx_b: usize,
    /// 0 shows `idx_a` fully, 1 shows `idx_b` fully.
    pub ratio: f32,
}

impl SlideBlend {
    pub const STATIC: SlideBlend = SlideBlend {
        idx_a: 0,
        idx_b: 0,
        ratio: 0.0,
    };

    /// Blend for `progress` over `sections` sections.  One section (or the
    /// invalid zero) never blends.
    pub fn for_progress(progress: f32, sections: usize) -> Self {
        if sections <= 1 {
            return Self::STATIC;
        }
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let last = sections - 1;
        let slide = progress * last as f32;
        // At progress 1 this keeps the pair (n-2, n-1) with ratio 1 rather
        // than collapsing onto (n-1, n-1).
        let idx_a = (slide.floor() as usize).min(last - 1);
        let idx_b = (idx_a + 1).min(last);
        let ratio = (slide - idx_a as f32).clamp(0.0, 1.0);
        Self { idx_a, idx_b, ratio }
    }

    /// The section that dominates the blend.
    pub fn dominant(&self) -> usize {
        if self.ratio < 0.5 {
            self.idx_a
        } else {
            self.idx_b
        }
    }
}

// ───────────────────────────────────────── materials ─────────

/// What one side of the blend shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// An image resource, with the colour to use until (or unless) it loads.
    Texture { reference: String, fallback: Accent },
    Solid(Accent),
}

impl Surface {
    pub fn for_section(section: &DetailSection) -> Self {
        match &section.image {
            Some(reference) => Surface::Texture {
                reference: reference.clone(),
                fallback: section.accent,
            },
            None => Surface::Solid(section.accent),
        }
    }

    /// Cover image, or the neutral colour.
    pub fn cover(item: &GalleryItem) -> Self {
        match &item.cover_image {
            Some(reference) => Surface::Texture {
                reference: reference.clone(),
                fallback: Accent::NEUTRAL,
            },
            None => Surface::Solid(Accent::NEUTRAL),
        }
    }

    /// Colour shown while the texture is missing.
    pub fn fallback_colour(&self) -> Accent {
        match self {
            Surface::Texture { fallback, .. } => *fallback,
            Surface::Solid(c) => *c,
        }
    }
}

/// Material parameters handed to the renderer for one card face.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceBlend {
    pub from: Surface,
    pub to: Surface,
    pub ratio: f32,
}

impl SurfaceBlend {
    pub fn still(surface: Surface) -> Self {
        Self {
            from: surface.clone(),
            to: surface,
            ratio: 0.0,
        }
    }

    /// Material for the open card at `progress`.
    pub fn for_active(item: &GalleryItem, progress: f32) -> (Self, SlideBlend) {
        let blend = SlideBlend::for_progress(progress, item.sections.len());
        let surface_at = |i: usize| {
            item.sections
                .get(i)
                .map(Surface::for_section)
                .unwrap_or_else(|| Surface::cover(item))
        };
        (
            Self {
                from: surface_at(blend.idx_a),
                to: surface_at(blend.idx_b),
                ratio: blend.ratio,
            },
            blend,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gallery::{CardLayout, SectionBody};
    use crate::core::texture::TextureCache;

    fn section(accent: Accent, image: Option<&str>) -> DetailSection {
        DetailSection {
            title: "s".into(),
            body: SectionBody::Overview { text: "t".into() },
            image: image.map(str::to_string),
            accent,
            tags: Vec::new(),
        }
    }

    fn item(sections: Vec<DetailSection>) -> GalleryItem {
        GalleryItem {
            title: "item".into(),
            category: "test".into(),
            layout: CardLayout::Square,
            cover_image: None,
            sections,
        }
    }

    #[test]
    fn boundaries_for_many_sections() {
        for n in 2..8 {
            let start = SlideBlend::for_progress(0.0, n);
            assert_eq!((start.idx_a, start.idx_b, start.ratio), (0, 1, 0.0));
            let end = SlideBlend::for_progress(1.0, n);
            assert_eq!((end.idx_a, end.idx_b), (n - 2, n - 1));
            assert!((end.ratio - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn single_section_never_blends() {
        for step in 0..=20 {
            let p = step as f32 / 20.0;
            assert_eq!(SlideBlend::for_progress(p, 1), SlideBlend::STATIC);
        }
        assert_eq!(SlideBlend::for_progress(0.4, 0), SlideBlend::STATIC);
    }

    #[test]
    fn midpoints_and_bad_input() {
        let b = SlideBlend::for_progress(0.75, 3);
        assert_eq!((b.idx_a, b.idx_b), (1, 2));
        assert!((b.ratio - 0.5).abs() < 1e-6);

        assert_eq!(SlideBlend::for_progress(f32::NAN, 4).idx_a, 0);
        assert_eq!(SlideBlend::for_progress(-2.0, 4).ratio, 0.0);
        assert_eq!(SlideBlend::for_progress(7.0, 4).idx_b, 3);
    }

    #[test]
    fn sections_without_images_use_their_accent() {
        let red = Accent::rgb(255, 0, 0);
        let blue = Accent::rgb(0, 0, 255);
        let it = item(vec![section(red, None), section(blue, Some("b.png"))]);
        let (material, blend) = SurfaceBlend::for_active(&it, 0.5);
        assert_eq!(blend.idx_a, 0);
        assert_eq!(material.from, Surface::Solid(red));
        assert_eq!(
            material.to,
            Surface::Texture {
                reference: "b.png".into(),
                fallback: blue
            }
        );
        // Nothing loaded yet: the blend shows the two accents.
        let textures = TextureCache::default();
        assert_eq!(textures.sample_blend(&material, 0.5, 0.5), red.lerp(blue, 0.5));
    }

    #[test]
    fn single_section_item_is_static_at_any_progress() {
        let it = item(vec![section(Accent::rgb(1, 2, 3), None)]);
        for step in 0..=10 {
            let (material, blend) = SurfaceBlend::for_active(&it, step as f32 / 10.0);
            assert_eq!(blend, SlideBlend::STATIC);
            assert_eq!(material.ratio, 0.0);
            assert_eq!(material.from, material.to);
        }
    }
}
