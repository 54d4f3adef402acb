//! Decoded image cache keyed by resource reference.
//!
//! Loads are fire-and-forget: a reference goes `Pending` when requested and
//! ends up `Ready` or `Failed`.  Nothing is ever evicted, so an image needed
//! again after a mode switch is reused.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::RgbaImage;
use thiserror::Error;

use super::gallery::Accent;
use super::slideshow::{Surface, SurfaceBlend};

/// Longest edge of a cached thumbnail, in pixels.
pub const THUMBNAIL_EDGE: u32 = 160;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("cannot decode {reference}: {source}")]
    Decode {
        reference: String,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone)]
pub enum TextureSlot {
    Pending,
    Ready(Arc<RgbaImage>),
    Failed,
}

#[derive(Debug, Default)]
pub struct TextureCache {
    slots: HashMap<String, TextureSlot>,
}

impl TextureCache {
    /// Mark `reference` as requested.  Returns `true` the first time, when
    /// the caller should actually start a load.
    pub fn request(&mut self, reference: &str) -> bool {
        if self.slots.contains_key(reference) {
            return false;
        }
        self.slots.insert(reference.to_string(), TextureSlot::Pending);
        true
    }

    pub fn finish(&mut self, reference: String, result: Result<RgbaImage, TextureError>) {
        let slot = match result {
            Ok(img) => {
                tracing::debug!(reference = %reference, w = img.width(), h = img.height(), "texture ready");
                TextureSlot::Ready(Arc::new(img))
            }
            Err(e) => {
                tracing::warn!("texture load failed: {e}");
                TextureSlot::Failed
            }
        };
        self.slots.insert(reference, slot);
    }

    pub fn get(&self, reference: &str) -> Option<&Arc<RgbaImage>> {
        match self.slots.get(reference) {
            Some(TextureSlot::Ready(img)) => Some(img),
            _ => None,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, TextureSlot::Pending))
            .count()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_count() > 0
    }

    /// Colour of `surface` at texture coordinate `(u, v)`.
    pub fn sample_surface(&self, surface: &Surface, u: f32, v: f32) -> Accent {
        match surface {
            Surface::Texture { reference, .. } => match self.get(reference) {
                Some(img) => sample(img, u, v),
                None => surface.fallback_colour(),
            },
            Surface::Solid(_) => surface.fallback_colour(),
        }
    }

    /// Colour of a blended material at `(u, v)`.
    pub fn sample_blend(&self, blend: &SurfaceBlend, u: f32, v: f32) -> Accent {
        let a = self.sample_surface(&blend.from, u, v);
        if blend.ratio <= 0.0 {
            return a;
        }
        let b = self.sample_surface(&blend.to, u, v);
        a.lerp(b, blend.ratio)
    }
}

/// Nearest-pixel lookup; `u`, `v` are clamped to `[0, 1]`.
pub fn sample(img: &RgbaImage, u: f32, v: f32) -> Accent {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Accent::NEUTRAL;
    }
    let clamp = |t: f32| if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let x = ((clamp(u) * (w - 1) as f32).round() as u32).min(w - 1);
    let y = ((clamp(v) * (h - 1) as f32).round() as u32).min(h - 1);
    let p = img.get_pixel(x, y);
    Accent::rgb(p[0], p[1], p[2])
}

/// Decode an image file and shrink it to a thumbnail.  Runs on a worker
/// thread.
pub fn load_thumbnail(reference: &str) -> Result<RgbaImage, TextureError> {
    let decoded = image::open(Path::new(reference)).map_err(|source| TextureError::Decode {
        reference: reference.to_string(),
        source,
    })?;
    let (w, h) = (decoded.width(), decoded.height());
    let img = if w.max(h) > THUMBNAIL_EDGE {
        decoded.resize(THUMBNAIL_EDGE, THUMBNAIL_EDGE, FilterType::Triangle)
    } else {
        decoded
    };
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn two_tone() -> RgbaImage {
        RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn request_is_idempotent_and_tracks_pending() {
        let mut cache = TextureCache::default();
        assert!(cache.request("a.png"));
        assert!(!cache.request("a.png"));
        assert!(cache.is_loading());

        cache.finish("a.png".into(), Ok(two_tone()));
        assert!(!cache.is_loading());
        assert!(cache.get("a.png").is_some());
        assert!(!cache.request("a.png"));
    }

    #[test]
    fn failed_loads_keep_the_fallback_colour() {
        let mut cache = TextureCache::default();
        cache.request("missing.png");
        let err = load_thumbnail("/definitely/not/here.png").unwrap_err();
        cache.finish("missing.png".into(), Err(err));

        let green = Accent::rgb(0, 255, 0);
        let surface = Surface::Texture {
            reference: "missing.png".into(),
            fallback: green,
        };
        assert_eq!(cache.sample_surface(&surface, 0.5, 0.5), green);
    }

    #[test]
    fn samples_and_blends_loaded_textures() {
        let mut cache = TextureCache::default();
        cache.request("t.png");
        cache.finish("t.png".into(), Ok(two_tone()));
        let tex = Surface::Texture {
            reference: "t.png".into(),
            fallback: Accent::NEUTRAL,
        };
        assert_eq!(cache.sample_surface(&tex, 0.0, 0.0), Accent::rgb(255, 0, 0));
        assert_eq!(cache.sample_surface(&tex, 1.0, 1.0), Accent::rgb(0, 0, 255));

        let blend = SurfaceBlend {
            from: tex,
            to: Surface::Solid(Accent::rgb(0, 0, 0)),
            ratio: 0.5,
        };
        assert_eq!(cache.sample_blend(&blend, 0.0, 0.5), Accent::rgb(128, 0, 0));
    }

    #[test]
    fn thumbnails_are_shrunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        RgbaImage::from_pixel(640, 320, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let thumb = load_thumbnail(&path.display().to_string()).unwrap();
        assert_eq!(thumb.width(), THUMBNAIL_EDGE);
        assert_eq!(thumb.height(), THUMBNAIL_EDGE / 2);
    }
}
