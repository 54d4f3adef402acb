//! Background image decoding so texture loads never stall the frame loop.

use tokio::sync::mpsc;

use crate::core::texture::{load_thumbnail, TextureCache, TextureError};

pub struct TextureUpdate {
    pub reference: String,
    pub result: Result<image::RgbaImage, TextureError>,
}

/// Decode `reference` on a worker thread and report back over `tx`.
pub fn spawn_texture_load(tx: mpsc::UnboundedSender<TextureUpdate>, reference: String) {
    std::thread::spawn(move || {
        let result = load_thumbnail(&reference);
        let _ = tx.send(TextureUpdate { reference, result });
    });
}

/// Start a load for every reference the cache has not seen yet.  Returns
/// the number of loads started.
pub fn request_all<'a>(
    cache: &mut TextureCache,
    references: impl IntoIterator<Item = &'a str>,
    tx: &mpsc::UnboundedSender<TextureUpdate>,
) -> usize {
    let mut started = 0;
    for reference in references {
        if cache.request(reference) {
            spawn_texture_load(tx.clone(), reference.to_string());
            started += 1;
        }
    }
    if started > 0 {
        tracing::debug!(started, "texture loads started");
    }
    started
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_report_back_once_per_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        image::RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();
        let good = path.display().to_string();
        let bad = dir.path().join("nope.png").display().to_string();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut cache = TextureCache::default();
        let refs = [good.as_str(), bad.as_str(), good.as_str()];
        assert_eq!(request_all(&mut cache, refs, &tx), 2);
        assert!(cache.is_loading());

        for _ in 0..2 {
            let update = rx.recv().await.unwrap();
            cache.finish(update.reference, update.result);
        }
        assert!(!cache.is_loading());
        assert!(cache.get(&good).is_some());
        assert!(cache.get(&bad).is_none());
    }
}
