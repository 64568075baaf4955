//! Sky environment map and its one-shot asynchronous load.
//!
//! The image is decoded on a background thread and handed to the frame loop
//! through a single-slot channel. The frame loop polls once per frame; until
//! the map arrives (or forever, if the load fails) shading runs without
//! reflections.

use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use glam::{Vec2, Vec3};
use image::imageops::FilterType;
use image::RgbaImage;

/// Result delivered by the loader thread
pub type LoadResult = Result<EnvironmentMap, String>;

/// Equirectangular RGBA8 sky image
#[derive(Debug, Clone)]
pub struct EnvironmentMap {
    image: RgbaImage,
}

impl EnvironmentMap {
    /// Decode an image file
    pub fn open(path: &Path) -> Result<Self, String> {
        let img = image::open(path)
            .map_err(|e| format!("Failed to load environment '{}': {}", path.display(), e))?;
        Ok(Self {
            image: img.to_rgba8(),
        })
    }

    /// Build from raw RGBA8 pixels (row-major, top row first)
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, String> {
        let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
            format!("Pixel buffer does not match {}x{} RGBA", width, height)
        })?;
        if width == 0 || height == 0 {
            return Err("Environment map must not be empty".to_string());
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Copy scaled down so neither side exceeds `max_dimension`
    ///
    /// Returns `None` when the map already fits. The aspect ratio is kept.
    pub fn shrink_to_fit(&self, max_dimension: u32) -> Option<EnvironmentMap> {
        let max_dimension = max_dimension.max(1);
        let (width, height) = (self.width(), self.height());
        if width <= max_dimension && height <= max_dimension {
            return None;
        }

        let scale = max_dimension as f64 / width.max(height) as f64;
        let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_dimension);
        let image = image::imageops::resize(
            &self.image,
            fit(width),
            fit(height),
            FilterType::Triangle,
        );
        Some(Self { image })
    }

    /// Raw RGBA8 bytes for GPU upload
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Bilinear sample in direction `dir` (RGB in [0, 1])
    ///
    /// Wraps horizontally and clamps at the poles, matching the GPU sampler.
    pub fn sample(&self, dir: Vec3) -> Vec3 {
        let uv = equirect_uv(dir);
        let (w, h) = (self.width() as f32, self.height() as f32);

        let px = uv.x * w - 0.5;
        let py = (uv.y * h - 0.5).clamp(0.0, h - 1.0);
        let (x0, y0) = (px.floor(), py.floor());
        let (fx, fy) = (px - x0, py - y0);

        let texel = |x: f32, y: f32| {
            let xi = (x as i64).rem_euclid(self.width() as i64) as u32;
            let yi = (y as u32).min(self.height() - 1);
            let p = self.image.get_pixel(xi, yi).0;
            Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0
        };

        let top = texel(x0, y0).lerp(texel(x0 + 1.0, y0), fx);
        let bottom = texel(x0, y0 + 1.0).lerp(texel(x0 + 1.0, y0 + 1.0), fx);
        top.lerp(bottom, fy)
    }
}

/// Texture coordinates of a direction on an equirectangular map
///
/// u follows longitude around +Y, v runs from the zenith (0) to the nadir (1).
pub fn equirect_uv(dir: Vec3) -> Vec2 {
    let d = dir.normalize_or(Vec3::Y);
    let u = d.z.atan2(d.x) / (2.0 * PI) + 0.5;
    let v = d.y.clamp(-1.0, 1.0).acos() / PI;
    Vec2::new(u, v)
}

/// Receiving end of the environment handoff
pub struct EnvironmentSlot {
    rx: Option<mpsc::Receiver<LoadResult>>,
    map: Option<Arc<EnvironmentMap>>,
}

impl EnvironmentSlot {
    /// Create a connected sender/slot pair with room for exactly one result
    pub fn channel() -> (mpsc::SyncSender<LoadResult>, Self) {
        let (tx, rx) = mpsc::sync_channel(1);
        (
            tx,
            Self {
                rx: Some(rx),
                map: None,
            },
        )
    }

    /// A slot that never receives anything
    pub fn empty() -> Self {
        Self { rx: None, map: None }
    }

    /// Start decoding `path` on a background thread
    pub fn load_async(path: PathBuf) -> Self {
        let (tx, slot) = Self::channel();

        let spawned = thread::Builder::new()
            .name("environment-loader".to_string())
            .spawn(move || {
                let result = EnvironmentMap::open(&path);
                // The frame loop may already be gone
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => slot,
            Err(e) => {
                log::warn!("Could not start environment loader: {}", e);
                Self::empty()
            }
        }
    }

    /// Check for a finished load without blocking
    ///
    /// Returns the map exactly once, on the frame it arrives.
    pub fn poll(&mut self) -> Option<Arc<EnvironmentMap>> {
        let receiver = self.rx.as_ref()?;
        match receiver.try_recv() {
            Ok(result) => self.accept(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                log::warn!("Environment loader exited without a result");
                self.rx = None;
                None
            }
        }
    }

    /// Block until the load finishes (offline rendering only)
    pub fn wait(&mut self) -> Option<Arc<EnvironmentMap>> {
        let receiver = self.rx.as_ref()?;
        match receiver.recv() {
            Ok(result) => self.accept(result),
            Err(_) => {
                self.rx = None;
                None
            }
        }
    }

    /// Currently installed map, if any
    pub fn current(&self) -> Option<&Arc<EnvironmentMap>> {
        self.map.as_ref()
    }

    /// True once the slot can no longer change
    pub fn is_settled(&self) -> bool {
        self.rx.is_none()
    }

    fn accept(&mut self, result: LoadResult) -> Option<Arc<EnvironmentMap>> {
        // One-shot: nothing else will arrive
        self.rx = None;
        match result {
            Ok(map) => {
                log::info!("Environment map ready ({}x{})", map.width(), map.height());
                let map = Arc::new(map);
                self.map = Some(Arc::clone(&map));
                Some(map)
            }
            Err(e) => {
                log::warn!("{}; rendering without reflections", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(r: u8, g: u8, b: u8) -> EnvironmentMap {
        EnvironmentMap::from_rgba(4, 2, [r, g, b, 255].repeat(8)).unwrap()
    }

    #[test]
    fn test_from_rgba_rejects_bad_sizes() {
        assert!(EnvironmentMap::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(EnvironmentMap::from_rgba(0, 0, vec![]).is_err());
        assert!(EnvironmentMap::from_rgba(1, 1, vec![0; 4]).is_ok());
    }

    #[test]
    fn test_equirect_poles() {
        assert!(equirect_uv(Vec3::Y).y.abs() < 1e-6);
        assert!((equirect_uv(-Vec3::Y).y - 1.0).abs() < 1e-6);
        assert!((equirect_uv(Vec3::X).y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_equirect_longitude() {
        assert!((equirect_uv(Vec3::X).x - 0.5).abs() < 1e-6);
        assert!((equirect_uv(Vec3::Z).x - 0.75).abs() < 1e-6);
        assert!((equirect_uv(-Vec3::Z).x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_solid_map_samples_its_color() {
        let map = solid(255, 0, 51);
        for dir in [Vec3::Y, -Vec3::Y, Vec3::X, Vec3::new(-0.3, 0.2, -0.9)] {
            let color = map.sample(dir);
            assert!(color.abs_diff_eq(Vec3::new(1.0, 0.0, 0.2), 1e-6), "{:?}", dir);
        }
    }

    #[test]
    fn test_sky_and_ground_halves() {
        // Top row white, bottom row black
        let mut pixels = [255, 255, 255, 255].repeat(4);
        pixels.extend([0, 0, 0, 255].repeat(4));
        let map = EnvironmentMap::from_rgba(4, 2, pixels).unwrap();

        assert_eq!(map.sample(Vec3::Y), Vec3::ONE);
        assert_eq!(map.sample(-Vec3::Y), Vec3::ZERO);
    }

    #[test]
    fn test_shrink_to_fit_respects_limit() {
        let map = EnvironmentMap::from_rgba(40, 20, [10, 20, 30, 255].repeat(800)).unwrap();

        assert!(map.shrink_to_fit(40).is_none());
        assert!(map.shrink_to_fit(8192).is_none());

        let small = map.shrink_to_fit(16).unwrap();
        assert_eq!((small.width(), small.height()), (16, 8));
        assert_eq!(small.pixels().len(), 16 * 8 * 4);
        assert!(small.sample(Vec3::X).abs_diff_eq(map.sample(Vec3::X), 1.0 / 255.0));
    }

    #[test]
    fn test_shrink_to_fit_keeps_thin_maps_valid() {
        let map = EnvironmentMap::from_rgba(64, 1, [0, 0, 0, 255].repeat(64)).unwrap();
        let small = map.shrink_to_fit(4).unwrap();
        assert_eq!((small.width(), small.height()), (4, 1));
    }

    #[test]
    fn test_slot_starts_absent() {
        let (_tx, mut slot) = EnvironmentSlot::channel();
        assert!(slot.poll().is_none());
        assert!(slot.current().is_none());
        assert!(!slot.is_settled());
    }

    #[test]
    fn test_slot_delivers_once() {
        let (tx, mut slot) = EnvironmentSlot::channel();
        tx.send(Ok(solid(1, 2, 3))).unwrap();

        let first = slot.poll();
        assert!(first.is_some());
        assert!(slot.poll().is_none());
        assert!(slot.current().is_some());
        assert!(slot.is_settled());
    }

    #[test]
    fn test_failed_load_stays_absent() {
        let (tx, mut slot) = EnvironmentSlot::channel();
        tx.send(Err("missing".to_string())).unwrap();

        assert!(slot.poll().is_none());
        assert!(slot.current().is_none());
        assert!(slot.is_settled());
    }

    #[test]
    fn test_dropped_loader_settles_slot() {
        let (tx, mut slot) = EnvironmentSlot::channel();
        drop(tx);

        assert!(slot.poll().is_none());
        assert!(slot.is_settled());
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let mut slot = EnvironmentSlot::load_async(PathBuf::from("does/not/exist.jpg"));
        assert!(slot.wait().is_none());
        assert!(slot.current().is_none());
    }
}
