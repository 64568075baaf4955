//! Viewport size tracking: aspect ratio and capped-DPR framebuffer size.

/// Logical viewport plus the pixel ratio used for the framebuffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width (CSS-style pixels)
    width: f64,
    /// Logical height
    height: f64,
    device_pixel_ratio: f64,
    max_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
            max_pixel_ratio,
        }
    }

    /// Apply a resize event
    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;
    }

    /// Width over height; 1.0 while minimised
    pub fn aspect_ratio(&self) -> f32 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 1.0;
        }
        (self.width / self.height) as f32
    }

    /// Device pixel ratio capped at the configured maximum
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(self.max_pixel_ratio).max(f64::EPSILON)
    }

    /// Framebuffer size in physical pixels (never zero)
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let scale = |v: f64| ((v * ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    /// True when the window has no drawable area
    pub fn is_empty(&self) -> bool {
        self.width < 1.0 || self.height < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_recomputes_aspect_and_framebuffer() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0, 2.0);
        assert!((viewport.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(viewport.framebuffer_size(), (800, 600));

        viewport.resize(1920.0, 1080.0, 1.0);
        assert!((viewport.aspect_ratio() - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(viewport.framebuffer_size(), (1920, 1080));
    }

    #[test]
    fn test_pixel_ratio_is_capped() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.5, 2.0);
        assert_eq!(viewport.framebuffer_size(), (1200, 900));

        viewport.resize(1920.0, 1080.0, 3.0);
        assert_eq!(viewport.pixel_ratio(), 2.0);
        assert_eq!(viewport.framebuffer_size(), (3840, 2160));
        assert!((viewport.aspect_ratio() - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_minimised_window_stays_usable() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0, 2.0);
        viewport.resize(0.0, 0.0, 1.0);

        assert!(viewport.is_empty());
        assert_eq!(viewport.aspect_ratio(), 1.0);
        assert_eq!(viewport.framebuffer_size(), (1, 1));
    }
}
