//! Viewport geometry and the drawing surface sized to it.
//!
//! Everything above the GPU backend works in logical pixels (the size the
//! window reports divided by its scale factor). The surface additionally
//! tracks the device-pixel size the backing texture must have, which is the
//! logical size times the scale factor, floored.

use glam::Vec2;

/// Logical viewport size plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
    /// Device pixels per logical pixel.
    pub scale_factor: f32,
}

impl Viewport {
    /// Create a viewport from a logical size and scale factor.
    ///
    /// A non-finite or non-positive scale factor falls back to `1.0`.
    pub fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            scale_factor,
        }
    }

    /// Create a viewport from a physical (device pixel) size.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor as f32
        } else {
            1.0
        };
        Self::new(width as f32 / scale, height as f32 / scale, scale)
    }

    /// Size in device pixels, floored.
    pub fn device_size(&self) -> (u32, u32) {
        (
            (self.width * self.scale_factor).floor() as u32,
            (self.height * self.scale_factor).floor() as u32,
        )
    }

    /// Logical size as a vector.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether either dimension is zero (minimized window).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

/// Drawing surface bound to a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    viewport: Viewport,
    device_width: u32,
    device_height: u32,
}

impl Surface {
    pub fn new(viewport: Viewport) -> Self {
        let (device_width, device_height) = viewport.device_size();
        Self {
            viewport,
            device_width,
            device_height,
        }
    }

    /// Rebind the surface to a new viewport.
    ///
    /// Returns `true` when the device-pixel size changed. Calling it again
    /// with the same viewport is a no-op.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let (w, h) = viewport.device_size();
        let changed = w != self.device_width || h != self.device_height;
        self.viewport = viewport;
        self.device_width = w;
        self.device_height = h;
        changed
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Backing size in device pixels.
    #[inline]
    pub fn device_size(&self) -> (u32, u32) {
        (self.device_width, self.device_height)
    }

    /// Map a normalized `[0,1]^2` point to logical pixels.
    #[inline]
    pub fn denormalize(&self, p: Vec2) -> Vec2 {
        p * self.viewport.size()
    }

    /// Map a logical pixel position to normalized coordinates.
    ///
    /// Returns `None` for an empty viewport.
    pub fn normalize(&self, p: Vec2) -> Option<Vec2> {
        if self.viewport.is_empty() {
            return None;
        }
        Some(p / self.viewport.size())
    }
}
