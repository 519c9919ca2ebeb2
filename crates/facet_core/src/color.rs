//! 8-bit RGB colour values.

use facet_math::Vec3;

/// An RGB colour with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GREY: Color = Color::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert a colour with channels in 0..=1 (as found in MTL files),
    /// rounding to the nearest 8-bit value.
    pub fn from_unit_rgb(rgb: [f32; 3]) -> Self {
        let channel = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
    }

    /// Convert a colour with channels in 0..=255 space, truncating and
    /// capping each channel at 255. Negative channels become 0.
    pub fn from_vec3_saturating(rgb: Vec3) -> Self {
        let channel = |c: f32| c.min(255.0) as u8;
        Self::new(channel(rgb.x), channel(rgb.y), channel(rgb.z))
    }

    /// Channels as floats in 0..=255 space.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32)
    }

    /// Multiply every channel by `factor`, truncating the result.
    pub fn scaled(self, factor: f32) -> Self {
        Self::from_vec3_saturating(self.to_vec3() * factor)
    }

    /// Pack as `0xAARRGGBB` with an opaque alpha.
    pub fn to_argb(self) -> u32 {
        (255 << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpack from `0xAARRGGBB`, ignoring alpha.
    pub fn from_argb(argb: u32) -> Self {
        Self::new((argb >> 16) as u8, (argb >> 8) as u8, argb as u8)
    }
}
