//! Color mapping for shards

use rand::seq::SliceRandom;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGBA color type
pub type ShardColor = [f32; 4];

/// A color in hue/saturation/lightness form
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in degrees (wraps at 360)
    pub hue: f32,
    /// Saturation in percent
    pub saturation: f32,
    /// Lightness in percent
    pub lightness: f32,
}

impl Hsl {
    /// Create a color from degrees and percentages
    pub const fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Convert to opaque sRGB
    pub fn to_rgba(self) -> ShardColor {
        let h = self.hue.rem_euclid(360.0) / 360.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            return [l, l, l, 1.0];
        }

        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        [
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            1.0,
        ]
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Dark golds, reds, olives and pale blues
pub const DEFAULT_PALETTE: [Hsl; 8] = [
    Hsl::new(47.0, 95.0, 16.0),
    Hsl::new(360.0, 100.0, 39.0),
    Hsl::new(0.0, 100.0, 50.0),
    Hsl::new(67.0, 91.0, 27.0),
    Hsl::new(222.0, 87.0, 74.0),
    Hsl::new(236.0, 17.0, 81.0),
    Hsl::new(65.0, 96.0, 19.0),
    Hsl::new(34.0, 100.0, 49.0),
];

/// Trait for mapping shard ids to colors
pub trait ColorMapper {
    /// Map a shard id to an RGBA color
    fn map_color(&self, id: usize) -> ShardColor;
}

/// Deals palette colors out by id, in a shuffleable order
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteColorMapper {
    colors: Vec<ShardColor>,
}

impl PaletteColorMapper {
    /// Mapper over the given palette, in palette order
    pub fn new(palette: &[Hsl]) -> Self {
        Self {
            colors: palette.iter().map(|c| c.to_rgba()).collect(),
        }
    }

    /// Reorder the palette
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.colors.shuffle(rng);
    }

    /// Colors in their current order
    pub fn colors(&self) -> &[ShardColor] {
        &self.colors
    }
}

impl Default for PaletteColorMapper {
    fn default() -> Self {
        Self::new(&DEFAULT_PALETTE)
    }
}

impl ColorMapper for PaletteColorMapper {
    fn map_color(&self, id: usize) -> ShardColor {
        if self.colors.is_empty() {
            return [1.0, 1.0, 1.0, 1.0];
        }
        self.colors[id % self.colors.len()]
    }
}

/// Same color for every shard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformColorMapper(pub ShardColor);

impl Default for UniformColorMapper {
    fn default() -> Self {
        Self([1.0, 1.0, 1.0, 1.0])
    }
}

impl ColorMapper for UniformColorMapper {
    fn map_color(&self, _id: usize) -> ShardColor {
        self.0
    }
}
