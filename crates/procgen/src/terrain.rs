//! One-dimensional terrain heightmap.
//!
//! Heights are surface `y` coordinates (canvas space, larger = lower) sampled at a fixed
//! horizontal spacing. Ground at any `x` is the linear interpolation of the two bracketing
//! samples, clamped to the first/last sample outside the map.

/// Surface used when a terrain has no samples at all.
pub const FALLBACK_GROUND_Y: f32 = 480.0;

/// Generated terrain. Immutable for the duration of a mission.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    heights: Vec<f32>,
    segment_width: f32,
}

impl Terrain {
    pub fn new(heights: Vec<f32>, segment_width: f32) -> Self {
        let segment_width = if segment_width.is_finite() && segment_width > 0.0 {
            segment_width
        } else {
            1.0
        };
        Self {
            heights,
            segment_width,
        }
    }

    /// Flat terrain, mostly for tests.
    pub fn flat(segments: usize, segment_width: f32, ground_y: f32) -> Self {
        Self::new(vec![ground_y; segments.max(1)], segment_width)
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn segment_width(&self) -> f32 {
        self.segment_width
    }

    /// Horizontal extent covered by samples.
    pub fn world_width(&self) -> f32 {
        self.heights.len().saturating_sub(1) as f32 * self.segment_width
    }

    /// Ground surface `y` at world `x`.
    pub fn height_at(&self, x: f32) -> f32 {
        let (first, last) = match (self.heights.first(), self.heights.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return FALLBACK_GROUND_Y,
        };
        if !x.is_finite() || x <= 0.0 {
            return first;
        }
        let t = x / self.segment_width;
        let i = t.floor() as usize;
        if i + 1 >= self.heights.len() {
            return last;
        }
        let frac = t - i as f32;
        let a = self.heights[i];
        let b = self.heights[i + 1];
        a + (b - a) * frac
    }

    /// Segment index containing `x`, clamped to the map.
    pub fn segment_at(&self, x: f32) -> usize {
        if self.heights.is_empty() || !x.is_finite() || x <= 0.0 {
            return 0;
        }
        ((x / self.segment_width) as usize).min(self.heights.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_samples() {
        let t = Terrain::new(vec![400.0, 420.0, 380.0], 40.0);
        assert_eq!(t.height_at(0.0), 400.0);
        assert_eq!(t.height_at(20.0), 410.0);
        assert_eq!(t.height_at(60.0), 400.0);
    }

    #[test]
    fn clamps_outside_the_map() {
        let t = Terrain::new(vec![400.0, 420.0, 380.0], 40.0);
        assert_eq!(t.height_at(-100.0), 400.0);
        assert_eq!(t.height_at(10_000.0), 380.0);
        assert_eq!(t.height_at(f32::NAN), 400.0);
        assert_eq!(t.world_width(), 80.0);
    }

    #[test]
    fn empty_terrain_uses_fallback() {
        let t = Terrain::new(Vec::new(), 40.0);
        assert_eq!(t.height_at(50.0), FALLBACK_GROUND_Y);
        assert_eq!(t.segment_at(50.0), 0);
    }
}
