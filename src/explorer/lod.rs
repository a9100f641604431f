use crate::config::LodConfig;

/// Visual representation tiers, from farthest to closest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LodTier {
    Dot,
    Chip,
    Thumbnail,
    Card,
    Detail,
}

impl LodTier {
    pub const ALL: [LodTier; 5] = [
        Self::Dot,
        Self::Chip,
        Self::Thumbnail,
        Self::Card,
        Self::Detail,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Chip => "chip",
            Self::Thumbnail => "thumbnail",
            Self::Card => "card",
            Self::Detail => "detail",
        }
    }
}

/// Maps zoom onto a tier. Each threshold is the inclusive lower bound of the
/// next tier, so the bands cover every zoom value without gaps or overlap.
#[derive(Clone, Copy, Debug)]
pub struct LodBands {
    thresholds: [f32; 4],
}

impl LodBands {
    pub fn new(config: &LodConfig) -> Self {
        Self {
            thresholds: config.thresholds,
        }
    }

    pub fn tier_for(&self, zoom: f32) -> LodTier {
        let passed = self
            .thresholds
            .iter()
            .take_while(|threshold| zoom >= **threshold)
            .count();
        LodTier::ALL[passed]
    }

    /// Zoom range `[min, max)` covered by `tier`.
    pub fn band(&self, tier: LodTier) -> (f32, f32) {
        let slot = tier as usize;
        let low = if slot == 0 {
            f32::NEG_INFINITY
        } else {
            self.thresholds[slot - 1]
        };
        let high = self.thresholds.get(slot).copied().unwrap_or(f32::INFINITY);
        (low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_thresholds() {
        let bands = LodBands::new(&LodConfig::default());
        assert_eq!(bands.tier_for(0.02), LodTier::Dot);
        assert_eq!(bands.tier_for(0.35), LodTier::Chip);
        assert_eq!(bands.tier_for(1.0), LodTier::Thumbnail);
        assert_eq!(bands.tier_for(2.0), LodTier::Card);
        assert_eq!(bands.tier_for(8.0), LodTier::Detail);
    }

    #[test]
    fn bands_are_contiguous() {
        let bands = LodBands::new(&LodConfig::default());
        for pair in LodTier::ALL.windows(2) {
            assert_eq!(bands.band(pair[0]).1, bands.band(pair[1]).0);
        }
        for tier in LodTier::ALL {
            let (low, high) = bands.band(tier);
            let sample_zoom = if low.is_finite() { low } else { high - 0.01 };
            assert_eq!(bands.tier_for(sample_zoom), tier);
        }
    }
}
