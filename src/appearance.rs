//! Agent colour variants.
//!
//! A flock is coloured by one [`Appearance`], picked in the configuration.
//! Each agent samples its own colour from that variant once, when it is
//! spawned, and keeps it for its whole life.

use crate::error::ParseAppearanceError;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// The closed set of colour schemes an agent can be spawned with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    /// Dark grey.
    #[default]
    Default,
    /// Random shades of red.
    Reds,
    /// Random shades of green.
    Greens,
    /// Random shades of blue.
    Blues,
    /// Warm yellows and oranges.
    Yellows,
    /// Green-blue mixes.
    Cyans,
    /// Red-blue mixes.
    Magentas,
    /// Any colour at all.
    Rainbow,
}

/// Channel ranges, in 8-bit units.
const BRIGHT: Range<f32> = 160.0..255.0;
const FULL: Range<f32> = 0.0..255.0;

impl Appearance {
    /// Every variant, in declaration order.
    pub const ALL: [Appearance; 8] = [
        Appearance::Default,
        Appearance::Reds,
        Appearance::Greens,
        Appearance::Blues,
        Appearance::Yellows,
        Appearance::Cyans,
        Appearance::Magentas,
        Appearance::Rainbow,
    ];

    /// Lowercase name, as used in config files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Appearance::Default => "default",
            Appearance::Reds => "reds",
            Appearance::Greens => "greens",
            Appearance::Blues => "blues",
            Appearance::Yellows => "yellows",
            Appearance::Cyans => "cyans",
            Appearance::Magentas => "magentas",
            Appearance::Rainbow => "rainbow",
        }
    }

    /// Draw an RGB colour (each channel 0-1) for a newly spawned agent.
    pub fn sample_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let mut channel = |range: Range<f32>| rng.gen_range(range).floor();

        let rgb = match self {
            Appearance::Default => Vec3::splat(50.0),
            Appearance::Reds => Vec3::new(channel(BRIGHT), 0.0, 0.0),
            Appearance::Greens => Vec3::new(0.0, channel(BRIGHT), 0.0),
            Appearance::Blues => Vec3::new(0.0, 0.0, channel(BRIGHT)),
            Appearance::Yellows => Vec3::new(channel(240.0..255.0), channel(200.0..255.0), 0.0),
            Appearance::Cyans => Vec3::new(0.0, channel(BRIGHT), channel(BRIGHT)),
            Appearance::Magentas => Vec3::new(channel(BRIGHT), 0.0, channel(BRIGHT)),
            Appearance::Rainbow => Vec3::new(channel(FULL), channel(FULL), channel(FULL)),
        };

        rgb / 255.0
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Appearance {
    type Err = ParseAppearanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Appearance::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseAppearanceError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_is_grey() {
        let mut rng = SmallRng::seed_from_u64(0);
        let c = Appearance::Default.sample_color(&mut rng);
        assert!((c.x - 50.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.x, c.y);
        assert_eq!(c.y, c.z);
    }

    #[test]
    fn test_single_channel_variants() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let r = Appearance::Reds.sample_color(&mut rng);
            assert!(r.x >= 160.0 / 255.0 && r.x < 1.0);
            assert_eq!((r.y, r.z), (0.0, 0.0));

            let g = Appearance::Greens.sample_color(&mut rng);
            assert!(g.y >= 160.0 / 255.0);
            assert_eq!((g.x, g.z), (0.0, 0.0));

            let b = Appearance::Blues.sample_color(&mut rng);
            assert!(b.z >= 160.0 / 255.0);
            assert_eq!((b.x, b.y), (0.0, 0.0));
        }
    }

    #[test]
    fn test_colors_in_unit_range() {
        let mut rng = SmallRng::seed_from_u64(2);
        for appearance in Appearance::ALL {
            for _ in 0..50 {
                let c = appearance.sample_color(&mut rng);
                assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0, "{appearance}: {c:?}");
            }
        }
    }

    #[test]
    fn test_parse_names() {
        for appearance in Appearance::ALL {
            assert_eq!(appearance.name().parse::<Appearance>().unwrap(), appearance);
        }
        assert_eq!(" Magentas ".parse::<Appearance>().unwrap(), Appearance::Magentas);
        assert!("purples".parse::<Appearance>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Appearance::Cyans).unwrap();
        assert_eq!(json, "\"cyans\"");
        let back: Appearance = serde_json::from_str("\"rainbow\"").unwrap();
        assert_eq!(back, Appearance::Rainbow);
    }
}
