//! Inversion policy.
//!
//! Decides which colors participate in dark-mode generation and derives
//! the dark counterpart of a light color.

use crate::config::Config;

use super::math::Hsl;

/// Saturation discounted by distance from 50% lightness.
///
/// Near-white and near-black colors report near-zero natural saturation
/// regardless of hue noise, so they still count as invertible neutrals.
pub fn natural_saturation(hsl: &Hsl) -> f64 {
    (hsl.s - (hsl.l - 50.0).abs()).max(0.0)
}

/// True when a color is too saturated to invert under this config.
pub fn exceeds_saturation_threshold(hsl: &Hsl, config: &Config) -> bool {
    natural_saturation(hsl) > f64::from(config.saturation_threshold)
}

/// Mostly-transparent dark overlays are left untouched; inverting them
/// produces visible artifacts against the flipped background.
pub fn is_dark_overlay(hsl: &Hsl, alpha: f64) -> bool {
    alpha <= 0.5 && hsl.l < 50.0
}

/// Derive the dark variant of a light color.
///
/// Invert-then-lift rather than a flat `100 - l`: the lift scales with
/// the original lightness so near-black colors land short of pure white.
/// Hue and saturation carry over unless the grayscale tint applies.
pub fn darken(hsl: &Hsl, config: &Config) -> Hsl {
    let increment = (hsl.l / 100.0) * f64::from(config.min_lightness);
    let lightness = round1((100.0 - hsl.l + increment).min(100.0));

    let mut hue = hsl.h;
    let mut saturation = hsl.s;
    if let Some(tint) = config.grayscale_tint {
        // tint applies to achromatic colors only
        if config.grayscale_tint_amount > 0 && hsl.h + hsl.s == 0.0 {
            hue = tint;
            saturation = (saturation + f64::from(config.grayscale_tint_amount)).min(100.0);
        }
    }

    Hsl::new(hue, saturation, lightness)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
