//! RGB/HSL conversion.
//!
//! The conversions here are deliberately order-sensitive: hue, saturation
//! and lightness are rounded to whole numbers on the way out of
//! [`rgb_to_hsl`], and [`hsl_to_hex`] truncates channels back to bytes.
//! The generated variable values depend on these exact rounding rules, so
//! they must not be "improved".

/// An HSL triple: hue in degrees `[0, 360)`, saturation and lightness in
/// percent `[0, 100]`.
///
/// Always derived from RGB, never a source of truth. Lightness may carry
/// one decimal place after the darken transform (e.g. `95.1`); hue and
/// saturation coming out of [`rgb_to_hsl`] are whole numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Bare variable-value form: `<h>deg,<s>%,<l>%`.
    ///
    /// Consumed inside `hsl()`/`hsla()` at the point of use.
    pub fn triple(&self) -> String {
        format!(
            "{}deg,{}%,{}%",
            fmt_number(self.h),
            fmt_number(self.s),
            fmt_number(self.l)
        )
    }

    /// Spaced literal form used when rewriting colors in place:
    /// `hsl(<h>deg, <s>%, <l>%)` or `hsla(<h>deg, <s>%, <l>%, <a>)`.
    /// The alpha is carried as source text so the original precision
    /// survives the rewrite.
    pub fn css_literal(&self, alpha: Option<&str>) -> String {
        match alpha {
            Some(a) => format!(
                "hsla({}deg, {}%, {}%, {})",
                fmt_number(self.h),
                fmt_number(self.s),
                fmt_number(self.l),
                a
            ),
            None => format!(
                "hsl({}deg, {}%, {}%)",
                fmt_number(self.h),
                fmt_number(self.s),
                fmt_number(self.l)
            ),
        }
    }
}

/// Format a number without a trailing `.0`, keeping real fractions.
///
/// `71.0` renders as `71`, `95.1` stays `95.1`.
pub fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Convert 0..255 RGB channels to HSL, rounded to whole numbers.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let d = max - min;
    let mut h = 0.0;
    let mut s = 0.0;
    if d != 0.0 {
        s = d / (1.0 - (2.0 * l - 1.0).abs());
        if max == r {
            h = 60.0 * (((g - b) / d) % 6.0);
            if b > g {
                // the red branch yields a negative hue here
                h += 360.0;
            }
        } else if max == g {
            h = 60.0 * ((b - r) / d + 2.0);
        } else {
            h = 60.0 * ((r - g) / d + 4.0);
        }
    }

    Hsl::new(h.round(), (s * 100.0).round(), (l * 100.0).round())
}

/// Convert a `#rgb` or `#rrggbb` hex string to HSL.
///
/// Returns `None` for anything that is not a 3- or 6-digit hex color.
pub fn hex_to_hsl(hex: &str) -> Option<Hsl> {
    let (r, g, b) = hex_to_rgb(hex)?;
    Some(rgb_to_hsl(r, g, b))
}

/// Decode a `#rgb` or `#rrggbb` hex string into RGB channels.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return None;
    }

    let expanded;
    let hex = match hex.len() {
        3 => {
            let b = hex.as_bytes();
            expanded = String::from_utf8(vec![b[0], b[0], b[1], b[1], b[2], b[2]]).ok()?;
            expanded.as_str()
        }
        6 => hex,
        _ => return None,
    };

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Format RGB channels as a lowercase hex color, collapsing to the
/// 3-digit shorthand when every channel has doubled digits.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
    let c = hex.as_bytes();
    if c[1] == c[2] && c[3] == c[4] && c[5] == c[6] {
        format!("#{}{}{}", c[1] as char, c[3] as char, c[5] as char)
    } else {
        hex
    }
}

/// Convert HSL back to a hex color via the standard sextant algorithm.
///
/// Inverse of [`rgb_to_hsl`] to rounding precision; channels are
/// truncated, not rounded, to match the reference output.
pub fn hsl_to_hex(hsl: &Hsl) -> String {
    let h = hsl.h / 360.0;
    let s = hsl.s / 100.0;
    let l = hsl.l / 100.0;

    let mut r = l;
    let mut g = l;
    let mut b = l;

    let v = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    if v > 0.0 {
        let m = l + l - v;
        let sv = (v - m) / v;
        let h6 = h * 6.0;
        let sextant = h6.floor();
        let fract = h6 - sextant;
        let vsf = v * sv * fract;
        let mid1 = m + vsf;
        let mid2 = v - vsf;

        match sextant as i32 {
            0 => {
                r = v;
                g = mid1;
                b = m;
            }
            1 => {
                r = mid2;
                g = v;
                b = m;
            }
            2 => {
                r = m;
                g = v;
                b = mid1;
            }
            3 => {
                r = m;
                g = mid2;
                b = v;
            }
            4 => {
                r = mid1;
                g = m;
                b = v;
            }
            5 => {
                r = v;
                g = m;
                b = mid2;
            }
            _ => {}
        }
    }

    rgb_to_hex((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}
