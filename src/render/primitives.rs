use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn hex(packed: u32) -> Self {
        Self::rgb(
            ((packed >> 16) & 0xff) as f64 / 255.0,
            ((packed >> 8) & 0xff) as f64 / 255.0,
            (packed & 0xff) as f64 / 255.0,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// CSS `rgba(...)` notation used by the interactive backend.
    #[must_use]
    pub fn to_css(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.red),
            channel(self.green),
            channel(self.blue),
            self.alpha.clamp(0.0, 1.0)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hex_and_css_agree() {
        assert_eq!(Color::hex(0xff8000).to_css(), "rgba(255, 128, 0, 1)");
    }

    #[test]
    fn rejects_out_of_range_channels() {
        assert!(Color::rgb(1.5, 0.0, 0.0).validate().is_err());
        assert!(Color::rgba(0.0, 0.0, 0.0, f64::NAN).validate().is_err());
    }
}
