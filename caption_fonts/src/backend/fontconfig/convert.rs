// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fontconfig attribute scales.
//!
//! See <https://www.freedesktop.org/software/fontconfig/fontconfig-user.html>.

use crate::FaceStyle;

/// `FC_WEIGHT` values paired with OpenType `usWeightClass`.
const WEIGHTS: &[(i32, i32)] = &[
    (0, 100),
    (40, 200),
    (50, 300),
    (55, 350),
    (75, 380),
    (80, 400),
    (100, 500),
    (180, 600),
    (200, 700),
    (205, 800),
    (210, 900),
    (215, 1000),
];

/// Converts an `FC_WEIGHT` value to the OpenType scale, interpolating
/// linearly between the named weights.
pub(super) fn weight_from_fontconfig(weight: i32) -> u16 {
    let mut ot = WEIGHTS[WEIGHTS.len() - 1].1;
    if weight <= WEIGHTS[0].0 {
        ot = WEIGHTS[0].1;
    } else if let Some(pair) = WEIGHTS.windows(2).find(|pair| weight <= pair[1].0) {
        let ((fc_a, ot_a), (fc_b, ot_b)) = (pair[0], pair[1]);
        ot = ot_a + (ot_b - ot_a) * (weight - fc_a) / (fc_b - fc_a);
    }
    u16::try_from(ot).unwrap_or(400)
}

/// Converts an `FC_SLANT` value.
pub(super) fn style_from_fontconfig(slant: i32) -> FaceStyle {
    match slant {
        100 => FaceStyle::Italic,
        110 => FaceStyle::Oblique,
        _ => FaceStyle::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::{style_from_fontconfig, weight_from_fontconfig};
    use crate::FaceStyle;

    #[test]
    fn named_weights() {
        assert_eq!(weight_from_fontconfig(0), 100);
        assert_eq!(weight_from_fontconfig(80), 400);
        assert_eq!(weight_from_fontconfig(100), 500);
        assert_eq!(weight_from_fontconfig(200), 700);
        assert_eq!(weight_from_fontconfig(215), 1000);
    }

    #[test]
    fn weights_interpolate_and_clamp() {
        assert_eq!(weight_from_fontconfig(65), 365);
        assert_eq!(weight_from_fontconfig(-10), 100);
        assert_eq!(weight_from_fontconfig(250), 1000);
        let mut last = 0;
        for fc in 0..=215 {
            let ot = weight_from_fontconfig(fc);
            assert!(ot >= last, "weight {fc} went backwards");
            last = ot;
        }
    }

    #[test]
    fn slants() {
        assert_eq!(style_from_fontconfig(0), FaceStyle::Normal);
        assert_eq!(style_from_fontconfig(100), FaceStyle::Italic);
        assert_eq!(style_from_fontconfig(110), FaceStyle::Oblique);
    }
}
