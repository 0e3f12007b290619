//! Deterministic channel palette.
//!
//! Channel `i` always gets the same color for a given payload: the first
//! entries come from a hand-picked table, later ones walk the hue circle by
//! the golden ratio so neighbours stay distinguishable.

/// Color for missing or unconnected entities.
pub const NEUTRAL_GRAY: [f32; 3] = [0.5, 0.5, 0.5];

/// Color for blocks linked from more than one channel.
pub const CROSS_LINK_COLOR: [f32; 3] = [1.0, 0.92, 0.74];

const PALETTE: [[f32; 3]; 12] = [
    [0.96, 0.42, 0.36],
    [0.30, 0.68, 0.96],
    [0.98, 0.76, 0.28],
    [0.44, 0.86, 0.52],
    [0.78, 0.48, 0.96],
    [0.26, 0.88, 0.84],
    [0.98, 0.54, 0.74],
    [0.62, 0.80, 0.30],
    [0.52, 0.56, 0.98],
    [0.98, 0.62, 0.30],
    [0.36, 0.78, 0.66],
    [0.90, 0.36, 0.58],
];

const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;

/// Palette color for the channel at dense index `index`.
pub fn channel_color(index: usize) -> [f32; 3] {
    if let Some(color) = PALETTE.get(index) {
        return *color;
    }
    let hue = (index as f32 * GOLDEN_RATIO_CONJUGATE).fract();
    hsv_to_rgb(hue, 0.58, 0.95)
}

/// Convert HSV (all components in `[0, 1]`) to linear RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u32 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_deterministic() {
        for i in 0..64 {
            assert_eq!(channel_color(i), channel_color(i));
        }
        assert_eq!(channel_color(0), PALETTE[0]);
    }

    #[test]
    fn generated_colors_stay_in_range() {
        for i in 12..200 {
            let c = channel_color(i);
            assert!(c.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn hsv_primaries() {
        let red = hsv_to_rgb(0.0, 1.0, 1.0);
        assert_eq!(red, [1.0, 0.0, 0.0]);
        let gray = hsv_to_rgb(0.3, 0.0, 0.5);
        assert_eq!(gray, [0.5, 0.5, 0.5]);
    }
}
