/// Rec. 601 luma weights used by the tone and stylistic kernels.
pub const LUMA_R: f64 = 0.299;
pub const LUMA_G: f64 = 0.587;
pub const LUMA_B: f64 = 0.114;

/// Stores a computed channel value the way a clamped 8-bit canvas store
/// does: clamp to `[0, 255]`, then round half to even.
pub fn clamp_channel(value: f64) -> u8 {
    let v = value.clamp(0.0, 255.0);
    let rounded = if (v - v.trunc()).abs() == 0.5 {
        2.0 * (v / 2.0).round()
    } else {
        v.round()
    };
    rounded as u8
}

/// Weighted luminance in the 0-255 range.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    r as f64 * LUMA_R + g as f64 * LUMA_G + b as f64 * LUMA_B
}

/// Unweighted mean of the three color channels.
pub fn mean_rgb(r: u8, g: u8, b: u8) -> f64 {
    (r as f64 + g as f64 + b as f64) / 3.0
}

/// `|dR| + |dG| + |dB|`.
pub fn manhattan_distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x as i32 - y as i32).unsigned_abs())
        .sum()
}
