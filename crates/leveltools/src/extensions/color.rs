// extensions/color.rs
//
// 24-bit RGB helpers. Colors travel as plain numbers (0xRRGGBB) so they can
// sit in the same numeric fields the tween engine animates.

const RED: f64 = 65536.0; // 0x010000
const GREEN: f64 = 256.0; // 0x000100

/// Split a 0xRRGGBB value into `[r, g, b]`, each in 0..=255.
#[inline]
pub fn channels(color: f64) -> [f64; 3] {
    [
        (color / RED).floor(),
        ((color % RED) / GREEN).floor(),
        (color % GREEN).floor(),
    ]
}

/// Join `[r, g, b]` back into a 0xRRGGBB value.
#[inline]
pub fn from_channels([r, g, b]: [f64; 3]) -> f64 {
    r * RED + g * GREEN + b
}

/// Per-channel increment from `start` to `end`.
pub fn channel_delta(start: f64, end: f64) -> [f64; 3] {
    let [sr, sg, sb] = channels(start);
    let [er, eg, eb] = channels(end);
    [er - sr, eg - sg, eb - sb]
}

/// Move `start` along `delta` by `percent`, flooring each channel step on its
/// own so no channel borrows from its neighbour.
pub fn lerp_color(start: f64, delta: [f64; 3], percent: f64) -> f64 {
    let [dr, dg, db] = delta;
    (start
        + (dr * percent).floor() * RED
        + (dg * percent).floor() * GREEN
        + (db * percent).floor())
    .round()
}

/// HSL lightness of a color, in percent (0 = black, 100 = white).
pub fn luminance(color: f64) -> f64 {
    let [r, g, b] = channels(color);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    (max + min) * 100.0 / 255.0 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_joins() {
        assert_eq!(channels(0x12_34_56 as f64), [18.0, 52.0, 86.0]);
        assert_eq!(from_channels([18.0, 52.0, 86.0]), 0x12_34_56 as f64);
    }

    #[test]
    fn channels_move_independently() {
        let start = 0x00ffff as f64;
        let end = 0xff0000 as f64;
        let delta = channel_delta(start, end);
        assert_eq!(delta, [255.0, -255.0, -255.0]);

        let quarter = lerp_color(start, delta, 0.25);
        let [r, g, b] = channels(quarter);
        // 255 * 0.25 = 63.75: red floors up from 0, green/blue floor down from 255
        assert_eq!(r, 63.0);
        assert_eq!(g, 191.0);
        assert_eq!(b, 191.0);
    }

    #[test]
    fn red_to_blue_midpoint() {
        let start = 0xff0000 as f64;
        let end = 0x0000ff as f64;
        let mid = lerp_color(start, channel_delta(start, end), 0.5);
        let [r, g, b] = channels(mid);
        assert_eq!(r, 127.0);
        assert_eq!(g, 0.0);
        assert_eq!(b, 127.0);
    }

    #[test]
    fn full_progress_reaches_end() {
        let start = 0x336699 as f64;
        let end = 0xcc9933 as f64;
        assert_eq!(lerp_color(start, channel_delta(start, end), 1.0), end);
        assert_eq!(lerp_color(start, channel_delta(start, end), 0.0), start);
    }

    #[test]
    fn luminance_range() {
        assert_eq!(luminance(0x000000 as f64), 0.0);
        assert_eq!(luminance(0xffffff as f64), 100.0);
        assert!((luminance(0xff0000 as f64) - 50.0).abs() < 1e-9);
    }
}
