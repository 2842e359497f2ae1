use std::f64::consts::PI;

/// Number of entries in a wave-shaper transfer curve.
pub const CURVE_LEN: usize = 44100;

/// Wave-shaper transfer curve for a distortion `amount`.
///
/// Entry `i` maps the input level `x = 2i/CURVE_LEN - 1` to
/// `((3 + amount) * x * 20deg) / (pi + amount * |x|)`. Cheap enough to
/// rebuild on every parameter change.
pub fn make_curve(amount: i32) -> Vec<f32> {
    let amount = amount as f64;
    let deg = PI / 180.0;
    (0..CURVE_LEN)
        .map(|i| {
            let x = (i as f64 * 2.0) / CURVE_LEN as f64 - 1.0;
            (((3.0 + amount) * x * 20.0 * deg) / (PI + amount * x.abs())) as f32
        })
        .collect()
}
