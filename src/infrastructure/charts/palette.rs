use plotters::style::RGBColor;

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

pub const BAR: RGBColor = RGBColor(76, 114, 176);
pub const HIST: RGBColor = RGBColor(70, 130, 180);
pub const DENSITY: RGBColor = RGBColor(25, 45, 110);
pub const UNDEFINED: RGBColor = RGBColor(200, 200, 200);

/// Diverging blue-white-red map over [-1, 1]
pub fn coolwarm(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (COOL, NEUTRAL, v + 1.0)
    } else {
        (NEUTRAL, WARM, v)
    };

    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Whether annotation text on this cell colour should be white
pub fn needs_light_text(value: f64) -> bool {
    value.abs() > 0.6
}
