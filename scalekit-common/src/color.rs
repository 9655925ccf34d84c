use css_color_parser::Color;
use palette::Srgba;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid CSS color: {0}")]
pub struct InvalidColor(pub String);

/// Parse a CSS color string (`"steelblue"`, `"#f00"`, `"rgb(1, 2, 3)"`, ...)
pub fn parse_css_color(s: &str) -> Result<Srgba, InvalidColor> {
    let color = s
        .trim()
        .parse::<Color>()
        .map_err(|_| InvalidColor(s.to_string()))?;
    Ok(Srgba::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        color.a,
    ))
}

/// Render a color as `rgb(r, g, b)`, or `rgba(r, g, b, a)` when translucent.
pub fn to_css_string(color: &Srgba) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    let (r, g, b) = (
        channel(color.red),
        channel(color.green),
        channel(color.blue),
    );
    let alpha = color.alpha.clamp(0.0, 1.0);
    if alpha >= 1.0 {
        format!("rgb({r}, {g}, {b})")
    } else {
        format!("rgba({r}, {g}, {b}, {alpha})")
    }
}
