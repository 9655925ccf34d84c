use std::fmt;
use std::str::FromStr;

use format_num::NumberFormat;
use lazy_static::lazy_static;
use regex::Regex;

use crate::array::tick_step;
use crate::error::ScaleError;

lazy_static! {
    static ref SPECIFIER: Regex = Regex::new(
        r"^(?:(.)?([<>=^]))?([+\- ])?([$#])?(0)?(\d+)?(,)?(\.\d+)?(~)?([A-Za-z%])?$"
    )
    .unwrap();
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// A parsed number format specifier:
/// `[[fill]align][sign][symbol][0][width][,][.precision][~][type]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpecifier {
    pub fill: Option<char>,
    pub align: Option<char>,
    pub sign: Option<char>,
    pub symbol: Option<char>,
    pub zero: bool,
    pub width: Option<usize>,
    pub comma: bool,
    pub precision: Option<usize>,
    pub trim: bool,
    pub format_type: Option<char>,
}

impl FromStr for FormatSpecifier {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = SPECIFIER
            .captures(s)
            .ok_or_else(|| ScaleError::InvalidFormatSpecifier(s.to_string()))?;
        let char_at = |i: usize| caps.get(i).and_then(|m| m.as_str().chars().next());

        let mut spec = FormatSpecifier {
            fill: char_at(1),
            align: char_at(2),
            sign: char_at(3),
            symbol: char_at(4),
            zero: caps.get(5).is_some(),
            width: caps.get(6).and_then(|m| m.as_str().parse().ok()),
            comma: caps.get(7).is_some(),
            precision: caps.get(8).and_then(|m| m.as_str()[1..].parse().ok()),
            trim: caps.get(9).is_some(),
            format_type: char_at(10),
        };

        match spec.format_type {
            None
            | Some('e' | 'E' | 'f' | 'g' | 'r' | 'p' | 's' | '%' | 'd' | 'b' | 'o' | 'x' | 'X') => {}
            Some('n') => {
                spec.comma = true;
                spec.format_type = Some('g');
            }
            Some(other) => return Err(ScaleError::UnsupportedFormatType(other)),
        }
        Ok(spec)
    }
}

impl fmt::Display for FormatSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(self.format_type, self.precision))
    }
}

impl FormatSpecifier {
    /// Render back to specifier text with the type and precision replaced.
    /// The trim flag is kept; `pattern` drops it.
    fn render(&self, format_type: Option<char>, precision: Option<usize>) -> String {
        let mut out = String::new();
        if let Some(align) = self.align {
            if let Some(fill) = self.fill {
                out.push(fill);
            }
            out.push(align);
        }
        out.extend(self.sign);
        out.extend(self.symbol);
        if self.zero {
            out.push('0');
        }
        if let Some(width) = self.width {
            out.push_str(&width.to_string());
        }
        if self.comma {
            out.push(',');
        }
        if let Some(precision) = precision {
            out.push('.');
            out.push_str(&precision.to_string());
        }
        if self.trim {
            out.push('~');
        }
        out.extend(format_type);
        out
    }

    /// Pattern understood by `format_num`, which has no trim flag.
    fn pattern(&self, format_type: char, precision: usize) -> String {
        let untrimmed = FormatSpecifier {
            trim: false,
            ..self.clone()
        };
        untrimmed.render(Some(format_type), Some(precision))
    }
}

/// Formats numbers according to a [`FormatSpecifier`]. Built with either
/// [`NumberFormatter::new`] or [`NumberFormatter::with_prefix`], which
/// fixes the SI prefix to that of a reference value.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormatter {
    spec: FormatSpecifier,
    prefix: Option<(f64, &'static str)>,
}

impl NumberFormatter {
    pub fn new(spec: FormatSpecifier) -> Self {
        Self { spec, prefix: None }
    }

    pub fn parse(specifier: &str) -> Result<Self, ScaleError> {
        Ok(Self::new(specifier.parse()?))
    }

    /// Fixed-point formatting in units of the SI prefix of `value`.
    pub fn with_prefix(mut spec: FormatSpecifier, value: f64) -> Self {
        let e = (exponent(value) / 3.0).floor();
        let e = if e.is_nan() { 0 } else { e.clamp(-8.0, 8.0) as i32 };
        spec.format_type = Some('f');
        Self {
            spec,
            prefix: Some((10f64.powi(-3 * e), SI_PREFIXES[(8 + e) as usize])),
        }
    }

    pub fn specifier(&self) -> &FormatSpecifier {
        &self.spec
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        } else if value.is_infinite() {
            return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
        }
        let num = NumberFormat::new();
        let spec = &self.spec;
        let (value, suffix) = match self.prefix {
            Some((k, symbol)) => (value * k, symbol),
            None => (value, ""),
        };

        let (formatted, trim) = match spec.format_type {
            None => (
                self.format_general(value, spec.precision.unwrap_or(12)),
                true,
            ),
            Some('g') => (self.format_general(value, spec.precision.unwrap_or(6)), spec.trim),
            Some('r') => (
                self.format_rounded(value, spec.precision.unwrap_or(6), 'f'),
                spec.trim,
            ),
            Some('p') => (
                self.format_rounded(value, spec.precision.unwrap_or(6), '%'),
                spec.trim,
            ),
            Some('d') => (num.format(&spec.pattern('f', 0), value.round()), spec.trim),
            Some(t) => (
                num.format(&spec.pattern(t, spec.precision.unwrap_or(6)), value),
                spec.trim,
            ),
        };

        let formatted = if trim {
            trim_insignificant(&formatted)
        } else {
            formatted
        };
        format!("{formatted}{suffix}")
    }

    /// `precision` significant digits in fixed notation, switching to
    /// exponent notation for very large or small magnitudes.
    fn format_general(&self, value: f64, precision: usize) -> String {
        let precision = precision.clamp(1, 21);
        let (_, e) = round_significant(value, precision);
        let num = NumberFormat::new();
        if e < -6 || e >= precision as i32 {
            num.format(&self.spec.pattern('e', precision - 1), value)
        } else {
            let decimals = (precision as i32 - 1 - e).max(0) as usize;
            num.format(&self.spec.pattern('f', decimals), value)
        }
    }

    /// `precision` significant digits, always in fixed notation. With
    /// `'%'` the value is scaled by 100 first.
    fn format_rounded(&self, value: f64, precision: usize, format_type: char) -> String {
        let precision = precision.clamp(1, 21);
        let scale = if format_type == '%' { 100.0 } else { 1.0 };
        let (rounded, e) = round_significant(value * scale, precision);
        let decimals = (precision as i32 - 1 - e).max(0) as usize;
        NumberFormat::new().format(
            &self.spec.pattern(format_type, decimals),
            rounded / scale,
        )
    }
}

/// Round to `precision` significant digits, returning the rounded value and
/// its decimal exponent.
fn round_significant(value: f64, precision: usize) -> (f64, i32) {
    if value == 0.0 || !value.is_finite() {
        return (value, 0);
    }
    let text = format!("{:.*e}", precision - 1, value);
    let e = text
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .unwrap_or(0);
    (text.parse().unwrap_or(value), e)
}

/// Remove insignificant trailing zeros from the first fractional digit run,
/// along with the decimal point if nothing remains after it.
pub fn trim_insignificant(s: &str) -> String {
    let Some(dot) = s.find('.') else {
        return s.to_string();
    };
    let digits_end = s[dot + 1..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| dot + 1 + i)
        .unwrap_or(s.len());
    let fraction = &s[dot + 1..digits_end];
    let kept = fraction.trim_end_matches('0');
    if kept.is_empty() {
        format!("{}{}", &s[..dot], &s[digits_end..])
    } else {
        format!("{}.{}{}", &s[..dot], kept, &s[digits_end..])
    }
}

/// Decimal exponent of `x` as written in scientific notation.
pub fn exponent(x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    format!("{:e}", x.abs())
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .map(f64::from)
        .unwrap_or(f64::NAN)
}

/// Decimal places needed for fixed notation of multiples of `step`.
pub fn precision_fixed(step: f64) -> Option<usize> {
    let p = -exponent(step.abs());
    (!p.is_nan()).then(|| p.max(0.0) as usize)
}

/// Decimal places needed for multiples of `step` shown with the SI prefix of `value`.
pub fn precision_prefix(step: f64, value: f64) -> Option<usize> {
    let p = (exponent(value) / 3.0).floor().clamp(-8.0, 8.0) * 3.0 - exponent(step.abs());
    (!p.is_nan()).then(|| p.max(0.0) as usize)
}

/// Significant digits needed to distinguish multiples of `step` up to `max`.
pub fn precision_round(step: f64, max: f64) -> Option<usize> {
    let step = step.abs();
    let max = max.abs() - step;
    let p = (exponent(max) - exponent(step)).max(0.0) + 1.0;
    (!p.is_nan()).then_some(p as usize)
}

/// Build a formatter for ticks of `[start, stop]` at approximately `count`
/// ticks. When the specifier does not fix a precision, one is derived from
/// the tick step. Defaults to `",f"`.
pub fn tick_format(
    start: f64,
    stop: f64,
    count: f64,
    specifier: Option<&str>,
) -> Result<NumberFormatter, ScaleError> {
    let step = tick_step(start, stop, count);
    let mut spec: FormatSpecifier = specifier.unwrap_or(",f").parse()?;
    let max = start.abs().max(stop.abs());

    match spec.format_type {
        Some('s') => {
            if spec.precision.is_none() {
                spec.precision = precision_prefix(step, max);
            }
            return Ok(NumberFormatter::with_prefix(spec, max));
        }
        None | Some('e' | 'g' | 'p' | 'r') => {
            if spec.precision.is_none() {
                let minus = usize::from(spec.format_type == Some('e'));
                spec.precision = precision_round(step, max).map(|p| p.saturating_sub(minus));
            }
        }
        Some('f' | '%') => {
            if spec.precision.is_none() {
                let minus = if spec.format_type == Some('%') { 2 } else { 0 };
                spec.precision = precision_fixed(step).map(|p| p.saturating_sub(minus));
            }
        }
        _ => {}
    }
    Ok(NumberFormatter::new(spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_specifier() -> Result<(), ScaleError> {
        let spec: FormatSpecifier = ",.2f".parse()?;
        assert!(spec.comma);
        assert_eq!(spec.precision, Some(2));
        assert_eq!(spec.format_type, Some('f'));
        assert!(!spec.trim);

        let spec: FormatSpecifier = "*^+$010,.3~s".parse()?;
        assert_eq!(spec.fill, Some('*'));
        assert_eq!(spec.align, Some('^'));
        assert_eq!(spec.sign, Some('+'));
        assert_eq!(spec.symbol, Some('$'));
        assert!(spec.zero);
        assert_eq!(spec.width, Some(10));
        assert!(spec.trim);
        assert_eq!(spec.to_string(), "*^+$010,.3~s");
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "..2f".parse::<FormatSpecifier>(),
            Err(ScaleError::InvalidFormatSpecifier(_))
        ));
        assert_eq!(
            "c".parse::<FormatSpecifier>(),
            Err(ScaleError::UnsupportedFormatType('c'))
        );
    }

    #[test]
    fn test_fixed_and_grouped() -> Result<(), ScaleError> {
        assert_eq!(NumberFormatter::parse(",.0f")?.format(1234.6), "1,235");
        assert_eq!(NumberFormatter::parse(".3~f")?.format(1.5), "1.5");
        assert_eq!(NumberFormatter::parse(".0%")?.format(0.123), "12%");
        assert_eq!(NumberFormatter::parse("d")?.format(41.7), "42");
        Ok(())
    }

    #[test]
    fn test_significant_types() -> Result<(), ScaleError> {
        assert_eq!(NumberFormatter::parse(".2r")?.format(1234.0), "1200");
        assert_eq!(NumberFormatter::parse(".3r")?.format(0.0123456), "0.0123");
        assert_eq!(NumberFormatter::parse(".3g")?.format(12.345), "12.3");
        assert_eq!(NumberFormatter::parse("")?.format(0.1 + 0.2), "0.3");
        assert_eq!(NumberFormatter::parse(".2p")?.format(0.1234), "12%");
        Ok(())
    }

    #[test]
    fn test_non_finite_values() -> Result<(), ScaleError> {
        for specifier in [".2e", ".3E", ".2s", ",.1f", "", "%"] {
            let format = NumberFormatter::parse(specifier)?;
            assert_eq!(format.format(f64::NAN), "NaN");
            assert_eq!(format.format(f64::INFINITY), "Infinity");
            assert_eq!(format.format(f64::NEG_INFINITY), "-Infinity");
        }
        let format = tick_format(0.0, 1000.0, 10.0, Some("s"))?;
        assert_eq!(format.format(f64::NAN), "NaN");
        Ok(())
    }

    #[test]
    fn test_trim_insignificant() {
        assert_eq!(trim_insignificant("1.00000k"), "1k");
        assert_eq!(trim_insignificant("999.500k"), "999.5k");
        assert_eq!(trim_insignificant("-0.250"), "-0.25");
        assert_eq!(trim_insignificant("120"), "120");
    }

    #[test]
    fn test_precision_helpers() {
        assert_eq!(precision_fixed(0.1), Some(1));
        assert_eq!(precision_fixed(0.001), Some(3));
        assert_eq!(precision_fixed(100.0), Some(0));
        assert_eq!(precision_prefix(100.0, 1000.0), Some(1));
        assert_eq!(precision_prefix(1e5, 1e6), Some(1));
        assert_eq!(precision_round(0.1, 1.0), Some(1));
        assert_eq!(precision_round(0.1, 1.1), Some(2));
        assert_eq!(precision_fixed(f64::NAN), None);
    }

    #[test]
    fn test_tick_format_defaults() -> Result<(), ScaleError> {
        let f = tick_format(0.0, 1.0, 10.0, None)?;
        assert_eq!(f.format(0.2), "0.2");
        assert_eq!(f.specifier().to_string(), ",.1f");

        let f = tick_format(0.0, 10000.0, 10.0, None)?;
        assert_eq!(f.format(2000.0), "2,000");
        Ok(())
    }

    #[test]
    fn test_tick_format_types() -> Result<(), ScaleError> {
        let f = tick_format(0.0, 1000.0, 10.0, Some("s"))?;
        assert_eq!(f.format(200.0), "0.2k");
        assert_eq!(f.format(1000.0), "1.0k");

        let f = tick_format(0.0, 1.0, 10.0, Some("%"))?;
        assert_eq!(f.format(0.2), "20%");

        let f = tick_format(0.0, 1.0, 10.0, Some(".3f"))?;
        assert_eq!(f.format(0.2), "0.200");
        Ok(())
    }
}
