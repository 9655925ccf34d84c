use scalekit_common::color::InvalidColor;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("Invalid format specifier: {0}")]
    InvalidFormatSpecifier(String),

    #[error("Unsupported format type '{0}'")]
    UnsupportedFormatType(char),

    #[error("Invalid time interval: {0}")]
    InvalidTimeInterval(String),

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error(transparent)]
    InvalidColor(#[from] InvalidColor),

    #[error("Expected a numeric range value, found {0}")]
    NonNumericRange(String),
}
