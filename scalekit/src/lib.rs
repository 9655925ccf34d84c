pub mod array;
pub mod band;
pub mod color;
pub mod config;
pub mod error;
pub mod formatter;
pub mod interpolator;
pub mod numeric;
pub mod ordinal;
pub mod point;
pub mod quantile;
pub mod quantize;
pub mod temporal;
pub mod threshold;

