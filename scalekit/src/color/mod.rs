//! Scales that map a continuous domain onto a fixed `[0, 1]` ramp, usually
//! a color scheme.

pub mod diverging;
pub mod sequential;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::interpolator::{piecewise, Interpolate, Interpolator, Ramp};
use crate::numeric::transform::{LogBase, Transform};

/// Transform applied to domain values before they are normalized onto the
/// ramp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RampTransform {
    #[default]
    Linear,
    Log {
        base: f64,
    },
    Pow {
        exponent: f64,
    },
    Sqrt,
    Symlog {
        constant: f64,
    },
}

impl RampTransform {
    /// The transform for a domain starting at `first`. Log transforms are
    /// mirrored for negative domains.
    pub fn transform(&self, first: f64) -> Transform {
        match *self {
            RampTransform::Linear => Transform::Identity,
            RampTransform::Log { base } => Transform::Log {
                base: LogBase::new(base),
                reflect: first < 0.0,
            },
            RampTransform::Pow { exponent } => Transform::Pow { exponent },
            RampTransform::Sqrt => Transform::Pow { exponent: 0.5 },
            RampTransform::Symlog { constant } => Transform::Symlog { constant },
        }
    }
}

/// `t ↦ t`, the ramp installed until a range or interpolator is set.
pub fn identity_ramp<R: Interpolate>() -> Ramp<R> {
    Arc::new(|t| R::from_number(t))
}

/// A ramp through `values`, each consecutive pair blended by `interpolator`.
pub fn ramp_from_range<R: Interpolate>(
    interpolator: Arc<dyn Interpolator<R>>,
    values: impl IntoIterator<Item = impl Into<R>>,
) -> Option<Ramp<R>> {
    piecewise(interpolator, values.into_iter().map(Into::into).collect())
}

fn clamp_unit(t: f64, clamp: bool) -> f64 {
    if clamp {
        t.clamp(0.0, 1.0)
    } else {
        t
    }
}
