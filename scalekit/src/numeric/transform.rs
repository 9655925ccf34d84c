use std::f64::consts::E;

/// Logarithm and exponentiation in a fixed base, with fast paths for the
/// common bases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogBase {
    base: f64,
    ln_base: f64,
}

impl LogBase {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            ln_base: base.ln(),
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn log(&self, x: f64) -> f64 {
        if self.base == 10.0 {
            x.log10()
        } else if self.base == 2.0 {
            x.log2()
        } else if self.base == E {
            x.ln()
        } else {
            x.ln() / self.ln_base
        }
    }

    pub fn pow(&self, x: f64) -> f64 {
        if self.base == 10.0 {
            // integral powers of ten parse exactly, `powf` may be off by an ulp
            if x.fract() == 0.0 && x.abs() <= 308.0 {
                if let Ok(v) = format!("1e{}", x as i32).parse::<f64>() {
                    return v;
                }
            }
            10f64.powf(x)
        } else if self.base == E {
            x.exp()
        } else {
            self.base.powf(x)
        }
    }
}

/// The transform a continuous scale applies to domain values before
/// interpolating, and inverts after.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    Identity,
    Pow {
        exponent: f64,
    },
    /// `reflect` mirrors the transform for all-negative domains.
    Log {
        base: LogBase,
        reflect: bool,
    },
    Symlog {
        constant: f64,
    },
}

impl Transform {
    pub fn log(base: f64) -> Self {
        Transform::Log {
            base: LogBase::new(base),
            reflect: false,
        }
    }

    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Transform::Identity => x,
            Transform::Pow { exponent } => pow_signed(x, exponent),
            Transform::Log { base, reflect } => {
                if reflect {
                    -base.log(-x)
                } else {
                    base.log(x)
                }
            }
            Transform::Symlog { constant } => x.signum() * (x.abs() / constant).ln_1p(),
        }
    }

    pub fn invert(&self, y: f64) -> f64 {
        match *self {
            Transform::Identity => y,
            Transform::Pow { exponent } => pow_signed(y, 1.0 / exponent),
            Transform::Log { base, reflect } => {
                if reflect {
                    -base.pow(-y)
                } else {
                    base.pow(y)
                }
            }
            Transform::Symlog { constant } => y.signum() * y.abs().exp_m1() * constant,
        }
    }
}

fn pow_signed(x: f64, exponent: f64) -> f64 {
    if exponent == 1.0 {
        x
    } else if exponent == 0.5 {
        x.signum() * x.abs().sqrt()
    } else if x < 0.0 {
        -(-x).powf(exponent)
    } else {
        x.powf(exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_exact_powers_of_ten() {
        let base = LogBase::new(10.0);
        assert_eq!(base.pow(-1.0), 0.1);
        assert_eq!(base.pow(-3.0), 0.001);
        assert_eq!(base.pow(2.0), 100.0);
        assert_approx_eq!(f64, base.pow(0.5), 10f64.sqrt());
    }

    #[test]
    fn test_pow_preserves_sign() {
        let t = Transform::Pow { exponent: 2.0 };
        assert_eq!(t.apply(-3.0), -9.0);
        assert_eq!(t.invert(-9.0), -3.0);
    }

    #[test]
    fn test_reflected_log() {
        let t = Transform::Log {
            base: LogBase::new(10.0),
            reflect: true,
        };
        assert_approx_eq!(f64, t.apply(-100.0), -2.0);
        assert_approx_eq!(f64, t.invert(-2.0), -100.0);
        assert!(t.apply(5.0).is_nan());
    }

    #[test]
    fn test_symlog_round_trip() {
        let t = Transform::Symlog { constant: 1.0 };
        assert_eq!(t.apply(0.0), 0.0);
        for x in [-50.0, -1.0, 0.25, 3.0, 1000.0] {
            assert_approx_eq!(f64, t.invert(t.apply(x)), x, epsilon = 1e-9);
        }
    }
}
