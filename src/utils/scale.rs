//! Output scale calculation for presenting a view.
//!
//! A presented view is shown at the largest scale at which its natural size still fits entirely
//! inside the output, keeping the aspect ratio (contain-fit, never cropping).

use std::fmt;

/// Largest output scale accepted, matching the `scale` range in the config.
pub const MAX_SCALE: f64 = 10.;

#[derive(Debug, Clone, PartialEq)]
pub enum ScaleParseError {
    NotANumber(String),
    OutOfRange(f64),
}

/// Computes the contain-fit scale for a view of `natural` size on an output of `output` size.
///
/// Returns `None` if either natural dimension is not positive. This is checked up front: the
/// division would otherwise silently produce an infinite or NaN scale.
pub fn contain_fit_scale(output: (u32, u32), natural: (i32, i32)) -> Option<f64> {
    let (natural_w, natural_h) = natural;
    if natural_w <= 0 || natural_h <= 0 {
        return None;
    }

    let scale_x = f64::from(output.0) / f64::from(natural_w);
    let scale_y = f64::from(output.1) / f64::from(natural_h);

    // Always pick the lower scale factor.
    Some(f64::min(scale_x, scale_y))
}

/// Formats a scale as a decimal string that parses back to the same value.
pub fn format_scale(scale: f64) -> String {
    format!("{scale}")
}

/// Parses and validates a scale string.
pub fn parse_scale(s: &str) -> Result<f64, ScaleParseError> {
    let scale: f64 = s
        .trim()
        .parse()
        .map_err(|_| ScaleParseError::NotANumber(s.to_owned()))?;

    if !scale.is_finite() || scale <= 0. || scale > MAX_SCALE {
        return Err(ScaleParseError::OutOfRange(scale));
    }

    Ok(scale)
}

/// Logical size of a physical size at the given scale.
pub fn to_logical(physical: (u32, u32), scale: f64) -> (u32, u32) {
    let w = (f64::from(physical.0) / scale).round() as u32;
    let h = (f64::from(physical.1) / scale).round() as u32;
    (w, h)
}

impl fmt::Display for ScaleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleParseError::NotANumber(s) => write!(f, "error parsing scale {s:?}"),
            ScaleParseError::OutOfRange(scale) => {
                write!(f, "scale {scale} must be above 0 and at most {MAX_SCALE}")
            }
        }
    }
}

impl std::error::Error for ScaleParseError {}
