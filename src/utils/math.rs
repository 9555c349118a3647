use nalgebra::{Rotation3, Vector3};

/// Sign of a value, with zero treated as positive.
#[inline]
pub fn sign(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Equality within a few ulps of the larger operand.
#[inline]
pub fn equal_to_roundoff(a: f64, b: f64) -> bool {
    let eps = 2.0 * f64::EPSILON;
    (a - b).abs() <= eps * a.abs().max(b.abs())
}

/// Rotation taking body-frame vectors into a frame rotated by the given
/// roll/pitch/yaw (radians).
pub fn body_to_frame(roll: f64, pitch: f64, yaw: f64) -> Rotation3<f64> {
    Rotation3::from_euler_angles(roll, pitch, yaw).inverse()
}

/// Rotate a local NED vector into body axes given Euler attitude (radians).
pub fn ned_to_body(ned: &Vector3<f64>, phi: f64, theta: f64, psi: f64) -> Vector3<f64> {
    body_to_frame(phi, theta, psi) * ned
}

/// Formats like C's `%.<precision>g`: fixed notation for moderate
/// exponents, scientific otherwise, with trailing zeros removed.
pub fn format_significant(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
