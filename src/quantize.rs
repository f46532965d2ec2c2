//! Normalization of floating-point fields into display ranges.

use rayon::prelude::*;

use crate::error::{Result, TextureError};
use crate::geometry::value_range;

fn checked_range(values: &[f32], context: &'static str) -> Result<(f32, f32)> {
    let (min, max) = value_range(values);
    if values.is_empty() || min >= max {
        return Err(TextureError::DegenerateRange {
            context,
            value: if values.is_empty() { 0.0 } else { min },
        });
    }
    Ok((min, max))
}

/// Rescales `values` so the observed minimum maps to 0 and the maximum to 1.
///
/// A constant (or empty) input has no meaningful scale and is reported as
/// [`TextureError::DegenerateRange`].
pub fn normalize_unit(values: &[f32], context: &'static str) -> Result<Vec<f32>> {
    let (min, max) = checked_range(values, context)?;
    let span = max - min;
    Ok(values.par_iter().map(|&v| (v - min) / span).collect())
}

fn check_bounds(floor: f32, ceil: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&floor) || !(0.0..=1.0).contains(&ceil) || floor > ceil {
        return Err(TextureError::config(format!(
            "byte range must satisfy 0 <= floor <= ceil <= 1, got floor={} ceil={}",
            floor, ceil
        )));
    }
    Ok(())
}

#[inline]
fn to_byte(unit: f32, floor: f32, ceil: f32) -> u8 {
    (255.0 * ((ceil - floor) * unit + floor)).clamp(0.0, 255.0) as u8
}

/// Maps the observed `[min, max]` of `values` onto the `[floor, ceil]` slice
/// of `[0, 1]`, then onto bytes (truncating).
pub fn to_uint8(values: &[f32], floor: f32, ceil: f32) -> Result<Vec<u8>> {
    check_bounds(floor, ceil)?;
    let unit = normalize_unit(values, "to_uint8")?;
    Ok(unit.into_par_iter().map(|u| to_byte(u, floor, ceil)).collect())
}

/// Full-range 16-bit quantization of `values` (min to 0, max to 65535).
pub fn to_uint16(values: &[f32]) -> Result<Vec<u16>> {
    let unit = normalize_unit(values, "to_uint16")?;
    Ok(unit
        .into_par_iter()
        .map(|u| (65535.0 * u).clamp(0.0, 65535.0) as u16)
        .collect())
}

/// Like [`to_uint8`] for RGB cells, normalizing all three channels jointly so
/// relative channel balance survives.
pub fn to_uint8_rgb(values: &[[f32; 3]], floor: f32, ceil: f32) -> Result<Vec<[u8; 3]>> {
    check_bounds(floor, ceil)?;
    let flat: Vec<f32> = values.iter().flatten().copied().collect();
    let (min, max) = checked_range(&flat, "to_uint8_rgb")?;
    let span = max - min;
    Ok(values
        .par_iter()
        .map(|px| px.map(|c| to_byte((c - min) / span, floor, ceil)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_ramp_roundtrip() {
        let ramp: Vec<f32> = (0..=255).map(|i| i as f32).collect();
        let bytes = to_uint8(&ramp, 0.0, 1.0).unwrap();
        for (i, &b) in bytes.iter().enumerate() {
            assert!((b as i32 - i as i32).abs() <= 1, "ramp[{}] -> {}", i, b);
        }
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[255], 255);
    }

    #[test]
    fn test_sub_range() {
        let values = [-4.0, 0.0, 4.0];
        let bytes = to_uint8(&values, 0.2, 0.6).unwrap();
        assert_eq!(bytes[0], 51);
        assert!((bytes[1] as i32 - 102).abs() <= 1);
        assert!((bytes[2] as i32 - 153).abs() <= 1);
    }

    #[test]
    fn test_output_always_in_byte_range() {
        let values: Vec<f32> = (0..1000).map(|i| ((i * 7919) % 1000) as f32 * 0.37 - 120.0).collect();
        let bytes = to_uint8(&values, 0.0, 1.0).unwrap();
        assert_eq!(bytes.len(), values.len());
        assert!(bytes.contains(&0));
        assert!(bytes.contains(&255));
    }

    #[test]
    fn test_constant_input_is_degenerate() {
        let err = to_uint8(&[3.0; 16], 0.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            TextureError::DegenerateRange { context: "to_uint8", value: 3.0 }
        );
        assert!(normalize_unit(&[], "empty").is_err());
    }

    #[test]
    fn test_invalid_floor_ceil() {
        assert!(to_uint8(&[0.0, 1.0], 0.7, 0.3).is_err());
        assert!(to_uint8(&[0.0, 1.0], -0.1, 1.0).is_err());
    }

    #[test]
    fn test_rgb_joint_normalization() {
        let px = [[0.0, 10.0, 20.0], [20.0, 20.0, 20.0]];
        let bytes = to_uint8_rgb(&px, 0.0, 1.0).unwrap();
        assert_eq!(bytes[0][0], 0);
        assert!((bytes[0][1] as i32 - 127).abs() <= 1);
        assert_eq!(bytes[1], [255, 255, 255]);
    }

    #[test]
    fn test_uint16_full_range() {
        let words = to_uint16(&[-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(words[0], 0);
        assert_eq!(words[2], 65535);
        assert!((words[1] as i32 - 32767).abs() <= 1);
    }
}
