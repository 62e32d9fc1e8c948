//! Quantization parameters for interpreting integer-encoded scores.

/// Scale and zero-point pair for an affine-quantized tensor.
///
/// A quantized score `q` represents the real value
/// `scale * (q - zero_point)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantParams {
    /// Multiplier applied after zero-point subtraction.
    pub scale: f32,
    /// Quantized value that maps to real 0.0.
    pub zero_point: i32,
}

impl QuantParams {
    /// Creates quantization parameters from a scale and zero point.
    pub fn new(scale: f32, zero_point: i32) -> Self {
        Self { scale, zero_point }
    }

    /// Parameters mapping raw `u8` scores onto `[0, 1]` (`q / 255`), the
    /// usual interpretation of a quantized softmax output.
    pub fn uint8_unit() -> Self {
        Self {
            scale: 1.0 / 255.0,
            zero_point: 0,
        }
    }

    /// Converts a quantized score to its real-valued approximation.
    pub fn dequantize(&self, q: u8) -> f32 {
        (q as i32 - self.zero_point) as f32 * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint8_unit_range() {
        let quant = QuantParams::uint8_unit();
        assert_eq!(quant.dequantize(0), 0.0);
        assert_eq!(quant.dequantize(255), 1.0);
        assert!((quant.dequantize(51) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_zero_point_offset() {
        let quant = QuantParams::new(0.25, 128);
        assert_eq!(quant.dequantize(128), 0.0);
        assert_eq!(quant.dequantize(132), 1.0);
        // values below the zero point dequantize to negatives
        assert_eq!(quant.dequantize(124), -1.0);
    }
}
