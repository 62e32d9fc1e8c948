//! ONNX Runtime inference engine for classification models.
//!
//! Wraps an `ort` [`Session`] built either from model bytes embedded in the
//! binary or from a file on disk, and exposes typed 2D inference entry
//! points for classification heads: `infer_2d` for float outputs and
//! `infer_2d_u8` for quantized `u8` outputs.

use crate::core::errors::{ClassifyError, SimpleError};
use crate::core::{Tensor2D, Tensor4D};
use ndarray::ArrayView2;
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::{PrimitiveTensorElementType, TensorRef, ValueType};
use std::sync::Mutex;

/// Single-session inference engine around ONNX Runtime.
///
/// The session is discovered rather than configured: input and output tensor
/// names and the input shape come from the model's own metadata, so the
/// caller never has to hardcode them.
pub struct OrtClassify {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    model_name: String,
}

impl std::fmt::Debug for OrtClassify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtClassify")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtClassify {
    /// Creates an engine from serialized model bytes (e.g. `include_bytes!`).
    pub fn from_memory(model_bytes: &[u8], model_name: &str) -> Result<Self, ClassifyError> {
        let session = Session::builder()?
            .with_log_level(LogLevel::Error)?
            .commit_from_memory(model_bytes)
            .map_err(|e| {
                ClassifyError::inference(
                    format!("failed to build session for embedded model '{model_name}'"),
                    e,
                )
            })?;
        Self::from_session(session, model_name)
    }

    /// Creates an engine from a model file on disk.
    pub fn from_file(
        model_path: impl AsRef<std::path::Path>,
        model_name: &str,
    ) -> Result<Self, ClassifyError> {
        let path = model_path.as_ref();
        let session = Session::builder()?
            .with_log_level(LogLevel::Error)?
            .commit_from_file(path)
            .map_err(|e| {
                ClassifyError::inference(
                    format!("failed to build session from '{}'", path.display()),
                    e,
                )
            })?;
        Self::from_session(session, model_name)
    }

    fn from_session(session: Session, model_name: &str) -> Result<Self, ClassifyError> {
        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| {
                ClassifyError::invalid_input(format!(
                    "model '{model_name}' declares no inputs - model may be invalid or corrupted"
                ))
            })?;
        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| {
                ClassifyError::invalid_input(format!(
                    "model '{model_name}' declares no outputs - model may be invalid or corrupted"
                ))
            })?;

        Ok(OrtClassify {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_name: model_name.to_string(),
        })
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Attempts to retrieve the primary input tensor shape from the session.
    ///
    /// Returns a vector of dimensions if available. Dynamic dimensions (e.g. -1)
    /// are returned as-is.
    pub fn primary_input_shape(&self) -> Option<Vec<i64>> {
        let session_guard = self.session.lock().ok()?;
        let input = session_guard.inputs().first()?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Runs a forward pass and hands the raw output shape and data to a
    /// processor closure. The typed entry points below only differ in the
    /// element type they extract and how they package the result.
    fn run_inference_with_processor<E, T>(
        &self,
        x: &Tensor4D,
        processor: impl FnOnce(&[i64], &[E]) -> Result<T, ClassifyError>,
    ) -> Result<T, ClassifyError>
    where
        E: PrimitiveTensorElementType + std::fmt::Debug + 'static,
    {
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifyError::inference(
                format!(
                    "failed to convert input tensor with shape {:?} for model '{}'",
                    input_shape, self.model_name
                ),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session_guard = self.session.lock().map_err(|_| {
            ClassifyError::inference(
                format!(
                    "failed to acquire session lock for model '{}'",
                    self.model_name
                ),
                SimpleError::new("session lock acquisition failed"),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            ClassifyError::inference(
                format!(
                    "forward pass failed for model '{}' with input '{}' -> output '{}'",
                    self.model_name, self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<E>()
            .map_err(|e| {
                ClassifyError::inference(
                    format!(
                        "failed to extract output tensor '{}' as {} from model '{}'",
                        self.output_name,
                        std::any::type_name::<E>(),
                        self.model_name
                    ),
                    e,
                )
            })?;

        processor(output_shape, output_data)
    }

    /// Runs inference and returns the `[batch, classes]` float score tensor.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, ClassifyError> {
        let batch_size = x.shape()[0];
        self.run_inference_with_processor(x, |output_shape, output_data: &[f32]| {
            validate_2d_output(&self.model_name, batch_size, output_shape, output_data.len())?;
            let num_classes = output_shape[output_shape.len() - 1] as usize;
            let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)
                .map_err(ClassifyError::Tensor)?;
            Ok(array_view.to_owned())
        })
    }

    /// Runs inference and returns the `[batch, classes]` quantized score tensor.
    ///
    /// For models with a quantized classification head the scores come back as
    /// raw `u8` values; interpreting them requires the model's quantization
    /// parameters (see [`crate::processors::QuantParams`]).
    pub fn infer_2d_u8(&self, x: &Tensor4D) -> Result<ndarray::Array2<u8>, ClassifyError> {
        let batch_size = x.shape()[0];
        self.run_inference_with_processor(x, |output_shape, output_data: &[u8]| {
            validate_2d_output(&self.model_name, batch_size, output_shape, output_data.len())?;
            let num_classes = output_shape[output_shape.len() - 1] as usize;
            let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)
                .map_err(ClassifyError::Tensor)?;
            Ok(array_view.to_owned())
        })
    }
}

/// Checks that a classification output is sized consistently with its
/// declared shape, taking the trailing dimension as the class count.
///
/// Output dims are assumed to be something like `(batch, 1, ..., classes)`.
fn validate_2d_output(
    model_name: &str,
    batch_size: usize,
    output_shape: &[i64],
    data_len: usize,
) -> Result<(), ClassifyError> {
    if output_shape.is_empty() {
        return Err(ClassifyError::invalid_input(format!(
            "model '{model_name}' returned a scalar output, expected [batch, classes]"
        )));
    }

    let num_classes = output_shape[output_shape.len() - 1] as usize;
    let expected_len = batch_size * num_classes;
    if data_len != expected_len {
        return Err(ClassifyError::tensor_operation(
            &format!(
                "model '{}': output data size mismatch, expected {} ({} x {} classes), got {} for shape {:?}",
                model_name, expected_len, batch_size, num_classes, data_len, output_shape
            ),
            SimpleError::new("output tensor data size mismatch"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    static DEMO_MODEL: &[u8] = include_bytes!("../../assets/classifier.onnx");
    static DEMO_QUANT_MODEL: &[u8] = include_bytes!("../../assets/classifier_quant.onnx");

    #[test]
    fn test_infer_2d_with_embedded_model() {
        let engine = OrtClassify::from_memory(DEMO_MODEL, "demo").unwrap();

        let dims = engine.primary_input_shape().unwrap();
        assert_eq!(dims.len(), 4);
        assert_eq!(&dims[1..], &[3, 32, 32]);

        let input = Tensor4D::zeros((1, 3, 32, 32));
        let output = engine.infer_2d(&input).unwrap();
        assert_eq!(output.shape(), &[1, 10]);

        // softmax head: scores are a probability distribution
        let total: f32 = output.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(output.iter().all(|&score| score >= 0.0));
    }

    #[test]
    fn test_infer_2d_batched() {
        let engine = OrtClassify::from_memory(DEMO_MODEL, "demo").unwrap();
        let input = Tensor4D::from_elem((2, 3, 32, 32), 0.5);
        let output = engine.infer_2d(&input).unwrap();
        assert_eq!(output.shape(), &[2, 10]);
        // identical rows for identical batch entries
        assert_eq!(output.row(0), output.row(1));
    }

    #[test]
    fn test_infer_2d_u8_with_quantized_head() {
        let engine = OrtClassify::from_memory(DEMO_QUANT_MODEL, "demo-quant").unwrap();
        let input = Tensor4D::zeros((1, 3, 2, 2));
        let output = engine.infer_2d_u8(&input).unwrap();
        assert_eq!(output.shape(), &[1, 4]);
        // a softmax rescaled to [0, 255] keeps most of its mass after truncation
        let total: u32 = output.iter().map(|&q| u32::from(q)).sum();
        assert!((248..=255).contains(&total));
    }

    #[test]
    fn test_from_memory_rejects_garbage() {
        let result = OrtClassify::from_memory(b"not a model", "garbage");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_rejects_missing_path() {
        let result = OrtClassify::from_file("no/such/model.onnx", "missing");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_2d_output() {
        assert!(validate_2d_output("m", 1, &[1, 10], 10).is_ok());
        // trailing dim is the class count even with interior 1s
        assert!(validate_2d_output("m", 1, &[1, 1, 10], 10).is_ok());
        assert!(validate_2d_output("m", 2, &[2, 10], 20).is_ok());
        assert!(validate_2d_output("m", 1, &[1, 10], 7).is_err());
        assert!(validate_2d_output("m", 1, &[], 0).is_err());
    }
}
