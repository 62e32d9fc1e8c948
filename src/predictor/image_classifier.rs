//! Image classifier predictor.
//!
//! Composes the full pipeline: resize to the model's input shape, normalize
//! into an NCHW tensor, run one forward pass through ONNX Runtime, and
//! select the top-N labels from the output scores.

use crate::core::{ClassifyError, OrtClassify, Tensor2D};
use crate::domain::LabelTable;
use crate::processors::{NormalizeImage, QuantParams, ScoredClass, TopN};
use image::RgbImage;
use image::imageops::FilterType;
use tracing::debug;

/// A single labeled prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Index of the class in the model's output ordering.
    pub class_id: usize,
    /// Confidence score.
    pub score: f32,
    /// Human-readable label for the class.
    pub label: String,
}

/// Configuration for the image classifier.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImageClassifierConfig {
    /// Name used for the model in logs and errors.
    pub model_name: Option<String>,
    /// Number of top predictions to return.
    pub topk: usize,
    /// Minimum score a prediction must exceed to be reported.
    pub score_threshold: f32,
    /// Input shape for the model (width, height). When absent, the shape is
    /// read from the model's own metadata.
    pub input_shape: Option<(u32, u32)>,
    /// Quantization parameters of the output tensor, for models with a
    /// quantized classification head.
    pub output_quant: Option<(f32, i32)>,
}

impl Default for ImageClassifierConfig {
    fn default() -> Self {
        Self {
            model_name: None,
            topk: 5,
            score_threshold: 0.001,
            input_shape: None,
            output_quant: None,
        }
    }
}

impl ImageClassifierConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero or out-of-range field.
    pub fn validate(&self) -> Result<(), ClassifyError> {
        if let Some((width, height)) = self.input_shape {
            if width == 0 || height == 0 {
                return Err(ClassifyError::validation_error(
                    "image_classifier",
                    "input_shape",
                    "non-zero dimensions",
                    &format!("{}x{}", width, height),
                ));
            }
        }
        if !self.score_threshold.is_finite() {
            return Err(ClassifyError::validation_error(
                "image_classifier",
                "score_threshold",
                "a finite value",
                &self.score_threshold.to_string(),
            ));
        }
        if let Some((scale, _)) = self.output_quant {
            if scale <= 0.0 {
                return Err(ClassifyError::validation_error(
                    "image_classifier",
                    "output_quant",
                    "scale > 0",
                    &scale.to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Image classifier backed by an ONNX Runtime session.
#[derive(Debug)]
pub struct ImageClassifier {
    input_shape: (u32, u32),
    normalize: NormalizeImage,
    infer: OrtClassify,
    post_op: TopN,
    output_quant: Option<QuantParams>,
    labels: LabelTable,
}

impl ImageClassifier {
    /// Creates a classifier from a built inference engine.
    ///
    /// The input shape comes from the config when set, otherwise from the
    /// model's metadata (`[N, C, H, W]`).
    pub fn new(
        config: ImageClassifierConfig,
        infer: OrtClassify,
        labels: LabelTable,
    ) -> Result<Self, ClassifyError> {
        config.validate()?;

        let input_shape = match config.input_shape {
            Some(shape) => shape,
            None => {
                let dims = infer.primary_input_shape().ok_or_else(|| {
                    ClassifyError::config_error(format!(
                        "model '{}' does not expose a tensor input shape and none was configured",
                        infer.model_name()
                    ))
                })?;
                if dims.len() != 4 || dims[2] <= 0 || dims[3] <= 0 {
                    return Err(ClassifyError::config_error(format!(
                        "model '{}' input shape {:?} is not a static [N, C, H, W]; configure input_shape explicitly",
                        infer.model_name(),
                        dims
                    )));
                }
                (dims[3] as u32, dims[2] as u32)
            }
        };

        Ok(Self {
            input_shape,
            normalize: NormalizeImage::unit_scale()?,
            infer,
            post_op: TopN::new(config.topk, config.score_threshold),
            output_quant: config
                .output_quant
                .map(|(scale, zero_point)| QuantParams::new(scale, zero_point)),
            labels,
        })
    }

    /// Returns the (width, height) the classifier resizes inputs to.
    pub fn input_shape(&self) -> (u32, u32) {
        self.input_shape
    }

    /// Classifies a single image, returning the top predictions in
    /// descending score order.
    pub fn classify(&self, image: &RgbImage) -> Result<Vec<Classification>, ClassifyError> {
        let mut results = self.classify_batch(std::slice::from_ref(image))?;
        results.pop().ok_or_else(|| {
            ClassifyError::invalid_input("classifier produced no result for a one-image batch")
        })
    }

    /// Classifies a batch of images.
    pub fn classify_batch(
        &self,
        images: &[RgbImage],
    ) -> Result<Vec<Vec<Classification>>, ClassifyError> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let (width, height) = self.input_shape;
        let resized: Vec<RgbImage> = images
            .iter()
            .map(|img| {
                if img.dimensions() == (width, height) {
                    img.clone()
                } else {
                    image::imageops::resize(img, width, height, FilterType::Lanczos3)
                }
            })
            .collect();

        let input = self.normalize.normalize_batch_to(&resized)?;
        debug!(
            model = self.infer.model_name(),
            shape = ?input.shape(),
            "input tensor ready"
        );

        let selected: Vec<Vec<ScoredClass>> = match self.output_quant {
            Some(quant) => {
                let output = self.infer.infer_2d_u8(&input)?;
                output
                    .outer_iter()
                    .map(|row| self.post_op.select_quantized(&row.to_vec(), &quant))
                    .collect()
            }
            None => {
                let output: Tensor2D = self.infer.infer_2d(&input)?;
                output
                    .outer_iter()
                    .map(|row| self.post_op.select(&row.to_vec()))
                    .collect()
            }
        };

        Ok(selected
            .into_iter()
            .map(|pairs| {
                pairs
                    .into_iter()
                    .map(|p| Classification {
                        class_id: p.class_id,
                        score: p.score,
                        label: self.labels.name_or_unknown(p.class_id),
                    })
                    .collect()
            })
            .collect())
    }
}

/// Builder for the image classifier.
pub struct ImageClassifierBuilder {
    config: ImageClassifierConfig,
}

impl ImageClassifierBuilder {
    /// Creates a builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: ImageClassifierConfig::default(),
        }
    }

    /// Sets the name used for the model in logs and errors.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.config.model_name = Some(model_name.into());
        self
    }

    /// Sets the number of top predictions to return.
    pub fn topk(mut self, topk: usize) -> Self {
        self.config.topk = topk;
        self
    }

    /// Sets the minimum score a prediction must exceed to be reported.
    pub fn score_threshold(mut self, threshold: f32) -> Self {
        self.config.score_threshold = threshold;
        self
    }

    /// Sets the input shape (width, height), overriding model metadata.
    pub fn input_shape(mut self, input_shape: (u32, u32)) -> Self {
        self.config.input_shape = Some(input_shape);
        self
    }

    /// Declares the output tensor as quantized with the given scale and zero
    /// point.
    pub fn output_quant(mut self, scale: f32, zero_point: i32) -> Self {
        self.config.output_quant = Some((scale, zero_point));
        self
    }

    /// Builds a classifier from model bytes embedded in the binary.
    pub fn build_from_memory(
        self,
        model_bytes: &[u8],
        labels: LabelTable,
    ) -> Result<ImageClassifier, ClassifyError> {
        let model_name = self
            .config
            .model_name
            .clone()
            .unwrap_or_else(|| "embedded".to_string());
        let infer = OrtClassify::from_memory(model_bytes, &model_name)?;
        ImageClassifier::new(self.config, infer, labels)
    }

    /// Builds a classifier from a model file on disk.
    pub fn build(
        self,
        model_path: impl AsRef<std::path::Path>,
        labels: LabelTable,
    ) -> Result<ImageClassifier, ClassifyError> {
        let path = model_path.as_ref();
        let model_name = self.config.model_name.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown_model")
                .to_string()
        });
        let infer = OrtClassify::from_file(path, &model_name)?;
        ImageClassifier::new(self.config, infer, labels)
    }
}

impl Default for ImageClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
