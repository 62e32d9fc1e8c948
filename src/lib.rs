//! # label-image
//!
//! A small image-classification harness built on ONNX Runtime. It decodes a
//! bitmap, normalizes the pixels into an input tensor, runs one inference
//! pass through an ONNX model, and selects the top-N predicted labels from
//! the output scores.
//!
//! The heavy lifting (graph execution, operator kernels, quantization math)
//! lives entirely inside ONNX Runtime; this crate only wires images and
//! label tables to it.
//!
//! ## Components
//!
//! * [`core`] - Error types, tensor aliases, and the `ort` inference engine
//! * [`domain`] - The class [`domain::LabelTable`]
//! * [`processors`] - Bitmap decoding, normalization, quantization
//!   parameters, and top-N selection
//! * [`predictor`] - The [`predictor::ImageClassifier`] composing the
//!   pipeline
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use label_image::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let labels = LabelTable::parse("cat\ndog\nbird\n");
//! let classifier = ImageClassifierBuilder::new()
//!     .topk(5)
//!     .score_threshold(0.001)
//!     .build("models/classifier.onnx", labels)?;
//!
//! let image = decode_image(&std::fs::read("photo.bmp")?)?;
//! for prediction in classifier.classify(&image)? {
//!     println!("{}: {:.6}", prediction.label, prediction.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod predictor;
pub mod processors;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use label_image::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{ClassifyError, OrtClassify, init_tracing};
    pub use crate::domain::LabelTable;
    pub use crate::predictor::{Classification, ImageClassifier, ImageClassifierBuilder};
    pub use crate::processors::{QuantParams, ScoredClass, TopN, decode_bmp, decode_image};
}
