//! Core building blocks: error types, tensor aliases, and the ONNX Runtime
//! inference engine.

pub mod errors;
pub mod inference;

pub use errors::{ClassifyError, ProcessingStage};
pub use inference::OrtClassify;

/// 2D tensor (`[batch, classes]`) used for classification outputs.
pub type Tensor2D = ndarray::Array2<f32>;
/// 4D tensor (`[batch, channels, height, width]`) used for model inputs.
pub type Tensor4D = ndarray::Array4<f32>;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
