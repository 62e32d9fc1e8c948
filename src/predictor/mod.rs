//! Predictors that tie preprocessing, inference, and post-processing
//! together.

pub mod image_classifier;

pub use image_classifier::{
    Classification, ImageClassifier, ImageClassifierBuilder, ImageClassifierConfig,
};
