//! Data transformation stages: bitmap decoding, normalization, and score
//! post-processing.

pub mod bitmap;
pub mod normalization;
pub mod quantize;
pub mod topk;

pub use bitmap::{decode_bmp, decode_image};
pub use normalization::NormalizeImage;
pub use quantize::QuantParams;
pub use topk::{ScoredClass, TopN};
