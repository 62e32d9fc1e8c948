//! Domain types for classification results and label handling.

pub mod labels;

pub use labels::LabelTable;
