//! Embedded-asset classification demo.
//!
//! Everything the program needs is bundled into the binary at build time: a
//! bitmap image, a serialized ONNX model, and the label table. It runs one
//! inference pass and prints the top predicted labels.

use label_image::prelude::*;
use std::time::Instant;
use tracing::info;

static SAMPLE_IMAGE: &[u8] = include_bytes!("../assets/sample.bmp");
static MODEL: &[u8] = include_bytes!("../assets/classifier.onnx");
static LABELS: &str = include_str!("../assets/labels.txt");

const TOPK: usize = 5;
const SCORE_THRESHOLD: f32 = 0.001;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let image = decode_bmp(SAMPLE_IMAGE)?;
    let (width, height) = image.dimensions();
    info!("image read: {}x{}", width, height);

    let labels = LabelTable::parse(LABELS);
    info!("label table loaded: {} classes", labels.len());

    let classifier = ImageClassifierBuilder::new()
        .model_name("classifier")
        .topk(TOPK)
        .score_threshold(SCORE_THRESHOLD)
        .build_from_memory(MODEL, labels)?;
    info!(
        "interpreter built, input shape {}x{}",
        classifier.input_shape().0,
        classifier.input_shape().1
    );

    let start = Instant::now();
    let predictions = classifier.classify(&image)?;
    info!("inference took {} ms", start.elapsed().as_millis());

    println!("Top {}:", TOPK);
    for prediction in &predictions {
        println!("{}: {:.6}", prediction.label, prediction.score);
    }

    Ok(())
}
