use std::env;
use std::path::PathBuf;

use punctuate_rs::{ModelAsset, OnnxPunctModel, PunctuationRestorer};

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let model_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(punctuate_rs::asset::DEFAULT_ASSET_PATH));
    let cache_dir = env::temp_dir().join("punctuate-rs");

    let model = OnnxPunctModel::new(ModelAsset::File(model_path), cache_dir);
    let restorer = PunctuationRestorer::new(model);

    if !restorer.initialize() {
        eprintln!("Model failed to load; text will pass through unchanged");
    }

    let texts = [
        "hola como estas",
        "buenos dias a todos hoy vamos a hablar de la reunion de ayer que te parecio",
        "this is a test for english punctuation did it work",
    ];

    println!("=== Punctuation Results ===");
    for text in texts {
        let result = restorer.add_punctuation_chunked(text);
        println!("Input:  {}", text);
        println!("Output: {}", result);
        println!();
    }

    restorer.close();
}
