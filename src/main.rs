use std::path::PathBuf;

use marquee::{VignetteConfig, run};

fn main() {
    let mut config = VignetteConfig::default();

    // Optional assets; the scene runs fine without either.
    if let Ok(dir) = std::env::var("MARQUEE_FRAMES") {
        config.frames_dir = Some(PathBuf::from(dir));
    }
    if let Ok(model) = std::env::var("MARQUEE_TEXT_STL") {
        config.text_model = Some(PathBuf::from(model));
    }

    run(config);
}
