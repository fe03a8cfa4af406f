use doc_binarize::{io, BinarizeConfig};

#[cfg(feature = "tracing")]
use doc_binarize::core::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(false, log::LevelFilter::Info);

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: binarize_page <image_path> [config.json]");
        return Ok(());
    };
    let cfg = match std::env::args().nth(2) {
        Some(cfg_path) => BinarizeConfig::load_json(cfg_path)?,
        None => BinarizeConfig::default(),
    };

    let img = io::load_image(&path)?;
    let binary = io::binarize_image(&img, &cfg)?;
    let out = std::path::Path::new(&path).with_extension("bin.png");
    io::save_png(&binary, &out)?;
    println!(
        "wrote {} ({}x{}, {:.1}% foreground)",
        out.display(),
        binary.width(),
        binary.height(),
        100.0 * binary.foreground_ratio()
    );

    Ok(())
}
