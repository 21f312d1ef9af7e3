use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use longview_core::io::{probe_with_format, FileSource, RegionDecoder};
use longview_core::ViewerConfig;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,

    /// View width in pixels, to report the base and maximum scale
    #[arg(long)]
    pub view_width: Option<u32>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let source = FileSource::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let (metrics, format) = probe_with_format(&source)?;
    let config = ViewerConfig::default();

    println!("File:        {}", args.file.display());
    println!("Format:      {:?}", format);
    println!("Dimensions:  {}x{}", metrics.width, metrics.height);

    let decodable = RegionDecoder::open(&source, config.pixel_format).is_ok();
    println!(
        "Regions:     {}",
        if decodable { "supported" } else { "probe only" }
    );

    let buffer_mb = (metrics.width as u64
        * metrics.height as u64
        * config.pixel_format.bytes_per_pixel() as u64) as f64
        / (1024.0 * 1024.0);
    println!("Full decode: {:.1} MB as {}", buffer_mb, config.pixel_format);

    if let Some(view_width) = args.view_width {
        let base = view_width as f32 / metrics.width as f32;
        let max = base * config.max_scale_multiple as f32;
        println!("Base scale:  {:.4}", base);
        println!("Max scale:   {:.4}", max);
    }

    Ok(())
}
