//! The `pixf extract` command.

use clap::Args;
use pixf_core::{config::expand_path, Config, ImageExtractor, PipelineError, PixfError};
use std::path::PathBuf;

/// Arguments for the `extract` command.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// PDF file (or directory of images) to extract from
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output format: native, png or webp (defaults to config `output.default_format`)
    #[arg(allow_hyphen_values = true)]
    pub format: Option<String>,

    /// Output directory (defaults to `images_<input stem>`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of encode workers (defaults to available CPUs)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Print the extraction report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl ExtractArgs {
    /// Requested format, tolerating a leading `--` (e.g. `--webp`).
    fn format_key(&self, config: &Config) -> String {
        self.format
            .as_deref()
            .map(|f| f.trim_start_matches("--").to_string())
            .unwrap_or_else(|| config.output.default_format.clone())
    }

    fn output_dir(&self, config: &Config) -> PathBuf {
        match &self.output {
            Some(dir) => expand_path(dir),
            None => config.output_dir_for(&self.input),
        }
    }
}

/// Execute the extract command.
pub async fn execute(args: ExtractArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(workers) = args.parallel {
        if workers == 0 {
            anyhow::bail!("--parallel must be greater than 0");
        }
        config.pool.workers = workers;
    }

    let input = expand_path(&args.input);
    let format = args.format_key(&config);
    let output_dir = args.output_dir(&config);
    let extractor = ImageExtractor::new(&config);

    tracing::info!("Extracting images from {:?} as {}", input, format);
    let report = match extractor.extract(&input, &output_dir, &format).await {
        Ok(report) => report,
        Err(PixfError::Pipeline(PipelineError::UnsupportedFormat(f))) => {
            anyhow::bail!(
                "Unsupported format '{}'. Supported formats: {}",
                f,
                extractor.registry().format_names().join(", ")
            );
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        if report.decode_failures > 0 {
            tracing::warn!("{} image(s) could not be decoded", report.decode_failures);
        }
        println!(
            "Images extracted to: {} ({} unique of {})",
            report.output_dir.display(),
            report.written_count(),
            report.extracted
        );
    }
    Ok(())
}
