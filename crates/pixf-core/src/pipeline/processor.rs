//! Pipeline orchestration: extract → hash → dedupe → copy or convert → persist.

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ExtractError, PipelineError, Result};
use crate::extract::{extractor_for, Extractor};
use crate::types::{ExtractedImage, ExtractionReport, RawImage};

use super::decode::ImageDecoder;
use super::dedup::Deduplicator;
use super::encode::{EncoderRegistry, OutputMode};
use super::persist::{native_extension, Persister};
use super::pool::{EncodePool, EncodeTask};

/// The main entry point: turns a document into a directory of unique images.
pub struct ImageExtractor {
    registry: EncoderRegistry,
    decoder: Arc<ImageDecoder>,
    pool: EncodePool,
}

impl ImageExtractor {
    /// Create an extractor with the default encoder registry.
    pub fn new(config: &Config) -> Self {
        Self::with_registry(config, EncoderRegistry::default())
    }

    pub fn with_registry(config: &Config, registry: EncoderRegistry) -> Self {
        Self {
            registry,
            decoder: Arc::new(ImageDecoder::new(config.limits.clone())),
            pool: EncodePool::from_config(&config.pool),
        }
    }

    /// Replace the encode pool (e.g. to pin the worker count).
    pub fn with_pool(mut self, pool: EncodePool) -> Self {
        self.pool = pool;
        self
    }

    pub fn registry(&self) -> &EncoderRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &EncodePool {
        &self.pool
    }

    /// Extract the images of `document` into `output_dir` as `format`.
    ///
    /// The format is resolved before the document is touched, so an unknown
    /// format fails without any I/O.
    pub async fn extract(
        &self,
        document: &Path,
        output_dir: &Path,
        format: &str,
    ) -> Result<ExtractionReport> {
        let mode = self.registry.resolve(format)?;
        let extractor = extractor_for(document)?;
        self.run(extractor, document, output_dir, mode).await
    }

    /// Like [`extract`](Self::extract) with a caller-supplied extractor.
    pub async fn extract_with(
        &self,
        extractor: Arc<dyn Extractor>,
        document: &Path,
        output_dir: &Path,
        format: &str,
    ) -> Result<ExtractionReport> {
        let mode = self.registry.resolve(format)?;
        self.run(extractor, document, output_dir, mode).await
    }

    async fn run(
        &self,
        extractor: Arc<dyn Extractor>,
        document: &Path,
        output_dir: &Path,
        mode: OutputMode,
    ) -> Result<ExtractionReport> {
        let start = std::time::Instant::now();
        tracing::debug!("Extracting images from {:?}", document);

        let doc = document.to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || extractor.extract_all(&doc))
            .await
            .map_err(|e| ExtractError::Task {
                path: document.to_path_buf(),
                message: e.to_string(),
            })??;
        tracing::debug!(
            "Extractor returned {} image(s) in {:?}",
            extracted.len(),
            start.elapsed()
        );

        let report = self.process(extracted, output_dir, mode).await?;
        tracing::debug!("Extraction finished in {:?}", start.elapsed());
        Ok(report)
    }

    /// Dedupe and materialize already-extracted blobs.
    pub async fn process(
        &self,
        extracted: Vec<ExtractedImage>,
        output_dir: &Path,
        mode: OutputMode,
    ) -> Result<ExtractionReport> {
        let persister = Persister::create(output_dir)?;
        let total = extracted.len();

        let raw: Vec<RawImage> = extracted.into_iter().map(RawImage::load).collect();
        let deduped = Deduplicator::dedupe(raw);

        let mut report = ExtractionReport {
            output_dir: output_dir.to_path_buf(),
            mode: mode.name().to_string(),
            extracted: total,
            duplicates_skipped: deduped.skipped,
            decode_failures: 0,
            written: Vec::new(),
        };
        if deduped.unique.is_empty() {
            tracing::info!("No images found");
            return Ok(report);
        }

        match mode {
            OutputMode::CopyThrough => {
                report.written = copy_through(deduped.unique, persister).await?;
            }
            OutputMode::Convert(encoder) => {
                let (tasks, failures) = self.decode_all(deduped.unique).await?;
                report.decode_failures = failures;
                report.written = self.pool.run(tasks, encoder, &persister).await?;
            }
        }

        tracing::info!(
            "Wrote {} image(s) to {}",
            report.written_count(),
            output_dir.display()
        );
        Ok(report)
    }

    /// Decode unique images in order, skipping failures, and assign output
    /// indices to the survivors.
    async fn decode_all(&self, unique: Vec<RawImage>) -> Result<(Vec<EncodeTask>, usize)> {
        let decoder = Arc::clone(&self.decoder);
        let decoded = tokio::task::spawn_blocking(move || {
            let mut tasks = Vec::with_capacity(unique.len());
            let mut failures = 0;
            for raw in &unique {
                match decoder.decode(raw) {
                    Ok(image) => tasks.push(EncodeTask {
                        index: tasks.len(),
                        image,
                    }),
                    Err(e) => {
                        failures += 1;
                        tracing::warn!("Skipping image: {}", e);
                    }
                }
            }
            (tasks, failures)
        })
        .await
        .map_err(|e| PipelineError::Worker(format!("decode stage: {}", e)))?;
        Ok(decoded)
    }
}

/// Write each unique blob verbatim, keeping its extension.
async fn copy_through(
    unique: Vec<RawImage>,
    persister: Persister,
) -> Result<Vec<std::path::PathBuf>> {
    let written = tokio::task::spawn_blocking(move || {
        unique
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                persister.write(index, &native_extension(raw.source_name()), raw.bytes())
            })
            .collect::<std::result::Result<Vec<_>, PipelineError>>()
    })
    .await
    .map_err(|e| PipelineError::Worker(format!("copy stage: {}", e)))??;
    Ok(written)
}
