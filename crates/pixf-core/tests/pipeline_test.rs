//! End-to-end tests for the extraction pipeline.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pixf_core::pipeline::{BufferPool, EncodePool};
use pixf_core::{
    Config, ExtractError, ExtractedImage, Extractor, ImageExtractor, PipelineError, PixfError,
};

/// Extractor returning a fixed list of blobs.
struct StaticExtractor {
    images: Vec<ExtractedImage>,
    called: AtomicBool,
}

impl StaticExtractor {
    fn new(images: Vec<ExtractedImage>) -> Arc<Self> {
        Arc::new(Self {
            images,
            called: AtomicBool::new(false),
        })
    }
}

impl Extractor for StaticExtractor {
    fn name(&self) -> &'static str {
        "static"
    }

    fn extract_all(&self, _document: &Path) -> Result<Vec<ExtractedImage>, ExtractError> {
        self.called.store(true, Ordering::SeqCst);
        Ok(self.images.clone())
    }
}

struct FailingExtractor;

impl Extractor for FailingExtractor {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn extract_all(&self, document: &Path) -> Result<Vec<ExtractedImage>, ExtractError> {
        Err(ExtractError::NotFound(document.to_path_buf()))
    }
}

fn png(seed: u8, format: ImageFormat) -> Vec<u8> {
    let img = RgbaImage::from_fn(4, 4, |x, y| {
        Rgba([seed, x as u8 * 10, y as u8 * 10, 128 + seed % 100])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, format)
        .unwrap();
    out.into_inner()
}

fn extractor(workers: usize) -> ImageExtractor {
    ImageExtractor::new(&Config::default())
        .with_pool(EncodePool::new(workers, BufferPool::new(4, 1 << 20)))
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Five blobs where positions 2 and 4 repeat position 0.
fn five_with_repeats() -> Vec<ExtractedImage> {
    let a = png(1, ImageFormat::Png);
    vec![
        ExtractedImage::new("p0.png", a.clone()),
        ExtractedImage::new("p1.png", png(2, ImageFormat::Png)),
        ExtractedImage::new("p2.png", a.clone()),
        ExtractedImage::new("p3.png", png(3, ImageFormat::Png)),
        ExtractedImage::new("p4.png", a),
    ]
}

#[tokio::test]
async fn duplicates_are_dropped_and_survivors_numbered_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let source = StaticExtractor::new(five_with_repeats());

    let report = extractor(3)
        .extract_with(source.clone(), Path::new("doc.pdf"), &out, "png")
        .await
        .unwrap();

    assert_eq!(report.extracted, 5);
    assert_eq!(report.duplicates_skipped, 2);
    assert_eq!(report.written_count(), 3);
    assert_eq!(
        listing(&out),
        vec!["image_0001.png", "image_0002.png", "image_0003.png"]
    );

    // image_0003 is original position 3 (seed 3)
    let third = image::open(out.join("image_0003.png")).unwrap().to_rgba8();
    assert_eq!(third.get_pixel(0, 0)[0], 3);
    let second = image::open(out.join("image_0002.png")).unwrap().to_rgba8();
    assert_eq!(second.get_pixel(0, 0)[0], 2);
}

#[tokio::test]
async fn copy_through_keeps_original_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let images = five_with_repeats();
    let originals = [
        images[0].bytes.clone(),
        images[1].bytes.clone(),
        images[3].bytes.clone(),
    ];

    let report = extractor(2)
        .extract_with(
            StaticExtractor::new(images),
            Path::new("doc.pdf"),
            dir.path(),
            "native",
        )
        .await
        .unwrap();

    assert_eq!(report.mode, "native");
    for (i, original) in originals.iter().enumerate() {
        let written = std::fs::read(dir.path().join(format!("image_{:04}.png", i + 1))).unwrap();
        assert_eq!(&written, original);
    }
}

#[tokio::test]
async fn unsupported_format_fails_before_any_io() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("never-created");
    let source = StaticExtractor::new(five_with_repeats());

    let err = extractor(2)
        .extract_with(source.clone(), Path::new("doc.pdf"), &out, "tiff")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PixfError::Pipeline(PipelineError::UnsupportedFormat(ref f)) if f == "tiff"
    ));
    assert!(!source.called.load(Ordering::SeqCst));
    assert!(!out.exists());
}

#[tokio::test]
async fn corrupt_image_is_skipped_in_conversion_mode() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![
        ExtractedImage::new("a.png", png(10, ImageFormat::Png)),
        ExtractedImage::new("b.jpg", b"\xff\xd8 truncated".to_vec()),
        ExtractedImage::new("c.bmp", png(20, ImageFormat::Bmp)),
    ];

    let report = extractor(4)
        .extract_with(
            StaticExtractor::new(images),
            Path::new("doc.pdf"),
            dir.path(),
            "webp",
        )
        .await
        .unwrap();

    assert_eq!(report.decode_failures, 1);
    assert_eq!(
        listing(dir.path()),
        vec!["image_0001.webp", "image_0002.webp"]
    );
}

#[tokio::test]
async fn extraction_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = extractor(1)
        .extract_with(
            Arc::new(FailingExtractor),
            Path::new("gone.pdf"),
            dir.path(),
            "png",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PixfError::Extract(ExtractError::NotFound(_))));
}

#[tokio::test]
async fn output_is_identical_across_worker_counts() {
    let images: Vec<ExtractedImage> = (0..12)
        .map(|i| ExtractedImage::new(format!("{i}.png"), png(i * 7, ImageFormat::Png)))
        .collect();

    let mut runs: Vec<Vec<(String, Vec<u8>)>> = Vec::new();
    for workers in [1, 3, 8] {
        let dir = tempfile::tempdir().unwrap();
        extractor(workers)
            .extract_with(
                StaticExtractor::new(images.clone()),
                Path::new("doc.pdf"),
                dir.path(),
                "webp",
            )
            .await
            .unwrap();
        let files = listing(dir.path())
            .into_iter()
            .map(|name| {
                let bytes = std::fs::read(dir.path().join(&name)).unwrap();
                (name, bytes)
            })
            .collect();
        runs.push(files);
    }
    assert_eq!(runs[0].len(), 12);
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);
}

#[tokio::test]
async fn directory_input_end_to_end() {
    let input = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("01.png"), png(5, ImageFormat::Png)).unwrap();
    std::fs::write(input.path().join("02.PNG"), png(5, ImageFormat::Png)).unwrap();
    std::fs::write(input.path().join("03.gif"), png(6, ImageFormat::Gif)).unwrap();
    std::fs::write(input.path().join("readme.txt"), b"ignored").unwrap();

    let out_root = tempfile::tempdir().unwrap();
    let out: PathBuf = out_root.path().join("images");
    let report = extractor(2)
        .extract(input.path(), &out, "native")
        .await
        .unwrap();

    assert_eq!(report.extracted, 3);
    assert_eq!(report.duplicates_skipped, 1);
    assert_eq!(listing(&out), vec!["image_0001.png", "image_0002.gif"]);
}

#[tokio::test]
async fn missing_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = extractor(1)
        .extract(Path::new("/no/such/file.pdf"), dir.path(), "png")
        .await
        .unwrap_err();
    assert!(matches!(err, PixfError::Extract(ExtractError::NotFound(_))));
}
