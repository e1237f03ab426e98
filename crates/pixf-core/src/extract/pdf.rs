//! Image XObject extraction from PDF files.

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use crate::error::ExtractError;
use crate::types::ExtractedImage;

use super::Extractor;

/// Walks every image XObject stream of a PDF in object-id order.
///
/// Encrypted documents are unlocked with the empty user password first.
/// JPEG and JPEG 2000 streams are returned verbatim. Uncompressed or
/// Flate-compressed 8-bit gray/RGB samples are wrapped into a PNG, with an
/// 8-bit soft mask merged in as alpha. Streams that only serve as another
/// image's `/SMask` or `/Mask` are not returned on their own. Other encodings
/// (CCITT, JBIG2, CMYK, indexed, 1-bit masks) are skipped.
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extract_all(&self, document: &Path) -> Result<Vec<ExtractedImage>, ExtractError> {
        let mut doc = Document::load(document).map_err(|source| ExtractError::Pdf {
            path: document.to_path_buf(),
            source,
        })?;
        if doc.is_encrypted() {
            doc.decrypt("").map_err(|source| ExtractError::Locked {
                path: document.to_path_buf(),
                source,
            })?;
            tracing::info!("Unlocked encrypted PDF {:?}", document);
        }

        let masks = mask_ids(&doc);
        let mut images = Vec::new();
        for (id, object) in doc.objects.iter() {
            let Object::Stream(stream) = object else {
                continue;
            };
            if !is_image_xobject(&stream.dict) || masks.contains(id) {
                continue;
            }
            match image_from_stream(&doc, *id, stream) {
                Some(image) => images.push(image),
                None => tracing::debug!("Skipping unsupported image stream {:?}", id),
            }
        }
        tracing::debug!(
            "Found {} image stream(s) in {:?} ({} mask stream(s) skipped)",
            images.len(),
            document,
            masks.len()
        );
        Ok(images)
    }
}

fn is_image_xobject(dict: &Dictionary) -> bool {
    dict.get(b"Subtype")
        .and_then(Object::as_name)
        .map(|name| name == b"Image")
        .unwrap_or(false)
}

/// Ids of the streams referenced as `/SMask` or `/Mask` by an image.
///
/// A color-key `/Mask` is an inline array, not a reference, and is ignored.
fn mask_ids(doc: &Document) -> HashSet<ObjectId> {
    doc.objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .filter(|stream| is_image_xobject(&stream.dict))
        .flat_map(|stream| {
            [b"SMask".as_slice(), b"Mask".as_slice()]
                .into_iter()
                .filter_map(move |key| {
                    stream.dict.get(key).and_then(Object::as_reference).ok()
                })
        })
        .collect()
}

/// Filter names applied to a stream, outermost first.
fn filters(dict: &Dictionary) -> Vec<Vec<u8>> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_name().ok().map(|n| n.to_vec()))
            .collect(),
        _ => Vec::new(),
    }
}

/// The decoded sample bytes of a non-DCT, non-JPX stream.
fn samples(stream: &Stream) -> Option<Vec<u8>> {
    if filters(&stream.dict).is_empty() {
        Some(stream.content.clone())
    } else {
        stream.decompressed_content().ok()
    }
}

fn image_from_stream(doc: &Document, id: ObjectId, stream: &Stream) -> Option<ExtractedImage> {
    let name = |ext: &str| format!("img_{}_{}.{}", id.0, id.1, ext);

    match filters(&stream.dict).as_slice() {
        [only] if only.as_slice() == b"DCTDecode" => {
            Some(ExtractedImage::new(name("jpg"), stream.content.clone()))
        }
        [only] if only.as_slice() == b"JPXDecode" => {
            Some(ExtractedImage::new(name("jp2"), stream.content.clone()))
        }
        _ => {
            let png = samples_to_png(doc, &stream.dict, samples(stream)?)?;
            Some(ExtractedImage::new(name("png"), png))
        }
    }
}

/// Width, height and bits per component of an image dictionary.
fn geometry(dict: &Dictionary) -> Option<(u32, u32, i64)> {
    let width = u32::try_from(dict.get(b"Width").and_then(Object::as_i64).ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").and_then(Object::as_i64).ok()?).ok()?;
    let bits = dict
        .get(b"BitsPerComponent")
        .and_then(Object::as_i64)
        .ok()?;
    Some((width, height, bits))
}

/// Wrap raw 8-bit gray or RGB samples into a PNG, adding the soft mask as
/// an alpha channel when there is a usable one.
fn samples_to_png(doc: &Document, dict: &Dictionary, samples: Vec<u8>) -> Option<Vec<u8>> {
    let (width, height, bits) = geometry(dict)?;
    if bits != 8 {
        return None;
    }

    let image = match color_components(doc, dict)? {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, samples)?),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, samples)?),
        _ => return None,
    };
    let image = match soft_mask(doc, dict, width, height) {
        Some(alpha) => DynamicImage::ImageRgba8(with_alpha(image.to_rgba8(), &alpha)),
        None => image,
    };
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).ok()?;
    Some(out.into_inner())
}

/// Alpha samples of an 8-bit gray `/SMask` with the parent's dimensions.
fn soft_mask(doc: &Document, dict: &Dictionary, width: u32, height: u32) -> Option<Vec<u8>> {
    let id = dict.get(b"SMask").and_then(Object::as_reference).ok()?;
    let mask = doc.get_object(id).and_then(Object::as_stream).ok()?;
    if geometry(&mask.dict)? != (width, height, 8) {
        tracing::debug!("Ignoring soft mask {:?} with mismatched geometry", id);
        return None;
    }
    let alpha = samples(mask)?;
    (alpha.len() == width as usize * height as usize).then_some(alpha)
}

fn with_alpha(mut rgba: RgbaImage, alpha: &[u8]) -> RgbaImage {
    for (pixel, &a) in rgba.pixels_mut().zip(alpha) {
        pixel.0[3] = a;
    }
    rgba
}

/// Number of color components for DeviceGray, DeviceRGB, or an ICC profile
/// with 1 or 3 components.
fn color_components(doc: &Document, dict: &Dictionary) -> Option<u8> {
    let color_space = match dict.get(b"ColorSpace").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    match color_space {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" => Some(1),
            b"DeviceRGB" => Some(3),
            _ => None,
        },
        Object::Array(items) if items.first()?.as_name().ok()? == b"ICCBased" => {
            let profile = doc.get_object(items.get(1)?.as_reference().ok()?).ok()?;
            match profile.as_stream().ok()?.dict.get(b"N").and_then(Object::as_i64).ok()? {
                1 => Some(1),
                3 => Some(3),
                _ => None,
            }
        }
        _ => None,
    }
}
