//! Image XObjects.
//!
//! Baseline JPEGs are embedded as-is with `DCTDecode`. Everything else is
//! decoded, flattened to RGB and stored with `FlateDecode`; an alpha channel
//! becomes a soft mask.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{ColorType, DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use peel_traits::BuildError;
use std::io::{Cursor, Write};
use std::path::Path;

/// An image stored in the document, ready to be drawn with `Do`.
#[derive(Debug, Clone)]
pub(crate) struct EmbeddedImage {
    pub id: ObjectId,
    pub width: u32,
    pub height: u32,
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn decode_error(path: &Path, e: impl std::fmt::Display) -> BuildError {
    BuildError::ImageDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, BuildError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn image_dict(width: u32, height: u32, color_space: &str, filter: &str) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
        "Filter" => filter,
    }
}

/// Reads `path` and adds it to `document` as an image XObject.
pub(crate) fn embed_image(
    document: &mut Document,
    path: &Path,
) -> Result<EmbeddedImage, BuildError> {
    let data = std::fs::read(path).map_err(|source| BuildError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;

    if is_jpeg(&data) {
        match jpeg_header(&data) {
            Ok((width, height, Some(color_space))) => {
                let dict = image_dict(width, height, color_space, "DCTDecode");
                let id = document.add_object(Stream::new(dict, data));
                return Ok(EmbeddedImage { id, width, height });
            }
            Ok((_, _, None)) => {
                log::debug!("JPEG {} has an unusual colour model, re-encoding", path.display());
            }
            Err(e) => return Err(decode_error(path, e)),
        }
    }

    let decoded = image::load_from_memory(&data).map_err(|e| decode_error(path, e))?;
    embed_decoded(document, &decoded)
}

/// Dimensions and PDF colour space of a JPEG, without decoding pixels.
///
/// The colour space is `None` when the stream cannot be passed through as-is.
fn jpeg_header(data: &[u8]) -> Result<(u32, u32, Option<&'static str>), image::ImageError> {
    let decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .into_decoder()?;
    let (width, height) = decoder.dimensions();
    let color_space = match decoder.color_type() {
        ColorType::L8 => Some("DeviceGray"),
        ColorType::Rgb8 => Some("DeviceRGB"),
        _ => None,
    };
    Ok((width, height, color_space))
}

fn embed_decoded(
    document: &mut Document,
    decoded: &DynamicImage,
) -> Result<EmbeddedImage, BuildError> {
    let (width, height) = (decoded.width(), decoded.height());
    let mut dict = image_dict(width, height, "DeviceRGB", "FlateDecode");

    if decoded.color().has_alpha() {
        let rgba = decoded.to_rgba8();
        let mut rgb = Vec::with_capacity((width as usize) * (height as usize) * 3);
        let mut alpha = Vec::with_capacity((width as usize) * (height as usize));
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        // Fully opaque images do not need a mask.
        if alpha.iter().any(|&a| a != u8::MAX) {
            let mask_dict = image_dict(width, height, "DeviceGray", "FlateDecode");
            let mask = Stream::new(mask_dict, deflate(&alpha)?);
            let mask_id = document.add_object(mask);
            dict.set("SMask", Object::Reference(mask_id));
        }
        let id = document.add_object(Stream::new(dict, deflate(&rgb)?));
        return Ok(EmbeddedImage { id, width, height });
    }

    let rgb = decoded.to_rgb8();
    let id = document.add_object(Stream::new(dict, deflate(rgb.as_raw())?));
    Ok(EmbeddedImage { id, width, height })
}
