// Copyright (c) 2025, RadView contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Image intake: user-selected files become displayable RGBA buffers.
//!
//! No format validation happens here beyond what the decoder enforces;
//! a file the decoder rejects surfaces as a load failure that the render
//! engine turns into an error slate for the slot.

use anyhow::{Context, Result};
use std::io::Cursor;
use std::path::Path;

/// A decoded image ready for texture upload, with a pre-inverted copy
/// for the invert view toggle.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixels, row-major.
    pub pixels: Vec<u8>,
    /// Same pixels with each color channel inverted (alpha untouched).
    pub inverted: Vec<u8>,
    /// PNG encoding of the image, kept as the diagnosis request payload.
    pub png: Vec<u8>,
}

/// Decode an image file from disk.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode image {}", path.display()))?;
    from_dynamic(img)
}

fn from_dynamic(img: image::DynamicImage) -> Result<LoadedImage> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("Failed to encode PNG payload")?;

    let pixels = rgba.into_raw();
    let inverted = inverted_pixels(&pixels);

    Ok(LoadedImage {
        width,
        height,
        pixels,
        inverted,
        png,
    })
}

/// Invert the color channels of an RGBA8 buffer, leaving alpha intact.
///
/// Equivalent to a difference composite against white over the image
/// region, which is how the invert toggle renders a visual negative.
pub fn inverted_pixels(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [255 - px[0], 255 - px[1], 255 - px[2], px[3]])
        .collect()
}

/// Synthetic placeholder slice shown in a slot before any upload.
///
/// A soft radial gradient with a slot-dependent tint, roughly evoking a
/// chest film so the viewer is exercisable out of the box.
pub fn placeholder_slice(slot: usize) -> LoadedImage {
    const W: u32 = 512;
    const H: u32 = 512;
    let tint = 0.85 + 0.05 * (slot % 4) as f32;

    let img = image::RgbaImage::from_fn(W, H, |x, y| {
        let dx = x as f32 - W as f32 / 2.0;
        let dy = y as f32 - H as f32 / 2.0;
        let r = (dx * dx + dy * dy).sqrt() / (W as f32 / 2.0);
        let lum = (210.0 * (1.0 - r * r).max(0.0) * tint) as u8;
        image::Rgba([lum, lum, lum, 255])
    });

    // Infallible for an in-memory RGBA source.
    from_dynamic(image::DynamicImage::ImageRgba8(img))
        .unwrap_or_else(|_| LoadedImage {
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
            inverted: vec![255, 255, 255, 255],
            png: Vec::new(),
        })
}
