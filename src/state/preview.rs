//! Displayable image handles backed by egui textures.
//!
//! A [`PreviewHandle`] owns one uploaded texture. The texture is freed when the
//! handle is dropped, so replacing a handle (or the struct holding it) is all it
//! takes to release the previous image.

use eframe::egui::{self, ColorImage, TextureHandle, TextureId, TextureOptions};

/// Owned texture for a decoded image.
pub struct PreviewHandle {
    texture: TextureHandle,
    label: &'static str,
}

impl PreviewHandle {
    /// Upload a decoded image as a new texture.
    pub fn upload(ctx: &egui::Context, label: &'static str, image: ColorImage) -> Self {
        log::debug!(
            "Uploading {} texture: {}x{}",
            label,
            image.width(),
            image.height()
        );

        let texture = ctx.load_texture(
            label,
            image,
            TextureOptions {
                magnification: egui::TextureFilter::Linear,
                minification: egui::TextureFilter::Linear,
                ..Default::default()
            },
        );

        Self { texture, label }
    }

    pub fn id(&self) -> TextureId {
        self.texture.id()
    }

    /// Pixel dimensions as `[width, height]`.
    pub fn dimensions(&self) -> [usize; 2] {
        self.texture.size()
    }

    pub fn size_vec2(&self) -> egui::Vec2 {
        self.texture.size_vec2()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        log::debug!("Releasing {} texture {:?}", self.label, self.texture.id());
    }
}

/// Largest texture side the renderer accepts.
pub fn max_texture_side(ctx: &egui::Context) -> usize {
    ctx.input(|i| i.max_texture_side)
}

/// Decode encoded image bytes (PNG, JPEG, ...) into an egui image.
///
/// Images with a side longer than `max_side` are downscaled, keeping the
/// aspect ratio, so the result can always be uploaded.
pub fn decode_color_image(bytes: &[u8], max_side: usize) -> Result<ColorImage, image::ImageError> {
    let mut img = image::load_from_memory(bytes)?;

    let limit = u32::try_from(max_side).unwrap_or(u32::MAX).max(1);
    if img.width() > limit || img.height() > limit {
        log::debug!(
            "Downscaling {}x{} image to fit texture limit {}",
            img.width(),
            img.height(),
            limit
        );
        img = img.thumbnail(limit, limit);
    }

    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Encode a solid-colour image in the given format.
    pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([90, 120, 160, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .write_to(&mut out, format)
            .expect("test image encodes");
        out.into_inner()
    }

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        encoded_image(width, height, ImageFormat::Png)
    }

    pub fn allocated_textures(ctx: &eframe::egui::Context) -> usize {
        ctx.tex_manager().read().num_allocated()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{allocated_textures, png};
    use super::*;

    #[test]
    fn test_decode_png() {
        let image = decode_color_image(&png(4, 3), 2048).unwrap();
        assert_eq!(image.size, [4, 3]);
    }

    #[test]
    fn test_decode_downscales_to_limit() {
        let image = decode_color_image(&png(64, 16), 32).unwrap();
        assert_eq!(image.size, [32, 8]);
    }

    #[test]
    fn test_oversized_image_uploads() {
        let ctx = egui::Context::default();
        let limit = max_texture_side(&ctx);
        let bytes = png(limit as u32 + 1, 2);

        let handle = PreviewHandle::upload(
            &ctx,
            "test_preview",
            decode_color_image(&bytes, limit).unwrap(),
        );
        let [width, height] = handle.dimensions();
        assert!(width <= limit);
        assert!(height >= 1);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_color_image(b"definitely not an image", 2048).is_err());
    }

    #[test]
    fn test_drop_releases_texture() {
        let ctx = egui::Context::default();
        let before = allocated_textures(&ctx);

        let handle = PreviewHandle::upload(
            &ctx,
            "test_preview",
            decode_color_image(&png(8, 4), max_texture_side(&ctx)).unwrap(),
        );
        assert_eq!(allocated_textures(&ctx), before + 1);
        assert_eq!(handle.dimensions(), [8, 4]);

        drop(handle);
        assert_eq!(allocated_textures(&ctx), before);
    }
}
