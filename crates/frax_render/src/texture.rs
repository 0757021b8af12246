//! Image decoding and texture upload.
//!
//! Still images decode to a single RGBA8 frame. Animated GIFs decode every
//! frame and stack them top to bottom into one strip, so a frame is selected
//! by sampling `(0, i * frame_height, frame_width, frame_height)`.

use std::io::Cursor;

use frax_core::FraxError;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat, RgbaImage};

/// Decoded pixels ready for upload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub rgba: Vec<u8>,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_count: u32,
}

impl DecodedImage {
    /// Pixel size of the whole strip. Saturates; oversized strips are then
    /// rejected by the texture size check.
    pub fn strip_size(&self) -> (u32, u32) {
        (
            self.frame_width,
            self.frame_height.saturating_mul(self.frame_count),
        )
    }
}

/// Bytes of one RGBA8 frame, computed in `usize` so large frames cannot wrap.
fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

pub fn decode_image(bytes: &[u8], source_id: &str) -> Result<DecodedImage, FraxError> {
    let format =
        image::guess_format(bytes).map_err(|e| FraxError::resource_load(source_id, e))?;
    if format == ImageFormat::Gif {
        return decode_gif(bytes, source_id);
    }

    let rgba = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| FraxError::resource_load(source_id, e))?
        .to_rgba8();
    let (frame_width, frame_height) = rgba.dimensions();
    Ok(DecodedImage {
        rgba: rgba.into_raw(),
        frame_width,
        frame_height,
        frame_count: 1,
    })
}

fn decode_gif(bytes: &[u8], source_id: &str) -> Result<DecodedImage, FraxError> {
    let decoder =
        GifDecoder::new(Cursor::new(bytes)).map_err(|e| FraxError::resource_load(source_id, e))?;
    let frames: Vec<RgbaImage> = decoder
        .into_frames()
        .map(|frame| frame.map(|f| f.into_buffer()))
        .collect::<Result<_, _>>()
        .map_err(|e| FraxError::resource_load(source_id, e))?;

    let Some(first) = frames.first() else {
        return Err(FraxError::resource_load(source_id, "animation has no frames"));
    };
    let (frame_width, frame_height) = first.dimensions();

    let capacity = frames.len().saturating_mul(rgba_len(frame_width, frame_height));
    let mut rgba = Vec::with_capacity(capacity);
    for frame in &frames {
        if frame.dimensions() != (frame_width, frame_height) {
            return Err(FraxError::resource_load(
                source_id,
                "animation frames differ in size",
            ));
        }
        rgba.extend_from_slice(frame.as_raw());
    }

    log::debug!(
        "Decoded '{}': {} frames of {}x{}",
        source_id,
        frames.len(),
        frame_width,
        frame_height
    );
    Ok(DecodedImage {
        rgba,
        frame_width,
        frame_height,
        frame_count: frames.len() as u32,
    })
}

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: (u32, u32),
}

impl Texture {
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Result<Self, FraxError> {
        let max = device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(FraxError::resource_load(
                label,
                format!("texture size {width}x{height} outside 1..={max}"),
            ));
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Point sampling keeps pixel art crisp when scaled.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
            size: (width, height),
        })
    }

    pub fn from_decoded(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        label: &str,
    ) -> Result<Self, FraxError> {
        let (width, height) = image.strip_size();
        Self::from_rgba8(device, queue, &image.rgba, width, height, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::codecs::png::PngEncoder;
    use image::{Delay, Frame, ImageEncoder, Rgba};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
            .expect("encode png");
        out
    }

    fn gif_bytes(width: u32, height: u32, frames: u32) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut out);
            let frames = (0..frames).map(|i| {
                let shade = (i * 60) as u8;
                Frame::from_parts(
                    RgbaImage::from_pixel(width, height, Rgba([shade, 0, 0, 255])),
                    0,
                    0,
                    Delay::from_numer_denom_ms(100, 1),
                )
            });
            encoder.encode_frames(frames).expect("encode gif");
        }
        out
    }

    #[test]
    fn png_decodes_to_a_single_frame() {
        let decoded = decode_image(&png_bytes(3, 2), "tile.png").expect("decode");
        assert_eq!(decoded.frame_count, 1);
        assert_eq!((decoded.frame_width, decoded.frame_height), (3, 2));
        assert_eq!(decoded.rgba.len(), 3 * 2 * 4);
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn gif_frames_stack_vertically() {
        let decoded = decode_image(&gif_bytes(4, 3, 3), "walk.gif").expect("decode");
        assert_eq!(decoded.frame_count, 3);
        assert_eq!((decoded.frame_width, decoded.frame_height), (4, 3));
        assert_eq!(decoded.strip_size(), (4, 9));
        assert_eq!(decoded.rgba.len(), 4 * 9 * 4);
    }

    #[test]
    fn garbage_bytes_are_a_resource_error() {
        let err = decode_image(b"definitely not an image", "junk.bin").expect_err("garbage");
        match err {
            FraxError::ResourceLoad { source_id, .. } => assert_eq!(source_id, "junk.bin"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncated_png_fails_cleanly() {
        let bytes = png_bytes(8, 8);
        let err = decode_image(&bytes[..bytes.len() / 2], "half.png").expect_err("truncated");
        assert!(err.to_string().contains("half.png"));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn large_frames_do_not_wrap_the_byte_count() {
        assert_eq!(rgba_len(70_000, 70_000), 19_600_000_000);
    }

    #[test]
    fn tall_strips_saturate_instead_of_wrapping() {
        let image = DecodedImage {
            rgba: Vec::new(),
            frame_width: 16,
            frame_height: 100_000,
            frame_count: 100_000,
        };
        assert_eq!(image.strip_size(), (16, u32::MAX));
    }
}
