//! GPU textures with streaming pixel updates.
//!
//! Unlike static image textures, the marquee's surface texture changes
//! every few frames, so [`Texture`] is allocated copy-writable and exposes
//! [`write_rgba`](Texture::write_rgba) for whole-frame uploads.

use crate::gpu::GpuContext;

/// A 2D RGBA texture that can be sampled by shaders and rewritten from the
/// CPU at any time.
#[derive(Debug)]
pub struct Texture {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Allocates an empty streaming texture.
    ///
    /// Linear filtering with clamp-to-edge addressing: the marquee surfaces
    /// map the full [0, 1] UV range, so the texture never tiles.
    pub fn new_streaming(gpu: &GpuContext, width: u32, height: u32, label: &str) -> Self {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// Creates a texture pre-filled with RGBA data.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        let texture = Self::new_streaming(gpu, width, height, label);
        texture.write_rgba(gpu, data);
        texture
    }

    /// Replaces the full texture contents with a new RGBA frame.
    ///
    /// `data` must hold exactly `width × height × 4` bytes.
    pub fn write_rgba(&self, gpu: &GpuContext, data: &[u8]) {
        debug_assert_eq!(data.len(), (self.width * self.height * 4) as usize);
        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }
}
