//! Per-frame GPU allocations that are released on every exit path.

/// A texture destroyed on drop unless [`ScopedTexture::release`]d to the caller.
pub(crate) struct ScopedTexture {
    texture: wgpu::Texture,
    armed: bool,
}

impl ScopedTexture {
    pub(crate) fn new(texture: wgpu::Texture) -> Self {
        Self {
            texture,
            armed: true,
        }
    }

    pub(crate) fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Hand ownership to the caller; the texture is no longer destroyed on drop.
    pub(crate) fn release(mut self) -> wgpu::Texture {
        self.armed = false;
        self.texture.clone()
    }
}

impl Drop for ScopedTexture {
    fn drop(&mut self) {
        if self.armed {
            self.texture.destroy();
        }
    }
}

/// A buffer destroyed on drop.
pub(crate) struct ScopedBuffer(wgpu::Buffer);

impl ScopedBuffer {
    pub(crate) fn new(buffer: wgpu::Buffer) -> Self {
        Self(buffer)
    }
}

impl std::ops::Deref for ScopedBuffer {
    type Target = wgpu::Buffer;

    fn deref(&self) -> &wgpu::Buffer {
        &self.0
    }
}

impl Drop for ScopedBuffer {
    fn drop(&mut self) {
        self.0.destroy();
    }
}
