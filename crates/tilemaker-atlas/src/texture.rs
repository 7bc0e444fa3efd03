//! [`DecodedImage`]: a raw 8-bit pixel buffer with an explicit channel count.

/// Pixel rectangle, `x`/`y` being the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width x height` image.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A decoded image, row-major, one byte per channel per texel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA).
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// A zero-filled image.
    pub fn new(width: u32, height: u32, channels: u8) -> Self {
        Self {
            width,
            height,
            channels,
            pixels: vec![0; width as usize * height as usize * channels as usize],
        }
    }

    /// An image with every texel set to `texel`; its length gives the channel count.
    pub fn filled(width: u32, height: u32, texel: &[u8]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            channels: texel.len() as u8,
            pixels: texel.repeat(count),
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    pub fn texel(&self, x: u32, y: u32) -> &[u8] {
        let o = self.offset(x, y);
        &self.pixels[o..o + self.channels as usize]
    }

    pub fn texel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let o = self.offset(x, y);
        let c = self.channels as usize;
        &mut self.pixels[o..o + c]
    }

    /// Iterates texels in row-major order.
    pub fn texels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.pixels.chunks_exact(self.channels as usize)
    }

    pub fn texels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.pixels.chunks_exact_mut(self.channels as usize)
    }

    /// Returns `true` for 2- and 4-channel images.
    pub fn has_alpha(&self) -> bool {
        self.channels == 2 || self.channels == 4
    }

    /// Alpha of a texel, 255 when the image has none.
    pub fn alpha_at(texel: &[u8]) -> u8 {
        match texel.len() {
            2 => texel[1],
            4 => texel[3],
            _ => 255,
        }
    }

    /// Copies a sub-rectangle into a new image.
    pub fn crop(&self, rect: Rect) -> DecodedImage {
        let mut out = DecodedImage::new(rect.width, rect.height, self.channels);
        let row_bytes = rect.width as usize * self.channels as usize;
        for y in 0..rect.height {
            let src = self.offset(rect.x, rect.y + y);
            let dst = out.offset(0, y);
            out.pixels[dst..dst + row_bytes].copy_from_slice(&self.pixels[src..src + row_bytes]);
        }
        out
    }

    /// Converts to `channels` channels.
    ///
    /// Gray expands to RGB, missing alpha becomes opaque, dropped color keeps
    /// the first channel.
    pub fn to_channels(&self, channels: u8) -> DecodedImage {
        if channels == self.channels {
            return self.clone();
        }
        let mut out = DecodedImage::new(self.width, self.height, channels);
        for (src, dst) in self.texels().zip(out.texels_mut()) {
            convert_texel(src, dst);
        }
        out
    }
}

/// Writes `src` into `dst`, converting between channel layouts.
pub fn convert_texel(src: &[u8], dst: &mut [u8]) {
    let alpha = DecodedImage::alpha_at(src);
    let (r, g, b) = match src.len() {
        1 | 2 => (src[0], src[0], src[0]),
        _ => (src[0], src[1], src[2]),
    };
    match dst.len() {
        1 => dst[0] = r,
        2 => {
            dst[0] = r;
            dst[1] = alpha;
        }
        3 => dst.copy_from_slice(&[r, g, b]),
        _ => dst.copy_from_slice(&[r, g, b, alpha]),
    }
}
