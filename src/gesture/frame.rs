//! Frame buffers and mask extraction
//!
//! Camera frames arrive as packed RGB8. Skin segmentation runs in HSV using
//! the OpenCV value convention (H in 0..=179, S and V in 0..=255) so the
//! tuned thresholds carry over unchanged.

use serde::{Deserialize, Serialize};

/// A packed RGB8 camera frame, row-major
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 3) as usize],
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * self.width + x) * 3) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = ((y * self.width + x) * 3) as usize;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Horizontal flip in place, so on-screen motion matches hand motion
    pub fn mirror(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width / 2 {
                let a = self.pixel(x, y);
                let b = self.pixel(self.width - 1 - x, y);
                self.set_pixel(x, y, b);
                self.set_pixel(self.width - 1 - x, y, a);
            }
        }
    }
}

/// Single-channel binary mask, 0 or 255 per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height) as usize],
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            0
        } else {
            self.data[(y as u32 * self.width + x as u32) as usize]
        }
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, v: u8) {
        self.data[(y * self.width + x) as usize] = v;
    }
}

/// Inclusive HSV range for skin segmentation, OpenCV scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SkinRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl Default for SkinRange {
    fn default() -> Self {
        Self {
            lower: [0, 20, 70],
            upper: [20, 255, 255],
        }
    }
}

impl SkinRange {
    fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }
}

/// RGB8 to HSV in the OpenCV convention: H halved into 0..=179
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };

    [(h / 2.0) as u8, (s * 255.0) as u8, (max * 255.0) as u8]
}

/// Threshold a frame into a binary skin mask
pub fn skin_mask(frame: &Frame, range: &SkinRange) -> Mask {
    let mut mask = Mask::new(frame.width, frame.height);
    for y in 0..frame.height {
        for x in 0..frame.width {
            if range.contains(rgb_to_hsv(frame.pixel(x, y))) {
                mask.set(x, y, 255);
            }
        }
    }
    mask
}

/// 5x5 Gaussian smoothing followed by re-thresholding back to binary
pub fn blur(mask: &Mask) -> Mask {
    // Separable [1, 4, 6, 4, 1] kernel, normalized by 256
    const K: [u32; 5] = [1, 4, 6, 4, 1];
    let mut out = Mask::new(mask.width, mask.height);
    for y in 0..mask.height as i32 {
        for x in 0..mask.width as i32 {
            let mut acc = 0u32;
            for (j, kj) in K.iter().enumerate() {
                for (i, ki) in K.iter().enumerate() {
                    let v = mask.get(x + i as i32 - 2, y + j as i32 - 2) as u32;
                    acc += v * ki * kj;
                }
            }
            if acc / 256 > 127 {
                out.set(x as u32, y as u32, 255);
            }
        }
    }
    out
}

fn morph(mask: &Mask, erode: bool) -> Mask {
    let mut out = Mask::new(mask.width, mask.height);
    for y in 0..mask.height as i32 {
        for x in 0..mask.width as i32 {
            let mut hit = erode;
            'kernel: for dy in -1..=1 {
                for dx in -1..=1 {
                    let on = mask.get(x + dx, y + dy) != 0;
                    if erode && !on {
                        hit = false;
                        break 'kernel;
                    }
                    if !erode && on {
                        hit = true;
                        break 'kernel;
                    }
                }
            }
            if hit {
                out.set(x as u32, y as u32, 255);
            }
        }
    }
    out
}

/// 3x3 erosion, `iterations` passes
pub fn erode(mask: &Mask, iterations: u32) -> Mask {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = morph(&out, true);
    }
    out
}

/// 3x3 dilation, `iterations` passes
pub fn dilate(mask: &Mask, iterations: u32) -> Mask {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = morph(&out, false);
    }
    out
}

/// Full segmentation chain: threshold, smooth, then open up the mask to drop
/// speckle noise
pub fn segment(frame: &Frame, range: &SkinRange) -> Mask {
    let mask = skin_mask(frame, range);
    let mask = blur(&mask);
    let mask = erode(&mask, 2);
    dilate(&mask, 2)
}
