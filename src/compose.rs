use kurbo::Point;

use crate::images::LeapImage;

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied RGBA8.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// A premultiplied RGBA8 frame buffer the compositor draws each tick into.
#[derive(Clone, Debug)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Blits the sprite centered on `center`, clipped to the canvas bounds.
    pub fn draw_image(&mut self, image: &LeapImage, center: Point) {
        let left = center.x.round() as i64 - i64::from(image.width) / 2;
        let top = center.y.round() as i64 - i64::from(image.height) / 2;

        for sy in 0..i64::from(image.height) {
            let dy = top + sy;
            if dy < 0 || dy >= i64::from(self.height) {
                continue;
            }
            for sx in 0..i64::from(image.width) {
                let dx = left + sx;
                if dx < 0 || dx >= i64::from(self.width) {
                    continue;
                }
                let si = ((sy * i64::from(image.width) + sx) * 4) as usize;
                let di = ((dy * i64::from(self.width) + dx) * 4) as usize;
                let src = [
                    image.rgba8_premul[si],
                    image.rgba8_premul[si + 1],
                    image.rgba8_premul[si + 2],
                    image.rgba8_premul[si + 3],
                ];
                let dst = [
                    self.data[di],
                    self.data[di + 1],
                    self.data[di + 2],
                    self.data[di + 3],
                ];
                self.data[di..di + 4].copy_from_slice(&over(dst, src));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn sprite(width: u32, height: u32, px: PremulRgba8) -> LeapImage {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&px);
        }
        LeapImage {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        assert_eq!(over(dst, [255, 255, 255, 0]), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let src = [255, 0, 0, 255];
        assert_eq!(over([0, 0, 0, 255], src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let src = [100, 110, 120, 200];
        assert_eq!(over([0, 0, 0, 0], src), src);
    }

    #[test]
    fn draw_image_centers_the_sprite() {
        let mut canvas = Canvas::new(5, 5);
        canvas.draw_image(&sprite(1, 1, [0, 255, 0, 255]), Point::new(2.0, 2.0));
        assert_eq!(canvas.pixel(2, 2), [0, 255, 0, 255]);
        assert_eq!(canvas.pixel(1, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_image_clips_off_canvas_positions() {
        let mut canvas = Canvas::new(4, 4);
        let img = sprite(3, 3, [255, 0, 0, 255]);
        canvas.draw_image(&img, Point::new(-10.0, -10.0));
        canvas.draw_image(&img, Point::new(100.0, 100.0));
        assert!(canvas.data().iter().all(|&b| b == 0));

        // Partially on-canvas draws only the visible corner.
        canvas.draw_image(&img, Point::new(0.0, 0.0));
        assert_eq!(canvas.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(1, 1), [255, 0, 0, 255]);
        assert_eq!(canvas.pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut canvas = Canvas::new(2, 2);
        canvas.draw_image(&sprite(1, 1, [9, 9, 9, 255]), Point::new(0.0, 0.0));
        canvas.clear();
        assert!(canvas.data().iter().all(|&b| b == 0));
    }
}
