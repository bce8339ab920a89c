// Window + software drawing utilities.
// 1) `Drawer`: a minifb window that shows a FrameBuffer and reports pointer state.
// 2) `Canvas`: an RGBA surface with alpha-blended lines, rectangles and polygons,
//    flattened onto an opaque backdrop right before presenting.

use crate::error::Error;
use crate::types::FrameBuffer;
use glam::Vec2;
use image::{Pixel, Rgba, RgbaImage};
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window of the given size. `options` carries borderless/topmost.
    /// Visual: a new empty window appears (no title bar when borderless).
    pub fn new(title: &str, width: usize, height: usize, options: WindowOptions) -> Result<Self, Error> {
        let window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately shows the new frame.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (the loop exits when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Visual: while true after a press on the window, the window follows the pointer.
    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Mouse position in window pixels, unclamped so a fast drag that leaves
    /// the window still reports where the pointer went.
    pub fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| (x.round() as i32, y.round() as i32))
    }

    /// Window origin in desktop coordinates, as the OS reports it.
    pub fn position(&self) -> (i32, i32) {
        let (x, y) = self.window.get_position();
        (x as i32, y as i32)
    }

    /// Ask the OS to move the window. Best effort: read `position()` back.
    /// Visual: the window jumps to (x, y) on the desktop.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.window.set_position(x as isize, y as isize);
    }

    /// Native handle (HWND on Windows) for platform styling.
    pub fn raw_handle(&self) -> Result<*mut std::ffi::c_void, Error> {
        let handle = self.window.get_window_handle();
        if handle.is_null() {
            return Err(Error::WindowHandle("window has no native handle".into()));
        }
        Ok(handle)
    }
}

/// Split an `0x00RRGGBB` value into an opaque RGBA pixel.
pub fn unpack_rgb(color: u32) -> Rgba<u8> {
    Rgba([
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
        255,
    ])
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/* ---------- Software canvas ---------- */

/// RGBA drawing surface. Starts fully transparent.
pub struct Canvas {
    img: RgbaImage, // alpha 0 = nothing drawn here yet
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { img: RgbaImage::new(width as u32, height as u32) }
    }

    pub fn width(&self) -> usize {
        self.img.width() as usize
    }

    pub fn height(&self) -> usize {
        self.img.height() as usize
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.img.get_pixel(x, y)
    }

    /// Visual: wipes everything; after `flatten` only the backdrop shows.
    pub fn clear(&mut self, color: Rgba<u8>) {
        for px in self.img.pixels_mut() {
            *px = color;
        }
    }

    /// Alpha-blend `color` over the pixel at (x,y) if it is inside bounds.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.img.width() || y >= self.img.height() {
            return;
        }
        match color[3] {
            0 => {}                                            // invisible, skip
            255 => self.img.put_pixel(x, y, color),            // opaque, overwrite
            _ => self.img.get_pixel_mut(x, y).blend(&color),   // source-over
        }
    }

    /// Straight line of `width` pixels using Bresenham. Thick lines are
    /// parallel passes offset along the minor axis so no pixel is blended twice.
    /// Visual: one wireframe edge, `width` pixels thick, in `color`.
    pub fn line(&mut self, a: Vec2, b: Vec2, color: Rgba<u8>, width: u32) {
        if !(a.is_finite() && b.is_finite()) {
            return;
        }
        let (x0, y0) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
        let width = width.max(1) as i32;
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        let first = -(width / 2); // band straddles the ideal line

        for k in first..first + width {
            let (ox, oy) = if steep { (k, 0) } else { (0, k) };
            self.bresenham(x0 + ox, y0 + oy, x1 + ox, y1 + oy, color);
        }
    }

    fn bresenham(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
        let (mut x0, mut y0) = (x0, y0);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x0 += sx; }
            if e2 <= dx { err += dx; y0 += sy; }
        }
    }

    /// Outline of the axis-aligned square/rectangle with top-left `min`.
    pub fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Rgba<u8>, width: u32) {
        let max = min + size;
        self.stroke_polygon(
            &[min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
            color,
            width,
        );
    }

    pub fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba<u8>) {
        let x0 = min.x.round() as i32;
        let y0 = min.y.round() as i32;
        let x1 = (min.x + size.x).round() as i32;
        let y1 = (min.y + size.y).round() as i32;
        for y in y0.max(0)..y1.min(self.height() as i32) {
            for x in x0.max(0)..x1.min(self.width() as i32) {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Closed outline through `pts`.
    pub fn stroke_polygon(&mut self, pts: &[Vec2], color: Rgba<u8>, width: u32) {
        if pts.is_empty() {
            return;
        }
        for (i, &a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            self.line(a, b, color, width);
        }
    }

    /// Even-odd scanline fill, sampling at pixel centres.
    /// Visual: a solid (or see-through, with alpha < 255) face.
    pub fn fill_polygon(&mut self, pts: &[Vec2], color: Rgba<u8>) {
        if pts.len() < 3 {
            return;
        }
        let min_y = pts.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = pts.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        if !(min_y.is_finite() && max_y.is_finite()) {
            return;
        }
        let y_start = (min_y.floor() as i32).max(0);
        let y_end = (max_y.ceil() as i32).min(self.height() as i32 - 1);

        let mut xs: Vec<f32> = Vec::with_capacity(pts.len());
        for y in y_start..=y_end {
            let sy = y as f32 + 0.5; // pixel centre row
            xs.clear();
            for (i, &a) in pts.iter().enumerate() {
                let b = pts[(i + 1) % pts.len()];
                // Half-open rule so shared vertices are counted once.
                if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                    xs.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            xs.sort_by(|l, r| l.total_cmp(r));
            for span in xs.chunks_exact(2) {
                let x_from = ((span[0] - 0.5).ceil() as i32).max(0);
                let x_to = ((span[1] - 0.5).floor() as i32).min(self.width() as i32 - 1);
                for x in x_from..=x_to {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Composite the canvas over an opaque `backdrop` colour into a window buffer.
    /// Untouched (transparent) pixels come out as exactly `backdrop`.
    /// Visual: the finished frame, ready for `Drawer::present`.
    pub fn flatten(&self, backdrop: u32) -> FrameBuffer {
        let bg = unpack_rgb(backdrop);
        let pixels = self
            .img
            .pixels()
            .map(|src| {
                let a = src[3] as u32;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
                pack_rgb(mix(src[0], bg[0]), mix(src[1], bg[1]), mix(src[2], bg[2]))
            })
            .collect();
        FrameBuffer { width: self.width(), height: self.height(), pixels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Rgba<u8> = Rgba([0, 230, 0, 255]);

    #[test]
    fn untouched_pixels_flatten_to_backdrop() {
        let canvas = Canvas::new(4, 3);
        let fb = canvas.flatten(0x00_12_34_56);
        assert_eq!(fb.pixels, vec![0x00_12_34_56; 12]);
    }

    #[test]
    fn line_covers_both_endpoints() {
        let mut canvas = Canvas::new(20, 20);
        canvas.line(Vec2::new(2.0, 3.0), Vec2::new(15.0, 9.0), GREEN, 1);
        assert_eq!(canvas.pixel(2, 3), GREEN);
        assert_eq!(canvas.pixel(15, 9), GREEN);
        assert_eq!(canvas.pixel(2, 9)[3], 0);
    }

    #[test]
    fn thick_line_does_not_double_blend() {
        let mut canvas = Canvas::new(20, 20);
        let half = Rgba([0, 200, 0, 128]);
        canvas.line(Vec2::new(0.0, 10.0), Vec2::new(19.0, 10.0), half, 2);
        // Blended once over transparent keeps ~128; twice would reach ~191.
        for y in [9, 10] {
            let a = canvas.pixel(5, y)[3];
            assert!((126..=129).contains(&a), "alpha {a} at row {y}");
        }
        assert_eq!(canvas.pixel(5, 11)[3], 0);
    }

    #[test]
    fn translucent_pixel_mixes_with_backdrop() {
        let mut canvas = Canvas::new(1, 1);
        canvas.blend_pixel(0, 0, Rgba([200, 100, 0, 128]));
        let fb = canvas.flatten(0);
        let px = fb.pixels[0];
        let (r, g) = ((px >> 16) & 0xFF, (px >> 8) & 0xFF);
        assert!((99..=101).contains(&r), "red {r}");
        assert!((49..=51).contains(&g), "green {g}");
    }

    #[test]
    fn out_of_bounds_drawing_is_ignored() {
        let mut canvas = Canvas::new(10, 10);
        canvas.line(Vec2::new(-50.0, -50.0), Vec2::new(-5.0, 200.0), GREEN, 2);
        canvas.blend_pixel(10, 10, GREEN);
        assert!(canvas.flatten(0).pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn polygon_fill_stays_inside() {
        let mut canvas = Canvas::new(30, 30);
        let square = [
            Vec2::new(5.0, 5.0),
            Vec2::new(25.0, 5.0),
            Vec2::new(25.0, 25.0),
            Vec2::new(5.0, 25.0),
        ];
        canvas.fill_polygon(&square, GREEN);
        assert_eq!(canvas.pixel(15, 15), GREEN);
        assert_eq!(canvas.pixel(5, 5), GREEN);
        assert_eq!(canvas.pixel(24, 24), GREEN);
        assert_eq!(canvas.pixel(25, 25)[3], 0);
        assert_eq!(canvas.pixel(2, 15)[3], 0);
    }

    #[test]
    fn fill_rect_is_clamped() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_rect(Vec2::new(-4.0, -4.0), Vec2::new(6.0, 6.0), GREEN);
        assert_eq!(canvas.pixel(1, 1), GREEN);
        assert_eq!(canvas.pixel(2, 2)[3], 0);
    }
}
