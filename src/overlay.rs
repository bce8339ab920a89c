// Full-screen, topmost, click-through overlay. Every frame it asks the OS where
// the front window is, builds nested squares interpolated between the screen
// centre (front anchor) and the front window's centre (back anchor), removes
// whatever would land inside the front window, and presents the rest over the
// colour key so only the lines are visible on the desktop.

use crate::clip::outside_pieces;
use crate::desktop::{Desktop, NativeDesktop, make_click_through};
use crate::draw::{Canvas, Drawer};
use crate::error::Error;
use crate::settings::{
    COLOR_KEY, FRONT_TITLE, LayerParams, ORPHAN_TIMEOUT, OVERLAY_TITLE, STARTUP_GRACE, TICK_HZ,
};
use crate::ticker::Ticker;
use crate::types::{FrameBuffer, Segment, WindowRect};
use glam::Vec2;
use image::Rgba;
use log::{debug, info};
use minifb::WindowOptions;
use std::time::Duration;

/// One depth stratum: a square of edge `size` centred at `center`.
/// `t` runs from 0 (front face) towards 1 (the front window's centre).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    pub t: f32,
    pub size: f32,
    pub center: Vec2,
}

impl Layer {
    /// Top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        let h = self.size / 2.0;
        let c = self.center;
        [
            Vec2::new(c.x - h, c.y - h),
            Vec2::new(c.x + h, c.y - h),
            Vec2::new(c.x + h, c.y + h),
            Vec2::new(c.x - h, c.y + h),
        ]
    }

    /// Top, right, bottom, left, walking clockwise.
    pub fn edges(&self) -> [Segment; 4] {
        let k = self.corners();
        [0usize, 1, 2, 3].map(|i| Segment::between(k[i], k[(i + 1) % 4]))
    }
}

/// The anchored front square (t = 0).
pub fn front_face(params: &LayerParams, front_anchor: Vec2) -> Layer {
    Layer { t: 0.0, size: params.front_size, center: front_anchor }
}

/// Layers `1..=params.layers`, nearest first. `t = i / (layers + 1)`, size grows
/// linearly with `t`, centres lerp from the front anchor to the back anchor and
/// are optionally sheared by the back anchor's offset from screen centre.
pub fn compute_layers(
    params: &LayerParams,
    front_anchor: Vec2,
    back_anchor: Vec2,
    screen_center: Vec2,
) -> Vec<Layer> {
    let n = params.layers;
    let offset = back_anchor - screen_center;
    (1..=n)
        .map(|i| {
            let t = i as f32 / (n as f32 + 1.0);
            let center = front_anchor.lerp(back_anchor, t) + offset * (params.shear * t);
            Layer { t, size: params.front_size + t * params.span, center }
        })
        .collect()
}

/// Rays from the outermost layer's corners to the matching front-face corners.
pub fn connectors(outermost: &Layer, front: &Layer) -> [Segment; 4] {
    let from = outermost.corners();
    let to = front.corners();
    [0usize, 1, 2, 3].map(|i| Segment::between(from[i], to[i]))
}

/// Linear fade: nearest layers opaque, farther ones dimmer.
pub fn layer_alpha(params: &LayerParams, t: f32) -> u8 {
    (params.base_alpha as f32 * (1.0 - t.clamp(0.0, 1.0))).round() as u8
}

/// One clipped, ready-to-draw line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub seg: Segment,
    pub color: Rgba<u8>,
}

/// The whole frame's geometry. Pure: same inputs, same strokes.
/// Farthest layers come first so nearer ones are composited over them.
pub fn build_strokes(params: &LayerParams, screen: (i32, i32), front: &WindowRect) -> Vec<Stroke> {
    let screen_center = Vec2::new((screen.0 / 2) as f32, (screen.1 / 2) as f32);
    let front_anchor = screen_center;
    let back_anchor = front.center();
    let [r, g, b] = params.color;

    let layers = compute_layers(params, front_anchor, back_anchor, screen_center);
    let mut strokes = Vec::with_capacity(layers.len() * 4 + 4);
    let mut push_clipped = |seg: &Segment, color: Rgba<u8>| {
        for piece in outside_pieces(seg, front) {
            strokes.push(Stroke { seg: piece, color });
        }
    };

    for layer in layers.iter().rev() {
        let color = Rgba([r, g, b, layer_alpha(params, layer.t)]);
        for edge in layer.edges() {
            push_clipped(&edge, color);
        }
    }

    if let Some(outermost) = layers.last() {
        let color = Rgba([r, g, b, params.base_alpha]);
        for ray in connectors(outermost, &front_face(params, front_anchor)) {
            push_clipped(&ray, color);
        }
    }
    strokes
}

/// Tracks whether the front window is around, to log transitions and to let
/// an orphaned overlay shut itself down.
#[derive(Debug, Default)]
pub struct Discovery {
    seen: bool,
    missing_frames: u32,
    frames: u32,
}

impl Discovery {
    /// Returns `Some(found)` when the state flipped this frame.
    pub fn record(&mut self, found: bool) -> Option<bool> {
        self.frames = self.frames.saturating_add(1);
        let was_present = self.seen && self.missing_frames == 0;
        if found {
            self.seen = true;
            self.missing_frames = 0;
        } else {
            self.missing_frames = self.missing_frames.saturating_add(1);
        }
        let present = self.seen && self.missing_frames == 0;
        (present != was_present).then_some(present)
    }

    pub fn should_exit(&self, orphan_frames: u32, startup_frames: u32) -> bool {
        if self.seen {
            self.missing_frames >= orphan_frames
        } else {
            self.frames >= startup_frames
        }
    }
}

fn frames_in(d: Duration) -> u32 {
    (d.as_secs_f32() * TICK_HZ as f32).ceil() as u32
}

pub struct OverlayRenderer {
    params: LayerParams,
    screen: (i32, i32),
    canvas: Canvas,
    discovery: Discovery,
}

impl OverlayRenderer {
    pub fn new(params: LayerParams, screen: (i32, i32)) -> Self {
        let canvas = Canvas::new(screen.0.max(1) as usize, screen.1.max(1) as usize);
        Self { params, screen, canvas, discovery: Discovery::default() }
    }

    /// Locate the front window and read its rectangle. Either failing just
    /// means "not there this frame".
    pub fn locate_front(&self, desktop: &impl Desktop) -> Option<WindowRect> {
        let id = desktop.find_window(FRONT_TITLE)?;
        desktop.window_rect(id)
    }

    /// Build one presented frame. Without a front window this is a blank
    /// (all colour key) frame.
    pub fn frame(&mut self, desktop: &impl Desktop) -> FrameBuffer {
        let front = self.locate_front(desktop);
        match self.discovery.record(front.is_some()) {
            Some(true) => info!("Front window found"),
            Some(false) => info!("Front window lost, waiting..."),
            None => {}
        }

        self.canvas.clear(Rgba([0, 0, 0, 0]));
        if let Some(rect) = front {
            let strokes = build_strokes(&self.params, self.screen, &rect);
            for s in &strokes {
                let (a, b) = (s.seg.a.as_vec2(), s.seg.b.as_vec2()); // pixels only need f32
                self.canvas.line(a, b, s.color, self.params.line_width);
            }
        }
        self.canvas.flatten(COLOR_KEY)
    }

    pub fn should_exit(&self) -> bool {
        self.discovery
            .should_exit(frames_in(ORPHAN_TIMEOUT), frames_in(STARTUP_GRACE))
    }
}

/// Overlay role. Failing to get a layered click-through window is fatal;
/// everything after that is best effort.
pub fn run() -> Result<(), Error> {
    let desktop = NativeDesktop::default();
    let (sw, sh) = desktop.screen_size();

    let options = WindowOptions { borderless: true, topmost: true, ..WindowOptions::default() };
    let mut drawer = Drawer::new(OVERLAY_TITLE, sw as usize, sh as usize, options)?;
    let handle = drawer.raw_handle()?;
    make_click_through(handle, COLOR_KEY)?;
    drawer.set_position(0, 0);

    let mut renderer = OverlayRenderer::new(LayerParams::default(), (sw, sh));
    let mut ticker = Ticker::new(TICK_HZ, "overlay");
    info!("Overlay started ({sw}x{sh}). Waiting for \"{FRONT_TITLE}\"...");

    while drawer.is_open() {
        let fb = renderer.frame(&desktop);
        drawer.present(&fb)?;
        if renderer.should_exit() {
            info!("Front window gone, overlay exiting");
            break;
        }
        ticker.wait();
    }
    debug!("Overlay loop finished");
    Ok(())
}
