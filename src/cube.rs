// Single-window variant: a lit, translucent cube inside a draggable window.
// Where the window sits relative to the screen centre decides how the cube is
// tilted, with eased (lagging) rotation.

use crate::desktop::{Desktop, NativeDesktop};
use crate::draw::{Canvas, Drawer};
use crate::error::Error;
use crate::front::{FrontController, PointerEdges};
use crate::projection::{
    CUBE_VERTICES, FACES, Smoothed, depth_order, face_intensity, face_normal, project, rotate,
    rotation, shade, target_angles,
};
use crate::settings::{CUBE_H, CUBE_TITLE, CUBE_W, CubeParams, TICK_HZ};
use crate::ticker::Ticker;
use crate::types::FrameBuffer;
use glam::{Vec2, Vec3};
use image::Rgba;
use log::info;
use minifb::WindowOptions;

/// One face ready to paint.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceDraw {
    pub face: usize,
    pub points: [Vec2; 4],
    pub fill: Rgba<u8>,
}

pub struct CubeScene {
    params: CubeParams,
    light: Vec3,
    angles: Smoothed,
    canvas: Canvas,
}

impl CubeScene {
    pub fn new(params: CubeParams, width: usize, height: usize) -> Self {
        Self {
            light: Vec3::from_array(params.light_dir).normalize_or_zero(),
            params,
            angles: Smoothed::default(),
            canvas: Canvas::new(width, height),
        }
    }

    #[cfg(test)]
    pub fn angles(&self) -> Vec3 {
        self.angles.angles
    }

    /// Ease the rotation one frame towards what `offset` (window centre minus
    /// screen centre) asks for.
    pub fn advance(&mut self, offset: Vec2) {
        let target = target_angles(offset, self.params.tilt_scale, self.params.roll_scale);
        self.angles.advance(target, self.params.ease);
    }

    /// Faces in paint order (farthest first) with their shaded fill colours.
    pub fn faces(&self) -> Vec<FaceDraw> {
        let p = &self.params;
        let center = Vec2::new(self.canvas.width() as f32 / 2.0, self.canvas.height() as f32 / 2.0);
        let rotated = rotate(&CUBE_VERTICES, rotation(self.angles.angles));
        let projected = rotated.map(|v| project(v, p.focal, p.camera_offset, center));

        depth_order(&projected)
            .into_iter()
            .map(|face| {
                let [a, b, c, _] = FACES[face];
                let normal = face_normal(rotated[a], rotated[b], rotated[c]);
                let [r, g, b] = shade(p.hue, face_intensity(normal, self.light, p.ambient));
                FaceDraw {
                    face,
                    points: FACES[face].map(|i| projected[i].xy),
                    fill: Rgba([r, g, b, p.fill_alpha]),
                }
            })
            .collect()
    }

    /// Translucent fill then opaque outline for each face, back to front.
    pub fn render(&mut self) -> FrameBuffer {
        let faces = self.faces();
        self.canvas.clear(Rgba([0, 0, 0, 0]));
        for f in &faces {
            self.canvas.fill_polygon(&f.points, f.fill);
            self.canvas
                .stroke_polygon(&f.points, self.params.outline, self.params.outline_width);
        }
        self.canvas.flatten(self.params.background)
    }
}

/// Cube role: one borderless window, no overlay.
pub fn run() -> Result<(), Error> {
    let desktop = NativeDesktop::default();
    let (sw, sh) = desktop.screen_size();
    let screen_center = Vec2::new((sw / 2) as f32, (sh / 2) as f32);

    let options = WindowOptions { borderless: true, ..WindowOptions::default() };
    let mut drawer = Drawer::new(CUBE_TITLE, CUBE_W, CUBE_H, options)?;
    drawer.set_position(sw / 2 - CUBE_W as i32 / 2, sh / 2 - CUBE_H as i32 / 2);

    let mut controller = FrontController::new(drawer.position(), (CUBE_W as i32, CUBE_H as i32));
    let mut edges = PointerEdges::default();
    let mut scene = CubeScene::new(CubeParams::default(), CUBE_W, CUBE_H);
    let mut ticker = Ticker::new(TICK_HZ, "cube");
    info!("Cube window running. Drag it away from the screen centre to tilt the cube.");

    while drawer.is_open() && !drawer.esc_pressed() {
        desktop.observe_pointer(drawer.position(), drawer.mouse_pos());
        if let Some((x, y)) = edges.feed(&mut controller, drawer.left_mouse_down(), desktop.cursor_pos()) {
            drawer.set_position(x, y);
        }
        controller.sync_position(drawer.position());

        scene.advance(controller.rect().center() - screen_center);
        let fb = scene.render();
        drawer.present(&fb)?;
        ticker.wait();
    }
    Ok(())
}
