// The front window: a borderless 520x520 window showing the cube's near face.
// Dragging anywhere on it moves it; the overlay process reads its rectangle
// from the OS and draws the receding layers around it.

use crate::desktop::{Desktop, NativeDesktop};
use crate::draw::{Canvas, Drawer};
use crate::error::Error;
use crate::process::OverlayProcess;
use crate::settings::{
    FRONT_BG, FRONT_FILL, FRONT_H, FRONT_INSET, FRONT_INSET_MARGIN, FRONT_OUTLINE,
    FRONT_START_OFFSET, FRONT_TITLE, FRONT_W, LayerParams, SPAWN_SETTLE, TICK_HZ,
};
use crate::ticker::Ticker;
use crate::types::{DragState, FrameBuffer, WindowRect};
use glam::Vec2;
use log::{error, info};
use minifb::WindowOptions;

/// Drag tracking and the last position the OS reported for the window.
#[derive(Clone, Debug)]
pub struct FrontController {
    drag: DragState,         // whether we are mid-drag, and where we grabbed
    position: (i32, i32),    // window origin on the desktop
    size: (i32, i32),        // window width/height, fixed
}

impl FrontController {
    pub fn new(position: (i32, i32), size: (i32, i32)) -> Self {
        Self { drag: DragState::default(), position, size }
    }

    #[cfg(test)]
    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn rect(&self) -> WindowRect {
        WindowRect::from_origin_size(self.position.0, self.position.1, self.size.0, self.size.1)
    }

    /// Start a drag if `pos` (desktop coordinates) is over the window.
    /// Returns whether a new drag began.
    /// Visual: nothing moves yet; the next pointer move starts the drag.
    pub fn on_pointer_down(&mut self, pos: (i32, i32)) -> bool {
        if self.drag.active || !self.rect().contains(pos.0, pos.1) {
            return false;
        }
        self.drag = DragState {
            active: true,
            grab_offset: (pos.0 - self.position.0, pos.1 - self.position.1),
        };
        true
    }

    /// While dragging, the window follows the pointer. Returns the position to
    /// request from the OS; the caller reports back what the OS actually did
    /// through `sync_position`.
    /// Visual: the window glides with the pointer, the grab point staying under it.
    pub fn on_pointer_move(&mut self, pos: (i32, i32)) -> Option<(i32, i32)> {
        if !self.drag.active {
            return None;
        }
        let target = (pos.0 - self.drag.grab_offset.0, pos.1 - self.drag.grab_offset.1);
        self.position = target;
        Some(target)
    }

    /// Visual: the window stays where it was dropped.
    pub fn on_pointer_up(&mut self) {
        self.drag.active = false;
    }

    /// The OS-reported origin wins over whatever we asked for.
    pub fn sync_position(&mut self, reported: (i32, i32)) {
        self.position = reported;
    }
}

/// Turns "is the left button held" samples into down/move/up calls.
#[derive(Default)]
pub struct PointerEdges {
    was_down: bool,
}

impl PointerEdges {
    /// Feed one frame's button state and pointer; returns the move request, if any.
    pub fn feed(
        &mut self,
        controller: &mut FrontController,
        down: bool,
        pointer: Option<(i32, i32)>,
    ) -> Option<(i32, i32)> {
        let pressed = down && !self.was_down;
        let released = !down && self.was_down;
        self.was_down = down;

        if released {
            controller.on_pointer_up();
            return None;
        }
        let pos = pointer?;
        if pressed {
            controller.on_pointer_down(pos);
        }
        if down {
            controller.on_pointer_move(pos)
        } else {
            None
        }
    }
}

/// The static near face: filled square with an outline, plus a smaller inset
/// wireframe hinting at the depth behind it.
/// Visual: a green square on near-black; the overlay's layers grow out of its edges.
pub fn render_frame(params: &LayerParams) -> FrameBuffer {
    let mut canvas = Canvas::new(FRONT_W, FRONT_H);
    let center = Vec2::new((FRONT_W / 2) as f32, (FRONT_H / 2) as f32);
    let size = Vec2::splat(params.front_size);
    let min = center - size / 2.0;

    canvas.fill_rect(min, size, FRONT_FILL);           // face
    canvas.stroke_rect(min, size, FRONT_OUTLINE, 3);   // bright rim

    let inset = Vec2::splat(params.front_size - FRONT_INSET_MARGIN);
    canvas.stroke_rect(center - inset / 2.0, inset, FRONT_INSET, 2); // darker inner frame

    canvas.flatten(FRONT_BG)
}

/// Front-window role. Optionally launches the overlay child first.
pub fn run(spawn_overlay: bool) -> Result<(), Error> {
    let overlay = if spawn_overlay {
        match OverlayProcess::spawn() {
            Ok(proc) => {
                std::thread::sleep(SPAWN_SETTLE); // let the overlay window come up first
                Some(proc)
            }
            Err(e) => {
                error!("Could not start overlay, continuing without it: {e}");
                None
            }
        }
    } else {
        None
    };

    let desktop = NativeDesktop::default();
    let (sw, sh) = desktop.screen_size();
    let start = (
        sw / 2 - FRONT_W as i32 / 2 + FRONT_START_OFFSET.0,
        sh / 2 - FRONT_H as i32 / 2 + FRONT_START_OFFSET.1,
    );

    let options = WindowOptions { borderless: true, ..WindowOptions::default() };
    let mut drawer = Drawer::new(FRONT_TITLE, FRONT_W, FRONT_H, options)?;
    // The overlay finds us by title; without a native handle there is nothing to find.
    drawer.raw_handle()?;
    drawer.set_position(start.0, start.1);

    let mut controller = FrontController::new(drawer.position(), (FRONT_W as i32, FRONT_H as i32));
    let mut edges = PointerEdges::default();
    let face = render_frame(&LayerParams::default());
    let mut ticker = Ticker::new(TICK_HZ, "front");

    info!("Front window running at {:?}. Drag it; the overlay follows.", controller.position());

    while drawer.is_open() && !drawer.esc_pressed() {
        desktop.observe_pointer(drawer.position(), drawer.mouse_pos());
        let pointer = desktop.cursor_pos(); // desktop coordinates

        if let Some((x, y)) = edges.feed(&mut controller, drawer.left_mouse_down(), pointer) {
            drawer.set_position(x, y);
        }
        controller.sync_position(drawer.position()); // the OS may have clamped the move

        drawer.present(&face)?; // face never changes; only the window moves
        ticker.wait();
    }

    info!("Front window closed");
    if let Some(mut proc) = overlay {
        proc.terminate();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::unpack_rgb;

    fn controller() -> FrontController {
        FrontController::new((300, 300), (520, 520))
    }

    #[test]
    fn pointer_down_outside_does_not_drag() {
        let mut c = controller();
        assert!(!c.on_pointer_down((10, 10)));
        assert!(!c.drag().active);
        assert_eq!(c.on_pointer_move((50, 50)), None);
        assert_eq!(c.position(), (300, 300));
    }

    #[test]
    fn drag_keeps_grab_offset() {
        let mut c = controller();
        assert!(c.on_pointer_down((350, 320)));
        assert_eq!(c.drag().grab_offset, (50, 20));

        for pointer in [(360, 330), (900, 100), (-40, 700)] {
            let target = c.on_pointer_move(pointer).expect("dragging");
            assert_eq!(target, (pointer.0 - 50, pointer.1 - 20));
            c.sync_position(target);
            assert_eq!(c.position(), (pointer.0 - 50, pointer.1 - 20));
        }

        c.on_pointer_up();
        assert!(!c.drag().active);
        assert_eq!(c.on_pointer_move((0, 0)), None);
    }

    #[test]
    fn second_pointer_down_is_ignored_while_dragging() {
        let mut c = controller();
        c.on_pointer_down((310, 310));
        assert!(!c.on_pointer_down((700, 700)));
        assert_eq!(c.drag().grab_offset, (10, 10));
    }

    #[test]
    fn os_reported_position_wins() {
        let mut c = controller();
        c.on_pointer_down((310, 310));
        c.on_pointer_move((5000, 5000));
        // OS clamped the move.
        c.sync_position((1400, 560));
        assert_eq!(c.rect(), WindowRect { left: 1400, top: 560, right: 1920, bottom: 1080 });
        // The next move is still relative to the original grab point.
        assert_eq!(c.on_pointer_move((1500, 600)), Some((1490, 590)));
    }

    #[test]
    fn edges_drive_a_full_drag() {
        let mut c = controller();
        let mut edges = PointerEdges::default();

        assert_eq!(edges.feed(&mut c, false, Some((400, 400))), None);
        assert_eq!(edges.feed(&mut c, true, Some((400, 400))), Some((300, 300)));
        assert_eq!(edges.feed(&mut c, true, Some((420, 410))), Some((320, 310)));
        assert_eq!(edges.feed(&mut c, false, Some((420, 410))), None);
        assert!(!c.drag().active);
    }

    #[test]
    fn edges_release_without_pointer_still_ends_drag() {
        let mut c = controller();
        let mut edges = PointerEdges::default();
        edges.feed(&mut c, true, Some((400, 400)));
        edges.feed(&mut c, false, None);
        assert!(!c.drag().active);
    }

    #[test]
    fn front_face_layout() {
        let fb = render_frame(&LayerParams::default());
        assert_eq!((fb.width, fb.height), (FRONT_W, FRONT_H));
        let at = |x: usize, y: usize| unpack_rgb(fb.pixels[y * fb.width + x]);

        assert_eq!(at(5, 5), unpack_rgb(FRONT_BG));
        // Between the outline and the inset frame: plain fill.
        assert_eq!(at(FRONT_W / 2, 140), FRONT_FILL);
        // Dead centre is fill too.
        assert_eq!(at(FRONT_W / 2, FRONT_H / 2), FRONT_FILL);
        // Top edge of the square carries the outline colour.
        assert_eq!(at(FRONT_W / 2, 130), FRONT_OUTLINE);
        // Inset frame sits 20 px inside.
        assert_eq!(at(FRONT_W / 2, 150), FRONT_INSET);
    }
}
