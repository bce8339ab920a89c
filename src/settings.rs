// Startup constants shared by the front window, the overlay and the cube view.
// There is no runtime configuration: change a value here and rebuild.

use image::Rgba;
use std::time::Duration;

/// Title of the draggable front window. The overlay finds it by this exact,
/// case-sensitive string, so both roles must agree on it.
pub const FRONT_TITLE: &str = "MainCubeWindow";
/// Title of the full-screen overlay window.
pub const OVERLAY_TITLE: &str = "OverlayCube";
/// Title of the single-window rotating cube.
pub const CUBE_TITLE: &str = "3D Illusion Cube";

/// CLI flag selecting the overlay role in the child process.
pub const OVERLAY_FLAG: &str = "--overlay";

pub const FRONT_W: usize = 520;
pub const FRONT_H: usize = 520;
/// Where the front window opens, relative to a window centred on screen.
pub const FRONT_START_OFFSET: (i32, i32) = (80, 30);

pub const CUBE_W: usize = 700;
pub const CUBE_H: usize = 700;

/// Frame rate every loop ticks at.
pub const TICK_HZ: u32 = 60;
/// Pause after spawning the overlay so it is up before the front window appears.
pub const SPAWN_SETTLE: Duration = Duration::from_millis(120);

/// Overlay gives up after the front window vanished for this long...
pub const ORPHAN_TIMEOUT: Duration = Duration::from_secs(5);
/// ...or if it never showed up within this long.
pub const STARTUP_GRACE: Duration = Duration::from_secs(10);

/// Pixel value treated as fully transparent by the compositor (pure black).
pub const COLOR_KEY: u32 = 0x00_00_00_00;

/// Desktop size assumed where the platform cannot tell us.
pub const FALLBACK_SCREEN: (i32, i32) = (1920, 1080);

// Front face look (inside the front window).
pub const FRONT_BG: u32 = 0x00_0A_0A_0A;
pub const FRONT_FILL: Rgba<u8> = Rgba([0, 180, 0, 255]);
pub const FRONT_OUTLINE: Rgba<u8> = Rgba([0, 230, 0, 255]);
pub const FRONT_INSET: Rgba<u8> = Rgba([0, 160, 0, 255]);
pub const FRONT_INSET_MARGIN: f32 = 40.0;

/// Outside pieces shorter than this (in segment parameter space) are not drawn.
pub const CLIP_PIECE_EPS: f64 = 1e-6;

/// Tunables for the receding wireframe layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerParams {
    /// Number of depth strata.
    pub layers: usize,
    /// Edge length of the anchored front square (and of the nearest layer at t=0).
    pub front_size: f32,
    /// How much the edge length grows between t=0 and t=1.
    pub span: f32,
    /// Parallax shear applied to layer centres; 0 disables it.
    pub shear: f32,
    /// Alpha of a layer at t=0; farther layers fade linearly.
    pub base_alpha: u8,
    pub line_width: u32,
    pub color: [u8; 3],
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            layers: 12,
            front_size: 260.0,
            span: 380.0,
            shear: 0.0,
            base_alpha: 255,
            line_width: 2,
            color: [0, 230, 0],
        }
    }
}

/// Tunables for the rotating cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeParams {
    pub focal: f32,
    pub camera_offset: f32,
    pub light_dir: [f32; 3],
    pub ambient: f32,
    pub hue: [u8; 3],
    pub fill_alpha: u8,
    pub outline: Rgba<u8>,
    pub outline_width: u32,
    /// Pixels of window offset per radian of pitch / yaw.
    pub tilt_scale: f32,
    /// Pixels of combined offset per radian of roll.
    pub roll_scale: f32,
    /// Easing factor per frame, see `projection::ease_toward`.
    pub ease: f32,
    pub background: u32,
}

impl Default for CubeParams {
    fn default() -> Self {
        Self {
            focal: 280.0,
            camera_offset: 4.0,
            light_dir: [0.4, -1.0, -0.6],
            ambient: 0.1,
            hue: [0, 255, 0],
            fill_alpha: 180,
            outline: Rgba([0, 255, 0, 255]),
            outline_width: 2,
            tilt_scale: 350.0,
            roll_scale: 700.0,
            ease: 0.15,
            background: 0x00_0F_0F_0F,
        }
    }
}
