// Window-manager queries. The two processes share no memory: the overlay learns
// where the front window is only by asking the OS, fresh every frame.

use crate::error::Error;
use crate::types::{WindowId, WindowRect};

/// What a frame loop may ask the desktop. Every query is best effort: `None`
/// means "not available right now", never an error.
pub trait Desktop {
    /// Primary screen size in pixels.
    fn screen_size(&self) -> (i32, i32);

    /// Pointer position in desktop coordinates.
    fn cursor_pos(&self) -> Option<(i32, i32)>;

    /// Top-level window whose title is exactly `title`.
    fn find_window(&self, title: &str) -> Option<WindowId>;

    /// Current rectangle of `id` in desktop coordinates.
    fn window_rect(&self, id: WindowId) -> Option<WindowRect>;
}

#[cfg(target_os = "windows")]
mod platform {
    use super::*;
    use std::ffi::c_void;
    use windows::Win32::Foundation::{COLORREF, HWND, POINT, RECT};
    use windows::Win32::UI::WindowsAndMessaging::{
        FindWindowW, GWL_EXSTYLE, GetCursorPos, GetSystemMetrics, GetWindowLongW, GetWindowRect,
        LWA_COLORKEY, SM_CXSCREEN, SM_CYSCREEN, SetLayeredWindowAttributes, SetWindowLongW,
        WINDOW_EX_STYLE, WS_EX_LAYERED, WS_EX_TOPMOST, WS_EX_TRANSPARENT,
    };
    use windows::core::PCWSTR;

    #[derive(Default)]
    pub struct NativeDesktop;

    impl NativeDesktop {
        /// `GetCursorPos` already reports desktop coordinates.
        pub fn observe_pointer(&self, _origin: (i32, i32), _local: Option<(i32, i32)>) {}
    }

    fn widestring(value: &str) -> Vec<u16> {
        value.encode_utf16().chain(std::iter::once(0)).collect()
    }

    impl Desktop for NativeDesktop {
        fn screen_size(&self) -> (i32, i32) {
            unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
        }

        fn cursor_pos(&self) -> Option<(i32, i32)> {
            let mut point = POINT::default();
            unsafe { GetCursorPos(&mut point) }.ok()?;
            Some((point.x, point.y))
        }

        fn find_window(&self, title: &str) -> Option<WindowId> {
            let wide = widestring(title);
            let hwnd = unsafe { FindWindowW(PCWSTR::null(), PCWSTR(wide.as_ptr())) }.ok()?;
            if hwnd.0.is_null() {
                return None;
            }
            Some(WindowId(hwnd.0 as isize))
        }

        fn window_rect(&self, id: WindowId) -> Option<WindowRect> {
            let mut rc = RECT::default();
            unsafe { GetWindowRect(HWND(id.0 as *mut c_void), &mut rc) }.ok()?;
            Some(WindowRect { left: rc.left, top: rc.top, right: rc.right, bottom: rc.bottom })
        }
    }

    pub fn overlay_ex_style() -> WINDOW_EX_STYLE {
        WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOPMOST
    }

    /// `0x00RRGGBB` to a GDI `COLORREF` (`0x00BBGGRR`).
    pub fn colorref(color: u32) -> COLORREF {
        let (r, g, b) = ((color >> 16) & 0xFF, (color >> 8) & 0xFF, color & 0xFF);
        COLORREF(r | (g << 8) | (b << 16))
    }

    pub fn make_click_through(handle: *mut c_void, color_key: u32) -> Result<(), Error> {
        let hwnd = HWND(handle);
        unsafe {
            let ex = GetWindowLongW(hwnd, GWL_EXSTYLE) as u32;
            SetWindowLongW(hwnd, GWL_EXSTYLE, (ex | overlay_ex_style().0) as i32);
            SetLayeredWindowAttributes(hwnd, colorref(color_key), 255, LWA_COLORKEY)
                .map_err(|e| Error::OverlayStyle(e.to_string()))?;
        }
        Ok(())
    }

    #[cfg(test)]
    mod windows_tests {
        use super::*;

        #[test]
        fn overlay_style_is_layered_topmost_and_click_through() {
            let style = overlay_ex_style();
            assert_ne!(style.0 & WS_EX_LAYERED.0, 0);
            assert_ne!(style.0 & WS_EX_TOPMOST.0, 0);
            assert_ne!(style.0 & WS_EX_TRANSPARENT.0, 0);
        }

        #[test]
        fn colorref_swaps_red_and_blue() {
            assert_eq!(colorref(0x00_11_22_33).0, 0x00_33_22_11);
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod platform {
    use super::*;
    use crate::settings::FALLBACK_SCREEN;
    use std::cell::Cell;
    use std::ffi::c_void;

    /// Portable stand-in: knows its own window's origin and local mouse (fed in
    /// by the frame loop) but cannot see other processes' windows.
    #[derive(Default)]
    pub struct NativeDesktop {
        local_pointer: Cell<Option<(i32, i32)>>,
    }

    impl NativeDesktop {
        /// Record the window origin plus window-local mouse for `cursor_pos`.
        pub fn observe_pointer(&self, origin: (i32, i32), local: Option<(i32, i32)>) {
            self.local_pointer
                .set(local.map(|(x, y)| (origin.0 + x, origin.1 + y)));
        }
    }

    impl Desktop for NativeDesktop {
        fn screen_size(&self) -> (i32, i32) {
            FALLBACK_SCREEN
        }

        fn cursor_pos(&self) -> Option<(i32, i32)> {
            self.local_pointer.get()
        }

        fn find_window(&self, _title: &str) -> Option<WindowId> {
            None
        }

        fn window_rect(&self, _id: WindowId) -> Option<WindowRect> {
            None
        }
    }

    pub fn make_click_through(_handle: *mut c_void, _color_key: u32) -> Result<(), Error> {
        Err(Error::Unsupported("colour-keyed click-through windows need Windows"))
    }

    #[cfg(test)]
    mod portable_tests {
        use super::*;

        #[test]
        fn overlay_styling_is_refused() {
            let result = make_click_through(std::ptr::null_mut(), 0);
            assert!(matches!(result, Err(Error::Unsupported(_))));
        }

        #[test]
        fn cursor_comes_from_observed_window_pointer() {
            let desktop = NativeDesktop::default();
            assert_eq!(desktop.cursor_pos(), None);
            desktop.observe_pointer((300, 200), Some((15, -4)));
            assert_eq!(desktop.cursor_pos(), Some((315, 196)));
            desktop.observe_pointer((300, 200), None);
            assert_eq!(desktop.cursor_pos(), None);
        }
    }
}

pub use platform::{NativeDesktop, make_click_through};
