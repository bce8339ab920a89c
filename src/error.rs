// One error type for all three roles.
// Every variant states *where* things went wrong; per-frame OS queries never
// produce one of these (they degrade to "not found" instead).
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating a minifb window failed.
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Pushing the frame buffer to the window failed.
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// The OS gave us no native handle for a window we just created.
    #[error("Window handle error: {0}")]
    WindowHandle(String),

    /// Turning the overlay into a layered, topmost, click-through window failed.
    #[cfg(target_os = "windows")]
    #[error("Overlay style error: {0}")]
    OverlayStyle(String),

    /// This platform cannot express a click-through colour-keyed overlay.
    #[cfg(not(target_os = "windows"))]
    #[error("Unsupported platform: {0}")]
    Unsupported(&'static str),

    /// Launching the overlay child process failed.
    #[error("Spawn error: {0}")]
    Spawn(#[from] std::io::Error),
}
