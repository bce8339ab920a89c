// Lifecycle of the overlay child process: started by the front window,
// best-effort killed when the front window goes away.

use crate::error::Error;
use crate::settings::OVERLAY_FLAG;
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::process::{Child, Command};

pub struct OverlayProcess {
    child: Option<Child>,
}

impl OverlayProcess {
    /// Re-launch this executable in overlay mode.
    pub fn spawn() -> Result<Self, Error> {
        let exe = std::env::current_exe()?;
        Self::spawn_command(exe.as_os_str(), [OVERLAY_FLAG])
    }

    fn spawn_command<I, S>(program: &OsStr, args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let child = Command::new(program).args(args).spawn()?;
        info!("Overlay process started (pid {})", child.id());
        Ok(Self { child: Some(child) })
    }

    /// Non-blocking signal plus reap. Never fails: problems are logged and an
    /// orphaned overlay shuts itself down once the front window is gone.
    pub fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Overlay already exited: {status}");
                return;
            }
            Ok(None) => {}
            Err(err) => warn!("Overlay status: {err}"),
        }

        if let Err(err) = child.kill() {
            warn!("Overlay kill failed: {err}");
            return;
        }
        match child.wait() {
            Ok(status) => info!("Overlay stopped: {status}"),
            Err(err) => warn!("Overlay wait failed: {err}"),
        }
    }
}

impl Drop for OverlayProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn terminate_stops_a_running_child() {
        let mut proc = OverlayProcess::spawn_command(OsStr::new("sleep"), ["30"])
            .expect("spawn sleep");
        proc.terminate();
        assert!(proc.child.is_none());
        // Second call is a no-op.
        proc.terminate();
    }

    #[test]
    fn terminate_tolerates_an_exited_child() {
        let mut proc = OverlayProcess::spawn_command(OsStr::new("true"), Vec::<&str>::new())
            .expect("spawn true");
        std::thread::sleep(std::time::Duration::from_millis(100));
        proc.terminate();
        assert!(proc.child.is_none());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = OverlayProcess::spawn_command(OsStr::new("/nonexistent/overlay"), ["x"]);
        assert!(matches!(err, Err(Error::Spawn(_))));
    }
}
