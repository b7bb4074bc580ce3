//! Session spawn: a login shell on a fresh PTY plus its reader thread.

use std::io::Read;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use termdock_common::{GridSize, SessionError, SessionId};
use termdock_session::BackendEvent;

use super::types::{PtySession, Scrollback, PTY_READ_CHUNK};

/// The user's shell: `$SHELL` on Unix, `$COMSPEC` on Windows.
pub fn default_shell() -> String {
    #[cfg(unix)]
    {
        std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
    }
    #[cfg(windows)]
    {
        std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
    }
}

/// Inherited into every shell; everything else is cleared so credentials
/// held by this process do not leak into panes.
const ALLOWED_ENV_VARS: &[&str] = &[
    "HOME",
    "USER",
    "LOGNAME",
    "SHELL",
    "PATH",
    "LANG",
    "LC_ALL",
    "LC_CTYPE",
    "DISPLAY",
    "WAYLAND_DISPLAY",
    "XDG_RUNTIME_DIR",
    "TMPDIR",
    "USERPROFILE",
    "APPDATA",
    "LOCALAPPDATA",
    "SYSTEMROOT",
    "COMSPEC",
];

fn build_shell_command(shell: &str, cwd: Option<&Path>) -> CommandBuilder {
    let mut cmd = CommandBuilder::new(shell);
    cmd.env_clear();
    for key in ALLOWED_ENV_VARS {
        if let Ok(val) = std::env::var(key) {
            cmd.env(key, val);
        }
    }
    cmd.env("TERM", "xterm-256color");
    cmd.env("COLORTERM", "truecolor");

    #[cfg(unix)]
    {
        cmd.arg("-l");
    }

    if let Some(dir) = cwd.filter(|d| d.is_dir()) {
        cmd.cwd(dir);
    }
    cmd
}

pub(super) struct SpawnRequest<'a> {
    pub session_id: &'a SessionId,
    pub size: GridSize,
    pub cwd: Option<&'a Path>,
    pub shell: &'a str,
    pub scrollback_bytes: usize,
}

/// Spawn the shell and start forwarding its output as
/// [`BackendEvent::Data`], then [`BackendEvent::Exit`] at EOF.
pub(super) fn spawn_session(
    req: SpawnRequest<'_>,
    events: mpsc::Sender<BackendEvent>,
) -> Result<PtySession, SessionError> {
    let size = PtySize {
        rows: req.size.rows,
        cols: req.size.cols,
        pixel_width: 0,
        pixel_height: 0,
    };

    let pair = native_pty_system()
        .openpty(size)
        .map_err(|e| SessionError::CreateFailed(format!("failed to open PTY: {e}")))?;

    let child = pair
        .slave
        .spawn_command(build_shell_command(req.shell, req.cwd))
        .map_err(|e| SessionError::CreateFailed(format!("failed to spawn shell '{}': {e}", req.shell)))?;
    drop(pair.slave);

    let writer = pair
        .master
        .take_writer()
        .map_err(|e| SessionError::Pty(format!("failed to take PTY writer: {e}")))?;
    let mut reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| SessionError::Pty(format!("failed to clone PTY reader: {e}")))?;

    let scrollback = Arc::new(Mutex::new(Scrollback::new(req.scrollback_bytes)));
    let thread_scrollback = Arc::clone(&scrollback);
    let session_id = req.session_id.clone();

    thread::Builder::new()
        .name(format!("pty-reader-{session_id}"))
        .spawn(move || {
            let mut buf = [0u8; PTY_READ_CHUNK];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        let bytes = buf[..n].to_vec();
                        let offset = thread_scrollback.lock().push(&bytes);
                        let event = BackendEvent::Data {
                            session_id: session_id.clone(),
                            offset,
                            bytes,
                        };
                        if events.send(event).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(session_id = %session_id, "PTY reader error: {e}");
                        break;
                    }
                }
            }
            let _ = events.send(BackendEvent::Exit {
                session_id,
                code: None,
            });
        })
        .map_err(|e| SessionError::Pty(format!("failed to spawn PTY reader thread: {e}")))?;

    Ok(PtySession {
        writer,
        child,
        master: pair.master,
        size,
        scrollback,
    })
}
