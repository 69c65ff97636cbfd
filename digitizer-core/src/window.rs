use std::path::{Path, PathBuf};
use std::process::{Child, Command};

/// Path of the running executable, used to start additional windows.
pub fn current_executable() -> Option<PathBuf> {
    match std::env::current_exe() {
        Ok(path) => Some(path),
        Err(err) => {
            log::warn!("cannot determine the current executable: {err}");
            None
        }
    }
}

/// Starts `executable` as a new process showing its own window.
pub fn spawn_window(executable: &Path, args: &[String]) -> std::io::Result<Child> {
    let child = Command::new(executable).args(args).spawn()?;
    log::info!("opened new window (pid {})", child.id());
    Ok(child)
}
