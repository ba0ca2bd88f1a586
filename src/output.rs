//! Writing compiled search spaces to disk.
//!
//! Compilation itself performs no I/O. These helpers sit on top of it: the
//! text is written to a temporary file next to the destination while holding
//! an exclusive lock, synced, then renamed into place, so a reader never sees
//! a partially written search space.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::catalogue::Catalogue;
use crate::compiler::{CompileOptions, SearchSpace, SearchSpaceCompiler};
use crate::error::Result;

/// Atomically writes `text` to `path`.
///
/// # Errors
///
/// Returns an I/O error if the temporary file cannot be created, locked,
/// written or renamed.
pub fn write_search_space(path: impl AsRef<Path>, text: &str) -> std::io::Result<()> {
    let path = path.as_ref();
    write_atomic(path, text.as_bytes())?;
    trace_info!(path = %path.display(), bytes = text.len(), "wrote search space");
    Ok(())
}

/// Writes `bytes` to a locked temporary file next to `path`, then renames it
/// over `path`.
///
/// The temporary file is truncated only once the lock is held, and the lock
/// is kept until the rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp_path = temp_path_for(path);

    let mut file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&tmp_path)?;
    file.lock_exclusive()?;
    file.set_len(0)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)?;
    file.unlock()?;
    Ok(())
}

/// Compiles `catalogue` and writes the rendered search space to `path`.
///
/// The file is only touched once compilation has succeeded, so a failing
/// compilation (for example [`EmptyCatalogue`](crate::Error::EmptyCatalogue))
/// leaves no file behind.
///
/// # Errors
///
/// Returns any compilation error, or [`Error::Io`](crate::Error::Io) if
/// writing fails.
pub fn compile_to_file(
    compiler: &SearchSpaceCompiler,
    catalogue: &Catalogue,
    options: &CompileOptions,
    path: impl AsRef<Path>,
) -> Result<SearchSpace> {
    let space = compiler.compile(catalogue, options)?;
    write_search_space(path, &space.render())?;
    Ok(space)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let mut path = std::env::temp_dir();
        path.push(format!(
            "space_compiler_output_unit_{}_{}.txt",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        path
    }

    #[test]
    fn stale_temp_file_is_truncated_after_locking() {
        let path = temp_path();
        let tmp = temp_path_for(&path);
        std::fs::write(&tmp, "leftover from an interrupted writer, much longer").unwrap();

        write_atomic(&path, b"short").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
        assert!(!tmp.exists());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn temp_file_lives_next_to_destination() {
        let tmp = temp_path_for(Path::new("/data/run/space.py"));
        assert_eq!(tmp, PathBuf::from("/data/run/.space.py.tmp"));
    }
}
