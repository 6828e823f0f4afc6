//! Low-level symlink inspection and atomic replacement.
use anyhow::{Context as _, Result, bail};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What currently occupies a link location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing is there.
    Missing,
    /// A symlink (possibly dangling) pointing at the contained path.
    Symlink(PathBuf),
    /// A regular file, directory or other non-symlink entry.
    Foreign,
}

/// Inspect `path` without following a symlink stored there.
///
/// # Errors
///
/// Returns an error if the metadata or link destination cannot be read.
pub fn link_state(path: &Path) -> Result<LinkState> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let dest = std::fs::read_link(path)
                .with_context(|| format!("reading link: {}", path.display()))?;
            Ok(LinkState::Symlink(dest))
        }
        Ok(_) => Ok(LinkState::Foreign),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(LinkState::Missing),
        Err(e) => Err(e).with_context(|| format!("reading metadata: {}", path.display())),
    }
}

/// Point `link` at `target`, replacing any symlink already at `link`.
///
/// The new link is created at a hidden sibling path and renamed over
/// `link`, so readers never observe a missing file. Callers must make sure
/// `link` is not a regular file.
///
/// # Errors
///
/// Returns an error if something other than a symlink occupies the staging
/// path, or the staging link cannot be created or moved into place.
pub fn replace_symlink(target: &Path, link: &Path) -> Result<()> {
    let staging = staging_path(link);
    match link_state(&staging)? {
        LinkState::Missing => {}
        LinkState::Symlink(_) => remove_symlink(&staging)
            .with_context(|| format!("remove stale staging link: {}", staging.display()))?,
        LinkState::Foreign => {
            bail!("staging path is not a symlink: {}", staging.display());
        }
    }

    create_symlink(target, &staging)?;

    if let Err(first) = std::fs::rename(&staging, link) {
        // Some platforms refuse to rename over an existing directory link.
        let retried = matches!(link_state(link), Ok(LinkState::Symlink(_)))
            && remove_symlink(link).is_ok()
            && std::fs::rename(&staging, link).is_ok();
        if !retried {
            let _ = remove_symlink(&staging);
            return Err(first).with_context(|| {
                format!("rename {} to {}", staging.display(), link.display())
            });
        }
    }
    Ok(())
}

/// Hidden sibling used while staging a replacement link.
fn staging_path(link: &Path) -> PathBuf {
    let name = link
        .file_name()
        .map_or_else(|| "link".to_string(), |n| n.to_string_lossy().to_string());
    link.with_file_name(format!(".{name}.autoconf-tmp"))
}

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
#[must_use]
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!(
            "creating symlink {} -> {}",
            link.display(),
            target.display()
        )
    })?;

    #[cfg(windows)]
    {
        let result = if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };
        result.with_context(|| {
            format!(
                "creating symlink {} -> {} (requires developer mode or admin)",
                link.display(),
                target.display()
            )
        })?;
    }

    Ok(())
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir`.
fn remove_symlink(path: &Path) -> Result<()> {
    let meta = std::fs::symlink_metadata(path)
        .with_context(|| format!("reading metadata: {}", path.display()))?;
    if is_dir_like(&meta) {
        std::fs::remove_dir(path)
            .with_context(|| format!("removing directory link: {}", path.display()))?;
    } else {
        std::fs::remove_file(path).with_context(|| format!("removing file: {}", path.display()))?;
    }
    Ok(())
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}
