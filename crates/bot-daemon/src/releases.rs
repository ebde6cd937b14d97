//! Locating the newest engine build.
//!
//! Release executables are named `engine-v0.<minor>.<patch>`; the one
//! with the highest version wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Version triple of a release file name, if it is one.
pub fn parse_release_name(name: &str) -> Option<(u32, u32, u32)> {
    let rest = name.strip_prefix("engine-v0.")?;
    let (minor, patch) = rest.split_once('.')?;

    if !is_number(minor) || !is_number(patch) {
        return None;
    }

    Some((0, minor.parse().ok()?, patch.parse().ok()?))
}

/// Newest release inside `dir`, or `None` when there is none.
pub fn latest_release(dir: &Path) -> io::Result<Option<PathBuf>> {
    let mut best: Option<((u32, u32, u32), PathBuf)> = None;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(version) = name.to_str().and_then(parse_release_name) else {
            continue;
        };

        if best.as_ref().map_or(true, |(current, _)| version > *current) {
            best = Some((version, entry.path()));
        }
    }

    Ok(best.map(|(_, path)| path))
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
