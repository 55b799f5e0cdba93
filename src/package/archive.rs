//! Zip-packed packages.
//!
//! Archives are reopened for every lookup; nothing is cached between calls.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};
use crate::resource::{ResolvedPath, ResourcePath};

/// Prefix for temporary extraction directories.
const EXTRACT_PREFIX: &str = "file-factory-";

/// Join a member prefix and path segments into a zip member name.
pub(super) fn join_entry<I, S>(prefix: &str, segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entry = prefix.to_string();
    for segment in segments {
        if !entry.is_empty() {
            entry.push('/');
        }
        entry.push_str(segment.as_ref());
    }
    entry
}

fn open(archive: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| Error::archive(archive, e))
}

/// Whether any member lives below directory `entry`.
pub(super) fn has_dir(archive: &Path, entry: &str) -> Result<bool> {
    if entry.is_empty() {
        return Ok(true);
    }
    let dir = format!("{entry}/");
    Ok(open(archive)?.file_names().any(|name| name.starts_with(&dir)))
}

/// Whether `entry` exists as a file or directory member.
pub(super) fn has_entry(archive: &Path, entry: &str) -> Result<bool> {
    let dir = format!("{entry}/");
    Ok(open(archive)?
        .file_names()
        .any(|name| name == entry || name.starts_with(&dir)))
}

/// Extract member `entry` (a file, or a directory with everything below it)
/// into a new temporary directory as `name`.
///
/// Returns `None` when the archive has no such member.
pub(super) fn extract(
    archive: &Path,
    entry: &str,
    name: &str,
    extract_dir: Option<&Path>,
) -> Result<Option<ResolvedPath>> {
    let mut zip = open(archive)?;

    match zip.by_name(entry) {
        Ok(mut file) if !file.is_dir() => {
            let temp = temp_dir(extract_dir)?;
            let dest = temp.path().join(name);
            write_member(&mut file, &dest)?;
            debug!(archive = %archive.display(), entry, dest = %dest.display(), "extracted resource");
            return Ok(Some(ResolvedPath::extracted(dest, temp)));
        }
        Ok(_) | Err(ZipError::FileNotFound) => {}
        Err(e) => return Err(Error::archive(archive, e)),
    }

    let dir = format!("{entry}/");
    let members: Vec<String> = zip
        .file_names()
        .filter(|member| member.starts_with(&dir))
        .map(str::to_string)
        .collect();
    if members.is_empty() {
        return Ok(None);
    }

    let temp = temp_dir(extract_dir)?;
    let dest_root = temp.path().join(name);
    fs::create_dir_all(&dest_root).map_err(|e| Error::io(&dest_root, e))?;

    for member in &members {
        let relative = &member[dir.len()..];
        if relative.is_empty() {
            continue;
        }
        let Ok(relative) = ResourcePath::parse(relative) else {
            warn!(archive = %archive.display(), member = %member, "skipping archive member outside its directory");
            continue;
        };

        let dest = relative.to_path(&dest_root);
        let mut file = zip.by_name(member).map_err(|e| Error::archive(archive, e))?;
        if file.is_dir() {
            fs::create_dir_all(&dest).map_err(|e| Error::io(&dest, e))?;
        } else {
            write_member(&mut file, &dest)?;
        }
    }

    debug!(
        archive = %archive.display(),
        entry,
        members = members.len(),
        dest = %dest_root.display(),
        "extracted resource directory"
    );
    Ok(Some(ResolvedPath::extracted(dest_root, temp)))
}

fn temp_dir(extract_dir: Option<&Path>) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(EXTRACT_PREFIX);
    match extract_dir {
        Some(dir) => builder.tempdir_in(dir).map_err(|e| Error::io(dir, e)),
        None => builder.tempdir().map_err(|e| Error::io(std::env::temp_dir(), e)),
    }
}

fn write_member<R: Read + ?Sized>(member: &mut R, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let mut out = File::create(dest).map_err(|e| Error::io(dest, e))?;
    io::copy(member, &mut out).map_err(|e| Error::io(dest, e))?;
    Ok(())
}
