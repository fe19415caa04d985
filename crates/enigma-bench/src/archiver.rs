//! Version archiver: copies the current build into the version store.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::driver::confirm;
use crate::error::{BenchError, Result};
use crate::settings::Settings;
use crate::store::{file_name_for, VersionStore, VersionedBinary};

/// Result of an archive request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// A new version was written.
    Created(VersionedBinary),
    /// The latest version was replaced in place.
    Overwritten(VersionedBinary),
    /// The user declined the overwrite; the store is unchanged.
    Aborted,
}

fn validate_label(label: &str) -> Result<()> {
    let file_name = Path::new(label).file_name();
    if file_name != Some(OsStr::new(label)) || label.contains(['/', '\\']) {
        return Err(BenchError::InvalidLabel {
            label: label.to_string(),
        });
    }
    Ok(())
}

fn ensure_build(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(BenchError::MissingBuild {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Copy `source` to `dir/name`, replacing any existing file atomically and
/// keeping the source permissions.
fn copy_into_store(source: &Path, dir: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let dest = dir.join(name);

    let mut src = File::open(source)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    io::copy(&mut src, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), src.metadata()?.permissions())?;
    tmp.persist(&dest).map_err(|e| e.error)?;

    debug!(from = %source.display(), to = %dest.display(), "Copied build");
    Ok(dest)
}

/// Archive the current build.
///
/// With a label, the build becomes `v<latest + 1>_<label>` (`v0_<label>` in an
/// empty store). Without one, the latest version is overwritten after
/// confirmation on `input`.
pub fn archive_current_build<R: BufRead, W: Write>(
    settings: &Settings,
    label: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<ArchiveOutcome> {
    let store = VersionStore::new(&settings.versions_dir);

    match label.filter(|label| !label.is_empty()) {
        Some(label) => {
            validate_label(label)?;
            ensure_build(&settings.current_build)?;

            let version = store.next_version()?;
            let name = file_name_for(&version, label);
            let path = copy_into_store(&settings.current_build, store.dir(), &name)?;
            info!(%version, label, "Saved new version");
            writeln!(output, "Saved binary as: {name}")?;

            Ok(ArchiveOutcome::Created(VersionedBinary {
                version,
                label: label.to_string(),
                path,
            }))
        }
        None => {
            let latest = match store.find_latest() {
                Ok(latest) => latest,
                Err(BenchError::NoVersions { dir }) => {
                    return Err(BenchError::NothingToOverwrite { dir })
                }
                Err(e) => return Err(e),
            };
            ensure_build(&settings.current_build)?;

            let name = latest.file_name();
            if !confirm(&format!("Overwrite {name}?"), input, output)? {
                writeln!(output, "Aborted")?;
                return Ok(ArchiveOutcome::Aborted);
            }

            copy_into_store(&settings.current_build, store.dir(), &name)?;
            info!(
                version = %latest.version,
                label = %latest.label,
                "Overwrote latest version"
            );
            writeln!(output, "Saved binary as: {name}")?;
            Ok(ArchiveOutcome::Overwritten(latest))
        }
    }
}
