/*!
 * Staleness of derived notebooks.
 *
 * A derived notebook is rebuilt when it is missing, when it was modified
 * strictly before its source, or when a rebuild is forced. Modification
 * times only trigger rebuilds; they are not used to validate anything.
 */

use log::debug;
use std::io;
use std::path::Path;

use crate::file_utils::FileManager;

/// Why a derived notebook has to be (re)built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    /// The rebuild flag was set
    Forced,
    /// No derived notebook exists yet
    Missing,
    /// The source was modified after the derived notebook
    Outdated,
}

/// Decide whether `derived` must be regenerated from `source`
pub fn rebuild_reason(source: &Path, derived: &Path, force: bool) -> io::Result<Option<RebuildReason>> {
    if force {
        return Ok(Some(RebuildReason::Forced));
    }

    let Some(derived_mtime) = FileManager::modified_time(derived)? else {
        return Ok(Some(RebuildReason::Missing));
    };

    let source_mtime = std::fs::metadata(source)?.modified()?;
    if derived_mtime < source_mtime {
        debug!("{} is older than {}", derived.display(), source.display());
        return Ok(Some(RebuildReason::Outdated));
    }

    Ok(None)
}
