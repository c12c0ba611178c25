use anyhow::{Result, Context, anyhow};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

// @module: File and directory utilities

/// Prefix of the temporary files used for atomic writes
const TEMP_FILE_PREFIX: &str = ".nbsplit-";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path of a derived notebook
    // @params: source_file, output_dir, dir_name
    pub fn derived_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        source_file: P1,
        output_dir: P2,
        dir_name: &str,
    ) -> Result<PathBuf> {
        let source_file = source_file.as_ref();
        let file_name = source_file
            .file_name()
            .ok_or_else(|| anyhow!("Source path has no file name: {:?}", source_file))?;

        Ok(output_dir.as_ref().join(dir_name).join(file_name))
    }

    /// List the regular files directly inside a directory, sorted by file name.
    ///
    /// Hidden entries (names starting with `.`) are skipped.
    pub fn list_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow!("Source directory does not exist: {:?}", dir));
        }

        let mut result = Vec::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_file() {
                result.push(entry.into_path());
            }
        }

        Ok(result)
    }

    /// Last modification time of a file, or None when it does not exist
    pub fn modified_time<P: AsRef<Path>>(path: P) -> io::Result<Option<SystemTime>> {
        match fs::metadata(path.as_ref()) {
            Ok(metadata) => metadata.modified().map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace a file with `content` through a temporary file in the same directory
    ///
    /// Readers see either the old or the new content, never a partial write.
    /// The parent directory is created if needed.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(dir)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o644));
        }

        let mut temp = builder.tempfile_in(dir)?;
        temp.write_all(content)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
