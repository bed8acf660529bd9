//! Directory walking implementation using walkdir.

use super::{FileScanner, ScanResult, ScannedFile};
use crate::error::ScanError;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Visit entries of each directory in file-name order
    pub sort_entries: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            sort_entries: true,
        }
    }
}

/// Scanner implementation using the walkdir crate
///
/// Symbolic links are never followed and only regular files are yielded.
pub struct WalkDirScanner {
    config: ScanConfig,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    fn walker(&self, root: &Path) -> WalkDir {
        let mut walker = WalkDir::new(root).follow_links(false);

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        if self.config.sort_entries {
            walker = walker.sort_by_file_name();
        }

        walker
    }
}

impl Default for WalkDirScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

/// Reject roots that cannot be scanned.
pub fn validate_root(root: &Path) -> Result<(), ScanError> {
    if root.as_os_str().is_empty() {
        return Err(ScanError::EmptyPath);
    }

    if !root.exists() {
        return Err(ScanError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    if !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    Ok(())
}

fn walk_error(e: walkdir::Error) -> ScanError {
    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

    if e.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
        ScanError::PermissionDenied { path }
    } else {
        ScanError::ReadDirectory {
            path,
            source: io::Error::new(io::ErrorKind::Other, e.to_string()),
        }
    }
}

/// Metadata failure on a single file that the walk already reached.
fn entry_error(path: &Path, e: walkdir::Error) -> ScanError {
    let path = path.to_path_buf();

    if e.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
        ScanError::PermissionDenied { path }
    } else {
        ScanError::ReadEntry {
            path,
            source: e
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "metadata unavailable")),
        }
    }
}

impl FileScanner for WalkDirScanner {
    fn walk<'a>(
        &'a self,
        root: &Path,
    ) -> Result<Box<dyn Iterator<Item = Result<ScannedFile, ScanError>> + 'a>, ScanError> {
        validate_root(root)?;

        let entries = self.walker(root).into_iter().filter_map(|entry_result| {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => return Some(Err(walk_error(e))),
            };

            // Directories, symlinks, FIFOs, sockets and devices are skipped
            if !entry.file_type().is_file() {
                return None;
            }

            match entry.metadata() {
                Ok(metadata) => Some(Ok(ScannedFile {
                    size: metadata.len(),
                    path: entry.into_path(),
                })),
                Err(e) => Some(Err(entry_error(entry.path(), e))),
            }
        });

        Ok(Box::new(entries))
    }

    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        let mut files = Vec::new();
        let mut errors = Vec::new();

        for item in self.walk(root)? {
            match item {
                Ok(file) => files.push(file),
                Err(e) => errors.push(e),
            }
        }

        Ok(ScanResult { files, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::default();

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.files.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_finds_every_regular_file_regardless_of_extension() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "notes.txt", b"a");
        create_test_file(temp_dir.path(), "archive.tar.gz", b"b");
        create_test_file(temp_dir.path(), ".hidden", b"c");
        create_test_file(temp_dir.path(), "no_extension", b"d");

        let result = WalkDirScanner::default().scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 4);
    }

    #[test]
    fn scan_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&subdir).unwrap();

        create_test_file(temp_dir.path(), "root.bin", b"1");
        create_test_file(&subdir, "deep.bin", b"2");

        let result = WalkDirScanner::default().scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().any(|f| f.path.ends_with("a/b/deep.bin")));
    }

    #[test]
    fn scan_records_file_sizes() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "five.txt", b"12345");

        let result = WalkDirScanner::default().scan(temp_dir.path()).unwrap();

        assert_eq!(result.files[0].size, 5);
    }

    #[test]
    fn scan_order_is_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "c.txt", b"c");
        create_test_file(temp_dir.path(), "a.txt", b"a");
        create_test_file(temp_dir.path(), "b.txt", b"b");

        let result = WalkDirScanner::default().scan(temp_dir.path()).unwrap();
        let names: Vec<_> = result
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn max_depth_limits_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("sub");
        fs::create_dir(&subdir).unwrap();
        create_test_file(temp_dir.path(), "top.txt", b"t");
        create_test_file(&subdir, "below.txt", b"b");

        let scanner = WalkDirScanner::new(ScanConfig {
            max_depth: Some(1),
            ..Default::default()
        });
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("top.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn scan_skips_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let target = create_test_file(temp_dir.path(), "real.txt", b"x");
        std::os::unix::fs::symlink(&target, temp_dir.path().join("alias.txt")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing"),
            temp_dir.path().join("dangling"),
        )
        .unwrap();

        let result = WalkDirScanner::default().scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("real.txt"));
    }

    #[test]
    fn scan_nonexistent_directory_is_invalid_input() {
        let result = WalkDirScanner::default().scan(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn scan_file_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_test_file(temp_dir.path(), "plain.txt", b"x");

        let result = WalkDirScanner::default().scan(&file);

        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }

    #[test]
    fn entry_metadata_failure_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_test_file(temp_dir.path(), "gone.txt", b"x");
        let entry = WalkDir::new(&file).into_iter().next().unwrap().unwrap();
        fs::remove_file(&file).unwrap();

        let error = entry.metadata().unwrap_err();
        let scan_error = entry_error(entry.path(), error);

        assert!(matches!(&scan_error, ScanError::ReadEntry { path, .. } if path == &file));
        assert!(!scan_error.to_string().contains("directory"));
    }

    #[test]
    fn empty_root_is_rejected() {
        assert!(matches!(
            validate_root(Path::new("")),
            Err(ScanError::EmptyPath)
        ));
    }
}
