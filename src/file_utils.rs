use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::{DictionaryError, MediaError};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @opens: Dictionary file for line reading
    // @returns: DictionaryError::Missing when the file does not exist
    pub fn open_dictionary<P: AsRef<Path>>(path: P) -> Result<BufReader<File>, DictionaryError> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(DictionaryError::Missing(path.to_path_buf()));
        }
        Ok(BufReader::new(File::open(path)?))
    }

    /// Every regular file below a directory, in a stable order
    pub fn list_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, MediaError> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(MediaError::NotADirectory(dir.to_path_buf()));
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                result.push(entry.into_path());
            }
        }
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
