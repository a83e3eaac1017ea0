//! File and directory front ends over [`TokenArrayScanner`].

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::lexer::tokenize;

use super::class::ClassScanner;
use super::error::FileScanError;
use super::token_array::TokenArrayScanner;
use super::{ScanError, ScanResult};

/// A tokenized PHP file and the scanner over its tokens.
pub struct FileScanner {
    path: PathBuf,
    scanner: TokenArrayScanner<'static>,
}

impl FileScanner {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileScanError> {
        Self::open_with_config(path, ScanConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: ScanConfig) -> Result<Self, FileScanError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| FileScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "tokenizing file");
        Ok(Self::from_source(path, &String::from_utf8_lossy(&bytes), config))
    }

    pub fn from_source(path: impl Into<PathBuf>, source: &str, config: ScanConfig) -> Self {
        Self {
            path: path.into(),
            scanner: TokenArrayScanner::with_config(tokenize(source), config),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scanner(&self) -> &TokenArrayScanner<'static> {
        &self.scanner
    }
}

/// Collects `.php` files from directories and single paths and scans them.
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    directories: Vec<PathBuf>,
    files: Vec<PathBuf>,
    config: ScanConfig,
}

impl DirectoryScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.directories.push(path.into());
        self
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.files.push(path.into());
        self
    }

    /// Explicit files first, then every `.php` file below each directory in
    /// file-name order.
    pub fn paths(&self) -> Result<Vec<PathBuf>, FileScanError> {
        let mut paths = self.files.clone();
        for directory in &self.directories {
            for entry in WalkDir::new(directory).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "php") {
                    paths.push(entry.into_path());
                }
            }
        }
        Ok(paths)
    }

    /// Read and tokenize every file in parallel. Scanning itself stays lazy
    /// and per file.
    pub fn scan(&self) -> Result<DirectoryIndex, FileScanError> {
        let paths = self.paths()?;
        debug!(files = paths.len(), "scanning directory tree");
        let files = paths
            .par_iter()
            .map(|path| FileScanner::open_with_config(path, self.config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DirectoryIndex { files })
    }
}

/// Class lookups across the files of a [`DirectoryScanner`].
pub struct DirectoryIndex {
    files: Vec<FileScanner>,
}

impl DirectoryIndex {
    pub fn files(&self) -> &[FileScanner] {
        &self.files
    }

    fn scanners(&self) -> impl Iterator<Item = &FileScanner> {
        // An empty file has no tokens to scan and declares nothing.
        self.files.iter().filter(|file| !file.scanner.is_empty())
    }

    pub fn class_names(&self) -> ScanResult<Vec<&str>> {
        let mut names = Vec::new();
        for file in self.scanners() {
            names.extend(file.scanner.class_names()?);
        }
        Ok(names)
    }

    pub fn has_class(&self, name: &str) -> ScanResult<bool> {
        for file in self.scanners() {
            if file.scanner.has_class(name)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The file declaring `name`, if any.
    pub fn file_declaring(&self, name: &str) -> ScanResult<Option<&FileScanner>> {
        for file in self.scanners() {
            if file.scanner.has_class(name)? {
                return Ok(Some(file));
            }
        }
        Ok(None)
    }

    pub fn class(&self, name: &str) -> ScanResult<ClassScanner<'_>> {
        match self.file_declaring(name)? {
            Some(file) => file.scanner.class(name),
            None => Err(ScanError::NotFound {
                kind: "class",
                name: name.to_string(),
            }),
        }
    }
}
