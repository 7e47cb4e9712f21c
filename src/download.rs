//! Writing tool results to files ("Download result").
//!
//! Existing files are never overwritten: `color.txt` becomes `color (1).txt`,
//! `color (2).txt`, and so on.

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Highest ` (n)` suffix tried before giving up
const MAX_SUFFIX: u32 = 9999;

/// A file a tool offers for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub contents: Vec<u8>,
}

impl Download {
    pub fn text(filename: &str, contents: impl Into<String>) -> Self {
        Self {
            filename: filename.to_string(),
            contents: contents.into().into_bytes(),
        }
    }

    pub fn bytes(filename: &str, contents: Vec<u8>) -> Self {
        Self {
            filename: filename.to_string(),
            contents,
        }
    }
}

/// Write `download` into `dir`, returning the path actually used.
/// Candidates are opened with `create_new`; a name that is taken is skipped.
pub fn save(dir: &Path, download: &Download) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    for path in candidates(dir, &download.filename) {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e).with_context(|| format!("Failed to create {:?}", path)),
        };
        file.write_all(&download.contents)
            .with_context(|| format!("Failed to write {:?}", path))?;
        tracing::info!("Saved {} bytes to {:?}", download.contents.len(), path);
        return Ok(path);
    }
    bail!("No free file name for {} in {:?}", download.filename, dir)
}

/// `name.ext`, then `name (1).ext`, `name (2).ext`, ...
fn candidates<'a>(dir: &'a Path, filename: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };
    std::iter::once(dir.join(filename)).chain((1..=MAX_SUFFIX).map(move |n| match ext {
        Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
        None => dir.join(format!("{} ({})", stem, n)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let first = save(dir.path(), &Download::text("color.txt", "#FFFFFF")).unwrap();
        let second = save(dir.path(), &Download::text("color.txt", "#000000")).unwrap();
        let third = save(dir.path(), &Download::text("color.txt", "#123456")).unwrap();

        assert_eq!(first.file_name().unwrap(), "color.txt");
        assert_eq!(second.file_name().unwrap(), "color (1).txt");
        assert_eq!(third.file_name().unwrap(), "color (2).txt");
        assert_eq!(fs::read_to_string(first).unwrap(), "#FFFFFF");
        assert_eq!(fs::read_to_string(second).unwrap(), "#000000");
    }

    #[test]
    fn test_names_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        save(dir.path(), &Download::text("notes", "a")).unwrap();
        let second = save(dir.path(), &Download::text("notes", "b")).unwrap();
        assert_eq!(second.file_name().unwrap(), "notes (1)");
    }

    #[test]
    fn test_existing_file_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("qr.png"), b"mine").unwrap();
        fs::write(dir.path().join("qr (1).png"), b"also mine").unwrap();

        let path = save(dir.path(), &Download::bytes("qr.png", vec![9])).unwrap();
        assert_eq!(path.file_name().unwrap(), "qr (2).png");
        assert_eq!(fs::read(dir.path().join("qr.png")).unwrap(), b"mine");
        assert_eq!(fs::read(dir.path().join("qr (1).png")).unwrap(), b"also mine");
        assert_eq!(fs::read(path).unwrap(), vec![9]);
    }

    #[test]
    fn test_candidate_names() {
        let dir = Path::new("/tmp/out");
        let names: Vec<_> = candidates(dir, "a.b.txt").take(3).collect();
        assert_eq!(
            names,
            vec![dir.join("a.b.txt"), dir.join("a.b (1).txt"), dir.join("a.b (2).txt")]
        );
        let hidden: Vec<_> = candidates(dir, ".env").take(2).collect();
        assert_eq!(hidden, vec![dir.join(".env"), dir.join(".env (1)")]);
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = save(&nested, &Download::bytes("x.bin", vec![1, 2, 3])).unwrap();
        assert_eq!(fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
