//! Content hashing for build artifacts.
//!
//! The hex SHA-256 digest is the idempotence key for binary reuse:
//! byte-identical artifacts always hash the same, so the registry can
//! match a new invocation against previously uploaded builds.

use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::ArtifactError;

/// Computes SHA-256 of `data` and returns the hex-encoded digest.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Computes SHA-256 of an entire file and returns the hex-encoded digest.
pub fn hash_file(path: &Path) -> Result<String, ArtifactError> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Computes SHA-256 of a directory tree and returns the hex-encoded digest.
///
/// Files are enumerated recursively and their relative paths sorted
/// lexicographically before hashing, so the result does not depend on
/// filesystem enumeration order. Each file contributes its relative path
/// followed by its content to one running digest.
pub fn hash_dir(path: &Path) -> Result<String, ArtifactError> {
    let mut files = Vec::new();
    collect_files(path, &mut files)?;

    let mut entries: Vec<(String, PathBuf)> = files
        .into_iter()
        .map(|file| {
            let relative = file
                .strip_prefix(path)
                .unwrap_or(&file)
                .to_string_lossy()
                .into_owned();
            (relative, file)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Sha256::new();
    for (relative, file) in entries {
        hasher.update(relative.as_bytes());
        hasher.update(std::fs::read(&file)?);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hashes a build artifact: streamed for files, sorted traversal for
/// directories (iOS `.app` bundles).
///
/// A nonexistent or unreadable path is an I/O error; the caller treats it
/// as fatal for the invocation.
pub fn hash_artifact(path: &Path) -> Result<String, ArtifactError> {
    if std::fs::metadata(path)?.is_dir() {
        hash_dir(path)
    } else {
        hash_file(path)
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ArtifactError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&path, out)?;
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, data: &[u8]) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, data).unwrap();
    }

    #[test]
    fn file_hash_is_stable() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.apk", b"android build bytes");

        let h1 = hash_artifact(&dir.path().join("app.apk")).unwrap();
        let h2 = hash_artifact(&dir.path().join("app.apk")).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64); // SHA-256 = 64 hex chars.
    }

    #[test]
    fn file_hash_matches_bytes_hash() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.apk", b"payload");

        assert_eq!(
            hash_file(&dir.path().join("app.apk")).unwrap(),
            hash_bytes(b"payload")
        );
    }

    #[test]
    fn one_byte_change_changes_hash() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.apk", b"same content A");
        write(dir.path(), "b.apk", b"same content B");

        let ha = hash_file(&dir.path().join("a.apk")).unwrap();
        let hb = hash_file(&dir.path().join("b.apk")).unwrap();
        assert_ne!(ha, hb);
    }

    #[test]
    fn dir_hash_independent_of_creation_order() {
        let first = TempDir::new().unwrap();
        write(first.path(), "Payload/z.bin", b"zz");
        write(first.path(), "Payload/a.bin", b"aa");
        write(first.path(), "Info.plist", b"plist");

        // Same tree, files created in the opposite order.
        let second = TempDir::new().unwrap();
        write(second.path(), "Info.plist", b"plist");
        write(second.path(), "Payload/a.bin", b"aa");
        write(second.path(), "Payload/z.bin", b"zz");

        assert_eq!(
            hash_dir(first.path()).unwrap(),
            hash_dir(second.path()).unwrap()
        );
    }

    #[test]
    fn dir_hash_sees_renamed_files() {
        let first = TempDir::new().unwrap();
        write(first.path(), "a.bin", b"data");

        let second = TempDir::new().unwrap();
        write(second.path(), "b.bin", b"data");

        assert_ne!(
            hash_dir(first.path()).unwrap(),
            hash_dir(second.path()).unwrap()
        );
    }

    #[test]
    fn missing_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = hash_artifact(&dir.path().join("nope.apk")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io(_)));
    }
}
