//! Local video files shown in the Documents tab

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "webm", "mov", "m4v"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentEntry {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Video files directly inside `dir`, sorted by name. A missing directory is empty.
pub fn list_documents(dir: &Path) -> Result<Vec<DocumentEntry>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_video(&path) {
            continue;
        }
        entries.push(DocumentEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            size_bytes: entry.metadata()?.len(),
            path,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_only_videos_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.MKV"), b"1234").unwrap();
        fs::write(dir.path().join("a.mp4"), b"12").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("c.mp4")).unwrap();

        let docs = list_documents(dir.path()).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.mp4", "b.MKV"]);
        assert_eq!(docs[1].size_bytes, 4);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_documents(&dir.path().join("nope")).unwrap().is_empty());
    }
}
