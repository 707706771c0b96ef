use bibsync_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("library.bib"));

    io::write_atomic(&path, b"@misc{a,}").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "@misc{a,}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("library.bib");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_atomic_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("refs/nested/library.bib"));

    io::write_text(&path, "content").unwrap();

    assert!(path.is_file());
}

#[test]
fn test_write_atomic_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("library.bib"));

    io::write_text(&path, "content").unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries, vec!["library.bib".to_string()]);
}

#[test]
fn test_read_text_missing_file_is_error() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.bib"));

    let err = io::read_text(&path).unwrap_err();
    assert!(err.to_string().contains("missing.bib"));
}

#[test]
fn test_read_optional_text_missing_file_is_none() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.bib"));

    assert!(io::read_optional_text(&path).unwrap().is_none());
}

#[test]
fn test_read_optional_text_existing_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("library.bib");
    fs::write(&file_path, "hello").unwrap();

    let content = io::read_optional_text(&NormalizedPath::new(&file_path)).unwrap();
    assert_eq!(content.as_deref(), Some("hello"));
}

#[test]
fn test_remove_if_exists_removes_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("library.bib");
    fs::write(&file_path, "hello").unwrap();

    assert!(io::remove_if_exists(&NormalizedPath::new(&file_path)).unwrap());
    assert!(!file_path.exists());
}

#[test]
fn test_remove_if_exists_missing_file_is_ok() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.bib"));

    assert!(!io::remove_if_exists(&path).unwrap());
}
