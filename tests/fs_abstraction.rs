// tests/fs_abstraction.rs

use std::path::Path;

use csvforward::fs::mock::MockFileSystem;
use csvforward::fs::{FileSystem, RealFileSystem};
use csvforward::tracker::compute_file_hash;
use csvforward::tracker::hash::HASH_CHUNK_SIZE;

#[test]
fn mock_tracks_content_and_mtime() {
    let fs = MockFileSystem::new();
    fs.add_file("/data/a.csv", "id\n1\n");

    let first = fs.metadata(Path::new("/data/a.csv")).unwrap();
    assert_eq!(first.len, 5);

    fs.append("/data/a.csv", "2\n");
    let second = fs.metadata(Path::new("/data/a.csv")).unwrap();
    assert_eq!(second.len, 7);
    assert!(second.modified > first.modified);

    assert!(fs.is_dir(Path::new("/data")));
    assert!(fs.is_file(Path::new("/data/a.csv")));
    assert_eq!(
        fs.read_to_string(Path::new("/data/a.csv")).unwrap(),
        "id\n1\n2\n"
    );
}

#[test]
fn mock_keeps_mtime_when_asked() {
    let fs = MockFileSystem::new();
    fs.add_file("/data/a.csv", "aaaa");
    let before = fs.metadata(Path::new("/data/a.csv")).unwrap();

    fs.replace_keep_mtime("/data/a.csv", "bbbb");
    let after = fs.metadata(Path::new("/data/a.csv")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn hash_matches_blake3_of_whole_content() {
    let fs = MockFileSystem::new();
    let big: Vec<u8> = (0..HASH_CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
    fs.add_file("/data/big.csv", big.clone());
    fs.add_file("/data/hello.csv", "hello world");

    assert_eq!(
        compute_file_hash(&fs, Path::new("/data/big.csv")).unwrap(),
        blake3::hash(&big).to_hex().to_string()
    );
    assert_eq!(
        compute_file_hash(&fs, Path::new("/data/hello.csv")).unwrap(),
        blake3::hash(b"hello world").to_hex().to_string()
    );
}

#[test]
fn hash_of_missing_file_is_an_error() {
    let fs = MockFileSystem::new();
    assert!(compute_file_hash(&fs, Path::new("/data/none.csv")).is_err());
}

#[test]
fn real_fs_write_creates_parents_and_reports_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/state.json");

    RealFileSystem.write(&path, b"{}").unwrap();
    assert!(RealFileSystem.is_file(&path));
    assert_eq!(RealFileSystem.metadata(&path).unwrap().len, 2);
    assert!(RealFileSystem.metadata(&path).unwrap().modified > 0.0);

    let hash = compute_file_hash(&RealFileSystem, &path).unwrap();
    assert_eq!(hash, blake3::hash(b"{}").to_hex().to_string());
}
