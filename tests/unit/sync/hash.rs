use super::*;

#[test]
fn file_hash_is_sha256_hex() {
    let dir = tempfile::tempdir().unwrap();
    let f = dir.path().join("a.txt");
    std::fs::write(&f, "abc").unwrap();
    assert_eq!(
        file_hash(&f).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn dir_hash_tracks_content_and_names() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    for root in [a.path(), b.path()] {
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("x.md"), "x").unwrap();
        std::fs::write(root.join("sub/y.md"), "y").unwrap();
    }
    assert_eq!(dir_hash(a.path()), dir_hash(b.path()));

    std::fs::write(b.path().join("sub/y.md"), "changed").unwrap();
    assert_ne!(dir_hash(a.path()), dir_hash(b.path()));

    std::fs::write(b.path().join("sub/y.md"), "y").unwrap();
    std::fs::rename(b.path().join("x.md"), b.path().join("z.md")).unwrap();
    assert_ne!(dir_hash(a.path()), dir_hash(b.path()));
}

#[test]
fn missing_paths_have_no_hash() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(item_hash(&dir.path().join("nope")), None);
    assert!(item_hash(dir.path()).is_some());
}
