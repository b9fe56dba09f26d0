use manga_catalog_core::artifact::check_reference;
use manga_catalog_core::{ArtifactError, ArtifactRoot};
use std::fs;
use tempfile::TempDir;

fn root_with_page() -> (TempDir, ArtifactRoot) {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("storage").join("aot").join("1");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("01.jpg"), b"jpeg").unwrap();
    fs::write(tmp.path().join("secret.txt"), b"outside").unwrap();
    let root = ArtifactRoot::new(tmp.path().join("storage"));
    (tmp, root)
}

#[test]
fn locate_existing_reference() {
    let (_tmp, root) = root_with_page();
    let path = root.locate("aot/1/01.jpg").unwrap();
    assert!(path.ends_with("aot/1/01.jpg"));
    assert!(path.is_absolute());
}

#[test]
fn parent_components_are_rejected() {
    let (_tmp, root) = root_with_page();
    assert!(matches!(
        root.locate("../secret.txt"),
        Err(ArtifactError::Escapes(_))
    ));
    assert!(matches!(
        root.locate("aot/../../secret.txt"),
        Err(ArtifactError::Escapes(_))
    ));
}

#[test]
fn absolute_references_are_rejected() {
    assert!(matches!(
        check_reference("/etc/passwd"),
        Err(ArtifactError::Escapes(_))
    ));
}

#[test]
fn empty_reference_is_rejected() {
    assert!(matches!(check_reference("  "), Err(ArtifactError::Empty)));
}

#[test]
fn missing_file_is_reported() {
    let (_tmp, root) = root_with_page();
    assert!(matches!(
        root.locate("aot/1/02.jpg"),
        Err(ArtifactError::Missing(_))
    ));
}

#[cfg(unix)]
#[test]
fn symlink_out_of_root_is_rejected() {
    let (tmp, root) = root_with_page();
    std::os::unix::fs::symlink(
        tmp.path().join("secret.txt"),
        tmp.path().join("storage").join("link.jpg"),
    )
    .unwrap();
    assert!(matches!(
        root.locate("link.jpg"),
        Err(ArtifactError::Escapes(_))
    ));
}
