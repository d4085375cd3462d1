use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_inside_base() {
    assert_eq!(
        display_relative(Path::new("/work/proj/src/a.vmake"), Path::new("/work/proj")),
        "./src/a.vmake"
    );
}

#[test]
fn test_base_itself() {
    assert_eq!(display_relative(Path::new("/work"), Path::new("/work")), ".");
}

#[test]
fn test_sibling_directory() {
    assert_eq!(
        display_relative(Path::new("/work/other/b.vmake"), Path::new("/work/proj")),
        "../other/b.vmake"
    );
}

#[test]
fn test_deeper_base() {
    assert_eq!(
        display_relative(Path::new("/a/x.vmake"), Path::new("/a/b/c")),
        "../../x.vmake"
    );
}

#[test]
fn test_relative_path_unchanged() {
    assert_eq!(
        display_relative(Path::new("rel/x.vmake"), Path::new("/a")),
        "rel/x.vmake"
    );
}
