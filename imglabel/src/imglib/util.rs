pub fn version_label() -> String {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const BUILD: &str = env!("IMGLABEL_BUILD");
    format!("imglabel {VERSION} ({BUILD})")
}

#[test]
fn test_version_label() {
    let label = version_label();
    assert!(label.starts_with("imglabel "));
    assert!(label.contains(env!("CARGO_PKG_VERSION")));
}
