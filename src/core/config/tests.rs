use super::*;
use tempfile::TempDir;

fn test_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("tests")).unwrap();
    dir
}

#[test]
fn test_defaults_match_cli_defaults() {
    let config = NamerConfig::default();
    assert_eq!(config.test_root, PathBuf::from("tests"));
    assert_eq!(config.sentinel, "DOMAINS");
    assert_eq!(config.fallback, "misc");
    assert_eq!(config.prefix, "test");
    assert_eq!(config.max_slug_len, 64);
    assert_eq!(config.max_filename_len, 255);
    assert!(config.lowercase);
    assert!(config.aggregation().is_none());
}

#[test]
fn test_valid_config_passes() {
    let dir = test_root();
    let config = NamerConfig::new(dir.path().join("tests"))
        .with_aggregation("pkg.sub", dir.path())
        .with_excludes(["fixtures"]);
    assert!(config.validate().is_ok());
    assert_eq!(config.aggregation(), Some(("pkg.sub", dir.path())));
}

#[test]
fn test_missing_test_root_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = NamerConfig::new(dir.path().join("nope")).validate().unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_bad_sentinel_is_rejected() {
    let dir = test_root();
    let base = NamerConfig::new(dir.path().join("tests"));
    assert!(base.clone().with_sentinel("1BAD").validate().is_err());
    assert!(base.clone().with_sentinel("").validate().is_err());
    assert!(base.with_sentinel("_OK").validate().is_ok());
}

#[test]
fn test_bad_import_root_is_rejected() {
    let dir = test_root();
    let config = NamerConfig::new(dir.path().join("tests")).with_aggregation("pkg..mod", dir.path());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("import_root"));
}

#[test]
fn test_missing_repo_root_is_rejected() {
    let dir = test_root();
    let config = NamerConfig::new(dir.path().join("tests")).with_repo_root(dir.path().join("nope"));
    assert!(config.validate().is_err());
}

#[test]
fn test_prefix_and_fallback_rules() {
    let dir = test_root();
    let base = NamerConfig::new(dir.path().join("tests"));
    assert!(base.clone().with_prefix("1badprefix").validate().is_err());
    assert!(base.clone().with_prefix("Spec").validate().is_ok());
    assert!(base.clone().with_fallback("1BAD").validate().is_err());
    assert!(base.clone().with_fallback("---").validate().is_err());
    assert!(base.with_fallback("  Foo-Bar ").validate().is_ok());
}

#[test]
fn test_length_bounds_are_checked() {
    let dir = test_root();
    let base = NamerConfig::new(dir.path().join("tests"));
    assert!(base.clone().with_max_slug_len(0).validate().is_err());
    assert!(base.clone().with_max_filename_len(300).validate().is_err());
    assert!(base.clone().with_max_filename_len(32).with_max_slug_len(40).validate().is_err());
    assert!(base.with_max_filename_len(80).with_max_slug_len(20).validate().is_ok());
}

#[test]
fn test_blank_exclude_is_rejected() {
    let dir = test_root();
    let config = NamerConfig::new(dir.path().join("tests")).with_excludes(["ok", " "]);
    assert!(config.validate().is_err());
}
