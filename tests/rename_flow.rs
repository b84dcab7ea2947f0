//! End-to-end rename flow through the public library API.

use std::fs;
use std::path::Path;

use test_namer_rs::{apply_renames, build_proposals, NamerConfig, NamerEngine, NamerError};

fn create_test_file(path: &Path, sentinel: &str, domains: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let quoted: Vec<String> = domains.iter().map(|d| format!("'{}'", d)).collect();
    fs::write(path, format!("\n# sentinel {0}\n{0} = [{1}]\n", sentinel, quoted.join(", "))).unwrap();
}

fn snapshot(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|entry| entry.unwrap().path().strip_prefix(dir).unwrap().display().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_grouped_files_collide_then_force_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let tests = dir.path().join("tests");
    let alpha = tests.join("test_alpha.py");
    let bravo = tests.join("test_bravo.py");
    create_test_file(&alpha, "DOMAINS", &["alpha"]);
    create_test_file(&bravo, "DOMAINS", &["alpha"]);

    let proposals = build_proposals(&NamerConfig::new(&tests)).unwrap();
    assert_eq!(proposals.len(), 2);

    // Simulate existing targets outside the batch.
    for proposal in &proposals {
        fs::write(proposal.proposed(), "# colliding").unwrap();
    }
    let before = snapshot(&tests);

    let err = apply_renames(&proposals, false).unwrap_err();
    assert!(matches!(err, NamerError::Collision { .. }));
    assert_eq!(snapshot(&tests), before);

    apply_renames(&proposals, true).unwrap();
    for proposal in &proposals {
        assert!(proposal.proposed().exists());
        assert!(!proposal.original().exists());
    }
}

#[test]
fn test_swapping_names_between_groups() {
    let dir = tempfile::tempdir().unwrap();
    let tests = dir.path().join("tests");
    // Each file carries the name the other one should get.
    create_test_file(&tests.join("test_api_0001.py"), "DOMAINS", &["db"]);
    create_test_file(&tests.join("test_db_0001.py"), "DOMAINS", &["api"]);

    let engine = NamerEngine::new(NamerConfig::new(&tests)).unwrap();
    let proposals = engine.build_proposals().unwrap();

    assert!(engine.apply(&proposals, false).is_err());
    engine.apply(&proposals, true).unwrap();

    let api = fs::read_to_string(tests.join("test_api_0001.py")).unwrap();
    let db = fs::read_to_string(tests.join("test_db_0001.py")).unwrap();
    assert!(api.contains("'api'"));
    assert!(db.contains("'db'"));
    assert_eq!(snapshot(&tests), vec!["", "test_api_0001.py", "test_db_0001.py"]);
}

#[test]
fn test_relative_imports_drive_aggregated_names() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    fs::create_dir_all(repo.join("pkg").join("sub")).unwrap();
    fs::write(repo.join("pkg").join("__init__.py"), "").unwrap();
    fs::write(repo.join("pkg").join("sub").join("mod.py"), "DOMAINS = ['sub module']\n").unwrap();
    let tests = repo.join("pkg").join("tests");
    fs::create_dir_all(&tests).unwrap();
    fs::write(tests.join("test_x.py"), "from ..sub import mod\n").unwrap();

    let config = NamerConfig::new(&tests).with_aggregation("pkg", repo);
    let proposals = build_proposals(&config).unwrap();

    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].proposed_name(), "test_sub_module_0001.py");
}
