//! End-to-end runs of the `splice` binary against a temporary project.

use assert_cmd::Command;
use predicates::prelude::*;

fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, text) in files {
        std::fs::write(dir.path().join(name), text).unwrap();
    }
    dir
}

#[test]
fn inlines_and_removes_across_files() {
    let dir = project(&[
        ("lib.mica", "fn double(x: Int) -> Int = x * 2\n"),
        ("main.mica", "fn main() {\n    let y = double(4)\n}\n"),
    ]);

    Command::cargo_bin("splice")
        .unwrap()
        .args(["inline"])
        .arg(dir.path())
        .args(["--function", "double", "--remove", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"declaration_removed\": true"));

    let main_after = std::fs::read_to_string(dir.path().join("main.mica")).unwrap();
    assert_eq!(main_after, "fn main() {\n    let y = (4 * 2)\n}\n");
    let lib_after = std::fs::read_to_string(dir.path().join("lib.mica")).unwrap();
    assert_eq!(lib_after, "");
}

#[test]
fn dry_run_leaves_files_untouched() {
    let source = "fn id(x: Int) -> Int = x\n\nfn main() {\n    let y = id(1)\n}\n";
    let dir = project(&[("main.mica", source)]);

    Command::cargo_bin("splice")
        .unwrap()
        .args(["inline"])
        .arg(dir.path())
        .args(["--function", "id", "--remove", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("declaration `id` removed"));

    let after = std::fs::read_to_string(dir.path().join("main.mica")).unwrap();
    assert_eq!(after, source);
}

#[test]
fn single_site_mode_keeps_the_declaration() {
    let dir = project(&[(
        "main.mica",
        "fn add(a: Int, b: Int) -> Int = a + b\n\nfn main() {\n    let t = add(2, 3)\n}\n",
    )]);

    Command::cargo_bin("splice")
        .unwrap()
        .args(["inline"])
        .arg(dir.path())
        .args(["--at", "main.mica:4:13"])
        .assert()
        .success();

    let after = std::fs::read_to_string(dir.path().join("main.mica")).unwrap();
    assert!(after.contains("fn add(a: Int, b: Int) -> Int = a + b"));
    assert!(after.contains("let t = (2 + 3)"));
}

#[test]
fn value_reference_yields_failure_exit_code_but_commits_inlines() {
    let dir = project(&[(
        "main.mica",
        "fn triple(x: Int) -> Int = x * 3\n\nfn main() {\n    let f = triple\n    let y = triple(2)\n}\n",
    )]);

    Command::cargo_bin("splice")
        .unwrap()
        .args(["inline"])
        .arg(dir.path())
        .args(["--function", "triple", "--remove"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("declaration `triple` kept"));

    let after = std::fs::read_to_string(dir.path().join("main.mica")).unwrap();
    assert!(after.contains("fn triple(x: Int) -> Int = x * 3"));
    assert!(after.contains("let y = (2 * 3)"));
}

#[test]
fn unknown_declaration_fails() {
    let dir = project(&[("main.mica", "fn main() {\n}\n")]);

    Command::cargo_bin("splice")
        .unwrap()
        .args(["inline"])
        .arg(dir.path())
        .args(["--function", "missing", "--remove"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn without_remove_the_declaration_stays() {
    let dir = project(&[(
        "main.mica",
        "fn double(x: Int) -> Int = x * 2\n\nfn main() {\n    let y = double(4)\n}\n",
    )]);

    Command::cargo_bin("splice")
        .unwrap()
        .args(["inline"])
        .arg(dir.path())
        .args(["--function", "double"])
        .assert()
        .success()
        .stdout(predicate::str::contains("declaration `double` kept"));

    let after = std::fs::read_to_string(dir.path().join("main.mica")).unwrap();
    assert!(after.contains("fn double(x: Int) -> Int = x * 2"));
    assert!(after.contains("let y = (4 * 2)"));
}
