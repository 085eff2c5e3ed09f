use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn tempo_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = Command::new(env!("CARGO_BIN_EXE_tempo"))
        .args(args)
        .arg("--format")
        .arg("json")
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "tempo {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Two commits by one author: a.rs (3 lines) then b.rs (2 lines).
fn seed_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.name", "Alice"]);
    git(dir, &["config", "user.email", "alice@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    std::fs::write(dir.join("a.rs"), "fn a() {}\nfn b() {}\nfn c() {}\n").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "first"]);
    std::fs::write(dir.join("b.rs"), "fn d() {}\nfn e() {}\n").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "second"]);
}

#[test]
fn git_stats_reports_commit_totals() {
    let dir = tempfile::tempdir().unwrap();
    seed_repo(dir.path());

    let v = tempo_json(dir.path(), &["git", "stats", "--repo", "."]);

    assert_eq!(v["summary"]["branch"], "main");
    assert_eq!(v["summary"]["totalCommits"], 2);
    assert_eq!(v["summary"]["mergeCommits"], 0);
    assert_eq!(v["summary"]["totalAdded"], 5);
    assert_eq!(v["summary"]["totalDeleted"], 0);
    assert_eq!(v["summary"]["authors"], 1);

    let authors = v["authors"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["username"], "alice");
    assert_eq!(authors[0]["commits"], 2);
    assert_eq!(authors[0]["filesChanged"], 2);

    let period_commits: u64 = v["periods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["commits"].as_u64().unwrap())
        .sum();
    assert_eq!(period_commits, 2);
}

#[test]
fn git_stats_respects_author_filter() {
    let dir = tempfile::tempdir().unwrap();
    seed_repo(dir.path());

    let v = tempo_json(
        dir.path(),
        &["git", "stats", "--repo", ".", "--author", "nobody@example.com"],
    );
    assert_eq!(v["summary"]["totalCommits"], 0);

    let v = tempo_json(
        dir.path(),
        &["git", "stats", "--repo", ".", "--author", "alice@example.com"],
    );
    assert_eq!(v["summary"]["totalCommits"], 2);
}

#[test]
fn git_files_ranks_paths_and_types() {
    let dir = tempfile::tempdir().unwrap();
    seed_repo(dir.path());

    let v = tempo_json(dir.path(), &["git", "files", "--repo", "."]);

    let files = v["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["path"], "a.rs");
    assert_eq!(files[0]["added"], 3);

    let types = v["fileTypes"].as_array().unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0]["extension"], "rs");
    assert_eq!(types[0]["files"], 2);
}

#[test]
fn git_blame_attributes_lines_to_author() {
    let dir = tempfile::tempdir().unwrap();
    seed_repo(dir.path());

    let v = tempo_json(dir.path(), &["git", "blame", "--repo", ".", "--file", "a.rs"]);

    let owners = v.as_array().unwrap();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0]["author"], "Alice");
    assert_eq!(owners[0]["lines"], 3);
    assert_eq!(owners[0]["share"], 100.0);
}

#[test]
fn git_branches_deduplicates_unmerged_work() {
    let dir = tempfile::tempdir().unwrap();
    seed_repo(dir.path());
    git(dir.path(), &["checkout", "-b", "feature"]);
    std::fs::write(dir.path().join("c.rs"), "fn f() {}\n").unwrap();
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-m", "third"]);
    git(dir.path(), &["checkout", "main"]);

    let v = tempo_json(dir.path(), &["git", "branches", "--repo", "."]);

    // main (2 commits) + feature (3, two shared with main): 5 raw, 3 unique.
    assert_eq!(v["branchesScanned"], 2);
    assert_eq!(v["uniqueCommits"], 3);
    assert_eq!(v["uniqueFiles"], 3);
    assert_eq!(v["perBranch"][0]["branch"], "main");
    assert_eq!(v["perBranch"][0]["commits"], 2);
    assert_eq!(v["perBranch"][1]["branch"], "feature");
    assert_eq!(v["perBranch"][1]["commits"], 3);
    let authors = v["authors"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["commits"], 3);
}
