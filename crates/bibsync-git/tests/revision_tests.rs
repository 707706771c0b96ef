//! Tests for merge revision lookup and historical reads

use std::fs;

use bibsync_fs::NormalizedPath;
use bibsync_git::{Error, Oid, list_file_history, locate_merge_commits, read_file_from_commit};
use bibsync_test_utils::{RemoteFixture, git::git, git::real_git_repo_with_file};
use git2::Repository;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const FILE: &str = "library.bib";
const SEED: &str = "@misc{a,\n  title = {A},\n}\n";

fn oid(hex: &str) -> Oid {
    Oid::from_str(hex).unwrap()
}

#[test]
fn test_locate_diverged_triple() {
    let fx = RemoteFixture::new(FILE, SEED);
    let seed = fx.head(fx.alice());
    fx.commit(fx.bob(), "@misc{a, title = {B}}\n", "Bob");
    fx.push(fx.bob());
    fx.commit(fx.alice(), "@misc{a, title = {C}}\n", "Alice");
    fx.fetch(fx.alice());

    let repo = Repository::open(fx.alice()).unwrap();
    let triple = locate_merge_commits(&repo).unwrap();

    assert_eq!(triple.base, Some(oid(&seed)));
    assert_eq!(triple.local, oid(&fx.head(fx.alice())));
    assert_eq!(triple.remote, oid(&fx.remote_head()));
}

#[test]
fn test_locate_without_upstream_fails() {
    let temp = TempDir::new().unwrap();
    real_git_repo_with_file(temp.path(), FILE, SEED);

    let repo = Repository::open(temp.path()).unwrap();
    let err = locate_merge_commits(&repo).unwrap_err();
    assert!(matches!(err, Error::TrackingBranchNotFound { .. }));
}

#[test]
fn test_locate_unrelated_histories_has_no_base() {
    let fx = RemoteFixture::new(FILE, SEED);
    let alice = fx.alice();
    git(alice, &["checkout", "--orphan", "fresh"]);
    fs::write(alice.join(FILE), "@misc{z, title = {Z}}\n").unwrap();
    git(alice, &["add", FILE]);
    git(alice, &["commit", "-m", "Unrelated root"]);
    git(alice, &["branch", "--set-upstream-to=origin/main"]);

    let repo = Repository::open(alice).unwrap();
    let triple = locate_merge_commits(&repo).unwrap();

    assert_eq!(triple.base, None);
    assert_eq!(triple.remote, oid(&fx.remote_head()));
}

#[test]
fn test_read_file_from_older_commit() {
    let fx = RemoteFixture::new(FILE, SEED);
    let seed = oid(&fx.head(fx.alice()));
    fx.commit(fx.alice(), "@misc{a, title = {Later}}\n", "Edit");

    let repo = Repository::open(fx.alice()).unwrap();
    let content = read_file_from_commit(&repo, seed, &NormalizedPath::new(FILE)).unwrap();

    assert_eq!(content.as_deref(), Some(SEED));
}

#[test]
fn test_read_missing_path_is_none() {
    let fx = RemoteFixture::new(FILE, SEED);
    let repo = Repository::open(fx.alice()).unwrap();
    let head = oid(&fx.head(fx.alice()));

    let content = read_file_from_commit(&repo, head, &NormalizedPath::new("absent.bib")).unwrap();
    assert_eq!(content, None);
}

#[test]
fn test_read_nested_path_and_directory() {
    let fx = RemoteFixture::new(FILE, SEED);
    let alice = fx.alice();
    fs::create_dir_all(alice.join("refs")).unwrap();
    fs::write(alice.join("refs/nested.bib"), SEED).unwrap();
    git(alice, &["add", "refs/nested.bib"]);
    git(alice, &["commit", "-m", "Nested"]);

    let repo = Repository::open(alice).unwrap();
    let head = oid(&fx.head(alice));

    let nested = read_file_from_commit(&repo, head, &NormalizedPath::new("refs/nested.bib"));
    assert_eq!(nested.unwrap().as_deref(), Some(SEED));

    let err = read_file_from_commit(&repo, head, &NormalizedPath::new("refs")).unwrap_err();
    assert!(matches!(err, Error::NotAFile { .. }));
}

#[test]
fn test_file_history_skips_unrelated_commits() {
    let fx = RemoteFixture::new(FILE, SEED);
    fx.commit_other(fx.alice(), "README.md", "# Library", "Readme");
    fx.commit(fx.alice(), "@misc{a, title = {B}}\n", "Retitle a");

    let repo = Repository::open(fx.alice()).unwrap();
    let history = list_file_history(&repo, &NormalizedPath::new(FILE), 10).unwrap();

    let messages: Vec<&str> = history.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["Retitle a", "Seed database"]);
    assert_eq!(history[0].author, "alice");
    assert_eq!(history[0].hash.len(), 7);
}
