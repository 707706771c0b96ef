//! [`RemoteFixture`]: a bare "remote" repository with two working clones.
//!
//! The two clones (`alice` and `bob`) both track `origin/main`, which makes
//! it easy to drive a clone into ahead/behind/diverged states.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git::{configure_identity, git};

/// A bare remote seeded with one database file, plus two clones.
pub struct RemoteFixture {
    _temp_dir: TempDir,
    remote: PathBuf,
    alice: PathBuf,
    bob: PathBuf,
    file_name: String,
}

impl RemoteFixture {
    /// Create the remote with `file_name` containing `content` on `main`,
    /// then clone it twice.
    pub fn new(file_name: &str, content: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let remote = root.join("remote.git");
        fs::create_dir_all(&remote).unwrap();
        git(&remote, &["init", "--bare"]);
        git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        let seed = root.join("seed");
        fs::create_dir_all(&seed).unwrap();
        git(&seed, &["init"]);
        git(&seed, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        configure_identity(&seed, "Seed");
        fs::write(seed.join(file_name), content).unwrap();
        git(&seed, &["add", "."]);
        git(&seed, &["commit", "-m", "Seed database"]);
        git(&seed, &["remote", "add", "origin", &remote.to_string_lossy()]);
        git(&seed, &["push", "-u", "origin", "main"]);

        let alice = Self::clone_into(root, &remote, "alice");
        let bob = Self::clone_into(root, &remote, "bob");

        Self {
            _temp_dir: temp_dir,
            remote,
            alice,
            bob,
            file_name: file_name.to_string(),
        }
    }

    fn clone_into(root: &Path, remote: &Path, name: &str) -> PathBuf {
        git(root, &["clone", &remote.to_string_lossy(), name]);
        let path = root.join(name);
        configure_identity(&path, name);
        path
    }

    /// Path of the bare remote.
    pub fn remote(&self) -> &Path {
        &self.remote
    }

    /// Work tree of the first clone.
    pub fn alice(&self) -> &Path {
        &self.alice
    }

    /// Work tree of the second clone.
    pub fn bob(&self) -> &Path {
        &self.bob
    }

    /// Absolute path of the database file inside `clone`.
    pub fn file(&self, clone: &Path) -> PathBuf {
        clone.join(&self.file_name)
    }

    /// Read the database file inside `clone`.
    pub fn read(&self, clone: &Path) -> String {
        fs::read_to_string(self.file(clone)).unwrap()
    }

    /// Overwrite the database file inside `clone` without committing.
    pub fn write(&self, clone: &Path, content: &str) {
        fs::write(self.file(clone), content).unwrap();
    }

    /// Overwrite the database file inside `clone` and commit it.
    pub fn commit(&self, clone: &Path, content: &str, message: &str) {
        self.write(clone, content);
        git(clone, &["add", &self.file_name]);
        git(clone, &["commit", "-m", message]);
    }

    /// Write and commit an unrelated file inside `clone`.
    pub fn commit_other(&self, clone: &Path, name: &str, content: &str, message: &str) {
        fs::write(clone.join(name), content).unwrap();
        git(clone, &["add", name]);
        git(clone, &["commit", "-m", message]);
    }

    /// Push `clone`'s main to the remote.
    pub fn push(&self, clone: &Path) {
        git(clone, &["push", "origin", "main"]);
    }

    /// Update `clone`'s remote-tracking refs.
    pub fn fetch(&self, clone: &Path) {
        git(clone, &["fetch", "origin"]);
    }

    /// Commit id of `clone`'s HEAD.
    pub fn head(&self, clone: &Path) -> String {
        git(clone, &["rev-parse", "HEAD"])
    }

    /// Commit id of `main` on the bare remote.
    pub fn remote_head(&self) -> String {
        git(&self.remote, &["rev-parse", "refs/heads/main"])
    }

    /// Number of commits reachable from `clone`'s HEAD.
    pub fn commit_count(&self, clone: &Path) -> usize {
        git(clone, &["rev-list", "--count", "HEAD"]).parse().unwrap()
    }
}
