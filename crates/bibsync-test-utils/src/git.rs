//! Git repository fixtures built with the `git` CLI.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `git` with `args` inside `dir` and return trimmed stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits unsuccessfully.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Configure a deterministic identity for commits made in `dir`.
pub fn configure_identity(dir: &Path, name: &str) {
    git(dir, &["config", "user.email", &format!("{}@test.com", name.to_lowercase().replace(' ', "."))]);
    git(dir, &["config", "user.name", name]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Initialises a real git repository using `git2` (no commit, no config).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a repository on `main` with `file` committed.
///
/// No remote is configured, so the branch has no tracking information.
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_file(path: &Path, file: &str, content: &str) {
    git(path, &["init"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    configure_identity(path, "Test User");

    fs::write(path.join(file), content)
        .unwrap_or_else(|e| panic!("real_git_repo_with_file: failed to write {file}: {e}"));

    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
}
