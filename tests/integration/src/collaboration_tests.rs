//! Collaboration scenarios
//!
//! Two clones of one remote sync a shared database through the public
//! library API, the way two users running `bibsync fetch/pull/push` would.

use std::path::Path;

use bibsync_core::{GitSyncService, PullOutcome, PushOutcome, SyncConfig};
use bibsync_fs::NormalizedPath;
use bibsync_git::{GitHandler, SyncStatus, VersionControl, check_status, read_file_from_commit};
use bibsync_merge::{ConflictResolutionStrategy, PreferSide, SemanticMergeExecutor};
use bibsync_model::{BibtexFormat, RecordFormat, RecordSet};
use bibsync_test_utils::RemoteFixture;
use git2::Repository;
use pretty_assertions::assert_eq;

const FILE: &str = "shared.bib";

const SEED: &str = "\
@String{acm = {ACM Press}}

@Article{Smith2020,
  author = {Jane Smith},
  title = {Original Title},
  year = {2020},
}

@Book{Doe2019,
  publisher = acm,
  title = {A Book},
}
";

// =============================================================================
// Test Infrastructure
// =============================================================================

fn service<S: ConflictResolutionStrategy>(
    clone: &Path,
    strategy: S,
) -> GitSyncService<GitHandler, S, BibtexFormat> {
    let config = SyncConfig::default();
    let executor = SemanticMergeExecutor::new(BibtexFormat::new(config.import.clone()));
    GitSyncService::new(config, GitHandler::new(clone), strategy, executor)
}

fn fetch(clone: &Path) {
    GitHandler::new(clone).fetch_current_branch().unwrap();
}

fn parse(text: &str) -> RecordSet {
    BibtexFormat::default().parse(text).unwrap()
}

fn database(fixture: &RemoteFixture, clone: &Path) -> RecordSet {
    parse(&fixture.read(clone))
}

fn field<'a>(db: &'a RecordSet, key: &str, name: &str) -> Option<&'a str> {
    db.find_by_key(key).and_then(|record| record.field(name))
}

// =============================================================================
// Round trips
// =============================================================================

mod round_trips {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn edits_on_both_clones_converge() {
        let fixture = RemoteFixture::new(FILE, SEED);
        let (alice, bob) = (fixture.alice(), fixture.bob());

        // Alice changes the year and adds a record, then pushes
        fixture.write(
            alice,
            &SEED
                .replace("year = {2020}", "year = {2021}")
                .replace("@Book{Doe2019", "@Misc{Lee2022,\n  note = {new},\n}\n\n@Book{Doe2019"),
        );
        assert_eq!(
            service(alice, PreferSide::local()).push(&fixture.file(alice)).unwrap(),
            PushOutcome::Pushed { committed: true }
        );

        // Bob changes the title of the same record concurrently
        fixture.commit(
            bob,
            &SEED.replace("Original Title", "Better Title"),
            "Retitle Smith2020",
        );
        fetch(bob);
        assert_eq!(check_status(&fixture.file(bob)).sync_status, SyncStatus::Diverged);
        assert_eq!(
            service(bob, PreferSide::local()).push(&fixture.file(bob)).unwrap(),
            PushOutcome::Pushed { committed: true }
        );

        // Alice picks up Bob's merge
        fetch(alice);
        let outcome = service(alice, PreferSide::local())
            .fetch_and_merge(&fixture.file(alice))
            .unwrap();
        assert!(matches!(outcome, PullOutcome::Merged { .. }));

        let alice_db = database(&fixture, alice);
        let bob_db = database(&fixture, bob);
        assert_eq!(alice_db.len(), bob_db.len());
        for key in ["Smith2020", "Doe2019", "Lee2022"] {
            assert_eq!(alice_db.find_by_key(key), bob_db.find_by_key(key), "record {key}");
        }
        assert_eq!(field(&alice_db, "Smith2020", "title"), Some("Better Title"));
        assert_eq!(field(&alice_db, "Smith2020", "year"), Some("2021"));
        assert_eq!(field(&alice_db, "Lee2022", "note"), Some("new"));
        assert_eq!(alice_db.strings().get("acm").map(String::as_str), Some("ACM Press"));
    }

    #[test]
    fn deletion_propagates_to_other_clone() {
        let fixture = RemoteFixture::new(FILE, SEED);
        let (alice, bob) = (fixture.alice(), fixture.bob());

        let without_book = SEED.split("@Book").next().unwrap().trim_end().to_string() + "\n";
        fixture.commit(bob, &without_book, "Remove Doe2019");
        fixture.push(bob);

        fetch(alice);
        let outcome = service(alice, PreferSide::remote())
            .fetch_and_merge(&fixture.file(alice))
            .unwrap();

        assert!(outcome.is_success());
        let db = database(&fixture, alice);
        assert!(db.find_by_key("Doe2019").is_none());
        assert!(db.find_by_key("Smith2020").is_some());
    }

    #[test]
    fn reformatting_does_not_conflict_with_edits() {
        let fixture = RemoteFixture::new(FILE, SEED);
        let (alice, bob) = (fixture.alice(), fixture.bob());

        // Bob only reformats: different spacing, quoting and field order
        let reformatted = "\
@string{acm = \"ACM Press\"}
@article{Smith2020, year = 2020, title = \"Original   Title\", author = {Jane Smith}}
@book{Doe2019, title = {A Book}, publisher = acm}
";
        fixture.commit(bob, reformatted, "Reformat");
        fixture.push(bob);

        fixture.commit(
            alice,
            &SEED.replace("Original Title", "Edited Title"),
            "Edit title",
        );
        fetch(alice);

        let outcome = service(alice, bibsync_merge::CancelResolution)
            .fetch_and_merge(&fixture.file(alice))
            .unwrap();

        assert!(matches!(outcome, PullOutcome::Merged { .. }));
        assert_eq!(field(&database(&fixture, alice), "Smith2020", "title"), Some("Edited Title"));
    }
}

// =============================================================================
// Conflicts
// =============================================================================

mod conflicts {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn preferred_side_wins_only_for_conflicting_fields() {
        let fixture = RemoteFixture::new(FILE, SEED);
        let (alice, bob) = (fixture.alice(), fixture.bob());

        fixture.commit(
            bob,
            &SEED
                .replace("Original Title", "Bob Title")
                .replace("year = {2020}", "year = {2022}"),
            "Bob edits",
        );
        fixture.push(bob);
        fixture.commit(
            alice,
            &SEED
                .replace("Original Title", "Alice Title")
                .replace("Jane Smith", "J. Smith"),
            "Alice edits",
        );
        fetch(alice);

        let preview = service(alice, PreferSide::local())
            .preview_conflicts(&fixture.file(alice))
            .unwrap();
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].fields, vec!["title".to_string()]);

        service(alice, PreferSide::local())
            .fetch_and_merge(&fixture.file(alice))
            .unwrap();

        let db = database(&fixture, alice);
        assert_eq!(field(&db, "Smith2020", "title"), Some("Alice Title"));
        assert_eq!(field(&db, "Smith2020", "author"), Some("J. Smith"));
        assert_eq!(field(&db, "Smith2020", "year"), Some("2022"));
    }

    #[test]
    fn merge_commit_records_both_histories() {
        let fixture = RemoteFixture::new(FILE, SEED);
        let (alice, bob) = (fixture.alice(), fixture.bob());

        fixture.commit(bob, &SEED.replace("A Book", "B Book"), "Bob edits");
        fixture.push(bob);
        fixture.commit(alice, &SEED.replace("Jane Smith", "J. Smith"), "Alice edits");
        let alice_head = fixture.head(alice);
        fetch(alice);

        let PullOutcome::Merged { commit } = service(alice, PreferSide::remote())
            .fetch_and_merge(&fixture.file(alice))
            .unwrap()
        else {
            panic!("expected a merge");
        };

        let repo = Repository::open(alice).unwrap();
        let merge = repo.find_commit(commit).unwrap();
        assert_eq!(merge.parent_count(), 2);
        assert_eq!(merge.parent_id(0).unwrap().to_string(), alice_head);
        assert_eq!(merge.parent_id(1).unwrap().to_string(), fixture.remote_head());

        let committed = read_file_from_commit(&repo, commit, &NormalizedPath::new(FILE))
            .unwrap()
            .unwrap();
        assert_eq!(parse(&committed), database(&fixture, alice));
        assert_eq!(check_status(&fixture.file(alice)).sync_status, SyncStatus::Ahead);
    }
}
