use library_book_manager::{
    BookDraft, BookRepository, DatabaseConfig, Session, SqliteBookRepository, StorageError,
};
use tempfile::TempDir;

fn open_repo() -> (TempDir, SqliteBookRepository) {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = SqliteBookRepository::new(DatabaseConfig::default(), dir.path());
    repo.connect().unwrap();
    (dir, repo)
}

fn dune() -> BookDraft {
    BookDraft::new("Dune", "Frank Herbert", "Sci-Fi")
        .published(1965)
        .isbn("9780441013593")
}

fn titles(repo: &SqliteBookRepository) -> Vec<String> {
    repo.list_all()
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect()
}

#[test]
fn dune_walkthrough() {
    let (_dir, mut repo) = open_repo();

    let id = repo.create(&dune()).unwrap();
    assert_eq!(id, 1);

    let all = repo.list_all().unwrap();
    assert_eq!(all, vec![dune().into_book(1)]);

    assert_eq!(repo.search("dune").unwrap(), all);
    assert_eq!(repo.search("herbert").unwrap(), all);
    assert!(repo.search("xyz").unwrap().is_empty());

    assert!(repo.delete(1).unwrap());
    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn database_file_is_named_after_config() {
    let dir = tempfile::tempdir().unwrap();
    let repo = SqliteBookRepository::new(DatabaseConfig::default(), dir.path());
    assert_eq!(repo.path(), dir.path().join("librarydb.sqlite"));
}

#[test]
fn created_book_survives_reconnect() {
    let (_dir, mut repo) = open_repo();
    let id = repo.create(&dune()).unwrap();

    repo.disconnect();
    assert!(!repo.is_connected());
    repo.connect().unwrap();

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].isbn.as_deref(), Some("9780441013593"));
}

#[test]
fn connect_is_idempotent() {
    let (_dir, mut repo) = open_repo();
    repo.create(&dune()).unwrap();
    repo.connect().unwrap();
    assert_eq!(titles(&repo), vec!["Dune"]);
}

#[test]
fn operations_without_session_fail_with_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = SqliteBookRepository::new(DatabaseConfig::default(), dir.path());

    assert!(matches!(repo.list_all(), Err(StorageError::Connection(_))));
    assert!(matches!(repo.create(&dune()), Err(StorageError::Connection(_))));

    repo.disconnect();
    repo.disconnect();
}

#[test]
fn session_disconnects_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = SqliteBookRepository::new(DatabaseConfig::default(), dir.path());

    {
        let mut session = Session::open(&mut repo).unwrap();
        session.create(&dune()).unwrap();
        assert!(session.is_connected());
    }
    assert!(!repo.is_connected());

    let count = Session::open(&mut repo)
        .and_then(|session| session.list_all())
        .unwrap()
        .len();
    assert_eq!(count, 1);
    assert!(!repo.is_connected());
}

#[test]
fn list_and_search_are_ordered_by_title() {
    let (_dir, mut repo) = open_repo();
    for title in ["Neuromancer", "Anathem", "Hyperion", "Foundation"] {
        repo.create(&BookDraft::new(title, "Someone", "Sci-Fi")).unwrap();
    }

    let listed = titles(&repo);
    let mut expected = listed.clone();
    expected.sort();
    assert_eq!(listed, expected);
    assert_eq!(listed, vec!["Anathem", "Foundation", "Hyperion", "Neuromancer"]);

    let searched: Vec<String> = repo
        .search("sci")
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(searched, listed);
}

#[test]
fn title_ordering_ignores_case() {
    let (_dir, mut repo) = open_repo();
    for title in ["apple", "Banana", "cherry", "Zebra"] {
        repo.create(&BookDraft::new(title, "Someone", "Fruit")).unwrap();
    }

    let expected = vec!["apple", "Banana", "cherry", "Zebra"];
    assert_eq!(titles(&repo), expected);

    // Every row matches through the author column.
    let searched: Vec<String> = repo
        .search("some")
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(searched, expected);
}

#[test]
fn search_matches_any_of_title_author_genre_case_insensitively() {
    let (_dir, mut repo) = open_repo();
    repo.create(&BookDraft::new("The Hobbit", "J.R.R. Tolkien", "Fantasy"))
        .unwrap();
    repo.create(&BookDraft::new("Emma", "Jane Austen", "Classic"))
        .unwrap();
    repo.create(&BookDraft::new("Fantastic Mr Fox", "Roald Dahl", "Children"))
        .unwrap();

    let hits = |term: &str| -> Vec<String> {
        repo.search(term)
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect()
    };

    assert_eq!(hits("HOBBIT"), vec!["The Hobbit"]);
    assert_eq!(hits("austen"), vec!["Emma"]);
    assert_eq!(hits("fanta"), vec!["Fantastic Mr Fox", "The Hobbit"]);
    assert_eq!(hits("classic"), vec!["Emma"]);
    assert!(hits("zzz").is_empty());
}

#[test]
fn update_replaces_fields_of_one_row_only() {
    let (_dir, mut repo) = open_repo();
    let dune_id = repo.create(&dune()).unwrap();
    let emma_id = repo
        .create(&BookDraft::new("Emma", "Jane Austen", "Classic"))
        .unwrap();

    let revised = BookDraft::new("Dune Messiah", "Frank Herbert", "Science Fiction").published(1969);
    assert!(repo.update(dune_id, &revised).unwrap());

    let all = repo.list_all().unwrap();
    assert_eq!(
        all,
        vec![
            revised.into_book(dune_id),
            BookDraft::new("Emma", "Jane Austen", "Classic").into_book(emma_id),
        ]
    );
}

#[test]
fn update_missing_id_reports_no_match() {
    let (_dir, mut repo) = open_repo();
    repo.create(&dune()).unwrap();

    assert!(!repo.update(42, &dune()).unwrap());
    assert_eq!(repo.list_all().unwrap(), vec![dune().into_book(1)]);
}

#[test]
fn delete_missing_id_leaves_other_rows() {
    let (_dir, mut repo) = open_repo();
    repo.create(&dune()).unwrap();

    assert!(!repo.delete(99).unwrap());
    assert_eq!(titles(&repo), vec!["Dune"]);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let (_dir, mut repo) = open_repo();
    let first = repo.create(&dune()).unwrap();
    repo.delete(first).unwrap();
    let second = repo.create(&dune()).unwrap();
    assert!(second > first);
}

#[test]
fn constraint_violation_is_a_query_error() {
    let (_dir, mut repo) = open_repo();
    let err = repo
        .create(&BookDraft::new("Untitled", "", "Misc"))
        .unwrap_err();
    assert!(matches!(err, StorageError::Query(_)));
    assert!(repo.list_all().unwrap().is_empty());
}
