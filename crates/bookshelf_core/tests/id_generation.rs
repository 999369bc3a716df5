use bookshelf_core::db::{open_db, open_db_in_memory};
use bookshelf_core::{BookDraft, BookRepository, SqliteBookRepository};
use std::collections::HashSet;
use std::thread;

#[test]
fn sequential_creates_yield_dense_ids_from_one() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    for expected in 1..=5 {
        let id = repo.create_book(&BookDraft::default()).unwrap();
        assert_eq!(id, expected);
    }
}

#[test]
fn next_id_follows_current_max() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    assert_eq!(repo.create_book(&BookDraft::default()).unwrap(), 1);
    assert_eq!(repo.create_book(&BookDraft::default()).unwrap(), 2);

    // Max-based generation: removing the highest row frees its id.
    repo.delete_book(2).unwrap();
    assert_eq!(repo.create_book(&BookDraft::default()).unwrap(), 2);
}

#[test]
fn concurrent_creates_never_collide() {
    const WRITERS: i64 = 4;
    const CREATES_PER_WRITER: i64 = 5;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookshelf.db");

    // Provision once up front so worker connections skip migration writes.
    drop(open_db(&path).unwrap());

    let mut ids: Vec<i64> = Vec::new();
    thread::scope(|scope| {
        let mut handles = Vec::new();
        for writer in 0..WRITERS {
            let path = path.clone();
            handles.push(scope.spawn(move || {
                let conn = open_db(&path).unwrap();
                let repo = SqliteBookRepository::try_new(&conn).unwrap();
                let mut assigned = Vec::new();
                for n in 0..CREATES_PER_WRITER {
                    let draft = BookDraft {
                        title: Some(format!("writer {writer} book {n}")),
                        ..BookDraft::default()
                    };
                    assigned.push(repo.create_book(&draft).unwrap());
                }
                assigned
            }));
        }
        for handle in handles {
            ids.extend(handle.join().unwrap());
        }
    });

    let unique: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate id assigned: {ids:?}");

    let expected: HashSet<i64> = (1..=WRITERS * CREATES_PER_WRITER).collect();
    assert_eq!(unique, expected);
}
