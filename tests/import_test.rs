//! End-to-end imports from archive files into a scratch `SQLite` store.

use std::fs;
use std::path::{Path, PathBuf};

use conch_import::memory::{EpisodeStore, MemoryKind};
use conch_import::{
    ImportConfig, ImportMode, MemoryError, SelectionConfig, StorageConfig, import_file,
};
use rusqlite::Connection;
use serde_json::{Value, json};
use tempfile::TempDir;

fn write_archive(dir: &TempDir, archive: &Value) -> PathBuf {
    let path = dir.path().join("conversations.json");
    fs::write(&path, serde_json::to_string_pretty(archive).unwrap()).unwrap();
    path
}

fn config(db: &Path, selection: SelectionConfig) -> ImportConfig {
    ImportConfig {
        selection,
        storage: StorageConfig::at(db),
    }
}

fn episodes(db: &Path) -> Vec<(String, String, String)> {
    let conn = Connection::open(db).unwrap();
    let mut stmt = conn
        .prepare("SELECT episode_text, created_at, last_accessed_at FROM memories ORDER BY id")
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn message(role: &str, text: &str) -> Value {
    json!({"message": {
        "author": {"role": role},
        "content": {"content_type": "text", "parts": [text]},
        "create_time": 1_700_000_000.25,
    }})
}

#[test]
fn test_importance_mode_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_archive(
        &dir,
        &json!([{
            "title": "Trip",
            "create_time": 1_690_000_000,
            "mapping": {
                "root": {"message": null, "children": ["m1"]},
                "m1": message("user", "remember to book flights by Friday"),
            }
        }]),
    );
    let db = dir.path().join("store").join("memory.db");

    let strict = config(&db, SelectionConfig::new().with_mode(ImportMode::important()));
    let report = import_file(&archive, &strict).unwrap();
    assert_eq!((report.scanned, report.kept), (1, 0));
    assert!(episodes(&db).is_empty());

    let lenient = config(
        &db,
        SelectionConfig::new().with_mode(ImportMode::Important { min_score: 2 }),
    );
    let report = import_file(&archive, &lenient).unwrap();
    assert_eq!((report.scanned, report.kept), (1, 1));
    assert_eq!(
        episodes(&db),
        vec![(
            "[Trip] [user] remember to book flights by Friday".to_string(),
            "2023-11-14T22:13:20Z".to_string(),
            "2023-11-14T22:13:20Z".to_string(),
        )]
    );
}

#[test]
fn test_full_mode_with_and_without_assistant() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_archive(
        &dir,
        &json!([{
            "title": "Chat",
            "mapping": {
                "a": message("user", "what should I cook tonight"),
                "b": message("assistant", "try a mushroom risotto"),
            }
        }]),
    );

    let user_db = dir.path().join("user.db");
    let report = import_file(&archive, &config(&user_db, SelectionConfig::new())).unwrap();
    assert_eq!(report.kept, 1);
    assert_eq!(episodes(&user_db)[0].0, "what should I cook tonight");

    let both_db = dir.path().join("both.db");
    let selection = SelectionConfig::new().with_include_assistant(true);
    let report = import_file(&archive, &config(&both_db, selection)).unwrap();
    assert_eq!(report.kept, 2);
    assert_eq!(episodes(&both_db).len(), 2);
}

#[test]
fn test_repeated_runs_append() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_archive(
        &dir,
        &json!([{"title": "A", "mapping": {"a": message("user", "hello")}}]),
    );
    let db = dir.path().join("memory.db");
    let config = config(&db, SelectionConfig::new());

    import_file(&archive, &config).unwrap();
    import_file(&archive, &config).unwrap();

    let mut store = EpisodeStore::open(&config.storage).unwrap();
    store.ensure_schema().unwrap();
    assert_eq!(store.count_by_kind(MemoryKind::Episode).unwrap(), 2);
    assert_eq!(store.count_missing_embeddings().unwrap(), 2);
    let writer = store.begin().unwrap();
    assert_eq!(writer.commit().unwrap(), 0);
}

#[test]
fn test_non_array_archive_fails_before_store_access() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_archive(&dir, &json!({"conversations": []}));
    let db = dir.path().join("never").join("memory.db");

    let err = import_file(&archive, &config(&db, SelectionConfig::new())).unwrap_err();
    assert!(matches!(err, MemoryError::InvalidArchive(_)));
    assert!(!db.exists());
    assert!(!db.parent().unwrap().exists());
}

#[test]
fn test_invalid_json_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conversations.json");
    fs::write(&path, "[{\"title\": ").unwrap();
    let db = dir.path().join("memory.db");

    let err = import_file(&path, &config(&db, SelectionConfig::new())).unwrap_err();
    assert!(matches!(err, MemoryError::Serialization(_)));
    assert!(!db.exists());
}

#[test]
fn test_missing_archive_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("memory.db");
    let err = import_file(
        &dir.path().join("missing.json"),
        &config(&db, SelectionConfig::new()),
    )
    .unwrap_err();
    assert!(matches!(err, MemoryError::Io(_)));
}

#[test]
fn test_storage_failure_rolls_back_whole_run() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_archive(
        &dir,
        &json!([{"title": "A", "mapping": {
            "a": message("user", "first"),
            "b": message("user", "second"),
        }}]),
    );
    let db = dir.path().join("memory.db");

    // A pre-existing table that refuses the second body.
    let conn = Connection::open(&db).unwrap();
    conn.execute_batch(
        "CREATE TABLE memories (id INTEGER PRIMARY KEY, kind TEXT NOT NULL,
            episode_text TEXT CHECK(episode_text <> 'second'), strength REAL, embedding BLOB,
            created_at TEXT, last_accessed_at TEXT, access_count INTEGER, subject TEXT)",
    )
    .unwrap();
    drop(conn);

    let err = import_file(&archive, &config(&db, SelectionConfig::new())).unwrap_err();
    assert!(err.is_storage());
    assert!(episodes(&db).is_empty());
}

#[test]
fn test_cap_processes_only_first_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_archive(
        &dir,
        &json!([
            {"title": "one", "mapping": {}},
            {"title": "two", "mapping": {"a": message("user", "hello")}},
            {"title": "three", "mapping": {"a": message("user", "world")}},
        ]),
    );
    let db = dir.path().join("memory.db");

    let selection = SelectionConfig::new().with_max_conversations(1);
    let report = import_file(&archive, &config(&db, selection)).unwrap();
    assert_eq!(report.conversations, 1);
    assert_eq!(report.kept, 0);
}

#[test]
fn test_invalid_threshold_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_archive(&dir, &json!([]));
    let db = dir.path().join("memory.db");
    let selection = SelectionConfig::new().with_mode(ImportMode::Important { min_score: 9 });

    let err = import_file(&archive, &config(&db, selection)).unwrap_err();
    assert!(matches!(err, MemoryError::InvalidConfig(_)));
}
