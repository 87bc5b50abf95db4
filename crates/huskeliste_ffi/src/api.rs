//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the to-do board use-cases to Dart via FRB.
//! - Keep error semantics simple for the UI: envelopes and fallbacks,
//!   never exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Storage trouble falls back to the seed board on reads and to an
//!   unchanged board on writes; both are reported in the response
//!   message.

use huskeliste_core::db::open_db;
use huskeliste_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Collection, SqliteCollectionRepository, TodoService,
};
use log::error;
use std::path::PathBuf;
use std::sync::OnceLock;

const BOARD_DB_FILE_NAME: &str = "huskeliste_board.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return
///   an error message.
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One to-do item as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemView {
    /// Stable item id.
    pub id: i64,
    /// Entry text exactly as submitted.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
}

/// One list as rendered by the tab strip and item pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListView {
    /// Stable list id.
    pub id: i64,
    /// Tab display name.
    pub name: String,
    /// Items, newest first.
    pub todos: Vec<TodoItemView>,
}

/// Full board state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Lists in tab display order.
    pub lists: Vec<TodoListView>,
    /// Id of the currently active list.
    pub active_list: i64,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Action response envelope for board mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    /// Whether the board changed.
    pub ok: bool,
    /// Created item id (add only).
    pub item_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TodoActionResponse {
    fn applied(message: impl Into<String>, item_id: Option<i64>) -> Self {
        Self {
            ok: true,
            item_id,
            message: message.into(),
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

/// Loads the full board for rendering.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics.
/// - Storage trouble falls back to the seed board; the message says so.
#[flutter_rust_bridge::frb(sync)]
pub fn load_board() -> BoardSnapshot {
    match with_board_service(|service| board_snapshot(service.collection(), "Board loaded.")) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!("event=load_board module=ffi status=error fallback=seed error={err}");
            board_snapshot(
                &Collection::seed(),
                format!("load_board fell back to seed: {err}"),
            )
        }
    }
}

/// Adds one item to the active list.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics.
/// - Empty text after trimming changes nothing (`ok = false`).
#[flutter_rust_bridge::frb(sync)]
pub fn board_add_todo(text: String) -> TodoActionResponse {
    match with_board_service(|service| service.add_todo(&text)) {
        Ok(Some(item_id)) => TodoActionResponse::applied("Todo added.", Some(item_id)),
        Ok(None) => TodoActionResponse::unchanged("Empty text ignored."),
        Err(err) => TodoActionResponse::unchanged(format!("board_add_todo failed: {err}")),
    }
}

/// Inverts the completion flag of one item in the active list.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics.
/// - Ids naming no item in the active list change nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn board_toggle_todo(item_id: i64) -> TodoActionResponse {
    match with_board_service(|service| service.toggle_todo(item_id)) {
        Ok(true) => TodoActionResponse::applied("Todo toggled.", None),
        Ok(false) => TodoActionResponse::unchanged("No such todo in the active list."),
        Err(err) => TodoActionResponse::unchanged(format!("board_toggle_todo failed: {err}")),
    }
}

/// Switches the active list.
///
/// # FFI contract
/// - Sync call, store-backed execution.
/// - Never panics.
/// - Ids naming no list are refused (`ok = false`).
#[flutter_rust_bridge::frb(sync)]
pub fn board_select_list(list_id: i64) -> TodoActionResponse {
    match with_board_service(|service| service.select_list(list_id)) {
        Ok(true) => TodoActionResponse::applied("List selected.", None),
        Ok(false) => TodoActionResponse::unchanged("No such list, or already active."),
        Err(err) => TodoActionResponse::unchanged(format!("board_select_list failed: {err}")),
    }
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("HUSKELISTE_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

fn with_board_service<T>(
    f: impl FnOnce(&mut TodoService<SqliteCollectionRepository<'_>>) -> T,
) -> Result<T, String> {
    let db_path = resolve_board_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("board db open failed: {err}"))?;
    let repo = SqliteCollectionRepository::try_new(&conn)
        .map_err(|err| format!("board repo init failed: {err}"))?;
    let mut service = TodoService::open(repo);
    Ok(f(&mut service))
}

fn board_snapshot(collection: &Collection, message: impl Into<String>) -> BoardSnapshot {
    BoardSnapshot {
        lists: collection
            .lists
            .iter()
            .map(|list| TodoListView {
                id: list.id,
                name: list.name.clone(),
                todos: list
                    .todos
                    .iter()
                    .map(|todo| TodoItemView {
                        id: todo.id,
                        text: todo.text.clone(),
                        completed: todo.completed,
                    })
                    .collect(),
            })
            .collect(),
        active_list: collection.active_list,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        board_add_todo, board_select_list, board_toggle_todo, core_version, init_logging,
        load_board, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_with_blank_text_changes_nothing() {
        let response = board_add_todo("   ".to_string());
        assert!(!response.ok);
        assert_eq!(response.item_id, None);
    }

    #[test]
    fn toggle_with_unknown_id_changes_nothing() {
        let response = board_toggle_todo(-1);
        assert!(!response.ok);
    }

    #[test]
    fn select_with_unknown_id_is_refused() {
        let response = board_select_list(999);
        assert!(!response.ok);
    }

    // The board functions share one on-disk store per process, so the
    // mutating steps live in a single sequential test.
    #[test]
    fn board_flow_adds_toggles_and_persists() {
        // Pin the active list first; earlier runs may have left another
        // tab selected.
        board_select_list(1);

        let token = unique_token("flow");
        let added = board_add_todo(format!("kjøp {token}"));
        assert!(added.ok, "{}", added.message);
        let item_id = added.item_id.expect("add should return the item id");

        let board = load_board();
        assert_eq!(board.active_list, 1);
        let active = board
            .lists
            .iter()
            .find(|list| list.id == board.active_list)
            .expect("active list should be present");
        assert_eq!(active.todos.first().map(|item| item.id), Some(item_id));
        let item = &active.todos[0];
        assert!(item.text.contains(&token));
        assert!(!item.completed);

        let toggled = board_toggle_todo(item_id);
        assert!(toggled.ok, "{}", toggled.message);

        // The stored blob is plain JSON under the fixed key.
        let conn = rusqlite::Connection::open(super::resolve_board_db_path()).expect("open db");
        let raw: String = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [huskeliste_core::STORAGE_KEY],
                |row| row.get(0),
            )
            .expect("stored value should exist");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("stored value is JSON");
        let stored_item = value["lists"]
            .as_array()
            .and_then(|lists| {
                lists
                    .iter()
                    .find(|list| list["id"] == serde_json::json!(1))
            })
            .and_then(|list| list["todos"].as_array())
            .and_then(|todos| {
                todos
                    .iter()
                    .find(|todo| todo["id"] == serde_json::json!(item_id))
            })
            .expect("item should be persisted")
            .clone();
        assert_eq!(stored_item["completed"], serde_json::json!(true));

        // Switching tabs persists the selector too.
        let selected = board_select_list(2);
        assert!(selected.ok, "{}", selected.message);
        assert_eq!(load_board().active_list, 2);
        board_select_list(1);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
