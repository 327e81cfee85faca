//! Database operations for the flashcard application
//!
//! Handles SQLite initialization, card CRUD, the simulated current date,
//! review recording through the SM-2 scheduler, and persisted settings.

use crate::error::{FlashcardError, Result};
use crate::models::{Card, CardDraft, Rating, ReviewState, Settings};
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

const CARD_COLUMNS: &str = "id, front, back, category, chapter, tags, ease_factor, interval_days, \
     review_count, error_count, due_date, created_at, updated_at";

/// Opens (or creates) the database file and makes sure the schema exists
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path.as_ref())?;
    init_schema(&conn)?;
    info!("Opened card database at {}", path.as_ref().display());
    Ok(conn)
}

/// Creates the tables if they are missing
///
/// Sets the simulated current date to now on first run.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            chapter TEXT NOT NULL DEFAULT '',
            tags TEXT NOT NULL DEFAULT '',
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            review_count INTEGER NOT NULL DEFAULT 0,
            error_count INTEGER NOT NULL DEFAULT 0,
            due_date INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_cards_due_date ON cards(due_date)",
        (),
    )?;

    // Key/value table for the current date and settings
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
        params![Utc::now().timestamp().to_string()],
    )?;

    Ok(())
}

fn datetime_from_secs(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(FlashcardError::InvalidTimestamp(secs))
}

/// Reads a Unix-seconds column as a UTC timestamp
fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        front: row.get(1)?,
        back: row.get(2)?,
        category: row.get(3)?,
        chapter: row.get(4)?,
        tags: row.get(5)?,
        review: ReviewState {
            ease_factor: row.get(6)?,
            interval: row.get(7)?,
            review_count: row.get(8)?,
            error_count: row.get(9)?,
            due_date: timestamp_column(row, 10)?,
            updated_at: timestamp_column(row, 12)?,
        },
        created_at: timestamp_column(row, 11)?,
    })
}

/// Retrieves the simulated current date
pub fn get_current_date(conn: &Connection) -> Result<DateTime<Utc>> {
    let timestamp: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;

    let secs = timestamp
        .trim()
        .parse::<i64>()
        .map_err(|_| FlashcardError::InvalidStoredDate(timestamp.clone()))?;
    datetime_from_secs(secs)
}

/// Overwrites the simulated current date
pub fn set_current_date(date: DateTime<Utc>, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES ('current_date', ?1)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![date.timestamp().to_string()],
    )?;
    Ok(())
}

/// Advances the current date by 24 hours (for practising spaced repetition)
pub fn advance_day(conn: &Connection) -> Result<DateTime<Utc>> {
    let current = get_current_date(conn)?;
    let next_day = current
        .checked_add_signed(TimeDelta::days(1))
        .ok_or(FlashcardError::InvalidTimestamp(current.timestamp()))?;
    set_current_date(next_day, conn)?;
    info!("Advanced current date to {}", next_day.format("%Y-%m-%d"));
    Ok(next_day)
}

/// Adds a card with a fresh review state, due immediately
pub fn add_card(draft: &CardDraft, conn: &Connection) -> Result<Card> {
    draft.validate()?;
    let now = get_current_date(conn)?;
    let review = ReviewState::new(now);

    conn.execute(
        "INSERT INTO cards (front, back, category, chapter, tags, ease_factor, interval_days,
                            review_count, error_count, due_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            draft.front,
            draft.back,
            draft.category,
            draft.chapter,
            draft.tags,
            review.ease_factor,
            review.interval,
            review.review_count,
            review.error_count,
            review.due_date.timestamp(),
            now.timestamp(),
            review.updated_at.timestamp(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    info!("Card {} created", id);

    Ok(Card {
        id,
        front: draft.front.clone(),
        back: draft.back.clone(),
        category: draft.category.clone(),
        chapter: draft.chapter.clone(),
        tags: draft.tags.clone(),
        created_at: now,
        review,
    })
}

/// Replaces the content of a card; scheduling fields are left untouched
pub fn update_card_content(id: i64, draft: &CardDraft, conn: &Connection) -> Result<Card> {
    draft.validate()?;
    let now = get_current_date(conn)?;

    let changed = conn.execute(
        "UPDATE cards
         SET front = ?1, back = ?2, category = ?3, chapter = ?4, tags = ?5, updated_at = ?6
         WHERE id = ?7",
        params![
            draft.front,
            draft.back,
            draft.category,
            draft.chapter,
            draft.tags,
            now.timestamp(),
            id
        ],
    )?;

    if changed == 0 {
        return Err(FlashcardError::CardNotFound(id));
    }
    get_card(id, conn)
}

/// Deletes the given cards and returns how many were removed
pub fn delete_cards(ids: &[i64], conn: &Connection) -> Result<usize> {
    let mut stmt = conn.prepare("DELETE FROM cards WHERE id = ?1")?;
    let mut removed = 0;
    for id in ids {
        removed += stmt.execute(params![id])?;
    }
    info!("Deleted {} card(s)", removed);
    Ok(removed)
}

pub fn get_card(id: i64, conn: &Connection) -> Result<Card> {
    conn.query_row(
        &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
        params![id],
        card_from_row,
    )
    .optional()?
    .ok_or(FlashcardError::CardNotFound(id))
}

/// Retrieves every card, oldest first
pub fn get_all_cards(conn: &Connection) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(&format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY id"))?;
    let cards = stmt
        .query_map([], card_from_row)?
        .collect::<rusqlite::Result<Vec<Card>>>()?;
    Ok(cards)
}

/// Retrieves cards due for review
///
/// Returns cards where due_date <= current_date,
/// ordered by due_date (oldest first).
pub fn get_cards_due_for_review(conn: &Connection) -> Result<Vec<Card>> {
    let current_date = get_current_date(conn)?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {CARD_COLUMNS} FROM cards
         WHERE due_date <= ?1
         ORDER BY due_date ASC, id ASC"
    ))?;

    let cards = stmt
        .query_map(params![current_date.timestamp()], card_from_row)?
        .collect::<rusqlite::Result<Vec<Card>>>()?;

    Ok(cards)
}

/// Distinct non-empty category labels, sorted
pub fn list_categories(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT category FROM cards WHERE category <> '' ORDER BY category")?;
    let categories = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(categories)
}

/// Rates a card at the current date and stores the scheduler's result
///
/// Reading, scheduling and writing happen in one transaction so two reviews
/// of the same card can never start from the same state.
pub fn record_review(id: i64, rating: Rating, conn: &Connection) -> Result<Card> {
    let tx = conn.unchecked_transaction()?;

    let now = get_current_date(&tx)?;
    let card = get_card(id, &tx)?.reviewed(rating, now);
    let review = &card.review;

    tx.execute(
        "UPDATE cards
         SET ease_factor = ?1, interval_days = ?2, review_count = ?3, error_count = ?4,
             due_date = ?5, updated_at = ?6
         WHERE id = ?7",
        params![
            review.ease_factor,
            review.interval,
            review.review_count,
            review.error_count,
            review.due_date.timestamp(),
            review.updated_at.timestamp(),
            id
        ],
    )?;
    tx.commit()?;

    debug!(
        "Card {} rated {}: interval {}d, ease {:.2}",
        id, rating, review.interval, review.ease_factor
    );
    Ok(card)
}

/// Loads persisted settings, falling back to defaults
pub fn load_settings(conn: &Connection) -> Result<Settings> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = 'settings'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Settings::default()),
    }
}

pub fn save_settings(settings: &Settings, conn: &Connection) -> Result<()> {
    let json = serde_json::to_string(settings)?;
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES ('settings', ?1)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![json],
    )?;
    info!("Settings saved (dark mode: {})", settings.dark_mode);
    Ok(())
}
