use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use laroulette_core::models::Recommendation;
use laroulette_core::store::StateStore;

/// Nombre maximal de recommandations conservées dans le journal.
pub const JOURNAL_CAP: u32 = 20;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS state (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS journal (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp   TEXT NOT NULL,
    action      TEXT NOT NULL,
    confidence  INTEGER NOT NULL,
    terminals   TEXT NOT NULL,
    dozens      TEXT NOT NULL,
    reasoning   TEXT NOT NULL,
    history     TEXT NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("laroulette.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Magasin clé-valeur adossé à la table `state`.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl StateStore for SqliteStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM state WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .context("Échec de la lecture d'état")?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )
            .context("Échec de l'écriture d'état")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub id: i64,
    pub timestamp: String,
    pub action: String,
    pub confidence: u8,
    pub terminals: String,
    pub dozens: String,
    pub reasoning: String,
    pub history: String,
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insère une recommandation et taille le journal aux 20 entrées
/// les plus récentes.
pub fn insert_entry(conn: &Connection, rec: &Recommendation, timestamp: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO journal (timestamp, action, confidence, terminals, dozens, reasoning, history)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            timestamp,
            rec.action.to_string(),
            rec.confidence,
            join_numbers(&rec.terminals),
            join_numbers(&rec.dozens),
            rec.reasoning,
            join_numbers(&rec.detected_history),
        ],
    )
    .context("Échec de l'insertion au journal")?;

    conn.execute(
        "DELETE FROM journal WHERE id NOT IN
         (SELECT id FROM journal ORDER BY id DESC LIMIT ?1)",
        [JOURNAL_CAP],
    )
    .context("Échec de la taille du journal")?;

    Ok(())
}

pub fn fetch_last_entries(conn: &Connection, limit: u32) -> Result<Vec<JournalEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, timestamp, action, confidence, terminals, dozens, reasoning, history
         FROM journal ORDER BY id DESC LIMIT ?1",
    )?;
    let entries = stmt
        .query_map([limit], |row| {
            Ok(JournalEntry {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                action: row.get(2)?,
                confidence: row.get(3)?,
                terminals: row.get(4)?,
                dozens: row.get(5)?,
                reasoning: row.get(6)?,
                history: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub fn count_entries(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM journal", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laroulette_core::guard::{UsageDecision, UsageGuard};
    use laroulette_core::models::Action;

    fn test_rec(confidence: u8) -> Recommendation {
        Recommendation {
            terminals: vec![0, 4, 7],
            dozens: vec![1, 2],
            confidence,
            action: Action::Bet,
            reasoning: "Répétition forte du terminal 7.".to_string(),
            detected_history: vec![7, 7, 22, 5],
        }
    }

    #[test]
    fn test_state_roundtrip() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let store = SqliteStore::new(&conn);

        assert_eq!(store.get("usage").unwrap(), None);
        store.set("usage", "{\"date\":\"2026-08-23\",\"count\":1}").unwrap();
        assert_eq!(
            store.get("usage").unwrap().as_deref(),
            Some("{\"date\":\"2026-08-23\",\"count\":1}")
        );
        store.set("usage", "{}").unwrap();
        assert_eq!(store.get("usage").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_guard_over_sqlite_store() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let store = SqliteStore::new(&conn);
        let guard = UsageGuard::new(&store, 100);

        assert_eq!(guard.check("2026-08-23").unwrap(), UsageDecision::Allow);
        guard.record_success("2026-08-23").unwrap();
        assert_eq!(guard.state("2026-08-23").unwrap().count, 1);
        // Changement de jour : remise à zéro
        assert_eq!(guard.state("2026-08-24").unwrap().count, 0);
    }

    #[test]
    fn test_journal_insert_and_fetch_order() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_entry(&conn, &test_rec(95), "2026-08-23 10:00:00").unwrap();
        insert_entry(&conn, &test_rec(88), "2026-08-23 10:05:00").unwrap();

        let entries = fetch_last_entries(&conn, 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].confidence, 88);
        assert_eq!(entries[1].confidence, 95);
        assert_eq!(entries[0].terminals, "0 4 7");
        assert_eq!(entries[0].history, "7 7 22 5");
    }

    #[test]
    fn test_journal_pruned_to_cap() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        for i in 0..25u8 {
            insert_entry(&conn, &test_rec(60 + i), &format!("2026-08-23 10:{:02}:00", i)).unwrap();
        }

        assert_eq!(count_entries(&conn).unwrap(), JOURNAL_CAP);
        let entries = fetch_last_entries(&conn, 30).unwrap();
        // Les plus récentes survivent
        assert_eq!(entries[0].confidence, 84);
        assert_eq!(entries.last().unwrap().confidence, 65);
    }
}
