//! SQLite-backed seen store.
//!
//! Every insert is a single autocommit statement, so a crash can never leave a
//! half-written record behind. Notification log rows for one digest are
//! written in one transaction.

use crate::error::{Result, TrackerError};
use crate::models::{Listing, SeenRecord};
use crate::store::SeenStore;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

pub struct SqliteSeenStore {
    conn: Connection,
}

impl SqliteSeenStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn)?;
        info!("Seen store ready at {}", path.display());
        Ok(store)
    }

    /// Ephemeral store, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Look up the stored projection of a listing
    pub fn get(&self, id: &str) -> Result<Option<SeenRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, price, link, image_url, first_seen, source
                 FROM seen_ads WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, title, price, link, image_url, first_seen, source)| -> Result<SeenRecord> {
            let first_seen = DateTime::parse_from_rfc3339(&first_seen)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Utc);
            Ok(SeenRecord {
                id,
                title,
                price,
                link,
                image_url,
                first_seen,
                source,
            })
        })
        .transpose()
    }

    /// Number of distinct listings ever seen
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM seen_ads", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// How many digests have included this listing
    pub fn notification_count(&self, id: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE ad_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl SeenStore for SqliteSeenStore {
    fn exists(&mut self, id: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM seen_ads WHERE id = ?1", params![id], |_| {
                Ok(())
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn insert(&mut self, listing: &Listing) -> Result<()> {
        let record = SeenRecord::from_listing(listing, Utc::now());
        let inserted = self.conn.execute(
            "INSERT INTO seen_ads (id, title, price, link, image_url, first_seen, source)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.title,
                record.price,
                record.link,
                record.image_url,
                record.first_seen.to_rfc3339(),
                record.source,
            ],
        );

        match inserted {
            Ok(_) => {
                debug!(id = %record.id, source = %record.source, "Recorded new listing");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(TrackerError::DuplicateKey(record.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn record_notification(&mut self, ids: &[&str]) -> Result<()> {
        let sent_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO notifications (ad_id, sent_at) VALUES (?1, ?2)")?;
            for id in ids {
                stmt.execute(params![id, sent_at])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS seen_ads (
            id TEXT PRIMARY KEY,
            title TEXT,
            price TEXT,
            link TEXT,
            image_url TEXT,
            first_seen TEXT,
            source TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS notifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ad_id TEXT,
            sent_at TEXT,
            FOREIGN KEY (ad_id) REFERENCES seen_ads (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_notifications_ad_id ON notifications(ad_id)",
        [],
    )?;

    Ok(())
}
