use crate::models::{NewScanLog, ScanLogRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, ffi};

impl Database {
    // -- Users --

    /// Insert a user. Returns `false` when the username is already taken,
    /// including when a concurrent registration won the race.
    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, password, role) VALUES (?1, ?2, ?3, ?4)",
                (id, username, password_hash, role),
            );
            match inserted {
                Ok(_) => Ok(true),
                // Only the username index; other constraint failures are real errors.
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation
                        && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Scan logs --

    pub fn insert_scan_log(&self, log: &NewScanLog<'_>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO scan_logs (id, user_id, username, tool_type, target, result)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    log.id,
                    log.user_id,
                    log.username,
                    log.tool_type,
                    log.target,
                    log.result
                ],
            )?;
            Ok(())
        })
    }

    /// Newest first, scoped to one user.
    pub fn get_scan_logs_for_user(&self, user_id: &str, limit: u32) -> Result<Vec<ScanLogRow>> {
        self.with_conn(|conn| query_scan_logs(conn, user_id, limit))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password, role, created_at FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                role: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_scan_logs(conn: &Connection, user_id: &str, limit: u32) -> Result<Vec<ScanLogRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, username, tool_type, target, result, timestamp
         FROM scan_logs
         WHERE user_id = ?1
         ORDER BY timestamp DESC, rowid DESC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![user_id, limit], |row| {
            Ok(ScanLogRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                username: row.get(2)?,
                tool_type: row.get(3)?,
                target: row.get(4)?,
                result: row.get(5)?,
                timestamp: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_user(id: &str, username: &str) -> Database {
        let db = Database::open_in_memory().unwrap();
        assert!(db.create_user(id, username, "hash", "user").unwrap());
        db
    }

    fn log<'a>(id: &'a str, user_id: &'a str, tool: &'a str) -> NewScanLog<'a> {
        NewScanLog {
            id,
            user_id,
            username: "budi",
            tool_type: tool,
            target: Some("3171012505990001"),
            result: r#"{"gender":"Male"}"#,
        }
    }

    #[test]
    fn duplicate_username_is_reported_not_raised() {
        let db = db_with_user("u1", "budi");
        assert!(!db.create_user("u2", "budi", "other-hash", "staff").unwrap());

        let user = db.get_user_by_username("budi").unwrap().unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.password, "hash");
    }

    #[test]
    fn duplicate_id_is_an_error() {
        let db = db_with_user("u1", "budi");
        assert!(db.create_user("u1", "sari", "hash", "user").is_err());
        assert!(db.get_user_by_username("sari").unwrap().is_none());
    }

    #[test]
    fn username_lookup_is_case_sensitive() {
        let db = db_with_user("u1", "budi");
        assert!(db.get_user_by_username("Budi").unwrap().is_none());
        assert!(db.create_user("u2", "Budi", "hash", "user").unwrap());
    }

    #[test]
    fn scan_logs_are_scoped_and_newest_first() {
        let db = db_with_user("u1", "budi");
        db.create_user("u2", "sari", "hash", "client").unwrap();

        db.insert_scan_log(&log("l1", "u1", "NIK Analysis")).unwrap();
        db.insert_scan_log(&log("l2", "u1", "Phone Analysis")).unwrap();
        db.insert_scan_log(&log("l3", "u2", "Device Track")).unwrap();

        let rows = db.get_scan_logs_for_user("u1", 10).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["l2", "l1"]);
        assert_eq!(rows[0].tool_type, "Phone Analysis");
        assert_eq!(rows[0].target.as_deref(), Some("3171012505990001"));

        assert_eq!(db.get_scan_logs_for_user("u1", 1).unwrap().len(), 1);
    }

    #[test]
    fn scan_log_requires_existing_user() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_scan_log(&log("l1", "ghost", "NIK Analysis")).is_err());
    }

    #[test]
    fn close_releases_the_connection() {
        let db = db_with_user("u1", "budi");
        db.close().unwrap();
    }
}
