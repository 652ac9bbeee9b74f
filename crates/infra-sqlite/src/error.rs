// sqlx::Error -> AppError mapping
//
// Lives here because of the orphan rule (cannot implement
// From<sqlx::Error> for AppError in this crate).

use walkin_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information
///
/// Busy/locked results mean another writer holds the database, which the
/// service treats as a retryable `Conflict`.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite result codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "5" | "261" | "517" | "6" | "262" => {
                        // SQLITE_BUSY / SQLITE_BUSY_RECOVERY / SQLITE_BUSY_SNAPSHOT
                        // SQLITE_LOCKED / SQLITE_LOCKED_SHAREDCACHE
                        AppError::Conflict(format!(
                            "Database locked ({}): {}",
                            code_str,
                            db_err.message()
                        ))
                    }
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "275" => AppError::Database(format!(
                        "Check constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}
