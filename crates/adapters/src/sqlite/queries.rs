use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use shelf_domain::{FileRecord, RecordId};

pub fn insert_record(
    conn: &Connection,
    name: &str,
    mime_type: &str,
    size_bytes: i64,
    created_at_ms: i64,
    payload: &[u8],
) -> Result<i64> {
    conn.execute(
        "INSERT INTO file_records (name, mime_type, size_bytes, created_at_ms, payload)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, mime_type, size_bytes, created_at_ms, payload],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn total_bytes(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(size_bytes), 0) FROM file_records",
        [],
        |row| row.get(0),
    )
}

pub fn list_records(conn: &Connection) -> Result<Vec<FileRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, mime_type, size_bytes, created_at_ms
         FROM file_records
         ORDER BY id",
    )?;
    let rows = stmt.query_map([], record_from_row)?;
    rows.collect()
}

pub fn find_record(conn: &Connection, id: i64) -> Result<Option<FileRecord>> {
    conn.query_row(
        "SELECT id, name, mime_type, size_bytes, created_at_ms
         FROM file_records
         WHERE id = ?1",
        params![id],
        record_from_row,
    )
    .optional()
}

pub fn find_payload(conn: &Connection, id: i64) -> Result<Option<Vec<u8>>> {
    conn.query_row(
        "SELECT payload FROM file_records WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
}

pub fn delete_record(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM file_records WHERE id = ?1", params![id])
}

fn record_from_row(row: &Row<'_>) -> Result<FileRecord> {
    let id_value: i64 = row.get(0)?;
    let size_value: i64 = row.get(3)?;
    let created_ms: i64 = row.get(4)?;

    let id = RecordId::new(id_value)
        .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, id_value))?;
    let size_bytes = u64::try_from(size_value)
        .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(3, size_value))?;
    let created_at = DateTime::from_timestamp_millis(created_ms)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, created_ms))?;

    Ok(FileRecord {
        id,
        name: row.get(1)?,
        mime_type: row.get(2)?,
        size_bytes,
        created_at,
    })
}
