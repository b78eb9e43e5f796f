use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // AUTOINCREMENT keeps ids from ever being reused
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email VARCHAR,
            phone_number VARCHAR,
            linked_id INTEGER,
            link_precedence VARCHAR NOT NULL CHECK (link_precedence IN ('primary', 'secondary')),
            created_at BIGINT NOT NULL,
            CHECK ((link_precedence = 'primary') = (linked_id IS NULL)),
            FOREIGN KEY (linked_id) REFERENCES contacts (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_email ON contacts(email)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_phone_number ON contacts(phone_number)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_linked_id ON contacts(linked_id)",
        [],
    )?;

    Ok(())
}

/// Check if database tables exist
pub fn has_schema(conn: &Connection) -> anyhow::Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='contacts'")?;
    Ok(stmt.exists([])?)
}
