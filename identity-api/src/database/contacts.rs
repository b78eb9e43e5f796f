use crate::database::StoreError;
use crate::identity::{ContactStore, NewContact};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use shared_types::{Contact, LinkPrecedence};

const CONTACT_COLUMNS: &str =
    "id, email, phone_number, linked_id, link_precedence, created_at";

fn map_contact(row: &Row<'_>) -> rusqlite::Result<Contact> {
    let precedence: String = row.get(4)?;
    let link_precedence = precedence
        .parse::<LinkPrecedence>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Contact {
        id: row.get(0)?,
        email: row.get(1)?,
        phone_number: row.get(2)?,
        linked_id: row.get(3)?,
        link_precedence,
        created_at: row.get(5)?,
    })
}

/// `ContactStore` over a SQLite connection, normally an open transaction.
pub struct SqliteContactStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteContactStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl ContactStore for SqliteContactStore<'_> {
    fn find_by_email_or_phone(
        &self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Vec<Contact>, StoreError> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {CONTACT_COLUMNS}
             FROM contacts
             WHERE (?1 IS NOT NULL AND email = ?1)
                OR (?2 IS NOT NULL AND phone_number = ?2)
             ORDER BY created_at ASC, id ASC"
        ))?;

        let contacts = stmt
            .query_map(params![email, phone_number], map_contact)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(contacts)
    }

    fn find_clusters(&self, primary_ids: &[i64]) -> Result<Vec<Contact>, StoreError> {
        if primary_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Numbered placeholders let both IN lists share one parameter set
        let placeholders = (1..=primary_ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS}
             FROM contacts
             WHERE id IN ({placeholders}) OR linked_id IN ({placeholders})
             ORDER BY created_at ASC, id ASC"
        ))?;

        let contacts = stmt
            .query_map(params_from_iter(primary_ids.iter()), map_contact)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(contacts)
    }

    fn create_contact(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let now = chrono::Utc::now().timestamp_millis();

        let created = self.conn.query_row(
            &format!(
                "INSERT INTO contacts (email, phone_number, linked_id, link_precedence, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {CONTACT_COLUMNS}"
            ),
            params![
                contact.email,
                contact.phone_number,
                contact.linked_id,
                contact.link_precedence.as_str(),
                now
            ],
            map_contact,
        )?;

        Ok(created)
    }

    fn demote_cluster(&self, primary_id: i64, new_primary_id: i64) -> Result<usize, StoreError> {
        let updated = self.conn.execute(
            "UPDATE contacts
             SET link_precedence = ?1, linked_id = ?2
             WHERE id = ?3 OR linked_id = ?3",
            params![LinkPrecedence::Secondary.as_str(), new_primary_id, primary_id],
        )?;

        Ok(updated)
    }
}

pub async fn get_contact(
    conn: crate::database::AsyncDbConnection,
    id: i64,
) -> Result<Option<Contact>, StoreError> {
    let conn = conn.lock().await?;

    let contact = conn
        .query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
            [id],
            map_contact,
        )
        .optional()?;

    Ok(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn primary(email: Option<&str>, phone: Option<&str>) -> NewContact {
        NewContact {
            email: email.map(str::to_string),
            phone_number: phone.map(str::to_string),
            linked_id: None,
            link_precedence: LinkPrecedence::Primary,
        }
    }

    #[test]
    fn test_find_by_email_or_phone_skips_absent_clauses() {
        let conn = setup();
        let store = SqliteContactStore::new(&conn);

        let a = store.create_contact(primary(Some("a@x.com"), None)).unwrap();
        let b = store.create_contact(primary(None, Some("111"))).unwrap();
        store.create_contact(primary(None, None)).unwrap();

        let by_email = store.find_by_email_or_phone(Some("a@x.com"), None).unwrap();
        assert_eq!(by_email, vec![a.clone()]);

        let by_both = store
            .find_by_email_or_phone(Some("a@x.com"), Some("111"))
            .unwrap();
        assert_eq!(by_both, vec![a, b]);

        // A NULL column must never match an absent lookup field
        let none = store.find_by_email_or_phone(None, Some("999")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_demote_cluster_flattens_dependents() {
        let conn = setup();
        let store = SqliteContactStore::new(&conn);

        let p1 = store.create_contact(primary(Some("a@x.com"), None)).unwrap();
        let p2 = store.create_contact(primary(None, Some("222"))).unwrap();
        let s2 = store
            .create_contact(NewContact {
                email: Some("b@x.com".to_string()),
                phone_number: Some("222".to_string()),
                linked_id: Some(p2.id),
                link_precedence: LinkPrecedence::Secondary,
            })
            .unwrap();

        let updated = store.demote_cluster(p2.id, p1.id).unwrap();
        assert_eq!(updated, 2);

        let cluster = store.find_clusters(&[p1.id]).unwrap();
        let ids: Vec<i64> = cluster.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![p1.id, p2.id, s2.id]);
        assert!(cluster
            .iter()
            .filter(|c| c.id != p1.id)
            .all(|c| c.linked_id == Some(p1.id) && !c.is_primary()));
    }

    #[test]
    fn test_find_clusters_with_no_ids() {
        let conn = setup();
        let store = SqliteContactStore::new(&conn);
        assert!(store.find_clusters(&[]).unwrap().is_empty());
    }
}
