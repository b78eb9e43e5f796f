#![allow(dead_code)]

use identity_api::config::DatabaseConfig;
use identity_api::{ConsolidationEngine, Database};
use rusqlite::params;
use shared_types::Contact;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestContext {
    // Keeps the database directory alive for the test's duration
    _dir: TempDir,
    pub db: Arc<Database>,
    pub engine: ConsolidationEngine,
}

pub fn setup() -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(&dir.path().join("contacts.db"), &DatabaseConfig::default()).unwrap();
    let db = Arc::new(db);
    let engine = ConsolidationEngine::new(db.async_connection.clone());

    TestContext {
        _dir: dir,
        db,
        engine,
    }
}

impl TestContext {
    pub async fn insert(
        &self,
        email: Option<&str>,
        phone_number: Option<&str>,
        linked_id: Option<i64>,
        created_at: i64,
    ) -> i64 {
        let conn = self.db.async_connection.lock().await.unwrap();
        let precedence = if linked_id.is_some() { "secondary" } else { "primary" };

        conn.query_row(
            "INSERT INTO contacts (email, phone_number, linked_id, link_precedence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
            params![email, phone_number, linked_id, precedence, created_at],
            |row| row.get(0),
        )
        .unwrap()
    }

    pub async fn execute(&self, sql: &str) {
        let conn = self.db.async_connection.lock().await.unwrap();
        conn.execute_batch(sql).unwrap();
    }

    pub async fn contact(&self, id: i64) -> Contact {
        identity_api::database::contacts::get_contact(self.db.async_connection.clone(), id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn all_contacts(&self) -> Vec<Contact> {
        let conn = self.db.async_connection.lock().await.unwrap();
        let mut stmt = conn.prepare("SELECT id FROM contacts ORDER BY id").unwrap();
        let ids: Vec<i64> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        drop(stmt);
        drop(conn);

        let mut contacts = Vec::new();
        for id in ids {
            contacts.push(self.contact(id).await);
        }
        contacts
    }

    /// Every secondary links straight to a primary.
    pub async fn assert_linkage_is_flat(&self) {
        let contacts = self.all_contacts().await;
        for contact in &contacts {
            if let Some(linked_id) = contact.linked_id {
                let target = contacts.iter().find(|c| c.id == linked_id).unwrap();
                assert!(
                    target.is_primary(),
                    "contact {} links to non-primary {}",
                    contact.id,
                    linked_id
                );
            } else {
                assert!(contact.is_primary());
            }
        }
    }
}
