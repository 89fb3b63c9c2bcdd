//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use care_server::core::{Config, ServerState};
use care_server::db::DbService;
use care_server::notify::{MailError, MailTransport, OutgoingMail};
use tempfile::TempDir;

/// Records every mail; addresses in `fail_for` are rejected
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub fail_for: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn fail_for(&self, address: &str) {
        self.fail_for.lock().unwrap().push(address.to_string());
    }

    pub fn recipients(&self) -> Vec<String> {
        let mut to: Vec<_> = self
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.to.clone())
            .collect();
        to.sort();
        to
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.fail_for.lock().unwrap().contains(&mail.to) {
            return Err(MailError::Transport("550 mailbox unavailable".into()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

pub fn test_config(dir: &TempDir) -> Config {
    let env = HashMap::from([
        ("JWT_SECRET", "integration-test-secret-0123456789abcdef".to_string()),
        ("SMTP_HOST", "localhost".to_string()),
        ("SMTP_TLS", "false".to_string()),
        ("MAIL_FROM", "CareLink <noreply@carelink.test>".to_string()),
        (
            "DATABASE_PATH",
            dir.path().join("carelink.db").to_string_lossy().into_owned(),
        ),
    ]);
    Config::from_lookup(|k| env.get(k).cloned()).expect("test config")
}

/// Fresh embedded database plus state wired to a recording transport
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn test_state() -> (ServerState, Arc<RecordingTransport>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);
    let db = DbService::new(&config.database_path)
        .await
        .expect("open test database")
        .db;
    let transport = Arc::new(RecordingTransport::default());
    let state = ServerState::new(config, db, transport.clone());
    (state, transport, dir)
}
