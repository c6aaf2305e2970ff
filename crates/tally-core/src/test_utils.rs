//! Test utilities
//!
//! Fake mail transports and database fixtures shared by the core tests and
//! (via the `test-utils` feature) the server and CLI test suites.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::mailer::{MailTransport, OutgoingEmail};
use crate::models::{Frequency, NewBudget, NewTransaction, Transaction};

/// Mail transport that records every email instead of sending it
///
/// Clone the `sent` handle before handing the mailer to a `Notifier` to
/// inspect deliveries afterwards.
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    counter: AtomicUsize,
    /// 1-based send index that fails (0 = never fail)
    fail_on: usize,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            counter: AtomicUsize::new(0),
            fail_on: 0,
        }
    }

    /// Record sends but fail the nth one (1-based)
    pub fn failing_on(n: usize) -> Self {
        Self {
            fail_on: n,
            ..Self::new()
        }
    }
}

impl Default for RecordingMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MailTransport for RecordingMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<String> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on != 0 && n == self.fail_on {
            return Err(Error::Mail("smtp connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(format!("<test-{}@tally.local>", n))
    }
}

/// Mail transport that fails every send
pub struct FailingMailer;

impl MailTransport for FailingMailer {
    fn send(&self, _email: &OutgoingEmail) -> Result<String> {
        Err(Error::Mail("smtp connection refused".to_string()))
    }
}

/// Owner email used by the seeded fixtures
pub const TEST_OWNER: &str = "test@example.com";

/// Create a budget for `TEST_OWNER`, returning its id
pub fn seed_budget(db: &Database, name: &str, amount: f64) -> i64 {
    db.create_budget(&NewBudget {
        name: name.to_string(),
        amount,
        category: None,
        icon: None,
        created_by: TEST_OWNER.to_string(),
    })
    .expect("seed budget")
}

/// Insert a transaction against a seeded budget
pub fn seed_transaction(
    db: &Database,
    budget_id: i64,
    name: &str,
    amount: f64,
    recurring: Frequency,
) -> Transaction {
    db.insert_transaction(&NewTransaction {
        budget_id,
        name: name.to_string(),
        amount,
        category: None,
        recurring,
    })
    .expect("seed transaction")
}
