//! Store types.

use aria_core::Result;
use serde::{Deserialize, Serialize};

/// Contact details captured from a single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactRecord {
    /// All three fields carry a value.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Destination for contact and feedback submissions.
///
/// Records are insert-only; once `Ok` is returned the store owns them.
pub trait SubmissionStore: Send + Sync {
    /// Persist a contact. Returns the new row ID.
    fn insert_contact(&self, record: &ContactRecord) -> Result<i64>;

    /// Persist a feedback message. Returns the new row ID.
    fn insert_feedback(&self, message: &str) -> Result<i64>;
}

