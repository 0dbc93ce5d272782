//! Audit stamps attached to synthesized relationship edges.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Actor recorded on stamps minted without an explicit identity.
pub const DEFAULT_ACTOR: &str = "urn:li:corpuser:datahub";

/// When and by whom a change was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStamp {
    /// Epoch milliseconds.
    pub time: i64,
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuditStamp {
    pub fn new(time: i64, actor: impl Into<String>) -> Self {
        Self {
            time,
            actor: actor.into(),
            message: None,
        }
    }
}

/// Source of fresh audit stamps.
pub trait AuditStampMinter {
    fn mint(&self) -> AuditStamp;
}

/// Mints stamps from the wall clock.
#[derive(Debug, Clone)]
pub struct SystemClock {
    actor: String,
}

impl SystemClock {
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_ACTOR)
    }
}

impl AuditStampMinter for SystemClock {
    fn mint(&self) -> AuditStamp {
        // A clock set before 1970 stamps zero rather than failing the call.
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default();
        AuditStamp::new(time, self.actor.clone())
    }
}

/// Always returns the same stamp.
#[derive(Debug, Clone)]
pub struct FixedClock(pub AuditStamp);

impl AuditStampMinter for FixedClock {
    fn mint(&self) -> AuditStamp {
        self.0.clone()
    }
}
