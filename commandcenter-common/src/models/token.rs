use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::Error;

/// Short-lived broadcaster access token plus its absolute expiry.
/// Lives only in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct BroadcasterToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl BroadcasterToken {
    /// Fails with [`Error::Parse`] when `expires_in_secs` puts the expiry
    /// outside the representable date range.
    pub fn new(access_token: String, issued_at: DateTime<Utc>, expires_in_secs: i64) -> Result<Self, Error> {
        let expires_at = Duration::try_seconds(expires_in_secs)
            .and_then(|d| issued_at.checked_add_signed(d))
            .ok_or_else(|| Error::Parse(format!("Token expires_in out of range: {}", expires_in_secs)))?;
        Ok(Self { access_token, expires_at })
    }

    /// True while more than `margin` of life remains at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at - now > margin
    }
}

impl fmt::Debug for BroadcasterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcasterToken")
            .field("access_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
