use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Password reset token row. Only the SHA-256 of the token is stored; the
/// plaintext goes to the user out-of-band.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub used_at: Option<OffsetDateTime>, // None until consumed
    pub created_at: OffsetDateTime,
}

impl PasswordResetToken {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    pub fn is_consumed(&self) -> bool {
        self.used_at.is_some()
    }

    /// A token may be redeemed once, and only before it expires.
    pub fn is_usable(&self, now: OffsetDateTime) -> bool {
        !self.is_consumed() && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn token(expires_in: Duration, used: bool) -> PasswordResetToken {
        let now = OffsetDateTime::now_utc();
        PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "0".repeat(64),
            expires_at: now + expires_in,
            used_at: used.then_some(now),
            created_at: now,
        }
    }

    #[test]
    fn fresh_token_is_usable() {
        let t = token(Duration::hours(1), false);
        assert!(t.is_usable(OffsetDateTime::now_utc()));
    }

    #[test]
    fn consumed_token_is_not_usable() {
        let t = token(Duration::hours(1), true);
        assert!(!t.is_usable(OffsetDateTime::now_utc()));
    }

    #[test]
    fn expired_token_is_never_usable() {
        let t = token(-Duration::seconds(1), false);
        assert!(t.is_expired(OffsetDateTime::now_utc()));
        assert!(!t.is_usable(OffsetDateTime::now_utc()));
    }

    #[test]
    fn token_expires_exactly_at_deadline() {
        let t = token(Duration::hours(1), false);
        assert!(!t.is_usable(t.expires_at));
        assert!(t.is_usable(t.expires_at - Duration::milliseconds(1)));
    }
}
