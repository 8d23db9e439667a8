use async_trait::async_trait;
use tracing::info;

/// Out-of-band delivery of account messages.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> anyhow::Result<()>;
}

/// Writes outgoing messages to the log instead of sending them. Used until a
/// real mail provider is wired in.
#[derive(Clone, Debug, Default)]
pub struct LogMailer {
    from: Option<String>,
}

impl LogMailer {
    pub fn new(from: Option<String>) -> Self {
        Self { from }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> anyhow::Result<()> {
        let from = self.from.as_deref().unwrap_or("no-reply");
        info!(%from, %to, %reset_url, "password reset link issued");
        Ok(())
    }
}

pub fn reset_url(frontend_url: &str, token: &str) -> String {
    format!("{}/reset-password?token={}", frontend_url, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_url_points_at_frontend() {
        assert_eq!(
            reset_url("http://localhost:3000", "abc123"),
            "http://localhost:3000/reset-password?token=abc123"
        );
    }

    #[tokio::test]
    async fn log_mailer_never_fails() {
        let mailer = LogMailer::new(Some("ops@example.com".into()));
        mailer
            .send_password_reset("user@example.com", "http://x/reset-password?token=t")
            .await
            .expect("log mailer should succeed");
    }
}
