//! Outbound mail capability.
//!
//! Password reset delivery goes through the [`Mailer`] trait so the
//! engine never depends on a concrete mail provider. The default
//! [`LogMailer`] writes the message to the log, which is enough for
//! development and tests.

use tracing::info;

/// Delivers account-related mail.
pub trait Mailer: Send + Sync {
    /// Sends a password reset token to `email`.
    fn send_password_reset(&self, email: &str, token: &str);
}

/// A mailer that logs instead of sending.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_password_reset(&self, email: &str, token: &str) {
        info!(email = %email, token = %token, "Password reset token issued");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Captures sent mail for assertions.
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    impl Mailer for RecordingMailer {
        fn send_password_reset(&self, email: &str, token: &str) {
            self.sent
                .lock()
                .unwrap()
                .push((email.to_string(), token.to_string()));
        }
    }

    #[test]
    fn test_mailer_is_object_safe() {
        let mailer: Box<dyn Mailer> = Box::new(LogMailer);
        mailer.send_password_reset("rahim@example.com", "token");
    }

    #[test]
    fn test_recording_mailer_captures_messages() {
        let mailer = RecordingMailer {
            sent: Mutex::new(Vec::new()),
        };
        mailer.send_password_reset("rahim@example.com", "abc");
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }
}
