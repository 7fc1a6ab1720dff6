use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use serenity::model::id::UserId;
use tokio::sync::Mutex;

const COOLDOWN_SECONDS: u64 = 5;
const GLOBAL_RATE_LIMIT: usize = 50;  // requests per second
const RATE_WINDOW_MS: u64 = 1000;    // 1 second in milliseconds

/// Per-user command cooldowns plus a global request window.
///
/// One instance lives in the bot context and is shared by every handler.
pub struct CommandLimiter {
    cooldowns: Mutex<HashMap<(UserId, String), u64>>,
    // Key: (UserId, command), Value: timestamp of last cooldown warning
    cooldown_warnings: Mutex<HashMap<(UserId, String), u64>>,
    // Request timestamps (ms) inside the current window
    global_requests: Mutex<Vec<u64>>,
    cooldown_seconds: u64,
    global_limit: usize,
}

impl Default for CommandLimiter {
    fn default() -> Self {
        Self::new(COOLDOWN_SECONDS, GLOBAL_RATE_LIMIT)
    }
}

impl CommandLimiter {
    pub fn new(cooldown_seconds: u64, global_limit: usize) -> Self {
        Self {
            cooldowns: Mutex::new(HashMap::new()),
            cooldown_warnings: Mutex::new(HashMap::new()),
            global_requests: Mutex::new(Vec::new()),
            cooldown_seconds,
            global_limit,
        }
    }

    pub fn cooldown_seconds(&self) -> u64 {
        self.cooldown_seconds
    }

    /// Check if a user can execute a command (cooldown not active)
    /// Returns Err((remaining_seconds, should_send_warning_message)) if still on cooldown;
    /// the warning flag is only set on the first violation of a cooldown period
    pub async fn check_cooldown(&self, user_id: UserId, command: &str) -> Result<(), (u64, bool)> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.check_cooldown_at(user_id, command, now).await
    }

    async fn check_cooldown_at(&self, user_id: UserId, command: &str, now: u64) -> Result<(), (u64, bool)> {
        let key = (user_id, command.to_string());

        let mut cooldowns = self.cooldowns.lock().await;
        let mut warnings = self.cooldown_warnings.lock().await;

        // Expired entries carry no state: a missing key means "not on cooldown"
        let cooldown_seconds = self.cooldown_seconds;
        cooldowns.retain(|_, &mut last_time| now.saturating_sub(last_time) < cooldown_seconds);
        warnings.retain(|_, &mut warned_at| now.saturating_sub(warned_at) < cooldown_seconds);

        if let Some(&last_time) = cooldowns.get(&key) {
            let elapsed = now.saturating_sub(last_time);
            if elapsed < self.cooldown_seconds {
                let remaining = self.cooldown_seconds - elapsed;

                let should_warn = match warnings.get(&key) {
                    // Only warn if the warning was from a previous cooldown period
                    Some(&last_warning) => last_warning < last_time,
                    None => true,
                };
                if should_warn {
                    warnings.insert(key.clone(), now);
                }

                return Err((remaining, should_warn));
            }
        }

        cooldowns.insert(key, now);
        Ok(())
    }

    /// Check the global request window
    /// Returns Err(remaining_ms) if the limit is exceeded
    pub async fn check_global_rate_limit(&self) -> Result<(), u64> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        self.check_global_rate_limit_at(now).await
    }

    async fn check_global_rate_limit_at(&self, now: u64) -> Result<(), u64> {
        let window_start = now.saturating_sub(RATE_WINDOW_MS);

        let mut requests = self.global_requests.lock().await;
        requests.retain(|&timestamp| timestamp > window_start);

        if requests.len() >= self.global_limit {
            // Wait until the oldest request leaves the window
            let oldest_leaves_at = requests[0] + RATE_WINDOW_MS;
            Err(oldest_leaves_at.saturating_sub(now))
        } else {
            requests.push(now);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cooldown_blocks_repeat_and_warns_once() {
        let limiter = CommandLimiter::new(5, 50);
        let user = UserId::new(42);

        assert!(limiter.check_cooldown_at(user, "$stock", 100).await.is_ok());
        assert_eq!(limiter.check_cooldown_at(user, "$stock", 102).await, Err((3, true)));
        assert_eq!(limiter.check_cooldown_at(user, "$stock", 103).await, Err((2, false)));
        assert!(limiter.check_cooldown_at(user, "$stock", 105).await.is_ok());
    }

    #[tokio::test]
    async fn test_cooldown_is_per_user_and_command() {
        let limiter = CommandLimiter::new(5, 50);

        assert!(limiter.check_cooldown_at(UserId::new(1), "$stock", 10).await.is_ok());
        assert!(limiter.check_cooldown_at(UserId::new(2), "$stock", 10).await.is_ok());
        assert!(limiter.check_cooldown_at(UserId::new(1), "$ping", 10).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_cooldowns_are_pruned() {
        let limiter = CommandLimiter::new(5, 50);

        for id in 1..=20 {
            assert!(limiter.check_cooldown_at(UserId::new(id), "stock", 100).await.is_ok());
        }
        assert!(limiter.check_cooldown_at(UserId::new(1), "stock", 101).await.is_err());
        assert_eq!(limiter.cooldowns.lock().await.len(), 20);
        assert_eq!(limiter.cooldown_warnings.lock().await.len(), 1);

        assert!(limiter.check_cooldown_at(UserId::new(99), "ping", 200).await.is_ok());
        assert_eq!(limiter.cooldowns.lock().await.len(), 1);
        assert!(limiter.cooldown_warnings.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_global_rate_limit_window() {
        let limiter = CommandLimiter::new(5, 3);

        for t in [1_000, 1_100, 1_200] {
            assert!(limiter.check_global_rate_limit_at(t).await.is_ok());
        }
        assert_eq!(limiter.check_global_rate_limit_at(1_300).await, Err(700));
        // the first request has left the window
        assert!(limiter.check_global_rate_limit_at(2_050).await.is_ok());
    }
}
