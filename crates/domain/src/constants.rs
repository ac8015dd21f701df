//! Saver constants
//!
//! Option keys, their defaults, notification identifiers and the retry
//! schedule used throughout the workspace.

use std::time::Duration;

// Option keys read from the host configuration store
pub const CONFIG_ENABLED: &str = "$:/config/cloudflare-saver/enabled";
pub const CONFIG_ENDPOINT: &str = "$:/config/cloudflare-saver/endpoint";
pub const CONFIG_TIMEOUT: &str = "$:/config/cloudflare-saver/timeout";
pub const CONFIG_NOTIFICATIONS: &str = "$:/config/cloudflare-saver/notifications";
pub const CONFIG_AUTO_RETRY: &str = "$:/config/cloudflare-saver/auto-retry";
pub const CONFIG_REMEMBER_PASSWORD: &str = "$:/config/cloudflare-saver/remember-password";
pub const CONFIG_DEBUG: &str = "$:/config/cloudflare-saver/debug";

/// Prefix shared by every option key.
pub const CONFIG_PREFIX: &str = "$:/config/cloudflare-saver/";

// Option defaults (string form, as the store hands them back)
pub const DEFAULT_ENABLED: &str = "no";
pub const DEFAULT_ENDPOINT: &str = "";
pub const DEFAULT_TIMEOUT_SECS: &str = "30";
pub const DEFAULT_NOTIFICATIONS: &str = "yes";
pub const DEFAULT_AUTO_RETRY: &str = "yes";
pub const DEFAULT_REMEMBER_PASSWORD: &str = "no";
pub const DEFAULT_DEBUG: &str = "no";

/// The only token that switches a boolean option on.
pub const AFFIRMATIVE: &str = "yes";

pub const FALLBACK_TIMEOUT_SECS: u64 = 30;
pub const MIN_TIMEOUT_SECS: u64 = 5;

// Notification tiddlers shown by the host notifier
pub const NOTIFICATION_SAVING: &str = "$:/plugins/collaborative-blog/notifications/saving";
pub const NOTIFICATION_SUCCESS: &str = "$:/plugins/collaborative-blog/notifications/success";
pub const NOTIFICATION_FAILURE: &str = "$:/plugins/collaborative-blog/notifications/failure";

// Retry schedule
pub const MAX_AUTO_RETRIES: u32 = 3;
pub const BASE_BACKOFF: Duration = Duration::from_millis(1000);
pub const MAX_BACKOFF: Duration = Duration::from_millis(10_000);

/// Raw bodies at or above this many characters are left out of messages.
pub const MAX_INLINE_BODY_CHARS: usize = 200;

pub const PASSWORD_PROMPT: &str = "Enter Cloudflare save password:";
pub const TEST_PASSWORD_PROMPT: &str =
    "Enter your Cloudflare save password to test the connection:";

// Saver descriptor
pub const SAVER_NAME: &str = "cloudflare";
pub const SAVER_PRIORITY: u32 = 2000;
