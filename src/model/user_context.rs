use serde::{Deserialize, Serialize};

pub const SYSTEM_USER: &str = "system";
pub const DEV_USER: &str = "dev-user";

/// Who is making a change, taken from request headers and written to the
/// `created_by`/`updated_by` audit columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub user_name: Option<String>,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: None,
        }
    }

    pub fn with_name(user_id: impl Into<String>, user_name: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name,
        }
    }

    /// Identity used for seeding
    pub fn system() -> Self {
        Self::with_name(SYSTEM_USER, Some("AppPort".to_string()))
    }

    /// Requests without an `X-User-Id` header
    pub fn default_user() -> Self {
        Self::new(DEV_USER)
    }

    /// Name for log lines: the display name when known, else the id
    pub fn label(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.user_id)
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self::default_user()
    }
}
