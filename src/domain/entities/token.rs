use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Kind of bearer credential. The kind is part of the signed payload, so a
/// token minted as one kind is never accepted as another.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    VerifyEmail,
    ResetPassword,
}

// Token record as persisted by the store adapter.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_type: TokenType,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_type: TokenType,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
