use serde::{Deserialize, Serialize};

/// The two parties of the marketplace. Authentication is external; a verified
/// token yields an `(user_id, UserType)` pair and nothing else is known about
/// the actor.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Company,
    Worker,
}

impl UserType {
    pub fn counterparty(self) -> UserType {
        match self {
            UserType::Company => UserType::Worker,
            UserType::Worker => UserType::Company,
        }
    }
}
