use super::entities::{PublicUser, User};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct PublicUserResponse {
    pub user: PublicUser,
}
