use crate::domain::page::Page;
use crate::domain::user::User;
use serde::{Deserialize, Serialize};

/// Registration payload. Fields are optional so that missing values surface
/// as field-level validation errors instead of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub display_name: Option<String>,
    pub image: Option<String>,
}

/// The user as shown to clients. No password material ever crosses this
/// boundary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVM {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub image: Option<String>,
}

impl From<User> for UserVM {
    fn from(user: User) -> Self {
        Self { id: user.id, username: user.username, display_name: user.display_name, image: user.image }
    }
}

#[derive(Debug, Serialize)]
pub struct GenericResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub number: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub first: bool,
    pub last: bool,
}

impl From<Page<User>> for PageResponse<UserVM> {
    fn from(page: Page<User>) -> Self {
        let page = page.map(UserVM::from);
        Self {
            content: page.content,
            number: page.number,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            first: page.first,
            last: page.last,
        }
    }
}
