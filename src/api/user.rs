use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validate::{Field, Rule, Validate};
use crate::database::models::User;

const USERNAME_RULES: &[Rule] = &[Rule::Required("Your username is required")];
const EMAIL_RULES: &[Rule] = &[
    Rule::Required("Your email is required"),
    Rule::Email("Invalid email format"),
];
const PASSWORD_RULES: &[Rule] = &[
    Rule::Required("Your password is required"),
    Rule::MinLength(6, "Password has to have a minimum length of 6 characters"),
];
const AGE_RULES: &[Rule] = &[
    Rule::Required("Your age is required"),
    Rule::Range(8, 99, "minimum 8 years old"),
];
const UPDATE_EMAIL_RULES: &[Rule] = &[Rule::Email("Invalid format email")];

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i64>,
}

impl Validate for RegisterRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("username", self.username.as_deref(), USERNAME_RULES),
            Field::text("email", self.email.as_deref(), EMAIL_RULES),
            Field::text("password", self.password.as_deref(), PASSWORD_RULES),
            Field::number("age", self.age, AGE_RULES),
        ]
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    pub username: Option<String>,
}

impl Validate for UserUpdateRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::text("email", self.email.as_deref(), UPDATE_EMAIL_RULES)]
    }
}

/// Returned by register and the user listing
#[derive(Debug, Serialize)]
pub struct UserCreateResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub age: i32,
}

impl From<User> for UserCreateResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            age: user.age,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserUpdateResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub age: i32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserUpdateResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            age: user.age,
            updated_at: user.updated_at,
        }
    }
}
