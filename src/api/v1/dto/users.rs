/*
 * Responsibility
 * - /v1/user の request/response DTO
 * - validate() で NIP / name / password / 画像 URL の形式チェック
 * - list 用 query を UserFilter に変換
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validate::{char_len_between, is_image_url, is_valid_nip};
use crate::repos::filter::{Page, SortDirection};
use crate::repos::user_repo::{UserFilter, UserRow};
use crate::services::auth::Role;
use crate::services::user_service::AuthenticatedUser;

fn check_name(name: &str) -> Result<(), &'static str> {
    if !char_len_between(name, 5, 50) {
        return Err("name must be between 5 and 50 characters");
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), &'static str> {
    if !char_len_between(password, 5, 33) {
        return Err("password must be between 5 and 33 characters");
    }
    Ok(())
}

fn check_nip(nip: i64, role: Role) -> Result<(), &'static str> {
    if !is_valid_nip(nip, role) {
        return Err("NIP must be valid");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct RegisterItRequest {
    pub nip: i64,
    pub name: String,
    pub password: String,
}

impl RegisterItRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_nip(self.nip, Role::Operator)?;
        check_name(&self.name)?;
        check_password(&self.password)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNurseRequest {
    pub nip: i64,
    pub name: String,
    pub identity_card_scan_img: String,
}

impl RegisterNurseRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_nip(self.nip, Role::Caregiver)?;
        check_name(&self.name)?;
        if !is_image_url(&self.identity_card_scan_img) {
            return Err("identityCardScanImg must be a valid image url");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub nip: i64,
    pub password: String,
}

impl LoginRequest {
    /// `role` is the role of the login endpoint; the NIP prefix must match it.
    pub fn validate(&self, role: Role) -> Result<(), &'static str> {
        check_nip(self.nip, role)?;
        check_password(&self.password)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateNurseRequest {
    pub nip: i64,
    pub name: String,
}

impl UpdateNurseRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_nip(self.nip, Role::Caregiver)?;
        check_name(&self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct GrantAccessRequest {
    pub password: String,
}

impl GrantAccessRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_password(&self.password)
    }
}

/// Returned by register / login. `accessToken` is `null` for nurse registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuthResponse {
    pub user_id: String,
    pub nip: i64,
    pub name: String,
    pub access_token: Option<String>,
}

impl From<AuthenticatedUser> for UserAuthResponse {
    fn from(auth: AuthenticatedUser) -> Self {
        Self {
            user_id: auth.user.id,
            nip: auth.user.nip,
            name: auth.user.name,
            access_token: auth.access_token,
        }
    }
}

impl From<UserRow> for UserAuthResponse {
    fn from(user: UserRow) -> Self {
        Self {
            user_id: user.id,
            nip: user.nip,
            name: user.name,
            access_token: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub nip: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(user: UserRow) -> Self {
        Self {
            user_id: user.id,
            nip: user.nip,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

/// Query string of `GET /v1/user`. Every value is kept as text so a
/// malformed parameter is ignored instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub user_id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub name: Option<String>,
    pub nip: Option<String>,
    pub role: Option<String>,
    pub created_at: Option<String>,
}

impl ListUsersQuery {
    pub fn into_filter(self) -> UserFilter {
        UserFilter {
            page: Page::from_params(self.offset.as_deref(), self.limit.as_deref()),
            created_at: SortDirection::from_param(self.created_at.as_deref()),
            role: self.role.as_deref().and_then(Role::from_query),
            user_id: self.user_id,
            name: self.name,
            nip: self.nip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IT_NIP: i64 = 6151200105123;
    const NURSE_NIP: i64 = 3032200512001;

    #[test]
    fn it_registration_rules() {
        let ok = RegisterItRequest {
            nip: IT_NIP,
            name: "Budi Santoso".into(),
            password: "hunter22".into(),
        };
        assert!(ok.validate().is_ok());

        let nurse_nip = RegisterItRequest {
            nip: NURSE_NIP,
            ..ok
        };
        assert_eq!(nurse_nip.validate(), Err("NIP must be valid"));

        let short_name = RegisterItRequest {
            nip: IT_NIP,
            name: "Budi".into(),
            password: "hunter22".into(),
        };
        assert!(short_name.validate().is_err());

        let long_password = RegisterItRequest {
            nip: IT_NIP,
            name: "Budi Santoso".into(),
            password: "x".repeat(34),
        };
        assert!(long_password.validate().is_err());
    }

    #[test]
    fn nurse_registration_requires_image_url() {
        let mut req = RegisterNurseRequest {
            nip: NURSE_NIP,
            name: "Siti Aminah".into(),
            identity_card_scan_img: "https://cdn.example.com/ktp.jpg".into(),
        };
        assert!(req.validate().is_ok());

        req.identity_card_scan_img = "ktp.jpg".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn login_checks_nip_against_endpoint_role() {
        let req = LoginRequest {
            nip: NURSE_NIP,
            password: "secret1".into(),
        };
        assert!(req.validate(Role::Caregiver).is_ok());
        assert!(req.validate(Role::Operator).is_err());
    }

    #[test]
    fn list_query_is_lenient() {
        let query: ListUsersQuery = serde_json::from_value(serde_json::json!({
            "userId": "u-1",
            "limit": "abc",
            "offset": "-3",
            "role": "admin",
            "createdAt": "sideways",
            "nip": "615"
        }))
        .unwrap();
        let filter = query.into_filter();

        assert_eq!(filter.user_id.as_deref(), Some("u-1"));
        assert_eq!(filter.nip.as_deref(), Some("615"));
        assert_eq!(filter.role, None);
        assert_eq!(filter.created_at, None);
        assert_eq!(filter.page, Page::default());
    }

    #[test]
    fn list_query_defaults_to_newest_first() {
        let filter = ListUsersQuery::default().into_filter();
        assert_eq!(filter.created_at, Some(SortDirection::Desc));

        let filter = ListUsersQuery {
            role: Some("nurse".into()),
            created_at: Some("asc".into()),
            ..Default::default()
        }
        .into_filter();
        assert_eq!(filter.role, Some(Role::Caregiver));
        assert_eq!(filter.created_at, Some(SortDirection::Asc));
    }

    #[test]
    fn auth_response_serializes_null_token() {
        let body = serde_json::to_value(UserAuthResponse {
            user_id: "u-1".into(),
            nip: NURSE_NIP,
            name: "Siti Aminah".into(),
            access_token: None,
        })
        .unwrap();

        assert_eq!(body["userId"], "u-1");
        assert!(body["accessToken"].is_null());
        assert!(body.as_object().unwrap().contains_key("accessToken"));
    }
}
