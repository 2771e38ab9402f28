/*
 * Responsibility
 * - /v1/medical/patient の request/response DTO
 * - list 用 query を PatientFilter に変換 (phoneNumber 先頭の + は外す)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validate::{char_len_between, digit_count, is_image_url};
use crate::repos::filter::{Page, SortDirection};
use crate::repos::patient_repo::{PatientFilter, PatientRow};
use crate::services::patient_service::PatientInput;

pub const IDENTITY_NUMBER_DIGITS: usize = 16;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub identity_number: i64,
    pub phone_number: String,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub gender: String,
    pub identity_card_scan_img: String,
}

impl CreatePatientRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if digit_count(self.identity_number) != IDENTITY_NUMBER_DIGITS {
            return Err("identityNumber must be 16 digits");
        }
        if !self.phone_number.starts_with("+62") {
            return Err("phoneNumber must start with +62");
        }
        if !char_len_between(&self.phone_number, 10, 15) {
            return Err("phoneNumber must be between 10 and 15 characters");
        }
        if !char_len_between(&self.name, 3, 30) {
            return Err("name must be between 3 and 30 characters");
        }
        if !matches!(self.gender.as_str(), "male" | "female") {
            return Err("gender must be male or female");
        }
        if !is_image_url(&self.identity_card_scan_img) {
            return Err("identityCardScanImg must be a valid image url");
        }
        Ok(())
    }

    pub fn as_input(&self) -> PatientInput<'_> {
        PatientInput {
            identity_number: self.identity_number,
            phone_number: &self.phone_number,
            name: &self.name,
            birth_date: self.birth_date,
            gender: &self.gender,
            identity_card_url: &self.identity_card_scan_img,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub identity_number: i64,
    pub phone_number: String,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub gender: String,
    pub identity_card_scan_img: String,
    pub created_at: DateTime<Utc>,
}

impl From<PatientRow> for PatientResponse {
    fn from(row: PatientRow) -> Self {
        Self {
            identity_number: row.identity_number,
            phone_number: row.phone_number,
            name: row.name,
            birth_date: row.birth_date,
            gender: row.gender,
            identity_card_scan_img: row.identity_card_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPatientsQuery {
    pub identity_number: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: Option<String>,
}

impl ListPatientsQuery {
    pub fn into_filter(self) -> PatientFilter {
        PatientFilter {
            page: Page::from_params(self.offset.as_deref(), self.limit.as_deref()),
            created_at: SortDirection::from_param(self.created_at.as_deref()),
            identity_number: self.identity_number,
            name: self.name,
            phone_number: self
                .phone_number
                .map(|p| p.trim_start_matches('+').to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreatePatientRequest {
        CreatePatientRequest {
            identity_number: 3271012345678901,
            phone_number: "+628123456789".into(),
            name: "Jane Doe".into(),
            birth_date: "1990-04-01T00:00:00Z".parse().unwrap(),
            gender: "female".into(),
            identity_card_scan_img: "https://cdn.example.com/ktp.jpg".into(),
        }
    }

    #[test]
    fn accepts_valid_patient() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_each_invalid_field() {
        let cases: Vec<(CreatePatientRequest, &str)> = vec![
            (
                CreatePatientRequest {
                    identity_number: 327101234567890,
                    ..valid()
                },
                "identityNumber must be 16 digits",
            ),
            (
                CreatePatientRequest {
                    phone_number: "08123456789".into(),
                    ..valid()
                },
                "phoneNumber must start with +62",
            ),
            (
                CreatePatientRequest {
                    phone_number: "+628123456789012".into(),
                    ..valid()
                },
                "phoneNumber must be between 10 and 15 characters",
            ),
            (
                CreatePatientRequest {
                    name: "Jo".into(),
                    ..valid()
                },
                "name must be between 3 and 30 characters",
            ),
            (
                CreatePatientRequest {
                    gender: "other".into(),
                    ..valid()
                },
                "gender must be male or female",
            ),
        ];

        for (req, expected) in cases {
            assert_eq!(req.validate(), Err(expected));
        }
    }

    #[test]
    fn birth_date_must_be_rfc3339() {
        let body = serde_json::json!({
            "identityNumber": 3271012345678901i64,
            "phoneNumber": "+628123456789",
            "name": "Jane Doe",
            "birthDate": "01/04/1990",
            "gender": "female",
            "identityCardScanImg": "https://cdn.example.com/ktp.jpg"
        });
        assert!(serde_json::from_value::<CreatePatientRequest>(body).is_err());
    }

    #[test]
    fn phone_filter_drops_leading_plus() {
        let filter = ListPatientsQuery {
            phone_number: Some("+6281".into()),
            ..Default::default()
        }
        .into_filter();

        assert_eq!(filter.phone_number.as_deref(), Some("6281"));
        assert_eq!(filter.created_at, Some(SortDirection::Desc));
    }
}
