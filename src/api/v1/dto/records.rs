/*
 * Responsibility
 * - /v1/medical/record の request/response DTO
 * - list の response は patient (identityDetail) と作成者 (createdBy) を入れ子で返す
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patients::IDENTITY_NUMBER_DIGITS;
use super::validate::{char_len_between, digit_count};
use crate::repos::filter::{Page, SortDirection};
use crate::repos::record_repo::{RecordFilter, RecordListRow};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub identity_number: i64,
    pub symptoms: String,
    pub medications: String,
}

impl CreateRecordRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if digit_count(self.identity_number) != IDENTITY_NUMBER_DIGITS {
            return Err("identityNumber must be 16 digits");
        }
        if !char_len_between(&self.symptoms, 1, 2000) {
            return Err("symptoms must be between 1 and 2000 characters");
        }
        if !char_len_between(&self.medications, 1, 2000) {
            return Err("medications must be between 1 and 2000 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDetail {
    pub identity_number: i64,
    pub phone_number: String,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub gender: String,
    pub identity_card_scan_img: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBy {
    pub user_id: String,
    pub nip: i64,
    pub name: String,
}

/// `createdBy` is `null` once the author's account has been deleted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub identity_detail: IdentityDetail,
    pub symptoms: String,
    pub medications: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<CreatedBy>,
}

impl From<RecordListRow> for RecordResponse {
    fn from(row: RecordListRow) -> Self {
        let created_by = match (row.creator_id, row.creator_nip, row.creator_name) {
            (Some(user_id), Some(nip), Some(name)) => Some(CreatedBy { user_id, nip, name }),
            _ => None,
        };

        Self {
            identity_detail: IdentityDetail {
                identity_number: row.patient_identity_number,
                phone_number: row.patient_phone_number,
                name: row.patient_name,
                birth_date: row.patient_birth_date,
                gender: row.patient_gender,
                identity_card_scan_img: row.patient_identity_card_url,
            },
            symptoms: row.symptoms,
            medications: row.medications,
            created_at: row.created_at,
            created_by,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRecordsQuery {
    #[serde(rename = "identityDetail.identityNumber")]
    pub identity_number: Option<String>,
    #[serde(rename = "createdBy.userId")]
    pub creator_id: Option<String>,
    #[serde(rename = "createdBy.nip")]
    pub creator_nip: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl ListRecordsQuery {
    pub fn into_filter(self) -> RecordFilter {
        RecordFilter {
            page: Page::from_params(self.offset.as_deref(), self.limit.as_deref()),
            created_at: SortDirection::from_param(self.created_at.as_deref()),
            identity_number: self.identity_number,
            creator_id: self.creator_id,
            creator_nip: self.creator_nip,
        }
    }
}
