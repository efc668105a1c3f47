//! # RSVP Records
//!
//! Domain logic behind guest responses.
//!
//! A party (family, couple, household) shares one invitation and one record,
//! keyed by its group identifier. Submitting again fully replaces the prior
//! record, so `created_at` always means "last responded at". The roster and
//! display name are snapshots taken at response time; the guest directory
//! lives entirely in the frontend and is never consulted here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    Accept,
    Decline,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRecord {
    pub id: String,
    pub group_id: String,
    pub display_name: String,
    pub members: Vec<String>,
    pub head_count: u32,
    pub attendance: Attendance,
    pub responded_by: String,
    pub attending_members: Vec<String>,
    pub declining_members: Vec<String>,
    pub plus_one_name: Option<String>,
    pub total_attending: u32,
    pub created_at: DateTime<Utc>,
}

/// Incoming submission. Everything is optional at the wire level so that
/// missing required fields surface as 400s with a field-naming message
/// instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitRsvp {
    pub group_id: Option<String>,
    pub display_name: Option<String>,
    pub members: Option<Vec<String>>,
    pub head_count: Option<u32>,
    pub attendance: Option<String>,
    pub responded_by: Option<String>,
    pub attending_members: Option<Vec<String>>,
    pub declining_members: Option<Vec<String>>,
    pub plus_one_name: Option<String>,
    pub total_attending: Option<u32>,
}

impl SubmitRsvp {
    /// Validate and build the record that will replace whatever is stored
    /// for this group. Free-text fields are trimmed before validation,
    /// omitted fields fall back to safe defaults.
    pub fn into_record(self) -> Result<RsvpRecord, AppError> {
        let group_id = self
            .group_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Validation("Group ID is required".to_string()))?
            .to_string();

        let attendance = match self.attendance.as_deref() {
            Some("accept") => Attendance::Accept,
            Some("decline") => Attendance::Decline,
            _ => {
                return Err(AppError::Validation(
                    "Attendance must be \"accept\" or \"decline\"".to_string(),
                ))
            }
        };

        let responded_by = self
            .responded_by
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::Validation("Responded by is required".to_string()))?
            .to_string();

        let plus_one_name = self
            .plus_one_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(RsvpRecord {
            id: Uuid::new_v4().to_string(),
            group_id,
            display_name: self
                .display_name
                .map(|name| name.trim().to_string())
                .unwrap_or_default(),
            members: self.members.unwrap_or_default(),
            head_count: self.head_count.filter(|&count| count > 0).unwrap_or(1),
            attendance,
            responded_by,
            attending_members: self.attending_members.unwrap_or_default(),
            declining_members: self.declining_members.unwrap_or_default(),
            plus_one_name,
            total_attending: self.total_attending.unwrap_or(0),
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub accepted: usize,
    pub declined: usize,
    pub total_head_count: u64,
    pub accepted_head_count: u64,
    pub declined_head_count: u64,
    pub total_attending_people: u64,
}

/// Aggregate view for the admin listing, recomputed on every call. A
/// confirmed total of zero on an accepted record falls back to the invited
/// head count.
pub fn compute_stats(records: &[RsvpRecord]) -> Stats {
    let accepted: Vec<&RsvpRecord> = records
        .iter()
        .filter(|r| r.attendance == Attendance::Accept)
        .collect();
    let declined = records.len() - accepted.len();

    Stats {
        total: records.len(),
        accepted: accepted.len(),
        declined,
        total_head_count: records.iter().map(|r| u64::from(r.head_count)).sum(),
        accepted_head_count: accepted.iter().map(|r| u64::from(r.head_count)).sum(),
        declined_head_count: records
            .iter()
            .filter(|r| r.attendance == Attendance::Decline)
            .map(|r| u64::from(r.head_count))
            .sum(),
        total_attending_people: accepted
            .iter()
            .map(|r| {
                if r.total_attending > 0 {
                    u64::from(r.total_attending)
                } else {
                    u64::from(r.head_count)
                }
            })
            .sum(),
    }
}
