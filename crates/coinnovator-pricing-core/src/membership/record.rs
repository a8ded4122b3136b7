use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Inactive,
    Expired,
    Cancelled,
}

/// An organization's paid membership as held by the subscription system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub status: MembershipStatus,
    /// Last day the membership is valid; open-ended when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
}

impl MembershipRecord {
    /// Active status and not yet past `expires_on`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.status == MembershipStatus::Active && self.expires_on.map_or(true, |end| date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_ended_active() {
        let rec = MembershipRecord {
            status: MembershipStatus::Active,
            expires_on: None,
        };
        assert!(rec.is_active_on(date(2030, 1, 1)));
    }

    #[test]
    fn test_expiry_day_is_inclusive() {
        let rec = MembershipRecord {
            status: MembershipStatus::Active,
            expires_on: Some(date(2026, 6, 30)),
        };
        assert!(rec.is_active_on(date(2026, 6, 30)));
        assert!(!rec.is_active_on(date(2026, 7, 1)));
    }

    #[test]
    fn test_non_active_status() {
        for status in [
            MembershipStatus::Inactive,
            MembershipStatus::Expired,
            MembershipStatus::Cancelled,
        ] {
            let rec = MembershipRecord {
                status,
                expires_on: None,
            };
            assert!(!rec.is_active_on(date(2026, 1, 1)));
        }
    }
}
