use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// How overtime is derived when a record carries no precomputed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OvertimeMode {
    /// First 8 hours of each day are regular.
    #[default]
    Daily,
    /// Hours beyond `overtime_threshold` within an ISO week are overtime.
    Weekly,
}

impl OvertimeMode {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OvertimeMode::Daily => "daily",
            OvertimeMode::Weekly => "weekly",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(OvertimeMode::Daily),
            "weekly" => Some(OvertimeMode::Weekly),
            _ => None,
        }
    }
}

/// Per-tenant settings row (`organization_settings`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgSettings {
    pub organization_id: i64,
    pub currency: String,
    pub member_rate: f64,
    pub manager_rate: Option<f64>,
    pub admin_rate: Option<f64>,
    pub overtime_multiplier: f64,
    pub overtime_threshold: f64,
    pub overtime_mode: OvertimeMode,
    pub tax_rate: f64,
    pub benefits_rate: f64,
    pub other_rate: f64,
}

impl OrgSettings {
    pub fn defaults_for(organization_id: i64) -> Self {
        Self {
            organization_id,
            currency: "USD".to_string(),
            member_rate: 15.0,
            manager_rate: None,
            admin_rate: None,
            overtime_multiplier: 1.5,
            overtime_threshold: 40.0,
            overtime_mode: OvertimeMode::Daily,
            tax_rate: 0.20,
            benefits_rate: 0.05,
            other_rate: 0.0,
        }
    }

    /// Apply a `key=value` change coming from `org set`.
    pub fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        let num = || {
            value
                .parse::<f64>()
                .map_err(|_| AppError::Config(format!("'{value}' is not a number for {key}")))
        };
        let optional_num = || -> AppResult<Option<f64>> {
            if value.is_empty() || value.eq_ignore_ascii_case("none") {
                Ok(None)
            } else {
                Ok(Some(num()?))
            }
        };

        match key {
            "currency" => self.currency = value.to_uppercase(),
            "member_rate" => self.member_rate = num()?,
            "manager_rate" => self.manager_rate = optional_num()?,
            "admin_rate" => self.admin_rate = optional_num()?,
            "overtime_multiplier" => self.overtime_multiplier = num()?,
            "overtime_threshold" => self.overtime_threshold = num()?,
            "overtime_mode" => {
                self.overtime_mode = OvertimeMode::from_db_str(value)
                    .ok_or_else(|| AppError::Config(format!("Unknown overtime mode: {value}")))?
            }
            "tax_rate" => self.tax_rate = num()?,
            "benefits_rate" => self.benefits_rate = num()?,
            "other_rate" => self.other_rate = num()?,
            other => return Err(AppError::Config(format!("Unknown setting: {other}"))),
        }
        Ok(())
    }

    pub fn deduction_rate(&self) -> f64 {
        self.tax_rate + self.benefits_rate + self.other_rate
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
}
