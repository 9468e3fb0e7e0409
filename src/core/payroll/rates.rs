use crate::models::organization::OrgSettings;
use crate::models::profile::Role;
use crate::utils::round2;

pub const MANAGER_FACTOR: f64 = 1.67;
pub const ADMIN_FACTOR: f64 = 2.33;

/// Hourly rate of a role. Managers and admins derive from the member rate
/// unless the organization sets an explicit override.
pub fn hourly_rate(role: Role, settings: &OrgSettings) -> f64 {
    let member = settings.member_rate;
    let rate = match role {
        Role::Member => member,
        Role::Manager => settings.manager_rate.unwrap_or(member * MANAGER_FACTOR),
        Role::Admin => settings.admin_rate.unwrap_or(member * ADMIN_FACTOR),
    };
    round2(rate)
}

/// Monetary breakdown of one payroll line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PayAmounts {
    pub regular_pay: f64,
    pub overtime_pay: f64,
    pub gross_pay: f64,
    pub deductions: f64,
    pub net_pay: f64,
}

/// Deductions and net pay from a gross amount, rounded to cents.
pub fn net_from_gross(gross: f64, settings: &OrgSettings) -> (f64, f64) {
    let gross = round2(gross);
    let deductions = round2(gross * settings.deduction_rate());
    (deductions, round2(gross - deductions))
}

pub fn compute_pay(
    regular_hours: f64,
    overtime_hours: f64,
    rate: f64,
    settings: &OrgSettings,
) -> PayAmounts {
    let regular_pay = round2(regular_hours * rate);
    let overtime_pay = round2(overtime_hours * rate * settings.overtime_multiplier);
    let gross_pay = round2(regular_pay + overtime_pay);
    let (deductions, net_pay) = net_from_gross(gross_pay, settings);

    PayAmounts {
        regular_pay,
        overtime_pay,
        gross_pay,
        deductions,
        net_pay,
    }
}
