//! Dashboard aggregates.

use crate::backend::{RoleCount, StatusCount, TypeCount};

/// Message shown when any dashboard request fails.
pub const DASHBOARD_LOAD_FAILED: &str = "Failed to load dashboard data. Please try again later.";

/// Counts shown on the dashboard, with their totals.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_users: u64,
    pub total_today_cases: u64,
    pub users_by_role: Vec<(String, u64)>,
    pub cases_by_status: Vec<(String, u64)>,
    pub cases_by_type: Vec<(String, u64)>,
}

impl DashboardSummary {
    pub fn from_counts(
        users_by_role: Vec<RoleCount>,
        cases_by_status: Vec<StatusCount>,
        cases_by_type: Vec<TypeCount>,
    ) -> Self {
        let users_by_role: Vec<(String, u64)> = users_by_role
            .into_iter()
            .map(|item| (item.role, item.count))
            .collect();
        let cases_by_status: Vec<(String, u64)> = cases_by_status
            .into_iter()
            .map(|item| (item.status, item.count))
            .collect();
        let cases_by_type = cases_by_type
            .into_iter()
            .map(|item| (item.case_type, item.count))
            .collect();

        DashboardSummary {
            total_users: users_by_role.iter().map(|(_, count)| count).sum(),
            total_today_cases: cases_by_status.iter().map(|(_, count)| count).sum(),
            users_by_role,
            cases_by_status,
            cases_by_type,
        }
    }
}

/// Load state of the dashboard view.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dashboard {
    #[default]
    Idle,
    Loading,
    Loaded(DashboardSummary),
    Failed(String),
}
