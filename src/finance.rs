use std::collections::HashMap;

use crate::models::{Payment, PaymentType, Phase, Project, ProjectStatus};

/// Money figures shown in the project detail header
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectFinancials {
    pub total_phase_amount: f64,
    pub paid_phases: f64,
    pub advances: f64,
    pub received: f64,
    pub remaining: f64,
}

impl ProjectFinancials {
    pub fn compute(phases: &[Phase], payments: &[Payment]) -> Self {
        let total_phase_amount = phases.iter().map(|p| p.amount).sum();
        let paid_phases = phases.iter().filter(|p| p.is_paid()).map(|p| p.amount).sum();
        let advances = total_advances(payments);
        let received = paid_phases + advances;

        Self {
            total_phase_amount,
            paid_phases,
            advances,
            received,
            remaining: total_phase_amount - received,
        }
    }
}

pub fn total_advances(payments: &[Payment]) -> f64 {
    payments
        .iter()
        .filter(|p| p.payment_type == PaymentType::Advance)
        .map(|p| p.amount)
        .sum()
}

pub fn total_paid(payments: &[Payment]) -> f64 {
    payments.iter().map(|p| p.amount).sum()
}

/// Headline numbers of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub pending_projects: usize,
}

impl DashboardStats {
    pub fn compute(projects: &[Project], payments: &[Payment]) -> Self {
        let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();

        Self {
            total_revenue: total_paid(payments),
            active_projects: count(ProjectStatus::Ongoing),
            completed_projects: count(ProjectStatus::Completed),
            pending_projects: count(ProjectStatus::Pending),
        }
    }
}

/// Figures of the finances screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinanceOverview {
    pub revenue: f64,
    /// No expense ledger exists yet, so this is always zero
    pub expenses: f64,
    pub profit: f64,
    /// Unpaid phases of projects that are not awaiting confirmation
    pub pending: f64,
}

impl FinanceOverview {
    pub fn compute(projects: &[Project], phases: &[Phase], payments: &[Payment]) -> Self {
        let status_by_project: HashMap<i32, ProjectStatus> =
            projects.iter().map(|p| (p.id, p.status)).collect();

        let revenue = total_paid(payments);
        let expenses = 0.0;
        let pending = phases
            .iter()
            .filter(|phase| !phase.is_paid())
            .filter(|phase| {
                status_by_project
                    .get(&phase.project_id)
                    .is_some_and(|status| *status != ProjectStatus::Pending)
            })
            .map(|phase| phase.amount)
            .sum();

        Self {
            revenue,
            expenses,
            profit: revenue - expenses,
            pending,
        }
    }
}
