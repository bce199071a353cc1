//! Phase and feature completion.
//!
//! A phase description is a comma-separated list of features. Each feature can
//! be ticked off on its own; the phase is complete once every feature is. A
//! phase without features falls back to its own `is_completed` flag.
//!
//! The same derivation drives the project detail screen and the public share
//! page, so both always agree on which phase is current.

use serde::Serialize;

use crate::models::Phase;

/// Splits a phase description into its features
pub fn features(description: Option<&str>) -> Vec<String> {
    description
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_feature_done(phase: &Phase, feature: &str) -> bool {
    phase.completed_features.iter().any(|f| f == feature)
}

/// Number of features of the phase that are ticked off, and the total
pub fn feature_counts(phase: &Phase) -> (usize, usize) {
    let features = features(phase.description.as_deref());
    let done = features.iter().filter(|f| is_feature_done(phase, f)).count();
    (done, features.len())
}

pub fn is_phase_complete(phase: &Phase) -> bool {
    let (done, total) = feature_counts(phase);
    if total == 0 {
        phase.is_completed
    } else {
        done == total
    }
}

fn rounded_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as u8
}

/// Completion of a single phase in percent
pub fn feature_progress(phase: &Phase) -> u8 {
    let (done, total) = feature_counts(phase);
    if total == 0 {
        return if phase.is_completed { 100 } else { 0 };
    }
    rounded_percent(done, total)
}

/// Features paired with their done flag, completed ones first
pub fn sorted_features(phase: &Phase) -> Vec<(String, bool)> {
    let mut list: Vec<(String, bool)> = features(phase.description.as_deref())
        .into_iter()
        .map(|f| {
            let done = is_feature_done(phase, &f);
            (f, done)
        })
        .collect();
    // sort_by_key is stable, so description order survives within each group
    list.sort_by_key(|(_, done)| !*done);
    list
}

/// Returns the completed-feature list after ticking `name` on or off
pub fn toggle_feature(completed: &[String], name: &str, done: bool) -> Vec<String> {
    let mut next: Vec<String> = completed.to_vec();
    if done {
        if !next.iter().any(|f| f == name) {
            next.push(name.to_string());
        }
    } else {
        next.retain(|f| f != name);
    }
    next
}

/// Where a phase sits on the roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    Done,
    InProgress,
    Upcoming,
}

impl PhaseState {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseState::Done => "Done",
            PhaseState::InProgress => "In Progress",
            PhaseState::Upcoming => "Upcoming",
        }
    }
}

/// Aggregate progress of a project, derived from its phases
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectProgress {
    pub total: usize,
    pub completed: usize,
    pub percent: u8,
    pub all_completed: bool,
    /// Index into the creation-ordered phase list
    pub current: Option<usize>,
    pub status_text: String,
}

impl ProjectProgress {
    /// `phases` must already be ordered by creation time; see [`order_phases`]
    pub fn from_phases(phases: &[Phase], progress_status: Option<&str>) -> Self {
        let total = phases.len();
        let completed = phases.iter().filter(|p| is_phase_complete(p)).count();
        let all_completed = total > 0 && completed == total;
        let current = phases.iter().position(|p| !is_phase_complete(p));

        let status_text = if all_completed {
            "Project Completed!".to_string()
        } else if let Some(index) = current {
            format!("Current Focus: {}", phases[index].name)
        } else {
            match progress_status {
                Some(s) if !s.trim().is_empty() => s.to_string(),
                _ => "In Progress".to_string(),
            }
        };

        Self {
            total,
            completed,
            percent: rounded_percent(completed, total),
            all_completed,
            current,
            status_text,
        }
    }

    pub fn state_of(&self, index: usize, phase: &Phase) -> PhaseState {
        if is_phase_complete(phase) {
            PhaseState::Done
        } else if self.current == Some(index) {
            PhaseState::InProgress
        } else {
            PhaseState::Upcoming
        }
    }
}

/// Orders phases by creation time, oldest first
pub fn order_phases(phases: &mut [Phase]) {
    phases.sort_by_key(|p| (p.created_at, p.id));
}
