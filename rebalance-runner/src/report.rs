//! Per-day decision report and its on-disk artifacts.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rebalance_core::{
    ExitReason, LockInDecision, Security, SecurityIssue, TargetWeights, WorkingSetEntry,
};

use crate::runner::DayOutcome;

/// Counts and lists recorded for one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub trade_date: NaiveDate,
    pub config_id: String,
    pub open_positions: usize,
    pub candidates_ranked: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_error: Option<String>,
    pub working_set_size: usize,
    pub admitted: usize,
    pub holds: usize,
    pub profit_exits: usize,
    pub loss_exits: usize,
    pub working_set: Vec<WorkingSetEntry>,
    pub exits: BTreeMap<Security, ExitReason>,
    pub weights: TargetWeights,
    pub issues: Vec<SecurityIssue>,
}

impl DayReport {
    pub fn from_outcome(outcome: &DayOutcome, config_id: impl Into<String>) -> Self {
        let plan = &outcome.plan;
        let exits: BTreeMap<Security, ExitReason> = plan
            .evaluation
            .decisions
            .iter()
            .filter_map(|(s, a)| match a.decision {
                LockInDecision::Exit(reason) => Some((s.clone(), reason)),
                LockInDecision::Hold => None,
            })
            .collect();
        let count = |r: ExitReason| exits.values().filter(|&&e| e == r).count();

        Self {
            trade_date: outcome.trade_date,
            config_id: config_id.into(),
            open_positions: outcome.open_positions,
            candidates_ranked: outcome.candidates_ranked,
            candidate_error: outcome.candidate_error.clone(),
            working_set_size: plan.working_set.len(),
            admitted: plan.working_set.admitted_count(),
            holds: plan.evaluation.hold_count(),
            profit_exits: count(ExitReason::ProfitLockIn),
            loss_exits: count(ExitReason::LossLockIn),
            working_set: plan.working_set.entries().to_vec(),
            exits,
            weights: plan.weights.clone(),
            issues: plan.evaluation.issues.clone(),
        }
    }

    pub fn exit_count(&self) -> usize {
        self.profit_exits + self.loss_exits
    }
}

/// Paths written by [`save_report`].
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub decision_json: PathBuf,
    pub weights_csv: PathBuf,
}

/// Write `<output_dir>/<trade_date>/decision.json` and `weights.csv`.
///
/// A rerun for the same date overwrites that day's files.
pub fn save_report(output_dir: &Path, report: &DayReport) -> Result<ReportPaths> {
    let day_dir = output_dir.join(report.trade_date.format("%Y-%m-%d").to_string());
    std::fs::create_dir_all(&day_dir)
        .with_context(|| format!("Failed to create report directory {}", day_dir.display()))?;

    let decision_json = day_dir.join("decision.json");
    write_decision_json(&decision_json, report)?;

    let weights_csv = day_dir.join("weights.csv");
    write_weights_csv(&weights_csv, report)?;

    Ok(ReportPaths {
        decision_json,
        weights_csv,
    })
}

pub fn write_decision_json(path: &Path, report: &DayReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize day report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write decision JSON {}", path.display()))?;
    Ok(())
}

/// One row per weighted security: `symbol,weight,action`.
pub fn write_weights_csv(path: &Path, report: &DayReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create weights CSV {}", path.display()))?;
    writer.write_record(["symbol", "weight", "action"])?;
    for (security, weight) in report.weights.iter() {
        let action = match report.exits.get(security) {
            Some(reason) => reason.to_string(),
            None => "hold".to_string(),
        };
        let weight = format!("{weight:.6}");
        writer.write_record([security.as_str(), weight.as_str(), action.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
