use super::domain::Dataset;
use super::master::{build_master_table, MasterRow};
use super::ranks::{compute_ranks_and_tiers, RankTables};
use super::scoring::{self, ScoredRow, ScoringRequest};
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, info};

/// Ranks, tiers and the master table computed once for a dataset.
///
/// A snapshot is read-only after construction; picking up new cutoff data means
/// computing a fresh snapshot and replacing the old one.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    dataset: Dataset,
    ranks: RankTables,
    master: Vec<MasterRow>,
    computed_at: DateTime<Utc>,
}

impl DatasetSnapshot {
    pub fn compute(dataset: Dataset) -> Self {
        let started = Instant::now();
        let ranks = compute_ranks_and_tiers(&dataset.cutoffs);
        let master = build_master_table(
            &dataset.cutoffs,
            &dataset.districts,
            &dataset.colleges,
            &dataset.branches,
            &ranks,
        );

        let unranked = master
            .iter()
            .filter(|row| row.district.is_none() || row.college.is_none())
            .count();
        if unranked > 0 {
            debug!(unranked, "master rows missing district or college standing");
        }

        info!(
            year = dataset.year,
            cutoffs = dataset.cutoffs.len(),
            districts = ranks.district.len(),
            departments = ranks.department.len(),
            branches = ranks.branch.len(),
            colleges = ranks.college.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "dataset snapshot computed"
        );

        Self {
            dataset,
            ranks,
            master,
            computed_at: Utc::now(),
        }
    }

    pub fn year(&self) -> u16 {
        self.dataset.year
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn ranks(&self) -> &RankTables {
        &self.ranks
    }

    pub fn master(&self) -> &[MasterRow] {
        &self.master
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    pub fn score(&self, request: &ScoringRequest) -> Vec<ScoredRow> {
        scoring::score(&self.master, request)
    }
}
