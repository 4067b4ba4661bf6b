//! Tier-dominant scoring of master rows against a counselee's tier selections and
//! weight sliders.
//!
//! Tier membership decides the primary key (`sum_of_tiers`); the weighted,
//! rank-derived `final_score` only breaks ties inside a tier sum. A category rank
//! that is missing from a row contributes a rank score of 0 and a tier score of 0,
//! which places it below every ranked entity of that category.

mod ordering;
mod selection;
mod weights;

pub use ordering::compare_scored;
pub use selection::TierSelection;
pub use weights::{
    is_slider_value, NormalizedWeights, WeightInputs, DEFAULT_WEIGHT, MAX_WEIGHT,
};

use super::domain::Category;
use super::master::MasterRow;
use serde::{Deserialize, Serialize};

/// Per-request scoring parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRequest {
    pub college_tiers: TierSelection,
    pub branch_tiers: TierSelection,
    pub district_tiers: TierSelection,
    pub weights: WeightInputs,
}

/// A master row with the fields derived for one scoring request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRow {
    pub row: MasterRow,
    pub college_tier_score: u8,
    pub branch_tier_score: u8,
    pub district_tier_score: u8,
    pub sum_of_tiers: u8,
    pub final_score: f64,
    pub choose_order: usize,
}

/// Largest rank present in the rows for each category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryMaxRanks {
    pub district: Option<u32>,
    pub department: Option<u32>,
    pub branch: Option<u32>,
    pub college: Option<u32>,
}

impl CategoryMaxRanks {
    pub fn from_rows(rows: &[MasterRow]) -> Self {
        let max_of = |category: Category| rows.iter().filter_map(|row| row.rank(category)).max();
        Self {
            district: max_of(Category::District),
            department: max_of(Category::Department),
            branch: max_of(Category::Branch),
            college: max_of(Category::College),
        }
    }

    pub fn get(&self, category: Category) -> Option<u32> {
        match category {
            Category::District => self.district,
            Category::Department => self.department,
            Category::Branch => self.branch,
            Category::College => self.college,
        }
    }
}

/// Inverts a rank so the best entity scores `max_rank` and the worst scores 1.
pub fn rank_score(rank: Option<u32>, max_rank: Option<u32>) -> f64 {
    match (rank, max_rank) {
        (Some(rank), Some(max_rank)) => f64::from((max_rank + 1).saturating_sub(rank)),
        _ => 0.0,
    }
}

/// Rounds to two decimals, sending exact halves to the even neighbour.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Scores every row and returns them in choose order.
pub fn score(rows: &[MasterRow], request: &ScoringRequest) -> Vec<ScoredRow> {
    let weights = request.weights.normalize();
    let max_ranks = CategoryMaxRanks::from_rows(rows);

    let mut scored: Vec<ScoredRow> = rows
        .iter()
        .map(|row| score_row(row, request, &weights, &max_ranks))
        .collect();
    ordering::assign_choose_order(&mut scored);
    scored
}

fn score_row(
    row: &MasterRow,
    request: &ScoringRequest,
    weights: &NormalizedWeights,
    max_ranks: &CategoryMaxRanks,
) -> ScoredRow {
    let college_tier_score = request.college_tiers.score(row.tier(Category::College));
    let branch_tier_score = request.branch_tiers.score(row.tier(Category::Branch));
    let district_tier_score = request.district_tiers.score(row.tier(Category::District));

    let weighted: f64 = Category::ordered()
        .into_iter()
        .map(|category| {
            rank_score(row.rank(category), max_ranks.get(category)) * weights.get(category)
        })
        .sum();

    ScoredRow {
        row: row.clone(),
        college_tier_score,
        branch_tier_score,
        district_tier_score,
        sum_of_tiers: college_tier_score + branch_tier_score + district_tier_score,
        final_score: round_to_cents(weighted),
        choose_order: 0,
    }
}
