use super::super::domain::{Category, Tier};
use super::super::scoring::ScoredRow;
use serde::Serialize;

/// Flat, display-ready recommendation row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationView {
    pub choose_order: usize,
    pub sum_of_tiers: u8,
    pub college_tier: Option<Tier>,
    pub college_tier_score: u8,
    pub branch_tier: Option<Tier>,
    pub branch_tier_score: u8,
    pub district_tier: Option<Tier>,
    pub district_tier_score: u8,
    pub college_rank: Option<u32>,
    pub branch_rank: Option<u32>,
    pub district_rank: Option<u32>,
    pub department_rank: Option<u32>,
    pub college_code: String,
    pub college: String,
    pub branch_code: String,
    pub branch: String,
    pub department: String,
    pub district: String,
    pub oc_cutoff: f64,
    pub final_score: f64,
    pub year: u16,
}

impl ScoredRow {
    pub fn to_view(&self) -> RecommendationView {
        let row = &self.row;
        RecommendationView {
            choose_order: self.choose_order,
            sum_of_tiers: self.sum_of_tiers,
            college_tier: row.tier(Category::College),
            college_tier_score: self.college_tier_score,
            branch_tier: row.tier(Category::Branch),
            branch_tier_score: self.branch_tier_score,
            district_tier: row.tier(Category::District),
            district_tier_score: self.district_tier_score,
            college_rank: row.rank(Category::College),
            branch_rank: row.rank(Category::Branch),
            district_rank: row.rank(Category::District),
            department_rank: row.rank(Category::Department),
            college_code: row.college_code.to_string(),
            college: row.display_name(Category::College).to_string(),
            branch_code: row.branch_code.to_string(),
            branch: row.display_name(Category::Branch).to_string(),
            department: row.display_name(Category::Department).to_string(),
            district: row.display_name(Category::District).to_string(),
            oc_cutoff: row.oc_cutoff,
            final_score: self.final_score,
            year: row.year,
        }
    }
}

/// One entity in a top-tier panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTierEntry {
    pub name: String,
    pub rank: u32,
    pub max_cutoff: f64,
}
