use super::domain::{Category, CutoffRecord, Tier};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Best cutoff, dense rank and tier for one entity of a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRankTier {
    pub key: String,
    pub max_cutoff: f64,
    pub rank: u32,
    pub tier: Tier,
}

/// Rank/tier set for a single category, ordered by rank then key.
#[derive(Debug, Clone, PartialEq)]
pub struct RankTable {
    category: Category,
    entries: Vec<CategoryRankTier>,
    index: HashMap<String, usize>,
    max_rank: Option<u32>,
}

impl RankTable {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn entries(&self) -> &[CategoryRankTier] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&CategoryRankTier> {
        self.index.get(key).map(|&position| &self.entries[position])
    }

    /// Largest assigned rank, i.e. the number of distinct best cutoffs.
    pub fn max_rank(&self) -> Option<u32> {
        self.max_rank
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank tables for all four categories of one dataset snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RankTables {
    pub district: RankTable,
    pub department: RankTable,
    pub branch: RankTable,
    pub college: RankTable,
}

impl RankTables {
    pub fn get(&self, category: Category) -> &RankTable {
        match category {
            Category::District => &self.district,
            Category::Department => &self.department,
            Category::Branch => &self.branch,
            Category::College => &self.college,
        }
    }
}

pub fn compute_ranks_and_tiers(cutoffs: &[CutoffRecord]) -> RankTables {
    RankTables {
        district: rank_category(cutoffs, Category::District),
        department: rank_category(cutoffs, Category::Department),
        branch: rank_category(cutoffs, Category::Branch),
        college: rank_category(cutoffs, Category::College),
    }
}

fn rank_category(cutoffs: &[CutoffRecord], category: Category) -> RankTable {
    let mut best: BTreeMap<&str, f64> = BTreeMap::new();
    for record in cutoffs {
        best.entry(record.key(category))
            .and_modify(|current| {
                if record.oc_cutoff > *current {
                    *current = record.oc_cutoff;
                }
            })
            .or_insert(record.oc_cutoff);
    }

    let mut distinct: Vec<f64> = best.values().copied().collect();
    distinct.sort_by(|a, b| b.total_cmp(a));
    distinct.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);

    let max_rank = u32::try_from(distinct.len()).ok().filter(|&count| count > 0);

    let mut entries: Vec<CategoryRankTier> = best
        .into_iter()
        .map(|(key, max_cutoff)| {
            let rank = dense_rank(&distinct, max_cutoff);
            CategoryRankTier {
                key: key.to_string(),
                max_cutoff,
                rank,
                tier: Tier::from_rank(rank, max_rank.unwrap_or(rank)),
            }
        })
        .collect();
    entries.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.key.cmp(&b.key)));

    let index = entries
        .iter()
        .enumerate()
        .map(|(position, entry)| (entry.key.clone(), position))
        .collect();

    RankTable {
        category,
        entries,
        index,
        max_rank,
    }
}

/// 1-based position of `value` among the distinct cutoffs sorted high to low.
fn dense_rank(distinct_desc: &[f64], value: f64) -> u32 {
    let position = distinct_desc
        .binary_search_by(|probe| value.total_cmp(probe))
        .unwrap_or_else(|insert_at| insert_at);
    u32::try_from(position + 1).unwrap_or(u32::MAX)
}
