use super::super::domain::Category;
use super::ScoredRow;
use std::cmp::Ordering;

/// Tier-dominant comparison: tier sum, final score and OC cutoff descending, then
/// college rank ascending with unranked colleges last.
pub fn compare_scored(a: &ScoredRow, b: &ScoredRow) -> Ordering {
    b.sum_of_tiers
        .cmp(&a.sum_of_tiers)
        .then_with(|| b.final_score.total_cmp(&a.final_score))
        .then_with(|| b.row.oc_cutoff.total_cmp(&a.row.oc_cutoff))
        .then_with(|| {
            rank_ascending(
                a.row.rank(Category::College),
                b.row.rank(Category::College),
            )
        })
}

fn rank_ascending(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable-sorts the rows and numbers them `1..=n` in their final position.
pub(crate) fn assign_choose_order(rows: &mut [ScoredRow]) {
    rows.sort_by(compare_scored);
    for (position, row) in rows.iter_mut().enumerate() {
        row.choose_order = position + 1;
    }
}
