use super::super::domain::{Category, Tier};
use super::super::master::MasterRow;
use super::views::TopTierEntry;
use serde::Serialize;
use std::collections::HashSet;

/// Number of entities listed per top-tier panel.
pub const TOP_TIER_LIMIT: usize = 10;

/// Best-ranked `Top` tier entities of every category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopTierSummary {
    pub colleges: Vec<TopTierEntry>,
    pub branches: Vec<TopTierEntry>,
    pub districts: Vec<TopTierEntry>,
    pub departments: Vec<TopTierEntry>,
}

impl TopTierSummary {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a MasterRow>,
        I::IntoIter: Clone,
    {
        let rows = rows.into_iter();
        Self {
            colleges: top_entries(rows.clone(), Category::College),
            branches: top_entries(rows.clone(), Category::Branch),
            districts: top_entries(rows.clone(), Category::District),
            departments: top_entries(rows, Category::Department),
        }
    }

    pub fn get(&self, category: Category) -> &[TopTierEntry] {
        match category {
            Category::College => &self.colleges,
            Category::Branch => &self.branches,
            Category::District => &self.districts,
            Category::Department => &self.departments,
        }
    }
}

fn top_entries<'a, I>(rows: I, category: Category) -> Vec<TopTierEntry>
where
    I: Iterator<Item = &'a MasterRow>,
{
    let mut seen = HashSet::new();
    let mut entries: Vec<TopTierEntry> = rows
        .filter_map(|row| {
            let standing = row.standing(category)?;
            if standing.tier != Tier::Top {
                return None;
            }
            let name = row.display_name(category);
            if !seen.insert(name.to_string()) {
                return None;
            }
            Some(TopTierEntry {
                name: name.to_string(),
                rank: standing.rank,
                max_cutoff: standing.max_cutoff,
            })
        })
        .collect();

    entries.sort_by_key(|entry| entry.rank);
    entries.truncate(TOP_TIER_LIMIT);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counselling::domain::{BranchCode, CollegeCode, DepartmentId, DistrictId};
    use crate::counselling::master::Standing;

    fn row(college: &str, name: Option<&str>, rank: u32, tier: Tier) -> MasterRow {
        let standing = Some(Standing {
            rank,
            tier,
            max_cutoff: 200.0 - f64::from(rank),
        });
        MasterRow {
            district_id: DistrictId::from("1"),
            college_code: CollegeCode::from(college),
            branch_code: BranchCode::from("CS"),
            department_id: DepartmentId::from("1"),
            oc_cutoff: 150.0,
            year: 2020,
            district_name: Some("Chennai".to_string()),
            college_name: name.map(str::to_string),
            branch_name: Some("Computer Science".to_string()),
            department_name: None,
            district: standing,
            department: standing,
            branch: standing,
            college: standing,
        }
    }

    #[test]
    fn lists_top_tier_entities_once_in_rank_order() {
        let rows = vec![
            row("3", Some("PSG"), 3, Tier::Top),
            row("1", Some("CEG"), 1, Tier::Top),
            row("1", Some("CEG"), 1, Tier::Top),
            row("9", Some("Rural"), 9, Tier::Rest),
            row("7", None, 2, Tier::Top),
        ];

        let summary = TopTierSummary::from_rows(&rows);
        let names: Vec<&str> = summary.colleges.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["CEG", "7", "PSG"]);
        assert_eq!(summary.colleges[0].max_cutoff, 199.0);
        assert_eq!(summary.get(Category::District).len(), 1);
        assert_eq!(summary.departments[0].name, "1");
    }

    #[test]
    fn caps_each_panel() {
        let rows: Vec<MasterRow> = (1..=15)
            .map(|rank| {
                let code = rank.to_string();
                row(&code, Some(&format!("College {rank}")), rank, Tier::Top)
            })
            .collect();

        let summary = TopTierSummary::from_rows(&rows);
        assert_eq!(summary.colleges.len(), TOP_TIER_LIMIT);
        assert_eq!(summary.colleges.last().map(|e| e.rank), Some(10));
    }
}
