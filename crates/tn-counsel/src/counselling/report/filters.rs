use super::super::domain::Category;
use super::super::master::MasterRow;
use super::super::scoring::ScoredRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Visibility filter over scored rows, matched on joined display names.
///
/// An empty list leaves that category unfiltered. Filtering never re-ranks or
/// renumbers rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowFilter {
    pub districts: Vec<String>,
    pub departments: Vec<String>,
    pub branches: Vec<String>,
    pub colleges: Vec<String>,
}

impl RowFilter {
    pub fn is_empty(&self) -> bool {
        Category::ordered()
            .into_iter()
            .all(|category| self.names(category).is_empty())
    }

    pub fn matches(&self, row: &MasterRow) -> bool {
        Category::ordered().into_iter().all(|category| {
            let wanted = self.names(category);
            wanted.is_empty()
                || row.name(category).is_some_and(|name| {
                    wanted
                        .iter()
                        .any(|candidate| candidate.trim().eq_ignore_ascii_case(name))
                })
        })
    }

    pub fn visible<'a>(&self, rows: &'a [ScoredRow]) -> Vec<&'a ScoredRow> {
        rows.iter().filter(|scored| self.matches(&scored.row)).collect()
    }

    fn names(&self, category: Category) -> &[String] {
        match category {
            Category::District => &self.districts,
            Category::Department => &self.departments,
            Category::Branch => &self.branches,
            Category::College => &self.colleges,
        }
    }
}

/// Sorted distinct names a filter can choose from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub districts: Vec<String>,
    pub departments: Vec<String>,
    pub branches: Vec<String>,
    pub colleges: Vec<String>,
}

impl FilterOptions {
    pub fn from_rows(rows: &[MasterRow]) -> Self {
        let distinct = |category: Category| -> Vec<String> {
            rows.iter()
                .filter_map(|row| row.name(category))
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        Self {
            districts: distinct(Category::District),
            departments: distinct(Category::Department),
            branches: distinct(Category::Branch),
            colleges: distinct(Category::College),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counselling::domain::{BranchCode, CollegeCode, DepartmentId, DistrictId};

    fn row(district: Option<&str>, college: &str) -> MasterRow {
        MasterRow {
            district_id: DistrictId::from("1"),
            college_code: CollegeCode::from("1"),
            branch_code: BranchCode::from("CS"),
            department_id: DepartmentId::from("1"),
            oc_cutoff: 150.0,
            year: 2020,
            district_name: district.map(str::to_string),
            college_name: Some(college.to_string()),
            branch_name: None,
            department_name: None,
            district: None,
            department: None,
            branch: None,
            college: None,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = RowFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&row(None, "CEG")));
    }

    #[test]
    fn filters_combine_across_categories() {
        let filter = RowFilter {
            districts: vec!["chennai".to_string()],
            colleges: vec!["CEG".to_string(), "MIT".to_string()],
            ..RowFilter::default()
        };

        assert!(filter.matches(&row(Some("Chennai"), "MIT")));
        assert!(!filter.matches(&row(Some("Madurai"), "MIT")));
        assert!(!filter.matches(&row(Some("Chennai"), "PSG")));
        assert!(!filter.matches(&row(None, "CEG")));
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let rows = vec![
            row(Some("Madurai"), "TCE"),
            row(Some("Chennai"), "CEG"),
            row(Some("Chennai"), "MIT"),
            row(None, "CEG"),
        ];
        let options = FilterOptions::from_rows(&rows);
        assert_eq!(options.districts, vec!["Chennai", "Madurai"]);
        assert_eq!(options.colleges, vec!["CEG", "MIT", "TCE"]);
        assert!(options.branches.is_empty());
    }
}
