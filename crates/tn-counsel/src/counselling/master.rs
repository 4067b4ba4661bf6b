use super::domain::{
    Branch, BranchCode, Category, College, CollegeCode, CutoffRecord, DepartmentId, District,
    DistrictId, Tier,
};
use super::ranks::{RankTable, RankTables};
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::warn;

/// Rank and tier an entity holds within one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Standing {
    pub rank: u32,
    pub tier: Tier,
    pub max_cutoff: f64,
}

/// A cutoff record joined with reference names and the four category standings.
///
/// Identifier columns always come from the cutoff side; joined fields are `None`
/// when the reference or rank table has no matching key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterRow {
    pub district_id: DistrictId,
    pub college_code: CollegeCode,
    pub branch_code: BranchCode,
    pub department_id: DepartmentId,
    pub oc_cutoff: f64,
    pub year: u16,
    pub district_name: Option<String>,
    pub college_name: Option<String>,
    pub branch_name: Option<String>,
    pub department_name: Option<String>,
    pub district: Option<Standing>,
    pub department: Option<Standing>,
    pub branch: Option<Standing>,
    pub college: Option<Standing>,
}

impl MasterRow {
    pub fn standing(&self, category: Category) -> Option<Standing> {
        match category {
            Category::District => self.district,
            Category::Department => self.department,
            Category::Branch => self.branch,
            Category::College => self.college,
        }
    }

    pub fn tier(&self, category: Category) -> Option<Tier> {
        self.standing(category).map(|standing| standing.tier)
    }

    pub fn rank(&self, category: Category) -> Option<u32> {
        self.standing(category).map(|standing| standing.rank)
    }

    pub fn name(&self, category: Category) -> Option<&str> {
        match category {
            Category::District => self.district_name.as_deref(),
            Category::Department => self.department_name.as_deref(),
            Category::Branch => self.branch_name.as_deref(),
            Category::College => self.college_name.as_deref(),
        }
    }

    pub fn key(&self, category: Category) -> &str {
        match category {
            Category::District => self.district_id.as_str(),
            Category::Department => self.department_id.as_str(),
            Category::Branch => self.branch_code.as_str(),
            Category::College => self.college_code.as_str(),
        }
    }

    /// Joined name, falling back to the identifier when the join found nothing.
    pub fn display_name(&self, category: Category) -> &str {
        self.name(category).unwrap_or_else(|| self.key(category))
    }
}

/// Left-joins every cutoff record onto the reference tables and rank tables.
///
/// Produces exactly one row per cutoff record, in input order.
pub fn build_master_table(
    cutoffs: &[CutoffRecord],
    districts: &[District],
    colleges: &[College],
    branches: &[Branch],
    ranks: &RankTables,
) -> Vec<MasterRow> {
    let districts = index_first(districts, "district", |district| &district.district_id);
    let colleges = index_first(colleges, "college", |college| &college.college_code);
    let branches = index_first(branches, "branch", |branch| &branch.branch_code);

    cutoffs
        .iter()
        .map(|record| {
            let district = districts.get(&record.district_id);
            let college = colleges.get(&record.college_code);
            let branch = branches.get(&record.branch_code);

            MasterRow {
                district_id: record.district_id.clone(),
                college_code: record.college_code.clone(),
                branch_code: record.branch_code.clone(),
                department_id: record.department_id.clone(),
                oc_cutoff: record.oc_cutoff,
                year: record.year,
                district_name: district.map(|district| district.name.clone()),
                college_name: college.map(|college| college.name.clone()),
                branch_name: branch.map(|branch| branch.name.clone()),
                department_name: branch.and_then(|branch| branch.department_name.clone()),
                district: lookup(&ranks.district, record, Category::District),
                department: lookup(&ranks.department, record, Category::Department),
                branch: lookup(&ranks.branch, record, Category::Branch),
                college: lookup(&ranks.college, record, Category::College),
            }
        })
        .collect()
}

fn lookup(table: &RankTable, record: &CutoffRecord, category: Category) -> Option<Standing> {
    table.get(record.key(category)).map(|entry| Standing {
        rank: entry.rank,
        tier: entry.tier,
        max_cutoff: entry.max_cutoff,
    })
}

fn index_first<'a, T, K, F>(rows: &'a [T], table: &'static str, key: F) -> HashMap<&'a K, &'a T>
where
    K: Eq + Hash + std::fmt::Display + 'a,
    F: Fn(&'a T) -> &'a K,
{
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        let id = key(row);
        if index.contains_key(id) {
            warn!(table, key = %id, "duplicate reference key, keeping first row");
            continue;
        }
        index.insert(id, row);
    }
    index
}
