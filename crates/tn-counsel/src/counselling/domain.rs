use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Quartile label derived from an entity's rank percentile within its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Top,
    Best,
    #[serde(rename = "Next-Best")]
    NextBest,
    Rest,
}

impl Tier {
    pub const fn ordered() -> [Self; 4] {
        [Self::Top, Self::Best, Self::NextBest, Self::Rest]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Best => "Best",
            Self::NextBest => "Next-Best",
            Self::Rest => "Rest",
        }
    }

    /// Fixed points awarded when the tier is part of the user's selection.
    pub const fn base_score(self) -> u8 {
        match self {
            Self::Top => 4,
            Self::Best => 3,
            Self::NextBest => 2,
            Self::Rest => 1,
        }
    }

    /// Maps a dense rank onto a quartile of the distinct ranks in its category.
    ///
    /// Quartile edges are inclusive: `rank / max_rank <= 0.25` is `Top`, `<= 0.50`
    /// is `Best`, `<= 0.75` is `Next-Best`, anything above is `Rest`. A category
    /// with a single distinct cutoff (`max_rank == 1`) places every entity in `Top`.
    pub fn from_rank(rank: u32, max_rank: u32) -> Self {
        if max_rank <= 1 {
            return Self::Top;
        }

        let percentile = f64::from(rank) / f64::from(max_rank);
        if percentile <= 0.25 {
            Self::Top
        } else if percentile <= 0.50 {
            Self::Best
        } else if percentile <= 0.75 {
            Self::NextBest
        } else {
            Self::Rest
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier '{0}', expected one of Top, Best, Next-Best, Rest")]
pub struct TierParseError(pub String);

impl FromStr for Tier {
    type Err = TierParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let compact: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match compact.as_str() {
            "top" => Ok(Self::Top),
            "best" => Ok(Self::Best),
            "nextbest" => Ok(Self::NextBest),
            "rest" => Ok(Self::Rest),
            _ => Err(TierParseError(value.to_string())),
        }
    }
}

/// The four dimensions every cutoff record is ranked along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    District,
    Department,
    Branch,
    College,
}

impl Category {
    pub const fn ordered() -> [Self; 4] {
        [Self::District, Self::Department, Self::Branch, Self::College]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::District => "District",
            Self::Department => "Department",
            Self::Branch => "Branch",
            Self::College => "College",
        }
    }
}

macro_rules! entity_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

entity_key!(
    /// Stable district identifier (`District ID`).
    DistrictId
);
entity_key!(
    /// Stable college identifier (`College code`).
    CollegeCode
);
entity_key!(
    /// Stable branch identifier (`Branch Code`).
    BranchCode
);
entity_key!(
    /// Stable department identifier (`Department ID`).
    DepartmentId
);

/// One admission-seat cutoff observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffRecord {
    pub district_id: DistrictId,
    pub college_code: CollegeCode,
    pub branch_code: BranchCode,
    pub department_id: DepartmentId,
    pub oc_cutoff: f64,
    pub year: u16,
}

impl CutoffRecord {
    /// Entity key this record contributes to when ranking `category`.
    pub fn key(&self, category: Category) -> &str {
        match category {
            Category::District => self.district_id.as_str(),
            Category::Department => self.department_id.as_str(),
            Category::Branch => self.branch_code.as_str(),
            Category::College => self.college_code.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub district_id: DistrictId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct College {
    pub college_code: CollegeCode,
    pub name: String,
    pub district_id: Option<DistrictId>,
    /// Remaining columns of the college sheet, keyed by header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub branch_code: BranchCode,
    pub name: String,
    pub department_id: Option<DepartmentId>,
    pub department_name: Option<String>,
}

/// The four normalized tables for one counselling year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub year: u16,
    pub districts: Vec<District>,
    pub colleges: Vec<College>,
    pub branches: Vec<Branch>,
    pub cutoffs: Vec<CutoffRecord>,
}
