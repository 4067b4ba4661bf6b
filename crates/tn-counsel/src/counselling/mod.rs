pub mod domain;
pub mod ingest;
pub mod master;
pub mod ranks;
pub mod report;
pub mod scoring;
mod snapshot;

pub use domain::{
    Branch, BranchCode, Category, College, CollegeCode, CutoffRecord, Dataset, DepartmentId,
    District, DistrictId, Tier, TierParseError,
};
pub use ingest::{DatasetLoader, IngestError};
pub use master::{build_master_table, MasterRow, Standing};
pub use ranks::{compute_ranks_and_tiers, CategoryRankTier, RankTable, RankTables};
pub use report::{FilterOptions, RowFilter, TopTierSummary};
pub use scoring::{
    score, NormalizedWeights, ScoredRow, ScoringRequest, TierSelection, WeightInputs,
};
pub use snapshot::DatasetSnapshot;
