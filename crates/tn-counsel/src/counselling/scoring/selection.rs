use super::super::domain::Tier;
use serde::{Deserialize, Serialize};

/// Subset of tiers a counselee wants to reward for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Tier>", into = "Vec<Tier>")]
pub struct TierSelection {
    mask: u8,
}

impl TierSelection {
    pub const fn all() -> Self {
        Self { mask: 0b1111 }
    }

    /// Builds the exact subset named by `tiers`, which may be empty.
    pub fn exact<I>(tiers: I) -> Self
    where
        I: IntoIterator<Item = Tier>,
    {
        let mask = tiers
            .into_iter()
            .fold(0u8, |mask, tier| mask | Self::bit(tier));
        Self { mask }
    }

    /// Builds a selection from user input, where a cleared filter means every tier.
    pub fn from_user<I>(tiers: I) -> Self
    where
        I: IntoIterator<Item = Tier>,
    {
        let selection = Self::exact(tiers);
        if selection.is_empty() {
            Self::all()
        } else {
            selection
        }
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.mask & Self::bit(tier) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn tiers(&self) -> Vec<Tier> {
        Tier::ordered()
            .into_iter()
            .filter(|tier| self.contains(*tier))
            .collect()
    }

    /// Tier score for a row: the tier's base points if selected, otherwise 0.
    pub fn score(&self, tier: Option<Tier>) -> u8 {
        match tier {
            Some(tier) if self.contains(tier) => tier.base_score(),
            _ => 0,
        }
    }

    const fn bit(tier: Tier) -> u8 {
        match tier {
            Tier::Top => 0b0001,
            Tier::Best => 0b0010,
            Tier::NextBest => 0b0100,
            Tier::Rest => 0b1000,
        }
    }
}

impl Default for TierSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Vec<Tier>> for TierSelection {
    fn from(tiers: Vec<Tier>) -> Self {
        Self::from_user(tiers)
    }
}

impl From<TierSelection> for Vec<Tier> {
    fn from(selection: TierSelection) -> Self {
        selection.tiers()
    }
}
