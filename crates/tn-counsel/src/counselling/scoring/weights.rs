use super::super::domain::Category;
use crate::error::RequestError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WEIGHT: f64 = 25.0;
pub const MAX_WEIGHT: f64 = 100.0;
const EQUAL_SHARE: f64 = 0.25;

/// Raw importance sliders, each intended to sit in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightInputs {
    pub district: f64,
    pub department: f64,
    pub branch: f64,
    pub college: f64,
}

impl Default for WeightInputs {
    fn default() -> Self {
        Self {
            district: DEFAULT_WEIGHT,
            department: DEFAULT_WEIGHT,
            branch: DEFAULT_WEIGHT,
            college: DEFAULT_WEIGHT,
        }
    }
}

impl WeightInputs {
    pub fn new(district: f64, department: f64, branch: f64, college: f64) -> Self {
        Self {
            district,
            department,
            branch,
            college,
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::District => self.district,
            Category::Department => self.department,
            Category::Branch => self.branch,
            Category::College => self.college,
        }
    }

    /// Checks that every slider is a whole number in `0..=MAX_WEIGHT`.
    pub fn validated(self) -> Result<Self, RequestError> {
        for category in Category::ordered() {
            let value = self.get(category);
            if !is_slider_value(value) {
                return Err(RequestError::WeightOutOfRange {
                    category: category.label(),
                    value,
                });
            }
        }
        Ok(self)
    }

    /// Divides every weight by the total. Negative or non-finite inputs count as 0,
    /// and an all-zero quadruple falls back to equal shares.
    pub fn normalize(&self) -> NormalizedWeights {
        let district = sanitize(self.district);
        let department = sanitize(self.department);
        let branch = sanitize(self.branch);
        let college = sanitize(self.college);
        let total = district + department + branch + college;

        if total <= 0.0 || !total.is_finite() {
            return NormalizedWeights::equal();
        }

        NormalizedWeights {
            district: district / total,
            department: department / total,
            branch: branch / total,
            college: college / total,
        }
    }
}

/// Slider positions are whole numbers from 0 to `MAX_WEIGHT`.
pub fn is_slider_value(value: f64) -> bool {
    (0.0..=MAX_WEIGHT).contains(&value) && value.fract() == 0.0
}

fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Weights that sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedWeights {
    pub district: f64,
    pub department: f64,
    pub branch: f64,
    pub college: f64,
}

impl NormalizedWeights {
    pub const fn equal() -> Self {
        Self {
            district: EQUAL_SHARE,
            department: EQUAL_SHARE,
            branch: EQUAL_SHARE,
            college: EQUAL_SHARE,
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::District => self.district,
            Category::Department => self.department,
            Category::Branch => self.branch,
            Category::College => self.college,
        }
    }

    pub fn sum(&self) -> f64 {
        self.district + self.department + self.branch + self.college
    }
}
