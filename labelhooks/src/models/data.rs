//! Labeling data settings: the order in which uploaded files become frames.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Width of the stored `sorting_method` column
pub const SORTING_METHOD_MAX_LENGTH: usize = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortingMethod {
    #[default]
    Lexicographical,
    Natural,
    Predefined,
    Random,
}

impl SortingMethod {
    pub const ALL: [SortingMethod; 4] = [
        SortingMethod::Lexicographical,
        SortingMethod::Natural,
        SortingMethod::Predefined,
        SortingMethod::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortingMethod::Lexicographical => "lexicographical",
            SortingMethod::Natural => "natural",
            SortingMethod::Predefined => "predefined",
            SortingMethod::Random => "random",
        }
    }

    /// Order file names for framing
    pub fn sort(&self, mut names: Vec<String>) -> Vec<String> {
        match self {
            SortingMethod::Lexicographical => names.sort(),
            SortingMethod::Natural => names.sort_by(|a, b| natural_cmp(a, b)),
            SortingMethod::Predefined => {}
            SortingMethod::Random => names.shuffle(&mut rand::rng()),
        }
        names
    }
}

impl fmt::Display for SortingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortingMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| format!("\"{}\" is not a valid sorting method", s))
    }
}

/// Compare strings treating each run of ASCII digits as one number.
///
/// `frame_2.png` sorts before `frame_10.png`. Equal numeric values with
/// different zero padding fall back to the shorter run first.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let start_a = i;
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            let start_b = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }

            let run_a = trim_leading_zeros(&a[start_a..i]);
            let run_b = trim_leading_zeros(&b[start_b..j]);
            let ordering = run_a
                .len()
                .cmp(&run_b.len())
                .then_with(|| run_a.cmp(run_b))
                .then_with(|| (i - start_a).cmp(&(j - start_b)));
            if ordering != Ordering::Equal {
                return ordering;
            }
        } else {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                other => return other,
            }
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&d| d == b'0').count();
    &digits[zeros..]
}

/// Files uploaded for labeling together with their framing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelingData {
    #[serde(default)]
    pub sorting_method: SortingMethod,
    #[serde(default)]
    pub files: Vec<String>,
}

impl LabelingData {
    /// File names in frame order
    pub fn ordered_files(&self) -> Vec<String> {
        self.sorting_method.sort(self.files.clone())
    }
}
