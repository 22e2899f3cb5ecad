//! Which flat-file cells count as missing

use serde::{Deserialize, Serialize};

/// Cell spellings that mean "no value".
///
/// Surrounding whitespace is ignored; a missing cell becomes `null` in the sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    pub markers: Vec<String>,
    pub ignore_case: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        let markers = ["", "-", "NA", "N/A", "null", "None", "NaN"];
        Self {
            markers: markers.iter().map(|m| m.to_string()).collect(),
            ignore_case: true,
        }
    }
}

impl NullConfig {
    pub fn is_null(&self, cell: &str) -> bool {
        let cell = cell.trim();
        self.markers.iter().any(|marker| match self.ignore_case {
            true => marker.trim().eq_ignore_ascii_case(cell),
            false => marker.trim() == cell,
        })
    }
}
