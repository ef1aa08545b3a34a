use serde::{Deserialize, Serialize};

const OLDEST_PARSEABLE_YEAR: i32 = 1990;

/// Structured view of a free-text vehicle description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub year: i32,
    pub make: String,
    pub model: String,
}

impl VehicleInfo {
    /// Parse a "YYYY Make Model" string. A leading four-digit token within
    /// `[1990, current_year + 1]` is taken as the model year; otherwise the
    /// whole string is treated as make + model and the vehicle is assumed to
    /// be from the current year.
    pub fn parse(raw: &str, current_year: i32) -> Self {
        let trimmed = raw.trim();
        let mut tokens = trimmed.split_whitespace();

        let first = tokens.next().unwrap_or_default();
        let leading_year = if first.len() == 4 {
            first
                .parse::<i32>()
                .ok()
                .filter(|year| (OLDEST_PARSEABLE_YEAR..=current_year + 1).contains(year))
        } else {
            None
        };

        match leading_year {
            Some(year) => {
                let make = tokens.next().unwrap_or_default().to_string();
                let model = tokens.collect::<Vec<_>>().join(" ");
                Self { year, make, model }
            }
            None => {
                let make = first.to_string();
                let model = tokens.collect::<Vec<_>>().join(" ");
                Self {
                    year: current_year,
                    make,
                    model,
                }
            }
        }
    }

    /// Vehicle age in whole years, floored at zero for next-model-year cars.
    pub fn age(&self, current_year: i32) -> u32 {
        (current_year - self.year).max(0) as u32
    }
}
