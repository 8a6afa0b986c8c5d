use serde::{Deserialize, Serialize};

/// Reverse-geocoded placemark.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        [
            &self.house_number,
            &self.street,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|f| f.as_deref().map(str::trim).unwrap_or("").is_empty())
    }

    /// Two-line label: "number street" then "locality region postcode".
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No Address".to_string();
        }

        let line1 = join_present(&[&self.house_number, &self.street]);
        let line2 = join_present(&[&self.locality, &self.region, &self.postal_code]);

        match (line1.is_empty(), line2.is_empty()) {
            (false, false) => format!("{}\n{}", line1, line2),
            (false, true) => line1,
            (true, false) => line2,
            // only the country is known
            (true, true) => self.country.clone().unwrap_or_default(),
        }
    }
}

fn join_present(parts: &[&Option<String>]) -> String {
    parts
        .iter()
        .filter_map(|p| p.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
