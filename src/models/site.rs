use serde::{Deserialize, Serialize};
use validator::Validate;

/// Site location metadata, one row of the site reference file.
///
/// Columns not named here (site name, object id, notes) are skipped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SiteMetadata {
    #[serde(rename = "SITE CODE")]
    #[validate(length(min = 1))]
    pub code: String,

    #[serde(rename = "TOWN", default)]
    pub town: Option<String>,

    #[serde(rename = "REGION", default)]
    pub region: Option<String>,

    #[serde(rename = "LATITUDE", default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[serde(rename = "LONGITUDE", default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

impl SiteMetadata {
    pub fn new(
        code: String,
        town: Option<String>,
        region: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        Self {
            code,
            town,
            region,
            latitude,
            longitude,
        }
    }

    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
