use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Contact details captured on the contact pane. All fields are optional;
/// whether they reach the backend at all is decided by the form's
/// `send_contact_info` flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Geographic point, WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Where the problem is: a map pin, a free-text address, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocationInfo {
    pub location: Option<LatLng>,
    pub address: Option<String>,
}

impl LocationInfo {
    /// True once either a pin or a non-blank address has been captured.
    pub fn is_captured(&self) -> bool {
        self.location.is_some()
            || self
                .address
                .as_deref()
                .is_some_and(|address| !address.trim().is_empty())
    }
}
