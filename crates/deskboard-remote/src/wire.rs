//! Raw payload shapes from the third-party board API.
//!
//! Everything optional defaults: a partial payload must deserialize, and
//! the normalization step turns whatever arrived into a well-formed
//! snapshot. These types never leak past this crate.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireBoard {
    #[serde(default)]
    pub lists: Vec<WireList>,
    #[serde(default)]
    pub cards: Vec<WireCard>,
    #[serde(default, rename = "customFields")]
    pub custom_fields: Vec<WireCustomFieldDef>,
    #[serde(default)]
    pub members: Vec<WireMember>,
    #[serde(default)]
    pub labels: Vec<WireLabel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireList {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pos: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub id_list: String,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub labels: Vec<WireLabel>,
    #[serde(default)]
    pub id_members: Vec<String>,
    #[serde(default)]
    pub custom_field_items: Vec<WireCustomFieldItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireLabel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMember {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCustomFieldDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub options: Vec<WireCustomFieldOption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireCustomFieldOption {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: WireOptionValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireOptionValue {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCustomFieldItem {
    #[serde(default)]
    pub id_custom_field: String,
    #[serde(default)]
    pub id_value: Option<String>,
    #[serde(default)]
    pub value: Option<WireFieldValue>,
}

/// The API wraps scalar values in a one-key object; numbers and checkbox
/// states arrive as strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireFieldValue {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub checked: Option<String>,
}

impl WireFieldValue {
    pub fn as_string(&self) -> Option<String> {
        self.text
            .clone()
            .or_else(|| self.number.clone())
            .or_else(|| self.checked.clone())
    }
}
