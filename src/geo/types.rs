use serde::{Deserialize, Serialize};

/// Place suggestion in the shape the location input consumes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationSuggestion {
    pub place_id: String,
    pub description: String,
    pub structured_formatting: StructuredFormatting,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StructuredFormatting {
    #[serde(default)]
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: String,
}
