use serde::Deserialize;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    // Default so an absent field is rejected by the handler with a 400
    // instead of a deserialization error.
    #[serde(default)]
    pub url: String,
}
