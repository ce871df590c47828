use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

use super::StoryConfig;

pub const STORY_CONFIG_JSON_SCHEMA_V1: u32 = 1;

/// Versioned envelope for shipping a [`StoryConfig`] next to page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: StoryConfig,
}

impl StoryConfig {
    pub fn to_json_pretty(&self) -> MapResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MapError::Parse(format!("failed to serialize story config: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> MapResult<String> {
        let payload = StoryConfigJsonContractV1 {
            schema_version: STORY_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            MapError::Parse(format!("failed to serialize story config contract v1: {e}"))
        })
    }

    /// Parses either a bare config object or a v1 contract envelope, then
    /// validates the result.
    ///
    /// A document carrying `schema_version` is always read as an envelope.
    pub fn from_json_str(input: &str) -> MapResult<Self> {
        let document: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| MapError::Parse(format!("failed to parse story config json: {e}")))?;
        let config = if document.get("schema_version").is_some() {
            let payload: StoryConfigJsonContractV1 =
                serde_json::from_value(document).map_err(|e| {
                    MapError::Parse(format!("failed to parse story config contract: {e}"))
                })?;
            if payload.schema_version != STORY_CONFIG_JSON_SCHEMA_V1 {
                return Err(MapError::Parse(format!(
                    "unsupported story config schema version: {}",
                    payload.schema_version
                )));
            }
            payload.config
        } else {
            serde_json::from_value::<StoryConfig>(document)
                .map_err(|e| MapError::Parse(format!("failed to parse story config: {e}")))?
        };
        config.validate()?;
        Ok(config)
    }
}
