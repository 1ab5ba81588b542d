//! Wire shape of the model's roadmap JSON output.
//!
//! These structs mirror the JSON contract the generation prompt mandates.
//! Every field defaults so that deserialization never fails on a missing
//! key; the validator in [`super::parser`] is what names the violation.

use serde::{Deserialize, Serialize};

/// A roadmap as the model emits it: no ids, no statuses, no timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapJson {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub milestones: Vec<MilestoneJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneJson {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub resources: Vec<ResourceJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceJson {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Raw kind string, validated against the known kinds by the parser.
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_document() {
        let raw = r#"{
            "title": "Roadmap untuk: Menjadi Dokter",
            "goal": "Menjadi dokter",
            "milestones": [
                {
                    "title": "Lulus SMA",
                    "description": "Fokus pada Biologi",
                    "timeframe": "6 Bulan",
                    "resources": [
                        {"title": "Panduan", "url": "https://example.com", "type": "link"}
                    ]
                }
            ]
        }"#;
        let parsed: RoadmapJson = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.milestones.len(), 1);
        assert_eq!(parsed.milestones[0].resources[0].kind, "link");
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let parsed: RoadmapJson = serde_json::from_str("{}").unwrap();
        assert!(parsed.title.is_empty());
        assert!(parsed.goal.is_empty());
        assert!(parsed.milestones.is_empty());
    }

    #[test]
    fn resource_kind_round_trips_as_type() {
        let resource = ResourceJson {
            title: "Sumber".to_owned(),
            url: "https://example.com".to_owned(),
            kind: "video".to_owned(),
        };
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["type"], "video");
    }
}
