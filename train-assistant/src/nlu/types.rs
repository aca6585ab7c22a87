//! Hosted NLU wire types and the advisory values derived from them.

use serde::{Deserialize, Serialize};

/// Zero-shot classification request.
#[derive(Debug, Serialize)]
pub struct ClassifyRequest<'a> {
    pub inputs: &'a str,
    pub parameters: ClassifyParameters<'a>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyParameters<'a> {
    pub candidate_labels: &'a [&'a str],
}

/// Zero-shot classification response: labels ranked best-first.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyResponse {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

/// Some deployments wrap the response in a single-element list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ClassifyPayload {
    One(ClassifyResponse),
    Many(Vec<ClassifyResponse>),
}

impl ClassifyPayload {
    /// `(label, score)` pairs, best first.
    pub fn into_ranked(self) -> Vec<(String, f64)> {
        let response = match self {
            ClassifyPayload::One(r) => Some(r),
            ClassifyPayload::Many(rs) => rs.into_iter().next(),
        };
        let Some(response) = response else {
            return Vec::new();
        };

        let mut ranked: Vec<(String, f64)> = response
            .labels
            .into_iter()
            .zip(response.scores)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Named-entity recognition request.
#[derive(Debug, Serialize)]
pub struct EntitiesRequest<'a> {
    pub inputs: &'a str,
}

/// One recognized entity, as returned by the model.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDto {
    #[serde(alias = "entity")]
    pub entity_group: String,
    pub word: String,
    #[serde(default)]
    pub score: f64,
}

/// Category of a recognized span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Location,
    Date,
    Number,
    Other,
}

impl EntityKind {
    /// Map a model tag (`LOC`, `B-GPE`, `DATE`, `CARDINAL`, ...) to a kind.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_uppercase();
        let tag = tag
            .strip_prefix("B-")
            .or_else(|| tag.strip_prefix("I-"))
            .unwrap_or(&tag);
        match tag {
            "LOC" | "LOCATION" | "GPE" | "FAC" => EntityKind::Location,
            "DATE" | "TIME" => EntityKind::Date,
            "CARDINAL" | "NUM" | "NUMBER" | "QUANTITY" => EntityKind::Number,
            _ => EntityKind::Other,
        }
    }
}

/// A tagged span of the input text.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    pub kind: EntityKind,
    pub text: String,
    pub score: f64,
}

impl From<EntityDto> for EntitySpan {
    fn from(dto: EntityDto) -> Self {
        Self {
            kind: EntityKind::from_tag(&dto.entity_group),
            text: dto.word.trim().to_string(),
            score: dto.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_request_shape() {
        let labels = ["train_search", "train_status"];
        let req = ClassifyRequest {
            inputs: "trains to Goa",
            parameters: ClassifyParameters {
                candidate_labels: &labels,
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["inputs"], "trains to Goa");
        assert_eq!(json["parameters"]["candidate_labels"][1], "train_status");
    }

    #[test]
    fn ranked_labels_sorted_best_first() {
        let payload: ClassifyPayload = serde_json::from_str(
            r#"{"labels": ["train_status", "train_search"], "scores": [0.2, 0.7]}"#,
        )
        .unwrap();
        let ranked = payload.into_ranked();
        assert_eq!(ranked[0].0, "train_search");
        assert_eq!(ranked[1].0, "train_status");
    }

    #[test]
    fn wrapped_payload_is_unwrapped() {
        let payload: ClassifyPayload = serde_json::from_str(
            r#"[{"labels": ["seat_availability"], "scores": [0.9]}]"#,
        )
        .unwrap();
        assert_eq!(payload.into_ranked(), vec![("seat_availability".to_string(), 0.9)]);

        let payload: ClassifyPayload = serde_json::from_str("[]").unwrap();
        assert!(payload.into_ranked().is_empty());
    }

    #[test]
    fn entity_tags_map_to_kinds() {
        assert_eq!(EntityKind::from_tag("LOC"), EntityKind::Location);
        assert_eq!(EntityKind::from_tag("b-gpe"), EntityKind::Location);
        assert_eq!(EntityKind::from_tag("DATE"), EntityKind::Date);
        assert_eq!(EntityKind::from_tag("CARDINAL"), EntityKind::Number);
        assert_eq!(EntityKind::from_tag("PER"), EntityKind::Other);
    }

    #[test]
    fn entity_dto_accepts_either_tag_field() {
        let grouped: EntityDto =
            serde_json::from_str(r#"{"entity_group": "LOC", "word": " Delhi ", "score": 0.98}"#)
                .unwrap();
        let span = EntitySpan::from(grouped);
        assert_eq!(span.kind, EntityKind::Location);
        assert_eq!(span.text, "Delhi");

        let token: EntityDto = serde_json::from_str(r#"{"entity": "B-LOC", "word": "Pune"}"#).unwrap();
        assert_eq!(EntitySpan::from(token).kind, EntityKind::Location);
    }
}
