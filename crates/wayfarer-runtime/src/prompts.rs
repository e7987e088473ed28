//! Prompt templates and the ratings template skeleton.

use std::path::Path;

use serde_json::{json, Value};
use tracing::{debug, warn};

/// Score categories every profile is asked for, in display order.
pub const SCORE_CATEGORIES: [&str; 11] = [
    "freedom",
    "environment",
    "culture",
    "healthcare",
    "education",
    "living_costs",
    "safety",
    "taxation",
    "internet_access",
    "tolerance",
    "outdoors",
];

/// Country profile prompt for the search service.
pub fn country_prompt(location: &str, keyword: &str) -> String {
    let scores = SCORE_CATEGORIES
        .iter()
        .map(|c| format!("        \"{}\": <1-10>", c))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"Create a country profile for {location} focusing on {keyword}.
Use only verified, real-world information.
Follow this exact JSON structure:
{{
    "location": {{
        "name": "{location}",
        "region": "<verified region>",
        "country": "<verified country>"
    }},
    "scores": {{
{scores}
    }},
    "summary": {{
        "total_score": <sum of all scores>,
        "strengths": [
            "<verified strength 1>",
            "<verified strength 2>",
            "<verified strength 3>",
            "<verified strength 4>"
        ],
        "weaknesses": [
            "<verified weakness 1>",
            "<verified weakness 2>"
        ],
        "overall_notes": "<factual summary paragraph>"
    }}
}}
Format as ```json```."#
    )
}

/// Candidate locations prompt for the search service.
pub fn locations_prompt(location: &str, keyword: &str, radius_km: u32, count: usize) -> String {
    format!(
        r#"List exactly {count} verified, real-world locations within {radius_km}km of {location} that are great for {keyword}.
Only include locations that actually exist with accurate coordinates.
Follow this exact JSON structure:
{{
    "recommended_locations": [
        {{
            "name": "<verified location name>",
            "region": "<verified region name>",
            "coords": {{
                "lat": <exact latitude>,
                "lng": <exact longitude>
            }},
            "brief": "<factual description>"
        }}
    ]
}}
Ensure all coordinates and details are accurate. Format as ```json```."#
    )
}

/// Detailed ratings prompt for the conversational service.
pub fn ratings_prompt(location_name: &str, summary: &str, template: &Value) -> String {
    let skeleton = serde_json::to_string_pretty(template).unwrap_or_else(|_| template.to_string());
    format!(
        r#"Generate detailed ratings for {location_name} based on this summary:
{summary}

Follow the exact structure of this template, but generate appropriate scores and descriptions:
{skeleton}

Ensure all scores are realistic and justified by available data.
Format response as ```json```."#
    )
}

fn subcategory(names: &[&str]) -> Value {
    let mut map = serde_json::Map::new();
    for name in names {
        map.insert(
            (*name).to_string(),
            json!({"score": 0, "description": ""}),
        );
    }
    Value::Object(map)
}

/// Ratings skeleton used when no template file is configured.
pub fn builtin_score_template() -> Value {
    let subcategories: [(&str, &[&str]); 11] = [
        ("freedom", &["civil_liberties", "press_freedom"]),
        ("environment", &["air_quality", "green_space"]),
        ("culture", &["heritage", "food_scene", "events"]),
        ("healthcare", &["hospital_access", "quality_of_care"]),
        ("education", &["schools", "universities"]),
        ("living_costs", &["housing", "food", "transport"]),
        ("safety", &["crime", "natural_hazards"]),
        ("taxation", &["income_tax", "consumption_tax"]),
        ("internet_access", &["speed", "coverage"]),
        ("tolerance", &["lgbtq_acceptance", "foreigner_friendliness"]),
        ("outdoors", &["trails", "beaches", "wildlife"]),
    ];

    let mut scores = serde_json::Map::new();
    for (category, subs) in subcategories {
        scores.insert(
            category.to_string(),
            json!({
                "overall_score": 0,
                "subcategories": subcategory(subs),
                "notes": ""
            }),
        );
    }

    json!({
        "location": {"name": "", "region": "", "country": ""},
        "scores": scores,
        "summary": {"total_score": 0, "strengths": [], "weaknesses": [], "overall_notes": ""}
    })
}

/// Ratings skeleton from `path`, or the built-in one when the file is
/// missing or malformed.
pub fn load_score_template(path: &Path) -> Value {
    if !path.is_file() {
        debug!("No score template at {}, using built-in", path.display());
        return builtin_score_template();
    }
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|data| serde_json::from_str::<Value>(&data).map_err(|e| e.to_string()));
    match parsed {
        Ok(value) if value.is_object() => value,
        Ok(_) => {
            warn!("Score template {} is not a JSON object, using built-in", path.display());
            builtin_score_template()
        }
        Err(e) => {
            warn!("Error loading score template {}: {}", path.display(), e);
            builtin_score_template()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_prompt_lists_categories() {
        let prompt = country_prompt("Ella", "hiking");
        assert!(prompt.contains("country profile for Ella focusing on hiking"));
        for category in SCORE_CATEGORIES {
            assert!(prompt.contains(&format!("\"{}\": <1-10>", category)));
        }
        assert!(prompt.contains("```json```"));
    }

    #[test]
    fn test_locations_prompt() {
        let prompt = locations_prompt("Ella", "hiking", 30, 5);
        assert!(prompt.contains("exactly 5 verified"));
        assert!(prompt.contains("within 30km of Ella"));
        assert!(prompt.contains("\"recommended_locations\""));
    }

    #[test]
    fn test_ratings_prompt_embeds_template() {
        let prompt = ratings_prompt("Ella", "Misty hills", &json!({"scores": {"safety": {}}}));
        assert!(prompt.contains("Misty hills"));
        assert!(prompt.contains("\"safety\""));
    }

    #[test]
    fn test_builtin_template_shape() {
        let template = builtin_score_template();
        let scores = template["scores"].as_object().unwrap();
        assert_eq!(scores.len(), SCORE_CATEGORIES.len());
        assert!(scores["outdoors"]["subcategories"]["trails"]["score"].is_number());
    }

    #[test]
    fn test_load_score_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("score_template.json");
        assert_eq!(load_score_template(&path), builtin_score_template());

        std::fs::write(&path, r#"{"scores": {"nightlife": {"overall_score": 0}}}"#).unwrap();
        assert!(load_score_template(&path)["scores"]["nightlife"].is_object());

        std::fs::write(&path, "{broken").unwrap();
        assert_eq!(load_score_template(&path), builtin_score_template());
    }
}
