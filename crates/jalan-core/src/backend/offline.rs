//! Deterministic offline fallback synthesis.
//!
//! When the backend is unreachable, rate-limited, or explicitly disabled,
//! the client substitutes a plausible canned response so the rest of the
//! system stays usable and testable without live access. The library is
//! embedded at compile time from `fallbacks.toml`: keyword-matched roadmap
//! presets for structured prompts, and a quote pool for freeform ones.

use serde::Deserialize;
use serde_json::json;

/// A canned roadmap preset from the embedded library.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackPreset {
    /// Lowercase keywords matched against the prompt. Empty marks the
    /// generic template.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub title: String,
    pub goal: String,
    pub milestones: Vec<MilestoneSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MilestoneSeed {
    pub title: String,
    pub description: String,
    pub timeframe: String,
    #[serde(default)]
    pub resources: Vec<ResourceSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceSeed {
    pub title: String,
    pub url: String,
    pub kind: String,
}

#[derive(Debug, Deserialize)]
struct FallbackFile {
    quotes: Vec<String>,
    presets: Vec<FallbackPreset>,
}

/// The embedded fallback library TOML.
static FALLBACKS_TOML: &str = include_str!("fallbacks.toml");

/// Canned responses for offline synthesis.
#[derive(Debug)]
pub struct OfflineLibrary {
    presets: Vec<FallbackPreset>,
    quotes: Vec<String>,
}

impl OfflineLibrary {
    /// Load the compile-time embedded library.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. This is a compile-time
    /// invariant -- if the crate was built, the TOML is valid.
    pub fn embedded() -> Self {
        let file: FallbackFile =
            toml::from_str(FALLBACKS_TOML).expect("embedded fallbacks.toml is invalid");
        Self {
            presets: file.presets,
            quotes: file.quotes,
        }
    }

    /// Synthesize a response for the given prompt text.
    ///
    /// A prompt carrying a quoted goal and a JSON output mandate gets a
    /// roadmap JSON document; anything else gets a canned freeform line.
    /// The same prompt always yields the same response.
    pub fn synthesize(&self, prompt: &str) -> String {
        match extract_goal(prompt) {
            Some(goal) if wants_json(prompt) => self.roadmap_json(goal, prompt),
            _ => self.quote_for(prompt).to_owned(),
        }
    }

    /// Pick the roadmap preset for a prompt and render it as a JSON string
    /// in the shape the validator expects.
    fn roadmap_json(&self, goal: &str, prompt: &str) -> String {
        let lowered = prompt.to_lowercase();
        let preset = self
            .presets
            .iter()
            .filter(|p| !p.keywords.is_empty())
            .find(|p| p.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .or_else(|| self.presets.iter().find(|p| p.keywords.is_empty()))
            .expect("fallback library has no generic preset");

        let milestones: Vec<_> = preset
            .milestones
            .iter()
            .map(|m| {
                json!({
                    "title": m.title,
                    "description": m.description,
                    "timeframe": m.timeframe,
                    "resources": m.resources.iter().map(|r| json!({
                        "title": r.title,
                        "url": r.url,
                        "type": r.kind,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        let document = json!({
            "title": preset.title.replace("{goal}", goal),
            "goal": preset.goal.replace("{goal}", goal),
            "milestones": milestones,
        });
        document.to_string()
    }

    fn quote_for(&self, prompt: &str) -> &str {
        // Stable selection: the same prompt keeps getting the same line.
        let index = prompt.len() % self.quotes.len();
        &self.quotes[index]
    }
}

/// Whether the prompt mandates JSON output (the roadmap generation contract).
fn wants_json(prompt: &str) -> bool {
    prompt.contains("JSON")
}

/// Extract the quoted goal from a generation prompt.
///
/// Prompts embed the goal as `tujuan: "<goal>"`; freeform prompts have no
/// such marker and return `None`.
fn extract_goal(prompt: &str) -> Option<&str> {
    let start = prompt.find("tujuan: \"")? + "tujuan: \"".len();
    let rest = &prompt[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}
