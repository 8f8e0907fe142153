//! Chemistry style suggestions by playing position.

const ATTACKING: &[&str] = &["ST", "CF", "LW", "RW", "LM", "RM", "CAM", "CM", "RF", "LF"];
const DEFENSIVE: &[&str] = &["CB", "LB", "RB", "LWB", "RWB", "CDM"];

/// Suggested chemistry styles for a position code.
#[must_use]
pub fn chemistry_hint(position: Option<&str>) -> &'static str {
    let position = position.unwrap_or_default().trim().to_ascii_uppercase();
    if ATTACKING.contains(&position.as_str()) {
        return "Hunter / Engine / Finisher";
    }
    if DEFENSIVE.contains(&position.as_str()) {
        return if position == "CB" || position == "CDM" {
            "Shadow / Anchor"
        } else {
            "Shadow"
        };
    }
    if position == "GK" {
        "Basic"
    } else {
        "Basic / Engine"
    }
}
