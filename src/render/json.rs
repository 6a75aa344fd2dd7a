//! JSON rendering of an expansion

use crate::domain::Experiment;
use anyhow::Result;

/// Render experiments as a JSON array.
///
/// Compact on one line by default; `pprint` indents by two spaces.
pub fn render_json(experiments: &[Experiment], pprint: bool) -> Result<String> {
    let rendered = if pprint {
        serde_json::to_string_pretty(experiments)?
    } else {
        serde_json::to_string(experiments)?
    };
    Ok(rendered)
}
