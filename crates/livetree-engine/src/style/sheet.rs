//! Process-wide style plumbing shared by all rendered inputs: the custom
//! stylesheet handle and the unique input-id source.

use std::sync::atomic::{AtomicU64, Ordering};

use super::StyleRecord;

/// Identifier of the shared custom stylesheet.
pub const CUSTOM_SHEET_ID: &str = "livetree-custom-styles";

static INPUT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns the next distinct input identifier (`livetree-input-{n}`).
///
/// The counter is process-wide and monotonically increasing; it resets only
/// on process restart.
pub fn next_input_id() -> String {
    format!(
        "livetree-input-{}",
        INPUT_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

/// A single selector/body rule inside the custom sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRule {
    pub selector: String,
    pub body: String,
}

/// The shared custom stylesheet: created once, append-only, torn down never.
#[derive(Debug)]
pub struct StyleSheet {
    pub id: &'static str,
    rules: Vec<SheetRule>,
}

impl StyleSheet {
    pub fn rules(&self) -> &[SheetRule] {
        &self.rules
    }

    pub fn has_rule(&self, selector: &str) -> bool {
        self.rules.iter().any(|r| r.selector == selector)
    }

    pub fn insert_rule(&mut self, rule: SheetRule) {
        self.rules.push(rule);
    }
}

/// Owner of the process-lifetime stylesheet resource.
///
/// The registry is handed to whichever component needs to append rules;
/// [`StyleRegistry::ensure_sheet`] is idempotent (check-before-create), so
/// repeated initialization never duplicates the sheet.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    sheet: Option<StyleSheet>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self) -> Option<&StyleSheet> {
        self.sheet.as_ref()
    }

    /// Returns the sheet, creating it on first use.
    pub fn ensure_sheet(&mut self) -> &mut StyleSheet {
        self.sheet.get_or_insert_with(|| StyleSheet {
            id: CUSTOM_SHEET_ID,
            rules: Vec::new(),
        })
    }
}

/// Builds the code-block backdrop rules for one input.
///
/// `line_height` is the measured height of a rendered line; the backdrop
/// offsets itself by it and by the `pre` record's padding so the fence
/// syntax rows line up with the block background.
pub fn pre_block_rules(input_id: &str, line_height: f32, pre: &StyleRecord) -> Vec<SheetRule> {
    let padding = pre.padding.unwrap_or(5.0);
    let background = pre.background_color.as_deref().unwrap_or("lightgray");
    let border_radius = pre.border_radius.unwrap_or(4.0);
    let border_color = pre.border_color.as_deref().unwrap_or("grey");

    vec![
        SheetRule {
            selector: format!(".{input_id} [data-type=\"pre\"]::before"),
            body: format!(
                "top: {}px; padding: {}px; background-color: {background}; \
                 border-radius: {border_radius}px; border-color: {border_color};",
                line_height.floor(),
                padding - 1.0
            ),
        },
        SheetRule {
            selector: format!(
                ".{input_id} [data-type=\"line\"] [data-type=\"syntax\"]:has(+ [data-type=\"pre\"])"
            ),
            body: format!("transform: translate(-{padding}px, -{padding}px);"),
        },
        SheetRule {
            selector: format!(
                ".{input_id} [data-type=\"line\"] [data-type=\"pre\"] + [data-type=\"syntax\"]"
            ),
            body: format!("transform: translate(-{padding}px, {padding}px);"),
        },
        SheetRule {
            selector: format!(
                ".{input_id} [data-type=\"line\"] [data-type=\"pre\"] + [data-type=\"syntax\"] + [data-type=\"text\"]"
            ),
            body: format!("transform: translate(-{padding}px, {padding}px);"),
        },
    ]
}

/// Installs the code-block rules for `input_id`, once.
///
/// Re-running for the same input is a no-op: presence is keyed by the first
/// rule's selector.
pub fn apply_pre_block_styles(
    registry: &mut StyleRegistry,
    input_id: &str,
    line_height: f32,
    pre: &StyleRecord,
) {
    let rules = pre_block_rules(input_id, line_height, pre);
    let sheet = registry.ensure_sheet();
    if sheet.has_rule(&rules[0].selector) {
        return;
    }
    for rule in rules {
        sheet.insert_rule(rule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_ids_are_distinct_and_monotonic() {
        let a = next_input_id();
        let b = next_input_id();
        assert_ne!(a, b);
        assert!(a.starts_with("livetree-input-"));
    }

    #[test]
    fn ensure_sheet_is_idempotent() {
        let mut registry = StyleRegistry::new();
        assert!(registry.sheet().is_none());
        registry.ensure_sheet().insert_rule(SheetRule {
            selector: ".x".into(),
            body: "color: red;".into(),
        });
        // repeat initialization must not recreate the sheet
        assert_eq!(registry.ensure_sheet().rules().len(), 1);
        assert_eq!(registry.sheet().unwrap().id, CUSTOM_SHEET_ID);
    }

    #[test]
    fn pre_block_styles_install_once_per_input() {
        let mut registry = StyleRegistry::new();
        let pre = StyleRecord {
            padding: Some(8.0),
            ..StyleRecord::default()
        };
        apply_pre_block_styles(&mut registry, "livetree-input-0", 21.0, &pre);
        apply_pre_block_styles(&mut registry, "livetree-input-0", 21.0, &pre);
        assert_eq!(registry.sheet().unwrap().rules().len(), 4);

        apply_pre_block_styles(&mut registry, "livetree-input-1", 21.0, &pre);
        assert_eq!(registry.sheet().unwrap().rules().len(), 8);
    }

    #[test]
    fn pre_rules_use_record_values() {
        let pre = StyleRecord {
            padding: Some(8.0),
            background_color: Some("#202020".to_string()),
            ..StyleRecord::default()
        };
        let rules = pre_block_rules("livetree-input-9", 20.7, &pre);
        assert!(rules[0].body.contains("top: 20px"));
        assert!(rules[0].body.contains("padding: 7px"));
        assert!(rules[0].body.contains("background-color: #202020"));
        assert!(rules[1].body.contains("translate(-8px, -8px)"));
    }
}
