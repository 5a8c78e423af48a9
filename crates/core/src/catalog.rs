//! Catalog merging, search and display helpers.
//!
//! Current and legacy SKU records normalise into one list (see
//! [`crate::types::sku`]), which the [`CatalogView`] filters, sorts and
//! reveals incrementally. Search is a deliberate case-insensitive substring
//! scan over name, colour and code - the catalog is a few thousand rows, not
//! a corpus.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::sku::{CatalogEntry, CurrentSku, LegacySku, SkuSummary};

/// Rows revealed before the first "load more".
pub const INITIAL_VISIBLE: usize = 15;

/// Rows added per "load more".
pub const LOAD_MORE_STEP: usize = 20;

/// Minimum query length accepted by explicit-submit search.
pub const MIN_QUERY_LEN: usize = 2;

/// Merge the two record generations into one normalised list, current
/// records first.
#[must_use]
pub fn merge_catalog(current: Vec<CurrentSku>, legacy: Vec<LegacySku>) -> Vec<CatalogEntry> {
    current
        .into_iter()
        .map(CatalogEntry::from)
        .chain(legacy.into_iter().map(CatalogEntry::from))
        .collect()
}

/// Build the code → product-name/colour map used to annotate pricing rows.
///
/// Later entries win on duplicate codes (legacy records overwrite current
/// ones, matching the merge order); records with no name fall back to
/// "Unknown".
#[must_use]
pub fn metadata_map(entries: &[CatalogEntry]) -> HashMap<String, SkuSummary> {
    entries
        .iter()
        .map(|entry| {
            let name = if entry.product_name.is_empty() {
                "Unknown".to_string()
            } else {
                entry.product_name.clone()
            };
            (
                entry.sku_code.as_str().to_string(),
                SkuSummary {
                    product_name: name,
                    colour: entry.colour.clone(),
                },
            )
        })
        .collect()
}

/// When the search term takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Every keystroke filters immediately.
    OnKeystroke,
    /// The term applies only once submitted with at least
    /// [`MIN_QUERY_LEN`] characters; while a submitted search is active the
    /// typology filter is bypassed.
    ExplicitSubmit,
}

/// Typology filter with an explicit all-pass sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeFilter {
    All,
    Code(String),
}

impl TypeFilter {
    fn accepts(&self, entry: &CatalogEntry) -> bool {
        match self {
            Self::All => true,
            Self::Code(code) => &entry.type_code == code,
        }
    }
}

/// The searchable, rankable merged catalog list.
#[derive(Debug, Clone)]
pub struct CatalogView {
    entries: Vec<CatalogEntry>,
    mode: SearchMode,
    term: String,
    search_active: bool,
    filter: TypeFilter,
    visible_count: usize,
}

impl CatalogView {
    /// Build a view over merged entries.
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>, mode: SearchMode) -> Self {
        Self {
            entries,
            mode,
            term: String::new(),
            search_active: false,
            filter: TypeFilter::All,
            visible_count: INITIAL_VISIBLE,
        }
    }

    /// Update the search term. In explicit mode this alone changes nothing
    /// until [`Self::submit_search`]; in keystroke mode it filters at once.
    /// Either way the reveal window resets.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
        self.search_active = false;
        self.visible_count = INITIAL_VISIBLE;
    }

    /// Activate the current term in explicit mode.
    ///
    /// Returns `false` (and stays inactive) for terms shorter than
    /// [`MIN_QUERY_LEN`]; keystroke-mode views accept the call as a no-op
    /// success.
    pub fn submit_search(&mut self) -> bool {
        match self.mode {
            SearchMode::OnKeystroke => true,
            SearchMode::ExplicitSubmit => {
                if self.term.trim().len() < MIN_QUERY_LEN {
                    return false;
                }
                self.search_active = true;
                self.visible_count = INITIAL_VISIBLE;
                true
            }
        }
    }

    /// Set the typology filter and reset the reveal window.
    pub fn set_type_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
        self.visible_count = INITIAL_VISIBLE;
    }

    fn term_in_effect(&self) -> Option<String> {
        let txt = self.term.trim().to_lowercase();
        if txt.is_empty() {
            return None;
        }
        match self.mode {
            SearchMode::OnKeystroke => Some(txt),
            SearchMode::ExplicitSubmit => self.search_active.then_some(txt),
        }
    }

    /// The filtered, sorted list (unwindowed).
    #[must_use]
    pub fn filtered(&self) -> Vec<&CatalogEntry> {
        let term = self.term_in_effect();
        // An active explicit search spans all typologies.
        let bypass_type_filter = term.is_some() && self.mode == SearchMode::ExplicitSubmit;

        let mut rows: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|entry| bypass_type_filter || self.filter.accepts(entry))
            .filter(|entry| {
                term.as_deref().is_none_or(|txt| {
                    [
                        entry.product_name.as_str(),
                        entry.colour.as_str(),
                        entry.sku_code.as_str(),
                    ]
                    .iter()
                    .any(|field| field.to_lowercase().contains(txt))
                })
            })
            .collect();

        // Stable sort keeps merge order among name ties.
        rows.sort_by_key(|entry| entry.product_name.to_lowercase());
        rows
    }

    /// The currently revealed window of [`Self::filtered`].
    #[must_use]
    pub fn visible(&self) -> Vec<&CatalogEntry> {
        let mut rows = self.filtered();
        rows.truncate(self.visible_count);
        rows
    }

    /// Whether more rows exist beyond the revealed window.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.filtered().len() > self.visible_count
    }

    /// Reveal the next batch of rows.
    pub fn load_more(&mut self) {
        let total = self.filtered().len();
        self.visible_count = (self.visible_count + LOAD_MORE_STEP).min(total.max(INITIAL_VISIBLE));
    }
}

/// Display badge colours for typology codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeColour {
    Blue,
    Yellow,
    Purple,
    Pink,
    Green,
    Indigo,
    /// Used for records with no typology code.
    Neutral,
}

const BADGE_PALETTE: [BadgeColour; 6] = [
    BadgeColour::Blue,
    BadgeColour::Yellow,
    BadgeColour::Purple,
    BadgeColour::Pink,
    BadgeColour::Green,
    BadgeColour::Indigo,
];

/// Deterministically assign a badge colour to a typology code.
///
/// Pure function of the code string (a wrapping 31-based char hash), so the
/// same code always renders in the same colour within and across calls.
#[must_use]
pub fn badge_colour(type_code: &str) -> BadgeColour {
    if type_code.is_empty() {
        return BadgeColour::Neutral;
    }
    let hash = type_code.chars().fold(0i32, |hash, c| {
        (c as i32)
            .wrapping_add(hash.wrapping_shl(5))
            .wrapping_sub(hash)
    });
    let index = hash.unsigned_abs() as usize % BADGE_PALETTE.len();
    BADGE_PALETTE[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sku::SkuCode;

    fn entry(code: &str, name: &str, colour: &str, type_code: &str) -> CatalogEntry {
        CatalogEntry {
            sku_code: SkuCode::from(code),
            product_name: name.to_string(),
            colour: colour.to_string(),
            type_code: type_code.to_string(),
        }
    }

    fn sample_entries() -> Vec<CatalogEntry> {
        vec![
            entry("C1", "Ramen Bowl", "Moss", "BO"),
            entry("C2", "bud vase", "Fog", "VA"),
            entry("C3", "Dinner Plate", "Clay", "PL"),
            entry("L1", "Aperitif Glass", "Blue", "GL"),
        ]
    }

    #[test]
    fn test_merge_normalises_both_shapes() {
        let current = vec![CurrentSku {
            sku_code: "A1".to_string(),
            product_name: Some("Mug".to_string()),
            color: Some("Blue".to_string()),
            type_code: Some("CU".to_string()),
        }];
        let legacy: Vec<LegacySku> =
            serde_json::from_str(r#"[{"code":"A1","name":"Mug","colour":"Blue","typeCode":"CU"}]"#)
                .expect("valid legacy json");

        let merged = merge_catalog(current, legacy);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], merged[1]);
        assert_eq!(merged[0].sku_code.as_str(), "A1");
    }

    #[test]
    fn test_metadata_map_unknown_fallback() {
        let entries = vec![entry("A1", "", "Blue", "CU")];
        let map = metadata_map(&entries);
        assert_eq!(map["A1"].product_name, "Unknown");
        assert_eq!(map["A1"].colour, "Blue");
    }

    #[test]
    fn test_sort_is_case_insensitive_ascending() {
        let view = CatalogView::new(sample_entries(), SearchMode::OnKeystroke);
        let names: Vec<&str> = view
            .filtered()
            .iter()
            .map(|e| e.product_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Aperitif Glass", "bud vase", "Dinner Plate", "Ramen Bowl"]
        );
    }

    #[test]
    fn test_keystroke_search_matches_name_colour_and_code() {
        let mut view = CatalogView::new(sample_entries(), SearchMode::OnKeystroke);

        view.set_search_term("bowl");
        assert_eq!(view.filtered().len(), 1);

        view.set_search_term("FOG");
        assert_eq!(view.filtered().len(), 1);

        view.set_search_term("c3");
        assert_eq!(view.filtered().len(), 1);

        view.set_search_term("nothing-matches");
        assert!(view.filtered().is_empty());
    }

    #[test]
    fn test_explicit_mode_filters_only_after_submit() {
        let mut view = CatalogView::new(sample_entries(), SearchMode::ExplicitSubmit);

        view.set_search_term("bowl");
        assert_eq!(view.filtered().len(), 4, "unsubmitted term must not filter");

        assert!(view.submit_search());
        assert_eq!(view.filtered().len(), 1);
    }

    #[test]
    fn test_explicit_mode_rejects_short_queries() {
        let mut view = CatalogView::new(sample_entries(), SearchMode::ExplicitSubmit);
        view.set_search_term("b");
        assert!(!view.submit_search());
        assert_eq!(view.filtered().len(), 4);
    }

    #[test]
    fn test_editing_term_deactivates_explicit_search() {
        let mut view = CatalogView::new(sample_entries(), SearchMode::ExplicitSubmit);
        view.set_search_term("bowl");
        assert!(view.submit_search());
        assert_eq!(view.filtered().len(), 1);

        view.set_search_term("bowl2");
        assert_eq!(view.filtered().len(), 4);
    }

    #[test]
    fn test_active_explicit_search_bypasses_type_filter() {
        let mut view = CatalogView::new(sample_entries(), SearchMode::ExplicitSubmit);
        view.set_type_filter(TypeFilter::Code("VA".to_string()));
        assert_eq!(view.filtered().len(), 1);

        view.set_search_term("bowl");
        assert!(view.submit_search());
        assert_eq!(
            view.filtered().len(),
            1,
            "search spans all typologies while active"
        );
        assert_eq!(view.filtered()[0].type_code, "BO");
    }

    #[test]
    fn test_type_filter_all_sentinel() {
        let mut view = CatalogView::new(sample_entries(), SearchMode::OnKeystroke);
        view.set_type_filter(TypeFilter::Code("BO".to_string()));
        assert_eq!(view.filtered().len(), 1);
        view.set_type_filter(TypeFilter::All);
        assert_eq!(view.filtered().len(), 4);
    }

    #[test]
    fn test_incremental_reveal() {
        let entries: Vec<CatalogEntry> = (0..40)
            .map(|i| entry(&format!("C{i}"), &format!("Item {i:02}"), "", "BO"))
            .collect();
        let mut view = CatalogView::new(entries, SearchMode::OnKeystroke);

        assert_eq!(view.visible().len(), INITIAL_VISIBLE);
        assert!(view.has_more());

        view.load_more();
        assert_eq!(view.visible().len(), INITIAL_VISIBLE + LOAD_MORE_STEP);

        view.load_more();
        assert_eq!(view.visible().len(), 40);
        assert!(!view.has_more());
    }

    #[test]
    fn test_search_resets_reveal_window() {
        let entries: Vec<CatalogEntry> = (0..40)
            .map(|i| entry(&format!("C{i}"), &format!("Item {i:02}"), "", "BO"))
            .collect();
        let mut view = CatalogView::new(entries, SearchMode::OnKeystroke);
        view.load_more();
        view.set_search_term("Item");
        assert_eq!(view.visible().len(), INITIAL_VISIBLE);
    }

    #[test]
    fn test_badge_colour_is_deterministic() {
        let first = badge_colour("BO");
        for _ in 0..10 {
            assert_eq!(badge_colour("BO"), first);
        }
        assert_eq!(badge_colour("VA"), badge_colour("VA"));
        assert_eq!(badge_colour(""), BadgeColour::Neutral);
    }

    #[test]
    fn test_badge_palette_spread() {
        // Not a correctness requirement, but the hash should not collapse
        // every real code onto one palette slot.
        let codes = ["BO", "VA", "PL", "CU", "GL", "TR", "AC", "TS"];
        let distinct: std::collections::HashSet<_> =
            codes.iter().map(|c| badge_colour(c)).collect();
        assert!(distinct.len() > 2);
    }
}
