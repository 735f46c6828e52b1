//! Row classification rules: operation group, channel group and item tab.
//!
//! All functions here are pure and total over their inputs; missing values
//! behave like empty strings.

use crate::models::{ChannelGroup, OperationGroup};

/// Operation-basis codes that always mean core stock.
pub const CORE_OPERATION_BASES: [&str; 2] = ["INTRO", "FOCUS"];

/// Channel groups for rows sold through franchise stores.
const FRS_GROUPS: [ChannelGroup; 2] = [ChannelGroup::All, ChannelGroup::Frs];

/// Channel groups for rows held by headquarters or outlet retail.
const HQ_OR_GROUPS: [ChannelGroup; 2] = [ChannelGroup::All, ChannelGroup::HqOr];

// ── Operation group ───────────────────────────────────────────────────────────

/// Classify a row as core or outlet stock.
///
/// * basis `INTRO` / `FOCUS` → core, whatever the season.
/// * empty basis and a season containing one of `core_seasons` → core.
/// * anything else → outlet.
///
/// Both inputs are trimmed before matching.
pub fn determine_operation_group<S: AsRef<str>>(
    operation_basis: Option<&str>,
    season: Option<&str>,
    core_seasons: &[S],
) -> OperationGroup {
    let basis = operation_basis.map(str::trim).unwrap_or("");
    let season = season.map(str::trim).unwrap_or("");

    if CORE_OPERATION_BASES.contains(&basis) {
        return OperationGroup::Core;
    }

    if basis.is_empty() && core_seasons.iter().any(|tag| season.contains(tag.as_ref())) {
        return OperationGroup::Core;
    }

    OperationGroup::Outlet
}

// ── Channel group ─────────────────────────────────────────────────────────────

/// Channel groups a row's amount is added to, or `None` when the channel is
/// outside FRS / HQ / OR and the row must be discarded.
pub fn channel_groups(channel: Option<&str>) -> Option<&'static [ChannelGroup]> {
    match channel? {
        "FRS" => Some(&FRS_GROUPS),
        "HQ" | "OR" => Some(&HQ_OR_GROUPS),
        _ => None,
    }
}

// ── Item tab ──────────────────────────────────────────────────────────────────

/// The category-specific item tab of a row, if its sub-category is one of
/// `valid_categories`. Every row also feeds the `전체` tab.
pub fn category_tab<'a>(
    sub_category: Option<&'a str>,
    valid_categories: &[String],
) -> Option<&'a str> {
    sub_category.filter(|cat| valid_categories.iter().any(|v| v == cat))
}

/// `true` when `sub_category` is present but not a recognised item category.
pub fn is_unexpected_category(sub_category: Option<&str>, valid_categories: &[String]) -> bool {
    match sub_category {
        Some(cat) => !valid_categories.iter().any(|v| v == cat),
        None => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SEASONS: [&str; 4] = ["24FW", "25SS", "25FW", "26SS"];

    fn categories() -> Vec<String> {
        ["Shoes", "Headwear", "Bag", "Acc_etc"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    // ── determine_operation_group ─────────────────────────────────────────────

    #[test]
    fn test_intro_and_focus_are_core_regardless_of_season() {
        for basis in ["INTRO", "FOCUS"] {
            for season in [None, Some(""), Some("19SS"), Some("25FW"), Some("junk")] {
                assert_eq!(
                    determine_operation_group(Some(basis), season, &SEASONS),
                    OperationGroup::Core,
                    "basis={basis} season={season:?}"
                );
            }
        }
    }

    #[test]
    fn test_empty_basis_with_core_season_is_core() {
        assert_eq!(
            determine_operation_group(None, Some("25SS"), &SEASONS),
            OperationGroup::Core
        );
        assert_eq!(
            determine_operation_group(Some(""), Some("24FW"), &SEASONS),
            OperationGroup::Core
        );
    }

    #[test]
    fn test_core_season_matches_as_substring() {
        assert_eq!(
            determine_operation_group(None, Some("MLB-26SS-A"), &SEASONS),
            OperationGroup::Core
        );
    }

    #[test]
    fn test_empty_basis_without_core_season_is_outlet() {
        assert_eq!(
            determine_operation_group(None, Some("23FW"), &SEASONS),
            OperationGroup::Outlet
        );
        assert_eq!(
            determine_operation_group(None, None, &SEASONS),
            OperationGroup::Outlet
        );
    }

    #[test]
    fn test_other_basis_is_outlet_even_with_core_season() {
        assert_eq!(
            determine_operation_group(Some("CLEARANCE"), Some("25SS"), &SEASONS),
            OperationGroup::Outlet
        );
    }

    #[test]
    fn test_inputs_are_trimmed() {
        assert_eq!(
            determine_operation_group(Some("  INTRO "), None, &SEASONS),
            OperationGroup::Core
        );
        assert_eq!(
            determine_operation_group(Some("   "), Some(" 25FW "), &SEASONS),
            OperationGroup::Core
        );
    }

    #[test]
    fn test_basis_match_is_case_sensitive() {
        assert_eq!(
            determine_operation_group(Some("intro"), Some("25SS"), &SEASONS),
            OperationGroup::Outlet
        );
    }

    // ── channel_groups ────────────────────────────────────────────────────────

    #[test]
    fn test_channel_groups_frs() {
        assert_eq!(
            channel_groups(Some("FRS")).unwrap(),
            &[ChannelGroup::All, ChannelGroup::Frs]
        );
    }

    #[test]
    fn test_channel_groups_hq_and_or() {
        for code in ["HQ", "OR"] {
            assert_eq!(
                channel_groups(Some(code)).unwrap(),
                &[ChannelGroup::All, ChannelGroup::HqOr]
            );
        }
    }

    #[test]
    fn test_channel_groups_discards_others() {
        assert!(channel_groups(Some("ONLINE")).is_none());
        assert!(channel_groups(Some("frs")).is_none());
        assert!(channel_groups(Some("")).is_none());
        assert!(channel_groups(None).is_none());
    }

    // ── category_tab ──────────────────────────────────────────────────────────

    #[test]
    fn test_category_tab_valid() {
        assert_eq!(category_tab(Some("Shoes"), &categories()), Some("Shoes"));
    }

    #[test]
    fn test_category_tab_unexpected_or_missing() {
        assert_eq!(category_tab(Some("Socks"), &categories()), None);
        assert_eq!(category_tab(None, &categories()), None);
    }

    #[test]
    fn test_is_unexpected_category() {
        assert!(is_unexpected_category(Some("Socks"), &categories()));
        assert!(!is_unexpected_category(Some("Bag"), &categories()));
        assert!(!is_unexpected_category(None, &categories()));
    }
}
