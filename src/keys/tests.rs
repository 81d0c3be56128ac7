//! Tests for key normalization and display formatting

use super::*;
use test_case::test_case;

// ============================================================================
// KeyNormalizer Tests
// ============================================================================

#[test_case("owner.id", "ownerid" ; "dotted path")]
#[test_case("Owner Id", "ownerid" ; "display header")]
#[test_case("datasource_hasExtracts", "datasourcehasextracts" ; "snake and camel")]
#[test_case("tags.[0].label", "tags0label" ; "bracketed index")]
#[test_case("", "" ; "empty")]
fn test_normalize_strips_and_lowercases(input: &str, expected: &str) {
    assert_eq!(KeyNormalizer::plain().normalize(input), expected);
}

#[test]
fn test_normalize_id_variants() {
    let normalizer = KeyNormalizer::plain();
    assert_eq!(normalizer.normalize("ID"), "id");
    assert_eq!(normalizer.normalize("id"), "id");
    assert_eq!(normalizer.normalize("Id"), "id");
}

#[test]
fn test_normalize_luid_alias_maps_to_id() {
    let normalizer = KeyNormalizer::luid();
    assert_eq!(normalizer.alias(), Some("luid"));
    assert_eq!(normalizer.normalize("LUID"), CANONICAL_ID);
    assert_eq!(normalizer.normalize("luid"), CANONICAL_ID);
    assert_eq!(normalizer.normalize("id"), CANONICAL_ID);
    // Only the whole key is aliased
    assert_eq!(normalizer.normalize("User LUID"), "userluid");
}

#[test]
fn test_normalize_without_alias_keeps_luid() {
    assert_eq!(KeyNormalizer::plain().normalize("LUID"), "luid");
}

#[test]
fn test_normalize_idempotent() {
    let normalizer = KeyNormalizer::luid();
    for key in ["LUID", "owner.id", "Parent Project Id", "a-b_c", "", "ID"] {
        let once = normalizer.normalize(key);
        assert_eq!(normalizer.normalize(&once), once, "key: {key}");
    }
}

#[test]
fn test_new_with_id_alias_is_plain() {
    assert_eq!(KeyNormalizer::new("ID"), KeyNormalizer::plain());
    assert_eq!(KeyNormalizer::new(""), KeyNormalizer::plain());
}

#[test]
fn test_display_and_raw_forms_normalize_alike() {
    let normalizer = KeyNormalizer::luid();
    assert_eq!(normalizer.normalize("LUID"), normalizer.normalize("id"));
    assert_eq!(
        normalizer.normalize("Parent Project Id"),
        normalizer.normalize("parentProjectId")
    );
    assert_ne!(normalizer.normalize("name"), normalizer.normalize("id"));
}

// ============================================================================
// DisplayFormatter Tests
// ============================================================================

#[test_case("hasExtracts", "Has Extracts")]
#[test_case("parentProjectId", "Parent Project Id")]
#[test_case("owner.id", "Owner Id")]
#[test_case("datasource_hasExtracts", "Datasource Has Extracts")]
#[test_case("site.id", "Site Id")]
#[test_case("siteURLPath", "Site URL Path")]
#[test_case("AdminInsightsPublishedAt", "Admin Insights Published At")]
#[test_case("tags.[0].label", "Tags 0 Label")]
#[test_case("Favorite Type", "Favorite Type")]
#[test_case("name", "Name")]
fn test_display(input: &str, expected: &str) {
    assert_eq!(DisplayFormatter::default().display(input), expected);
}

#[test_case("id", "ID")]
#[test_case("ID", "ID")]
#[test_case("url", "URL")]
#[test_case("Uri", "URI")]
#[test_case("api", "API")]
#[test_case("html", "HTML")]
#[test_case("xml", "XML")]
#[test_case("pdf", "PDF")]
#[test_case("csv", "CSV")]
fn test_display_overrides(input: &str, expected: &str) {
    assert_eq!(DisplayFormatter::default().display(input), expected);
}

#[test]
fn test_display_id_alias() {
    let formatter = DisplayFormatter::with_id_alias("LUID");
    assert_eq!(formatter.display("id"), "LUID");
    assert_eq!(formatter.display("url"), "URL");
    // Overrides apply to the whole key only
    assert_eq!(formatter.display("owner.id"), "Owner Id");
}

#[test]
fn test_display_empty_key() {
    assert_eq!(DisplayFormatter::default().display(""), "");
}

#[test]
fn test_display_custom_table() {
    let formatter = DisplayFormatter::new([("SiteRole", "Site Role (licensed)")]);
    assert_eq!(formatter.display("siterole"), "Site Role (licensed)");
    assert_eq!(formatter.display("id"), "Id");
}

#[test]
fn test_display_all_keeps_order() {
    let formatter = DisplayFormatter::with_id_alias("LUID");
    assert_eq!(
        formatter.display_all(&["id", "name", "parentProjectId"]),
        vec!["LUID", "Name", "Parent Project Id"]
    );
}

#[test]
fn test_display_is_deterministic() {
    let formatter = DisplayFormatter::default();
    assert_eq!(
        formatter.display("extractLastRefreshTime"),
        formatter.display("extractLastRefreshTime")
    );
}

#[test]
fn test_display_then_normalize_round_trips_to_key() {
    let formatter = DisplayFormatter::with_id_alias("LUID");
    let normalizer = KeyNormalizer::luid();
    for key in ["id", "owner.id", "parentProjectId", "datasource_hasExtracts"] {
        assert_eq!(
            normalizer.normalize(&formatter.display(key)),
            normalizer.normalize(key),
            "key: {key}"
        );
    }
}
