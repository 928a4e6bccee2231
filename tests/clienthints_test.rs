//! Tests for the sec-ch-ua brand list.

use mimic::emulation::sec_ch_ua;
use mimic::Brand;

// === Pinned Values ===

#[test]
fn test_pinned_chrome_versions() {
    let cases = [
        (
            110,
            r#""Chromium";v="110", "Not A(Brand";v="24", "Google Chrome";v="110""#,
        ),
        (
            120,
            r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#,
        ),
        (
            131,
            r#""Google Chrome";v="131", "Chromium";v="131", "Not_A Brand";v="24""#,
        ),
        (
            137,
            r#""Google Chrome";v="137", "Chromium";v="137", "Not/A)Brand";v="24""#,
        ),
    ];
    for (major, expected) in cases {
        assert_eq!(
            sec_ch_ua(Brand::Chrome, &major.to_string(), major),
            expected,
            "major {major}"
        );
    }
}

#[test]
fn test_edge_at_120() {
    assert_eq!(
        sec_ch_ua(Brand::Edge, "120", 120),
        r#""Not_A Brand";v="8", "Chromium";v="120", "Microsoft Edge";v="120""#
    );
}

// === Shape Tests ===

#[test]
fn test_every_version_lists_three_brands() {
    for major in 100..=140u32 {
        let major_text = major.to_string();
        for brand in [Brand::Chrome, Brand::Brave, Brand::Edge] {
            let value = sec_ch_ua(brand, &major_text, major);
            let entries: Vec<&str> = value.split(", ").collect();
            assert_eq!(entries.len(), 3, "{value}");
            assert!(value.contains(&format!("\"Chromium\";v=\"{major}\"")));
            assert!(value.contains(&format!("\"{}\";v=\"{major}\"", brand.display_name())));
            assert_eq!(
                entries.iter().filter(|e| e.starts_with("\"Not")).count(),
                1,
                "{value}"
            );
        }
    }
}

#[test]
fn test_same_seed_same_value() {
    assert_eq!(
        sec_ch_ua(Brand::Brave, "125", 125),
        sec_ch_ua(Brand::Brave, "125", 125)
    );
}

#[test]
fn test_major_text_used_verbatim() {
    let value = sec_ch_ua(Brand::Chrome, "0120", 120);
    assert!(value.contains(r#""Chromium";v="0120""#));
    assert!(value.contains(r#""Not_A Brand";v="8""#));
}
