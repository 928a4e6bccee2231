//! `sec-ch-ua` brand list generation.
//!
//! Port of Chromium's `GenerateBrandVersionList`: the real brand, the
//! "Chromium" entry and one GREASE brand are placed by a permutation chosen
//! from the major version, so a given build always emits the same string.

use super::Brand;

const ORDERS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

const GREASEY_CHARS: [&str; 11] = [" ", "(", ":", "-", ".", "/", ")", ";", "=", "?", "_"];

const GREASED_VERSIONS: [&str; 3] = ["8", "99", "24"];

fn greased_brand(seed: usize) -> String {
    format!(
        "Not{}A{}Brand",
        GREASEY_CHARS[seed % GREASEY_CHARS.len()],
        GREASEY_CHARS[(seed + 1) % GREASEY_CHARS.len()]
    )
}

/// Build the `sec-ch-ua` value for `brand` at major version `major`.
///
/// `seed` is the numeric major version; `major` is its textual form as it
/// appears in the version string.
pub fn sec_ch_ua(brand: Brand, major: &str, seed: u32) -> String {
    let seed = seed as usize;
    let order = ORDERS[seed % ORDERS.len()];

    let greased = greased_brand(seed);
    let mut list: [(&str, &str); 3] = [("", ""); 3];
    list[order[0]] = (greased.as_str(), GREASED_VERSIONS[seed % GREASED_VERSIONS.len()]);
    list[order[1]] = ("Chromium", major);
    list[order[2]] = (brand.display_name(), major);

    list.iter()
        .map(|(name, version)| format!("\"{name}\";v=\"{version}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_120() {
        assert_eq!(
            sec_ch_ua(Brand::Chrome, "120", 120),
            r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#
        );
    }

    #[test]
    fn test_chrome_131() {
        assert_eq!(
            sec_ch_ua(Brand::Chrome, "131", 131),
            r#""Google Chrome";v="131", "Chromium";v="131", "Not_A Brand";v="24""#
        );
    }

    #[test]
    fn test_chrome_137() {
        assert_eq!(
            sec_ch_ua(Brand::Chrome, "137", 137),
            r#""Google Chrome";v="137", "Chromium";v="137", "Not/A)Brand";v="24""#
        );
    }

    #[test]
    fn test_chrome_110() {
        assert_eq!(
            sec_ch_ua(Brand::Chrome, "110", 110),
            r#""Chromium";v="110", "Not A(Brand";v="24", "Google Chrome";v="110""#
        );
    }

    #[test]
    fn test_brand_takes_brand_slot() {
        assert_eq!(
            sec_ch_ua(Brand::Edge, "120", 120),
            r#""Not_A Brand";v="8", "Chromium";v="120", "Microsoft Edge";v="120""#
        );
    }
}
