//! Property-based tests for the version ordering key.

use proptest::prelude::*;
use relnotes_types::version::VersionKey;

fn arb_components() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..500, 1..4)
}

fn dotted(nums: &[u64]) -> String {
    nums.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

proptest! {
    #[test]
    fn string_serde_round_trip(nums in arb_components(), pre in prop::option::of("rc[0-9]")) {
        let mut raw = dotted(&nums);
        if let Some(pre) = &pre {
            raw.push_str(pre);
        }

        let key = VersionKey::parse(&raw);
        let json = serde_json::to_value(&key).unwrap();
        prop_assert_eq!(&json, &serde_json::Value::String(raw.clone()));

        let back: VersionKey = serde_json::from_value(json).unwrap();
        prop_assert_eq!(&back, &key);
        prop_assert_eq!(back.as_str(), raw.as_str());
    }

    #[test]
    fn numeric_order_matches_component_order(a in arb_components(), b in arb_components()) {
        let ka = VersionKey::parse(&dotted(&a));
        let kb = VersionKey::parse(&dotted(&b));
        prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
    }

    #[test]
    fn prerelease_sorts_before_its_final(nums in arb_components(), pre in "rc[0-9]") {
        let final_release = VersionKey::parse(&dotted(&nums));
        let candidate = VersionKey::parse(&format!("{}{}", dotted(&nums), pre));
        prop_assert!(candidate < final_release);
    }
}
