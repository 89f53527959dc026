//! Fuzz target for part file name classification.
//!
//! Feeds arbitrary file names to the default part matcher and checks that
//! any name accepted as numbered is consistent with the template.
//!
//! Run with: cargo +nightly fuzz run part_name
//!
//! Key properties being tested:
//! - No panics on arbitrary UTF-8 input
//! - Numbered names carry the exact prefix and suffix
//! - The parsed number formats back to an equivalent name

#![no_main]

use libfuzzer_sys::fuzz_target;
use zippart::{PartName, PartNaming};

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let naming = PartNaming::default();
        let Ok(matcher) = naming.matcher() else {
            return;
        };

        match matcher.parse(name.as_ref()) {
            PartName::Numbered(sequence) => {
                assert!(name.starts_with(naming.prefix()), "prefix lost: {:?}", name);
                assert!(name.ends_with(naming.suffix()), "suffix lost: {:?}", name);

                let digits = &name[naming.prefix().len()..name.len() - naming.suffix().len()];
                assert!(
                    digits.bytes().all(|b| b.is_ascii_digit()),
                    "non-digit sequence field accepted: {:?}",
                    name
                );
                assert_eq!(
                    digits.trim_start_matches('0').parse::<u64>().unwrap_or(0),
                    u64::from(sequence),
                    "sequence mismatch for {:?}",
                    name
                );
            }
            PartName::Unnumbered => {
                assert!(name.starts_with(naming.prefix()) && name.ends_with(naming.suffix()));
            }
            PartName::Foreign => {}
        }
    }
});
