const SCHEME_PREFIXES: [&str; 2] = ["etoken:", "ecash:"];
const CHECKSUM_SUFFIX_LEN: usize = 10;

/// Reduce an address to the stem used when matching transaction outputs against the merchant
/// address: trim whitespace, strip a leading `etoken:`/`ecash:` scheme prefix, then drop the
/// final 10 characters.
///
/// Two addresses are considered the same destination iff their stems are equal. Dropping the
/// suffix means addresses that differ only in their last 10 characters compare equal; this is the
/// gateway's long-standing matching rule and is preserved as-is, not "fixed". An address of 10
/// characters or fewer has an empty stem and matches nothing meaningful.
pub fn address_stem(address: &str) -> &str {
    let mut addr = address.trim();
    for prefix in SCHEME_PREFIXES {
        if let Some(rest) = addr.strip_prefix(prefix) {
            addr = rest;
            break;
        }
    }
    if addr.len() <= CHECKSUM_SUFFIX_LEN {
        return "";
    }
    let cut = addr.len() - CHECKSUM_SUFFIX_LEN;
    if addr.is_char_boundary(cut) {
        &addr[..cut]
    } else {
        ""
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_scheme_and_checksum_suffix() {
        assert_eq!(address_stem("ecash:qqabcdefghijklmnop1234567890"), "qqabcdefghijklmnop");
        assert_eq!(address_stem("etoken:qqabcdefghijklmnop1234567890"), "qqabcdefghijklmnop");
        assert_eq!(address_stem("qqabcdefghijklmnop1234567890"), "qqabcdefghijklmnop");
    }

    #[test]
    fn scheme_variants_of_the_same_address_match() {
        let a = address_stem(" etoken:qq1234567890abcdefghij ");
        let b = address_stem("ecash:qq1234567890abcdefghij");
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn suffix_only_differences_are_ignored() {
        assert_eq!(address_stem("ecash:qqstem0000000000"), address_stem("ecash:qqstem9999999999"));
    }

    #[test]
    fn short_addresses_have_empty_stems() {
        assert_eq!(address_stem("ecash:short"), "");
        assert_eq!(address_stem("exactly10c"), "");
        assert_eq!(address_stem(""), "");
    }
}
