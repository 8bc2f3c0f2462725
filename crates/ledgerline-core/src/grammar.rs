//! Pure syntactic predicates over names, domains, addresses and bounds.
//!
//! Every function here is total and deterministic: the same input always
//! yields the same answer, and nothing panics on arbitrary strings.

/// Maximum length of an account, asset or role name.
pub const MAX_NAME_LEN: usize = 32;

/// Maximum length of an account detail key.
pub const MAX_DETAIL_KEY_LEN: usize = 64;

/// Maximum length of a single domain label.
pub const MAX_LABEL_LEN: usize = 63;

/// Maximum length of a whole domain.
pub const MAX_DOMAIN_LEN: usize = 255;

/// Maximum byte length of a transfer description.
pub const MAX_DESCRIPTION_LEN: usize = 64;

/// Maximum byte length of an account detail value (inclusive).
pub const MAX_DETAIL_VALUE_LEN: usize = 4 * 1024 * 1024;

/// Smallest allowed signatory quorum.
pub const MIN_QUORUM: u32 = 1;

/// Largest allowed signatory quorum.
pub const MAX_QUORUM: u32 = 128;

/// Account, asset and role names: `[a-z_0-9]{1,32}`.
pub fn is_valid_name(s: &str) -> bool {
    (1..=MAX_NAME_LEN).contains(&s.len())
        && s.bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Account detail keys: `[A-Za-z0-9_]{1,64}`.
pub fn is_valid_detail_key(s: &str) -> bool {
    (1..=MAX_DETAIL_KEY_LEN).contains(&s.len())
        && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Dot-separated domain.
///
/// Each label starts with a letter, ends with a letter or digit, and may
/// hold hyphens in between.
pub fn is_valid_domain(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_DOMAIN_LEN && s.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    let (first, last) = match (bytes.first(), bytes.last()) {
        (Some(f), Some(l)) => (*f, *l),
        _ => return false,
    };
    bytes.len() <= MAX_LABEL_LEN
        && first.is_ascii_alphabetic()
        && last.is_ascii_alphanumeric()
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// Dotted-quad IPv4 literal, octets 0-255 with no leading zeros.
pub fn is_valid_ipv4(s: &str) -> bool {
    let octets: Vec<&str> = s.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| parse_decimal(o, 255).is_some())
}

/// Port number 0-65535 with no leading zeros.
pub fn is_valid_port(s: &str) -> bool {
    parse_decimal(s, 65535).is_some()
}

/// Peer address `host:port` where host is a domain or IPv4 literal.
pub fn is_valid_peer_address(s: &str) -> bool {
    match s.rsplit_once(':') {
        Some((host, port)) => {
            is_valid_port(port) && (is_valid_ipv4(host) || is_valid_domain(host))
        }
        None => false,
    }
}

/// Decimal amount syntax: `[0-9]*\.[0-9]+` or `[0-9]+`.
///
/// Only the shape is checked here; see [`crate::amount::Amount`] for the
/// value ceiling.
pub fn is_valid_amount_syntax(s: &str) -> bool {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    match frac_part {
        Some(frac) => all_digits(int_part) && !frac.is_empty() && all_digits(frac),
        None => !int_part.is_empty() && all_digits(int_part),
    }
}

/// Quorum within `[MIN_QUORUM, MAX_QUORUM]`.
pub fn is_valid_quorum(quorum: u32) -> bool {
    (MIN_QUORUM..=MAX_QUORUM).contains(&quorum)
}

/// Parse a canonical decimal (no sign, no leading zeros) not above `max`.
fn parse_decimal(s: &str, max: u32) -> Option<u32> {
    if s.is_empty() || s.len() > 5 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse::<u32>().ok().filter(|n| *n <= max)
}
