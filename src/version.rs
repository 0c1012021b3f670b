//! # Core Version Gating
//!
//! Some default dependencies only make sense from a given Drupal core release
//! onwards. The configured target core (`10.2.x-dev`, `11.0.0`, `^10`) is
//! compared against a threshold with the ordering Composer tooling has always
//! applied to such values, which is PHP's `version_compare`:
//!
//! 1. The value is canonicalized: `-`, `_` and `+` become `.`, a `.` is
//!    inserted between a digit and a non-digit, and any other character that
//!    is not alphanumeric becomes `.` (the first character is kept as is).
//! 2. Dot-separated parts are compared left to right. Two numbers compare
//!    numerically; anything else compares by rank:
//!    unknown < `dev` < `alpha`/`a` < `beta`/`b` < `RC`/`rc` < number < `pl`/`p`.
//! 3. When one side runs out of parts, the other side's next part decides:
//!    a number makes it greater, a special form is ranked against a number.
//!
//! Constraint operators are not interpreted. `^10` canonicalizes to `^.10`,
//! and `^` ranks below any number, so it sorts before `9.0.0`.
//!
//! Plain `major.minor.patch` versions take a `semver` fast path, which orders
//! them identically.

use std::cmp::Ordering;

use semver::Version;

/// Minimum core release that gets `phpspec/prophecy-phpunit` by default.
pub const PROPHECY_MINIMUM_CORE: Version = Version::new(9, 0, 0);

/// Rank of a number among special version forms.
const NUMBER_RANK: i8 = 4;

/// Stand-in compared against a special form when the other side is a number.
const NUMBER_MARKER: &str = "#N#";

/// Special version forms, matched by prefix in this order.
const SPECIAL_FORMS: [(&str, i8); 10] = [
    ("dev", 0),
    ("alpha", 1),
    ("a", 1),
    ("beta", 2),
    ("b", 2),
    ("RC", 3),
    ("rc", 3),
    ("#", NUMBER_RANK),
    ("pl", 5),
    ("p", 5),
];

/// One dot-separated part of a canonical version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part<'a> {
    Number(&'a str),
    Form(&'a str),
}

impl<'a> Part<'a> {
    fn parse(part: &'a str) -> Self {
        if part.starts_with(|c: char| c.is_ascii_digit()) {
            Part::Number(part)
        } else {
            Part::Form(part)
        }
    }

    fn rank(self) -> i8 {
        match self {
            Part::Number(_) => NUMBER_RANK,
            Part::Form(form) => SPECIAL_FORMS
                .iter()
                .find(|(name, _)| form.starts_with(*name))
                .map_or(-1, |&(_, rank)| rank),
        }
    }

    fn cmp_part(self, other: Self) -> Ordering {
        match (self, other) {
            (Part::Number(a), Part::Number(b)) => leading_number(a).cmp(&leading_number(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// The numeric value of the leading digits of `part`.
fn leading_number(part: &str) -> u128 {
    part.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u128, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u128::from(digit - b'0'))
        })
}

/// Rewrite `version` into dot-separated parts.
///
/// # Examples
///
/// ```
/// use composer_expand::version::canonicalize;
///
/// assert_eq!(canonicalize("10.2.x-dev"), "10.2.x.dev");
/// assert_eq!(canonicalize("^10"), "^.10");
/// assert_eq!(canonicalize("1.0rc1"), "1.0.rc.1");
/// ```
pub fn canonicalize(version: &str) -> String {
    let mut chars = version.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let is_digit = |c: char| c.is_ascii_digit();
    let is_non_digit = |c: char| !c.is_ascii_digit() && c != '.';

    let mut canonical = String::with_capacity(version.len() * 2);
    canonical.push(first);
    let mut previous = first;

    for c in chars {
        let needs_separator = !canonical.ends_with('.');
        if matches!(c, '-' | '_' | '+') {
            if needs_separator {
                canonical.push('.');
            }
        } else if (is_non_digit(previous) && is_digit(c)) || (is_digit(previous) && is_non_digit(c))
        {
            if needs_separator {
                canonical.push('.');
            }
            canonical.push(c);
        } else if !c.is_ascii_alphanumeric() {
            if needs_separator {
                canonical.push('.');
            }
        } else {
            canonical.push(c);
        }
        previous = c;
    }

    canonical
}

/// Compare two version strings the way PHP's `version_compare` does.
///
/// # Examples
///
/// ```
/// use composer_expand::version::compare_versions;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_versions("10.2.x-dev", "9.0.0"), Ordering::Greater);
/// assert_eq!(compare_versions("1.0.0-beta", "1.0.0-RC1"), Ordering::Less);
/// assert_eq!(compare_versions("^10", "9.0.0"), Ordering::Less);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let a = canonical_form(a);
    let b = canonical_form(b);
    compare_canonical(&a, &b)
}

/// Canonicalize unless `version` is already a rank marker.
fn canonical_form(version: &str) -> String {
    if version.starts_with('#') {
        version.to_string()
    } else {
        canonicalize(version)
    }
}

fn compare_canonical(a: &str, b: &str) -> Ordering {
    let (mut left, mut right) = (a, b);
    let (mut left_more, mut right_more) = (true, true);

    while !left.is_empty() && !right.is_empty() && left_more && right_more {
        let (left_part, left_rest) = split_part(left);
        let (right_part, right_rest) = split_part(right);
        left_more = left_rest.is_some();
        right_more = right_rest.is_some();

        let order = Part::parse(left_part).cmp_part(Part::parse(right_part));
        if order != Ordering::Equal {
            return order;
        }
        if let Some(rest) = left_rest {
            left = rest;
        }
        if let Some(rest) = right_rest {
            right = rest;
        }
    }

    // The side with parts left over is ranked by its remainder.
    if left_more {
        if left.starts_with(|c: char| c.is_ascii_digit()) {
            Ordering::Greater
        } else {
            compare_versions(left, NUMBER_MARKER)
        }
    } else if right_more {
        if right.starts_with(|c: char| c.is_ascii_digit()) {
            Ordering::Less
        } else {
            compare_versions(NUMBER_MARKER, right)
        }
    } else {
        Ordering::Equal
    }
}

fn split_part(version: &str) -> (&str, Option<&str>) {
    match version.split_once('.') {
        Some((part, rest)) => (part, Some(rest)),
        None => (version, None),
    }
}

/// Whether `version` is at or above `minimum`.
pub fn meets_minimum(version: &str, minimum: &Version) -> bool {
    match Version::parse(version) {
        Ok(parsed) if parsed.pre.is_empty() && parsed.build.is_empty() => parsed >= *minimum,
        _ => compare_versions(version, &minimum.to_string()) != Ordering::Less,
    }
}
