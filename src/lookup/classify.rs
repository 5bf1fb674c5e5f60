//! Release token classification.
//!
//! Maps a release codename (or a suite alias such as `stable`) to the
//! distribution family whose package site serves it. Matching is a
//! case-insensitive prefix test, so `jessie-backports` and `trusty-updates`
//! resolve like their base release.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distribution family with its own package site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distro {
    Debian,
    Ubuntu,
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debian => write!(f, "debian"),
            Self::Ubuntu => write!(f, "ubuntu"),
        }
    }
}

/// Debian codenames and suite aliases.
pub const DEBIAN_PREFIXES: &[&str] = &[
    "oldoldstable",
    "oldstable",
    "squeeze",
    "wheezy",
    "stable",
    "jessie",
    "stretch",
    "buster",
    "bullseye",
    "bookworm",
    "trixie",
    "forky",
    "testing",
    "sid",
    "unstable",
    "experimental",
];

/// Ubuntu codenames.
pub const UBUNTU_PREFIXES: &[&str] = &[
    "hardy", "lucid", "maverick", "natty", "oneiric", "precise", "quantal", "raring", "saucy",
    "trusty", "utopic", "vivid", "wily", "xenial", "yakkety", "zesty", "artful", "bionic",
    "cosmic", "disco", "eoan", "focal", "groovy", "hirsute", "impish", "jammy", "kinetic",
    "lunar", "mantic", "noble", "oracular", "plucky",
];

/// Guesses the distribution from a release name.
///
/// Returns `None` for unknown releases; callers report that as an unsupported
/// distribution rather than a failure.
pub fn classify(token: &str) -> Option<Distro> {
    let token = token.trim().to_lowercase();
    if token.is_empty() {
        return None;
    }

    if DEBIAN_PREFIXES.iter().any(|p| token.starts_with(p)) {
        Some(Distro::Debian)
    } else if UBUNTU_PREFIXES.iter().any(|p| token.starts_with(p)) {
        Some(Distro::Ubuntu)
    } else {
        None
    }
}

/// Accepts a literal distribution name before falling back to [`classify`].
pub fn distro_from_name(token: &str) -> Option<Distro> {
    match token.trim().to_lowercase().as_str() {
        "debian" => Some(Distro::Debian),
        "ubuntu" => Some(Distro::Ubuntu),
        _ => classify(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debian_prefixes() {
        for release in DEBIAN_PREFIXES {
            assert_eq!(classify(release), Some(Distro::Debian), "{}", release);
        }
    }

    #[test]
    fn test_ubuntu_prefixes() {
        for release in UBUNTU_PREFIXES {
            assert_eq!(classify(release), Some(Distro::Ubuntu), "{}", release);
        }
    }

    #[test]
    fn test_prefix_sets_are_disjoint() {
        for debian in DEBIAN_PREFIXES {
            for ubuntu in UBUNTU_PREFIXES {
                assert!(
                    !debian.starts_with(ubuntu) && !ubuntu.starts_with(debian),
                    "{} / {}",
                    debian,
                    ubuntu
                );
            }
        }
    }

    #[test]
    fn test_unknown_release() {
        assert_eq!(classify("foobar9000"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
    }

    #[test]
    fn test_case_insensitive_suffixed_tokens() {
        assert_eq!(classify("Jessie-Backports"), Some(Distro::Debian));
        assert_eq!(classify("TRUSTY-updates"), Some(Distro::Ubuntu));
        assert_eq!(classify("stable-security"), Some(Distro::Debian));
    }

    #[test]
    fn test_distro_from_name() {
        assert_eq!(distro_from_name("Debian"), Some(Distro::Debian));
        assert_eq!(distro_from_name("ubuntu"), Some(Distro::Ubuntu));
        assert_eq!(distro_from_name("xenial"), Some(Distro::Ubuntu));
        assert_eq!(distro_from_name("mint"), None);
    }
}
