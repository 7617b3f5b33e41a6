//! Supported site keys

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the fixed set of sites a snapshot carries a slot for.
///
/// Serialized as the snapshot slot key (`codechef_data`, ...); parsed from
/// the short lower-case site name (`codechef`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SiteKey {
    #[serde(rename = "codechef_data")]
    CodeChef,
    #[serde(rename = "codeforces_data")]
    Codeforces,
    #[serde(rename = "spoj_data")]
    Spoj,
    #[serde(rename = "hackerearth_data")]
    HackerEarth,
    #[serde(rename = "hackerrank_data")]
    HackerRank,
    #[serde(rename = "uva_data")]
    Uva,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown site: {0}")]
pub struct UnknownSite(pub String);

impl SiteKey {
    /// Every supported site, in snapshot order.
    pub const ALL: [Self; 6] = [
        Self::CodeChef,
        Self::Codeforces,
        Self::Spoj,
        Self::HackerEarth,
        Self::HackerRank,
        Self::Uva,
    ];

    /// Short lower-case name used in configuration and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CodeChef => "codechef",
            Self::Codeforces => "codeforces",
            Self::Spoj => "spoj",
            Self::HackerEarth => "hackerearth",
            Self::HackerRank => "hackerrank",
            Self::Uva => "uva",
        }
    }

    /// Key under which a user's handle for this site is configured.
    pub fn handle_key(self) -> String {
        format!("{}_handle", self.name())
    }

    /// Key of this site's slot in a graph snapshot.
    pub fn data_key(self) -> String {
        format!("{}_data", self.name())
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SiteKey {
    type Err = UnknownSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|site| site.name() == normalized)
            .ok_or_else(|| UnknownSite(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("CodeChef".parse::<SiteKey>(), Ok(SiteKey::CodeChef));
        assert_eq!(" uva ".parse::<SiteKey>(), Ok(SiteKey::Uva));
    }

    #[test]
    fn parse_rejects_unknown_sites() {
        let error = "topcoder".parse::<SiteKey>().unwrap_err();
        assert_eq!(error.to_string(), "Unknown site: topcoder");
    }

    #[test]
    fn keys_follow_site_name() {
        assert_eq!(SiteKey::HackerRank.handle_key(), "hackerrank_handle");
        assert_eq!(SiteKey::HackerRank.data_key(), "hackerrank_data");
        assert_eq!(
            serde_json::to_string(&SiteKey::Codeforces).unwrap(),
            "\"codeforces_data\""
        );
    }
}
