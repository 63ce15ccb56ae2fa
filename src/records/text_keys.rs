/// Text record key table
///
/// Maps normalized text-record keys (ENSIP-5 names plus legacy aliases) to
/// where their value comes from.
use crate::backends::{OnchainUser, ProfileRecord};
use alloy_primitives::Address;
use chrono::{DateTime, SecondsFormat, Utc};

/// Where a text record's value is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    AvatarUrl,
    Bio,
    Twitter,
    Github,
    Website,
    /// ENSIP-18 header; reserved
    Header,
    Points,
    Joined,
    Business,
    Contract,
}

/// Lower-case key → source
static TEXT_KEYS: &[(&str, TextSource)] = &[
    ("avatar", TextSource::AvatarUrl),
    ("description", TextSource::Bio),
    ("com.twitter", TextSource::Twitter),
    ("com.github", TextSource::Github),
    ("url", TextSource::Website),
    ("header", TextSource::Header),
    ("points", TextSource::Points),
    ("joined", TextSource::Joined),
    ("business", TextSource::Business),
    ("contract", TextSource::Contract),
    // legacy aliases
    ("bio", TextSource::Bio),
    ("profile_picture", TextSource::AvatarUrl),
    ("website", TextSource::Website),
    ("twitter", TextSource::Twitter),
    ("github", TextSource::Github),
];

/// Everything a text value can be drawn from for one member
pub struct TextContext<'a> {
    pub profile: Option<&'a ProfileRecord>,
    pub user: &'a OnchainUser,
    pub root: &'a str,
    pub contract: Address,
}

impl TextSource {
    /// Look up a key, case-insensitively
    pub fn for_key(key: &str) -> Option<Self> {
        let normalized = key.to_lowercase();
        TEXT_KEYS
            .iter()
            .find(|(k, _)| *k == normalized)
            .map(|(_, source)| *source)
    }

    /// Whether the value lives in the off-chain profile
    pub fn needs_profile(self) -> bool {
        matches!(
            self,
            TextSource::AvatarUrl
                | TextSource::Bio
                | TextSource::Twitter
                | TextSource::Github
                | TextSource::Website
        )
    }

    /// Produce the value; missing fields yield an empty string
    pub fn value(self, ctx: &TextContext<'_>) -> String {
        let profile = ctx.profile;
        let social = profile.and_then(|p| p.social_links.as_ref());

        let value = match self {
            TextSource::AvatarUrl => profile.and_then(|p| p.profile_picture_url.clone()),
            TextSource::Bio => profile.and_then(|p| p.bio.clone()),
            TextSource::Twitter => social.and_then(|s| s.twitter.clone()),
            TextSource::Github => social.and_then(|s| s.github.clone()),
            TextSource::Website => profile.and_then(|p| p.website.clone()),
            TextSource::Header => None,
            TextSource::Points => Some(ctx.user.points.to_string()),
            TextSource::Joined => format_joined(ctx.user),
            TextSource::Business => Some(ctx.root.to_string()),
            TextSource::Contract => Some(ctx.contract.to_checksum(None)),
        };

        value.unwrap_or_default()
    }
}

/// `joinedAt` as ISO-8601 with millisecond precision, e.g. `2023-11-14T22:13:20.000Z`
fn format_joined(user: &OnchainUser) -> Option<String> {
    let secs = u64::try_from(user.joined_at).ok()?;
    DateTime::<Utc>::from_timestamp(i64::try_from(secs).ok()?, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::SocialLinks;
    use alloy_primitives::{address, U256};

    fn user() -> OnchainUser {
        OnchainUser {
            wallet: address!("00000000000000000000000000000000000000aa"),
            points: U256::from(120u64),
            ens_name: "sarah.joescoffee.eth".into(),
            joined_at: U256::from(1_700_000_000u64),
        }
    }

    fn profile() -> ProfileRecord {
        ProfileRecord {
            bio: Some("Coffee lover".into()),
            profile_picture_url: Some("https://img.example/sarah.png".into()),
            website: Some("https://sarah.example".into()),
            social_links: Some(SocialLinks {
                twitter: Some("sarahbrews".into()),
                github: None,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        assert_eq!(TextSource::for_key("avatar"), Some(TextSource::AvatarUrl));
        assert_eq!(TextSource::for_key("AVATAR"), Some(TextSource::AvatarUrl));
        assert_eq!(TextSource::for_key("Com.Twitter"), Some(TextSource::Twitter));
        assert_eq!(TextSource::for_key("email"), None);
        assert_eq!(TextSource::for_key(""), None);
    }

    #[test]
    fn test_aliases_share_sources() {
        assert_eq!(TextSource::for_key("bio"), TextSource::for_key("description"));
        assert_eq!(TextSource::for_key("website"), TextSource::for_key("url"));
        assert_eq!(TextSource::for_key("github"), TextSource::for_key("com.github"));
        assert_eq!(TextSource::for_key("profile_picture"), TextSource::for_key("avatar"));
    }

    #[test]
    fn test_values_from_profile_and_chain() {
        let user = user();
        let profile = profile();
        let contract = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let ctx = TextContext {
            profile: Some(&profile),
            user: &user,
            root: "joescoffee.eth",
            contract,
        };

        assert_eq!(TextSource::AvatarUrl.value(&ctx), "https://img.example/sarah.png");
        assert_eq!(TextSource::Bio.value(&ctx), "Coffee lover");
        assert_eq!(TextSource::Twitter.value(&ctx), "sarahbrews");
        assert_eq!(TextSource::Github.value(&ctx), "");
        assert_eq!(TextSource::Header.value(&ctx), "");
        assert_eq!(TextSource::Points.value(&ctx), "120");
        assert_eq!(TextSource::Joined.value(&ctx), "2023-11-14T22:13:20.000Z");
        assert_eq!(TextSource::Business.value(&ctx), "joescoffee.eth");
        assert_eq!(
            TextSource::Contract.value(&ctx),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
    }

    #[test]
    fn test_missing_profile_yields_empty() {
        let user = user();
        let ctx = TextContext {
            profile: None,
            user: &user,
            root: "joescoffee.eth",
            contract: Address::ZERO,
        };

        assert_eq!(TextSource::AvatarUrl.value(&ctx), "");
        assert_eq!(TextSource::Website.value(&ctx), "");
        assert_eq!(TextSource::Points.value(&ctx), "120");
    }

    #[test]
    fn test_profile_requirement() {
        assert!(TextSource::AvatarUrl.needs_profile());
        assert!(!TextSource::Points.needs_profile());
        assert!(!TextSource::Contract.needs_profile());
    }
}
