//! Site settings domain: fixed defaults, the client-facing snapshot shape,
//! and normalization of partial updates.
//!
//! Everything here is pure. The store persists flat key/value rows; this
//! module maps them to and from the structured JSON the frontend consumes,
//! substituting a fixed default for every absent key.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Row key for the WhatsApp phone number. Also the sentinel key: its absence
/// triggers re-seeding of the full default set (see `SettingsStore`).
pub const WHATSAPP_NUMBER_KEY: &str = "whatsapp_number";
/// Row key for the prefilled WhatsApp message.
pub const WHATSAPP_MESSAGE_KEY: &str = "whatsapp_message";
/// Row key for the floating-button tooltip.
pub const WHATSAPP_TOOLTIP_KEY: &str = "whatsapp_tooltip";

/// Default WhatsApp number (country code + number, digits only).
pub const DEFAULT_WHATSAPP_NUMBER: &str = "56977929416";
/// Default prefilled message.
pub const DEFAULT_WHATSAPP_MESSAGE: &str = "Hola, quiero agendar una sesión";
/// Default tooltip on the floating button.
pub const DEFAULT_WHATSAPP_TOOLTIP: &str = "¿Agendamos una sesión?";

/// Social-media channels shown in the site footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialChannel {
    Instagram,
    Facebook,
    Youtube,
    Tiktok,
}

impl SocialChannel {
    /// All channels, in the order they appear in the snapshot.
    pub const ALL: [SocialChannel; 4] = [
        SocialChannel::Instagram,
        SocialChannel::Facebook,
        SocialChannel::Youtube,
        SocialChannel::Tiktok,
    ];

    /// Row key for this channel's URL.
    pub fn url_key(self) -> &'static str {
        match self {
            SocialChannel::Instagram => "social_instagram_url",
            SocialChannel::Facebook => "social_facebook_url",
            SocialChannel::Youtube => "social_youtube_url",
            SocialChannel::Tiktok => "social_tiktok_url",
        }
    }

    /// Row key for this channel's display label.
    pub fn label_key(self) -> &'static str {
        match self {
            SocialChannel::Instagram => "social_instagram_label",
            SocialChannel::Facebook => "social_facebook_label",
            SocialChannel::Youtube => "social_youtube_label",
            SocialChannel::Tiktok => "social_tiktok_label",
        }
    }

    /// Default profile URL.
    pub fn default_url(self) -> &'static str {
        match self {
            SocialChannel::Instagram => "https://www.instagram.com/",
            SocialChannel::Facebook => "https://www.facebook.com/",
            SocialChannel::Youtube => "https://www.youtube.com/",
            SocialChannel::Tiktok => "https://www.tiktok.com/",
        }
    }

    /// Default display label.
    pub fn default_label(self) -> &'static str {
        match self {
            SocialChannel::Instagram => "Instagram",
            SocialChannel::Facebook => "Facebook",
            SocialChannel::Youtube => "YouTube",
            SocialChannel::Tiktok => "TikTok",
        }
    }
}

/// The complete default row set, used to seed an empty table.
pub fn default_rows() -> Vec<(&'static str, &'static str)> {
    let mut rows = vec![
        (WHATSAPP_NUMBER_KEY, DEFAULT_WHATSAPP_NUMBER),
        (WHATSAPP_MESSAGE_KEY, DEFAULT_WHATSAPP_MESSAGE),
        (WHATSAPP_TOOLTIP_KEY, DEFAULT_WHATSAPP_TOOLTIP),
    ];
    for channel in SocialChannel::ALL {
        rows.push((channel.url_key(), channel.default_url()));
        rows.push((channel.label_key(), channel.default_label()));
    }
    rows
}

/// One social link in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    /// Profile URL.
    pub url: String,
    /// Display label.
    pub label: String,
}

/// All four social links, keyed by channel name in the JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    pub instagram: SocialLink,
    pub facebook: SocialLink,
    pub youtube: SocialLink,
    pub tiktok: SocialLink,
}

/// Client-facing view of the settings table, with defaults substituted for
/// every absent key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    pub whatsapp_number: String,
    pub whatsapp_message: String,
    pub whatsapp_tooltip: String,
    pub social: SocialLinks,
}

impl SettingsSnapshot {
    /// The snapshot served when no database is configured or a read fails.
    pub fn defaults() -> Self {
        Self::from_rows(&HashMap::new())
    }

    /// Assemble a snapshot from stored rows. Each field falls back to its
    /// fixed default independently; precedence is stored value over default.
    pub fn from_rows(rows: &HashMap<String, String>) -> Self {
        Self {
            whatsapp_number: value_or(rows, WHATSAPP_NUMBER_KEY, DEFAULT_WHATSAPP_NUMBER),
            whatsapp_message: value_or(rows, WHATSAPP_MESSAGE_KEY, DEFAULT_WHATSAPP_MESSAGE),
            whatsapp_tooltip: value_or(rows, WHATSAPP_TOOLTIP_KEY, DEFAULT_WHATSAPP_TOOLTIP),
            social: SocialLinks {
                instagram: social_link(rows, SocialChannel::Instagram),
                facebook: social_link(rows, SocialChannel::Facebook),
                youtube: social_link(rows, SocialChannel::Youtube),
                tiktok: social_link(rows, SocialChannel::Tiktok),
            },
        }
    }
}

fn value_or(rows: &HashMap<String, String>, key: &str, default: &str) -> String {
    rows.get(key).cloned().unwrap_or_else(|| default.to_string())
}

fn social_link(rows: &HashMap<String, String>, channel: SocialChannel) -> SocialLink {
    SocialLink {
        url: value_or(rows, channel.url_key(), channel.default_url()),
        label: value_or(rows, channel.label_key(), channel.default_label()),
    }
}

/// Partial update body for `PATCH /api/settings`. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub whatsapp_number: Option<String>,
    pub whatsapp_message: Option<String>,
    pub whatsapp_tooltip: Option<String>,
    pub social_instagram_url: Option<String>,
    pub social_instagram_label: Option<String>,
    pub social_facebook_url: Option<String>,
    pub social_facebook_label: Option<String>,
    pub social_youtube_url: Option<String>,
    pub social_youtube_label: Option<String>,
    pub social_tiktok_url: Option<String>,
    pub social_tiktok_label: Option<String>,
}

impl SettingsPatch {
    /// Normalize the patch into the row updates to persist.
    ///
    /// - the number keeps digits only; nothing to keep means no update
    /// - text fields are trimmed; empty after trim means no update
    /// - the tooltip is the exception: provided-but-empty resets it to the
    ///   fixed default
    pub fn updates(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        if let Some(raw) = &self.whatsapp_number {
            let digits = digits_only(raw);
            if !digits.is_empty() {
                out.push((WHATSAPP_NUMBER_KEY, digits));
            }
        }

        push_trimmed(&mut out, WHATSAPP_MESSAGE_KEY, self.whatsapp_message.as_deref());

        if let Some(raw) = &self.whatsapp_tooltip {
            let trimmed = raw.trim();
            let value = if trimmed.is_empty() {
                DEFAULT_WHATSAPP_TOOLTIP
            } else {
                trimmed
            };
            out.push((WHATSAPP_TOOLTIP_KEY, value.to_string()));
        }

        let socials: [(&'static str, &Option<String>); 8] = [
            (SocialChannel::Instagram.url_key(), &self.social_instagram_url),
            (SocialChannel::Instagram.label_key(), &self.social_instagram_label),
            (SocialChannel::Facebook.url_key(), &self.social_facebook_url),
            (SocialChannel::Facebook.label_key(), &self.social_facebook_label),
            (SocialChannel::Youtube.url_key(), &self.social_youtube_url),
            (SocialChannel::Youtube.label_key(), &self.social_youtube_label),
            (SocialChannel::Tiktok.url_key(), &self.social_tiktok_url),
            (SocialChannel::Tiktok.label_key(), &self.social_tiktok_label),
        ];
        for (key, field) in socials {
            push_trimmed(&mut out, key, field.as_deref());
        }

        out
    }
}

fn push_trimmed(out: &mut Vec<(&'static str, String)>, key: &'static str, raw: Option<&str>) {
    if let Some(raw) = raw {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            out.push((key, trimmed.to_string()));
        }
    }
}

/// Strip everything that is not an ASCII digit.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn digits_only_strips_formatting() {
        assert_eq!(digits_only("+56 9 7792 9416"), "56977929416");
        assert_eq!(digits_only("abc"), "");
        assert_eq!(digits_only(""), "");
    }

    #[test]
    fn default_rows_cover_every_key() {
        let rows = default_rows();
        assert_eq!(rows.len(), 11);
        assert!(rows.iter().any(|(k, v)| *k == WHATSAPP_NUMBER_KEY && *v == DEFAULT_WHATSAPP_NUMBER));
        for channel in SocialChannel::ALL {
            assert!(rows.iter().any(|(k, _)| *k == channel.url_key()));
            assert!(rows.iter().any(|(k, _)| *k == channel.label_key()));
        }
    }

    #[test]
    fn snapshot_defaults_when_no_rows() {
        let snapshot = SettingsSnapshot::defaults();
        assert_eq!(snapshot.whatsapp_number, DEFAULT_WHATSAPP_NUMBER);
        assert_eq!(snapshot.whatsapp_message, DEFAULT_WHATSAPP_MESSAGE);
        assert_eq!(snapshot.whatsapp_tooltip, DEFAULT_WHATSAPP_TOOLTIP);
        assert_eq!(snapshot.social.instagram.url, "https://www.instagram.com/");
        assert_eq!(snapshot.social.tiktok.label, "TikTok");
    }

    #[test]
    fn snapshot_prefers_stored_values_per_key() {
        let mut rows = HashMap::new();
        rows.insert(WHATSAPP_NUMBER_KEY.to_string(), "123".to_string());
        rows.insert("social_instagram_url".to_string(), "https://instagram.com/paola".to_string());

        let snapshot = SettingsSnapshot::from_rows(&rows);
        assert_eq!(snapshot.whatsapp_number, "123");
        assert_eq!(snapshot.social.instagram.url, "https://instagram.com/paola");
        // untouched keys still default
        assert_eq!(snapshot.whatsapp_message, DEFAULT_WHATSAPP_MESSAGE);
        assert_eq!(snapshot.social.instagram.label, "Instagram");
    }

    #[test]
    fn snapshot_assembly_is_idempotent() {
        let mut rows = HashMap::new();
        rows.insert(WHATSAPP_MESSAGE_KEY.to_string(), "Hola".to_string());
        assert_eq!(
            SettingsSnapshot::from_rows(&rows),
            SettingsSnapshot::from_rows(&rows)
        );
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let json = serde_json::to_value(SettingsSnapshot::defaults()).unwrap();
        assert_eq!(json["whatsappNumber"], DEFAULT_WHATSAPP_NUMBER);
        assert_eq!(json["social"]["youtube"]["label"], "YouTube");
    }

    #[test]
    fn number_with_no_digits_is_ignored() {
        let patch = SettingsPatch {
            whatsapp_number: Some("abc".to_string()),
            ..SettingsPatch::default()
        };
        assert!(patch.updates().is_empty());
    }

    #[test]
    fn number_is_stored_digits_only() {
        let patch = SettingsPatch {
            whatsapp_number: Some("+56 9 7792 9416".to_string()),
            ..SettingsPatch::default()
        };
        assert_eq!(
            patch.updates(),
            vec![(WHATSAPP_NUMBER_KEY, "56977929416".to_string())]
        );
    }

    #[test]
    fn empty_message_is_ignored_but_empty_tooltip_resets() {
        let patch = SettingsPatch {
            whatsapp_message: Some("   ".to_string()),
            whatsapp_tooltip: Some("".to_string()),
            ..SettingsPatch::default()
        };
        assert_eq!(
            patch.updates(),
            vec![(WHATSAPP_TOOLTIP_KEY, DEFAULT_WHATSAPP_TOOLTIP.to_string())]
        );
    }

    #[test]
    fn text_fields_are_trimmed() {
        let patch = SettingsPatch {
            whatsapp_message: Some("  Hola  ".to_string()),
            social_facebook_label: Some(" Face ".to_string()),
            ..SettingsPatch::default()
        };
        let updates = patch.updates();
        assert_eq!(
            updates,
            vec![
                (WHATSAPP_MESSAGE_KEY, "Hola".to_string()),
                ("social_facebook_label", "Face".to_string()),
            ]
        );
    }

    #[test]
    fn absent_fields_produce_no_updates() {
        assert!(SettingsPatch::default().updates().is_empty());
    }

    #[test]
    fn patch_deserializes_camel_case_subset() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"socialInstagramUrl": "https://instagram.com/x"}"#).unwrap();
        assert_eq!(
            patch.updates(),
            vec![("social_instagram_url", "https://instagram.com/x".to_string())]
        );
    }
}
