use serde::{Deserialize, Serialize};

/// Badge size as sent on the wire (`badgesize` for v2, `maxsize` for v1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeSize {
    #[default]
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "large")]
    Large,
}

impl BadgeSize {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeSize::Medium => "medium",
            BadgeSize::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeTheme {
    #[default]
    #[serde(rename = "light")]
    Light,
    #[serde(rename = "dark")]
    Dark,
}

impl BadgeTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeTheme::Light => "light",
            BadgeTheme::Dark => "dark",
        }
    }
}

/// Orientation of the badge card. The wire calls this `badgetype`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "VERTICAL")]
    Vertical,
    #[serde(rename = "HORIZONTAL")]
    Horizontal,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Vertical => "VERTICAL",
            Orientation::Horizontal => "HORIZONTAL",
        }
    }
}

/// Wire version of the vendor badge contract. v1 renders a profile badge addressed by vanity
/// name; v2 addresses an entity and accepts extra `key-*` parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeVersion {
    #[default]
    #[serde(rename = "v1")]
    V1,
    #[serde(rename = "v2")]
    V2,
}

impl BadgeVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeVersion::V1 => "v1",
            BadgeVersion::V2 => "v2",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    #[default]
    #[serde(rename = "PROFILE")]
    Profile,
    #[serde(rename = "COMPANY")]
    Company,
    #[serde(rename = "GROUP")]
    Group,
}

impl Entity {
    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Profile => "PROFILE",
            Entity::Company => "COMPANY",
            Entity::Group => "GROUP",
        }
    }
}

pub const DEFAULT_LOCALE: &str = "en_US";

/// Default `trk` value for v1 loader requests.
pub const DEFAULT_TRACKING_PARAM: &str = "profile-badge";

/// Immutable inputs of one badge render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderParams {
    pub locale: String,
    pub size: BadgeSize,
    pub theme: BadgeTheme,
    pub orientation: Orientation,
    /// The slug portion of the public profile URL (`linkedin.com/in/<vanity>`).
    pub vanity: String,
    pub version: BadgeVersion,
    pub entity: Entity,
    pub tracking: String,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            size: BadgeSize::default(),
            theme: BadgeTheme::default(),
            orientation: Orientation::default(),
            vanity: String::new(),
            version: BadgeVersion::default(),
            entity: Entity::default(),
            tracking: DEFAULT_TRACKING_PARAM.to_string(),
        }
    }
}

impl RenderParams {
    pub fn for_vanity(vanity: impl Into<String>) -> Self {
        Self {
            vanity: vanity.into(),
            ..Self::default()
        }
    }

    /// Parameter values folded into the UID hash, in order.
    ///
    /// The fold order is part of this crate's contract: locale, size, theme, orientation,
    /// vanity, version, entity, tracking. Empty values are skipped by the generator.
    pub(crate) fn uid_fields(&self) -> [&str; 8] {
        [
            &self.locale,
            self.size.as_str(),
            self.theme.as_str(),
            self.orientation.as_str(),
            &self.vanity,
            self.version.as_str(),
            self.entity.as_str(),
            &self.tracking,
        ]
    }

    /// Composite cache key for the self-render path.
    ///
    /// `|` cannot occur in a vanity slug or in any of the enum wire strings, so the joined
    /// form is unambiguous.
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.vanity,
            self.locale,
            self.size.as_str(),
            self.theme.as_str(),
            self.orientation.as_str(),
            self.entity.as_str()
        )
    }
}
