//! Profile value object - which topology archetype to provision

use serde::{Deserialize, Serialize};

/// Service topology archetype, fixed for the duration of a run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// nginx serving static files
    Static,
    /// nginx + PHP-FPM + MariaDB + DB admin UI
    #[default]
    #[serde(rename = "php", alias = "dynamic")]
    #[value(name = "php", alias = "dynamic")]
    Dynamic,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Static, Profile::Dynamic];

    /// Canonical name as accepted on the command line and in `PROFILE`
    pub fn name(&self) -> &'static str {
        match self {
            Profile::Static => "static",
            Profile::Dynamic => "php",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Profile::Static => "Static web server",
            Profile::Dynamic => "Web server with PHP, MariaDB and DB UI",
        }
    }

    /// Whether the profile runs a database and therefore needs credentials
    pub fn has_database(&self) -> bool {
        matches!(self, Profile::Dynamic)
    }

    /// Parse a user-supplied name; accepts the legacy menu numbers too
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "static" | "1" => Some(Profile::Static),
            "php" | "dynamic" | "2" => Some(Profile::Dynamic),
            _ => None,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_dynamic() {
        assert_eq!(Profile::default(), Profile::Dynamic);
    }

    #[test]
    fn parse_accepts_names_and_menu_numbers() {
        assert_eq!(Profile::parse("static"), Some(Profile::Static));
        assert_eq!(Profile::parse(" PHP "), Some(Profile::Dynamic));
        assert_eq!(Profile::parse("dynamic"), Some(Profile::Dynamic));
        assert_eq!(Profile::parse("2"), Some(Profile::Dynamic));
        assert_eq!(Profile::parse("django"), None);
    }

    #[test]
    fn serde_uses_cli_names() {
        let json = serde_json::to_string(&Profile::Dynamic).unwrap();
        assert_eq!(json, r#""php""#);
        let parsed: Profile = serde_json::from_str(r#""dynamic""#).unwrap();
        assert_eq!(parsed, Profile::Dynamic);
    }

    #[test]
    fn only_dynamic_has_database() {
        assert!(Profile::Dynamic.has_database());
        assert!(!Profile::Static.has_database());
    }
}
