//! Backend environment labels and the host derivation rule shared by every
//! synthesized URL.
//!
//! An environment is an open label rather than a closed enum: new sandboxes
//! work without a code change. The labels the selector UI knows about are
//! listed in [`env_options`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base domain all environment hosts hang off.
pub const BASE_DOMAIN: &str = "facebook.com";

/// Host serving the SDK from the CDN (empty environment only).
pub const CDN_HOST: &str = "connect.facebook.net";

/// Backend environment selector, read from the `server` request key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(String);

impl Env {
    /// Production served through the CDN.
    pub const CDN: &'static str = "";
    /// Production without the CDN.
    pub const PRODUCTION: &'static str = "prod";
    pub const BETA: &'static str = "beta";
    pub const LATEST: &'static str = "latest";
    pub const DEV: &'static str = "dev";
    pub const INTERN: &'static str = "intern";
    pub const INYOUR: &'static str = "inyour";
    pub const SANDBOX: &'static str = "sb";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty label, the value every request starts from.
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    /// Only the default environment is fronted by the CDN.
    pub fn uses_cdn(&self) -> bool {
        self.is_default()
    }

    /// Whether `label` can sit inside a hostname: ASCII letters, digits, `-`
    /// and `.` only. Unknown labels outside this set would change which host a
    /// URL points at.
    pub fn is_host_safe(label: &str) -> bool {
        label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    }

    /// Resolve `subdomain` against this environment.
    ///
    /// Production (with or without CDN) gets the bare `<subdomain>.facebook.com`;
    /// every other label is inserted between subdomain and base domain.
    pub fn hostname(&self, subdomain: &str) -> String {
        match self.0.as_str() {
            Self::CDN | Self::PRODUCTION => format!("{subdomain}.{BASE_DOMAIN}"),
            label => format!("{subdomain}.{label}.{BASE_DOMAIN}"),
        }
    }

    /// Human readable name from [`env_options`], or the raw label.
    pub fn display_name(&self) -> &str {
        ENV_OPTIONS
            .iter()
            .find(|(label, _)| *label == self.0)
            .map(|(_, name)| *name)
            .unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Env {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Env {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl PartialEq<str> for Env {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Env {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

const ENV_OPTIONS: &[(&str, &str)] = &[
    (Env::CDN, "Production with CDN"),
    (Env::PRODUCTION, "Production without CDN"),
    (Env::BETA, "Beta"),
    (Env::LATEST, "Latest"),
    (Env::DEV, "Dev"),
    (Env::INTERN, "Intern"),
    (Env::INYOUR, "In Your"),
    (Env::SANDBOX, "Sandbox"),
];

/// Known environments as `(label, display name)`, in selector order.
pub fn env_options() -> &'static [(&'static str, &'static str)] {
    ENV_OPTIONS
}
