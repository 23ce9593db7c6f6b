//! The resolved configuration for one request.
//!
//! A [`Context`] is built once per request by the
//! [`ContextParser`](crate::ContextParser) and only read afterwards. Changing
//! a field always goes through [`Context::copy`] or one of the consuming
//! `with_*` builders, so instances shared between request handlers never
//! change under a reader.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::env::Env;
use crate::error::ContextError;

/// Sandbox application used when the request names none.
pub const DEFAULT_APP_ID: u64 = 184_484_190_795;

/// Open graph namespace registered for [`DEFAULT_APP_ID`].
pub const DEFAULT_APP_NAMESPACE: &str = "fbrelll";

pub const DEFAULT_LOCALE: &str = "en_US";

/// SDK generation a context targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    Old,
    #[default]
    Mu,
}

impl Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::Mu => "mu",
        }
    }
}

impl FromStr for Version {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "old" => Ok(Self::Old),
            "mu" => Ok(Self::Mu),
            other => Err(ContextError::UnknownVersion(other.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display surface the current request renders for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Website,
    Canvas,
    PageTab,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [Self::Website, Self::Canvas, Self::PageTab];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Canvas => "canvas",
            Self::PageTab => "pagetab",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::Canvas => "Canvas",
            Self::PageTab => "Page Tab",
        }
    }
}

impl FromStr for ViewMode {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "website" => Ok(Self::Website),
            "canvas" => Ok(Self::Canvas),
            "pagetab" => Ok(Self::PageTab),
            other => Err(ContextError::UnknownViewMode(other.to_string())),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheme of the inbound request; synthesized URLs reuse it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Defaults of the parser that built a context; [`Context::values`] omits
/// fields equal to these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Baseline {
    pub(crate) app_id: u64,
    pub(crate) locale: String,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// Resolved, validated configuration for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub(crate) app_id: u64,
    pub(crate) app_namespace: String,
    pub(crate) status: bool,
    pub(crate) init: bool,
    pub(crate) use_channel: bool,
    pub(crate) frictionless_requests: bool,
    pub(crate) env: Env,
    pub(crate) locale: String,
    pub(crate) version: Version,
    pub(crate) view_mode: ViewMode,
    /// Set by the auth layer, never from request input.
    pub(crate) is_employee: bool,
    pub(crate) scheme: Scheme,
    #[serde(skip)]
    pub(crate) baseline: Baseline,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID,
            app_namespace: DEFAULT_APP_NAMESPACE.to_string(),
            status: true,
            init: true,
            use_channel: true,
            frictionless_requests: false,
            env: Env::default(),
            locale: DEFAULT_LOCALE.to_string(),
            version: Version::default(),
            view_mode: ViewMode::default(),
            is_employee: false,
            scheme: Scheme::default(),
            baseline: Baseline::default(),
        }
    }
}

impl Context {
    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    pub fn app_namespace(&self) -> &str {
        &self.app_namespace
    }

    /// Whether `FB.init` performs a login status check.
    pub fn status(&self) -> bool {
        self.status
    }

    /// Whether the SDK initializes itself on load.
    pub fn init(&self) -> bool {
        self.init
    }

    /// Whether `FB.init` receives an explicit channel URL.
    pub fn use_channel(&self) -> bool {
        self.use_channel
    }

    pub fn frictionless_requests(&self) -> bool {
        self.frictionless_requests
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn is_employee(&self) -> bool {
        self.is_employee
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Independent copy for callers that want to override a field.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn with_app_id(mut self, app_id: u64) -> Self {
        self.app_id = app_id;
        self
    }

    pub fn with_app_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.app_namespace = namespace.into();
        self
    }

    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }

    pub fn with_init(mut self, init: bool) -> Self {
        self.init = init;
        self
    }

    pub fn with_use_channel(mut self, use_channel: bool) -> Self {
        self.use_channel = use_channel;
        self
    }

    pub fn with_frictionless_requests(mut self, enabled: bool) -> Self {
        self.frictionless_requests = enabled;
        self
    }

    pub fn with_env(mut self, env: impl Into<Env>) -> Self {
        self.env = env.into();
        self
    }

    /// An empty locale resets to the default, as an empty `locale` key does.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        self.locale = if locale.is_empty() {
            self.baseline.locale.clone()
        } else {
            locale
        };
        self
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn with_is_employee(mut self, is_employee: bool) -> Self {
        self.is_employee = is_employee;
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }
}
