//! Request key/value input to [`Context`].
//!
//! Parsing is total: every recognized key has a fallback, unrecognized keys
//! are ignored, and malformed values are replaced by the field default. The
//! fallbacks that happened are reported on [`Resolution`] and logged at debug
//! level, but never surfaced as an error.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde::Deserialize;
use tracing::debug;

use crate::context::{Baseline, Context, DEFAULT_APP_ID, DEFAULT_APP_NAMESPACE, DEFAULT_LOCALE, Version, ViewMode};
use crate::env::Env;
use crate::error::ContextError;

/// Input keys, shared with [`Context::values`].
pub mod keys {
    pub const APP_ID: &str = "appid";
    pub const STATUS: &str = "status";
    pub const INIT: &str = "init";
    pub const CHANNEL: &str = "channel";
    pub const FRICTIONLESS_REQUESTS: &str = "frictionlessRequests";
    pub const SERVER: &str = "server";
    pub const LOCALE: &str = "locale";
    pub const VERSION: &str = "version";
    pub const VIEW_MODE: &str = "view-mode";
    /// Older spelling, read only when `view-mode` is absent.
    pub const VIEW_MODE_LEGACY: &str = "viewmode";
}

/// Literal strings that turn a boolean field off.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FalsyLiterals(BTreeSet<String>);

impl FalsyLiterals {
    pub fn new<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(literals.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }
}

impl Default for FalsyLiterals {
    fn default() -> Self {
        Self::new(["0"])
    }
}

/// Falsy literals for each boolean field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BooleanRules {
    pub status: FalsyLiterals,
    pub init: FalsyLiterals,
    pub channel: FalsyLiterals,
    pub frictionless_requests: FalsyLiterals,
}

impl Default for BooleanRules {
    fn default() -> Self {
        Self {
            status: FalsyLiterals::default(),
            init: FalsyLiterals::default(),
            // Links in the wild carry `channel=false`.
            channel: FalsyLiterals::new(["0", "false"]),
            frictionless_requests: FalsyLiterals::default(),
        }
    }
}

/// Defaults applied by a [`ContextParser`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    pub default_app_id: u64,
    /// Namespace reported for every context; not read from request input.
    pub app_namespace: String,
    pub default_locale: String,
    pub booleans: BooleanRules,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_app_id: DEFAULT_APP_ID,
            app_namespace: DEFAULT_APP_NAMESPACE.to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
            booleans: BooleanRules::default(),
        }
    }
}

/// A parsed context together with the fields that fell back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub context: Context,
    pub fallbacks: Vec<ContextError>,
}

/// Builds [`Context`] values from request parameters.
#[derive(Debug, Clone, Default)]
pub struct ContextParser {
    config: ParserConfig,
}

impl ContextParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Context built purely from this parser's defaults.
    pub fn default_context(&self) -> Context {
        Context {
            app_id: self.config.default_app_id,
            app_namespace: self.config.app_namespace.clone(),
            locale: self.config.default_locale.clone(),
            baseline: Baseline {
                app_id: self.config.default_app_id,
                locale: self.config.default_locale.clone(),
            },
            ..Context::default()
        }
    }

    /// Parse a key/value map. Never fails.
    pub fn from_values<'a, I, K, V>(&self, values: I) -> Context
    where
        I: IntoIterator<Item = (&'a K, &'a V)>,
        K: AsRef<str> + ?Sized + 'a,
        V: AsRef<str> + ?Sized + 'a,
    {
        self.resolve(values).context
    }

    /// Parse owned key/value pairs, such as decoded query or form pairs.
    /// The first occurrence of a repeated key wins.
    pub fn from_pairs<I, K, V>(&self, pairs: I) -> Context
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        self.from_values(pairs.iter().map(|(k, v)| (k, v)))
    }

    /// Parse a key/value map and report every field that fell back.
    pub fn resolve<'a, I, K, V>(&self, values: I) -> Resolution
    where
        I: IntoIterator<Item = (&'a K, &'a V)>,
        K: AsRef<str> + ?Sized + 'a,
        V: AsRef<str> + ?Sized + 'a,
    {
        let input = Input::collect(values);
        let rules = &self.config.booleans;
        let mut context = self.default_context();
        let mut fallbacks = Vec::new();

        if let Some(raw) = input.get(keys::APP_ID) {
            match raw.parse::<u64>() {
                Ok(app_id) => context.app_id = app_id,
                Err(source) => fallbacks.push(ContextError::InvalidAppId {
                    value: raw.to_string(),
                    source,
                }),
            }
        }

        context.status = input.flag(keys::STATUS, &rules.status, true);
        context.init = input.flag(keys::INIT, &rules.init, true);
        context.use_channel = input.flag(keys::CHANNEL, &rules.channel, true);
        context.frictionless_requests = input.flag(
            keys::FRICTIONLESS_REQUESTS,
            &rules.frictionless_requests,
            false,
        );

        if let Some(server) = input.get(keys::SERVER) {
            if Env::is_host_safe(server) {
                context.env = Env::new(server);
            } else {
                fallbacks.push(ContextError::InvalidEnv(server.to_string()));
            }
        }

        if let Some(locale) = input.get(keys::LOCALE).filter(|l| !l.is_empty()) {
            context.locale = locale.to_string();
        }

        if let Some(raw) = input.get(keys::VERSION) {
            // Anything but "old" selects the current SDK.
            if let Err(err) = raw.parse::<Version>() {
                fallbacks.push(err);
            }
            context.version = if raw == Version::Old.as_str() {
                Version::Old
            } else {
                Version::Mu
            };
        }

        let view_mode = input
            .get(keys::VIEW_MODE)
            .or_else(|| input.get(keys::VIEW_MODE_LEGACY));
        if let Some(raw) = view_mode {
            match raw.parse::<ViewMode>() {
                Ok(mode) => context.view_mode = mode,
                Err(err) => fallbacks.push(err),
            }
        }

        for fallback in &fallbacks {
            debug!(key = fallback.key(), "context field fell back to default: {fallback}");
        }

        Resolution { context, fallbacks }
    }
}

/// First value seen per key.
struct Input<'a> {
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> Input<'a> {
    fn collect<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (&'a K, &'a V)>,
        K: AsRef<str> + ?Sized + 'a,
        V: AsRef<str> + ?Sized + 'a,
    {
        let mut entries: Vec<(&'a str, &'a str)> = Vec::new();
        for (key, value) in values {
            let key = key.as_ref();
            if !entries.iter().any(|(k, _)| *k == key) {
                entries.push((key, value.as_ref()));
            }
        }
        Self { entries }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Present and not falsy is true; absent is `default`.
    fn flag(&self, key: &str, falsy: &FalsyLiterals, default: bool) -> bool {
        match self.get(key) {
            Some(value) => !falsy.contains(value),
            None => default,
        }
    }
}

static DEFAULT_PARSER: LazyLock<ContextParser> = LazyLock::new(ContextParser::default);

static DEFAULT_CONTEXT: LazyLock<Context> = LazyLock::new(|| DEFAULT_PARSER.default_context());

/// Parse with the stock defaults.
pub fn from_values<'a, I, K, V>(values: I) -> Context
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: AsRef<str> + ?Sized + 'a,
    V: AsRef<str> + ?Sized + 'a,
{
    DEFAULT_PARSER.from_values(values)
}

/// Shared context holding the stock defaults, built on first use.
pub fn default_context() -> &'static Context {
    &DEFAULT_CONTEXT
}
