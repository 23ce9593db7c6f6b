//! Context back to request key/value form.
//!
//! Only fields that differ from the defaults of the parser that built the
//! context are emitted, so a default context serializes to nothing and links
//! stay short.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::context::Context;
use crate::parser::keys;

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

impl Context {
    /// Non-default fields keyed the way the parser reads them.
    pub fn values(&self) -> BTreeMap<String, String> {
        let defaults = Context::default();
        let baseline = &self.baseline;
        let mut values = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            values.insert(key.to_string(), value);
        };

        if self.app_id != baseline.app_id {
            put(keys::APP_ID, self.app_id.to_string());
        }
        if self.status != defaults.status {
            put(keys::STATUS, flag(self.status).to_string());
        }
        if self.init != defaults.init {
            put(keys::INIT, flag(self.init).to_string());
        }
        if self.use_channel != defaults.use_channel {
            put(keys::CHANNEL, flag(self.use_channel).to_string());
        }
        if self.frictionless_requests != defaults.frictionless_requests {
            put(keys::FRICTIONLESS_REQUESTS, flag(self.frictionless_requests).to_string());
        }
        if self.env != defaults.env {
            put(keys::SERVER, self.env.to_string());
        }
        if self.locale != baseline.locale {
            put(keys::LOCALE, self.locale.clone());
        }
        if self.version != defaults.version {
            put(keys::VERSION, self.version.to_string());
        }
        if self.view_mode != defaults.view_mode {
            put(keys::VIEW_MODE, self.view_mode.to_string());
        }

        values
    }

    /// [`Context::values`] as a URL query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.values())
            .finish()
    }
}
