//! URL synthesis for every display surface and the SDK.
//!
//! All hosts come from [`Env::hostname`]; nothing here builds a host by hand.
//! The page, tab and canvas identifiers below belong to the registered Rell
//! application and must not change.

use serde::Serialize;
use url::form_urlencoded;

use crate::context::{Context, Version, ViewMode};
use crate::env::{BASE_DOMAIN, CDN_HOST, Env, env_options};
use crate::parser::keys;

/// Canvas application slug under `apps.facebook.com`.
pub const CANVAS_SLUG: &str = "fbrelll";

/// Page hosting the Rell tab.
pub const PAGE_TAB_PAGE_ID: &str = "141929622497380";

/// Application id of the Rell tab on that page.
pub const PAGE_TAB_APP_ID: &str = "184484190795";

const PAGE_TAB_PATH: &str = "/pages/Rell-Page-for-Tabs/";

const CHANNEL_PATH: &str = "/channel/";

/// A link that reloads the current view against another environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvLink {
    pub label: String,
    pub name: String,
    pub url: String,
}

/// Append an encoded query, joining with `&` when `url` already has one.
fn append_query(mut url: String, query: &str) -> String {
    if !query.is_empty() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(query);
    }
    url
}

impl Context {
    fn origin(&self, subdomain: &str) -> String {
        format!("{}://{}", self.scheme.as_str(), self.env.hostname(subdomain))
    }

    /// `path` on the environment's `www` host.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}/{}", self.origin("www"), path.trim_start_matches('/'))
    }

    /// Bootstrap script for the targeted SDK generation.
    pub fn sdk_url(&self) -> String {
        let scheme = self.scheme.as_str();
        let locale = &self.locale;
        match (self.version, self.env.uses_cdn()) {
            (Version::Mu, true) => format!("{scheme}://{CDN_HOST}/{locale}/all.js"),
            (Version::Mu, false) => format!("{}/assets.php/{locale}/all.js", self.origin("static")),
            (Version::Old, true) => {
                format!("{scheme}://static.ak.connect.{BASE_DOMAIN}/connect.php/{locale}")
            }
            (Version::Old, false) => format!("{}/connect.php/{locale}", self.origin("static")),
        }
    }

    /// Cross-domain channel for `FB.init`; `None` means omit the parameter.
    pub fn channel_url(&self) -> Option<String> {
        self.use_channel.then(|| self.absolute_url(CHANNEL_PATH))
    }

    /// `path` inside the canvas application.
    pub fn canvas_url(&self, path: &str) -> String {
        let url = format!(
            "{}/{CANVAS_SLUG}/{}",
            self.origin("apps"),
            path.trim_start_matches('/')
        );
        if self.env.is_default() {
            return url;
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(keys::SERVER, self.env.as_str())
            .finish();
        append_query(url, &query)
    }

    /// The Rell tab on its page.
    ///
    /// The tab always loads its registered URL, so `path` is not encoded and
    /// `app_data` does not depend on it: a non-default environment is
    /// forwarded through `app_data` for every path, including `/`.
    pub fn page_tab_url(&self, _path: &str) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("sk", &format!("app_{PAGE_TAB_APP_ID}"));
        if !self.env.is_default() {
            query.append_pair("app_data", self.env.as_str());
        }
        format!(
            "{}{PAGE_TAB_PATH}{PAGE_TAB_PAGE_ID}?{}",
            self.origin("www"),
            query.finish()
        )
    }

    /// Link to `path` that stays on the current display surface.
    pub fn view_url(&self, path: &str) -> String {
        match self.view_mode {
            ViewMode::Canvas => self.canvas_url(path),
            ViewMode::PageTab => self.page_tab_url(path),
            ViewMode::Website => append_query(self.absolute_url(path), &self.query_string()),
        }
    }

    /// One link per known environment other than the current one.
    pub fn env_switch_links(&self, path: &str) -> Vec<EnvLink> {
        env_options()
            .iter()
            .filter(|(label, _)| self.env != *label)
            .map(|(label, name)| EnvLink {
                label: label.to_string(),
                name: name.to_string(),
                url: self.copy().with_env(Env::new(*label)).view_url(path),
            })
            .collect()
    }
}
