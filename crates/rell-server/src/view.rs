//! JSON projection of a resolved context.

use std::collections::BTreeMap;

use rell_context::{Context, EnvLink, Resolution};
use serde::Serialize;

/// Path used for the synthesized links when the request names none.
pub const DEFAULT_PATH: &str = "/";

/// Everything a renderer needs from one request's context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextView {
    pub context: Context,
    pub env_name: String,
    pub view_mode_name: &'static str,
    pub values: BTreeMap<String, String>,
    pub sdk_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_url: Option<String>,
    pub canvas_url: String,
    pub page_tab_url: String,
    pub view_url: String,
    /// Fields that fell back to their defaults, as human readable reasons.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<String>,
}

impl ContextView {
    pub fn new(resolution: &Resolution, path: &str) -> Self {
        let ctx = &resolution.context;
        Self {
            context: ctx.clone(),
            env_name: ctx.env().display_name().to_string(),
            view_mode_name: ctx.view_mode().display_name(),
            values: ctx.values(),
            sdk_url: ctx.sdk_url(),
            channel_url: ctx.channel_url(),
            canvas_url: ctx.canvas_url(path),
            page_tab_url: ctx.page_tab_url(path),
            view_url: ctx.view_url(path),
            fallbacks: resolution.fallbacks.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Environment switcher entries for a context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentsView {
    pub current: String,
    pub current_name: String,
    pub links: Vec<EnvLink>,
}

impl EnvironmentsView {
    pub fn new(ctx: &Context, path: &str) -> Self {
        Self {
            current: ctx.env().to_string(),
            current_name: ctx.env().display_name().to_string(),
            links: ctx.env_switch_links(path),
        }
    }
}
