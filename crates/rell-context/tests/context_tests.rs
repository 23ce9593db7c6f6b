//! Context layer tests — parsing, URL synthesis, round-trip serialization.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rell_context::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Parsing
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn default_context() {
        let ctx = from_values(&values(&[]));
        assert_eq!(&ctx, rell_context::default_context());
        assert_eq!(ctx.app_id(), 184484190795);
        assert!(ctx.status());
        assert!(ctx.init());
        assert!(ctx.use_channel());
        assert!(!ctx.frictionless_requests());
        assert_eq!(ctx.env(), "");
        assert_eq!(ctx.locale(), "en_US");
        assert_eq!(ctx.version(), Version::Mu);
        assert_eq!(ctx.view_mode(), ViewMode::Website);
        assert_eq!(ctx.app_namespace(), "fbrelll");
        assert!(!ctx.is_employee());
    }

    #[test]
    fn custom_app_id() {
        let ctx = from_values(&values(&[("appid", "123")]));
        assert_eq!(ctx.app_id(), 123);
    }

    #[test]
    fn malformed_app_id_uses_default() {
        let ctx = from_values(&values(&[("appid", "not-a-number")]));
        assert_eq!(ctx.app_id(), 184484190795);
        let ctx = from_values(&values(&[("appid", "-5")]));
        assert_eq!(ctx.app_id(), 184484190795);
    }

    #[test]
    fn boolean_fields_follow_their_literals() {
        let cases: [(&str, fn(&Context) -> bool, bool); 4] = [
            ("status", Context::status, true),
            ("init", Context::init, true),
            ("channel", Context::use_channel, true),
            ("frictionlessRequests", Context::frictionless_requests, false),
        ];
        for (key, field, default) in cases {
            assert!(!field(&from_values(&values(&[(key, "0")]))), "{key}=0");
            assert!(field(&from_values(&values(&[(key, "1")]))), "{key}=1");
            assert_eq!(field(&from_values(&values(&[]))), default, "{key} absent");
        }
    }

    #[test]
    fn only_channel_treats_false_literal_as_false() {
        assert!(!from_values(&values(&[("channel", "false")])).use_channel());
        assert!(from_values(&values(&[("status", "false")])).status());
        assert!(from_values(&values(&[("init", "false")])).init());
    }

    #[test]
    fn complex() {
        let ctx = from_values(&values(&[
            ("status", "1"),
            ("server", "beta"),
            ("locale", "en_PI"),
            ("version", "old"),
            ("channel", "false"),
        ]));
        assert!(ctx.status());
        assert_eq!(ctx.env(), "beta");
        assert_eq!(ctx.locale(), "en_PI");
        assert_eq!(ctx.version(), Version::Old);
        assert!(!ctx.use_channel());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let ctx = from_values(&values(&[("code", "FB.init()"), ("isEmployee", "1")]));
        assert_eq!(ctx, Context::default());
    }

    #[test]
    fn unrecognized_env_passes_through() {
        let ctx = from_values(&values(&[("server", "devbox42")]));
        assert_eq!(ctx.env(), "devbox42");
        assert_eq!(
            ctx.canvas_url("/"),
            "http://apps.devbox42.facebook.com/fbrelll/?server=devbox42"
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // URL synthesis
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn page_tab_url() {
        let ctx = from_values(&values(&[]));
        assert_eq!(
            ctx.page_tab_url("/pages/Rell-Page-for-Tabs/141929622497380"),
            "http://www.facebook.com/pages/Rell-Page-for-Tabs/141929622497380?sk=app_184484190795"
        );
    }

    #[test]
    fn page_tab_url_beta() {
        let ctx = from_values(&values(&[("server", "beta")]));
        assert_eq!(
            ctx.page_tab_url("/pages/Rell-Page-for-Tabs/141929622497380"),
            "http://www.beta.facebook.com/pages/Rell-Page-for-Tabs/141929622497380?sk=app_184484190795&app_data=beta"
        );
    }

    #[test]
    fn canvas_url() {
        let ctx = from_values(&values(&[]));
        assert_eq!(ctx.canvas_url(""), "http://apps.facebook.com/fbrelll/");
        assert_eq!(ctx.canvas_url("/"), "http://apps.facebook.com/fbrelll/");
    }

    #[test]
    fn canvas_url_beta() {
        let ctx = from_values(&values(&[("server", "beta")]));
        assert_eq!(ctx.canvas_url("/"), "http://apps.beta.facebook.com/fbrelll/?server=beta");
    }

    #[test]
    fn view_url_for_parsed_view_modes() {
        let canvas = from_values(&values(&[("view-mode", "canvas"), ("server", "beta")]));
        assert_eq!(canvas.view_url("/"), "http://apps.beta.facebook.com/fbrelll/?server=beta");

        let tab = from_values(&values(&[("viewmode", "pagetab")]));
        assert!(tab.view_url("/examples/").ends_with("?sk=app_184484190795"));

        let site = from_values(&values(&[("appid", "123")]));
        assert_eq!(site.view_url("/examples/"), "http://www.facebook.com/examples/?appid=123");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Round trip
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn default_values_are_empty() {
        assert!(from_values(&values(&[])).values().is_empty());
    }

    #[test]
    fn values_round_trip() {
        let contexts = [
            Context::default(),
            Context::default().with_app_id(123).with_env("beta"),
            Context::default()
                .with_status(false)
                .with_init(false)
                .with_use_channel(false)
                .with_frictionless_requests(true),
            Context::default()
                .with_locale("en_PI")
                .with_version(Version::Old)
                .with_view_mode(ViewMode::PageTab),
            Context::default().with_env("prod").with_view_mode(ViewMode::Canvas),
            Context::default().with_locale(""),
            Context::default().with_locale("de_DE").with_locale(""),
        ];
        for ctx in contexts {
            assert_eq!(from_values(&ctx.values()), ctx);
        }
    }

    #[test]
    fn custom_parser_defaults_serialize_to_nothing() {
        let parser = ContextParser::new(ParserConfig {
            default_app_id: 42,
            default_locale: "fr_FR".into(),
            ..ParserConfig::default()
        });
        let ctx = parser.default_context();
        assert!(ctx.values().is_empty());
        assert!(parser.from_values(&values(&[])).values().is_empty());
        assert_eq!(ctx.view_url("/examples/"), "http://www.facebook.com/examples/");
    }

    #[test]
    fn custom_parser_round_trips_stock_values() {
        let parser = ContextParser::new(ParserConfig {
            default_app_id: 42,
            default_locale: "fr_FR".into(),
            ..ParserConfig::default()
        });
        let ctx = parser.from_values(&values(&[
            ("locale", "en_US"),
            ("appid", "184484190795"),
        ]));
        assert_eq!(ctx.app_id(), 184484190795);
        assert_eq!(ctx.locale(), "en_US");

        let emitted = ctx.values();
        assert_eq!(emitted["appid"], "184484190795");
        assert_eq!(emitted["locale"], "en_US");
        assert_eq!(parser.from_values(&emitted), ctx);

        let reset = ctx.copy().with_locale("");
        assert_eq!(reset.locale(), "fr_FR");
        assert_eq!(parser.from_values(&reset.values()), reset);
    }

    #[test]
    fn parsed_values_round_trip() {
        let ctx = from_values(&values(&[
            ("status", "1"),
            ("server", "beta"),
            ("locale", "en_PI"),
            ("version", "old"),
            ("channel", "false"),
        ]));
        let emitted = ctx.values();
        assert_eq!(emitted.get("status"), None);
        assert_eq!(emitted["channel"], "0");
        assert_eq!(from_values(&emitted), ctx);
    }

    #[test]
    fn copy_does_not_touch_original() {
        let original = from_values(&values(&[("server", "beta")]));
        let snapshot = original.clone();
        let _switched = original.copy().with_env("dev").with_app_id(1);
        assert_eq!(original, snapshot);
    }

    #[test]
    fn default_context_is_shared_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| rell_context::default_context() as *const Context as usize))
            .collect();
        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }
}
