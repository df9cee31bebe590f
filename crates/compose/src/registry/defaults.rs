//! Pre-populated registry of standard blocks.
//!
//! These blocks emit minimal HTML from their props; they exist so pages
//! have a working catalog out of the box and so the engine's contracts are
//! exercised end to end. Site-specific catalogs register their own blocks
//! instead of (or on top of) these.

use html_escape::encode_text;
use serde_json::Value as JsonValue;
use serde_json::json;

use super::{BlockRegistry, BlockSpec};
use crate::conditions::{has_items, is_enabled};
use crate::section::Props;

/// Build the default block registry.
///
/// Included blocks:
/// - `hero`, `section.content` — plain passthrough blocks, no spec.
/// - `section.stats` — requires `data`.
/// - `section.faq`, `section.testimonials` — gated on a non-empty item list.
/// - `section.features` — gated on items plus an `enabled` switch.
/// - `section.cta` — defaults `variant` to `"default"`.
pub fn default_registry() -> BlockRegistry {
    let mut registry = BlockRegistry::new();

    registry.register("hero", render_hero);
    registry.register("section.content", render_content);

    registry.register_with_spec(
        "section.stats",
        render_stats,
        BlockSpec::new().with_required(["data"]),
    );

    registry.register_with_spec(
        "section.faq",
        render_faq,
        BlockSpec::new()
            .with_required(["data"])
            .with_should_render(|_, section_data, _| items_present(section_data, "questions")),
    );

    registry.register_with_spec(
        "section.testimonials",
        render_testimonials,
        BlockSpec::new()
            .with_required(["data"])
            .with_should_render(|_, section_data, _| items_present(section_data, "testimonials")),
    );

    registry.register_with_spec(
        "section.features",
        render_features,
        BlockSpec::new()
            .with_required(["data"])
            .with_should_render(|_, section_data, _| {
                let Some(data) = section_data else {
                    return false;
                };
                is_enabled(data) && items_present(section_data, "features")
            }),
    );

    let mut cta_defaults = Props::new();
    cta_defaults.insert("variant".into(), json!("default"));
    registry.register_with_spec(
        "section.cta",
        render_cta,
        BlockSpec::new()
            .with_required(["data"])
            .with_defaults(cta_defaults),
    );

    registry
}

/// Section data may carry its items under a well-known key, under `items`,
/// or be the item list itself.
fn items_present(section_data: Option<&JsonValue>, preferred_key: &str) -> bool {
    let Some(data) = section_data else {
        return false;
    };
    let items = data
        .get(preferred_key)
        .or_else(|| data.get("items"))
        .unwrap_or(data);
    has_items(items)
}

fn data<'a>(props: &'a Props) -> &'a JsonValue {
    props.get("data").unwrap_or(&JsonValue::Null)
}

fn field<'a>(value: &'a JsonValue, name: &str) -> &'a str {
    value.get(name).and_then(JsonValue::as_str).unwrap_or("")
}

fn items<'a>(value: &'a JsonValue, preferred_key: &str) -> &'a [JsonValue] {
    value
        .get(preferred_key)
        .or_else(|| value.get("items"))
        .unwrap_or(value)
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn render_hero(props: &Props) -> String {
    let data = data(props);
    let mut out = String::from("<section class=\"hero\">");
    out.push_str(&format!("<h1>{}</h1>", encode_text(field(data, "title"))));
    let subtitle = field(data, "subtitle");
    if !subtitle.is_empty() {
        out.push_str(&format!("<p>{}</p>", encode_text(subtitle)));
    }
    out.push_str("</section>");
    out
}

fn render_content(props: &Props) -> String {
    let data = data(props);
    format!(
        "<section class=\"content\">{}</section>",
        encode_text(field(data, "body"))
    )
}

fn render_stats(props: &Props) -> String {
    let data = data(props);
    let mut out = String::from("<section class=\"stats\">");
    for stat in items(data, "stats") {
        out.push_str(&format!(
            "<div class=\"stat\"><span>{}</span><span>{}</span></div>",
            encode_text(field(stat, "label")),
            encode_text(field(stat, "value"))
        ));
    }
    out.push_str("</section>");
    out
}

fn render_faq(props: &Props) -> String {
    let data = data(props);
    let mut out = String::from("<section class=\"faq\">");
    for entry in items(data, "questions") {
        out.push_str(&format!(
            "<details><summary>{}</summary><p>{}</p></details>",
            encode_text(field(entry, "question")),
            encode_text(field(entry, "answer"))
        ));
    }
    out.push_str("</section>");
    out
}

fn render_testimonials(props: &Props) -> String {
    let data = data(props);
    let mut out = String::from("<section class=\"testimonials\">");
    for entry in items(data, "testimonials") {
        out.push_str(&format!(
            "<blockquote>{}<cite>{}</cite></blockquote>",
            encode_text(field(entry, "quote")),
            encode_text(field(entry, "author"))
        ));
    }
    out.push_str("</section>");
    out
}

fn render_features(props: &Props) -> String {
    let data = data(props);
    let mut out = String::from("<section class=\"features\"><ul>");
    for entry in items(data, "features") {
        out.push_str(&format!("<li>{}</li>", encode_text(field(entry, "title"))));
    }
    out.push_str("</ul></section>");
    out
}

fn render_cta(props: &Props) -> String {
    let data = data(props);
    let variant = props
        .get("variant")
        .and_then(JsonValue::as_str)
        .unwrap_or("default");
    format!(
        "<section class=\"cta cta--{}\"><a href=\"{}\">{}</a></section>",
        encode_text(variant),
        encode_text(field(data, "href")),
        encode_text(field(data, "label"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_standard_blocks() {
        let registry = default_registry();
        for id in [
            "hero",
            "section.content",
            "section.stats",
            "section.faq",
            "section.testimonials",
            "section.features",
            "section.cta",
        ] {
            assert!(registry.has_block(id), "missing block {id}");
        }
    }

    #[test]
    fn passthrough_blocks_carry_no_spec() {
        let registry = default_registry();
        assert!(registry.spec("hero").is_none());
        assert!(registry.spec("section.content").is_none());
    }

    #[test]
    fn faq_guard_accepts_items_in_any_shape() {
        let registry = default_registry();
        let guard = registry.spec("section.faq").unwrap().should_render.clone();
        let guard = guard.unwrap();
        let page = blox_core::DataRef::value(json!({}));
        let descriptor = crate::section::SectionDescriptor::new("faq", "section.faq");

        let wrapped = json!({"questions": [{"question": "Q"}]});
        let bare = json!([{"question": "Q"}]);
        let empty = json!({"questions": []});
        assert!(guard(&page, Some(&wrapped), &descriptor));
        assert!(guard(&page, Some(&bare), &descriptor));
        assert!(!guard(&page, Some(&empty), &descriptor));
        assert!(!guard(&page, None, &descriptor));
    }

    #[test]
    fn features_guard_honors_enabled_switch() {
        let registry = default_registry();
        let guard = registry
            .spec("section.features")
            .unwrap()
            .should_render
            .clone()
            .unwrap();
        let page = blox_core::DataRef::value(json!({}));
        let descriptor = crate::section::SectionDescriptor::new("features", "section.features");

        let on = json!({"features": [{"title": "Fast"}]});
        let off = json!({"enabled": false, "features": [{"title": "Fast"}]});
        assert!(guard(&page, Some(&on), &descriptor));
        assert!(!guard(&page, Some(&off), &descriptor));
    }

    #[test]
    fn hero_escapes_markup_in_titles() {
        let mut props = Props::new();
        props.insert("data".into(), json!({"title": "A <b>bold</b> claim"}));
        let html = render_hero(&props);
        assert_eq!(
            html,
            "<section class=\"hero\"><h1>A &lt;b&gt;bold&lt;/b&gt; claim</h1></section>"
        );
    }
}
