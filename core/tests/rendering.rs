use std::collections::HashMap;

use ln_tip_jar_core::config::{
    ATTR_ADDRESS, ATTR_BUTTON_POSITION, ATTR_HOVER_TEXT, ATTR_PORTFOLIO_LABEL, ATTR_PORTFOLIO_URL,
};
use ln_tip_jar_core::markup::render;
use ln_tip_jar_core::{DialogState, Side, WidgetConfig};

const HOSTILE: &str = r#"<img src=x onerror="alert('x')">&amp;"#;

fn config_from(pairs: &[(&str, &str)]) -> WidgetConfig {
    let attrs: HashMap<&str, &str> = pairs.iter().copied().collect();
    WidgetConfig::from_attributes(|name| attrs.get(name).map(|value| value.to_string()))
}

#[test]
fn hostile_text_never_becomes_markup() {
    for attr in [
        ATTR_ADDRESS,
        ATTR_PORTFOLIO_URL,
        ATTR_PORTFOLIO_LABEL,
        ATTR_HOVER_TEXT,
    ] {
        let html = render(&config_from(&[(attr, HOSTILE)]));
        assert!(!html.contains("<img"), "{attr} leaked a tag");
        assert!(!html.contains(r#"onerror=""#), "{attr} leaked an attribute");
        assert!(
            html.contains("&lt;img src=x onerror=&quot;alert(&#x27;x&#x27;)&quot;&gt;&amp;amp;"),
            "{attr} was not escaped"
        );
    }
}

#[test]
fn quote_in_url_cannot_break_out_of_href() {
    let html = render(&config_from(&[(ATTR_PORTFOLIO_URL, r#"https://a.example/" onclick="x"#)]));
    assert!(html.contains(r#"href="https://a.example/&quot; onclick=&quot;x""#));
}

#[test]
fn address_row_shows_address_verbatim() {
    let html = render(&config_from(&[(ATTR_ADDRESS, "alice@example.com")]));
    assert!(html.contains(">alice@example.com</span>"));
    assert!(html.contains(r#"title="alice@example.com""#));
    assert!(html.contains(r#"aria-label="Lightning Address: alice@example.com""#));
    assert!(!html.contains("address not configured"));
}

#[test]
fn portfolio_link_opens_in_new_tab() {
    let html = render(&config_from(&[
        (ATTR_PORTFOLIO_URL, "https://example.com"),
        (ATTR_PORTFOLIO_LABEL, "My work"),
    ]));
    assert!(html.contains(r#"href="https://example.com" target="_blank" rel="noopener noreferrer""#));
    assert!(html.contains(r#"aria-label="My work, opens in a new tab">My work →</a>"#));
}

#[test]
fn unchanged_config_rebuilds_to_the_same_markup_and_state() {
    let config = config_from(&[(ATTR_ADDRESS, "alice@example.com")]);
    let mut state = DialogState::new();
    state.open();

    let first = render(&config);
    let rebuild = state.begin_rebuild();
    if rebuild.was_open {
        state.open();
    }
    let second = render(&config);
    let rebuild_again = state.begin_rebuild();
    if rebuild_again.was_open {
        state.open();
    }

    assert_eq!(first, second);
    assert_eq!(second, render(&config));
    assert!(rebuild.was_open && rebuild_again.was_open);
    assert!(state.is_open());
}

#[test]
fn switching_side_while_open_keeps_dialog_open_on_new_side() {
    let before = config_from(&[(ATTR_BUTTON_POSITION, "right")]);
    let after = config_from(&[(ATTR_BUTTON_POSITION, "left")]);
    assert_ne!(before, after);
    assert_eq!(after.side, Side::Left);

    let mut state = DialogState::new();
    state.open();
    let rebuild = state.begin_rebuild();
    assert!(rebuild.was_open);
    state.open();

    let html = render(&after);
    assert!(state.is_open());
    assert!(html.contains("bottom: 88px; left: 24px;"));
}
