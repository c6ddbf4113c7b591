use std::fmt;

pub const ATTR_ADDRESS: &str = "address";
pub const ATTR_LEGACY_ADDRESS: &str = "ln-address";
pub const ATTR_PORTFOLIO_URL: &str = "portfolio-url";
pub const ATTR_PORTFOLIO_LABEL: &str = "portfolio-label";
pub const ATTR_HOVER_TEXT: &str = "hover-text";
pub const ATTR_BUTTON_POSITION: &str = "button-position";

/// Host attributes whose mutation triggers a config re-read.
pub const OBSERVED_ATTRIBUTES: &[&str] = &[
    ATTR_ADDRESS,
    ATTR_LEGACY_ADDRESS,
    ATTR_PORTFOLIO_URL,
    ATTR_PORTFOLIO_LABEL,
    ATTR_HOVER_TEXT,
    ATTR_BUTTON_POSITION,
];

pub const DEFAULT_PORTFOLIO_URL: &str = "#";
pub const DEFAULT_PORTFOLIO_LABEL: &str = "See more projects";
pub const DEFAULT_HOVER_TEXT: &str = "Buy me a coffee?";

pub const LIGHTNING_URI_SCHEME: &str = "lightning:";

/// Schemes a portfolio link may carry. Anything else with a scheme is dropped.
const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    /// Only the exact value `left` selects the left side.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("left") => Side::Left,
            _ => Side::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub(crate) fn transform_origin(self) -> &'static str {
        match self {
            Side::Left => "bottom left",
            Side::Right => "bottom right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    pub address: String,
    pub portfolio_url: String,
    pub portfolio_label: String,
    pub hover_text: String,
    pub side: Side,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            portfolio_url: DEFAULT_PORTFOLIO_URL.to_string(),
            portfolio_label: DEFAULT_PORTFOLIO_LABEL.to_string(),
            hover_text: DEFAULT_HOVER_TEXT.to_string(),
            side: Side::Right,
        }
    }
}

impl WidgetConfig {
    /// Builds a config from an attribute lookup. Missing, empty or unusable
    /// values fall back to their defaults; this never fails.
    pub fn from_attributes<F>(read: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| read(name).filter(|value| !value.is_empty());

        let address = present(ATTR_ADDRESS)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .or_else(|| {
                present(ATTR_LEGACY_ADDRESS)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
            })
            .unwrap_or_default();
        let portfolio_url = present(ATTR_PORTFOLIO_URL)
            .filter(|value| is_safe_url(value))
            .unwrap_or_else(|| DEFAULT_PORTFOLIO_URL.to_string());
        let portfolio_label = present(ATTR_PORTFOLIO_LABEL)
            .unwrap_or_else(|| DEFAULT_PORTFOLIO_LABEL.to_string());
        let hover_text =
            present(ATTR_HOVER_TEXT).unwrap_or_else(|| DEFAULT_HOVER_TEXT.to_string());
        let side = Side::parse(read(ATTR_BUTTON_POSITION).as_deref());

        Self {
            address,
            portfolio_url,
            portfolio_label,
            hover_text,
            side,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.address.is_empty()
    }

    /// `lightning:<address>`, or `None` while no address is configured.
    pub fn payment_uri(&self) -> Option<String> {
        if !self.is_configured() {
            return None;
        }
        Some(format!("{LIGHTNING_URI_SCHEME}{}", self.address))
    }
}

/// Reads the scheme the way a browser's URL parser would: ASCII tab and
/// newline are removed anywhere and leading C0 controls or spaces are
/// skipped. Relative URLs have no scheme and are accepted.
fn is_safe_url(value: &str) -> bool {
    let normalized: String = value
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .skip_while(|c| *c <= ' ')
        .collect();
    match url_scheme(&normalized) {
        Some(scheme) => ALLOWED_URL_SCHEMES
            .iter()
            .any(|allowed| scheme.eq_ignore_ascii_case(allowed)),
        None => true,
    }
}

/// Text before the first `:` unless a path, query or fragment starts first.
fn url_scheme(url: &str) -> Option<&str> {
    let end = url.find([':', '/', '?', '#'])?;
    if url[end..].starts_with(':') {
        Some(&url[..end])
    } else {
        None
    }
}
