//! Shadow-root content for the widget: stylesheet, trigger button and dialog.
//!
//! Everything user supplied goes through [`escape_html`] before it is
//! interpolated. Element ids below are the hooks the browser layer looks up
//! after each rebuild.

use std::fmt::Write;

use crate::config::{Side, WidgetConfig};
use crate::escape::escape_html;

pub const TRIGGER_ID: &str = "tip-trigger";
pub const DIALOG_ID: &str = "tip-dialog";
pub const CLOSE_ID: &str = "tip-close";
pub const QR_ID: &str = "tip-qr";
pub const COPY_ID: &str = "tip-copy";

pub const OPEN_CLASS: &str = "is-open";
pub const COPIED_CLASS: &str = "is-copied";

pub const TRIGGER_LABEL: &str = "Open Lightning tip widget";
pub const DIALOG_LABEL: &str = "Lightning Network tip widget";
pub const DIALOG_TITLE: &str = "Buy me a coffee ☕";
pub const DIALOG_DESCRIPTION: &str = "If this project gave you something, you can support it with a \
     Lightning micropayment. No middlemen, no fees, straight to the creator.";
pub const CLOSE_LABEL: &str = "Close dialog";
pub const QR_LABEL: &str = "Lightning Address QR code";
pub const QR_LOADING_TEXT: &str = "Loading…";
pub const ADDRESS_PLACEHOLDER: &str = "address not configured";
pub const COPY_TEXT: &str = "Copy";
pub const COPY_LABEL: &str = "Copy Lightning Address to clipboard";
pub const COPIED_TEXT: &str = "Copied!";
pub const COPIED_LABEL: &str = "Address copied!";
pub const PORTFOLIO_SUFFIX: &str = ", opens in a new tab";

const COFFEE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor" aria-hidden="true" focusable="false">
  <path d="M20 3H4v10c0 2.21 1.79 4 4 4h6c2.21 0 4-1.79 4-4v-3h2c1.11 0 2-.89 2-2V5c0-1.11-.89-2-2-2zm0 5h-2V5h2v3zM4 19h16v2H4z"/>
</svg>"#;

const FONT_STACK: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif";
const ACCENT: &str = "#F7931A";

/// Full shadow-root content for one build.
pub fn render(config: &WidgetConfig) -> String {
    let hover_text = escape_html(&config.hover_text);
    let address = escape_html(&config.address);
    let portfolio_url = escape_html(&config.portfolio_url);
    let portfolio_label = escape_html(&config.portfolio_label);
    let address_body = if config.is_configured() {
        address.clone()
    } else {
        format!(r#"<em class="ln-address__empty">{ADDRESS_PLACEHOLDER}</em>"#)
    };

    let mut out = String::new();
    let _ = write!(out, "<style>{}</style>", stylesheet(config.side));
    let _ = write!(
        out,
        r#"
<button id="{TRIGGER_ID}" class="tip-btn" type="button" aria-label="{TRIGGER_LABEL}" aria-haspopup="dialog" aria-expanded="false">
  <span class="tip-btn__icon">{COFFEE_ICON}</span>
  <span class="tip-btn__text" aria-hidden="true">{hover_text}</span>
</button>
<div id="{DIALOG_ID}" class="modal" role="dialog" aria-modal="true" aria-label="{DIALOG_LABEL}" aria-hidden="true">
  <div class="modal__bar" aria-hidden="true"></div>
  <div class="modal__header">
    <h2 class="modal__title">{DIALOG_TITLE}</h2>
    <button id="{CLOSE_ID}" class="modal__close" type="button" aria-label="{CLOSE_LABEL}">✕</button>
  </div>
  <div class="modal__body">
    <p class="modal__desc">{DIALOG_DESCRIPTION}</p>
    <div id="{QR_ID}" class="modal__qr" aria-label="{QR_LABEL}">{loading}</div>
    <div class="ln-row">
      <span class="ln-address" title="{address}" aria-label="Lightning Address: {address}">{address_body}</span>
      <button id="{COPY_ID}" class="copy-btn" type="button" aria-label="{COPY_LABEL}">{COPY_TEXT}</button>
    </div>
    <div class="modal__sep" role="separator"></div>
    <a class="portfolio-link" href="{portfolio_url}" target="_blank" rel="noopener noreferrer" aria-label="{portfolio_label}{PORTFOLIO_SUFFIX}">{portfolio_label} →</a>
  </div>
</div>
"#,
        loading = status_message(QR_LOADING_TEXT, true),
    );
    out
}

/// Inline message shown inside the QR container.
pub fn status_message(text: &str, live: bool) -> String {
    let text = escape_html(text);
    if live {
        format!(r#"<span class="qr-msg" aria-live="polite">{text}</span>"#)
    } else {
        format!(r#"<span class="qr-msg">{text}</span>"#)
    }
}

pub fn stylesheet(side: Side) -> String {
    let anchor = side.as_str();
    let origin = side.transform_origin();
    format!(
        r#"
*, *::before, *::after {{ box-sizing: border-box; margin: 0; padding: 0; }}
.tip-btn {{
  position: fixed; bottom: 24px; {anchor}: 24px; z-index: 99999;
  display: flex; align-items: center; flex-direction: row;
  height: 52px; width: 52px; border-radius: 26px; padding: 0 14px;
  background: #1a1a1a; outline: 1px solid rgba(255, 255, 255, 0.15); border: none;
  cursor: pointer; overflow: hidden; white-space: nowrap;
  font-family: {FONT_STACK};
  transition: width 0.35s cubic-bezier(0.4, 0, 0.2, 1), outline-color 0.2s ease;
}}
.tip-btn:hover {{ width: 272px; outline-color: rgba(255, 255, 255, 0.3); }}
.tip-btn:focus-visible {{ outline: 2px solid {ACCENT}; outline-offset: 2px; width: 272px; }}
.tip-btn__icon {{ flex-shrink: 0; width: 24px; height: 24px; color: #cccccc; display: flex; align-items: center; justify-content: center; }}
.tip-btn__icon svg {{ width: 20px; height: 20px; fill: currentColor; }}
.tip-btn__text {{
  margin-left: 10px; color: #cccccc; font-size: 14px; white-space: nowrap;
  opacity: 0; flex-shrink: 0; transition: opacity 0.2s ease 0.14s; pointer-events: none;
}}
.tip-btn:hover .tip-btn__text, .tip-btn:focus-visible .tip-btn__text {{ opacity: 1; }}
.modal {{
  position: fixed; bottom: 88px; {anchor}: 24px; z-index: 99998;
  width: 320px; background: #1a1a1a; border-radius: 12px; overflow: hidden;
  box-shadow: 0 4px 6px rgba(0, 0, 0, 0.35), 0 12px 48px rgba(0, 0, 0, 0.65);
  outline: 1px solid rgba(255, 255, 255, 0.13);
  transform: scale(0.95); opacity: 0; pointer-events: none; transform-origin: {origin};
  transition: transform 0.22s cubic-bezier(0.4, 0, 0.2, 1), opacity 0.22s ease;
  font-family: {FONT_STACK};
}}
.modal.{open} {{ transform: scale(1); opacity: 1; pointer-events: auto; }}
.modal__bar {{ height: 3px; background: {ACCENT}; }}
.modal__header {{ display: flex; align-items: flex-start; justify-content: space-between; gap: 8px; padding: 18px 16px 0 20px; }}
.modal__title {{ color: #ffffff; font-size: 17px; font-weight: 600; line-height: 1.3; }}
.modal__close {{
  flex-shrink: 0; width: 28px; height: 28px; margin-top: 1px;
  background: rgba(255, 255, 255, 0.07); border: none; border-radius: 50%;
  color: rgba(255, 255, 255, 0.55); cursor: pointer; display: flex; align-items: center; justify-content: center;
  font-size: 14px; line-height: 1; font-family: inherit; transition: background 0.15s, color 0.15s;
}}
.modal__close:hover {{ background: rgba(255, 255, 255, 0.15); color: #fff; }}
.modal__close:focus-visible {{ outline: 2px solid {ACCENT}; outline-offset: 2px; }}
.modal__body {{ padding: 14px 20px 20px; }}
.modal__desc {{ color: rgba(255, 255, 255, 0.58); font-size: 13px; line-height: 1.6; margin-bottom: 18px; }}
.modal__qr {{
  display: flex; justify-content: center; align-items: center; min-height: 196px; margin-bottom: 16px;
  background: rgba(255, 255, 255, 0.03); border-radius: 8px; padding: 8px;
}}
.modal__qr canvas, .modal__qr img {{ display: block; border-radius: 4px; }}
.qr-msg {{ color: rgba(255, 255, 255, 0.3); font-size: 13px; font-family: inherit; }}
.ln-row {{
  display: flex; align-items: center; gap: 8px; padding: 10px 12px; margin-bottom: 16px;
  background: rgba(247, 147, 26, 0.07); border: 1px solid rgba(247, 147, 26, 0.22); border-radius: 8px;
}}
.ln-address {{
  flex: 1; min-width: 0; color: {ACCENT}; font-size: 12px;
  font-family: 'SF Mono', 'Fira Code', 'Cascadia Code', monospace;
  overflow: hidden; text-overflow: ellipsis; white-space: nowrap;
}}
.ln-address__empty {{ opacity: 0.5; }}
.copy-btn {{
  flex-shrink: 0; background: transparent; border: 1px solid {ACCENT}; color: {ACCENT};
  border-radius: 6px; padding: 4px 10px; font-size: 12px; font-family: inherit; cursor: pointer; line-height: 1.4;
  transition: background 0.15s, color 0.15s, border-color 0.15s;
}}
.copy-btn:hover {{ background: {ACCENT}; color: #000; }}
.copy-btn:focus-visible {{ outline: 2px solid {ACCENT}; outline-offset: 2px; }}
.copy-btn.{copied} {{ background: #22c55e; border-color: #22c55e; color: #000; }}
.modal__sep {{ height: 1px; background: rgba(255, 255, 255, 0.08); margin-bottom: 16px; }}
.portfolio-link {{
  display: inline-flex; align-items: center; gap: 3px;
  color: rgba(255, 255, 255, 0.52); font-size: 13px; text-decoration: none; transition: color 0.15s;
}}
.portfolio-link:hover {{ color: #ffffff; }}
.portfolio-link:focus-visible {{ outline: 2px solid {ACCENT}; outline-offset: 2px; border-radius: 2px; }}
"#,
        open = OPEN_CLASS,
        copied = COPIED_CLASS,
    )
}
