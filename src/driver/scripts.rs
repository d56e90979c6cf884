// src/driver/scripts.rs

//! Extraction scripts generated from a site profile.
//!
//! Scripts only read the DOM. Filtering by host, excluded tokens,
//! de-duplication and capping happen in Rust so they behave the same
//! whichever driver answers.

use crate::driver::{Script, ScriptKind};
use crate::error::Result;
use crate::models::{CurrentColorSource, SiteProfile, SwatchSource};

/// Reads `src`, then lazy-load attributes, of an `img` bound to `img`.
const IMG_SRC: &str =
    "img.src || img.getAttribute('data-src') || (img.getAttribute('srcset') || '').split(' ')[0]";

/// Every script one profile needs, built once per crawl.
#[derive(Debug, Clone)]
pub struct PageScripts {
    pub scroll_to_bottom: Script,
    pub product_links: Script,
    pub has_next_page: Script,
    pub product_name: Script,
    pub price: Script,
    pub color_swatches: Script,
    pub current_color: Script,
    pub gallery_images: Script,
    pub page_images: Script,
    pub description: Script,
}

impl PageScripts {
    pub fn for_site(profile: &SiteProfile) -> Result<Self> {
        let product_links = format!(
            "(() => {{
                const links = Array.from(document.querySelectorAll({selector}));
                const urls = links.map(a => (a.href || '').split('?')[0]).filter(h => h);
                return [...new Set(urls)];
            }})()",
            selector = js(&profile.product_link_selector)?,
        );

        let has_next_page = match &profile.next_page_selector {
            Some(selector) => format!(
                "(() => document.querySelector({}) !== null)()",
                js(selector)?
            ),
            None => "(() => false)()".to_string(),
        };

        let product_name = format!(
            "(() => {{
                for (const selector of {selectors}) {{
                    const text = document.querySelector(selector)?.textContent.trim();
                    if (text) return text;
                }}
                return null;
            }})()",
            selectors = serde_json::to_string(&profile.title_selectors)?,
        );

        let price = format!(
            "(() => document.querySelector({})?.textContent.trim() || null)()",
            js(&profile.price_selector)?
        );

        let (color_swatches, swatch_prefix) = match &profile.swatches {
            SwatchSource::AltPrefix { prefix } => (
                format!(
                    "(() => Array.from(document.querySelectorAll({selector}))
                        .map(img => img.getAttribute('alt').slice({len}).trim())
                        .filter(name => name))()",
                    selector = js(&format!("img[alt^={}]", css(prefix)))?,
                    len = prefix.encode_utf16().count(),
                ),
                Some(prefix.as_str()),
            ),
            SwatchSource::InputName { name } => (
                format!(
                    "(() => Array.from(document.querySelectorAll({selector}))
                        .map(input => input.value)
                        .filter(value => value))()",
                    selector = js(&format!("input[name={}]", css(name)))?,
                ),
                None,
            ),
        };

        let current_color = match &profile.current_color {
            CurrentColorSource::QueryParam { name } => format!(
                "(() => new URLSearchParams(window.location.search).get({}))()",
                js(name)?
            ),
            CurrentColorSource::Element { selector } => format!(
                "(() => document.querySelector({})?.textContent.trim() || null)()",
                js(selector)?
            ),
        };

        // Swatch thumbnails often sit inside the gallery strip.
        let gallery_images = format!(
            "(() => {{
                const prefix = {prefix};
                const srcs = [];
                document.querySelectorAll({selector}).forEach(img => {{
                    const alt = img.getAttribute('alt') || '';
                    if (prefix && alt.startsWith(prefix)) return;
                    const src = {IMG_SRC};
                    if (src) srcs.push(src);
                }});
                return srcs;
            }})()",
            prefix = serde_json::to_string(&swatch_prefix)?,
            selector = js(&profile.gallery_selector)?,
        );

        let page_images = format!(
            "(() => {{
                const chrome = {chrome};
                const srcs = [];
                document.querySelectorAll({selector}).forEach(img => {{
                    if (img.closest(chrome)) return;
                    const src = {IMG_SRC};
                    if (src) srcs.push(src);
                }});
                return srcs;
            }})()",
            chrome = js(&profile.chrome_selector)?,
            selector = js(&profile.page_image_selector)?,
        );

        let description = format!(
            "(() => {{
                const sections = [];
                for (const block of {blocks}) {{
                    const elements = block.first_only
                        ? [document.querySelector(block.selector)].filter(el => el)
                        : Array.from(document.querySelectorAll(block.selector));
                    for (const el of elements) {{
                        const pieces = block.split_lines
                            ? el.textContent.split('\\n').map(line => line.trim())
                            : [el.textContent.trim()];
                        for (const piece of pieces) {{
                            if (!piece || piece.length <= block.min_len) continue;
                            if (block.max_len != null && piece.length >= block.max_len) continue;
                            sections.push(piece);
                        }}
                    }}
                }}
                return [...new Set(sections)].join('\\n\\n');
            }})()",
            blocks = serde_json::to_string(&profile.description)?,
        );

        Ok(Self {
            scroll_to_bottom: Script::new(
                ScriptKind::ScrollToBottom,
                "(() => { window.scrollTo(0, document.body.scrollHeight); return true; })()",
            ),
            product_links: Script::new(ScriptKind::ProductLinks, product_links),
            has_next_page: Script::new(ScriptKind::HasNextPage, has_next_page),
            product_name: Script::new(ScriptKind::ProductName, product_name),
            price: Script::new(ScriptKind::Price, price),
            color_swatches: Script::new(ScriptKind::ColorSwatches, color_swatches),
            current_color: Script::new(ScriptKind::CurrentColor, current_color),
            gallery_images: Script::new(ScriptKind::GalleryImages, gallery_images),
            page_images: Script::new(ScriptKind::PageImages, page_images),
            description: Script::new(ScriptKind::Description, description),
        })
    }
}

/// CSS selector of the control that switches the page to `color`.
pub fn swatch_selector(profile: &SiteProfile, color: &str) -> String {
    match &profile.swatches {
        SwatchSource::AltPrefix { prefix } => {
            format!("img[alt={}]", css(&format!("{prefix}{color}")))
        }
        SwatchSource::InputName { name } => {
            format!("input[name={}][value={}]", css(name), css(color))
        }
    }
}

/// JavaScript string literal.
fn js(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Double-quoted CSS attribute value.
fn css(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
