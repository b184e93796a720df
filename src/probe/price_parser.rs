//! Price extraction from raw HTML text.
//!
//! Store-specific class/id markers are tried first, then a few generic
//! textual patterns. Numbers are normalized by [`clean_price`].

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Class or id tokens that carry the price on known store pages, in
/// priority order.
const STORE_MARKERS: &[(&str, &[&str])] = &[
    (
        "amazon",
        &[
            "a-price-whole",
            "priceblock_ourprice",
            "priceblock_dealprice",
            "a-offscreen",
        ],
    ),
    (
        "mercadolibre",
        &[
            "andes-money-amount__fraction",
            "price-tag-fraction",
            "ui-pdp-price__second-line__main-price",
            "price-tag-amount",
            "ui-pdp-price__part",
        ],
    ),
    ("ebay", &["x-price-primary", "prcIsum"]),
];

/// Digits with embedded `,` or `.`, starting and ending on a digit.
const NUMBER: &str = r"([0-9](?:[0-9.,]*[0-9])?)";

static PATTERNS: LazyLock<Option<Patterns>> = LazyLock::new(Patterns::compile);

/// Compiled expressions, built once per process.
struct Patterns {
    invisible: Regex,
    tag: Regex,
    currency_prefixed: Regex,
    currency_suffixed: Regex,
    labelled: Regex,
    non_numeric: Regex,
    markers: Vec<(&'static str, Vec<Regex>)>,
}

impl Patterns {
    fn compile() -> Option<Self> {
        let markers = STORE_MARKERS
            .iter()
            .map(|(store, markers)| {
                let compiled = markers
                    .iter()
                    .copied()
                    .map(marker_pattern)
                    .collect::<Option<Vec<_>>>()?;
                Some((*store, compiled))
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            invisible: Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").ok()?,
            tag: Regex::new(r"<[^>]*>").ok()?,
            currency_prefixed: Regex::new(&format!(r"\$\s*{NUMBER}")).ok()?,
            currency_suffixed: Regex::new(&format!(r"{NUMBER}\s*€")).ok()?,
            labelled: Regex::new(&format!(r"(?i)\b(?:precio|price)\b[:\s]\s*\$?\s*{NUMBER}"))
                .ok()?,
            non_numeric: Regex::new(r"[^0-9.,]").ok()?,
            markers,
        })
    }

    fn store_markers(&self, store: &str) -> &[Regex] {
        self.markers
            .iter()
            .find(|(name, _)| *name == store)
            .map(|(_, markers)| markers.as_slice())
            .unwrap_or_default()
    }

    /// Text of the first element whose `class` or `id` holds `marker` as a
    /// whole token, up to its first closing tag.
    fn marked_text(&self, html: &str, marker: &Regex) -> Option<String> {
        marker.captures_iter(html).find_map(|caps| {
            let inner = caps.get(1)?.as_str();
            let text = self.tag.replace_all(inner, "");
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
    }

    /// Document text with tags, scripts and styles removed.
    fn visible_text(&self, html: &str) -> String {
        let without_code = self.invisible.replace_all(html, " ");
        self.tag.replace_all(&without_code, " ").into_owned()
    }
}

/// Opening tag carrying `marker` in its `class` or `id`, followed by the
/// element text (nested opening tags included) up to the first `</`.
fn marker_pattern(marker: &str) -> Option<Regex> {
    let marker = regex::escape(marker);
    Regex::new(&format!(
        r#"(?i)<[a-z][^>]*?\b(?:class|id)\s*=\s*["'](?:[^"']*\s)?{marker}(?:\s[^"']*)?["'][^>]*>((?:[^<]|<[^/])*)"#
    ))
    .ok()
}

fn first_number(pattern: &Regex, text: &str) -> Option<Decimal> {
    pattern
        .captures_iter(text)
        .find_map(|caps| caps.get(1).and_then(|m| clean_price(m.as_str())))
}

/// Extracts the first positive price from an HTML document.
///
/// `store` selects the marker set; unknown stores go straight to the generic
/// patterns.
#[must_use]
pub fn extract_price(html: &str, store: Option<&str>) -> Option<Decimal> {
    let patterns = PATTERNS.as_ref()?;

    if let Some(store) = store {
        let marked = patterns
            .store_markers(store)
            .iter()
            .find_map(|marker| patterns.marked_text(html, marker).and_then(|t| clean_price(&t)));
        if marked.is_some() {
            return marked;
        }
    }

    let text = patterns.visible_text(html);
    first_number(&patterns.currency_prefixed, &text)
        .or_else(|| first_number(&patterns.currency_suffixed, &text))
        .or_else(|| first_number(&patterns.labelled, &text))
}

/// Normalizes a human-formatted number into a decimal.
///
/// Everything except digits, `,` and `.` is dropped. With both separators
/// present the last one is the decimal point. A lone `,` is the decimal
/// point only when followed by one or two digits. Returns `None` for
/// anything that is not strictly positive.
#[must_use]
pub fn clean_price(raw: &str) -> Option<Decimal> {
    let patterns = PATTERNS.as_ref()?;
    let kept = patterns.non_numeric.replace_all(raw, "");

    let last_comma = kept.rfind(',');
    let last_dot = kept.rfind('.');
    let decimal_at = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => Some(comma.max(dot)),
        (Some(comma), None) => {
            let fraction = kept.len().saturating_sub(comma).saturating_sub(1);
            (1..=2).contains(&fraction).then_some(comma)
        }
        (None, Some(dot)) => (kept.matches('.').count() == 1).then_some(dot),
        (None, None) => None,
    };

    let (whole, fraction) = match decimal_at {
        Some(at) => (kept.get(..at)?, kept.get(at.saturating_add(1)..)?),
        None => (&*kept, ""),
    };
    let whole: String = whole.chars().filter(char::is_ascii_digit).collect();
    let fraction: String = fraction.chars().filter(char::is_ascii_digit).collect();

    let normalized = match (whole.is_empty(), fraction.is_empty()) {
        (true, true) => return None,
        (_, true) => whole,
        (true, false) => format!("0.{fraction}"),
        (false, false) => format!("{whole}.{fraction}"),
    };
    Decimal::from_str(&normalized)
        .ok()
        .filter(|price| *price > Decimal::ZERO)
}
