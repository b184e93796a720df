//! Store detection from a product URL's host.

use url::Url;

/// Known stores and the host suffixes that identify them.
const KNOWN_STORES: &[(&str, &[&str])] = &[
    ("amazon", &["amazon.com", "amazon.com.mx", "amazon.es", "amazon.co.uk"]),
    (
        "mercadolibre",
        &[
            "mercadolibre.com.mx",
            "mercadolibre.com",
            "mercadolibre.com.ar",
            "mercadolibre.cl",
        ],
    ),
    ("ebay", &["ebay.com", "ebay.com.mx", "ebay.es"]),
    ("walmart", &["walmart.com", "walmart.com.mx"]),
    ("bestbuy", &["bestbuy.com", "bestbuy.com.mx"]),
    ("aliexpress", &["aliexpress.com"]),
    ("liverpool", &["liverpool.com.mx"]),
    ("claroshop", &["claroshop.com"]),
    ("coppel", &["coppel.com"]),
    ("elektra", &["elektra.com.mx"]),
    ("sears", &["sears.com.mx"]),
    ("costco", &["costco.com.mx", "costco.com"]),
    ("homedepot", &["homedepot.com.mx", "homedepot.com"]),
];

/// Returns a short store name for the URL's host.
///
/// Known retailers map to a fixed name. Anything else falls back to the
/// first label of the host with a leading `www.` removed.
#[must_use]
pub fn detect_store(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();

    for (store, domains) in KNOWN_STORES {
        if domains.iter().any(|domain| host_matches(&host, domain)) {
            return Some((*store).to_string());
        }
    }

    host.trim_start_matches("www.")
        .split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
