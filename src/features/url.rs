//! Static URL feature extraction
//!
//! Maps a raw URL string to the full feature vector without touching the
//! network. Extraction never fails: when the URL does not parse, every
//! hostname/path/port-derived feature keeps its zero default and the
//! whole-string features are still computed.
//!
//! Character and substring counts run over the entire raw string, not per
//! URL part. That matches the data the classifier was trained on, so it is
//! part of the input contract and must not be "improved" in isolation.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::vector::FeatureVector;

/// Known URL-shortening domains.
const SHORTENING_SERVICES: &[&str] = &["bit.ly", "tinyurl"];

/// Keywords that frequently show up in credential-phishing URLs.
const PHISH_HINTS: &[&str] = &["login", "verify", "secure"];

static IP_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\d+\.\d+\.\d+\.\d+").expect("valid regex"));
static TLD_IN_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(com|net|org|info|biz)").expect("valid regex"));
static TLD_IN_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(com|net|org)").expect("valid regex"));
static PATH_EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(php|html|js)$").expect("valid regex"));
static WORD_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid regex"));

/// Extract the full feature vector from a raw URL string.
///
/// Pure and deterministic; identical input always yields an identical
/// vector.
pub fn extract(url: &str) -> FeatureVector {
    let mut v = FeatureVector::new();

    // Defensive parse. A failure is local: host/path/port features stay 0.
    let parsed = Url::parse(url).ok();
    let hostname = parsed
        .as_ref()
        .and_then(|u| u.host_str())
        .unwrap_or("")
        .to_string();
    let path = parsed.as_ref().map(|u| u.path()).unwrap_or("").to_string();
    let port = parsed.as_ref().and_then(|u| u.port()).unwrap_or(0);

    let url_len = url.chars().count();
    let host_len = hostname.chars().count();
    let path_len = path.chars().count();

    v.set_by_name("length_url", url_len as f64);
    v.set_by_name("length_hostname", host_len as f64);
    v.set_by_name("ip", bool_flag(IP_HOST_RE.is_match(url)));

    // Character frequencies over the whole raw string.
    v.set_by_name("nb_dots", count_char(url, '.'));
    v.set_by_name("nb_hyphens", count_char(url, '-'));
    v.set_by_name("nb_at", count_char(url, '@'));
    v.set_by_name("nb_qm", count_char(url, '?'));
    v.set_by_name("nb_and", count_char(url, '&'));
    v.set_by_name("nb_or", 0.0);
    v.set_by_name("nb_eq", count_char(url, '='));
    v.set_by_name("nb_underscore", count_char(url, '_'));
    v.set_by_name("nb_tilde", count_char(url, '~'));
    v.set_by_name("nb_percent", count_char(url, '%'));
    v.set_by_name("nb_slash", count_char(url, '/'));
    v.set_by_name("nb_star", count_char(url, '*'));
    v.set_by_name("nb_colon", count_char(url, ':'));
    v.set_by_name("nb_comma", count_char(url, ','));
    v.set_by_name("nb_semicolumn", count_char(url, ';'));
    v.set_by_name("nb_dollar", count_char(url, '$'));
    v.set_by_name("nb_space", count_char(url, ' '));

    // Substring flags, also over the whole raw string. "http" inside a path
    // or query is exactly the trick these are meant to catch.
    v.set_by_name("nb_www", bool_flag(url.contains("www.")));
    v.set_by_name("nb_com", bool_flag(url.contains(".com")));
    v.set_by_name("nb_dslash", bool_flag(url.contains("//")));
    v.set_by_name("http_in_path", bool_flag(url.contains("http")));
    v.set_by_name("https_token", bool_flag(url.contains("https")));

    let digits = url.chars().filter(|c| c.is_ascii_digit()).count();
    v.set_by_name(
        "ratio_digits_url",
        if url_len > 0 {
            digits as f64 / url_len as f64
        } else {
            0.0
        },
    );
    // Numerator is the whole-URL digit count, not a host-local one.
    v.set_by_name(
        "ratio_digits_host",
        if host_len > 0 {
            digits as f64 / host_len as f64
        } else {
            0.0
        },
    );

    v.set_by_name("punycode", bool_flag(url.contains("xn--")));
    v.set_by_name("port", port as f64);
    v.set_by_name("tld_in_path", bool_flag(TLD_IN_PATH_RE.is_match(&path)));
    v.set_by_name(
        "tld_in_subdomain",
        bool_flag(TLD_IN_HOST_RE.is_match(&hostname)),
    );
    v.set_by_name(
        "nb_subdomains",
        if host_len > 0 {
            count_char(&hostname, '.') - 1.0
        } else {
            0.0
        },
    );
    v.set_by_name("prefix_suffix", bool_flag(hostname.contains('-')));
    v.set_by_name(
        "shortening_service",
        bool_flag(SHORTENING_SERVICES.iter().any(|s| url.contains(s))),
    );
    v.set_by_name(
        "path_extension",
        bool_flag(PATH_EXTENSION_RE.is_match(&path)),
    );
    // Non-overlapping "//" occurrences minus one; -1 for strings without
    // any double slash.
    v.set_by_name("nb_redirection", url.matches("//").count() as f64 - 1.0);

    v.set_by_name("length_words_raw", url.split_whitespace().count() as f64);
    v.set_by_name("char_repeat", longest_char_run(url) as f64);

    // Tokenization over the whole string. Minimum/maximum skip empty
    // tokens; the average deliberately keeps them in the denominator.
    let words: Vec<&str> = WORD_SPLIT_RE.split(url).collect();
    let word_lens: Vec<usize> = words
        .iter()
        .filter(|w| !w.is_empty())
        .map(|w| w.chars().count())
        .collect();
    v.set_by_name(
        "shortest_words_raw",
        word_lens.iter().min().copied().unwrap_or(0) as f64,
    );
    v.set_by_name(
        "longest_words_raw",
        word_lens.iter().max().copied().unwrap_or(0) as f64,
    );
    v.set_by_name(
        "avg_words_raw",
        if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64
        },
    );

    // Host/path "word" statistics degenerate to the component length.
    v.set_by_name("shortest_word_host", host_len as f64);
    v.set_by_name("longest_word_host", host_len as f64);
    v.set_by_name("avg_word_host", host_len as f64);
    v.set_by_name("shortest_word_path", path_len as f64);
    v.set_by_name("longest_word_path", path_len as f64);
    v.set_by_name("avg_word_path", path_len as f64);

    v.set_by_name(
        "phish_hints",
        bool_flag(PHISH_HINTS.iter().any(|h| url.contains(h))),
    );
    v.set_by_name("login_form", bool_flag(url.contains("login")));

    // Everything below needs page content, WHOIS or reputation feeds, which
    // this extractor does not consult. The columns hold constants so the
    // vector stays fixed-width; the content probe may overwrite a few of
    // them when live fetching is enabled.
    v.set_by_name("google_index", 1.0);

    v
}

fn bool_flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

fn count_char(s: &str, c: char) -> f64 {
    s.matches(c).count() as f64
}

/// Length of the longest run of a single repeated character.
fn longest_char_run(s: &str) -> usize {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if prev == Some(c) {
            run += 1;
        } else {
            run = 1;
            prev = Some(c);
        }
        best = best.max(run);
    }

    best
}
