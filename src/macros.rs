//! Selectors and patterns in the parsers are string literals, so they are
//! compiled on first use and kept in a static for the rest of the process.

/// `&'static scraper::Selector` for a CSS selector literal.
#[macro_export]
macro_rules! selector {
    ($css: literal) => {{
        static SELECTOR: ::once_cell::sync::Lazy<::scraper::Selector> =
            ::once_cell::sync::Lazy::new(|| {
                ::scraper::Selector::parse($css).expect(concat!("invalid selector: ", $css))
            });
        &*SELECTOR
    }};
}

/// `&'static regex::Regex` for a pattern literal.
#[macro_export]
macro_rules! regex {
    ($pattern: literal) => {{
        static PATTERN: ::once_cell::sync::Lazy<::regex::Regex> =
            ::once_cell::sync::Lazy::new(|| {
                ::regex::Regex::new($pattern).expect(concat!("invalid pattern: ", $pattern))
            });
        &*PATTERN
    }};
}
