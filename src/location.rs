//! Query-string location mirrored with the language preference.
//!
//! The app is launched with an optional location such as `?lang=fr&ref=x`.
//! Changing the language rewrites the `lang` parameter in place; every other
//! parameter keeps its value and position.

use std::fmt;
use url::form_urlencoded;

/// Name of the language parameter
pub const LANG_PARAM: &str = "lang";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    params: Vec<(String, String)>,
}

impl Location {
    /// Parse a location. Accepts `?a=1&b=2`, `a=1&b=2`, or a full URL whose
    /// query follows the first `?`. A `#fragment` is dropped.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let query = match input.find('?') {
            Some(idx) => &input[idx + 1..],
            None if input.contains('=') => input,
            None => "",
        };
        let query = query.split('#').next().unwrap_or("");

        let params = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { params }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first occurrence of `name`, or append it
    pub fn set(&mut self, name: &str, value: &str) {
        match self.params.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.params.push((name.to_string(), value.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// `?a=1&b=2`, or an empty string when there are no parameters
    pub fn to_query_string(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.params {
            serializer.append_pair(k, v);
        }
        format!("?{}", serializer.finish())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(Location::parse("?lang=fr").get(LANG_PARAM), Some("fr"));
        assert_eq!(Location::parse("lang=de&x=1").get("x"), Some("1"));
        assert_eq!(
            Location::parse("https://tools.example/?ref=mail&lang=es#top").get(LANG_PARAM),
            Some("es")
        );
        assert!(Location::parse("").is_empty());
        assert!(Location::parse("?").is_empty());
    }

    #[test]
    fn test_set_preserves_other_params_and_order() {
        let mut loc = Location::parse("?ref=mail&lang=en&utm=a");
        loc.set(LANG_PARAM, "ar");
        assert_eq!(loc.to_query_string(), "?ref=mail&lang=ar&utm=a");

        let mut empty = Location::default();
        empty.set(LANG_PARAM, "ja");
        assert_eq!(empty.to_string(), "?lang=ja");
    }

    #[test]
    fn test_percent_coding() {
        let loc = Location::parse("?q=hello+world&p=a%26b");
        assert_eq!(loc.get("q"), Some("hello world"));
        assert_eq!(loc.get("p"), Some("a&b"));
        assert_eq!(loc.to_query_string(), "?q=hello+world&p=a%26b");
    }

    #[test]
    fn test_malformed_escapes_stay_literal() {
        let loc = Location::parse("?q=%+1&r=%-f&s=%zz");
        assert_eq!(loc.get("q"), Some("% 1"));
        assert_eq!(loc.get("r"), Some("%-f"));
        assert_eq!(loc.get("s"), Some("%zz"));
    }

    #[test]
    fn test_flag_without_value() {
        let loc = Location::parse("?debug&lang=nl");
        assert_eq!(loc.get("debug"), Some(""));
        assert_eq!(loc.get(LANG_PARAM), Some("nl"));
    }
}
