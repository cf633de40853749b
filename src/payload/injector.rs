use crate::payload::group::ParamSet;
use url::Url;

/// Append `params` to the URL's query string, after any pairs already there.
///
/// An empty set leaves the URL untouched.
pub fn inject_query_params(base: &Url, params: &ParamSet) -> Url {
    let mut url = base.clone();
    if params.is_empty() {
        return url;
    }

    url.query_pairs_mut().extend_pairs(params.iter());
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_after_existing_query() {
        let base = Url::parse("https://example.com/search?q=1").unwrap();
        let mut params = ParamSet::new();
        params.insert("debug", "700000");
        params.insert("id", "700001");

        let url = inject_query_params(&base, &params);
        assert_eq!(url.as_str(), "https://example.com/search?q=1&debug=700000&id=700001");
    }

    #[test]
    fn test_empty_set_is_noop() {
        let base = Url::parse("https://example.com/").unwrap();
        assert_eq!(inject_query_params(&base, &ParamSet::new()), base);
    }

    #[test]
    fn test_values_are_encoded() {
        let base = Url::parse("https://example.com/").unwrap();
        let url = inject_query_params(&base, &ParamSet::single("a b", "x&y"));
        assert_eq!(url.query(), Some("a+b=x%26y"));
    }
}
