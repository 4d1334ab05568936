use wiremock::{Match, Request};

pub struct MissingQuery<'a>(&'a str);

impl<'a> MissingQuery<'a> {
    pub fn new(query: &'a str) -> Self {
        Self(query)
    }
}

impl Match for MissingQuery<'_> {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(k, _)| k == self.0)
    }
}

pub struct MissingHeader(&'static str);

impl MissingHeader {
    pub fn new(name: &'static str) -> Self {
        Self(name)
    }
}

impl Match for MissingHeader {
    fn matches(&self, request: &Request) -> bool {
        !request
            .headers
            .keys()
            .any(|k| k.as_str().eq_ignore_ascii_case(self.0))
    }
}
