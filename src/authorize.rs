use std::fmt::Debug;

use reqwest::RequestBuilder;

/// Bearer credential for one external service.
///
/// Tokens are issued and refreshed outside this process; a run uses whatever
/// token the config handed it.
#[derive(Clone)]
pub struct Access {
    service: &'static str,
    access_token: String,
}

impl Access {
    pub fn new(service: &'static str, access_token: impl Into<String>) -> Self {
        Access {
            service,
            access_token: access_token.into(),
        }
    }

    pub fn authorize(&self, request_builder: RequestBuilder) -> RequestBuilder {
        request_builder.bearer_auth(self.access_token.as_str())
    }
}

impl Debug for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Access")
            .field("service", &self.service)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
