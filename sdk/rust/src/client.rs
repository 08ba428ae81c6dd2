use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

/// Posts notifications to a hub's `/send` endpoints.
pub struct HubClient {
    client: Client,
    hub_url: String,
    auth: Option<(String, String)>,
}

impl HubClient {
    pub fn new(hub_url: &str) -> Self {
        Self {
            client: Client::new(),
            hub_url: hub_url.trim_end_matches('/').to_string(),
            auth: None,
        }
    }

    /// Send `token` in `header` with every request.
    pub fn with_auth(mut self, header: &str, token: &str) -> Self {
        self.auth = Some((header.to_string(), token.to_string()));
        self
    }

    /// Post `body` to `/send`, or to `/send/{slug}` when a slug is given.
    ///
    /// The hub answers with a bare status code, which is returned as is.
    pub async fn send(
        &self,
        slug: Option<&str>,
        body: impl Into<String>,
        content_type: &str,
    ) -> Result<StatusCode, reqwest::Error> {
        let url = match slug {
            Some(slug) => format!("{}/send/{}", self.hub_url, encode_segment(slug)),
            None => format!("{}/send", self.hub_url),
        };

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body.into());
        if let Some((header, token)) = &self.auth {
            request = request.header(header.as_str(), token.as_str());
        }

        Ok(request.send().await?.status())
    }

    /// Send plain text.
    pub async fn send_text(&self, slug: Option<&str>, text: &str) -> Result<StatusCode, reqwest::Error> {
        self.send(slug, text, "text/plain; charset=utf-8").await
    }

    /// Send a JSON document, which the hub renders as a code block.
    pub async fn send_json(&self, slug: Option<&str>, json: &str) -> Result<StatusCode, reqwest::Error> {
        self.send(slug, json, "application/json").await
    }
}

fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
