// Async HTTP client for the listings REST API.
//
// Base path: /api/
// Resources: houses (CRUD), discover (metadata lookup by listing link)

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::types::{DiscoveryDto, HouseDto, InsertedDto, NewHouseDto, UpdateHouseDto};
use crate::{Error, HttpSettings};

/// Largest slice of an error body kept in [`Error::Status`].
const ERROR_BODY_PREVIEW: usize = 200;

/// At most [`ERROR_BODY_PREVIEW`] bytes of `body`, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut cut = body.len().min(ERROR_BODY_PREVIEW);
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    &body[..cut]
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the listings API.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its pool.
#[derive(Debug, Clone)]
pub struct HouseClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HouseClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` with a fresh transport.
    pub fn new(base_url: &str, transport: &HttpSettings) -> Result<Self, Error> {
        let http = transport.client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// `api/houses/{id}` with the id pushed as a single escaped segment.
    fn house_url(&self, id: &str) -> Result<Url, Error> {
        let mut url = self.url("api/houses")?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url.clone()).send().await?;
        Self::handle_response(&url, resp).await
    }

    async fn post_text<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<String, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url.clone()).json(body).send().await?;
        Self::handle_text(&url, resp).await
    }

    async fn patch<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<(), Error> {
        debug!("PATCH {url}");
        let resp = self.http.patch(url.clone()).json(body).send().await?;
        Self::handle_text(&url, resp).await.map(|_| ())
    }

    async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self.http.delete(url.clone()).send().await?;
        Self::handle_text(&url, resp).await.map(|_| ())
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        url: &Url,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let body = Self::handle_text(url, resp).await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }

    /// Check the status and return the raw body text.
    async fn handle_text(url: &Url, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                url: url.to_string(),
            });
        }
        let body = resp.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            let kept = preview(&body);
            Err(Error::Status {
                status: status.as_u16(),
                body: if kept.is_empty() {
                    status.to_string()
                } else {
                    kept.to_owned()
                },
            })
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Houses ───────────────────────────────────────────────────────

    /// `GET /api/houses`
    pub async fn list_houses(&self) -> Result<Vec<HouseDto>, Error> {
        self.get(self.url("api/houses")?).await
    }

    /// `GET /api/houses/{id}`
    pub async fn get_house(&self, id: &str) -> Result<HouseDto, Error> {
        self.get(self.house_url(id)?).await
    }

    /// `POST /api/houses`
    ///
    /// Returns the new id when the server echoes one back. A success
    /// status with an empty or unexpected body still counts as created.
    pub async fn create_house(&self, body: &NewHouseDto) -> Result<Option<String>, Error> {
        let text = self.post_text(self.url("api/houses")?, body).await?;
        let inserted = serde_json::from_str::<InsertedDto>(&text).ok();
        Ok(inserted.map(|dto| dto.id))
    }

    /// `PATCH /api/houses/{id}`
    pub async fn update_house(&self, id: &str, body: &UpdateHouseDto) -> Result<(), Error> {
        self.patch(self.house_url(id)?, body).await
    }

    /// `DELETE /api/houses/{id}`
    pub async fn delete_house(&self, id: &str) -> Result<(), Error> {
        self.delete(self.house_url(id)?).await
    }

    // ── Discovery ────────────────────────────────────────────────────

    /// `GET /api/discover?url={link}`
    ///
    /// A 404 means no metadata is known for the link and surfaces as
    /// [`Error::NotFound`].
    pub async fn discover(&self, link: &str) -> Result<DiscoveryDto, Error> {
        let mut url = self.url("api/discover")?;
        url.query_pairs_mut().append_pair("url", link);
        self.get(url).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = HouseClient::with_client("http://localhost:3000/prefix", reqwest::Client::new())
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3000/prefix/");
        assert_eq!(
            client.url("api/houses").unwrap().as_str(),
            "http://localhost:3000/prefix/api/houses"
        );
    }

    #[test]
    fn preview_never_splits_a_character() {
        let body = format!("{}€ tail", "a".repeat(ERROR_BODY_PREVIEW - 1));
        assert_eq!(preview(&body).len(), ERROR_BODY_PREVIEW - 1);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn house_id_is_escaped_as_one_segment() {
        let client =
            HouseClient::with_client("http://localhost:3000", reqwest::Client::new()).unwrap();
        assert_eq!(
            client.house_url("a/b").unwrap().as_str(),
            "http://localhost:3000/api/houses/a%2Fb"
        );
    }
}
