//! REST implementation of [`BoardSource`].
//!
//! Auth is the service's key/token query-parameter scheme. Write calls
//! address remote ids (custom field, dropdown option, label), which are
//! cached from the most recent fetch.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, Response};
use serde_json::json;
use url::Url;

use deskboard_domain::{BoardSnapshot, CardPosition, FieldName};

use crate::error::{RemoteError, RemoteResult};
use crate::normalize::{normalize_board, FieldDirectory};
use crate::traits::BoardSource;
use crate::wire::WireBoard;

pub struct RestBoardSource {
    http: Client,
    base: Url,
    board_id: String,
    key: String,
    token: String,
    directory: Mutex<FieldDirectory>,
}

impl RestBoardSource {
    pub fn new(
        base: &str,
        board_id: impl Into<String>,
        key: impl Into<String>,
        token: impl Into<String>,
    ) -> RemoteResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("deskboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base: Url::parse(base)?,
            board_id: board_id.into(),
            key: key.into(),
            token: token.into(),
            directory: Mutex::new(FieldDirectory::default()),
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> RemoteResult<Url> {
        let mut url = self.base.join(path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("key", &self.key);
            query.append_pair("token", &self.token);
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn check(response: Response) -> RemoteResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn put(&self, url: Url) -> RemoteResult<()> {
        Self::check(self.http.put(url).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl BoardSource for RestBoardSource {
    async fn fetch_snapshot(&self) -> RemoteResult<BoardSnapshot> {
        let url = self.url(
            &format!("/1/boards/{}", self.board_id),
            &[
                ("fields", "name"),
                ("lists", "open"),
                ("cards", "open"),
                ("card_customFieldItems", "true"),
                ("customFields", "true"),
                ("members", "all"),
                ("member_fields", "fullName"),
                ("labels", "all"),
            ],
        )?;

        let response = Self::check(self.http.get(url).send().await?).await?;
        let board: WireBoard = response.json().await?;
        let (snapshot, directory) = normalize_board(board);
        *self.directory.lock() = directory;
        Ok(snapshot)
    }

    async fn move_card(
        &self,
        card_id: &str,
        target_bucket: &str,
        position: CardPosition,
    ) -> RemoteResult<()> {
        let pos = position.to_param();
        let url = self.url(
            &format!("/1/cards/{}", card_id),
            &[("idList", target_bucket), ("pos", pos.as_str())],
        )?;
        self.put(url).await
    }

    async fn set_custom_field(
        &self,
        card_id: &str,
        field: FieldName,
        value: &str,
    ) -> RemoteResult<()> {
        let (field_id, option_id) = {
            let directory = self.directory.lock();
            let field_id = directory
                .field_id(field)
                .ok_or_else(|| RemoteError::Unknown(format!("custom field {}", field)))?
                .to_string();
            let option_id = directory.option_id(field, value).map(str::to_string);
            (field_id, option_id)
        };

        let body = if value.is_empty() {
            // Clearing works the same for dropdown and free-form fields
            json!({ "value": "" })
        } else if let Some(option_id) = option_id {
            json!({ "idValue": option_id })
        } else {
            json!({ "value": { "text": value } })
        };

        let url = self.url(
            &format!("/1/cards/{}/customField/{}/item", card_id, field_id),
            &[],
        )?;
        Self::check(self.http.put(url).json(&body).send().await?).await?;
        Ok(())
    }

    async fn set_description(&self, card_id: &str, text: &str) -> RemoteResult<()> {
        let url = self.url(&format!("/1/cards/{}", card_id), &[("desc", text)])?;
        self.put(url).await
    }

    async fn add_label(&self, card_id: &str, name: &str) -> RemoteResult<()> {
        let label_id = self.directory.lock().label_id(name).map(str::to_string);
        match label_id {
            Some(id) => {
                let url = self.url(
                    &format!("/1/cards/{}/idLabels", card_id),
                    &[("value", id.as_str())],
                )?;
                Self::check(self.http.post(url).send().await?).await?;
            }
            None => {
                // Unknown on the board yet: create it on the card
                let url = self.url(
                    &format!("/1/cards/{}/labels", card_id),
                    &[("name", name), ("color", "null")],
                )?;
                Self::check(self.http.post(url).send().await?).await?;
            }
        }
        Ok(())
    }

    async fn remove_label(&self, card_id: &str, name: &str) -> RemoteResult<()> {
        let label_id = self.directory.lock().label_id(name).map(str::to_string);
        let Some(id) = label_id else {
            // Nothing to detach; the server never knew this label
            tracing::debug!(card = card_id, label = name, "remove for unknown label");
            return Ok(());
        };
        let url = self.url(&format!("/1/cards/{}/idLabels/{}", card_id, id), &[])?;
        Self::check(self.http.delete(url).send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> RestBoardSource {
        RestBoardSource::new("https://api.example.com", "board1", "k", "t").unwrap()
    }

    #[test]
    fn test_url_carries_auth() {
        let url = source().url("/1/cards/c1", &[("desc", "hello")]).unwrap();
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        assert!(query.contains(&("key".to_string(), "k".to_string())));
        assert!(query.contains(&("token".to_string(), "t".to_string())));
        assert!(query.contains(&("desc".to_string(), "hello".to_string())));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        assert!(RestBoardSource::new("not a url", "b", "k", "t").is_err());
    }
}
