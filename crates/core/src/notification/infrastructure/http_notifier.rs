use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::classification::domain::emotion::Emotion;
use crate::notification::domain::emotion_notifier::EmotionNotifier;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
}

#[derive(Serialize)]
struct CategoryPayload<'a> {
    category: &'a str,
}

/// Posts `{"category": "<emotion>"}` to a backend endpoint.
pub struct HttpNotifier {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpNotifier {
    /// `timeout` of `None` keeps the reqwest blocking client's default.
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<Self, NotifyError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(NotifyError::Client)?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Sends one report; any non-2xx status is an error.
    ///
    /// Once the backend answered 2xx the report counts as delivered, even
    /// if the acknowledgement body cannot be read.
    pub fn post(&self, emotion: Emotion) -> Result<String, NotifyError> {
        let request_err = |source| NotifyError::Request {
            url: self.url.clone(),
            source,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&CategoryPayload {
                category: emotion.as_str(),
            })
            .send()
            .map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        match response.text() {
            Ok(body) => Ok(body),
            Err(e) => {
                log::warn!("{} accepted the report but its reply was unreadable: {e}", self.url);
                Ok(String::new())
            }
        }
    }
}

impl EmotionNotifier for HttpNotifier {
    fn notify(&self, emotion: Emotion) -> Result<String, Box<dyn std::error::Error>> {
        Ok(self.post(emotion)?)
    }
}
