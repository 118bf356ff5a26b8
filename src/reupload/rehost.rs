//! Audio extraction followed by a rehost on a public file host.
//!
//! The dashboard only imports from hosts it understands, so for anything else
//! the audio is pulled through an extraction service, uploaded to the file
//! host, and the resulting public link is submitted instead.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT, multipart};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{Instrument, debug, info, info_span, warn};
use url::Url;
use uuid::Uuid;

use crate::{
    entities::Outcome,
    fetcher::{FetchError, PageResponse, download_to_file, fetch, send_page},
    reupload::{
        DirectReupload, PipelineChoice, RehostStage, ReuploadError, ReuploadPipeline,
    },
    scrape::{extract_share_link, extract_upload_target},
    session::Session,
};

const UPLOAD_FIELD: &str = "file";
const AUDIO_MIME: &str = "audio/mpeg";

/// Where the rehost machine talks to.
#[derive(Debug, Clone)]
pub struct RehostSettings {
    pub extractor_url: Url,
    pub extractor_version: String,
    pub file_host: Url,
    pub transient_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ExtractorResponse {
    audio: Option<String>,
}

/// Audio downloaded for one job. The file is removed when this is dropped,
/// whichever way the job ends.
#[derive(Debug)]
pub struct TransientAudioFile {
    path: PathBuf,
}

impl TransientAudioFile {
    pub fn reserve(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.mp3", Uuid::new_v4())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".to_string())
    }
}

impl Drop for TransientAudioFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "transient audio removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "failed to remove transient audio: {}", e),
        }
    }
}

enum State {
    Requested,
    Downloaded,
    Uploaded(PageResponse),
    LinkObtained(Url),
    Resolved(Url),
    Submitted(Outcome),
}

impl State {
    fn stage(&self) -> RehostStage {
        match self {
            Self::Requested => RehostStage::Requested,
            Self::Downloaded => RehostStage::Downloaded,
            Self::Uploaded(_) => RehostStage::Uploaded,
            Self::LinkObtained(_) => RehostStage::LinkObtained,
            Self::Resolved(_) => RehostStage::Resolved,
            Self::Submitted(_) => RehostStage::Submitted,
        }
    }
}

pub struct RehostPipeline {
    client: Client,
    settings: RehostSettings,
    direct: DirectReupload,
}

impl RehostPipeline {
    pub fn new(client: Client, settings: RehostSettings) -> Self {
        Self {
            client,
            settings,
            direct: DirectReupload,
        }
    }

    async fn run(
        &self,
        session: &Session,
        source_url: &str,
        title: &str,
        audio: &TransientAudioFile,
    ) -> Result<Outcome, ReuploadError> {
        let mut state = State::Requested;
        loop {
            state = match state {
                State::Requested => {
                    let stream_url = self.request_audio(source_url).await?;
                    let size = download_to_file(&self.client, &stream_url, audio.path())
                        .await
                        .map_err(ReuploadError::at(RehostStage::Requested))?;
                    info!(bytes = size, "audio downloaded");
                    State::Downloaded
                }
                State::Downloaded => State::Uploaded(self.upload(audio).await?),
                State::Uploaded(page) => State::LinkObtained(first_hop(&page)?),
                State::LinkObtained(link) => State::Resolved(self.second_hop(link).await?),
                State::Resolved(final_url) => {
                    info!(%final_url, "rehosted audio resolved");
                    State::Submitted(self.direct.submit(session, final_url.as_str(), title).await?)
                }
                State::Submitted(outcome) => return Ok(outcome),
            };
            debug!(stage = %state.stage(), "rehost advanced");
        }
    }

    /// Ask the extraction service for a direct audio stream URL.
    async fn request_audio(&self, source_url: &str) -> Result<String, ReuploadError> {
        let response = self
            .client
            .get(self.settings.extractor_url.clone())
            .query(&[
                ("url", source_url),
                ("version", self.settings.extractor_version.as_str()),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ReuploadError::at(RehostStage::Requested)(FetchError::from_reqwest_error(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReuploadError::Extraction(format!(
                "extractor returned {status}"
            )));
        }

        let body: ExtractorResponse = response
            .json()
            .await
            .map_err(|e| ReuploadError::Extraction(format!("unreadable extractor response: {e}")))?;

        body.audio
            .map(|audio| audio.trim().to_string())
            .filter(|audio| !audio.is_empty())
            .ok_or_else(|| ReuploadError::Extraction("no audio field in extractor response".into()))
    }

    /// Discover the current upload target and post the file to it.
    async fn upload(&self, audio: &TransientAudioFile) -> Result<PageResponse, ReuploadError> {
        let stage = RehostStage::Downloaded;

        let landing = fetch(&self.client, self.settings.file_host.as_str())
            .await
            .map_err(ReuploadError::at(stage))?;
        let target = extract_upload_target(&landing.body_utf8, &landing.url_final).ok_or(
            ReuploadError::Scrape {
                stage,
                missing: "upload form",
            },
        )?;
        debug!(%target, "upload target discovered");

        let file = tokio::fs::File::open(audio.path()).await?;
        let length = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = multipart::Part::stream_with_length(body, length)
            .file_name(audio.file_name())
            .mime_str(AUDIO_MIME)
            .map_err(|e| ReuploadError::at(stage)(FetchError::from_reqwest_error(e)))?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        send_page(self.client.post(target).multipart(form))
            .await
            .map_err(ReuploadError::at(stage))
    }

    /// The link on the upload result points at an intermediate page; the
    /// public URL is only found on that page.
    async fn second_hop(&self, link: Url) -> Result<Url, ReuploadError> {
        let stage = RehostStage::LinkObtained;

        let page = fetch(&self.client, link.as_str())
            .await
            .map_err(ReuploadError::at(stage))?;
        let fragment = extract_share_link(&page.body_utf8).ok_or(ReuploadError::Scrape {
            stage,
            missing: "share link",
        })?;

        self.settings
            .file_host
            .join(&fragment)
            .map_err(|e| ReuploadError::at(stage)(FetchError::InvalidUrl(e)))
    }
}

fn first_hop(page: &PageResponse) -> Result<Url, ReuploadError> {
    let missing = ReuploadError::Scrape {
        stage: RehostStage::Uploaded,
        missing: "share link",
    };
    let link = extract_share_link(&page.body_utf8).ok_or(missing)?;
    page.url_final
        .join(&link)
        .map_err(|e| ReuploadError::at(RehostStage::Uploaded)(FetchError::InvalidUrl(e)))
}

#[async_trait]
impl ReuploadPipeline for RehostPipeline {
    async fn submit(
        &self,
        session: &Session,
        url: &str,
        title: &str,
    ) -> Result<Outcome, ReuploadError> {
        let audio = TransientAudioFile::reserve(&self.settings.transient_dir);
        let span = info_span!("rehost", source_url = %url, file = %audio.path().display());
        self.run(session, url, title, &audio).instrument(span).await
        // `audio` dropped here on every path
    }

    fn kind(&self) -> PipelineChoice {
        PipelineChoice::AudioRehost
    }
}
