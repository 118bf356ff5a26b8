use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::{fetcher::FetchError, library::LibraryError};

/// Stages of the audio-extraction-and-rehost machine. An error tagged with a
/// stage failed while leaving that stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RehostStage {
    Requested,
    Downloaded,
    Uploaded,
    LinkObtained,
    Resolved,
    Submitted,
}

impl Display for RehostStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Requested => "requested",
            Self::Downloaded => "downloaded",
            Self::Uploaded => "uploaded",
            Self::LinkObtained => "link_obtained",
            Self::Resolved => "resolved",
            Self::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

/// Failures that abort a job. Dashboard rejections are not errors; they come
/// back as [`crate::entities::Outcome::Error`].
#[derive(Error, Debug)]
pub enum ReuploadError {
    #[error("transport failure: {0}")]
    Transport(#[from] FetchError),

    #[error("audio extraction failed: {0}")]
    Extraction(String),

    #[error("rehost failed after stage {stage}: {source}")]
    Rehost {
        stage: RehostStage,
        #[source]
        source: FetchError,
    },

    #[error("rehost failed after stage {stage}: no {missing} on file host page")]
    Scrape {
        stage: RehostStage,
        missing: &'static str,
    },

    #[error("transient file error: {0}")]
    TransientFile(#[from] std::io::Error),

    #[error(transparent)]
    Library(#[from] LibraryError),
}

impl ReuploadError {
    pub(crate) fn at(stage: RehostStage) -> impl FnOnce(FetchError) -> Self {
        move |source| Self::Rehost { stage, source }
    }

    /// Stage of the rehost machine the job died in, if it got that far.
    pub fn stage(&self) -> Option<RehostStage> {
        match self {
            Self::Rehost { stage, .. } | Self::Scrape { stage, .. } => Some(*stage),
            Self::Extraction(_) => Some(RehostStage::Requested),
            _ => None,
        }
    }
}
