pub mod direct;
pub mod errors;
pub mod rehost;
pub mod router;

pub use direct::DirectReupload;
pub use errors::{RehostStage, ReuploadError};
pub use rehost::{RehostPipeline, RehostSettings, TransientAudioFile};
pub use router::{DEFAULT_DIRECT_HOST_PATTERN, JobRouter, PipelineChoice};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Span, info, instrument};

use crate::{
    entities::{Job, LibraryEntry, Outcome},
    library::LibraryStore,
    session::Session,
};

/// One way of getting a URL into the dashboard.
#[async_trait]
pub trait ReuploadPipeline: Send + Sync + 'static {
    /// Run the pipeline once. Classified dashboard rejections are `Ok`.
    async fn submit(
        &self,
        session: &Session,
        url: &str,
        title: &str,
    ) -> Result<Outcome, ReuploadError>;

    /// The routing decision this pipeline serves.
    fn kind(&self) -> PipelineChoice;
}

/// Job-handling service: routes a job, runs the chosen pipeline, records
/// successes in the library.
pub struct Reuploader {
    session: Session,
    router: JobRouter,
    direct: Box<dyn ReuploadPipeline>,
    rehost: Box<dyn ReuploadPipeline>,
    library: Arc<LibraryStore>,
}

impl Reuploader {
    pub fn new(
        session: Session,
        router: JobRouter,
        rehost: RehostPipeline,
        library: Arc<LibraryStore>,
    ) -> Self {
        Self {
            session,
            router,
            direct: Box::new(DirectReupload),
            rehost: Box::new(rehost),
            library,
        }
    }

    pub fn library(&self) -> &Arc<LibraryStore> {
        &self.library
    }

    fn pipeline(&self, choice: PipelineChoice) -> &dyn ReuploadPipeline {
        match choice {
            PipelineChoice::Direct => self.direct.as_ref(),
            PipelineChoice::AudioRehost => self.rehost.as_ref(),
        }
    }

    /// Attempt the job exactly once.
    #[instrument(skip_all, fields(url = %job.source_url, title = %job.title, pipeline))]
    pub async fn run(&self, job: &Job) -> Result<Outcome, ReuploadError> {
        let pipeline = self.pipeline(self.router.route(job));
        Span::current().record("pipeline", tracing::field::display(pipeline.kind()));

        let outcome = pipeline
            .submit(&self.session, &job.source_url, &job.title)
            .await?;

        match &outcome {
            Outcome::Success { remote_id } => {
                self.library
                    .append(LibraryEntry::new(job, remote_id.as_str()))
                    .await?;
                info!(song_id = %remote_id, "song reuploaded");
            }
            Outcome::Error { category } => {
                info!(?category, "dashboard rejected reupload");
            }
        }

        Ok(outcome)
    }
}
