use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::{
    entities::Outcome,
    reupload::{PipelineChoice, ReuploadError, ReuploadPipeline},
    scrape::classify,
    session::Session,
};

/// Hands the URL straight to the dashboard's reupload form.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectReupload;

#[async_trait]
impl ReuploadPipeline for DirectReupload {
    #[instrument(skip_all, fields(url = %url, title = %title))]
    async fn submit(
        &self,
        session: &Session,
        url: &str,
        title: &str,
    ) -> Result<Outcome, ReuploadError> {
        let form_url = session.endpoints().reupload().clone();

        // the form endpoint expects to have been visited before it is posted to
        let form_page = session.get(form_url.clone()).await?;
        debug!(status = %form_page.status, "reupload form loaded");

        info!("Submitting form with URL: {}, Title: {}", url, title);
        let response = session
            .post_form(form_url, &[("url", url), ("title", title)])
            .await?;

        Ok(classify(&response.body_utf8))
    }

    fn kind(&self) -> PipelineChoice {
        PipelineChoice::Direct
    }
}
