use super::error::PipelineError;
use super::report::AnalysisReport;
use super::session::{Session, SessionSnapshot};
use super::state::PipelineState;
use crate::classify::{ClassificationResult, Classifier};
use crate::ingest::{ImageAsset, Ingested, Ingestor, UploadedFile, ValidationError};
use crate::progress::{PipelineEvent, PipelineObserver};
use crate::recommend::RecommendationStage;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// What happened to an upload that passed validation
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// The image now occupies the slot
    Accepted(ImageAsset),
    /// Caller is not signed in; the session was left untouched
    LoginRequired,
}

/// Drives one session through upload → classify → recommend.
///
/// The session lives behind a mutex that is never held across an await, so
/// `clear` and `upload` can run while a `detect` is suspended. A suspended
/// cycle that finds the slot reset when it resumes discards its result.
pub struct Orchestrator {
    ingestor: Ingestor,
    classifier: Arc<dyn Classifier>,
    recommender: RecommendationStage,
    observer: Arc<dyn PipelineObserver>,
    session: Mutex<Session>,
}

impl Orchestrator {
    pub fn new(
        ingestor: Ingestor,
        classifier: Arc<dyn Classifier>,
        recommender: RecommendationStage,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            ingestor,
            classifier,
            recommender,
            observer,
            session: Mutex::new(Session::new()),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, events: impl IntoIterator<Item = PipelineEvent>) {
        for event in events {
            self.observer.on_event(&event);
        }
    }

    /// Validates `file` and, if accepted, puts it in the slot.
    ///
    /// Accepted in any state: the previous image, its results and any running
    /// cycle are dropped. Rejections leave the session unchanged.
    pub async fn upload(&self, file: UploadedFile) -> Result<UploadOutcome, ValidationError> {
        let asset = match self.ingestor.ingest(file).await? {
            Ingested::LoginRequired => {
                self.emit([PipelineEvent::LoginRequired]);
                return Ok(UploadOutcome::LoginRequired);
            }
            Ingested::Ready(asset) => asset,
        };

        let (width, height) = asset.dimensions();
        let ready = PipelineEvent::ImageReady {
            name: asset.name().to_string(),
            bytes: asset.len() as usize,
            width,
            height,
        };

        let from = {
            let mut session = self.session();
            let from = session.reset();
            session.asset = Some(asset.clone());
            session.transition(PipelineState::AwaitingUpload);
            from
        };

        if from.is_in_flight() {
            debug!(previous = %from, "New upload detached running analysis");
        }

        self.emit([
            ready,
            PipelineEvent::StateChanged {
                from,
                to: PipelineState::AwaitingUpload,
            },
        ]);

        Ok(UploadOutcome::Accepted(asset))
    }

    /// Runs classification then recommendation on the uploaded image.
    ///
    /// Never starts on its own: callers trigger it after an upload or to retry
    /// after a failure. A retry after a recommendation failure reuses the
    /// classification already made for this image, so each image is classified
    /// once. Once complete, returns the cached report without calling either
    /// stage again.
    pub async fn detect(&self) -> Result<AnalysisReport, PipelineError> {
        let (cycle, asset, kept, from) = {
            let mut session = self.session();
            match session.state {
                PipelineState::Idle => return Err(PipelineError::NotReady),
                PipelineState::Classifying | PipelineState::Recommending => {
                    return Err(PipelineError::InFlight)
                }
                PipelineState::Complete => {
                    return session.report.clone().ok_or(PipelineError::NotReady)
                }
                PipelineState::AwaitingUpload | PipelineState::Failed => {}
            }

            let asset = session.asset.clone().ok_or(PipelineError::NotReady)?;
            let kept = match session.state {
                PipelineState::Failed => session.classification,
                _ => None,
            };
            session.last_failure = None;
            let from = match kept {
                Some(_) => session.transition(PipelineState::Recommending),
                None => {
                    session.classification = None;
                    session.transition(PipelineState::Classifying)
                }
            };
            (session.cycle, asset, kept, from)
        };

        let classification = match kept {
            Some(classification) => {
                self.emit([PipelineEvent::StateChanged {
                    from,
                    to: PipelineState::Recommending,
                }]);
                info!(
                    image = asset.name(),
                    cycle,
                    disease = %classification.disease(),
                    "Retrying recommendations for the existing classification"
                );
                classification
            }
            None => self.classify(cycle, asset, from).await?,
        };

        let started = Instant::now();
        let recommendation = match self.recommender.recommend(&classification).await {
            Ok(text) => text,
            Err(e) => return Err(self.fail(cycle, "recommend", e.into())),
        };

        let report = AnalysisReport::new(classification, recommendation);
        {
            let mut session = self.session();
            if !session.is_current(cycle) {
                drop(session);
                return Err(self.discard(cycle, "recommend"));
            }
            session.report = Some(report.clone());
            session.transition(PipelineState::Complete);
        }

        self.emit([
            PipelineEvent::RecommendationComplete {
                duration: started.elapsed(),
            },
            PipelineEvent::StateChanged {
                from: PipelineState::Recommending,
                to: PipelineState::Complete,
            },
        ]);

        Ok(report)
    }

    async fn classify(
        &self,
        cycle: u64,
        asset: ImageAsset,
        from: PipelineState,
    ) -> Result<ClassificationResult, PipelineError> {
        self.emit([PipelineEvent::StateChanged {
            from,
            to: PipelineState::Classifying,
        }]);
        info!(
            image = asset.name(),
            cycle,
            classifier = self.classifier.name(),
            "Analyzing image"
        );

        let started = Instant::now();
        let classified = self.classifier.classify(&asset).await;
        drop(asset);

        let classification = match classified {
            Ok(classification) => classification,
            Err(e) => return Err(self.fail(cycle, "classify", e.into())),
        };

        self.commit_classification(cycle, classification, started)?;
        Ok(classification)
    }

    fn commit_classification(
        &self,
        cycle: u64,
        classification: ClassificationResult,
        started: Instant,
    ) -> Result<(), PipelineError> {
        {
            let mut session = self.session();
            if !session.is_current(cycle) {
                drop(session);
                return Err(self.discard(cycle, "classify"));
            }
            session.classification = Some(classification);
            session.transition(PipelineState::Recommending);
        }

        self.emit([
            PipelineEvent::ClassificationComplete {
                disease: classification.disease(),
                confidence: classification.confidence(),
                duration: started.elapsed(),
            },
            PipelineEvent::StateChanged {
                from: PipelineState::Classifying,
                to: PipelineState::Recommending,
            },
        ]);
        Ok(())
    }

    /// Records a stage failure for the running cycle and returns the error to
    /// hand back to the caller.
    fn fail(&self, cycle: u64, stage: &'static str, error: PipelineError) -> PipelineError {
        let from = {
            let mut session = self.session();
            if !session.is_current(cycle) {
                drop(session);
                return self.discard(cycle, stage);
            }
            session.last_failure = Some(error.clone());
            session.transition(PipelineState::Failed)
        };

        debug!(stage, cycle, "Stage failed");

        self.emit([
            PipelineEvent::Failed {
                kind: error.kind(),
                error: error.to_string(),
            },
            PipelineEvent::StateChanged {
                from,
                to: PipelineState::Failed,
            },
        ]);
        error
    }

    fn discard(&self, cycle: u64, stage: &'static str) -> PipelineError {
        debug!(cycle, stage, "Result arrived after the session was reset");
        self.emit([PipelineEvent::StaleResponseDiscarded { cycle, stage }]);
        PipelineError::Abandoned
    }

    /// Empties the slot from any state. A running cycle keeps going but its
    /// result will be discarded.
    pub fn clear(&self) {
        let from = self.session().reset();
        if from != PipelineState::Idle {
            info!(previous = %from, "Session cleared");
            self.emit([PipelineEvent::StateChanged {
                from,
                to: PipelineState::Idle,
            }]);
        }
    }

    /// Resets a completed session so a new image can be uploaded.
    pub fn analyze_another(&self) -> Result<(), PipelineError> {
        let from = {
            let mut session = self.session();
            match session.state {
                PipelineState::Complete => session.reset(),
                state if state.is_in_flight() => return Err(PipelineError::InFlight),
                _ => return Err(PipelineError::NotReady),
            }
        };

        info!(previous = %from, "Ready for another image");
        self.emit([PipelineEvent::StateChanged {
            from,
            to: PipelineState::Idle,
        }]);
        Ok(())
    }

    pub fn state(&self) -> PipelineState {
        self.session().state
    }

    pub fn can_detect(&self) -> bool {
        self.state().can_detect()
    }

    pub fn session_id(&self) -> Uuid {
        self.session().id
    }

    pub fn asset(&self) -> Option<ImageAsset> {
        self.session().asset.clone()
    }

    pub fn classification(&self) -> Option<ClassificationResult> {
        self.session().classification
    }

    pub fn report(&self) -> Option<AnalysisReport> {
        self.session().report.clone()
    }

    pub fn last_failure(&self) -> Option<PipelineError> {
        self.session().last_failure.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session().snapshot()
    }

    pub fn provider_name(&self) -> &str {
        self.recommender.provider_name()
    }
}
