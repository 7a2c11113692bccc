// src/workflow.rs
//! Per-page workflow: a four-phase state machine plus the controller that
//! drives it through simulated backend latency.
//!
//! Every submission is issued a ticket. A completion is applied only while
//! its ticket is current and the page is still mounted; anything else is a
//! stale response and is dropped without touching page state.

use crate::config::Timings;
use crate::errors::BreedSenseError;
use crate::models::{AnalysisKind, AnalysisRequest};
use crate::pages::{Action, Job, Page};
use crate::services::{Geolocator, ResultGenerator};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Waiting,
    Done,
}

#[derive(Debug, Default)]
pub struct Workflow {
    phase: Phase,
    ticket: u64,
}

impl Workflow {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting | Phase::Waiting)
    }

    /// Idle/Done -> Submitting. At most one request may be in flight.
    pub fn begin(&mut self) -> Result<u64, BreedSenseError> {
        if self.is_busy() {
            return Err(BreedSenseError::Busy);
        }
        self.ticket += 1;
        self.phase = Phase::Submitting;
        Ok(self.ticket)
    }

    /// Submitting -> Waiting.
    pub fn wait(&mut self, ticket: u64) -> Result<(), BreedSenseError> {
        if self.ticket != ticket || self.phase != Phase::Submitting {
            return Err(BreedSenseError::StaleResponse { ticket });
        }
        self.phase = Phase::Waiting;
        Ok(())
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.ticket == ticket && self.phase == Phase::Waiting
    }

    /// Waiting -> Done.
    pub fn complete(&mut self, ticket: u64) -> Result<(), BreedSenseError> {
        if !self.is_current(ticket) {
            return Err(BreedSenseError::StaleResponse { ticket });
        }
        self.phase = Phase::Done;
        Ok(())
    }

    /// Waiting -> Idle, used when the backend call itself fails.
    pub fn abort(&mut self, ticket: u64) -> Result<(), BreedSenseError> {
        if !self.is_current(ticket) {
            return Err(BreedSenseError::StaleResponse { ticket });
        }
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Back to Idle; any outstanding ticket becomes stale.
    pub fn reset(&mut self) {
        self.ticket += 1;
        self.phase = Phase::Idle;
    }
}

/// Owns one mounted page and runs its submissions.
pub struct WorkflowController {
    id: Uuid,
    page: Arc<Mutex<Page>>,
    generator: Arc<dyn ResultGenerator>,
    geolocator: Arc<dyn Geolocator>,
    timings: Timings,
    shutdown_tx: watch::Sender<bool>,
}

impl WorkflowController {
    pub fn mount(
        kind: AnalysisKind,
        generator: Arc<dyn ResultGenerator>,
        geolocator: Arc<dyn Geolocator>,
        timings: Timings,
    ) -> Self {
        let id = Uuid::new_v4();
        let (shutdown_tx, _) = watch::channel(false);
        info!("Mounted {:?} page {}", kind, id);

        Self {
            id,
            page: Arc::new(Mutex::new(Page::new(id, kind))),
            generator,
            geolocator,
            timings,
            shutdown_tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn page(&self) -> &Arc<Mutex<Page>> {
        &self.page
    }

    pub fn is_mounted(&self) -> bool {
        !*self.shutdown_tx.borrow()
    }

    /// Validate the page guard, move to Waiting and schedule the job.
    /// Returns the ticket of the accepted submission.
    pub async fn submit(&self, action: Action) -> Result<u64, BreedSenseError> {
        if !self.is_mounted() {
            return Err(BreedSenseError::PageNotFound(self.id));
        }

        let mut page = self.page.lock().await;
        if page.workflow.is_busy() {
            return Err(BreedSenseError::Busy);
        }
        let job = page.plan(&action, &self.timings)?;
        let ticket = page.workflow.begin()?;
        page.on_submitted(&job);
        page.workflow.wait(ticket)?;
        drop(page);

        info!("Page {} accepted submission #{}", self.id, ticket);

        tokio::spawn(run_job(
            self.page.clone(),
            self.generator.clone(),
            self.geolocator.clone(),
            self.shutdown_tx.subscribe(),
            ticket,
            job,
        ));

        Ok(ticket)
    }

    /// Tear the page down. Pending jobs stop at their next await point and
    /// never write to the page.
    pub async fn unmount(&self) {
        self.shutdown_tx.send_replace(true);
        self.page.lock().await.workflow.reset();
        info!("Unmounted page {}", self.id);
    }
}

/// Sleep for `latency` unless the page goes away first.
async fn wait_or_shutdown(latency: Duration, shutdown_rx: &mut watch::Receiver<bool>) -> bool {
    if *shutdown_rx.borrow() {
        return false;
    }
    tokio::select! {
        _ = tokio::time::sleep(latency) => true,
        _ = shutdown_rx.changed() => false,
    }
}

/// Lock the page and run `apply` only if `ticket` is still the live one.
async fn with_current_page(
    page: &Mutex<Page>,
    shutdown_rx: &watch::Receiver<bool>,
    ticket: u64,
    apply: impl FnOnce(&mut Page),
) -> bool {
    let mut page = page.lock().await;
    if *shutdown_rx.borrow() || !page.workflow.is_current(ticket) {
        debug!("{}", BreedSenseError::StaleResponse { ticket });
        return false;
    }
    apply(&mut page);
    true
}

async fn run_job(
    page: Arc<Mutex<Page>>,
    generator: Arc<dyn ResultGenerator>,
    geolocator: Arc<dyn Geolocator>,
    mut shutdown_rx: watch::Receiver<bool>,
    ticket: u64,
    job: Job,
) {
    let request = match job {
        Job::Analyze { request, latency } => {
            if !wait_or_shutdown(latency, &mut shutdown_rx).await {
                debug!("Submission #{} cancelled by unmount", ticket);
                return;
            }
            request
        }
        Job::LocateThenSearch {
            locate_latency,
            search_latency,
        } => {
            if !wait_or_shutdown(locate_latency, &mut shutdown_rx).await {
                debug!("Location lookup #{} cancelled by unmount", ticket);
                return;
            }

            let location = match geolocator.locate().await {
                Ok(location) => location,
                Err(e) => {
                    warn!("Location lookup #{} failed: {}", ticket, e);
                    with_current_page(&page, &shutdown_rx, ticket, |page| {
                        let _ = page.workflow.abort(ticket);
                    })
                    .await;
                    return;
                }
            };

            let filled = with_current_page(&page, &shutdown_rx, ticket, |page| {
                page.set_location(location.clone())
            })
            .await;
            if !filled {
                return;
            }

            if !wait_or_shutdown(search_latency, &mut shutdown_rx).await {
                debug!("Hospital search #{} cancelled by unmount", ticket);
                return;
            }
            AnalysisRequest::Hospitals { location }
        }
    };

    let result = generator.generate(&request).await;
    let applied = with_current_page(&page, &shutdown_rx, ticket, |page| {
        // Current ticket was just checked, so completion cannot fail.
        let _ = page.workflow.complete(ticket);
        page.apply(result);
    })
    .await;

    if applied {
        info!("Submission #{} completed ({:?})", ticket, request.kind());
    }
}
