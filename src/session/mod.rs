//! Session controller: the generate, run and advance workflows.
//!
//! A [`Session`] owns the playback state machine, the geometry mapper and the
//! retained scene, and is the only thing that mutates them. Each backend
//! workflow is split at its single suspension point:
//!
//! - `begin_*` validates locally and issues a [`Ticket`];
//! - the backend call happens elsewhere (inline via
//!   [`generate_with`](Session::generate_with) / [`run_with`](Session::run_with),
//!   or on a [`RequestWorker`] drained by [`pump`](Session::pump));
//! - `finish_*` applies the reply atomically: state update and redraw in one
//!   call.
//!
//! Tickets make late replies harmless. A reply that is not the in-flight
//! request of its kind is ignored, and a run computed against a dataset that
//! has since been replaced is discarded.
//!
//! Recoverable failures are logged, queued as [`Notification`]s, and leave
//! every control retry-capable. State machine misuse is returned as an error
//! and never swallowed.

mod notification;

use std::collections::VecDeque;

pub use notification::{Level, Notification};
use web_time::Instant;

use crate::affordance::{converged_text, Affordances, InFlight};
use crate::backend::worker::{BackendReply, BackendRequest, RequestWorker};
use crate::backend::{Backend, BackendError};
use crate::error::ScopeError;
use crate::geometry::GeometryMapper;
use crate::model::{ClusterCount, Dataset, Run, Sample, Snapshot};
use crate::options::Options;
use crate::playback::{Playback, PlaybackError};
use crate::scene::{Scene, SceneFrame};
use crate::util::palette::Palette;

/// Which workflow a [`Ticket`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Dataset generation.
    Generate,
    /// K-means run.
    Run,
}

/// Identity of one backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    kind: RequestKind,
    seq: u64,
    epoch: u64,
}

impl Ticket {
    /// Ticket for request number `seq` issued while dataset `epoch` was
    /// loaded.
    #[must_use]
    pub const fn new(kind: RequestKind, seq: u64, epoch: u64) -> Self {
        Self { kind, seq, epoch }
    }

    /// Workflow the request belongs to.
    #[must_use]
    pub const fn kind(self) -> RequestKind {
        self.kind
    }

    /// Session-wide sequence number, strictly increasing.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.seq
    }

    /// Dataset epoch at issue time.
    #[must_use]
    pub const fn epoch(self) -> u64 {
        self.epoch
    }
}

/// What happened to a backend reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State was updated and the scene redrawn.
    Applied,
    /// The call or its validation failed; an error notification was queued.
    Failed,
    /// The reply was stale and ignored.
    Discarded,
}

/// Result of [`Session::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to the snapshot with this iteration number.
    Advanced {
        /// Iteration number of the new snapshot.
        iteration: u32,
        /// The new snapshot is the last one.
        terminal: bool,
    },
    /// Already on the final snapshot. Nothing changed.
    AtEnd,
}

/// Owns all mutable UI state for one visualization session.
pub struct Session {
    playback: Playback,
    mapper: GeometryMapper,
    scene: Scene,
    palette: Palette,
    generate_pending: Option<Ticket>,
    run_pending: Option<(Ticket, ClusterCount)>,
    next_seq: u64,
    last_generate_applied: u64,
    last_run_applied: u64,
    /// Bumped every time a dataset is loaded.
    dataset_epoch: u64,
    /// Workflow whose most recent backend reply failed.
    last_failure: Option<RequestKind>,
    notifications: VecDeque<Notification>,
}

impl Session {
    /// Fresh session in the `Empty` state.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            playback: Playback::new(),
            mapper: GeometryMapper::new(&options.chart),
            scene: Scene::new(options.style.clone(), options.animation.clone()),
            palette: options.style.cluster_palette(),
            generate_pending: None,
            run_pending: None,
            next_seq: 0,
            last_generate_applied: 0,
            last_run_applied: 0,
            dataset_epoch: 0,
            last_failure: None,
            notifications: VecDeque::new(),
        }
    }

    // -- Queries --

    /// The playback state machine.
    #[must_use]
    pub const fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Scales for the current dataset.
    #[must_use]
    pub const fn mapper(&self) -> &GeometryMapper {
        &self.mapper
    }

    /// The retained scene.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access, for hosts that acknowledge exported frames.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Sample the scene at `now`.
    #[must_use]
    pub fn frame(&self, now: Instant) -> SceneFrame {
        self.scene.frame(now)
    }

    /// Pending backend requests.
    #[must_use]
    pub fn in_flight(&self) -> InFlight {
        InFlight {
            generate: self.generate_pending.is_some(),
            run: self.run_pending.map(|(_, k)| k),
        }
    }

    /// Current control state and status text.
    #[must_use]
    pub fn affordances(&self) -> Affordances {
        Affordances::derive(&self.playback, self.in_flight(), self.last_failure)
    }

    /// Take every queued notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    // -- Generate --

    /// Start a generate request.
    ///
    /// # Errors
    ///
    /// [`ScopeError::RequestInFlight`] if a generate request is pending.
    pub fn begin_generate(&mut self) -> Result<Ticket, ScopeError> {
        if self.generate_pending.is_some() {
            return Err(self.reject(ScopeError::RequestInFlight("generate")));
        }
        let ticket = self.issue(RequestKind::Generate);
        self.generate_pending = Some(ticket);
        log::debug!("generate request #{} issued", ticket.seq);
        Ok(ticket)
    }

    /// Apply the reply to a generate request.
    ///
    /// On success the dataset replaces any previous one (discarding its
    /// run), the scales are refit and every point is redrawn neutral. On
    /// failure the previous dataset stays loaded.
    pub fn finish_generate(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Sample>, BackendError>,
    ) -> Outcome {
        if self.generate_pending != Some(ticket)
            || ticket.seq <= self.last_generate_applied
        {
            log::warn!("ignoring stale generate reply #{}", ticket.seq);
            return Outcome::Discarded;
        }
        self.generate_pending = None;

        let dataset = match result
            .map_err(ScopeError::from)
            .and_then(|samples| Dataset::new(samples).map_err(ScopeError::from))
        {
            Ok(dataset) => dataset,
            Err(e) => {
                self.fail(&e);
                self.last_failure = Some(RequestKind::Generate);
                return Outcome::Failed;
            }
        };

        self.last_generate_applied = ticket.seq;
        self.last_failure = None;
        self.dataset_epoch += 1;
        self.mapper.fit(&dataset);
        self.scene.draw_points(&dataset, &self.mapper);
        log::info!(
            "dataset loaded: {} samples (epoch {})",
            dataset.len(),
            self.dataset_epoch
        );
        self.playback.load_dataset(dataset);
        Outcome::Applied
    }

    // -- Run --

    /// Validate `k_input` and start a run request.
    ///
    /// # Errors
    ///
    /// [`ScopeError::RequestInFlight`] if a run is pending,
    /// [`ScopeError::NoDataset`] if no non-empty dataset is loaded, and
    /// [`ScopeError::InvalidClusterCount`] if `k_input` is not a positive
    /// integer. Each is also queued as a notification; nothing is sent.
    pub fn begin_run(
        &mut self,
        k_input: &str,
    ) -> Result<(Ticket, ClusterCount), ScopeError> {
        if self.run_pending.is_some() {
            return Err(self.reject(ScopeError::RequestInFlight("run")));
        }
        let has_samples =
            self.playback.dataset().is_some_and(|d| !d.is_empty());
        if !has_samples {
            return Err(self.reject(ScopeError::NoDataset));
        }
        let k = match k_input.trim().parse::<ClusterCount>() {
            Ok(k) => k,
            Err(e) => return Err(self.reject(e.into())),
        };

        let ticket = self.issue(RequestKind::Run);
        self.run_pending = Some((ticket, k));
        log::debug!("run request #{} issued (k = {k})", ticket.seq);
        Ok((ticket, k))
    }

    /// Apply the reply to a run request.
    ///
    /// A reply for a dataset that has since been replaced is discarded. A
    /// valid run is loaded and its first snapshot rendered, with assignment
    /// and centroids transitioning from `now`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::Playback`] if the state machine refuses the run, which
    /// indicates a defect in the session itself.
    pub fn finish_run(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Snapshot>, BackendError>,
        now: Instant,
    ) -> Result<Outcome, ScopeError> {
        let pending = self.run_pending.map(|(t, _)| t);
        if pending != Some(ticket) || ticket.seq <= self.last_run_applied {
            log::warn!("ignoring stale run reply #{}", ticket.seq);
            return Ok(Outcome::Discarded);
        }
        self.run_pending = None;

        if ticket.epoch() != self.dataset_epoch {
            log::warn!(
                "discarding run #{}: computed for epoch {}, current {}",
                ticket.seq,
                ticket.epoch(),
                self.dataset_epoch
            );
            self.notify(Notification::info(
                "The dataset changed while k-means was running; result discarded.",
            ));
            return Ok(Outcome::Discarded);
        }

        let steps = match result {
            Ok(steps) => steps,
            Err(e) => {
                self.fail(&e.into());
                self.last_failure = Some(RequestKind::Run);
                return Ok(Outcome::Failed);
            }
        };
        let Some(dataset) = self.playback.dataset() else {
            return Err(PlaybackError::InvalidTransition {
                operation: "finish_run",
                reason: "no dataset loaded",
            }
            .into());
        };
        let run = match Run::validated(steps, dataset) {
            Ok(run) => run,
            Err(e) => {
                self.fail(&e.into());
                self.last_failure = Some(RequestKind::Run);
                return Ok(Outcome::Failed);
            }
        };

        self.last_run_applied = ticket.seq;
        self.last_failure = None;
        let len = run.len();
        let snapshot = self.playback.load_run(run)?;
        let iteration = snapshot.iteration;
        render_snapshot(&mut self.scene, &self.mapper, &self.palette, snapshot, now);
        log::info!("run loaded: {len} snapshots");
        self.announce_if_terminal(iteration);
        Ok(Outcome::Applied)
    }

    // -- Advance --

    /// Step to the next snapshot and render it, transitioning from `now`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::RequestInFlight`] while a run is pending, and
    /// [`ScopeError::Playback`] on state machine misuse.
    pub fn advance(&mut self, now: Instant) -> Result<Step, ScopeError> {
        if self.run_pending.is_some() {
            return Err(self.reject(ScopeError::RequestInFlight("run")));
        }
        match self.playback.advance() {
            Ok(snapshot) => {
                let iteration = snapshot.iteration;
                render_snapshot(
                    &mut self.scene,
                    &self.mapper,
                    &self.palette,
                    snapshot,
                    now,
                );
                let terminal = self.playback.is_terminal();
                self.announce_if_terminal(iteration);
                Ok(Step::Advanced {
                    iteration,
                    terminal,
                })
            }
            Err(PlaybackError::NoMoreSteps) => {
                log::info!("advance requested at the final step");
                self.notify(Notification::info("Already at the final step."));
                Ok(Step::AtEnd)
            }
            Err(e) => Err(e.into()),
        }
    }

    // -- Inline backend calls --

    /// Generate a dataset, blocking on `backend`.
    ///
    /// # Errors
    ///
    /// As [`begin_generate`](Self::begin_generate).
    pub fn generate_with<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<Outcome, ScopeError> {
        let ticket = self.begin_generate()?;
        let result = backend.generate_data();
        Ok(self.finish_generate(ticket, result))
    }

    /// Run k-means, blocking on `backend`. Transitions start when the reply
    /// arrives.
    ///
    /// # Errors
    ///
    /// As [`begin_run`](Self::begin_run) and [`finish_run`](Self::finish_run).
    pub fn run_with<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        k_input: &str,
    ) -> Result<Outcome, ScopeError> {
        let (ticket, k) = self.begin_run(k_input)?;
        let result = backend.run_kmeans(k);
        self.finish_run(ticket, result, Instant::now())
    }

    // -- Background backend calls --

    /// Start a generate request on `worker`.
    ///
    /// # Errors
    ///
    /// As [`begin_generate`](Self::begin_generate).
    pub fn request_generate(
        &mut self,
        worker: &RequestWorker,
    ) -> Result<Ticket, ScopeError> {
        let ticket = self.begin_generate()?;
        if !worker.submit(BackendRequest::Generate(ticket)) {
            let _ = self.finish_generate(ticket, Err(worker_stopped()));
        }
        Ok(ticket)
    }

    /// Start a run request on `worker`.
    ///
    /// # Errors
    ///
    /// As [`begin_run`](Self::begin_run).
    pub fn request_run(
        &mut self,
        worker: &RequestWorker,
        k_input: &str,
    ) -> Result<Ticket, ScopeError> {
        let (ticket, k) = self.begin_run(k_input)?;
        if !worker.submit(BackendRequest::Run(ticket, k)) {
            let _ = self.finish_run(ticket, Err(worker_stopped()), Instant::now())?;
        }
        Ok(ticket)
    }

    /// Apply one reply from a [`RequestWorker`].
    ///
    /// # Errors
    ///
    /// As [`finish_run`](Self::finish_run).
    pub fn apply_reply(
        &mut self,
        reply: BackendReply,
        now: Instant,
    ) -> Result<Outcome, ScopeError> {
        let issued = reply.ticket();
        log::debug!("{:?} reply for request #{}", issued.kind(), issued.seq());
        match reply {
            BackendReply::Generated(ticket, result) => {
                Ok(self.finish_generate(ticket, result))
            }
            BackendReply::Ran(ticket, result) => self.finish_run(ticket, result, now),
        }
    }

    /// Apply every reply `worker` has finished. Returns how many were
    /// handled, stale ones included.
    ///
    /// # Errors
    ///
    /// As [`finish_run`](Self::finish_run).
    pub fn pump(
        &mut self,
        worker: &RequestWorker,
        now: Instant,
    ) -> Result<usize, ScopeError> {
        let mut handled = 0;
        while let Some(reply) = worker.try_recv() {
            let _ = self.apply_reply(reply, now)?;
            handled += 1;
        }
        Ok(handled)
    }

    // -- Internals --

    fn issue(&mut self, kind: RequestKind) -> Ticket {
        self.next_seq += 1;
        Ticket::new(kind, self.next_seq, self.dataset_epoch)
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
    }

    fn fail(&mut self, err: &ScopeError) {
        log::warn!("{err}");
        self.notify(Notification::error(err.to_string()));
    }

    fn reject(&mut self, err: ScopeError) -> ScopeError {
        self.fail(&err);
        err
    }

    fn announce_if_terminal(&mut self, iteration: u32) {
        if self.playback.is_terminal() {
            log::info!("converged after {iteration} iterations");
            self.notify(Notification::info(converged_text(iteration)));
        }
    }
}

fn render_snapshot(
    scene: &mut Scene,
    mapper: &GeometryMapper,
    palette: &Palette,
    snapshot: &Snapshot,
    now: Instant,
) {
    let recolored = scene.apply_assignment(snapshot, palette, now);
    let centroids = scene.apply_centroids(snapshot, mapper, palette, now);
    log::debug!(
        "iteration {}: {recolored} points recolored, centroids +{} ~{} -{}",
        snapshot.iteration,
        centroids.entered,
        centroids.moved,
        centroids.exited
    );
}

fn worker_stopped() -> BackendError {
    BackendError::Transport("request worker has stopped".to_owned())
}
