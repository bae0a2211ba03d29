//! Background extraction off the interaction thread.
//!
//! One worker thread receives jobs over an `mpsc` channel. At most one job is
//! in flight; while it runs, newer submissions replace each other in a
//! single-slot queue. Every submission gets a ticket and only the result for
//! the newest ticket is surfaced. Older results are dropped on arrival, and so
//! is the newest one once the caller's snapshot has moved past it.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::controller::CropSnapshot;
use crate::decode::RasterImage;
use crate::session::ExtractionJob;
use crate::transform::ExtractionError;

/// A finished extraction for the newest submitted snapshot.
#[derive(Debug)]
pub struct ExtractionResult {
    /// The snapshot the job was built from
    pub snapshot: CropSnapshot,
    pub result: Result<RasterImage, ExtractionError>,
}

impl ExtractionResult {
    pub fn generation(&self) -> u64 {
        self.snapshot.generation
    }
}

struct Completed {
    ticket: u64,
    output: ExtractionResult,
}

/// Runs [`ExtractionJob`]s on a dedicated thread with latest-wins semantics.
pub struct ExtractionWorker {
    jobs: Option<Sender<(u64, ExtractionJob)>>,
    results: Receiver<Completed>,
    handle: Option<JoinHandle<()>>,
    next_ticket: u64,
    /// Ticket whose result may be surfaced; `None` after cancel.
    wanted: Option<u64>,
    in_flight: Option<u64>,
    queued: Option<(u64, ExtractionJob)>,
}

impl ExtractionWorker {
    /// Spawn the worker thread.
    pub fn new() -> io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<(u64, ExtractionJob)>();
        let (result_tx, result_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("avatarcrop-extract".to_string())
            .spawn(move || {
                for (ticket, job) in job_rx {
                    let output = ExtractionResult {
                        snapshot: job.snapshot,
                        result: job.run(),
                    };
                    if result_tx.send(Completed { ticket, output }).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
            next_ticket: 0,
            wanted: None,
            in_flight: None,
            queued: None,
        })
    }

    /// Queue `job`. Never cancels the running job; a job already waiting in
    /// the queue is replaced.
    pub fn submit(&mut self, job: ExtractionJob) {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.wanted = Some(ticket);

        if self.in_flight.is_none() {
            self.dispatch(ticket, job);
        } else if let Some((_, replaced)) = self.queued.replace((ticket, job)) {
            log::debug!(
                "replaced queued extraction for generation {}",
                replaced.generation()
            );
        }
    }

    /// True while a job is running or queued.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || self.queued.is_some()
    }

    /// Return the fresh result if it has arrived, without blocking.
    ///
    /// `current` is the caller's latest snapshot; a result built from an
    /// older one is discarded.
    pub fn poll(&mut self, current: &CropSnapshot) -> Option<ExtractionResult> {
        loop {
            match self.results.try_recv() {
                Ok(completed) => {
                    if let Some(output) = self.accept(completed, current) {
                        return Some(output);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.on_disconnect();
                    return None;
                }
            }
        }
    }

    /// Block until the fresh result arrives, or return `None` once the
    /// worker has nothing left that could produce one for `current`.
    pub fn wait(&mut self, current: &CropSnapshot) -> Option<ExtractionResult> {
        while self.in_flight.is_some() {
            match self.results.recv() {
                Ok(completed) => {
                    if let Some(output) = self.accept(completed, current) {
                        return Some(output);
                    }
                }
                Err(_) => {
                    self.on_disconnect();
                    return None;
                }
            }
        }
        None
    }

    /// Drop queued work and mark the running job stale. No result from
    /// before the cancel is ever surfaced.
    pub fn cancel(&mut self) {
        self.queued = None;
        self.wanted = None;
    }

    fn dispatch(&mut self, ticket: u64, job: ExtractionJob) {
        let Some(jobs) = &self.jobs else {
            return;
        };
        if jobs.send((ticket, job)).is_err() {
            self.on_disconnect();
            return;
        }
        self.in_flight = Some(ticket);
    }

    fn accept(&mut self, completed: Completed, current: &CropSnapshot) -> Option<ExtractionResult> {
        self.in_flight = None;
        if let Some((ticket, job)) = self.queued.take() {
            self.dispatch(ticket, job);
        }

        let output = completed.output;
        if self.wanted != Some(completed.ticket) {
            log::debug!(
                "discarding stale extraction for generation {}",
                output.generation()
            );
            return None;
        }

        self.wanted = None;
        if output.snapshot.is_superseded_by(current) {
            log::debug!(
                "discarding extraction for generation {} superseded by {}",
                output.generation(),
                current.generation
            );
            return None;
        }
        Some(output)
    }

    fn on_disconnect(&mut self) {
        if self.in_flight.is_some() || self.queued.is_some() {
            log::warn!("extraction worker disconnected with pending work");
        }
        self.in_flight = None;
        self.queued = None;
        self.jobs = None;
    }
}

impl Drop for ExtractionWorker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.jobs = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("extraction worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropperConfig;
    use crate::session::CropSession;
    use crate::transform::InterpolationFilter;
    use std::sync::Arc;

    fn session() -> CropSession {
        let pixels = (0..80 * 60 * 4).map(|i| (i % 251) as u8).collect();
        let image = RasterImage::new(80, 60, pixels);
        CropSession::from_raster(image, CropperConfig::default()).unwrap()
    }

    #[test]
    fn test_single_job_round_trip() {
        let session = session();
        let mut worker = ExtractionWorker::new().unwrap();
        let job = session.extraction_job();
        let expected = job.run().unwrap();

        worker.submit(job);
        let output = worker.wait(&session.snapshot()).expect("fresh result");
        assert_eq!(output.generation(), session.snapshot().generation);
        assert_eq!(output.result.unwrap(), expected);
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_only_newest_result_surfaces() {
        let mut session = session();
        let mut worker = ExtractionWorker::new().unwrap();

        worker.submit(session.extraction_job());
        session.update(|c| c.set_zoom(2.5));
        worker.submit(session.extraction_job());
        let newest = session.update(|c| c.set_rotation(45.0));
        worker.submit(session.extraction_job());

        let output = worker.wait(&newest).expect("newest result");
        assert_eq!(output.generation(), newest.generation);
        assert_eq!(output.snapshot, newest);
        assert!(worker.wait(&newest).is_none());
        assert!(worker.poll(&newest).is_none());
    }

    #[test]
    fn test_result_dropped_after_session_moves_on() {
        let mut session = session();
        let mut worker = ExtractionWorker::new().unwrap();

        worker.submit(session.extraction_job());
        let current = session.update(|c| c.set_zoom(2.5));

        assert!(worker.wait(&current).is_none());
        assert!(!worker.is_busy());
        assert!(worker.poll(&current).is_none());

        // A fresh submission for the new snapshot still surfaces
        worker.submit(session.extraction_job());
        let output = worker.wait(&current).expect("fresh result");
        assert_eq!(output.generation(), current.generation);
    }

    #[test]
    fn test_poll_drops_superseded_result() {
        let mut session = session();
        let mut worker = ExtractionWorker::new().unwrap();
        worker.submit(session.extraction_job());
        let current = session.update(|c| c.rotate_right());

        for _ in 0..200 {
            assert!(worker.poll(&current).is_none());
            if !worker.is_busy() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_cancel_discards_pending_work() {
        let session = session();
        let mut worker = ExtractionWorker::new().unwrap();
        worker.submit(session.extraction_job());
        worker.submit(session.extraction_job());
        worker.cancel();
        assert!(worker.wait(&session.snapshot()).is_none());
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_errors_are_delivered() {
        let mut worker = ExtractionWorker::new().unwrap();
        worker.submit(ExtractionJob {
            image: Arc::new(RasterImage::transparent(4, 4)),
            snapshot: CropSnapshot::default(),
            filter: InterpolationFilter::Bilinear,
        });
        let output = worker.wait(&CropSnapshot::default()).expect("result");
        assert_eq!(output.result, Err(ExtractionError::MissingCrop));
    }

    #[test]
    fn test_poll_eventually_returns_result() {
        let session = session();
        let mut worker = ExtractionWorker::new().unwrap();
        worker.submit(session.extraction_job());

        let mut output = None;
        for _ in 0..1000 {
            output = worker.poll(&session.snapshot());
            if output.is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(output.is_some());
    }

    #[test]
    fn test_drop_joins_thread() {
        let session = session();
        let mut worker = ExtractionWorker::new().unwrap();
        worker.submit(session.extraction_job());
        drop(worker);
    }
}
