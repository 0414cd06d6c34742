//! Background query worker for non-blocking data-layer calls.
//!
//! The similarity and term fetches are the only long operations in the
//! core; they run on this thread so the host's event loop never blocks
//! on the network. Requests queue through an `mpsc` channel; queued
//! similarity requests are coalesced to the newest one, since an older
//! seed's response would be discarded as stale anyway.

use std::sync::mpsc;

use crate::api::{FeatureApi, Seed, SimilarityResponse};
use crate::error::CrossviewError;

/// A unit of work for the query worker.
#[derive(Debug)]
pub enum QueryRequest {
    /// Cross-species similarity fetch, tagged with its request
    /// generation.
    Similarity {
        /// Monotonic generation assigned by the pipeline.
        generation: u64,
        /// Seed triple of the query.
        seed: Seed,
    },
    /// Neuro-semantic term fetch for the current seed.
    Terms {
        /// Seed triple of the query.
        seed: Seed,
    },
    /// Stop the worker thread.
    Shutdown,
}

/// A completed unit of work.
#[derive(Debug)]
pub enum QueryOutcome {
    /// Completed similarity fetch.
    Similarity {
        /// Generation the request carried.
        generation: u64,
        /// Seed triple of the query.
        seed: Seed,
        /// Parsed response or transport failure.
        result: Result<SimilarityResponse, CrossviewError>,
    },
    /// Completed term fetch.
    Terms {
        /// Term list or transport failure.
        result: Result<Vec<String>, CrossviewError>,
    },
}

/// Background thread owning the [`FeatureApi`] collaborator.
pub struct QueryWorker {
    request_tx: mpsc::Sender<QueryRequest>,
    outcome_rx: mpsc::Receiver<QueryOutcome>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl QueryWorker {
    /// Spawn the worker thread around a data-layer implementation.
    ///
    /// # Errors
    ///
    /// Returns [`CrossviewError::ThreadSpawn`] if the thread fails to
    /// spawn.
    pub fn new(api: Box<dyn FeatureApi>) -> Result<Self, CrossviewError> {
        let (request_tx, request_rx) = mpsc::channel::<QueryRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<QueryOutcome>();

        let thread = std::thread::Builder::new()
            .name("query-worker".into())
            .spawn(move || {
                Self::thread_loop(&request_rx, &outcome_tx, api.as_ref());
            })
            .map_err(CrossviewError::ThreadSpawn)?;

        Ok(Self {
            request_tx,
            outcome_rx,
            thread: Some(thread),
        })
    }

    /// Queue a request (non-blocking send).
    pub fn submit(&self, request: QueryRequest) {
        let _ = self.request_tx.send(request);
    }

    /// Drain all completed outcomes without blocking.
    pub fn drain_outcomes(&self) -> Vec<QueryOutcome> {
        self.outcome_rx.try_iter().collect()
    }

    /// Shut down the worker thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(QueryRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn thread_loop(
        request_rx: &mpsc::Receiver<QueryRequest>,
        outcome_tx: &mpsc::Sender<QueryOutcome>,
        api: &dyn FeatureApi,
    ) {
        while let Ok(request) = request_rx.recv() {
            for request in drain_coalesced(request, request_rx) {
                match request {
                    QueryRequest::Shutdown => return,
                    QueryRequest::Similarity { generation, seed } => {
                        let result = api.cross_species_similarity(seed);
                        let _ = outcome_tx.send(QueryOutcome::Similarity {
                            generation,
                            seed,
                            result,
                        });
                    }
                    QueryRequest::Terms { seed } => {
                        let result = api.neuro_terms(seed);
                        let _ =
                            outcome_tx.send(QueryOutcome::Terms { result });
                    }
                }
            }
        }
    }
}

impl Drop for QueryWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Drain queued requests, dropping every similarity request but the
/// newest.
///
/// Term requests and `Shutdown` are never dropped; a batch containing a
/// `Shutdown` stops at it.
fn drain_coalesced(
    initial: QueryRequest,
    rx: &mpsc::Receiver<QueryRequest>,
) -> Vec<QueryRequest> {
    let mut batch = vec![initial];
    while let Ok(newer) = rx.try_recv() {
        if matches!(newer, QueryRequest::Similarity { .. }) {
            batch.retain(|r| !matches!(r, QueryRequest::Similarity { .. }));
        }
        let stop = matches!(newer, QueryRequest::Shutdown);
        batch.push(newer);
        if stop {
            break;
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling::{Side, Species};

    fn seed(vertex: u32) -> Seed {
        Seed {
            species: Species::Human,
            side: Side::Left,
            vertex,
        }
    }

    fn similarity(generation: u64, vertex: u32) -> QueryRequest {
        QueryRequest::Similarity {
            generation,
            seed: seed(vertex),
        }
    }

    #[test]
    fn coalesces_to_newest_similarity() {
        let (tx, rx) = mpsc::channel();
        tx.send(similarity(2, 20)).unwrap();
        tx.send(QueryRequest::Terms { seed: seed(10) }).unwrap();
        tx.send(similarity(3, 30)).unwrap();

        let batch = drain_coalesced(similarity(1, 10), &rx);
        let generations: Vec<u64> = batch
            .iter()
            .filter_map(|r| match r {
                QueryRequest::Similarity { generation, .. } => {
                    Some(*generation)
                }
                _ => None,
            })
            .collect();
        assert_eq!(generations, vec![3]);
        assert!(batch
            .iter()
            .any(|r| matches!(r, QueryRequest::Terms { .. })));
    }

    #[test]
    fn shutdown_ends_the_batch() {
        let (tx, rx) = mpsc::channel();
        tx.send(QueryRequest::Shutdown).unwrap();
        tx.send(similarity(2, 20)).unwrap();

        let batch = drain_coalesced(similarity(1, 10), &rx);
        assert!(matches!(batch.last(), Some(QueryRequest::Shutdown)));
    }
}
