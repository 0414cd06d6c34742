//! The double-click → similarity → recolor pipeline.
//!
//! A resolved gesture becomes a seed triple, the seed becomes a tagged
//! similarity request on the worker thread, and the response fans out to
//! every viewer's color buffer as one synchronous batch. Responses
//! carrying a stale generation are discarded, so overlapping gestures
//! resolve to the newest seed rather than racing on arrival order.

mod worker;

pub use worker::{QueryOutcome, QueryRequest, QueryWorker};

use crate::api::{FeatureApi, Seed, SimilarityResponse};
use crate::error::CrossviewError;
use crate::input::MeshHit;
use crate::notify::Notifier;
use crate::scaling::{Side, Species};
use crate::viewer::ViewerHandle;

/// Drives one similarity query from gesture to applied colors.
///
/// The dependent term lookup shares the seed but is fired independently:
/// its failure is logged and ignored, never blocking the color update.
pub struct SimilarityUpdatePipeline {
    worker: QueryWorker,
    generation: u64,
    seed: Option<Seed>,
    terms: Vec<String>,
}

impl SimilarityUpdatePipeline {
    /// Spawn the pipeline's query worker around a data layer.
    ///
    /// # Errors
    ///
    /// [`CrossviewError::ThreadSpawn`] if the worker thread fails to
    /// spawn.
    pub fn new(api: Box<dyn FeatureApi>) -> Result<Self, CrossviewError> {
        Ok(Self {
            worker: QueryWorker::new(api)?,
            generation: 0,
            seed: None,
            terms: Vec::new(),
        })
    }

    /// Resolve a double-click into a seed and issue its similarity query.
    ///
    /// The resolved triple becomes the session seed immediately; the
    /// fetch completes asynchronously and lands via [`Self::poll`].
    ///
    /// # Errors
    ///
    /// [`CrossviewError::NoVertexSelected`] when the gesture missed the
    /// mesh; no state is mutated.
    pub fn begin(
        &mut self,
        species: Species,
        side: Side,
        hit: Option<MeshHit>,
    ) -> Result<Seed, CrossviewError> {
        let vertex = hit
            .ok_or(CrossviewError::NoVertexSelected)?
            .picked_vertex();
        let seed = Seed {
            species,
            side,
            vertex,
        };
        self.seed = Some(seed);
        self.generation += 1;
        self.worker.submit(QueryRequest::Similarity {
            generation: self.generation,
            seed,
        });
        log::debug!(
            "similarity query gen {} seeded at {}_{} vertex {}",
            self.generation,
            species,
            side,
            vertex
        );
        Ok(seed)
    }

    /// Drain completed fetches and apply them.
    ///
    /// Called by the host once per event-loop turn. All viewer mutation
    /// for one response happens inside this call as a single batch; no
    /// partially-updated viewer state is ever observable.
    ///
    /// # Errors
    ///
    /// Configuration defects only (response missing a viewer's key, or
    /// an array of the wrong length); recoverable failures are reported
    /// through `notifier`. On any error no viewer is mutated.
    pub fn poll(
        &mut self,
        viewers: &mut [ViewerHandle],
        notifier: &dyn Notifier,
    ) -> Result<(), CrossviewError> {
        for outcome in self.worker.drain_outcomes() {
            match outcome {
                QueryOutcome::Similarity {
                    generation,
                    seed,
                    result,
                } => {
                    if generation != self.generation {
                        log::debug!(
                            "discarding stale similarity response \
                             (gen {generation}, latest {})",
                            self.generation
                        );
                        continue;
                    }
                    self.handle_similarity(viewers, seed, result, notifier)?;
                }
                QueryOutcome::Terms { result } => match result {
                    Ok(terms) => self.terms = terms,
                    Err(e) => log::warn!("term lookup failed: {e}"),
                },
            }
        }
        Ok(())
    }

    fn handle_similarity(
        &mut self,
        viewers: &mut [ViewerHandle],
        seed: Seed,
        result: Result<SimilarityResponse, CrossviewError>,
        notifier: &dyn Notifier,
    ) -> Result<(), CrossviewError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log::warn!("similarity fetch failed: {e}");
                notifier.error(&e.user_message());
                return Ok(());
            }
        };

        // Midline/boundary vertices have no defined mapping; the backend
        // encodes that as an all-zero response.
        if response.is_all_zero() {
            notifier
                .error(&CrossviewError::MidlineVertex.user_message());
            return Ok(());
        }

        apply_response(viewers, &response)?;

        // Same seed, independent lifecycle: the annotation fetch must
        // never block or roll back the color update.
        self.worker.submit(QueryRequest::Terms { seed });
        Ok(())
    }

    /// The currently displayed seed triple, if any query has resolved a
    /// vertex this session.
    #[must_use]
    pub const fn seed(&self) -> Option<Seed> {
        self.seed
    }

    /// Latest neuro-semantic terms for the seed vertex.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Recolor every viewer from one response as a single batch.
///
/// Validates the whole response first — every viewer's key present, every
/// array matching its vertex count — so a malformed response mutates
/// nothing.
fn apply_response(
    viewers: &mut [ViewerHandle],
    response: &SimilarityResponse,
) -> Result<(), CrossviewError> {
    let mut batches = Vec::with_capacity(viewers.len());
    for viewer in viewers.iter() {
        let key = viewer.key();
        let values = response
            .values_for(key)
            .ok_or_else(|| CrossviewError::MissingSurfaceKey(key.to_string()))?;
        if values.len() != viewer.surface().vertex_count() {
            return Err(CrossviewError::IntensityLength {
                expected: viewer.surface().vertex_count(),
                got: values.len(),
            });
        }
        batches.push(values);
    }
    for (viewer, values) in viewers.iter_mut().zip(batches) {
        viewer.set_intensity(values)?;
    }
    Ok(())
}
