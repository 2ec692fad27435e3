/// Asynchronous pipeline-statistics readback
///
/// A ring of K queries brackets one draw per frame. Frame `n` uses slot
/// `n % K`. Results are consumed strictly in issue order: polling stops at
/// the first slot whose data is not ready and never skips ahead.
///
/// A slot is only reissued after its previous result was read. When all K
/// slots are waiting for the GPU, `begin_frame_query` declines and the
/// frame goes unmeasured instead of overwriting an unread slot.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    CommandList, GraphicsDevice, PipelineStatistics, Query, QueryData, QueryDesc, QueryKind,
};

/// Lifecycle of one ring slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Free, or its last result was consumed
    Idle,
    /// `begin_query` recorded, bracket still open
    Issued,
    /// `end_query` recorded, result not read yet
    AwaitingResult,
}

struct QuerySlot {
    query: Arc<dyn Query>,
    state: SlotState,
}

pub struct AsyncQueryReader {
    slots: Vec<QuerySlot>,
    /// Frames whose query was begun (next frame number)
    frames_issued: u64,
    /// Frames whose result was consumed
    frames_completed: u64,
    /// Divisor turning assembled primitives into instances
    primitives_per_instance: u64,
    instances_drawn: Option<u64>,
    last_statistics: Option<PipelineStatistics>,
    /// Set while the ring is full, so the warning fires once per episode
    saturated: bool,
}

impl AsyncQueryReader {
    /// Create `ring_size` pipeline-statistics queries.
    ///
    /// `primitives_per_instance` is the primitive count of one drawn
    /// instance (12 for a cube).
    pub fn new(device: &mut dyn GraphicsDevice, ring_size: usize, primitives_per_instance: u32) -> Result<Self> {
        if ring_size == 0 {
            crate::engine_bail!("boxcull::AsyncQueryReader", InvalidConfig, "query ring cannot be empty");
        }
        if primitives_per_instance == 0 {
            crate::engine_bail!(
                "boxcull::AsyncQueryReader",
                InvalidConfig,
                "primitives_per_instance must be non-zero"
            );
        }

        let mut slots = Vec::with_capacity(ring_size);
        for index in 0..ring_size {
            let query = device.create_query(QueryDesc {
                label: format!("pipeline_statistics_{}", index),
                kind: QueryKind::PipelineStatistics,
            })?;
            slots.push(QuerySlot { query, state: SlotState::Idle });
        }

        crate::engine_debug!("boxcull::AsyncQueryReader", "created {} query slots", ring_size);

        Ok(Self {
            slots,
            frames_issued: 0,
            frames_completed: 0,
            primitives_per_instance: primitives_per_instance as u64,
            instances_drawn: None,
            last_statistics: None,
            saturated: false,
        })
    }

    /// Number of slots (K)
    pub fn ring_size(&self) -> usize {
        self.slots.len()
    }

    /// Frames begun so far
    pub fn current_frame(&self) -> u64 {
        self.frames_issued
    }

    /// Frames whose result has been consumed, never above `current_frame`
    pub fn last_completed_frame(&self) -> u64 {
        self.frames_completed
    }

    /// Queries begun but not read yet, never above K
    pub fn outstanding(&self) -> usize {
        (self.frames_issued - self.frames_completed) as usize
    }

    /// Instances drawn in the most recent completed frame
    pub fn instances_drawn(&self) -> Option<u64> {
        self.instances_drawn
    }

    /// Raw counters of the most recent completed frame
    pub fn last_statistics(&self) -> Option<PipelineStatistics> {
        self.last_statistics
    }

    /// State of ring slot `slot`
    pub fn slot_state(&self, slot: usize) -> Option<SlotState> {
        self.slots.get(slot).map(|s| s.state)
    }

    /// True while a bracket is open
    pub fn is_open(&self) -> bool {
        self.slots.iter().any(|slot| slot.state == SlotState::Issued)
    }

    /// Open the query of the next frame.
    ///
    /// Returns `Ok(false)` when the ring is saturated; the caller draws
    /// without a measurement and must not call `end_frame_query`.
    pub fn begin_frame_query(&mut self, ctx: &mut dyn CommandList) -> Result<bool> {
        if self.is_open() {
            crate::engine_bail!(
                "boxcull::AsyncQueryReader",
                InvalidResource,
                "frame {} query is still open",
                self.frames_issued.saturating_sub(1)
            );
        }

        let index = self.slot_index(self.frames_issued);
        if self.outstanding() >= self.slots.len() || self.slots[index].state != SlotState::Idle {
            if !self.saturated {
                crate::engine_warn!(
                    "boxcull::AsyncQueryReader",
                    "all {} query slots awaiting results, skipping measurement of frame {}",
                    self.slots.len(),
                    self.frames_issued
                );
                self.saturated = true;
            }
            return Ok(false);
        }

        let slot = &mut self.slots[index];
        ctx.begin_query(&slot.query)?;
        slot.state = SlotState::Issued;
        self.frames_issued += 1;
        self.saturated = false;

        crate::engine_trace!("boxcull::AsyncQueryReader", "frame {} issued on slot {}", self.frames_issued - 1, index);
        Ok(true)
    }

    /// Close the bracket opened by `begin_frame_query`.
    ///
    /// If the device rejects the end, the frame goes unmeasured: the slot
    /// returns to `Idle` and its frame number is reused by the next begin.
    pub fn end_frame_query(&mut self, ctx: &mut dyn CommandList) -> Result<()> {
        let Some(index) = self.slots.iter().position(|slot| slot.state == SlotState::Issued) else {
            crate::engine_bail!("boxcull::AsyncQueryReader", InvalidResource, "no frame query is open");
        };
        if let Err(error) = ctx.end_query(&self.slots[index].query) {
            self.slots[index].state = SlotState::Idle;
            self.frames_issued -= 1;
            crate::engine_warn!(
                "boxcull::AsyncQueryReader",
                "frame {} left unmeasured: {}",
                self.frames_issued,
                error
            );
            return Err(error);
        }
        self.slots[index].state = SlotState::AwaitingResult;
        Ok(())
    }

    /// Consume every finished result in issue order, without blocking.
    ///
    /// Stops at the first slot that is not ready. Returns how many frames
    /// completed during this call.
    pub fn poll_completed(&mut self, ctx: &mut dyn CommandList) -> Result<usize> {
        let mut completed = 0;

        while self.frames_completed < self.frames_issued {
            let index = self.slot_index(self.frames_completed);
            let slot = &mut self.slots[index];
            if slot.state != SlotState::AwaitingResult {
                // Oldest frame is still recording
                break;
            }

            let statistics = match ctx.query_data(&slot.query)? {
                QueryData::NotReady => break,
                QueryData::PipelineStatistics(statistics) => statistics,
            };

            slot.state = SlotState::Idle;
            self.instances_drawn = Some(statistics.ia_primitives / self.primitives_per_instance);
            self.last_statistics = Some(statistics);
            self.frames_completed += 1;
            completed += 1;
        }

        Ok(completed)
    }

    fn slot_index(&self, frame: u64) -> usize {
        (frame % self.slots.len() as u64) as usize
    }
}

#[cfg(test)]
#[path = "query_reader_tests.rs"]
mod tests;
