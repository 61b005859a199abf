//! Lock-free link between the control thread and the audio thread.
//!
//! Three single-producer/single-consumer rings connect the two sides:
//! commands flow to the audio thread, position events flow back, and
//! project snapshots the engine has let go of are handed back so the last
//! reference is never dropped on the audio thread.

use pt_engine::{Command, Engine, EngineEvent, EventSink};
use pt_ir::Project;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::Arc;

use crate::traits::AudioError;

/// Frames rendered per engine call when driving an interleaved device buffer.
pub const BLOCK_SIZE: usize = 256;

/// Create the two ends of an engine link.
///
/// `capacity` bounds each queue. The engine moves into the returned
/// [`RealtimeEngine`], which belongs on the audio thread.
pub fn engine_link(engine: Engine, capacity: usize) -> (ControlLink, RealtimeEngine) {
    let capacity = capacity.max(1);
    let (command_tx, command_rx) = HeapRb::<Command>::new(capacity).split();
    let (event_tx, event_rx) = HeapRb::<EngineEvent>::new(capacity).split();
    let (retired_tx, retired_rx) = HeapRb::<Arc<Project>>::new(capacity).split();

    let control = ControlLink {
        commands: command_tx,
        events: event_rx,
        retired: retired_rx,
    };
    let realtime = RealtimeEngine {
        engine,
        commands: command_rx,
        events: RingSink(event_tx),
        retired: retired_tx,
        scratch_left: vec![0.0; BLOCK_SIZE],
        scratch_right: vec![0.0; BLOCK_SIZE],
    };
    (control, realtime)
}

/// Event sink that pushes into a ring without blocking.
pub struct RingSink(HeapProd<EngineEvent>);

impl EventSink for RingSink {
    fn emit(&mut self, event: EngineEvent) -> bool {
        self.0.try_push(event).is_ok()
    }
}

/// Control-side end of the link.
pub struct ControlLink {
    commands: HeapProd<Command>,
    events: HeapCons<EngineEvent>,
    retired: HeapCons<Arc<Project>>,
}

impl ControlLink {
    /// Queue a command for the audio thread.
    pub fn send(&mut self, command: Command) -> Result<(), AudioError> {
        self.commands.try_push(command).map_err(|_| AudioError::QueueFull)
    }

    /// Next event from the audio thread, if any.
    pub fn poll_event(&mut self) -> Option<EngineEvent> {
        self.events.try_pop()
    }

    /// Commands not yet picked up by the audio thread.
    pub fn pending_commands(&self) -> usize {
        self.commands.occupied_len()
    }

    /// Drop project snapshots the engine has released. Returns how many.
    pub fn collect_retired(&mut self) -> usize {
        let mut count = 0;
        while self.retired.try_pop().is_some() {
            count += 1;
        }
        count
    }
}

/// Audio-thread end of the link: the engine plus its queues.
pub struct RealtimeEngine {
    engine: Engine,
    commands: HeapCons<Command>,
    events: RingSink,
    retired: HeapProd<Arc<Project>>,
    scratch_left: Vec<f32>,
    scratch_right: Vec<f32>,
}

impl RealtimeEngine {
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Apply every queued command.
    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.try_pop() {
            if let Some(old) = self.engine.handle_command(command, &mut self.events) {
                // With the ring full the snapshot is dropped here. The
                // control side must keep its own reference to every
                // snapshot it sends until `collect_retired` has run.
                let _ = self.retired.try_push(old);
            }
        }
    }

    /// Apply pending commands, then mix one block into planar buffers.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.drain_commands();
        self.engine.render_block(left, right, &mut self.events);
    }

    /// Fill an interleaved device buffer.
    ///
    /// The buffer is zeroed first. Channel 0 gets the left mix and channel
    /// 1 the right; further channels stay silent. A mono device gets the
    /// left mix.
    pub fn process_interleaved(&mut self, data: &mut [f32], channels: usize) {
        data.fill(0.0);
        if channels == 0 {
            return;
        }
        self.drain_commands();

        for chunk in data.chunks_mut(BLOCK_SIZE * channels) {
            let frames = chunk.len() / channels;
            let left = &mut self.scratch_left[..frames];
            let right = &mut self.scratch_right[..frames];
            left.fill(0.0);
            right.fill(0.0);
            self.engine.render_block(left, right, &mut self.events);

            for ((frame, l), r) in chunk.chunks_exact_mut(channels).zip(left.iter()).zip(right.iter()) {
                frame[0] = *l;
                if channels > 1 {
                    frame[1] = *r;
                }
            }
        }
    }
}
