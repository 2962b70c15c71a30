//! Acquisition timer interrupt service.

use duoscope::trace::{TraceAccumulator, TraceMapping, TracePoint, DEFAULT_TRACE_CAPACITY};
use duoscope::transfer::{AcquisitionDriver, AcquisitionStream};
use duoscope::TransferError;

/// Feeds the persistence trace from the acquisition stream.
///
/// Owned by the acquisition interrupt; the trace is shared with the main
/// loop through `&'a` (typically a `static`).
pub struct AcquisitionService<'a, A, const M: usize = DEFAULT_TRACE_CAPACITY> {
    stream: AcquisitionStream<A>,
    mapping: TraceMapping,
    trace: &'a TraceAccumulator<M>,
}

impl<'a, A, const M: usize> AcquisitionService<'a, A, M>
where
    A: AcquisitionDriver,
{
    pub fn new(driver: A, mapping: TraceMapping, trace: &'a TraceAccumulator<M>) -> Self {
        Self {
            stream: AcquisitionStream::new(driver),
            mapping,
            trace,
        }
    }

    /// Start sampling both inputs.
    pub fn start(&mut self, sample_rate_hz: u32) -> Result<(), TransferError<A::Error>> {
        self.stream.configure(sample_rate_hz)
    }

    /// Handle one acquisition timer period: land the newest pair, map it
    /// and add it to the trace.
    pub fn on_timer(&mut self) -> TracePoint {
        let pair = self.stream.tick();
        let point = self.mapping.map(pair);
        self.trace.insert(point);
        point
    }

    pub fn stream(&self) -> &AcquisitionStream<A> {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut AcquisitionStream<A> {
        &mut self.stream
    }
}
