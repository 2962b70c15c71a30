//! Double-buffered frame hand-off between the composer and the display.
//!
//! [`FrameSlots`] owns two [`FrameBuffer`]s and an index naming the slot
//! that holds the most recently *completed* frame:
//!
//! ```text
//!                 ready = 1
//!                     │
//!   ┌──────────┐  ┌───▼──────┐
//!   │ slot 0   │  │ slot 1   │ ──► FrameConsumer (display)
//!   └────▲─────┘  └──────────┘
//!        │
//!   FrameProducer (main loop) composes into the slot that is NOT ready,
//!   then publishes it by flipping `ready`.
//! ```
//!
//! Each slot sits behind its own mutex, and both sides only ever
//! `try_lock`, so neither blocks the other. The producer never writes the
//! slot the consumer is reading: if its target is still locked (a push of
//! an older frame is in progress) it skips the frame.
//!
//! A transport that streams the frame after
//! [`push_ready()`](FrameConsumer::push_ready) returns keeps reading the
//! slot with no lock held. Such a slot is marked *in transport* until
//! [`transfer_complete()`](FrameConsumer::transfer_complete), and the
//! producer skips it as a target in the meantime.

use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

use crate::frame::FrameBuffer;

/// `ready` / `in_transport` value naming no slot.
const NONE: u8 = 2;

/// The two frame slots. See the module docs.
pub struct FrameSlots {
    slots: [Mutex<CriticalSectionRawMutex, FrameBuffer>; 2],
    ready: AtomicU8,
    in_transport: AtomicU8,
}

impl FrameSlots {
    pub const fn new() -> Self {
        Self {
            slots: [Mutex::new(FrameBuffer::new()), Mutex::new(FrameBuffer::new())],
            ready: AtomicU8::new(NONE),
            in_transport: AtomicU8::new(NONE),
        }
    }

    /// Hand out the single producer and the single consumer.
    pub fn split(&mut self) -> (FrameProducer<'_>, FrameConsumer<'_>) {
        let this: &Self = self;
        (
            FrameProducer {
                slots: this,
                published: 0,
                skipped: 0,
            },
            FrameConsumer { slots: this },
        )
    }

    fn ready_index(&self) -> Option<usize> {
        slot_index(self.ready.load(Ordering::Acquire))
    }

    fn in_transport(&self) -> Option<usize> {
        slot_index(self.in_transport.load(Ordering::Acquire))
    }
}

fn slot_index(raw: u8) -> Option<usize> {
    match raw {
        NONE => None,
        index => Some(usize::from(index)),
    }
}

impl Default for FrameSlots {
    fn default() -> Self {
        Self::new()
    }
}

/// Writing half, owned by the main loop.
pub struct FrameProducer<'a> {
    slots: &'a FrameSlots,
    published: u32,
    skipped: u32,
}

impl FrameProducer<'_> {
    /// Compose a frame into the free slot and publish it.
    ///
    /// Returns `false` (and composes nothing) if the free slot is still
    /// locked by the consumer or still being sent by the transport.
    pub fn compose(&mut self, render: impl FnOnce(&mut FrameBuffer)) -> bool {
        let target = match self.slots.ready_index() {
            Some(0) => 1,
            _ => 0,
        };

        if self.slots.in_transport() == Some(target) {
            return self.skip(target);
        }
        let Ok(mut frame) = self.slots.slots[target].try_lock() else {
            return self.skip(target);
        };
        render(&mut frame);
        drop(frame);

        self.slots.ready.store(target as u8, Ordering::Release);
        self.published = self.published.wrapping_add(1);
        true
    }

    fn skip(&mut self, _target: usize) -> bool {
        self.skipped = self.skipped.wrapping_add(1);
        #[cfg(feature = "defmt")]
        defmt::debug!("Frame slot {} busy, frame skipped", _target);
        false
    }

    /// Frames dropped because the free slot was busy.
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Frames published so far.
    pub fn published(&self) -> u32 {
        self.published
    }
}

/// Reading half, owned by the display hand-off.
pub struct FrameConsumer<'a> {
    slots: &'a FrameSlots,
}

impl FrameConsumer<'_> {
    /// Slot holding the latest completed frame, if any.
    pub fn ready_index(&self) -> Option<usize> {
        self.slots.ready_index()
    }

    /// Run `read` on the latest completed frame while holding its slot.
    ///
    /// Returns `None` if no frame has been published yet or the slot is
    /// momentarily locked.
    pub fn with_ready<R>(&mut self, read: impl FnOnce(&FrameBuffer) -> R) -> Option<R> {
        let index = self.ready_index()?;
        let frame = self.slots.slots[index].try_lock().ok()?;
        Some(read(&frame))
    }

    /// Start sending the latest completed frame.
    ///
    /// On success the slot stays reserved for the transport until
    /// [`transfer_complete()`](Self::transfer_complete), even though its
    /// lock is released when `push` returns.
    pub fn push_ready<E>(
        &mut self,
        push: impl FnOnce(&FrameBuffer) -> Result<(), E>,
    ) -> Option<Result<(), E>> {
        let index = self.ready_index()?;
        let frame = self.slots.slots[index].try_lock().ok()?;
        let result = push(&frame);
        if result.is_ok() {
            self.slots.in_transport.store(index as u8, Ordering::Release);
        }
        Some(result)
    }

    /// Release the slot reserved by the last successful
    /// [`push_ready()`](Self::push_ready).
    pub fn transfer_complete(&mut self) {
        self.slots.in_transport.store(NONE, Ordering::Release);
    }

    /// Slot still being sent by the transport, if any.
    pub fn in_transport(&self) -> Option<usize> {
        self.slots.in_transport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_ready_before_first_frame() {
        let mut slots = FrameSlots::new();
        let (_producer, mut consumer) = slots.split();
        assert_eq!(consumer.ready_index(), None);
        assert!(consumer.with_ready(|_| ()).is_none());
    }

    #[test]
    fn ready_index_flips_per_frame() {
        let mut slots = FrameSlots::new();
        let (mut producer, consumer) = slots.split();

        assert!(producer.compose(|f| f.set_pixel(0, 0, true)));
        assert_eq!(consumer.ready_index(), Some(0));
        assert!(producer.compose(|f| f.set_pixel(1, 0, true)));
        assert_eq!(consumer.ready_index(), Some(1));
        assert!(producer.compose(|_| {}));
        assert_eq!(consumer.ready_index(), Some(0));
        assert_eq!(producer.published(), 3);
    }

    #[test]
    fn consumer_sees_latest_completed_frame() {
        let mut slots = FrameSlots::new();
        let (mut producer, mut consumer) = slots.split();

        producer.compose(|f| {
            f.clear();
            f.set_pixel(3, 3, true);
        });
        assert_eq!(consumer.with_ready(|f| f.get_pixel(3, 3)), Some(true));
    }

    #[test]
    fn producer_never_writes_exposed_slot() {
        let mut slots = FrameSlots::new();
        let (mut producer, consumer) = slots.split();

        for _ in 0..5 {
            let exposed = consumer.ready_index();
            let slots_ref = &consumer;
            producer.compose(|_| {
                // While composing, the exposed slot is still the previous one.
                assert_eq!(slots_ref.ready_index(), exposed);
            });
            assert_ne!(consumer.ready_index(), exposed);
        }
    }

    #[test]
    fn busy_slot_skips_frame() {
        let mut slots = FrameSlots::new();
        let (mut producer, mut consumer) = slots.split();
        producer.compose(|_| {}); // ready = 0, next target = 1

        // The consumer holds slot 0 while the producer targets slot 1,
        // so composing still succeeds.
        let composed = consumer.with_ready(|_| producer.compose(|_| {}));
        assert_eq!(composed, Some(true));
        assert_eq!(consumer.ready_index(), Some(1));

        // Now slot 1 is ready and the producer's next target is slot 0.
        // Holding slot 0 (the target) forces a skip.
        let held = while_locked(&consumer, 0, || producer.compose(|_| {}));
        assert_eq!(held, Some(false));
        assert_eq!(producer.skipped(), 1);
        assert_eq!(consumer.ready_index(), Some(1));
    }

    #[test]
    fn slot_in_transport_is_not_overwritten() {
        let mut slots = FrameSlots::new();
        let (mut producer, mut consumer) = slots.split();
        producer.compose(|f| f.set_pixel(5, 5, true)); // ready = 0

        let pushed = consumer.push_ready(|f| if f.get_pixel(5, 5) { Ok(()) } else { Err(()) });
        assert_eq!(pushed, Some(Ok(())));
        assert_eq!(consumer.in_transport(), Some(0));

        // Slot 1 is free; slot 0 is still streaming with no lock held.
        assert!(producer.compose(|f| f.clear()));
        assert_eq!(consumer.ready_index(), Some(1));
        assert!(!producer.compose(|f| f.clear()));
        assert_eq!(producer.skipped(), 1);

        consumer.transfer_complete();
        assert_eq!(consumer.in_transport(), None);
        assert!(producer.compose(|_| {}));
        assert_eq!(consumer.ready_index(), Some(0));
    }

    #[test]
    fn failed_push_reserves_nothing() {
        let mut slots = FrameSlots::new();
        let (mut producer, mut consumer) = slots.split();
        producer.compose(|_| {});

        assert_eq!(consumer.push_ready(|_| Err::<(), _>(())), Some(Err(())));
        assert_eq!(consumer.in_transport(), None);
    }

    /// Hold slot `index` locked while running `f`.
    fn while_locked<R>(
        consumer: &FrameConsumer<'_>,
        index: usize,
        f: impl FnOnce() -> R,
    ) -> Option<R> {
        let _guard = consumer.slots.slots[index].try_lock().ok()?;
        Some(f())
    }
}
