//! Frame composition and display hand-off for the duoscope's 128×64 OLED.
//!
//! The main loop composes each frame with [`FrameComposer`] into the free
//! slot of a [`FrameSlots`] pair; the display side pushes the most recent
//! completed slot to the panel, either from a timer interrupt through
//! [`DisplayHandoff`] or from the async [`display_handoff_task`] through
//! [`OledDriver`].
//!
//! # Quick Start
//!
//! ```ignore
//! use duoscope_oled_display_rs::{FrameComposer, FrameSlots, DisplayConfig};
//!
//! let slots: &'static mut FrameSlots = SLOTS.init(FrameSlots::new());
//! let (mut producer, consumer) = slots.split();
//! let composer = FrameComposer::new(DisplayConfig::default());
//!
//! let driver = OledDriver::new(i2c, 0x3C);
//! spawner.spawn(oled_task(driver, consumer, DisplayConfig::default())).unwrap();
//!
//! loop {
//!     // ...step the UI...
//!     producer.compose(|frame| composer.compose(frame, &ui.view(), TRACE.grid()));
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`].
//! - **`task`** — enables [`display_handoff_task`] (requires
//!   `embassy-time`).

#![no_std]

pub mod compose;
#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod frame;
pub mod handoff;
pub mod slots;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use compose::{DisplayConfig, FrameComposer};
#[cfg(feature = "task")]
pub use display_task::display_handoff_task;
pub use driver::OledDriver;
pub use error::OledError;
pub use frame::{FrameBuffer, InvertTarget, FRAME_HEIGHT, FRAME_WIDTH};
pub use handoff::{DisplayHandoff, FrameTransport, HandoffOutcome, HandoffStats};
pub use slots::{FrameConsumer, FrameProducer, FrameSlots};
