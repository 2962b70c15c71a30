//! Async display hand-off loop for executor-based targets.
//!
//! [`display_handoff_task`] is the async counterpart of
//! [`DisplayHandoff`](crate::DisplayHandoff): instead of a timer interrupt
//! and a DMA transport it wakes on an `embassy-time` timer and presents
//! frames through [`OledDriver`].

use embedded_hal_async::i2c::I2c;

use crate::compose::DisplayConfig;
use crate::driver::OledDriver;
use crate::frame::FrameBuffer;
use crate::slots::FrameConsumer;

// ── Display hand-off task ────────────────────────────────────────────────

/// Periodic display loop.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`. Callers
/// wrap it in a thin, concrete task, since Embassy tasks cannot be generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(
///     driver: OledDriver<MyConcreteI2cType>,
///     consumer: FrameConsumer<'static>,
///     config: DisplayConfig,
/// ) {
///     display_handoff_task(driver, consumer, config).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialise the panel.
/// 2. Loop at `config.update_frequency_hz`:
///    - **Step 1** — Copy the latest completed frame out of its slot
///      (`try_lock`, slot held only for the copy).
///    - **Step 2** — Skip if nothing is ready or the frame is unchanged.
///    - **Step 3** — Present it (~20 ms I2C, no slot held).
///
/// # Errors
///
/// * Initialisation failure: logs the error and **returns** (task exits).
/// * Present failure: logs the error and continues with the next tick.
#[allow(clippy::needless_pass_by_value)] // config is small and consumed
pub async fn display_handoff_task<I2C>(
    mut driver: OledDriver<I2C>,
    mut consumer: FrameConsumer<'static>,
    config: DisplayConfig,
) where
    I2C: I2c,
{
    // ── Initialisation ───────────────────────────────────────────────
    if let Err(_e) = driver.init().await {
        #[cfg(feature = "defmt")]
        defmt::error!("OLED init failed: {}", _e);
        return;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("OLED initialised");

    let period = embassy_time::Duration::from_millis(config.update_period_ms());
    let mut frame = FrameBuffer::new();
    let mut shown = FrameBuffer::new();
    let mut first = true;

    // ── Main loop ────────────────────────────────────────────────────
    loop {
        embassy_time::Timer::after(period).await;

        // ── Step 1: copy out the ready frame (slot held briefly) ─────
        if consumer.with_ready(|ready| frame.copy_from(ready)).is_none() {
            continue;
        }

        // ── Step 2: skip unchanged frames ────────────────────────────
        if !first && frame == shown {
            continue;
        }

        // ── Step 3: present (no slot held) ───────────────────────────
        if let Err(_e) = driver.present(&frame).await {
            #[cfg(feature = "defmt")]
            defmt::error!("Present failed: {}", _e);
            continue;
        }

        shown.copy_from(&frame);
        first = false;
    }
}
