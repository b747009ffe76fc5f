//! Quadrature encoder task
//!
//! Wakes on every edge of either channel and publishes the decoded shaft
//! angle for the matching axis task.

use defmt::*;
use embassy_futures::select::select;
use embassy_rp::gpio::Input;
use portable_atomic::Ordering;

use bricksort_core::axis::Axis;
use bricksort_drivers::encoder::{EncoderConfig, QuadratureDecoder};

use crate::channels::{slot, ENCODER_DEGREES};

/// Encoder task for one gantry axis
#[embassy_executor::task(pool_size = 3)]
pub async fn encoder_task(
    axis: Axis,
    mut a: Input<'static>,
    mut b: Input<'static>,
    config: EncoderConfig,
) {
    info!("{} encoder task started", axis.name());

    let index = slot(axis);
    let mut decoder = QuadratureDecoder::new(config, a.is_high(), b.is_high());

    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;

        let glitches = decoder.glitches();
        if decoder.update(a.is_high(), b.is_high()) != 0 {
            ENCODER_DEGREES[index].store(decoder.degrees(), Ordering::Relaxed);
        } else if decoder.glitches() != glitches {
            debug!("{} encoder skipped a phase", axis.name());
        }
    }
}
