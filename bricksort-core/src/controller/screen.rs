//! Text layouts for the operator display

use core::fmt::Write;

use heapless::String;

use crate::traits::{Display, DisplayError, Rgb};

/// Character columns of the display
pub const SCREEN_COLUMNS: usize = 21;

/// Centering width for the first line of a notice
pub const HEADLINE_WIDTH: usize = SCREEN_COLUMNS;

/// Centering width for the second line of a notice
///
/// Wider than the screen, which nudges short words right of the headline.
pub const DETAIL_WIDTH: usize = 25;

/// One formatted display line
pub type Line = String<32>;

/// Center `text` in a field of `width` columns
///
/// Only the left padding is emitted since the display prints left-aligned.
/// An odd margin puts the extra column on the left when `width` is odd.
/// Text wider than the field is kept as is.
pub fn centered(text: &str, width: usize) -> Line {
    let mut line = Line::new();
    let margin = width.saturating_sub(text.len());
    let pad = margin / 2 + (margin & width & 1);
    for _ in 0..pad {
        let _ = line.push(' ');
    }
    let _ = line.push_str(text);
    line
}

/// Manual-mode status screen
pub fn status_lines(vertical: bool, angles: [i32; 3], sample: Rgb) -> [Line; 6] {
    let mut lines: [Line; 6] = Default::default();
    let [x, y, z] = angles;
    let _ = write!(lines[1], "Z-axis mode: {}", vertical);
    let _ = write!(lines[2], "X-axis: {}", x);
    let _ = write!(lines[3], "Y-axis: {}", y);
    let _ = write!(lines[4], "Z-axis: {}", z);
    let _ = write!(lines[5], "Colors: ({}, {}, {})", sample.r, sample.g, sample.b);
    lines
}

/// Clear the screen and show a two-line message below a blank line
pub async fn show_notice<D: Display>(
    display: &mut D,
    first: &str,
    second: &str,
) -> Result<(), DisplayError> {
    display.clear().await?;
    display.print("").await?;
    display.print(first).await?;
    display.print(second).await
}

/// Clear the screen and print each line in order
pub async fn show_lines<D: Display>(display: &mut D, lines: &[&str]) -> Result<(), DisplayError> {
    display.clear().await?;
    for line in lines {
        display.print(line).await?;
    }
    Ok(())
}
