//! SH1106 OLED display driver
//!
//! Driver for 128x64 SH1106-based OLED displays via I2C. The frame buffer
//! is an embedded-graphics draw target; the [`Display`] implementation
//! turns it into a six-line text console (6x10 font, 21 columns) plus one
//! swatch page per brick color for the retrieval menu.

use core::convert::Infallible;
use core::fmt::Write;

use bricksort_core::color::{ColorLabel, COLOR_COUNT};
use bricksort_core::traits::{Display, DisplayError};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_hal_async::i2c::I2c;
use heapless::String;

/// SH1106 I2C address (typically 0x3C or 0x3D)
pub const SH1106_ADDR: u8 = 0x3C;

/// Display dimensions
const WIDTH: usize = 128;
const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// Console line height in pixels
const LINE_HEIGHT: usize = 10;

/// Text lines that fit on screen
pub const CONSOLE_ROWS: usize = HEIGHT / LINE_HEIGHT;

/// SH1106 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    /// Frame buffer (1 bit per pixel, organized as pages)
    buffer: [[u8; WIDTH]; PAGES],
    /// Next console row to print on
    row: usize,
}

impl<I2C: I2c> Sh1106<I2C> {
    /// Create a new SH1106 driver
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            buffer: [[0; WIDTH]; PAGES],
            row: 0,
        }
    }

    /// Initialize the display
    pub async fn init(&mut self) -> Result<(), DisplayError> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c).await?;
        }

        self.blank().await
    }

    /// Erase the frame buffer and the panel
    async fn blank(&mut self) -> Result<(), DisplayError> {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
        self.row = 0;
        self.flush().await
    }

    async fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(SH1106_ADDR, &[0x00, cmd])
            .await
            .map_err(|_| DisplayError::Bus)
    }

    /// Send pages `first..=last` of the frame buffer
    async fn flush_pages(&mut self, first: usize, last: usize) -> Result<(), DisplayError> {
        for page in first..=last.min(PAGES - 1) {
            self.command(cmd::SET_PAGE_ADDR | page as u8).await?;
            // SH1106 RAM is 132 columns wide; the panel starts at column 2
            self.command(cmd::SET_LOW_COLUMN | 2).await?;
            self.command(cmd::SET_HIGH_COLUMN).await?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = 0x40; // Data mode
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c
                .write(SH1106_ADDR, &data)
                .await
                .map_err(|_| DisplayError::Bus)?;
        }
        Ok(())
    }

    /// Send the whole frame buffer
    pub async fn flush(&mut self) -> Result<(), DisplayError> {
        self.flush_pages(0, PAGES - 1).await
    }

    /// Check if a pixel is lit in the frame buffer
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.buffer[y / 8][x] & (1 << (y % 8)) != 0
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let bit = 1 << (y % 8);
        if on {
            self.buffer[y / 8][x] |= bit;
        } else {
            self.buffer[y / 8][x] &= !bit;
        }
    }

    fn draw_swatch(&mut self, label: ColorLabel) {
        let title = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Top)
            .build();
        let name_style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        let _ = Text::with_text_style(label.name(), Point::new(64, 0), name_style, title)
            .draw(self);

        let frame = Rectangle::new(Point::new(24, 24), Size::new(80, 30));
        let _ = frame
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(self);
        let pattern = swatch_pattern(label);
        let inner = frame.offset(-2);
        let _ = self.draw_iter(
            inner
                .points()
                .map(|p| Pixel(p, BinaryColor::from(pattern(p.x, p.y)))),
        );

        let mut page: String<8> = String::new();
        let _ = write!(page, "{}/{}", label.index() + 1, COLOR_COUNT);
        let _ = Text::with_text_style(&page, Point::new(64, 55), small, title).draw(self);
    }
}

/// Fill pattern telling the colors apart on a monochrome panel
fn swatch_pattern(label: ColorLabel) -> fn(i32, i32) -> bool {
    match label {
        ColorLabel::Red => |_, _| true,
        ColorLabel::Blue => |_, y| y % 4 < 2,
        ColorLabel::Green => |x, _| x % 4 < 2,
        ColorLabel::Yellow => |x, y| (x / 3 + y / 3) % 2 == 0,
        ColorLabel::LightGreen => |x, y| (x + y) % 6 < 2,
        ColorLabel::Orange => |x, y| x % 4 == 0 && y % 4 == 0,
    }
}

impl<I2C> OriginDimensions for Sh1106<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C: I2c> DrawTarget for Sh1106<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                if x < WIDTH && y < HEIGHT {
                    self.set_pixel(x, y, color.is_on());
                }
            }
        }
        Ok(())
    }
}

impl<I2C: I2c> Display for Sh1106<I2C> {
    async fn clear(&mut self) -> Result<(), DisplayError> {
        self.blank().await
    }

    async fn print(&mut self, line: &str) -> Result<(), DisplayError> {
        if self.row >= CONSOLE_ROWS {
            return Err(DisplayError::ScreenFull);
        }

        let top = self.row * LINE_HEIGHT;
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let _ = Text::with_baseline(line, Point::new(0, top as i32), style, Baseline::Top)
            .draw(self);
        self.row += 1;

        self.flush_pages(top / 8, (top + LINE_HEIGHT - 1) / 8).await
    }

    async fn load_image(&mut self, image: ColorLabel) -> Result<(), DisplayError> {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
        self.draw_swatch(image);
        self.row = 0;
        self.flush().await
    }
}
