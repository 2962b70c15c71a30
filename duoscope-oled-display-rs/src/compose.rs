//! Display layout and frame composition.
//!
//! This module defines [`DisplayConfig`] (the single source of layout
//! geometry) and [`FrameComposer`], which turns a [`UiView`] plus the trace
//! [`HitGrid`] into a complete [`FrameBuffer`] using `embedded-graphics`.
//!
//! [`UiView`]: duoscope::ui::UiView
//! [`HitGrid`]: duoscope::trace::HitGrid

use core::convert::Infallible;
use core::fmt::Write;

use duoscope::channel::{ChannelParameters, Field, FieldIndex, CHANNEL_NAMES, FIELD_LABELS};
use duoscope::trace::HitGrid;
use duoscope::ui::{SelectionRect, UiState, UiView, FIELD_RECTS};
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle, RoundedRectangle},
    text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder},
};
use heapless::String;

use crate::frame::{FrameBuffer, InvertTarget};

// ── DisplayConfig ────────────────────────────────────────────────────────

/// Display geometry and refresh rate.
///
/// [`DisplayConfig::default()`] reproduces the panel layout (128×64, label
/// column on the left, one value column per channel, 30 Hz).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Display refresh rate in Hz. Default: 30.
    pub update_frequency_hz: u32,

    // ── Field screen ─────────────────────────────────────────────────
    /// Total display width in pixels. Default: 128.
    pub display_width: u32,
    /// Total display height in pixels. Default: 64.
    pub display_height: u32,
    /// Width of the field-label column; a divider is drawn at this x.
    /// Default: 30.
    pub label_column_width: u32,
    /// x of the divider between the two channel columns. Default: 78.
    pub channel_split_x: u32,
    /// Height of the channel-name header; a divider is drawn at this y.
    /// Default: 15.
    pub header_height: u32,

    // ── Figure screen ────────────────────────────────────────────────
    /// Top-left corner of the XY plot border. Default: (33, 1).
    pub plot_origin: (i32, i32),
    /// Side length of the XY plot border. Default: 63.
    pub plot_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: 30,
            display_width: 128,
            display_height: 64,
            label_column_width: 30,
            channel_split_x: 78,
            header_height: 15,
            plot_origin: (33, 1),
            plot_size: 63,
        }
    }
}

impl DisplayConfig {
    /// Convert the configured frequency to a timer period in milliseconds.
    ///
    /// Formula: `1000 / update_frequency_hz` (a zero frequency is treated
    /// as 1 Hz).
    pub fn update_period_ms(&self) -> u64 {
        1000 / u64::from(self.update_frequency_hz.max(1))
    }
}

// ── Text helpers ─────────────────────────────────────────────────────────

/// Longest formatted field, `"6.0kHz*"`, with room to spare.
pub type FieldText = String<12>;

/// Format one field's value: `"1.0kHz"`, `"3.3V"` or `"15deg"`, with a
/// trailing `*` while it is being edited.
pub fn format_field(params: &ChannelParameters, field: Field, editing: bool) -> FieldText {
    let mut text = FieldText::new();
    let formatted = match field {
        Field::Frequency => write!(text, "{:.1}kHz", params.frequency_khz),
        Field::Amplitude => write!(text, "{:.1}V", params.amplitude_volts),
        Field::Phase => write!(text, "{}deg", params.phase_degrees),
    };
    formatted.ok();
    if editing {
        text.push('*').ok();
    }
    text
}

fn centered() -> TextStyle {
    TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build()
}

fn to_point((x, y): (f32, f32)) -> Point {
    Point::new(x as i32, y as i32)
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Draw the static part of the field screen.
///
/// # Layout
///
/// ```text
/// ┌────┬───────────┬───────────┐
/// │    │    CH1    │    CH2    │  ← header_height
/// ├────┼───────────┼───────────┤
/// │FRQ │  1.0kHz   │  1.0kHz   │
/// │AMP │  3.3V     │  3.3V     │
/// │PHS │  0deg     │  0deg     │
/// └────┴───────────┴───────────┘
///      ↑           ↑
///  label_column  channel_split_x
/// ```
pub fn render_background<D>(display: &mut D, config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let line_style = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

    let bottom = config.display_height as i32 - 1;
    let right = config.display_width as i32 - 1;
    let label_x = config.label_column_width as i32;
    let split_x = config.channel_split_x as i32;
    let header_y = config.header_height as i32;

    // ── Dividers ─────────────────────────────────────────────────────
    Line::new(Point::new(label_x, 0), Point::new(label_x, bottom))
        .into_styled(line_style)
        .draw(display)?;
    Line::new(Point::new(split_x, 0), Point::new(split_x, bottom))
        .into_styled(line_style)
        .draw(display)?;
    Line::new(Point::new(0, header_y), Point::new(right, header_y))
        .into_styled(line_style)
        .draw(display)?;

    // ── Channel headers ──────────────────────────────────────────────
    let header_centres = [(label_x + split_x) / 2, (split_x + right + 1) / 2];
    for (name, x) in CHANNEL_NAMES.iter().zip(header_centres) {
        Text::with_text_style(name, Point::new(x, header_y / 2), text_style, centered())
            .draw(display)?;
    }

    // ── Field labels, one per row ────────────────────────────────────
    for (row, label) in FIELD_LABELS.iter().enumerate() {
        let (_, y) = FIELD_RECTS[row * 2].center();
        Text::with_text_style(label, Point::new(label_x / 2, y as i32), text_style, centered())
            .draw(display)?;
    }

    Ok(())
}

/// Draw the six formatted values centred in their field rectangles.
pub fn render_fields<D>(display: &mut D, view: &UiView) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    for index in FieldIndex::ALL {
        let params = &view.channels[index.channel().index()];
        let editing = view.is_editing() && index == view.selected;
        let text = format_field(params, index.field(), editing);
        let centre = to_point(FIELD_RECTS[index.index()].center());
        Text::with_text_style(&text, centre, text_style, centered()).draw(display)?;
    }
    Ok(())
}

/// Invert the frame inside the rounded selection rectangle.
pub fn render_highlight(frame: &mut FrameBuffer, rect: &SelectionRect) {
    let (x0, y0, x1, y1, radius) = rect.pixel_bounds();
    let bounds = Rectangle::with_corners(Point::new(x0, y0), Point::new(x1, y1));
    let result = RoundedRectangle::with_equal_corners(bounds, Size::new(radius, radius))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut InvertTarget::new(frame));
    infallible(result);
}

/// Draw the XY plot border and its label.
pub fn render_figure_frame<D>(display: &mut D, config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let (x, y) = config.plot_origin;
    Rectangle::new(Point::new(x, y), Size::new(config.plot_size, config.plot_size))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display)?;

    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_text_style(
        "XY",
        Point::new(x / 2, config.display_height as i32 / 2),
        text_style,
        centered(),
    )
    .draw(display)?;
    Ok(())
}

/// Light every pixel with at least one trace hit.
pub fn render_trace(frame: &mut FrameBuffer, grid: &HitGrid) {
    grid.for_each_lit(|x, y| frame.set_pixel(x, y, true));
}

fn infallible(result: Result<(), Infallible>) {
    if let Err(never) = result {
        match never {}
    }
}

// ── FrameComposer ────────────────────────────────────────────────────────

/// Builds complete frames.
///
/// The field-screen background is rendered once at construction and copied
/// into every frame.
pub struct FrameComposer {
    config: DisplayConfig,
    background: FrameBuffer,
}

impl FrameComposer {
    pub fn new(config: DisplayConfig) -> Self {
        let mut background = FrameBuffer::new();
        infallible(render_background(&mut background, &config));
        Self { config, background }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn background(&self) -> &FrameBuffer {
        &self.background
    }

    /// Overwrite `frame` with the screen for `view`.
    ///
    /// - **Browse / Edit** — background, trace, values, then the highlight
    ///   inverted over the text.
    /// - **FigureView** — cleared frame, plot border, trace.
    pub fn compose(&self, frame: &mut FrameBuffer, view: &UiView, trace: &HitGrid) {
        match view.state {
            UiState::FigureView => {
                frame.clear();
                infallible(render_figure_frame(frame, &self.config));
                render_trace(frame, trace);
            }
            UiState::Browse | UiState::Edit => {
                frame.copy_from(&self.background);
                render_trace(frame, trace);
                infallible(render_fields(frame, view));
                render_highlight(frame, &view.highlight);
            }
        }
    }
}

impl Default for FrameComposer {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
