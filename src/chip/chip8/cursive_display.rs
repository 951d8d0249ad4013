use cursive::{
    direction::Direction,
    event::{Event, EventResult},
    theme::{BaseColor, Color, ColorStyle},
    view::{CannotFocus, View},
    CbSink, Printer, Vec2,
};

use crate::chip::devices::Frame;

/// A cursive view showing a framebuffer, one terminal cell per pixel.
pub struct FrameView {
    frame: Frame,
}

impl FrameView {
    pub fn new(frame: Frame) -> Self {
        FrameView { frame }
    }

    /// Schedules `frame` to replace whatever the UI currently shows. Returns `false` once
    /// the UI is gone.
    pub fn push(frame: Frame, sink: &CbSink) -> bool {
        let view = FrameView::new(frame);
        sink.send(Box::new(move |s: &mut cursive::Cursive| {
            s.pop_layer();
            s.add_layer(view);
        }))
        .is_ok()
    }
}

impl Default for FrameView {
    /// A blank 64x32 frame.
    fn default() -> Self {
        FrameView::new(Frame {
            pixels: vec![0; 64 * 32 / 8],
            width: 64,
            height: 32,
        })
    }
}

/// Implements cursive::view::View for FrameView to enable drawing it
/// as a View out of the box.
impl View for FrameView {
    fn draw(&self, printer: &Printer) {
        printer.with_color(
            ColorStyle::new(Color::Dark(BaseColor::Black), Color::RgbLowRes(0, 0, 0)),
            |printer| {
                for y in 0..self.frame.height {
                    for x in 0..self.frame.width {
                        if self.frame.pixel(x, y) {
                            printer.print((x as usize, y as usize), " ");
                        }
                    }
                }
            },
        );
    }

    fn take_focus(&mut self, _: Direction) -> Result<EventResult, CannotFocus> {
        Ok(EventResult::Consumed(None))
    }

    fn on_event(&mut self, _event: Event) -> EventResult {
        EventResult::Ignored
    }

    fn required_size(&mut self, _: Vec2) -> Vec2 {
        Vec2 {
            x: self.frame.width as usize,
            y: self.frame.height as usize,
        }
    }
}
