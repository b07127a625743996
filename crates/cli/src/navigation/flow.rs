//! Nested screens that take over the terminal until they produce a result.

use std::io::Write;

use arsenal_core::error::Result;

use super::draw::Canvas;
use super::types::{Key, Step};
use crate::terminal::Console;

/// A self-contained interactive screen.
pub trait Flow {
    type Output;

    /// Called before each frame with the current terminal size.
    fn set_size(&mut self, _size: (u16, u16)) {}

    fn handle(&mut self, key: Key) -> Step<Self::Output>;

    fn render<W: Write>(&self, canvas: &mut Canvas<'_, W>) -> Result<()>;
}

/// Drives `flow` until it finishes. `None` means the operator cancelled.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read from or drawn to.
pub fn run_flow<F, C, W>(flow: &mut F, console: &mut C, out: &mut W) -> Result<Option<F::Output>>
where
    F: Flow,
    C: Console,
    W: Write,
{
    loop {
        let size = console.size()?;
        flow.set_size(size);

        let mut canvas = Canvas::new(out, size)?;
        flow.render(&mut canvas)?;
        canvas.finish()?;

        let Some(key) = console.next_key()? else {
            continue;
        };

        match flow.handle(key) {
            Step::Continue => {}
            Step::Done(output) => return Ok(Some(output)),
            Step::Cancelled => return Ok(None),
        }
    }
}
