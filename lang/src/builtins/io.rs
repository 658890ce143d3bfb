use std::cell::RefCell;
use std::io::{self, Write};

use crate::error::RuntimeError;
use crate::value::Value;

thread_local! {
    static STDOUT: RefCell<Option<Box<dyn Write>>> = const { RefCell::new(None) };
}

/// Keyword options of `print`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintOptions {
    /// Written between objects (default `" "`)
    pub sep: String,
    /// Written after the last object (default `"\n"`)
    pub end: String,
    /// Flush the stream after writing (default `false`)
    pub flush: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            sep: " ".to_string(),
            end: "\n".to_string(),
            flush: false,
        }
    }
}

/// Sends this thread's `print` output to `writer` until
/// [`restore_stdout`] is called. Returns the previous redirection.
pub fn redirect_stdout(writer: Box<dyn Write>) -> Option<Box<dyn Write>> {
    STDOUT.with(|slot| slot.borrow_mut().replace(writer))
}

/// Removes the current redirection, handing the writer back.
pub fn restore_stdout() -> Option<Box<dyn Write>> {
    STDOUT.with(|slot| slot.borrow_mut().take())
}

/// print(*objects, sep=' ', end='\n', flush=False)
///
/// Writes to the redirected stream when one is installed, else to the
/// process stdout.
pub fn print(objects: &[Value], options: &PrintOptions) -> Result<(), RuntimeError> {
    STDOUT.with(|slot| match slot.borrow_mut().as_mut() {
        Some(writer) => print_to(writer.as_mut(), objects, options),
        None => print_to(&mut io::stdout().lock(), objects, options),
    })
}

/// Like [`print`] with an explicit stream.
pub fn print_to<W: Write + ?Sized>(
    out: &mut W,
    objects: &[Value],
    options: &PrintOptions,
) -> Result<(), RuntimeError> {
    let mut line = String::new();
    for (i, object) in objects.iter().enumerate() {
        if i > 0 {
            line.push_str(&options.sep);
        }
        line.push_str(&object.to_string());
    }
    line.push_str(&options.end);

    out.write_all(line.as_bytes())
        .map_err(RuntimeError::os_error)?;
    if options.flush {
        tracing::debug!(bytes = line.len(), "flushing print stream");
        out.flush().map_err(RuntimeError::os_error)?;
    }
    Ok(())
}
