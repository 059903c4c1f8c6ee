//! Interactive prompt for the download folder base name.

use std::{
    io::{self, BufRead, Write},
    path::Path,
};

use tracing::warn;

use crate::layout::folders_with_base;

/// Asks for the base name of the download folders until a non-empty one is given.
///
/// Warns, without refusing, when folders from an earlier run with the same
/// base name already exist under `root`.
///
/// # Errors
///
/// Returns `UnexpectedEof` if input ends before a name is entered.
pub fn prompt_base_name<R, W>(input: &mut R, output: &mut W, root: &Path) -> io::Result<String>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "Enter a base name for the download folders: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no folder name entered",
            ));
        }

        let name = line.trim();
        if name.is_empty() {
            writeln!(output, "Folder name cannot be empty.")?;
            continue;
        }

        match folders_with_base(root, name) {
            Ok(existing) if !existing.is_empty() => {
                writeln!(
                    output,
                    "Warning: folders with this base name already exist: {}",
                    existing.join(", ")
                )?;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not check for existing folders"),
        }

        return Ok(name.to_string());
    }
}
