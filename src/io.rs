//! Thin wrappers around file opens, so every error funnels through
//! [`CrackError`] instead of a bare [`std::io::Error`] with no file name.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{CrackError, Result};

/// Open `path` for reading, wrapped for [`crate::tuple::TupleStore::load`].
pub fn open_input(path: impl AsRef<Path>) -> Result<BufReader<File>> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| CrackError::io(format!("opening {}: {e}", path.display())))?;
    Ok(BufReader::new(file))
}

/// Create (or truncate) `path` for the result sink to append keys to.
pub fn create_output(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    File::create(path).map_err(|e| CrackError::io(format!("creating {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn open_input_reads_back_written_content() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "54e0cd 41db0c 543bd88000017550").unwrap();

        let mut reader = open_input(file.path()).unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line.trim(), "54e0cd 41db0c 543bd88000017550");
    }

    #[test]
    fn open_input_reports_a_missing_file_as_an_io_error() {
        let err = open_input("/nonexistent/path/does-not-exist").unwrap_err();
        assert_eq!(err.category(), "io");
        assert!(err.is_fatal());
    }

    #[test]
    fn create_output_truncates_an_existing_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "stale").unwrap();
        let mut out = create_output(file.path()).unwrap();
        writeln!(out, "fresh").unwrap();
        drop(out);
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "fresh\n");
    }
}
