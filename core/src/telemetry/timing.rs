use crate::prelude::PipelineResult;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Writes one `"<thread_count> <elapsed_seconds>"` line to the given sink.
pub fn write_timing_entry<W: Write>(
    sink: &mut W,
    thread_count: usize,
    elapsed_seconds: f64,
) -> PipelineResult<()> {
    writeln!(sink, "{} {:.6}", thread_count, elapsed_seconds)?;
    Ok(())
}

/// Appends a timing entry to a text log, creating the file if needed.
pub fn append_timing_entry<P: AsRef<Path>>(
    path: P,
    thread_count: usize,
    elapsed_seconds: f64,
) -> PipelineResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;
    write_timing_entry(&mut file, thread_count, elapsed_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_entry_is_one_line_of_threads_and_seconds() {
        let mut sink = Vec::new();
        write_timing_entry(&mut sink, 4, 1.25).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "4 1.250000\n");
    }

    #[test]
    fn timing_entries_accumulate() {
        let mut sink = Vec::new();
        write_timing_entry(&mut sink, 1, 2.0).unwrap();
        write_timing_entry(&mut sink, 8, 0.5).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("1 2.000000\n"));
    }
}
