use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes one candidate per line, creating parent directories as needed.
///
/// `on_write` sees the running count after every line. Returns the number of
/// lines written.
pub fn write_wordlist<I, F>(path: &Path, candidates: I, mut on_write: F) -> io::Result<usize>
where
    I: IntoIterator<Item = String>,
    F: FnMut(usize),
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    let mut written = 0;
    for candidate in candidates {
        out.write_all(candidate.as_bytes())?;
        out.write_all(b"\n")?;
        written += 1;
        on_write(written);
    }
    out.flush()?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_one_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("wordlist.txt");

        let mut ticks = Vec::new();
        let written = write_wordlist(
            &path,
            ["john1990", "John1990"].map(String::from),
            |n| ticks.push(n),
        )
        .unwrap();

        assert_eq!(written, 2);
        assert_eq!(ticks, [1, 2]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "john1990\nJohn1990\n");
    }

    #[test]
    fn test_empty_sequence_creates_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");

        let written = write_wordlist(&path, Vec::new(), |_| {}).unwrap();

        assert_eq!(written, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wordlist.txt");
        fs::write(&path, "stale\nlines\nhere\n").unwrap();

        write_wordlist(&path, vec!["fresh".to_string()], |_| {}).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }
}
