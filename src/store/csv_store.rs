//! Comma-delimited record files with a fixed header row.

use super::{MalformedRow, MovieStore, TextEncoding};
use crate::error::StorageError;
use crate::movie::{Attribute, Movie, HEADER};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV-backed movie store.
#[derive(Debug, Clone)]
pub struct CsvStore {
    encoding: TextEncoding,
}

impl Default for CsvStore {
    fn default() -> Self {
        Self::new(TextEncoding::Utf8)
    }
}

impl CsvStore {
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
        // A BOM is tolerated whatever the configured encoding.
        let content = bytes.strip_prefix(BOM).unwrap_or(bytes);
        csv::ReaderBuilder::new().flexible(true).from_reader(content)
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Vec<Movie>, StorageError> {
        let mut reader = Self::reader(bytes);
        let mut movies = Vec::new();
        for row in reader.deserialize::<Movie>() {
            movies.push(row.map_err(|e| StorageError::csv(path, e))?);
        }
        Ok(movies)
    }

    fn parse_rows(
        &self,
        path: &Path,
        bytes: &[u8],
    ) -> Result<Vec<Result<Movie, MalformedRow>>, StorageError> {
        let mut reader = Self::reader(bytes);
        let headers = reader
            .byte_headers()
            .map_err(|e| StorageError::csv(path, e))?
            .clone();

        let mut rows = Vec::new();
        let mut record = csv::ByteRecord::new();
        while reader
            .read_byte_record(&mut record)
            .map_err(|e| StorageError::csv(path, e))?
        {
            let line = record.position().map_or(0, |p| p.line());
            match record.deserialize::<Movie>(Some(&headers)) {
                Ok(movie) => rows.push(Ok(movie)),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        line,
                        error = %e,
                        "Undecodable row"
                    );
                    rows.push(Err(MalformedRow {
                        line,
                        movie: lossy_movie(&headers, &record),
                        reason: format!("line {}: {}", line, e),
                    }));
                }
            }
        }
        Ok(rows)
    }

    fn write_rows<W: Write>(
        &self,
        path: &Path,
        out: W,
        header: bool,
        movies: &[Movie],
    ) -> Result<(), StorageError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out);
        if header {
            writer
                .write_record(HEADER)
                .map_err(|e| StorageError::csv(path, e))?;
        }
        for movie in movies {
            writer
                .write_record(movie.fields())
                .map_err(|e| StorageError::csv(path, e))?;
        }
        writer.flush().map_err(|e| StorageError::io(path, e))
    }
}

impl MovieStore for CsvStore {
    fn read(&self, path: &Path) -> Result<Vec<Movie>, StorageError> {
        match fs::read(path) {
            Ok(bytes) => self.parse(path, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn read_required(&self, path: &Path) -> Result<Vec<Movie>, StorageError> {
        match fs::read(path) {
            Ok(bytes) => self.parse(path, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn read_rows(&self, path: &Path) -> Result<Vec<Result<Movie, MalformedRow>>, StorageError> {
        match fs::read(path) {
            Ok(bytes) => self.parse_rows(path, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn write(&self, path: &Path, movies: &[Movie]) -> Result<(), StorageError> {
        let mut file = File::create(path).map_err(|e| StorageError::io(path, e))?;
        if self.encoding == TextEncoding::Utf8Sig {
            file.write_all(BOM).map_err(|e| StorageError::io(path, e))?;
        }
        self.write_rows(path, file, true, movies)?;
        tracing::debug!(path = %path.display(), rows = movies.len(), "Wrote record file");
        Ok(())
    }

    fn append(&self, path: &Path, movie: &Movie) -> Result<(), StorageError> {
        let existing_len = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => return Err(StorageError::io(path, e)),
        };
        if existing_len == 0 {
            return self.write(path, std::slice::from_ref(movie));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| StorageError::io(path, e))?;

        // Files written by other tools may end without a newline.
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|e| StorageError::io(path, e))?;
        if last[0] != b'\n' {
            file.write_all(b"\n").map_err(|e| StorageError::io(path, e))?;
        }

        self.write_rows(path, file, false, std::slice::from_ref(movie))
    }
}

/// Map each known column to its field, replacing invalid UTF-8.
fn lossy_movie(headers: &csv::ByteRecord, record: &csv::ByteRecord) -> Movie {
    let mut movie = Movie::default();
    for (name, field) in headers.iter().zip(record.iter()) {
        if let Some(pos) = HEADER.iter().position(|h| h.as_bytes() == name) {
            movie.set(Attribute::ALL[pos], String::from_utf8_lossy(field));
        }
    }
    movie
}
