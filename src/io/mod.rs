//! Reading and writing the pipeline's tabular artifacts.
//!
//! Input follows the extractor's schema, one row per publication
//! occurrence: `Authors`, `Title`, `Source title`, `Cited by`, `Link` and
//! an optional `Source ID`. `Year` is never read; it is recomputed from the
//! info text so stale columns cannot leak through. Outputs are the
//! deduplicated publications CSV (input columns plus `Year`) and the
//! two-column `Label` / `Replace by` thesaurus table, tab-separated. Both
//! outputs can alternatively be written as JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::models::{Publication, PublicationBuilder, MISSING_VALUE};
use crate::resolver::Thesaurus;

/// Errors reading or writing pipeline artifacts
#[derive(Debug, Error)]
pub enum IoError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),
}

const PUBLICATION_HEADER: [&str; 7] = [
    "Authors",
    "Title",
    "Year",
    "Source title",
    "Cited by",
    "Link",
    "Source ID",
];

/// Read publication records from the extractor's CSV.
///
/// `Authors` and `Title` columns must exist; all other fields fall back to
/// the missing-value sentinel. Comma-separated author lists (older scraper
/// output) are accepted and normalized to semicolons. Each record's year is
/// derived from its info text on the way in.
pub fn read_publications(path: &Path) -> Result<Vec<Publication>, IoError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let authors_idx = column("Authors").ok_or_else(|| IoError::MissingColumn("Authors".into()))?;
    let title_idx = column("Title").ok_or_else(|| IoError::MissingColumn("Title".into()))?;
    let info_idx = column("Source title");
    let cited_by_idx = column("Cited by");
    let link_idx = column("Link");
    let source_id_idx = column("Source ID");

    let field = |record: &csv::StringRecord, idx: Option<usize>| -> String {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| MISSING_VALUE.to_string())
    };

    let mut publications = Vec::new();
    for record in reader.records() {
        let record = record?;
        let authors = normalize_author_separators(&field(&record, Some(authors_idx)));

        publications.push(
            PublicationBuilder::new(field(&record, Some(title_idx)), authors)
                .info(field(&record, info_idx))
                .cited_by(field(&record, cited_by_idx))
                .link(field(&record, link_idx))
                .source_id(field(&record, source_id_idx))
                .build(),
        );
    }

    info!(records = publications.len(), path = %path.display(), "read publications");
    Ok(publications)
}

/// Write publications with their derived year, extractor column order
pub fn write_publications(path: &Path, publications: &[Publication]) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(PUBLICATION_HEADER)?;
    for publication in publications {
        writer.write_record([
            publication.authors.as_str(),
            publication.title.as_str(),
            publication.year.as_str(),
            publication.info.as_str(),
            publication.cited_by.as_str(),
            publication.link.as_str(),
            publication.source_id.as_str(),
        ])?;
    }
    writer.flush()?;

    info!(records = publications.len(), path = %path.display(), "wrote publications");
    Ok(())
}

/// Write publications as a pretty-printed JSON array
pub fn write_publications_json(path: &Path, publications: &[Publication]) -> Result<(), IoError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, publications)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(records = publications.len(), path = %path.display(), "wrote publications (json)");
    Ok(())
}

/// Write the thesaurus as a JSON object mapping labels to replacements
pub fn write_thesaurus_json(path: &Path, thesaurus: &Thesaurus) -> Result<(), IoError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, thesaurus)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(entries = thesaurus.len(), path = %path.display(), "wrote thesaurus (json)");
    Ok(())
}

/// Write the thesaurus as a two-column tab-separated table.
///
/// Names absent from the table are their own canonical form, so only
/// non-identity rows are written.
pub fn write_thesaurus(path: &Path, thesaurus: &Thesaurus) -> Result<(), IoError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    writer.write_record(["Label", "Replace by"])?;
    for (label, replace_by) in thesaurus.iter() {
        writer.write_record([label, replace_by])?;
    }
    writer.flush()?;

    info!(entries = thesaurus.len(), path = %path.display(), "wrote thesaurus");
    Ok(())
}

/// Read a thesaurus written by [`write_thesaurus`]
pub fn read_thesaurus(path: &Path) -> Result<Thesaurus, IoError> {
    let mut reader = csv::ReaderBuilder::new().delimiter(b'\t').from_path(path)?;
    let headers = reader.headers()?.clone();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let label_idx = column("Label").ok_or_else(|| IoError::MissingColumn("Label".into()))?;
    let replace_idx =
        column("Replace by").ok_or_else(|| IoError::MissingColumn("Replace by".into()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let (Some(label), Some(replace_by)) = (record.get(label_idx), record.get(replace_idx)) {
            rows.push((label.to_string(), replace_by.to_string()));
        }
    }
    Ok(Thesaurus::from_entries(rows))
}

/// The scraper joins authors with semicolons; older dumps used commas.
/// Rewrites comma separators only when no semicolon is present.
fn normalize_author_separators(authors: &str) -> String {
    if authors == MISSING_VALUE || authors.contains(';') {
        return authors.to_string();
    }
    authors.replace(',', ";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublicationBuilder;
    use tempfile::tempdir;

    #[test]
    fn test_read_publications() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("publications.csv");
        std::fs::write(
            &path,
            "Authors,Title,Source title,Cited by,Link,Source ID\n\
             иванов и.и.; петров п.п.,Заголовок,Журнал. 2020. С. 1-10.,3,https://example.org/1,-\n",
        )
        .unwrap();

        let publications = read_publications(&path).unwrap();
        assert_eq!(publications.len(), 1);
        assert_eq!(publications[0].authors, "иванов и.и.; петров п.п.");
        assert_eq!(publications[0].year, "2020");
        assert_eq!(publications[0].source_id, MISSING_VALUE);
    }

    #[test]
    fn test_read_publications_comma_separated_authors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("publications.csv");
        std::fs::write(
            &path,
            "Authors,Title,Source title,Cited by,Link,Source ID\n\
             \"иванов и.и., петров п.п.\",Заголовок,Журнал. 2020.,-,-,-\n",
        )
        .unwrap();

        let publications = read_publications(&path).unwrap();
        assert_eq!(publications[0].author_list(), vec!["иванов и.и.", "петров п.п."]);
    }

    #[test]
    fn test_read_publications_missing_required_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Title,Source title\nЗаголовок,Журнал\n").unwrap();

        match read_publications(&path) {
            Err(IoError::MissingColumn(column)) => assert_eq!(column, "Authors"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_read_publications_empty_fields_become_sentinel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("publications.csv");
        std::fs::write(
            &path,
            "Authors,Title,Source title,Cited by,Link,Source ID\n\
             иванов и.и.,Заголовок,,,,\n",
        )
        .unwrap();

        let publications = read_publications(&path).unwrap();
        assert_eq!(publications[0].info, MISSING_VALUE);
        assert_eq!(publications[0].cited_by, MISSING_VALUE);
        assert_eq!(publications[0].year, MISSING_VALUE);
    }

    #[test]
    fn test_publications_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("publications.csv");

        let records = vec![PublicationBuilder::new("Заголовок", "иванов и.и.")
            .info("Журнал. 2020.")
            .cited_by("3")
            .link("https://example.org/1")
            .build()];

        write_publications(&path, &records).unwrap();
        let loaded = read_publications(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_write_publications_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("publications.json");

        let records = vec![PublicationBuilder::new("Заголовок", "иванов и.и.")
            .info("Журнал. 2020.")
            .cited_by("3")
            .link("https://example.org/1")
            .build()];

        write_publications_json(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Vec<Publication> = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, records);
        assert_eq!(loaded[0].year, "2020");
    }

    #[test]
    fn test_write_thesaurus_json_is_plain_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thesaurus.json");

        let thesaurus = Thesaurus::from_entries([(
            "ivanov i.i.".to_string(),
            "иванов и.и.".to_string(),
        )]);

        write_thesaurus_json(&path, &thesaurus).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: std::collections::BTreeMap<String, String> =
            serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.get("ivanov i.i.").map(String::as_str), Some("иванов и.и."));

        let round_tripped: Thesaurus = serde_json::from_str(&content).unwrap();
        assert_eq!(round_tripped, thesaurus);
    }

    #[test]
    fn test_thesaurus_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thesaurus_authors.txt");

        let thesaurus = Thesaurus::from_entries([
            ("ivanov i.i.".to_string(), "иванов и.и.".to_string()),
            ("иванов и. и.".to_string(), "иванов и.и.".to_string()),
        ]);

        write_thesaurus(&path, &thesaurus).unwrap();
        let loaded = read_thesaurus(&path).unwrap();
        assert_eq!(loaded, thesaurus);
        assert_eq!(loaded.canonical("ivanov i.i."), "иванов и.и.");
    }
}
