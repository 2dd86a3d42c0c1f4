// crates/covid-core/src/loader/common_io.rs
use crate::error::{CovidError, Result};
use crate::model::DatasetKind;
use crate::raw::Dataset;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// Opens `path` buffered; `.gz` files are decoded when `compact` is enabled.
pub fn open_stream(path: &Path) -> std::io::Result<Box<dyn Read + Send>> {
    let reader = BufReader::new(File::open(path)?);

    #[cfg(feature = "compact")]
    {
        if path.extension().is_some_and(|ext| ext == "gz") {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
    }

    Ok(Box::new(reader))
}

/// Parses wide-format CSV into a [`Dataset`].
///
/// The first record is the header. Every record must have the header's
/// width; a ragged record fails the whole dataset.
pub fn read_dataset<R: Read>(reader: R, kind: DatasetKind) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| CovidError::load(kind, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut dataset = Dataset::new(kind, headers);
    for record in rdr.records() {
        let record = record.map_err(|e| CovidError::load(kind, e))?;
        dataset.push_values(record.iter().map(str::to_string).collect());
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_header_and_rows() {
        let csv = "\u{feff}Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n\
                   ,Italy,43,12,1,2\n\
                   Hubei,China,30,112,10,20\n";
        let ds = read_dataset(Cursor::new(csv), DatasetKind::Confirmed).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.headers[0], "Province/State");
        assert_eq!(ds.rows[1].get("1/23/20"), Some("20"));
        assert_eq!(ds.rows[0].province(), "");
    }

    #[test]
    fn ragged_record_is_a_load_failure() {
        let csv = "Province/State,Country/Region,Lat,Long,1/22/20\n,Italy,43,12\n";
        let err = read_dataset(Cursor::new(csv), DatasetKind::Deaths).unwrap_err();
        assert!(err.is_load_failure());
        assert!(err.to_string().contains("deaths"));
    }

    #[cfg(feature = "compact")]
    #[test]
    fn gz_files_are_decoded() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confirmed.csv.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(b"Province/State,Country/Region,Lat,Long,1/22/20\n,Peru,-9,-75,7\n")
            .unwrap();
        enc.finish().unwrap();

        let ds = read_dataset(open_stream(&path).unwrap(), DatasetKind::Confirmed).unwrap();
        assert_eq!(ds.rows[0].get("1/22/20"), Some("7"));
    }
}
