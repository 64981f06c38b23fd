use crate::error::Result;
use crate::extractor::ListingRecord;
use std::fs;
use std::path::Path;

/// Write records as CSV: one header row from the record's field order, then
/// one line per record. Parent directories are created as needed. An empty
/// record set writes nothing and returns `false`; the caller owns the
/// "no data" diagnostic.
pub fn write_records(records: &[ListingRecord], output_path: &Path) -> Result<bool> {
    if records.is_empty() {
        return Ok(false);
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(output_path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_record(name: &str, price: &str) -> ListingRecord {
        ListingRecord {
            image_url: Some(format!("http://img.example/{}.png", name)),
            name: name.to_string(),
            quantity: "x10".to_string(),
            duration: "6 hours".to_string(),
            seller: "Kren".to_string(),
            faction: "Imperium".to_string(),
            price: price.to_string(),
            data_entry: Some("e-1".to_string()),
            data_id: Some("42".to_string()),
            data_name: Some(name.to_string()),
            data_type: Some("item".to_string()),
        }
    }

    #[test]
    fn test_empty_records_write_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");

        let wrote = write_records(&[], &path).unwrap();
        assert!(!wrote);
        assert!(!path.exists());
    }

    #[test]
    fn test_header_matches_field_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");

        write_records(&[sample_record("Blast Shard", "1,200 coins")], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, ListingRecord::field_names().join(","));
    }

    #[test]
    fn test_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");

        let records = vec![
            sample_record("Blast Shard", "1,200 coins"),
            sample_record("Void Crystal", "95 coins"),
            ListingRecord::default(),
        ];
        write_records(&records, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read_back: Vec<ListingRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        // The embedded comma in the price survives quoting; absent optional
        // fields come back as None.
        assert_eq!(read_back.len(), records.len());
        assert_eq!(read_back[0], records[0]);
        assert_eq!(read_back[1].price, "95 coins");
        assert!(read_back[2].image_url.is_none());
        assert_eq!(read_back[2].name, "Unknown");
    }

    #[test]
    fn test_parent_directories_created() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join("processed").join("out.csv");

        let wrote = write_records(&[sample_record("Blast Shard", "5 coins")], &path).unwrap();
        assert!(wrote);
        assert!(path.exists());
    }
}
