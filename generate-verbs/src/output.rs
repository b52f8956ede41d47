use anyhow::Context as _;
use std::io::{BufWriter, Write as _};
use std::path::Path;
use verb_utils::VerbRecord;

/// Writes the dataset as a pretty-printed JSON array.
///
/// The file is written next to its destination and renamed over it, so readers
/// never see a half-written dataset.
pub fn write_verbs_file(records: &[VerbRecord], output_path: &Path) -> anyhow::Result<()> {
    let dir = crate::download::parent_dir(output_path);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let file = tempfile::NamedTempFile::new_in(dir)
        .context("Failed to create temporary output file")?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush output file")?;

    file.persist(output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verb_utils::{Group, expected_conjugation};

    fn record(infinitive: &str, regular: bool) -> VerbRecord {
        let group = Group::from_infinitive(infinitive);
        VerbRecord {
            infinitive: infinitive.to_string(),
            translation: "to do something".to_string(),
            regular,
            group,
            tenses: expected_conjugation(infinitive, group),
        }
    }

    #[test]
    fn test_write_verbs_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("data").join("verbs.json");
        let records = vec![record("dormir", true), record("parlar", true)];

        write_verbs_file(&records, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"infinitive\": \"dormir\""));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["group"], "ar");
        assert_eq!(value[1]["tenses"]["present"]["jo"], "parlo");
        assert_eq!(value[0]["tenses"]["future"]["ells"], "dormiran");
    }

    #[test]
    fn test_overwrites_previous_dataset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("verbs.json");
        std::fs::write(&path, "stale").unwrap();

        write_verbs_file(&[record("parlar", false)], &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["regular"], false);
        // only the destination remains in the directory
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_empty_dataset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("verbs.json");
        write_verbs_file(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
