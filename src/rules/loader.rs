use super::RuleBase;
use crate::error::RuleError;
use std::{fs, path::Path};
use toml_edit::{DocumentMut, value};
use tracing::info;

/// Read and validate a rule base file.
pub fn load(path: impl AsRef<Path>) -> Result<RuleBase, RuleError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| RuleError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let rules: RuleBase = toml::from_str(&content).map_err(|source| RuleError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    rules.validate()?;

    info!(
        path = %path.display(),
        mapping_rules = rules.type_mapping.len(),
        sections = rules.linear_weight.len(),
        assemblies = rules.assembly_weight.len(),
        density = rules.parameters.density,
        "Rule base loaded"
    );
    Ok(rules)
}

/// Like [`load`], but falls back to the seed rule base when the file does not exist.
pub fn load_or_seed(path: impl AsRef<Path>) -> Result<RuleBase, RuleError> {
    let path = path.as_ref();
    if path.exists() {
        load(path)
    } else {
        info!(path = %path.display(), "No rule base file — using seed rules");
        Ok(RuleBase::default())
    }
}

/// Write the whole rule base, replacing any existing file.
pub fn save(path: impl AsRef<Path>, rules: &RuleBase) -> Result<(), RuleError> {
    let path = path.as_ref();
    rules.validate()?;
    let content = toml::to_string_pretty(rules)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    info!(path = %path.display(), "Rule base exported");
    Ok(())
}

/// Change the material density in an existing rule file, keeping the rest of
/// the document (comments, ordering) as written.
pub fn set_density(path: impl AsRef<Path>, density: f64) -> Result<(), RuleError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| RuleError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let mut doc = content.parse::<DocumentMut>()?;

    let params = doc
        .entry("parameters")
        .or_insert(toml_edit::table());
    let Some(params) = params.as_table_like_mut() else {
        return Err(RuleError::Invalid(
            "'parameters' must be a table".to_string(),
        ));
    };
    params.insert("density", value(density));

    let updated = doc.to_string();
    let rules: RuleBase = toml::from_str(&updated).map_err(|source| RuleError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    rules.validate()?;

    fs::write(path, updated)?;
    info!(path = %path.display(), density, "Density updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_tables_are_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(
            &path,
            r#"
[[linear_weight]]
section = "50x50"
weight_per_meter = 2.2691
"#,
        )
        .unwrap();

        let rules = load(&path).unwrap();
        assert!(rules.type_mapping.is_empty());
        assert!(rules.assembly_weight.is_empty());
        assert_eq!(rules.linear_weight.len(), 1);
        assert_eq!(rules.parameters.density, 7.85);
    }

    #[test]
    fn test_entry_missing_field_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(
            &path,
            r#"
[[type_mapping]]
text_fragment = "CHAPA"
"#,
        )
        .unwrap();

        assert!(matches!(load(&path), Err(RuleError::Parse { .. })));
    }

    #[test]
    fn test_save_then_load_preserves_rule_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("rules.toml");
        let seed = RuleBase::default();

        save(&path, &seed).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, seed);
    }

    #[test]
    fn test_shipped_rule_file_matches_seed() {
        let rules = load(concat!(env!("CARGO_MANIFEST_DIR"), "/rules/base.toml")).unwrap();
        assert_eq!(rules, RuleBase::default());
    }

    #[test]
    fn test_load_or_seed_without_file() {
        let dir = tempdir().unwrap();
        let rules = load_or_seed(dir.path().join("absent.toml")).unwrap();
        assert_eq!(rules, RuleBase::default());
    }

    #[test]
    fn test_set_density_keeps_comments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(
            &path,
            r#"# shop rules
[parameters]
density = 7.85

[[type_mapping]]
text_fragment = "CHAPA" # sheets
type_label = "CH_PLANA"
"#,
        )
        .unwrap();

        set_density(&path, 2.7).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("# shop rules"));
        assert!(text.contains("# sheets"));
        let rules = load(&path).unwrap();
        assert_eq!(rules.parameters.density, 2.7);
        assert_eq!(rules.type_mapping.len(), 1);
    }

    #[test]
    fn test_set_density_adds_parameters_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, "").unwrap();

        set_density(&path, 8.0).unwrap();
        assert_eq!(load(&path).unwrap().parameters.density, 8.0);
    }

    #[test]
    fn test_set_density_rejects_invalid_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, "[parameters]\ndensity = 7.85\n").unwrap();

        assert!(set_density(&path, -1.0).is_err());
        assert_eq!(load(&path).unwrap().parameters.density, 7.85);
    }
}
