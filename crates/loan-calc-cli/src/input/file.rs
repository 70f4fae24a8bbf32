use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a JSON or YAML input file (chosen by extension) into a typed struct.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    debug!(path = %canonical.display(), yaml = is_yaml(&canonical), "reading input file");
    let value: T = if is_yaml(&canonical) {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    Ok(value)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Resolve the path against the working directory and check it is a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_calc_core::amortization::engine::LoanParameters;
    use rust_decimal::Decimal;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("loancalc-{}-{}", std::process::id(), name));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_reads_yaml_by_extension() {
        let path = write_temp(
            "loan.yaml",
            "loan_amount: 175000\ninterest_rate: 11.9\nterm_months: 60\nballoon_payment: 20000\n",
        );
        let params: LoanParameters = read_input(path.to_str().unwrap()).unwrap();
        assert_eq!(params.term_months, 60);
        assert_eq!(params.balloon_payment, Decimal::from(20000));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_reads_json() {
        let path = write_temp(
            "loan.json",
            r#"{"loan_amount": "175000", "interest_rate": "11.9", "term_months": 60}"#,
        );
        let params: LoanParameters = read_input(path.to_str().unwrap()).unwrap();
        assert_eq!(params.loan_amount, Decimal::from(175000));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_reported() {
        let err = read_input::<LoanParameters>("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
