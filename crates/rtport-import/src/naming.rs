//! Staged file naming
//!
//! Both the rewriter and the import step derive staged names independently, so
//! these functions must stay pure and deterministic.

/// Suffix appended to every staged file name
pub const STAGED_SUFFIX: &str = "updated.json";

const JSON_EXTENSION: &str = ".json";

/// Derive the staged name for `path`, optionally prefixed with `staging_dir`.
///
/// The `.json` extension is dropped. When the path has a `/` past its second
/// character only the final segment is kept; otherwise the first character is
/// dropped (inputs are expected to look like `./name.json`). `updated.json`
/// is then appended.
pub fn normalize(path: &str, staging_dir: Option<&str>) -> String {
    let stem = strip_json_extension(path);

    let name = match stem.rfind('/') {
        Some(idx) if idx > 1 => &stem[idx + 1..],
        _ => skip_first_char(stem),
    };

    let staged = format!("{}{}", name, STAGED_SUFFIX);
    match staging_dir {
        Some(dir) => format!("{}/{}", dir.trim_end_matches('/'), staged),
        None => staged,
    }
}

/// Directory part of `path` including its trailing `/`, or empty when the
/// path has no `/` past its second character.
pub fn base_directory(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx > 1 => &path[..=idx],
        _ => "",
    }
}

fn strip_json_extension(path: &str) -> &str {
    let split = path.len().saturating_sub(JSON_EXTENSION.len());
    match path.get(split..) {
        Some(ext) if ext.eq_ignore_ascii_case(JSON_EXTENSION) => &path[..split],
        _ => path,
    }
}

fn skip_first_char(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAGING: &str = "tempFilesWithRecordTypes";

    #[test]
    fn test_nested_path_keeps_final_segment() {
        assert_eq!(
            normalize("/a/b/export.json", Some(STAGING)),
            "tempFilesWithRecordTypes/exportupdated.json"
        );
        assert_eq!(normalize("/a/b/export.json", None), "exportupdated.json");
        assert_eq!(normalize("data/Account.json", None), "Accountupdated.json");
    }

    #[test]
    fn test_bare_name_drops_first_character() {
        assert_eq!(
            normalize("other.json", Some(STAGING)),
            "tempFilesWithRecordTypes/therupdated.json"
        );
    }

    #[test]
    fn test_separator_at_index_one_is_not_a_directory() {
        assert_eq!(normalize("./Account.json", None), "/Accountupdated.json");
        assert_eq!(normalize("a/b.json", None), "/bupdated.json");
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert_eq!(normalize("/x/Lead.JSON", None), "Leadupdated.json");
    }

    #[test]
    fn test_path_without_json_extension_keeps_full_segment() {
        assert_eq!(normalize("/x/README", None), "READMEupdated.json");
        assert_eq!(normalize("/x/data.csv", None), "data.csvupdated.json");
    }

    #[test]
    fn test_staging_dir_trailing_separator_is_not_doubled() {
        assert_eq!(
            normalize("/x/Account.json", Some("./staging/")),
            "./staging/Accountupdated.json"
        );
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let path = "/exports/2024/Opportunity.json";

        assert_eq!(normalize(path, None), normalize(path, None));
        assert_eq!(normalize(path, Some(STAGING)), normalize(path, Some(STAGING)));
    }

    #[test]
    fn test_non_ascii_leading_character_is_handled() {
        assert_eq!(normalize("éclair.json", None), "clairupdated.json");
    }

    #[test]
    fn test_base_directory() {
        assert_eq!(base_directory("/x/plan.json"), "/x/");
        assert_eq!(base_directory("exports/data/plan.json"), "exports/data/");
        assert_eq!(base_directory("plan.json"), "");
        assert_eq!(base_directory("./plan.json"), "");
    }
}
