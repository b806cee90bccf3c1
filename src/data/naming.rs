use unicode_normalization::UnicodeNormalization;

/// Reserved device names that cannot be used as filenames on Windows.
#[cfg(windows)]
const WINDOWS_DEVICE_FILES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3",
];

/// Turn an arbitrary user-supplied name into a filename that is safe to join
/// onto the store root.
///
/// The result contains only `[A-Za-z0-9_.-]`, never starts or ends with `.`
/// or `_`, and so can never name a parent directory or an absolute path.
/// It may be empty; callers must reject that.
///
/// Two names that sanitize to the same string address the same dataset.
pub fn secure_filename(raw: &str) -> String {
    let ascii: String = raw.nfkd().filter(char::is_ascii).collect();
    let separated = ascii.replace(['/', '\\'], " ");
    let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '_' | '.' | '-'))
        .collect();
    let name = filtered.trim_matches(['.', '_']).to_string();
    guard_device_name(name)
}

#[cfg(windows)]
fn guard_device_name(name: String) -> String {
    let stem = name.split('.').next().unwrap_or("").to_ascii_uppercase();
    if !name.is_empty() && WINDOWS_DEVICE_FILES.contains(&stem.as_str()) {
        format!("_{name}")
    } else {
        name
    }
}

#[cfg(not(windows))]
fn guard_device_name(name: String) -> String {
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(secure_filename("titanic.csv"), "titanic.csv");
        assert_eq!(secure_filename("train-2024_v1.csv"), "train-2024_v1.csv");
    }

    #[test]
    fn traversal_segments_are_flattened() {
        assert_eq!(secure_filename("../../etc/x.csv"), "etc_x.csv");
        assert_eq!(secure_filename("/etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("..\\..\\win.csv"), "win.csv");
    }

    #[test]
    fn whitespace_and_symbols() {
        assert_eq!(secure_filename("my data  set.csv"), "my_data_set.csv");
        assert_eq!(secure_filename("a$b%c.csv"), "abc.csv");
    }

    #[test]
    fn accents_are_decomposed() {
        assert_eq!(secure_filename("données.csv"), "donnees.csv");
        assert_eq!(secure_filename("数据.csv"), "csv");
    }

    #[test]
    fn degenerate_names_become_empty() {
        assert_eq!(secure_filename(""), "");
        assert_eq!(secure_filename("../.."), "");
        assert_eq!(secure_filename("   "), "");
    }
}
