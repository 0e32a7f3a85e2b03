use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Inserts `counter` between the stem and the extension of the template's
/// file name: `out.txt` becomes `out3.txt`. Without an extension the counter
/// is appended. Leading-dot names such as `.env` have no extension.
pub fn increment_filename(template: &Path, counter: usize) -> PathBuf {
    let stem = match template.file_stem() {
        Some(stem) => stem,
        None => {
            let mut raw = template.as_os_str().to_os_string();
            raw.push(counter.to_string());
            return PathBuf::from(raw);
        }
    };

    let mut name = OsString::from(stem);
    name.push(counter.to_string());
    if let Some(ext) = template.extension() {
        name.push(".");
        name.push(ext);
    }
    template.with_file_name(name)
}
