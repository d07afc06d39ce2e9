use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub(crate) fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

pub(crate) fn count_label(count: u32, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}

pub(crate) fn last_segment<'a>(id: &'a str, separators: &[&str]) -> &'a str {
    let trimmed = id.trim_end_matches(['/', ':', '.']);
    let mut cut = 0;
    for separator in separators {
        if let Some(position) = trimmed.rfind(separator) {
            cut = cut.max(position + separator.len());
        }
    }
    let segment = &trimmed[cut..];
    if segment.is_empty() { id } else { segment }
}
