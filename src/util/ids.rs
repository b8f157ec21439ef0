use chrono::Utc;

/// Process-unique entry id: millisecond timestamp plus a random hex suffix.
/// Entries are independent facts, not keys, so cross-process collisions are
/// not a concern.
pub fn new_entry_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = rand::random::<u32>() & 0xff_ffff;
    format!("{millis:x}-{suffix:06x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_within_a_process() {
        let mut ids: Vec<String> = (0..64).map(|_| new_entry_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 64);
    }
}
