use crate::domain::model::Entry;

pub fn format_entry(position: usize, entry: &Entry) -> String {
    let coordinates = match entry.coordinates() {
        Some(c) => format!("({:.5}, {:.5})", c.latitude, c.longitude),
        None => "(no coordinates)".to_string(),
    };
    format!(
        "{:>2}. {}  {}  {}",
        position,
        entry.cep().formatted(),
        entry.address(),
        coordinates
    )
}

pub fn render_list(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "(list is empty)".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format_entry(i + 1, entry))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Cep, Coordinates};

    #[test]
    fn test_render_list() {
        let entries = vec![
            Entry::new(
                Cep::from_digits("59064320").unwrap(),
                "Lagoa Nova, Natal, RN".to_string(),
                Some(Coordinates::new(-5.8123, -35.2061)),
            ),
            Entry::new(
                Cep::from_digits("01001000").unwrap(),
                "(address not found)".to_string(),
                None,
            ),
        ];

        assert_eq!(
            render_list(&entries),
            " 1. 59064-320  Lagoa Nova, Natal, RN  (-5.81230, -35.20610)\n \
             2. 01001-000  (address not found)  (no coordinates)"
        );
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_list(&[]), "(list is empty)");
    }
}
