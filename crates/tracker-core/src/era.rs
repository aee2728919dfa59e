//! Era projection: the two views derived from a flat catalog.
//!
//! An *era row* is a header row inside the data: its second-to-last field
//! is empty and its first two fields carry real text. Each era row yields
//! one [`Era`]; choosing an era yields an [`EraDetail`] with the entries
//! filed under it. Views are recomputed on every load or selection.

use crate::catalog::{Catalog, Record};

/// One row of the era table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Era {
    /// First field of the era row, verbatim.
    pub key: String,
    /// Second field of the era row, normalized.
    pub label: String,
}

/// Entries filed under one era, with the first column dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraDetail {
    pub label: String,
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

/// Cut `field` at its first `(` and trim whitespace.
///
/// `"Album (Deluxe)"` becomes `"Album"`; `"  Single  "` becomes `"Single"`.
pub fn normalize(field: &str) -> &str {
    match field.find('(') {
        Some(idx) => field[..idx].trim(),
        None => field.trim(),
    }
}

/// Case-insensitive comparison key.
fn match_key(field: &str) -> String {
    normalize(field).to_uppercase()
}

fn is_era_row(row: &[String]) -> bool {
    row.len() >= 2
        && row[row.len() - 2].is_empty()
        && normalize(&row[0]).chars().count() > 1
        && normalize(&row[1]).chars().count() > 1
}

/// One [`Era`] per era row, in catalog order. Other rows are skipped.
pub fn project_eras(catalog: &Catalog) -> Vec<Era> {
    catalog
        .rows
        .iter()
        .filter(|row| is_era_row(row))
        .map(|row| Era {
            key: row[0].clone(),
            label: normalize(&row[1]).to_string(),
        })
        .collect()
}

/// Rows filed under the era labelled `label`, in catalog order.
///
/// A row belongs to the era when its first field matches the label
/// (normalized, case-insensitive). Catalogs that file entries by the era
/// row's key instead are covered too: a non-era row whose first field
/// matches the key of an era carrying this label is included.
pub fn project_detail(catalog: &Catalog, label: &str) -> EraDetail {
    let wanted = match_key(label);
    let columns = catalog.header.iter().skip(1).cloned().collect();
    if wanted.is_empty() {
        return EraDetail {
            label: label.to_string(),
            columns,
            rows: Vec::new(),
        };
    }

    let keys: Vec<String> = catalog
        .rows
        .iter()
        .filter(|row| is_era_row(row) && match_key(&row[1]) == wanted)
        .map(|row| match_key(&row[0]))
        .filter(|key| !key.is_empty())
        .collect();

    let rows = catalog
        .rows
        .iter()
        .filter(|row| {
            let Some(first) = row.first() else {
                return false;
            };
            let first = match_key(first);
            first == wanted || (!is_era_row(row) && keys.contains(&first))
        })
        .map(|row| row[1..].to_vec())
        .collect();

    EraDetail {
        label: normalize(label).to_string(),
        columns,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(rows: &[&[&str]]) -> Catalog {
        let records = rows
            .iter()
            .map(|r| r.iter().map(|f| f.to_string()).collect())
            .collect();
        Catalog::from_records("test", records).unwrap()
    }

    /// Layout used by most trackers: entry rows carry the era name first.
    fn tracker() -> Catalog {
        catalog(&[
            &["Era", "Name", "Notes", "Link"],
            &["12 OG Files", "Cruel Winter (2016)", "", ""],
            &["Cruel Winter", "Track One", "leak", "https://host/f/a1"],
            &["cruel winter (v2)", "Track Two", "v2", "https://host/f/a2"],
            &["7 OG Files", "  Yandhi  ", "", ""],
            &["Yandhi", "Bye Bye Baby", "snippet", "https://youtu.be/x"],
            &["Cruel Winter", "Track Three", "og", "https://host/f/a3"],
            &["x", "too short key", "", ""],
            &["Other", "has notes", "filled", ""],
        ])
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Album (Deluxe)"), "Album");
        assert_eq!(normalize("  Single  "), "Single");
        assert_eq!(normalize("(leading)"), "");
        assert_eq!(normalize("a (b) (c)"), "a");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_project_eras_inclusion_policy() {
        let eras = project_eras(&tracker());
        assert_eq!(
            eras,
            vec![
                Era {
                    key: "12 OG Files".into(),
                    label: "Cruel Winter".into()
                },
                Era {
                    key: "7 OG Files".into(),
                    label: "Yandhi".into()
                },
            ]
        );
    }

    #[test]
    fn test_project_eras_is_deterministic() {
        let c = tracker();
        assert_eq!(project_eras(&c), project_eras(&c));
    }

    #[test]
    fn test_non_empty_second_to_last_field_never_projects() {
        let c = catalog(&[
            &["a", "b", "c", "d"],
            &["Some Era", "Some Label", "x", ""],
            &["Some Era", "Some Label", " ", "link"],
        ]);
        assert!(project_eras(&c).is_empty());
    }

    #[test]
    fn test_round_trip_every_label_has_entries() {
        let c = tracker();
        for era in project_eras(&c) {
            let detail = project_detail(&c, &era.label);
            assert!(!detail.rows.is_empty(), "no rows for {}", era.label);
            // Every member row was matched on its first field.
            let members: Vec<&Record> = c
                .rows
                .iter()
                .filter(|row| match_key(&row[0]) == match_key(&era.label))
                .collect();
            assert_eq!(members.len(), detail.rows.len());
        }
    }

    #[test]
    fn test_detail_matches_case_insensitively_in_order() {
        let detail = project_detail(&tracker(), "CRUEL WINTER");
        assert_eq!(detail.columns, vec!["Name", "Notes", "Link"]);
        let names: Vec<&str> = detail.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["Track One", "Track Two", "Track Three"]);
    }

    #[test]
    fn test_detail_for_unknown_label_is_empty() {
        let detail = project_detail(&tracker(), "Nope");
        assert!(detail.rows.is_empty());
        assert_eq!(detail.columns.len(), 3);
        assert!(project_detail(&tracker(), "  ").rows.is_empty());
    }

    #[test]
    fn test_rows_filed_by_era_key() {
        let c = catalog(&[
            &["Year", "Title", "Released", "Link"],
            &["1975", "Album One", "", ""],
            &["1975", "Track A", "2021", "link"],
        ]);

        assert_eq!(
            project_eras(&c),
            vec![Era {
                key: "1975".into(),
                label: "Album One".into()
            }]
        );

        let detail = project_detail(&c, "Album One");
        assert_eq!(detail.rows, vec![vec!["Track A", "2021", "link"]]);
    }
}
