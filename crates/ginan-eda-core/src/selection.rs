//! Site / satellite selection and series labelling.

/// Token that selects every available option.
pub const ALL: &str = "ALL";

/// Resolve a selection against the available options.
///
/// A selection containing [`ALL`] becomes every available option; anything
/// else is returned as given.
pub fn expand_selection(selected: &[String], available: &[String]) -> Vec<String> {
    if selected.iter().any(|s| s == ALL) {
        available.iter().filter(|s| *s != ALL).cloned().collect()
    } else {
        selected.to_vec()
    }
}

/// How many values were picked in each selection dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionShape {
    pub sites: usize,
    pub sats: usize,
    pub keys: usize,
}

impl SelectionShape {
    /// Label a series by the dimensions that vary across the selection.
    ///
    /// A single site, satellite or key is left out since it would be the same
    /// on every trace. Empty parts (receiver-level records) are skipped.
    pub fn label(&self, site: &str, sat: &str, key: &str) -> String {
        let mut parts = Vec::with_capacity(3);
        if self.sites != 1 {
            parts.push(site);
        }
        if self.sats != 1 {
            parts.push(sat);
        }
        if self.keys != 1 {
            parts.push(key);
        }
        join_non_empty(&parts)
    }
}

/// Identifier for a (site, satellite) pair, e.g. `ALIC-G01`, or `ALIC` for a
/// receiver-level record.
pub fn pair_id(site: &str, sat: &str) -> String {
    join_non_empty(&[site, sat])
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("-")
}
