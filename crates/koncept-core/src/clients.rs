use std::collections::HashMap;

use crate::config::ClientDirectory;

/// Label used when a client identifier has no display name configured.
pub const UNKNOWN_CLIENT: &str = "unknown client";

/// Clients the sales exports are known to contain, with their directory identifiers.
pub const KNOWN_CLIENTS: [(&str, &str); 11] = [
    ("C1", "Interceramic"),
    ("C2", "Home Depot"),
    ("C3", "Daltile"),
    ("C4", "Kolher"),
    ("C5", "Cesantoni"),
    ("C6", "USA"),
    ("C7", "Lamosa"),
    ("C8", "Vitromex"),
    ("C9", "Varios"),
    ("C10", "Tenerife"),
    ("C11", "Tendenzza"),
];

/// Upper-cases the first letter of every run of letters and lower-cases the rest,
/// so `"home depot"` becomes `"Home Depot"` and `"3m"` becomes `"3M"`.
pub fn title_case(raw: &str) -> String {
    let mut titled = String::with_capacity(raw.len());
    let mut previous_is_letter = false;

    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                titled.extend(ch.to_lowercase());
            } else {
                titled.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            titled.push(ch);
            previous_is_letter = false;
        }
    }

    titled
}

/// Fixed lookup from a client name, as typed in a sales export, to its canonical label.
#[derive(Debug, Clone)]
pub struct ClientMap {
    lookup: HashMap<String, String>,
}

impl ClientMap {
    pub fn builtin() -> Self {
        Self::from_pairs(KNOWN_CLIENTS.iter().map(|(_, label)| (*label, *label)))
    }

    /// Maps every known client to the display name its identifier resolves to.
    pub fn from_directory(directory: &ClientDirectory) -> Self {
        Self::from_pairs(
            KNOWN_CLIENTS
                .iter()
                .map(|(code, label)| (*label, directory.resolve(code))),
        )
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
        let mut lookup = HashMap::with_capacity(pairs.len() * 2);

        for (label, canonical) in &pairs {
            lookup.insert(title_case(label.trim()), canonical.to_string());
        }
        // A canonical label must map to itself or normalizing twice would drift.
        for (_, canonical) in &pairs {
            lookup
                .entry(title_case(canonical.trim()))
                .or_insert_with(|| canonical.to_string());
        }

        Self { lookup }
    }

    /// `trim -> title case -> lookup`, passing unknown names through in title case.
    pub fn normalize(&self, raw: &str) -> String {
        let titled = title_case(raw.trim());
        match self.lookup.get(&titled) {
            Some(canonical) => canonical.clone(),
            None => titled,
        }
    }

    pub fn canonical_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.lookup.values().map(String::as_str).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

impl Default for ClientMap {
    fn default() -> Self {
        Self::builtin()
    }
}
