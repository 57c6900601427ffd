use serde::Deserialize;

/// Explicit discriminant on the wire; never inferred from position.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// One entry of a remote directory listing, one level deep.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes; present for files only
    #[serde(default)]
    pub size: Option<u64>,
}

/// Envelope returned by the listing endpoint.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub entries: Vec<ListingEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_listing_with_optional_size() {
        let raw = r#"{"entries":[
            {"name":"readme.txt","kind":"file","size":120},
            {"name":"Landing","kind":"folder"}
        ]}"#;

        let listing: Listing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.entries.len(), 2);
        assert_eq!(listing.entries[0].kind, EntryKind::File);
        assert_eq!(listing.entries[0].size, Some(120));
        assert_eq!(listing.entries[1].kind, EntryKind::Folder);
        assert_eq!(listing.entries[1].size, None);
    }

    #[test]
    fn deserializes_empty_envelope() {
        let listing: Listing = serde_json::from_str("{}").unwrap();
        assert!(listing.entries.is_empty());
    }

    #[test]
    fn rejects_unknown_kind() {
        let raw = r#"{"entries":[{"name":"x","kind":"symlink"}]}"#;
        assert!(serde_json::from_str::<Listing>(raw).is_err());
    }
}
