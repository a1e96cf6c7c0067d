//! Box API response types
//!
//! Only the fields the walker reads are modelled; everything else in the
//! responses is ignored.

use serde::Deserialize;

/// `GET /folders/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct FolderListing {
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub item_collection: ItemCollection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemCollection {
    #[serde(default)]
    pub total_count: Option<u64>,

    pub entries: Vec<FolderEntry>,
}

/// A child of a folder, as listed in `item_collection.entries`
#[derive(Debug, Clone, Deserialize)]
pub struct FolderEntry {
    #[serde(rename = "type")]
    pub item_type: String,

    pub id: String,

    #[serde(default)]
    pub name: String,
}

/// What the walker does with a [`FolderEntry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind<'a> {
    Folder,
    File,
    /// `web_link` and anything Box adds later
    Other(&'a str),
}

impl FolderEntry {
    pub fn kind(&self) -> EntryKind<'_> {
        match self.item_type.as_str() {
            "folder" => EntryKind::Folder,
            "file" => EntryKind::File,
            other => EntryKind::Other(other),
        }
    }
}

/// `GET /files/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub size: u64,

    pub path_collection: PathCollection,
}

/// Ancestors of an item, root first
#[derive(Debug, Clone, Deserialize)]
pub struct PathCollection {
    pub entries: Vec<PathEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathEntry {
    pub id: String,
    pub name: String,
}

/// A file located by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
    pub size: u64,
    /// Ancestor folder names, root first
    pub path_segments: Vec<String>,
}

impl FileDescriptor {
    /// Ancestors and name joined with `/`
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in &self.path_segments {
            path.push_str(segment);
            path.push('/');
        }
        path.push_str(&self.name);
        path
    }
}

impl From<FileInfo> for FileDescriptor {
    fn from(info: FileInfo) -> Self {
        Self {
            id: info.id,
            name: info.name,
            size: info.size,
            path_segments: info
                .path_collection
                .entries
                .into_iter()
                .map(|entry| entry.name)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_listing_deserialization() {
        let json = r#"{
            "type": "folder",
            "id": "0",
            "name": "All Files",
            "item_collection": {
                "total_count": 3,
                "entries": [
                    {"type": "file", "id": "11", "name": "a.exe", "etag": "0"},
                    {"type": "folder", "id": "12", "name": "B"},
                    {"type": "web_link", "id": "13", "name": "link"}
                ]
            }
        }"#;

        let listing: FolderListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.item_collection.total_count, Some(3));

        let kinds: Vec<_> = listing
            .item_collection
            .entries
            .iter()
            .map(|entry| entry.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![EntryKind::File, EntryKind::Folder, EntryKind::Other("web_link")]
        );
    }

    #[test]
    fn test_file_info_to_descriptor() {
        let json = r#"{
            "type": "file",
            "id": "99",
            "name": "setup.exe",
            "size": 4096,
            "path_collection": {
                "total_count": 2,
                "entries": [
                    {"type": "folder", "id": "0", "name": "All Files"},
                    {"type": "folder", "id": "5", "name": "Downloads"}
                ]
            }
        }"#;

        let info: FileInfo = serde_json::from_str(json).unwrap();
        let descriptor = FileDescriptor::from(info);

        assert_eq!(descriptor.size, 4096);
        assert_eq!(descriptor.path(), "All Files/Downloads/setup.exe");
    }

    #[test]
    fn test_path_without_ancestors() {
        let descriptor = FileDescriptor {
            id: "1".to_string(),
            name: "top.txt".to_string(),
            size: 0,
            path_segments: vec![],
        };
        assert_eq!(descriptor.path(), "top.txt");
    }
}
