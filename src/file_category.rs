//! Extension-based file categorization.
//!
//! The category table is compiled into the program. At startup it is inverted
//! into an [`ExtensionIndex`] so that classifying a file is a single hash lookup.
//!
//! # Examples
//!
//! ```
//! use sortfolder::file_category::{Category, ExtensionIndex};
//!
//! let index = ExtensionIndex::default();
//! assert_eq!(index.category_for(".png"), Category::Images);
//! assert_eq!(index.category_for(".pdf"), Category::Pdfs);
//! assert_eq!(index.category_for(".unknownext"), Category::Others);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

/// A named bucket of related file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pdfs,
    Images,
    Documents,
    Spreadsheets,
    Presentations,
    Archives,
    Videos,
    Audio,
    Code,
    Executables,
    Design,
    /// Fallback for unknown or missing extensions.
    Others,
}

impl Category {
    /// Returns the human-readable label of this category.
    ///
    /// ```
    /// use sortfolder::file_category::Category;
    ///
    /// assert_eq!(Category::Pdfs.label(), "PDFs");
    /// assert_eq!(Category::Others.label(), "Others");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            Category::Pdfs => "PDFs",
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Spreadsheets => "Spreadsheets",
            Category::Presentations => "Presentations",
            Category::Archives => "Archives",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Code => "Code",
            Category::Executables => "Executables",
            Category::Design => "Design",
            Category::Others => "Others",
        }
    }

    /// Returns the name of the folder files of this category are moved into.
    ///
    /// ```
    /// use sortfolder::file_category::Category;
    ///
    /// assert_eq!(Category::Images.folder_name(), "Sorted Images");
    /// assert_eq!(Category::Others.folder_name(), "Others");
    /// ```
    pub fn folder_name(&self) -> String {
        match self {
            Category::Others => OTHERS_FOLDER.to_string(),
            category => format!("Sorted {}", category.label()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Folder that receives every unclassified file.
pub const OTHERS_FOLDER: &str = "Others";

/// Category to extension table, in insertion order.
///
/// Extensions are lowercase and carry their leading dot.
pub const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (Category::Pdfs, &[".pdf"]),
    (
        Category::Images,
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg"],
    ),
    (
        Category::Documents,
        &[".doc", ".docx", ".txt", ".rtf", ".odt", ".tex"],
    ),
    (Category::Spreadsheets, &[".xls", ".xlsx", ".ods", ".csv"]),
    (Category::Presentations, &[".ppt", ".pptx", ".odp"]),
    (Category::Archives, &[".zip", ".rar", ".7z", ".tar", ".gz"]),
    (
        Category::Videos,
        &[".mp4", ".mkv", ".avi", ".mov", ".wmv", ".flv"],
    ),
    (
        Category::Audio,
        &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".m4a"],
    ),
    (
        Category::Code,
        &[
            ".py", ".java", ".c", ".cpp", ".js", ".html", ".css", ".php", ".rb", ".go", ".ts",
        ],
    ),
    (
        Category::Executables,
        &[".exe", ".msi", ".apk", ".bat", ".sh"],
    ),
    (Category::Design, &[".psd", ".ai", ".xd", ".fig", ".sketch"]),
];

/// Extension to category lookup, built once from a category table.
///
/// The index never changes after construction and lookups are total: anything
/// not registered resolves to [`Category::Others`].
#[derive(Debug, Clone)]
pub struct ExtensionIndex {
    categories: Vec<Category>,
    extension_map: HashMap<String, Category>,
}

impl ExtensionIndex {
    /// Builds the index from the compiled-in [`CATEGORY_TABLE`].
    pub fn new() -> Self {
        Self::from_table(CATEGORY_TABLE)
    }

    /// Builds an index from an arbitrary table.
    ///
    /// Entries are inserted in table order. When two categories declare the
    /// same extension, the later one wins.
    pub fn from_table(table: &[(Category, &[&str])]) -> Self {
        let mut index = Self {
            categories: Vec::with_capacity(table.len()),
            extension_map: HashMap::new(),
        };
        for (category, extensions) in table {
            if !index.categories.contains(category) {
                index.categories.push(*category);
            }
            for ext in extensions.iter() {
                index.extension_map.insert((*ext).to_string(), *category);
            }
        }
        index
    }

    /// Returns the category registered for `extension`, or [`Category::Others`].
    ///
    /// `extension` is matched exactly: it must be lowercase and include its
    /// leading dot. Use [`ExtensionIndex::classify_path`] to classify a path.
    ///
    /// ```
    /// use sortfolder::file_category::{Category, ExtensionIndex};
    ///
    /// let index = ExtensionIndex::default();
    /// assert_eq!(index.category_for(".mp3"), Category::Audio);
    /// assert_eq!(index.category_for(""), Category::Others);
    /// ```
    pub fn category_for(&self, extension: &str) -> Category {
        self.extension_map
            .get(extension)
            .copied()
            .unwrap_or(Category::Others)
    }

    /// Classifies a path by its lowercased suffix.
    ///
    /// ```
    /// use sortfolder::file_category::{Category, ExtensionIndex};
    /// use std::path::Path;
    ///
    /// let index = ExtensionIndex::default();
    /// assert_eq!(index.classify_path(Path::new("photo.JPG")), Category::Images);
    /// assert_eq!(index.classify_path(Path::new("Makefile")), Category::Others);
    /// ```
    pub fn classify_path(&self, path: &Path) -> Category {
        match extension_of(path) {
            Some(ext) => self.category_for(&ext),
            None => Category::Others,
        }
    }

    /// Categories known to this index, in table order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Names of every folder this index sorts into.
    ///
    /// This is `"Sorted " + label` for each table category plus `"Others"`.
    pub fn output_folders(&self) -> HashSet<String> {
        self.categories
            .iter()
            .map(Category::folder_name)
            .chain(std::iter::once(OTHERS_FOLDER.to_string()))
            .collect()
    }
}

impl Default for ExtensionIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the lowercase suffix of `path` including its leading dot.
///
/// Names without a dot, and dotfiles such as `.bashrc`, have no suffix.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_extension_maps_to_its_category() {
        let index = ExtensionIndex::default();
        for (category, extensions) in CATEGORY_TABLE {
            for ext in extensions.iter() {
                assert_eq!(index.category_for(ext), *category, "extension {}", ext);
            }
        }
    }

    #[test]
    fn test_unknown_extensions_map_to_others() {
        let index = ExtensionIndex::default();
        assert_eq!(index.category_for(".unknownext"), Category::Others);
        assert_eq!(index.category_for(""), Category::Others);
        assert_eq!(index.category_for("pdf"), Category::Others);
        assert_eq!(index.category_for(".PDF"), Category::Others);
    }

    #[test]
    fn test_classify_path_lowercases_suffix() {
        let index = ExtensionIndex::default();
        assert_eq!(index.classify_path(Path::new("REPORT.PDF")), Category::Pdfs);
        assert_eq!(
            index.classify_path(Path::new("dir/song.Mp3")),
            Category::Audio
        );
    }

    #[test]
    fn test_classify_path_uses_last_suffix() {
        let index = ExtensionIndex::default();
        assert_eq!(
            index.classify_path(Path::new("backup.tar.gz")),
            Category::Archives
        );
        assert_eq!(
            index.classify_path(Path::new("notes.txt.bak")),
            Category::Others
        );
    }

    #[test]
    fn test_classify_path_without_suffix() {
        let index = ExtensionIndex::default();
        assert_eq!(index.classify_path(Path::new("README")), Category::Others);
        assert_eq!(index.classify_path(Path::new(".bashrc")), Category::Others);
    }

    #[test]
    fn test_folder_names() {
        assert_eq!(Category::Pdfs.folder_name(), "Sorted PDFs");
        assert_eq!(Category::Executables.folder_name(), "Sorted Executables");
        assert_eq!(Category::Others.folder_name(), "Others");
    }

    #[test]
    fn test_output_folders_cover_every_category() {
        let index = ExtensionIndex::default();
        assert_eq!(index.categories().len(), 11);
        assert!(!index.categories().contains(&Category::Others));

        let folders = index.output_folders();
        assert_eq!(folders.len(), 12);
        assert!(folders.contains("Sorted PDFs"));
        assert!(folders.contains("Sorted Design"));
        assert!(folders.contains("Others"));
        assert!(!folders.contains("Sorted Others"));
    }

    // Duplicate extensions resolve to the last declaring category. Unverified
    // as intentional upstream; this pins the current precedence.
    #[test]
    fn test_duplicate_extension_last_entry_wins() {
        let table: &[(Category, &[&str])] = &[
            (Category::Documents, &[".md", ".txt"]),
            (Category::Code, &[".md"]),
        ];
        let index = ExtensionIndex::from_table(table);
        assert_eq!(index.category_for(".md"), Category::Code);
        assert_eq!(index.category_for(".txt"), Category::Documents);
    }

    #[test]
    fn test_builtin_table_has_no_duplicate_extensions() {
        let mut seen = HashSet::new();
        for (_, extensions) in CATEGORY_TABLE {
            for ext in extensions.iter() {
                assert!(seen.insert(*ext), "duplicate extension {}", ext);
            }
        }
    }
}
