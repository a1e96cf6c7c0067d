//! Depth-first walk over a Box folder tree.
//!
//! For every file the walker fetches metadata, rebuilds the full path,
//! applies the optional glob filter, prints `"<path>" size <n>`, resolves the
//! download URL, and hands the file to a [`FileHandler`].
//!
//! Any Box API failure ends the walk. Handler failures are logged, counted,
//! and the walk moves on.

use async_trait::async_trait;
use glob::Pattern;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::connector::BoxConnector;
use crate::error::Result;
use crate::types::{EntryKind, FileDescriptor, FolderEntry};

/// Receives each file that passed the filter, together with its download URL.
#[async_trait]
pub trait FileHandler: Send + Sync {
    async fn handle(&self, file: &FileDescriptor, download_url: &str) -> anyhow::Result<()>;
}

/// Counters for one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub folders_listed: usize,
    pub files_visited: usize,
    pub files_skipped: usize,
    pub files_handled: usize,
    pub handler_failures: usize,
    pub unknown_items: usize,
    /// Rebuilt paths of matched files, in visit order
    pub matched_paths: Vec<String>,
}

pub struct FolderWalker<'a> {
    connector: &'a BoxConnector,
    pattern: Option<Pattern>,
    handler: Option<&'a dyn FileHandler>,
    out: Box<dyn Write + Send + 'a>,
}

impl<'a> FolderWalker<'a> {
    pub fn new(connector: &'a BoxConnector) -> Self {
        Self {
            connector,
            pattern: None,
            handler: None,
            out: Box::new(std::io::stdout()),
        }
    }

    /// Only visit files whose full path matches `pattern` (shell glob,
    /// `*` also matches `/`).
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_handler(mut self, handler: &'a dyn FileHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Where the `"<path>" size <n>` lines go; stdout by default.
    pub fn with_output(mut self, out: impl Write + Send + 'a) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Walk `folder_id` and everything below it in listing order.
    pub async fn walk_folder(mut self, folder_id: &str) -> Result<WalkReport> {
        let mut report = WalkReport::default();

        // One iterator per open folder; the top is the folder being listed.
        let root = self.list(folder_id, &mut report).await?;
        let mut stack: Vec<std::vec::IntoIter<FolderEntry>> = vec![root];

        while let Some(level) = stack.last_mut() {
            let Some(entry) = level.next() else {
                stack.pop();
                continue;
            };

            debug!(
                item_type = %entry.item_type,
                name = %entry.name,
                id = %entry.id,
                "Folder entry"
            );

            match entry.kind() {
                EntryKind::Folder => {
                    let children = self.list(&entry.id, &mut report).await?;
                    stack.push(children);
                }
                EntryKind::File => self.visit_file(&entry.id, &mut report).await?,
                EntryKind::Other(item_type) => {
                    warn!(
                        item_type = item_type,
                        name = %entry.name,
                        id = %entry.id,
                        "Unknown folder item"
                    );
                    report.unknown_items += 1;
                }
            }
        }

        info!(
            folders = report.folders_listed,
            files = report.files_visited,
            skipped = report.files_skipped,
            handled = report.files_handled,
            failures = report.handler_failures,
            "Walk finished"
        );
        Ok(report)
    }

    async fn list(
        &self,
        folder_id: &str,
        report: &mut WalkReport,
    ) -> Result<std::vec::IntoIter<FolderEntry>> {
        let listing = self.connector.folder(folder_id).await?;
        report.folders_listed += 1;
        Ok(listing.item_collection.entries.into_iter())
    }

    async fn visit_file(&mut self, file_id: &str, report: &mut WalkReport) -> Result<()> {
        let file = FileDescriptor::from(self.connector.file(file_id).await?);
        let path = file.path();
        report.files_visited += 1;

        if let Some(pattern) = &self.pattern {
            if !pattern.matches(&path) {
                debug!(path = %path, "Skipping file not matching pattern");
                report.files_skipped += 1;
                return Ok(());
            }
        }

        if let Err(e) = writeln!(self.out, "\"{}\" size {}", path, file.size) {
            warn!(error = %e, "Failed to write progress line");
        }
        report.matched_paths.push(path.clone());

        let download_url = self.connector.file_content_location(&file.id).await?;

        if let Some(handler) = self.handler {
            match handler.handle(&file, &download_url).await {
                Ok(()) => report.files_handled += 1,
                Err(e) => {
                    warn!(path = %path, error = %format!("{:#}", e), "File handler failed");
                    report.handler_failures += 1;
                }
            }
        }

        Ok(())
    }
}
