use codespan_reporting::files::Files;
use std::ops::Range;

struct SourceFile {
    name: String,
    source: String,
    line_starts: Vec<usize>,
}

/// Holds the campaign text being exported so codespan can render snippets of
/// it
#[derive(Default)]
pub struct SourceFiles {
    files: Vec<SourceFile>,
}

impl SourceFiles {
    pub fn new() -> Self {
        SourceFiles::default()
    }

    /// Adds a file and returns its id
    pub fn add<N: Into<String>, S: Into<String>>(&mut self, name: N, source: S) -> usize {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        self.files.push(SourceFile {
            name: name.into(),
            source,
            line_starts,
        });
        self.files.len() - 1
    }

    fn line_start(&self, id: usize, line_index: usize) -> Option<usize> {
        let file = self.files.get(id)?;
        match line_index.cmp(&file.line_starts.len()) {
            std::cmp::Ordering::Less => file.line_starts.get(line_index).cloned(),
            std::cmp::Ordering::Equal => Some(file.source.len()),
            std::cmp::Ordering::Greater => None,
        }
    }
}

impl<'a> Files<'a> for SourceFiles {
    type FileId = usize;
    type Name = &'a str;
    type Source = &'a str;

    fn name(&'a self, id: Self::FileId) -> Option<Self::Name> {
        self.files.get(id).map(|file| file.name.as_str())
    }

    fn source(&'a self, id: Self::FileId) -> Option<Self::Source> {
        self.files.get(id).map(|file| file.source.as_str())
    }

    fn line_index(&'a self, id: Self::FileId, byte_index: usize) -> Option<usize> {
        self.files.get(id).map(|file| {
            file.line_starts
                .binary_search(&byte_index)
                .unwrap_or_else(|next_line| next_line - 1)
        })
    }

    fn line_range(&'a self, id: Self::FileId, line_index: usize) -> Option<Range<usize>> {
        let start = self.line_start(id, line_index)?;
        let end = self.line_start(id, line_index + 1)?;
        Some(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_lookup() {
        let mut files = SourceFiles::new();
        let id = files.add("campaign.md", "one\ntwo\n\nfour");
        assert_eq!(files.name(id), Some("campaign.md"));
        assert_eq!(files.line_index(id, 0), Some(0));
        assert_eq!(files.line_index(id, 3), Some(0));
        assert_eq!(files.line_index(id, 4), Some(1));
        assert_eq!(files.line_index(id, 9), Some(3));
        assert_eq!(files.line_index(id, 12), Some(3));
        assert_eq!(files.line_range(id, 1), Some(4..8));
        assert_eq!(files.line_range(id, 3), Some(9..13));
        assert_eq!(files.line_range(id, 4), None);
        assert_eq!(files.source(id + 1), None);
    }
}
