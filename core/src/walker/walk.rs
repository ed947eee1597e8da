//! Lazy, iterative directory enumeration.
//!
//! The walk keeps one listing per open directory on an explicit stack. A
//! directory is listed when the walk descends into it, never earlier, so
//! files written into a directory after it was listed are not yielded.

use std::path::{Path, PathBuf};
use std::vec;

use crate::io::{EntryKind, Filesystem};
use crate::types::CryptError;

/// One entry below the walk root. The root itself is never yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
    File(PathBuf),
    /// Yielded before any of its children.
    Dir(PathBuf),
    Other(PathBuf),
}

impl WalkEntry {
    pub fn path(&self) -> &Path {
        match self {
            WalkEntry::File(p) | WalkEntry::Dir(p) | WalkEntry::Other(p) => p,
        }
    }
}

pub struct TreeWalk<'f, F: Filesystem> {
    fs: &'f F,
    stack: Vec<vec::IntoIter<PathBuf>>,
}

impl<'f, F: Filesystem> TreeWalk<'f, F> {
    /// Lists `root`. Fails with `NotFound` if it is missing or not a
    /// directory. A root that is a link to a directory is followed; links
    /// below it are not.
    pub fn new(fs: &'f F, root: &Path) -> Result<Self, CryptError> {
        if !fs.is_dir(root) {
            return Err(CryptError::not_found(root));
        }
        let listing = fs.list_dir(root)?;
        Ok(Self {
            fs,
            stack: vec![listing.into_iter()],
        })
    }
}

impl<'f, F: Filesystem> Iterator for TreeWalk<'f, F> {
    type Item = Result<WalkEntry, CryptError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let Some(path) = top.next() else {
                self.stack.pop();
                continue;
            };

            let kind = match self.fs.entry_kind(&path) {
                Ok(kind) => kind,
                Err(e) => return Some(Err(e.into())),
            };

            return Some(match kind {
                EntryKind::File => Ok(WalkEntry::File(path)),
                EntryKind::Other => Ok(WalkEntry::Other(path)),
                EntryKind::Dir => match self.fs.list_dir(&path) {
                    Ok(listing) => {
                        self.stack.push(listing.into_iter());
                        Ok(WalkEntry::Dir(path))
                    }
                    Err(e) => Err(e.into()),
                },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::LocalFs;
    use std::fs;

    #[test]
    fn yields_nested_entries_and_pops_back_out() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), b"1").unwrap();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        fs::write(dir.path().join("x/y/z"), b"2").unwrap();

        let mut entries: Vec<WalkEntry> = TreeWalk::new(&LocalFs, dir.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        entries.sort_by(|a, b| a.path().cmp(b.path()));

        assert_eq!(
            entries,
            vec![
                WalkEntry::File(dir.path().join("a")),
                WalkEntry::Dir(dir.path().join("x")),
                WalkEntry::Dir(dir.path().join("x/y")),
                WalkEntry::File(dir.path().join("x/y/z")),
            ]
        );
    }

    #[test]
    fn missing_or_file_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"").unwrap();

        for root in [dir.path().join("missing"), file] {
            let err = TreeWalk::new(&LocalFs, &root).err().unwrap();
            assert!(matches!(err, CryptError::NotFound { .. }));
        }
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut walk = TreeWalk::new(&LocalFs, dir.path()).unwrap();
        assert!(walk.next().is_none());
        assert!(walk.next().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn linked_root_is_followed_but_linked_children_are_not() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("f"), b"1").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        std::os::unix::fs::symlink(&real, real.join("loop")).unwrap();

        let mut entries: Vec<WalkEntry> = TreeWalk::new(&LocalFs, &link)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        entries.sort_by(|a, b| a.path().cmp(b.path()));

        assert_eq!(
            entries,
            vec![WalkEntry::File(link.join("f")), WalkEntry::Other(link.join("loop"))]
        );
    }
}
