//! Accepted content kinds of a chooser request.

use super::constants::{TITLE_FILE, TITLE_IMAGE, TITLE_VIDEO};

/// Which capture kinds can satisfy a request's accept list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptedKinds {
    /// A camera photo is acceptable.
    pub image: bool,
    /// A camera video is acceptable.
    pub video: bool,
}

impl AcceptedKinds {
    /// Analyses accept types as written by the page.
    ///
    /// Entries may hold comma-separated lists. An empty list, or one made
    /// only of blanks, accepts anything.
    #[must_use]
    pub fn from_accept_types<S: AsRef<str>>(accept_types: &[S]) -> Self {
        let types = split_accept_types(accept_types);

        if types.is_empty() {
            return Self {
                image: true,
                video: true,
            };
        }

        types.iter().fold(Self::default(), |kinds, ty| {
            let ty = ty.to_ascii_lowercase();
            let any = ty == "*/*" || ty == "*";
            Self {
                image: kinds.image || any || ty.starts_with("image/"),
                video: kinds.video || any || ty.starts_with("video/"),
            }
        })
    }

    /// Returns `true` if a camera can produce an acceptable result.
    #[inline]
    #[must_use]
    pub const fn any_capture(&self) -> bool {
        self.image || self.video
    }

    /// Picker title for these kinds.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match (self.image, self.video) {
            (true, false) => TITLE_IMAGE,
            (false, true) => TITLE_VIDEO,
            _ => TITLE_FILE,
        }
    }
}

/// Flattens comma-separated accept entries, dropping blanks.
#[must_use]
pub fn split_accept_types<S: AsRef<str>>(accept_types: &[S]) -> Vec<String> {
    accept_types
        .iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .map(str::trim)
        .filter(|ty| !ty.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_accepts_everything() {
        let kinds = AcceptedKinds::from_accept_types::<&str>(&[]);
        assert!(kinds.image && kinds.video);
        assert_eq!(kinds.title(), TITLE_FILE);

        let kinds = AcceptedKinds::from_accept_types(&["", " , "]);
        assert!(kinds.image && kinds.video);
    }

    #[test]
    fn test_images_only() {
        let kinds = AcceptedKinds::from_accept_types(&["image/png, image/jpeg"]);
        assert_eq!(
            kinds,
            AcceptedKinds {
                image: true,
                video: false
            }
        );
        assert_eq!(kinds.title(), TITLE_IMAGE);
    }

    #[test]
    fn test_videos_only() {
        let kinds = AcceptedKinds::from_accept_types(&["video/*"]);
        assert!(!kinds.image && kinds.video);
        assert_eq!(kinds.title(), TITLE_VIDEO);
    }

    #[test]
    fn test_documents_have_no_capture() {
        let kinds = AcceptedKinds::from_accept_types(&["application/pdf", ".txt"]);
        assert!(!kinds.any_capture());
        assert_eq!(kinds.title(), TITLE_FILE);
    }

    #[test]
    fn test_mixed_and_wildcard() {
        let kinds = AcceptedKinds::from_accept_types(&["image/*", "video/mp4"]);
        assert!(kinds.image && kinds.video);

        let kinds = AcceptedKinds::from_accept_types(&["*/*"]);
        assert!(kinds.image && kinds.video);
    }

    #[test]
    fn test_split_accept_types() {
        let types = split_accept_types(&["image/png,image/gif", " ", "video/*"]);
        assert_eq!(types, vec!["image/png", "image/gif", "video/*"]);
    }
}
