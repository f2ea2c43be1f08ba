//! Commit author for chart revisions.

use crate::error::{ChartError, ChartResult};
use odonto_types::NonEmptyText;

/// Clinician recorded on each stored chart revision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    /// The full name of the author.
    pub name: NonEmptyText,

    /// The professional role of the author (e.g. "Dentist", "Hygienist").
    pub role: NonEmptyText,

    pub email: NonEmptyText,
}

impl Author {
    pub fn new(
        name: impl AsRef<str>,
        role: impl AsRef<str>,
        email: impl AsRef<str>,
    ) -> ChartResult<Self> {
        let author = Self {
            name: NonEmptyText::new(name)
                .map_err(|_| ChartError::InvalidInput("author name cannot be empty".into()))?,
            role: NonEmptyText::new(role)
                .map_err(|_| ChartError::InvalidInput("author role cannot be empty".into()))?,
            email: NonEmptyText::new(email)
                .map_err(|_| ChartError::InvalidInput("author email cannot be empty".into()))?,
        };
        author.validate_commit_author()?;
        Ok(author)
    }

    /// Author fields end up in commit trailers, which are single-line `Key: Value` pairs.
    pub(crate) fn validate_commit_author(&self) -> ChartResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("role", &self.role),
            ("email", &self.email),
        ] {
            if value.as_str().contains(['\n', '\r']) {
                return Err(ChartError::InvalidInput(format!(
                    "author {field} must be a single line"
                )));
            }
        }
        if !self.email.as_str().contains('@') {
            return Err(ChartError::InvalidInput(
                "author email must contain '@'".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_author() {
        let author = Author::new(" Dr Ana Silva ", "Dentist", "ana@example.org").unwrap();
        assert_eq!(author.name.as_str(), "Dr Ana Silva");
    }

    #[test]
    fn rejects_empty_fields() {
        assert!(Author::new("", "Dentist", "ana@example.org").is_err());
        assert!(Author::new("Ana", " ", "ana@example.org").is_err());
        assert!(Author::new("Ana", "Dentist", "").is_err());
    }

    #[test]
    fn rejects_multiline_and_bad_email() {
        let err = Author::new("Ana\nSilva", "Dentist", "ana@example.org").expect_err("newline");
        assert!(matches!(err, ChartError::InvalidInput(msg) if msg.contains("single line")));

        let err = Author::new("Ana", "Dentist", "ana.example.org").expect_err("no @");
        assert!(matches!(err, ChartError::InvalidInput(msg) if msg.contains('@')));
    }
}
