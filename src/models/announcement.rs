//! Structured chat announcement and its markdown rendering.

use std::fmt;

/// First line of every announcement.
pub const ANNOUNCEMENT_HEADER: &str = "## New content posted!";

/// A composed announcement, rendered with `to_string()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Announcement {
    pub sections: Vec<Section>,
}

/// Where a section's lines came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Files newly posted to a tracked folder
    NewFiles,
    /// New homework assignments matched to files already in the folder
    HomeworkFallback,
}

/// One folder heading plus its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: String,
    pub lines: Vec<FileLine>,
}

/// A linked file, optionally annotated with where to submit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLine {
    pub name: String,
    pub url: String,
    pub submission: Option<SubmissionLink>,
}

/// Submission-link annotation on a homework line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionLink {
    /// Matching assignment found
    Resolved { label: String, url: String },
    /// No assignment could be paired; points at the assignment list
    Unresolved { assignments_url: String },
}

impl Announcement {
    /// Total number of file lines across all sections.
    pub fn line_count(&self) -> usize {
        self.sections.iter().map(|s| s.lines.len()).sum()
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ANNOUNCEMENT_HEADER)?;
        for section in &self.sections {
            write!(f, "\n### {}", section.heading)?;
            for line in &section.lines {
                write!(f, "\n{line}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for FileLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Angle brackets keep Discord from embedding a preview.
        write!(f, "- [{}](<{}>)", self.name, self.url)?;
        if let Some(link) = &self.submission {
            write!(f, " {link}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SubmissionLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionLink::Resolved { label, url } => {
                write!(f, "(Submission link: [{label}](<{url}>))")
            }
            SubmissionLink::Unresolved { assignments_url } => write!(
                f,
                "(Submission link: Couldn't find, should be posted soon or check [here](<{assignments_url}>))"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sections() {
        let announcement = Announcement {
            sections: vec![
                Section {
                    kind: SectionKind::NewFiles,
                    heading: "Lecture Notes".into(),
                    lines: vec![FileLine {
                        name: "Week 1.pdf".into(),
                        url: "https://canvas.example.edu/a".into(),
                        submission: None,
                    }],
                },
                Section {
                    kind: SectionKind::NewFiles,
                    heading: "Homework".into(),
                    lines: vec![FileLine {
                        name: "HW1.pdf".into(),
                        url: "https://canvas.example.edu/b".into(),
                        submission: Some(SubmissionLink::Resolved {
                            label: "Homework-1".into(),
                            url: "https://canvas.example.edu/c".into(),
                        }),
                    }],
                },
            ],
        };

        assert_eq!(
            announcement.to_string(),
            "## New content posted!\n\
             ### Lecture Notes\n\
             - [Week 1.pdf](<https://canvas.example.edu/a>)\n\
             ### Homework\n\
             - [HW1.pdf](<https://canvas.example.edu/b>) (Submission link: [Homework-1](<https://canvas.example.edu/c>))"
        );
        assert_eq!(announcement.line_count(), 2);
    }

    #[test]
    fn test_render_unresolved_link() {
        let link = SubmissionLink::Unresolved {
            assignments_url: "https://canvas.example.edu/courses/1/assignments".into(),
        };
        assert_eq!(
            link.to_string(),
            "(Submission link: Couldn't find, should be posted soon or check [here](<https://canvas.example.edu/courses/1/assignments>))"
        );
    }

    #[test]
    fn test_heading_without_lines() {
        let announcement = Announcement {
            sections: vec![Section {
                kind: SectionKind::HomeworkFallback,
                heading: "Homework".into(),
                lines: Vec::new(),
            }],
        };
        assert_eq!(announcement.to_string(), "## New content posted!\n### Homework");
    }
}
