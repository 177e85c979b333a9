use serde::{Deserialize, Serialize};

//
// ─── CLASSIFICATION ────────────────────────────────────────────────────────────
//

/// Semantic class of a resource, derived from its free-form `resource_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Video,
    Pdf,
    /// Any type the catalog sends that has no dedicated handling.
    Other,
}

impl ResourceKind {
    /// Classifies a raw resource type, ignoring ASCII case.
    #[must_use]
    pub fn classify(resource_type: &str) -> Self {
        if resource_type.eq_ignore_ascii_case("video") {
            Self::Video
        } else if resource_type.eq_ignore_ascii_case("pdf") {
            Self::Pdf
        } else {
            Self::Other
        }
    }
}

/// How a resource should be offered to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Save the file locally.
    Download,
    /// Open the link in a new context (tab, viewer, player).
    Open,
}

//
// ─── RESOURCE ──────────────────────────────────────────────────────────────────
//

/// A link attached to a lesson: a lecture video, a PDF handout, etc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub url: String,
    pub title: String,
    pub resource_type: String,
}

impl Resource {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        resource_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            resource_type: resource_type.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::classify(&self.resource_type)
    }

    #[must_use]
    pub fn is_video(&self) -> bool {
        self.kind() == ResourceKind::Video
    }

    /// PDFs are downloaded; everything else opens in a new context.
    #[must_use]
    pub fn affordance(&self) -> Affordance {
        match self.kind() {
            ResourceKind::Pdf => Affordance::Download,
            ResourceKind::Video | ResourceKind::Other => Affordance::Open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_ignores_case() {
        assert_eq!(ResourceKind::classify("VIDEO"), ResourceKind::Video);
        assert_eq!(ResourceKind::classify("Video"), ResourceKind::Video);
        assert_eq!(ResourceKind::classify("pDf"), ResourceKind::Pdf);
        assert_eq!(ResourceKind::classify("slides"), ResourceKind::Other);
        assert_eq!(ResourceKind::classify(""), ResourceKind::Other);
    }

    #[test]
    fn only_pdf_is_downloadable() {
        let pdf = Resource::new("Notes", "PDF", "/notes.pdf");
        let video = Resource::new("Lecture", "video", "https://example.org/v");
        let link = Resource::new("Article", "link", "https://example.org/a");

        assert_eq!(pdf.affordance(), Affordance::Download);
        assert_eq!(video.affordance(), Affordance::Open);
        assert_eq!(link.affordance(), Affordance::Open);
    }

    #[test]
    fn deserializes_camel_case_resource_type() {
        let json = r#"{"title":"Notes","resourceType":"pdf","url":"n1"}"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource, Resource::new("Notes", "pdf", "n1"));
    }
}
