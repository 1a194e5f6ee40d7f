use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target social network. Each one carries its post character limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    Instagram,
    Twitter,
    LinkedIn,
    Facebook,
    TikTok,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::Facebook,
        Platform::TikTok,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
            Platform::LinkedIn => "LinkedIn",
            Platform::Facebook => "Facebook",
            Platform::TikTok => "TikTok",
        }
    }

    pub fn character_limit(self) -> usize {
        match self {
            Platform::Instagram => 2200,
            Platform::Twitter => 280,
            Platform::LinkedIn => 3000,
            Platform::Facebook => 63206,
            Platform::TikTok => 150,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Inspirational,
    Humorous,
    Educational,
    Promotional,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Inspirational,
        Tone::Humorous,
        Tone::Educational,
        Tone::Promotional,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Inspirational => "Inspirational",
            Tone::Humorous => "Humorous",
            Tone::Educational => "Educational",
            Tone::Promotional => "Promotional",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Tone::Professional => "💼",
            Tone::Casual => "😊",
            Tone::Inspirational => "✨",
            Tone::Humorous => "😄",
            Tone::Educational => "📚",
            Tone::Promotional => "🚀",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tone::Professional => "Formal and business-oriented",
            Tone::Casual => "Friendly and relaxed",
            Tone::Inspirational => "Motivating and uplifting",
            Tone::Humorous => "Funny and entertaining",
            Tone::Educational => "Informative and learning-focused",
            Tone::Promotional => "Sales and marketing oriented",
        }
    }
}

/// Kind of visual asset a text-mode post is planned around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualType {
    #[default]
    Photo,
    Carousel,
    Video,
    Graphic,
}

impl VisualType {
    pub const ALL: [VisualType; 4] = [
        VisualType::Photo,
        VisualType::Carousel,
        VisualType::Video,
        VisualType::Graphic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VisualType::Photo => "Photo",
            VisualType::Carousel => "Carousel",
            VisualType::Video => "Video",
            VisualType::Graphic => "Graphic",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            VisualType::Photo => "Single image post",
            VisualType::Carousel => "Multiple images/slides",
            VisualType::Video => "Video content",
            VisualType::Graphic => "Designed visual content",
        }
    }
}

pub fn audience_suggestions() -> Vec<&'static str> {
    vec![
        "Young professionals (25-35)",
        "Small business owners",
        "Students and graduates",
        "Tech enthusiasts",
        "Creative professionals",
        "Entrepreneurs",
        "Marketing professionals",
        "General consumers",
    ]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Text,
    Image,
}

/// Uploaded image as raw bytes plus its declared media type.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub bytes: Bytes,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    Text { topic: String, visual_type: VisualType },
    Image(ImagePayload),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInput {
    pub platform: Platform,
    pub tone: Tone,
    pub brand: String,
    pub brand_description: String,
    pub target_audience: String,
    pub subject: Subject,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("brand name is required")]
    MissingBrand,
    #[error("topic is required in text mode")]
    MissingTopic,
    #[error("an image is required in image mode")]
    MissingImage,
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("image data is not valid base64: {0}")]
    InvalidImageEncoding(String),
}

impl GenerationInput {
    pub fn mode(&self) -> Mode {
        match self.subject {
            Subject::Text { .. } => Mode::Text,
            Subject::Image(_) => Mode::Image,
        }
    }

    pub fn topic(&self) -> Option<&str> {
        match &self.subject {
            Subject::Text { topic, .. } => Some(topic),
            Subject::Image(_) => None,
        }
    }

    pub fn visual_type(&self) -> Option<VisualType> {
        match self.subject {
            Subject::Text { visual_type, .. } => Some(visual_type),
            Subject::Image(_) => None,
        }
    }

    /// Checks the fields a request cannot be issued without.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.brand.trim().is_empty() {
            return Err(InputError::MissingBrand);
        }
        match &self.subject {
            Subject::Text { topic, .. } if topic.trim().is_empty() => Err(InputError::MissingTopic),
            Subject::Text { .. } => Ok(()),
            Subject::Image(image) => {
                if image.bytes.is_empty() {
                    return Err(InputError::MissingImage);
                }
                if !image.mime_type.starts_with("image/") {
                    return Err(InputError::UnsupportedMediaType(image.mime_type.clone()));
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub visual_description: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub call_to_action: String,
    pub character_count: usize,
}

impl GeneratedContent {
    /// Builds content with `character_count` derived from caption and hashtags.
    pub fn new(
        visual_description: String,
        caption: String,
        hashtags: Vec<String>,
        call_to_action: String,
    ) -> Self {
        let character_count = character_count(&caption, &hashtags);
        Self { visual_description, caption, hashtags, call_to_action, character_count }
    }

    pub fn fits(&self, platform: Platform) -> bool {
        self.character_count <= platform.character_limit()
    }

    /// Plain-text rendering of the whole post, ready to paste.
    pub fn to_post_text(&self) -> String {
        format!(
            "VISUAL: {}\n\nCAPTION: {}\n\n{}\n\nCTA: {}",
            self.visual_description,
            self.caption,
            self.hashtags.join(" "),
            self.call_to_action
        )
    }
}

/// Length of `caption + " " + hashtags joined by spaces`. The separator is
/// counted even when there are no hashtags.
pub fn character_count(caption: &str, hashtags: &[String]) -> usize {
    caption.chars().count() + 1 + hashtags.join(" ").chars().count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    FellBack,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub content: GeneratedContent,
    pub outcome: Outcome,
}

/// Body of `POST /api/generate`. Missing fields default so that validation,
/// not deserialization, reports what is absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub visual_type: VisualType,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub brand_description: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub image: Option<ImageUpload>,
}

/// Base64 image as sent by the browser; a `data:` URL prefix is tolerated.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    pub data: String,
    #[serde(default)]
    pub mime_type: String,
}

impl ImageUpload {
    fn decode(self) -> Result<ImagePayload, InputError> {
        let (declared, encoded) = match self.data.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
            Some((header, encoded)) => (header.trim_end_matches(";base64").to_string(), encoded.to_string()),
            None => (String::new(), self.data),
        };
        let mime_type = if self.mime_type.is_empty() { declared } else { self.mime_type };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| InputError::InvalidImageEncoding(e.to_string()))?;
        Ok(ImagePayload { bytes: Bytes::from(bytes), mime_type })
    }
}

impl TryFrom<GenerateRequest> for GenerationInput {
    type Error = InputError;

    fn try_from(req: GenerateRequest) -> Result<Self, Self::Error> {
        let subject = match req.mode {
            Mode::Text => Subject::Text { topic: req.topic, visual_type: req.visual_type },
            Mode::Image => Subject::Image(req.image.ok_or(InputError::MissingImage)?.decode()?),
        };
        Ok(GenerationInput {
            platform: req.platform,
            tone: req.tone,
            brand: req.brand,
            brand_description: req.brand_description,
            target_audience: req.target_audience,
            subject,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn text_input(brand: &str, topic: &str) -> GenerationInput {
        GenerationInput {
            platform: Platform::Twitter,
            tone: Tone::Promotional,
            brand: brand.into(),
            brand_description: "tools for builders".into(),
            target_audience: "Entrepreneurs".into(),
            subject: Subject::Text { topic: topic.into(), visual_type: VisualType::Photo },
        }
    }

    pub(crate) fn image_input(bytes: &'static [u8], mime_type: &str) -> GenerationInput {
        GenerationInput {
            subject: Subject::Image(ImagePayload {
                bytes: Bytes::from_static(bytes),
                mime_type: mime_type.into(),
            }),
            ..text_input("Acme", "")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{image_input, text_input};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn catalog_limits() {
        let limits: Vec<_> = Platform::ALL.iter().map(|p| (p.name(), p.character_limit())).collect();
        assert_eq!(
            limits,
            vec![
                ("Instagram", 2200),
                ("Twitter", 280),
                ("LinkedIn", 3000),
                ("Facebook", 63206),
                ("TikTok", 150)
            ]
        );
    }

    #[test]
    fn platforms_deserialize_by_name() {
        let p: Platform = serde_json::from_str("\"LinkedIn\"").unwrap();
        assert_eq!(p, Platform::LinkedIn);
        assert!(serde_json::from_str::<Platform>("\"Myspace\"").is_err());
    }

    #[test]
    fn text_mode_requires_brand_and_topic() {
        assert_eq!(text_input("Acme", "launch").validate(), Ok(()));
        assert_eq!(text_input("  ", "launch").validate(), Err(InputError::MissingBrand));
        assert_eq!(text_input("Acme", " \t").validate(), Err(InputError::MissingTopic));
    }

    #[test]
    fn image_mode_requires_image_bytes_and_media_type() {
        assert_eq!(image_input(b"\x89PNG", "image/png").validate(), Ok(()));
        assert_eq!(image_input(b"", "image/png").validate(), Err(InputError::MissingImage));
        assert_eq!(
            image_input(b"%PDF", "application/pdf").validate(),
            Err(InputError::UnsupportedMediaType("application/pdf".into()))
        );
        assert_eq!(image_input(b"\x89PNG", "image/png").mode(), Mode::Image);
    }

    #[test]
    fn character_count_includes_separator() {
        assert_eq!(character_count("Big news!", &["#Acme".into(), "#Launch".into()]), 23);
        assert_eq!(character_count("Hi", &[]), 3);
        assert_eq!(character_count("🚀 go", &["#ü".into()]), 4 + 1 + 2);
    }

    #[test]
    fn post_text_layout() {
        let content = GeneratedContent::new(
            "a photo".into(),
            "Hello".into(),
            vec!["#a".into(), "#b".into()],
            "Reply!".into(),
        );
        assert_eq!(content.to_post_text(), "VISUAL: a photo\n\nCAPTION: Hello\n\n#a #b\n\nCTA: Reply!");
        assert_eq!(content.character_count, 11);
        assert!(content.fits(Platform::TikTok));
    }

    #[test]
    fn request_converts_to_text_input() {
        let req: GenerateRequest = serde_json::from_str(
            r#"{"platform":"TikTok","tone":"Humorous","visual_type":"Video","brand":"Acme","topic":"launch"}"#,
        )
        .unwrap();
        let input = GenerationInput::try_from(req).unwrap();
        assert_eq!(input.platform, Platform::TikTok);
        assert_eq!(input.tone, Tone::Humorous);
        assert_eq!(input.mode(), Mode::Text);
        assert_eq!(input.topic(), Some("launch"));
        assert_eq!(input.visual_type(), Some(VisualType::Video));
        assert_eq!(input.target_audience, "");
    }

    #[test]
    fn request_decodes_data_url_image() {
        let req: GenerateRequest = serde_json::from_str(
            r#"{"mode":"image","brand":"Acme","image":{"data":"data:image/png;base64,iVBORw=="}}"#,
        )
        .unwrap();
        let input = GenerationInput::try_from(req).unwrap();
        assert_eq!(input.platform, Platform::Instagram);
        match input.subject {
            Subject::Image(image) => {
                assert_eq!(image.mime_type, "image/png");
                assert_eq!(&image.bytes[..], b"\x89PNG");
            }
            other => panic!("expected image subject, got {other:?}"),
        }
    }

    #[test]
    fn request_without_image_or_with_bad_base64_is_rejected() {
        let req = GenerateRequest { mode: Mode::Image, brand: "Acme".into(), ..Default::default() };
        assert_eq!(GenerationInput::try_from(req).unwrap_err(), InputError::MissingImage);

        let req = GenerateRequest {
            mode: Mode::Image,
            brand: "Acme".into(),
            image: Some(ImageUpload { data: "not base64!".into(), mime_type: "image/png".into() }),
            ..Default::default()
        };
        assert!(matches!(GenerationInput::try_from(req), Err(InputError::InvalidImageEncoding(_))));
    }
}
