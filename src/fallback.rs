use crate::models::{GeneratedContent, GenerationInput, Mode, VisualType};

const CALL_TO_ACTION: &str = "What do you think? Share your thoughts below!";

/// Offline content for when the model call or its parse fails. Deterministic
/// and infallible; `mode` is the mode that was attempted.
pub fn fallback(input: &GenerationInput, mode: Mode) -> GeneratedContent {
    match (mode, input.topic()) {
        (Mode::Text, Some(topic)) => text_fallback(input, topic),
        _ => image_fallback(input),
    }
}

fn text_fallback(input: &GenerationInput, topic: &str) -> GeneratedContent {
    let visual = input.visual_type().unwrap_or_default();
    GeneratedContent::new(
        format!(
            "A {} for {} showcasing {} with {}'s branding.",
            visual_label(visual),
            input.platform.name(),
            topic,
            input.brand
        ),
        format!(
            "🚀 Exciting update about {}! At {}, we're passionate about {}. Perfect for {} looking to stay ahead.",
            topic, input.brand, input.brand_description, input.target_audience
        ),
        vec![hashtag(topic), hashtag(&input.brand), "#Innovation".into(), "#Growth".into()],
        CALL_TO_ACTION.into(),
    )
}

fn image_fallback(input: &GenerationInput) -> GeneratedContent {
    GeneratedContent::new(
        "Unable to analyze the uploaded image. Please try again or check your API key.".into(),
        format!(
            "Check out this amazing image! At {}, we love sharing visual content with our community.",
            input.brand
        ),
        vec![hashtag(&input.brand), "#VisualContent".into(), "#Community".into(), "#Share".into()],
        CALL_TO_ACTION.into(),
    )
}

fn visual_label(visual: VisualType) -> String {
    visual.name().to_lowercase()
}

fn hashtag(words: &str) -> String {
    let mut tag = String::from("#");
    tag.extend(words.chars().filter(|c| !c.is_whitespace()));
    tag
}
