use crate::models::{GenerationInput, ImagePayload, Subject};

/// What gets sent to the model: one instruction, optionally with an image.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub instruction: String,
    pub image: Option<ImagePayload>,
}

pub fn build_prompt(input: &GenerationInput) -> PromptPayload {
    match &input.subject {
        Subject::Text { topic, visual_type } => PromptPayload {
            instruction: text_prompt(input, topic, visual_type.name()),
            image: None,
        },
        Subject::Image(image) => PromptPayload {
            instruction: image_prompt(input),
            image: Some(image.clone()),
        },
    }
}

fn text_prompt(input: &GenerationInput, topic: &str, visual: &str) -> String {
    let platform = input.platform.name();
    let limit = input.platform.character_limit();
    let tone = input.tone.name();
    format!(
        "You are a professional social media content creator. Generate content for the following requirements:

Platform: {platform} (character limit: {limit})
Brand: {brand}
Brand Description: {description}
Topic: {topic}
Target Audience: {audience}
Tone: {tone}
Visual Type: {visual}

Please generate a JSON response with the following structure:
{{
  \"visualDescription\": \"A detailed description of what the visual content should look like for {visual} on {platform}\",
  \"caption\": \"An engaging caption in {tone} tone that fits {platform}'s style and character limit\",
  \"hashtags\": [\"array\", \"of\", \"relevant\", \"hashtags\", \"for\", \"{platform}\"],
  \"callToAction\": \"A platform-specific call to action that encourages engagement\"
}}

Make sure the caption is appropriate for {platform} and stays well within the {limit} character limit when combined with hashtags. The content should be engaging, authentic, and aligned with the {tone} tone for {audience}.

Return only the JSON object with exactly these four fields, no additional text.",
        brand = input.brand,
        description = input.brand_description,
        audience = input.target_audience,
    )
}

fn image_prompt(input: &GenerationInput) -> String {
    let platform = input.platform.name();
    let limit = input.platform.character_limit();
    let tone = input.tone.name();
    format!(
        "You are a professional social media content creator analyzing an uploaded image. Generate content for the following requirements:

Platform: {platform} (character limit: {limit})
Brand: {brand}
Brand Description: {description}
Target Audience: {audience}
Tone: {tone}

Analyze the uploaded image and generate a JSON response with the following structure:
{{
  \"visualDescription\": \"A detailed description of what you see in the image and how it could be used for {platform}\",
  \"caption\": \"An engaging caption in {tone} tone that describes the image and fits {platform}'s style and character limit\",
  \"hashtags\": [\"array\", \"of\", \"relevant\", \"hashtags\", \"based\", \"on\", \"image\", \"content\"],
  \"callToAction\": \"A platform-specific call to action that encourages engagement with this image\"
}}

Focus on what you see in the image - objects, people, scenes, colors, mood, etc. Make the caption engaging and relevant to the image content. Ensure the caption and hashtags combined stay well within the {limit} character limit.

Return only the JSON object with exactly these four fields, no additional text.",
        brand = input.brand,
        description = input.brand_description,
        audience = input.target_audience,
    )
}
