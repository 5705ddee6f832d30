use parlo_config::PromptPolicy;

use crate::types::{Language, LearnerMode, LengthPreference, Tone, Topic};

/// How the attached image reaches the model, if at all
#[derive(Debug, Clone, Copy)]
pub(crate) enum ImageContext<'a> {
    /// No image attached
    None,
    /// Image is passed as direct visual input alongside the transcript
    Attached,
    /// Image was pre-summarized; the description stands in for it
    Described(&'a str),
}

/// Normalized inputs for instruction rendering
#[derive(Debug)]
pub(crate) struct PromptInput<'a> {
    pub language: Language,
    pub learner_mode: LearnerMode,
    pub topic: Option<&'a Topic>,
    pub tone: Tone,
    pub length: LengthPreference,
    pub image: ImageContext<'a>,
}

/// Render the system instruction string for a rewrite call
///
/// Pure function of its inputs; one canonical template per policy.
pub(crate) fn improve_instructions(input: &PromptInput<'_>, policy: PromptPolicy) -> String {
    let mut lines: Vec<String> = Vec::new();
    let lang = input.language.label();
    let learner = input.learner_mode.label();

    lines.push(format!(
        "You are an expert {lang} speech coach and writing mentor helping a {learner} improve their speaking skills."
    ));
    lines.push(String::new());

    match policy {
        PromptPolicy::Proactive => {
            lines.push(format!(
                "YOUR MISSION: Transform the transcript into polished, effective, and sophisticated {lang} speech while preserving the core message."
            ));
            lines.push(String::new());
            lines.push("Provide PROACTIVE and COMPREHENSIVE feedback. Do not limit yourself to basic grammar corrections.".to_owned());
            lines.push(String::new());
            lines.push("IMPROVEMENT GUIDELINES (apply all of these):".to_owned());
            lines.push("1. GRAMMAR & VOCABULARY: fix all errors, replace basic words with natural, idiomatic expressions, ensure proper word order.".to_owned());
            lines.push("2. STRUCTURE & FLOW: reorganize sentences for logical flow, add smooth transitions, vary sentence length, and explain in feedback what structural improvements were made and why.".to_owned());
            lines.push("3. SOPHISTICATION & STYLE: elevate the language to sound more refined and native-like, use more precise vocabulary, and explain the style improvements in feedback.".to_owned());
            lines.push("4. CONTENT ENHANCEMENT: suggest what could be added to make the speech more complete, with concrete examples of how to expand key points.".to_owned());
        }
        PromptPolicy::Strict => {
            lines.push(format!(
                "YOUR MISSION: Correct and polish the transcript into natural {lang} speech while staying strictly faithful to what was said."
            ));
            lines.push(String::new());
            lines.push("FIDELITY RULES:".to_owned());
            lines.push("- Do NOT introduce facts, details, or claims absent from the transcript.".to_owned());
            lines.push("- Fix grammar, word choice, and phrasing only; keep the speaker's content exactly as given.".to_owned());
            lines.push("- Feedback may point out what is unclear, but must not invent content on the speaker's behalf.".to_owned());
        }
    }

    lines.push(String::new());
    lines.push("BALANCE:".to_owned());
    lines.push("- Preserve the original meaning, intent, and perspective (first-person, etc.).".to_owned());
    lines.push(format!(
        "- Tone preference: {}. Length: {}.",
        input.tone.label(),
        input.length.label()
    ));

    if let Some(topic) = input.topic {
        let title = topic.title.as_deref().unwrap_or_default();
        let prompt = topic
            .prompt
            .as_deref()
            .map(|p| format!(" - {p}"))
            .unwrap_or_default();
        if !title.is_empty() || !prompt.is_empty() {
            lines.push(String::new());
            lines.push(format!("Topic context: {title}{prompt}"));
        }
    }

    match input.image {
        ImageContext::None => {}
        ImageContext::Attached => {
            lines.push(String::new());
            lines.push("An image is provided with this transcript and is sent to you directly. Verify whether the transcript accurately describes what is in the image, evaluate the connection between the speech and the image, and include specific suggestions in the feedback for describing the image better.".to_owned());
        }
        ImageContext::Described(description) => {
            lines.push(String::new());
            lines.push(format!("The transcript describes an image. Image description: {description}"));
            lines.push("Cross-reference the transcript against this description: verify accuracy, evaluate how well the speech covers it, and include specific suggestions in the feedback for describing the image better.".to_owned());
        }
    }

    lines.push(String::new());
    lines.push("FEEDBACK REQUIREMENTS:".to_owned());
    match policy {
        PromptPolicy::Proactive => {
            lines.push("- summary: 3-6 comprehensive feedback points covering overall quality, structure and flow, style and sophistication, and content enhancement. Each suggestion must include the exact location, the current text, the improved version, and the reason.".to_owned());
        }
        PromptPolicy::Strict => {
            lines.push("- summary: 1-6 feedback points grounded only in what the transcript actually contains.".to_owned());
        }
    }
    lines.push("- grammar_fixes: identify grammar errors with clear explanations.".to_owned());
    lines.push("- vocabulary_upgrades: highlight vocabulary improvements with reasons.".to_owned());
    lines.push("- filler_words: count and list all filler words.".to_owned());
    lines.push(String::new());
    lines.push("For alternatives: provide formal, casual, and concise versions demonstrating different speaking styles.".to_owned());
    lines.push(String::new());
    lines.push("Return JSON that matches the required schema exactly.".to_owned());

    lines.join("\n")
}

/// System prompt for the image description call
pub(crate) const fn describe_system(language: Language) -> &'static str {
    match language {
        Language::Korean => {
            "당신은 이미지를 분석하고 설명하는 도우미입니다. 이미지에 대해 자세하고 자연스러운 설명을 제공하세요."
        }
        Language::English => {
            "You are a helpful assistant that analyzes and describes images. Provide detailed and natural descriptions of images."
        }
    }
}

/// User prompt for the image description call
pub(crate) const fn describe_user(language: Language) -> &'static str {
    match language {
        Language::Korean => {
            "이 이미지를 자세히 분석하고 설명해주세요. 이미지에 무엇이 있는지, 어떤 상황인지, 어떤 느낌인지 등을 포함해서 자연스러운 언어로 설명해주세요."
        }
        Language::English => {
            "Please analyze and describe this image in detail. Describe what's in the image, what situation it shows, what feeling it conveys, etc. Use natural language."
        }
    }
}

/// User message wrapping the transcript for a rewrite call
pub(crate) fn rewrite_user_text(language: Language, transcript: &str, has_image: bool) -> String {
    if has_image {
        match language {
            Language::Korean => format!(
                "다음은 사용자가 이미지에 대해 말한 내용입니다. 이미지를 직접 보고 정확하게 평가해주세요:\n\n\"{transcript}\""
            ),
            Language::English => format!(
                "The following is what the user said about the image. Please view the image directly and evaluate accurately:\n\n\"{transcript}\""
            ),
        }
    } else {
        match language {
            Language::Korean => format!("다음은 사용자의 스피치 내용입니다:\n\n\"{transcript}\""),
            Language::English => format!("The following is the user's speech:\n\n\"{transcript}\""),
        }
    }
}

/// User message asking the model to improve an image description
pub(crate) fn analyze_user_text(language: Language, description: &str) -> String {
    match language {
        Language::Korean => format!(
            "다음은 이미지에 대한 설명입니다. 이 설명을 개선하고 더 나은 표현으로 바꿔주세요:\n\n{description}"
        ),
        Language::English => format!(
            "The following is a description of an image. Please improve this description and provide better expressions:\n\n{description}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> PromptInput<'static> {
        PromptInput {
            language: Language::English,
            learner_mode: LearnerMode::EnglishLearner,
            topic: None,
            tone: Tone::Neutral,
            length: LengthPreference::Similar,
            image: ImageContext::None,
        }
    }

    #[test]
    fn proactive_encodes_persona_and_preferences() {
        let rendered = improve_instructions(&base_input(), PromptPolicy::Proactive);
        assert!(rendered.contains("English speech coach"));
        assert!(rendered.contains("English learner"));
        assert!(rendered.contains("Tone preference: neutral. Length: similar."));
        assert!(rendered.contains("CONTENT ENHANCEMENT"));
    }

    #[test]
    fn strict_forbids_additions() {
        let rendered = improve_instructions(&base_input(), PromptPolicy::Strict);
        assert!(rendered.contains("Do NOT introduce facts"));
        assert!(!rendered.contains("CONTENT ENHANCEMENT"));
    }

    #[test]
    fn topic_context_included() {
        let topic = Topic {
            title: Some("My weekend".to_owned()),
            prompt: Some("Describe what you did".to_owned()),
        };
        let mut input = base_input();
        input.topic = Some(&topic);

        let rendered = improve_instructions(&input, PromptPolicy::Proactive);
        assert!(rendered.contains("Topic context: My weekend - Describe what you did"));
    }

    #[test]
    fn attached_image_instructions_included() {
        let mut input = base_input();
        input.image = ImageContext::Attached;

        let rendered = improve_instructions(&input, PromptPolicy::Proactive);
        assert!(rendered.contains("sent to you directly"));
    }

    #[test]
    fn described_image_cross_references() {
        let mut input = base_input();
        input.image = ImageContext::Described("a red bicycle against a wall");

        let rendered = improve_instructions(&input, PromptPolicy::Strict);
        assert!(rendered.contains("a red bicycle against a wall"));
        assert!(rendered.contains("Cross-reference"));
    }

    #[test]
    fn korean_user_text_for_korean_language() {
        let text = rewrite_user_text(Language::Korean, "안녕하세요", true);
        assert!(text.contains("안녕하세요"));
        assert!(text.contains("이미지"));
    }

    #[test]
    fn same_input_same_output() {
        let a = improve_instructions(&base_input(), PromptPolicy::Proactive);
        let b = improve_instructions(&base_input(), PromptPolicy::Proactive);
        assert_eq!(a, b);
    }
}
