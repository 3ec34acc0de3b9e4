//! Deterministic keyword extraction used when the model is unavailable.
//!
//! Pipeline per whitespace token:
//! 1. Lowercase and strip punctuation
//! 2. Drop tokens of 2 characters or fewer and common stop-words
//! 3. Keep tokens that contain, or are contained in, a medical vocabulary term
//! 4. De-duplicate in first-seen order and cap at [`MAX_FALLBACK_KEYWORDS`]

/// Upper bound on keywords returned by the fallback extractor.
pub const MAX_FALLBACK_KEYWORDS: usize = 10;

/// Symptoms, body parts, severity/duration words and pain descriptors.
const MEDICAL_VOCABULARY: &[&str] = &[
    // Symptoms
    "pain", "ache", "sore", "hurt", "burning", "tingling", "numb", "dizzy", "nausea",
    "fever", "cough", "cold", "fatigue", "tired", "weakness", "swelling", "rash",
    "itch", "bleeding", "discharge", "vomiting", "diarrhea", "constipation",
    "headache", "migraine", "cramp", "spasm", "stiff", "tender", "pressure",
    "breathless", "wheezing", "congestion", "runny", "stuffy", "sneezing",
    // Body parts
    "head", "neck", "shoulder", "back", "chest", "stomach", "abdomen", "belly",
    "arm", "hand", "finger", "leg", "foot", "toe", "knee", "elbow", "wrist", "ankle",
    "eye", "ear", "nose", "throat", "mouth", "tooth", "teeth", "tongue", "gum",
    "heart", "lung", "liver", "kidney", "skin", "muscle", "joint", "bone",
    // Severity / duration
    "severe", "mild", "moderate", "chronic", "acute", "sudden", "gradual",
    "constant", "intermittent", "persistent", "occasional", "frequent",
    "days", "weeks", "months", "hours", "morning", "night", "evening",
    // Descriptors
    "sharp", "dull", "throbbing", "stabbing", "shooting", "radiating",
    "swollen", "inflamed", "red", "bruised", "infected",
];

/// Filler words dropped before the vocabulary test ("and" is inside "hand").
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "have", "has", "had", "been", "being", "this", "that",
    "these", "those", "from", "was", "were", "are", "but", "not", "you", "your", "very",
    "really", "some", "into", "also", "since", "after", "before", "when", "what", "where",
    "which", "while", "about", "feel", "feels", "feeling", "like", "just", "get", "got",
    "getting", "its", "any", "all", "can", "cannot", "could", "would", "should", "there",
    "their", "they", "them", "then", "than", "out", "off", "over", "under", "again",
    "still", "much", "more", "most", "lot", "bit", "her", "him", "his", "she", "who",
    "how", "our", "own", "too", "now", "only", "same", "such", "each", "other",
    "because", "will", "did", "does", "doing", "started", "seems", "thing", "things",
];

/// Extract medical keywords without calling a model. Pure: the same input always
/// yields the same keywords in the same order.
pub fn extract_fallback_keywords(description: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();

    for raw in description.split_whitespace() {
        let token = normalize_token(raw);
        if token.chars().count() <= 2 || STOP_WORDS.contains(&token.as_str()) {
            continue;
        }
        if !is_medical_term(&token) || keywords.contains(&token) {
            continue;
        }
        keywords.push(token);
        if keywords.len() == MAX_FALLBACK_KEYWORDS {
            break;
        }
    }

    keywords
}

/// Lowercase and keep only alphanumerics and inner hyphens.
fn normalize_token(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>()
        .trim_matches('-')
        .to_string()
}

fn is_medical_term(token: &str) -> bool {
    MEDICAL_VOCABULARY
        .iter()
        .any(|term| token.contains(term) || term.contains(token))
}
