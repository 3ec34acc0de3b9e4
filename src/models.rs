use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

/// Opaque record identifier. Stores hand out strings or integers and both are
/// echoed back unchanged; ids are only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Fresh random id for records created in-process.
    pub fn generate() -> Self {
        RecordId::Text(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.unwrap_or_else(Utc::now))
}

/// A user-submitted symptom report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomReport {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub description: String,
    /// Normalized lowercase tags, derived from the description at creation.
    #[serde(
        rename = "symptoms_keywords",
        alias = "keywords",
        default,
        deserialize_with = "null_as_default"
    )]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: SymptomStatus,
    #[serde(default = "Utc::now", deserialize_with = "null_as_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub solutions: Vec<Solution>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SymptomStatus {
    #[default]
    Open,
    Resolved,
    SeeSpecialist,
}

impl std::fmt::Display for SymptomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymptomStatus::Open => write!(f, "open"),
            SymptomStatus::Resolved => write!(f, "resolved"),
            SymptomStatus::SeeSpecialist => write!(f, "see_specialist"),
        }
    }
}

impl SymptomReport {
    pub fn new(title: impl Into<String>, description: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            id: RecordId::generate(),
            title: title.into(),
            description: description.into(),
            keywords,
            status: SymptomStatus::Open,
            created_at: Utc::now(),
            solutions: Vec::new(),
        }
    }

    /// Move the report out of `open`. Resolved and see-specialist are terminal.
    pub fn transition_to(&mut self, to: SymptomStatus) -> Result<(), ModelError> {
        match (self.status, to) {
            (SymptomStatus::Open, SymptomStatus::Resolved | SymptomStatus::SeeSpecialist) => {
                self.status = to;
                Ok(())
            }
            (from, to) => Err(ModelError::InvalidTransition { from, to }),
        }
    }

    /// Mark resolved and attach the solution that worked.
    pub fn resolve(&mut self, solution_text: &str) -> Result<&Solution, ModelError> {
        let text = solution_text.trim();
        if text.is_empty() {
            return Err(ModelError::EmptySolution);
        }
        self.transition_to(SymptomStatus::Resolved)?;
        self.solutions.push(Solution::new(self.id.clone(), text));
        self.solutions.last().ok_or(ModelError::EmptySolution)
    }

    pub fn refer_to_specialist(&mut self) -> Result<(), ModelError> {
        self.transition_to(SymptomStatus::SeeSpecialist)
    }

    /// Text of the first attached solution, if any.
    pub fn first_solution_text(&self) -> Option<&str> {
        self.solutions.first().map(|s| s.text.as_str())
    }
}

/// A remedy attached to a resolved report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub id: RecordId,
    #[serde(default)]
    pub symptom_id: Option<RecordId>,
    #[serde(rename = "solution_text", default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default = "Utc::now", deserialize_with = "null_as_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Like,
    Dislike,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    #[serde(rename = "user_id")]
    pub voter_id: RecordId,
    pub vote_type: VoteType,
}

/// What a vote call did to the voter's existing vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChange {
    Added,
    Replaced,
    Removed,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct VoteTally {
    pub likes: usize,
    pub dislikes: usize,
}

impl Solution {
    pub fn new(symptom_id: RecordId, text: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            symptom_id: Some(symptom_id),
            text: text.into(),
            created_at: Utc::now(),
            votes: Vec::new(),
        }
    }

    /// One vote per voter: repeating the same vote withdraws it, a different
    /// vote replaces the earlier one.
    pub fn cast_vote(&mut self, voter_id: RecordId, vote_type: VoteType) -> VoteChange {
        match self.votes.iter().position(|v| v.voter_id == voter_id) {
            Some(i) if self.votes[i].vote_type == vote_type => {
                self.votes.remove(i);
                VoteChange::Removed
            }
            Some(i) => {
                self.votes[i].vote_type = vote_type;
                VoteChange::Replaced
            }
            None => {
                self.votes.push(Vote { voter_id, vote_type });
                VoteChange::Added
            }
        }
    }

    pub fn vote_of(&self, voter_id: &RecordId) -> Option<VoteType> {
        self.votes
            .iter()
            .find(|v| &v.voter_id == voter_id)
            .map(|v| v.vote_type)
    }

    pub fn tally(&self) -> VoteTally {
        self.votes.iter().fold(VoteTally::default(), |mut t, v| {
            match v.vote_type {
                VoteType::Like => t.likes += 1,
                VoteType::Dislike => t.dislikes += 1,
            }
            t
        })
    }
}

/// Where a match came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchMethod {
    #[serde(rename = "ai-advanced")]
    AiAdvanced,
    #[serde(rename = "keyword")]
    Keyword,
    #[serde(rename = "none")]
    None,
}

/// A candidate report annotated with how similar it is to the target.
/// Computed per request, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub report: SymptomReport,
    /// Always within [0, 1].
    pub similarity_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_reasoning: Option<String>,
    pub match_method: MatchMethod,
    /// Target keywords found in the candidate (keyword matches only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub common_keywords: Vec<String>,
}

/// Extract-keywords request
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractKeywordsRequest {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractKeywordsResponse {
    pub keywords: Vec<String>,
}

/// Which matcher the caller wants
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// AI first, keyword overlap when the AI path fails
    #[default]
    Auto,
    /// Keyword overlap only
    Keyword,
}

/// Match-symptoms request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSymptomsRequest {
    pub current_symptom: Option<SymptomReport>,
    pub all_symptoms: Option<Vec<SymptomReport>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: MatchMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSymptomsResponse {
    pub matches: Vec<MatchResult>,
    pub method: MatchMethod,
}

/// A resolved similar case quoted to the suggestion prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarCase {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub solution_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub solutions: Vec<SolutionText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolutionText {
    #[serde(default, deserialize_with = "null_as_default")]
    pub solution_text: String,
}

impl SimilarCase {
    pub fn solution(&self) -> Option<&str> {
        self.solution_text
            .as_deref()
            .or_else(|| self.solutions.first().map(|s| s.solution_text.as_str()))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Generate-suggestions request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSuggestionsRequest {
    pub symptoms: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub similar_cases: Vec<SimilarCase>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateSuggestionsResponse {
    pub suggestions: String,
}

/// Non-secret view of the LLM setup
#[derive(Debug, Clone, Serialize)]
pub struct LlmStatus {
    pub provider: String,
    pub chat_model: String,
    pub configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_to_snake_case() {
        let json = serde_json::to_value(SymptomStatus::SeeSpecialist).unwrap();
        assert_eq!(json, "see_specialist");
    }

    #[test]
    fn test_match_method_wire_names() {
        assert_eq!(serde_json::to_value(MatchMethod::AiAdvanced).unwrap(), "ai-advanced");
        assert_eq!(serde_json::to_value(MatchMethod::Keyword).unwrap(), "keyword");
        assert_eq!(serde_json::to_value(MatchMethod::None).unwrap(), "none");
    }

    #[test]
    fn test_open_can_move_to_either_terminal_state() {
        let mut a = SymptomReport::new("a", "a", vec![]);
        a.transition_to(SymptomStatus::Resolved).unwrap();
        let mut b = SymptomReport::new("b", "b", vec![]);
        b.transition_to(SymptomStatus::SeeSpecialist).unwrap();
        assert_eq!(b.status, SymptomStatus::SeeSpecialist);
    }

    #[test]
    fn test_terminal_states_cannot_transition() {
        let mut report = SymptomReport::new("t", "d", vec![]);
        report.refer_to_specialist().unwrap();
        let err = report.transition_to(SymptomStatus::Resolved).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidTransition {
                from: SymptomStatus::SeeSpecialist,
                to: SymptomStatus::Resolved
            }
        ));
        assert!(report.transition_to(SymptomStatus::Open).is_err());
    }

    #[test]
    fn test_resolve_requires_solution_text() {
        let mut report = SymptomReport::new("t", "d", vec![]);
        assert!(matches!(report.resolve("  "), Err(ModelError::EmptySolution)));
        assert_eq!(report.status, SymptomStatus::Open);

        let id = report.id.clone();
        let solution = report.resolve(" rest and fluids ").unwrap();
        assert_eq!(solution.text, "rest and fluids");
        assert_eq!(solution.symptom_id, Some(id));
        assert_eq!(report.status, SymptomStatus::Resolved);
        assert_eq!(report.first_solution_text(), Some("rest and fluids"));
    }

    #[test]
    fn test_vote_replace_and_toggle() {
        let mut solution = Solution::new(RecordId::generate(), "ice pack");
        let voter = RecordId::generate();

        assert_eq!(solution.cast_vote(voter.clone(), VoteType::Like), VoteChange::Added);
        assert_eq!(solution.cast_vote(voter.clone(), VoteType::Dislike), VoteChange::Replaced);
        assert_eq!(solution.votes.len(), 1);
        assert_eq!(solution.vote_of(&voter), Some(VoteType::Dislike));

        assert_eq!(solution.cast_vote(voter.clone(), VoteType::Dislike), VoteChange::Removed);
        assert!(solution.votes.is_empty());
        assert_eq!(solution.vote_of(&voter), None);
    }

    #[test]
    fn test_tally_counts_each_voter_once() {
        let mut solution = Solution::new(RecordId::from(7), "stretching");
        solution.cast_vote(RecordId::from("a"), VoteType::Like);
        solution.cast_vote(RecordId::from("b"), VoteType::Like);
        solution.cast_vote(RecordId::from("c"), VoteType::Dislike);
        solution.cast_vote(RecordId::from("b"), VoteType::Dislike);

        assert_eq!(solution.tally(), VoteTally { likes: 1, dislikes: 2 });
    }

    #[test]
    fn test_report_accepts_store_shape() {
        let json = r#"{
            "id": "6f1c3c8e-3f7a-4a51-9b7e-2d0b4c6f9a10",
            "title": "Headache",
            "description": "Throbbing headache for two days",
            "symptoms_keywords": ["throbbing", "headache", "days"],
            "status": "resolved",
            "created_at": "2024-05-01T10:00:00Z",
            "solutions": [{
                "id": "0b7d8d7a-1f43-4b52-8c53-5a9a63f1b2c4",
                "solution_text": "Hydration helped",
                "created_at": "2024-05-02T10:00:00Z"
            }]
        }"#;
        let report: SymptomReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.keywords.len(), 3);
        assert_eq!(report.status, SymptomStatus::Resolved);
        assert_eq!(report.first_solution_text(), Some("Hydration helped"));
    }

    #[test]
    fn test_report_minimal_fields_default() {
        let json = r#"{"id": "6f1c3c8e-3f7a-4a51-9b7e-2d0b4c6f9a10", "description": "sore throat"}"#;
        let report: SymptomReport = serde_json::from_str(json).unwrap();
        assert!(report.keywords.is_empty());
        assert_eq!(report.status, SymptomStatus::Open);
        assert!(report.title.is_empty());
    }

    #[test]
    fn test_match_result_flattens_report() {
        let report = SymptomReport::new("Rash", "Itchy rash on arm", vec!["rash".into()]);
        let result = MatchResult {
            report,
            similarity_score: 0.8,
            match_reasoning: Some("same rash".into()),
            match_method: MatchMethod::AiAdvanced,
            common_keywords: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["title"], "Rash");
        assert_eq!(json["similarityScore"], 0.8);
        assert_eq!(json["matchReasoning"], "same rash");
        assert_eq!(json["matchMethod"], "ai-advanced");
        assert!(json.get("commonKeywords").is_none());
    }

    #[test]
    fn test_similar_case_solution_sources() {
        let direct: SimilarCase =
            serde_json::from_str(r#"{"title": "a", "solution_text": "rest"}"#).unwrap();
        assert_eq!(direct.solution(), Some("rest"));

        let nested: SimilarCase =
            serde_json::from_str(r#"{"title": "b", "solutions": [{"solution_text": "ice"}]}"#)
                .unwrap();
        assert_eq!(nested.solution(), Some("ice"));

        let none: SimilarCase = serde_json::from_str(r#"{"title": "c"}"#).unwrap();
        assert_eq!(none.solution(), None);
    }

    #[test]
    fn test_match_mode_defaults_to_auto() {
        let req: MatchSymptomsRequest = serde_json::from_str(r#"{"allSymptoms": []}"#).unwrap();
        assert_eq!(req.method, MatchMode::Auto);
        assert!(req.current_symptom.is_none());
    }

    #[test]
    fn test_report_null_collections_read_as_empty() {
        let json = r#"{
            "id": "abc",
            "title": null,
            "description": "sore throat",
            "symptoms_keywords": null,
            "status": null,
            "created_at": null,
            "solutions": null
        }"#;
        let report: SymptomReport = serde_json::from_str(json).unwrap();
        assert!(report.title.is_empty());
        assert!(report.keywords.is_empty());
        assert_eq!(report.status, SymptomStatus::Open);
        assert!(report.solutions.is_empty());
    }

    #[test]
    fn test_solution_null_votes_read_as_empty() {
        let json = r#"{"id": 4, "symptom_id": 2, "solution_text": "rest", "votes": null}"#;
        let solution: Solution = serde_json::from_str(json).unwrap();
        assert!(solution.votes.is_empty());
        assert_eq!(solution.symptom_id, Some(RecordId::Number(2)));
    }

    #[test]
    fn test_record_ids_are_opaque() {
        let numeric: SymptomReport =
            serde_json::from_str(r#"{"id": 42, "description": "cough"}"#).unwrap();
        assert_eq!(numeric.id, RecordId::Number(42));
        assert_eq!(serde_json::to_value(&numeric).unwrap()["id"], 42);

        let text: SymptomReport =
            serde_json::from_str(r#"{"id": "rec_9", "description": "cough"}"#).unwrap();
        assert_eq!(text.id, RecordId::from("rec_9"));
        assert_eq!(text.id.to_string(), "rec_9");

        // Same digits, different type: not the same record
        assert_ne!(RecordId::from(42), RecordId::from("42"));
    }

    #[test]
    fn test_request_nulls_read_as_defaults() {
        let req: GenerateSuggestionsRequest =
            serde_json::from_str(r#"{"symptoms": "headache", "similarCases": null}"#).unwrap();
        assert!(req.similar_cases.is_empty());

        let case: SimilarCase = serde_json::from_str(
            r#"{"title": null, "solution_text": null, "solutions": [{"solution_text": null}]}"#,
        )
        .unwrap();
        assert!(case.title.is_empty());
        assert_eq!(case.solution(), None);

        let req: MatchSymptomsRequest =
            serde_json::from_str(r#"{"allSymptoms": [], "method": null}"#).unwrap();
        assert_eq!(req.method, MatchMode::Auto);
    }
}
