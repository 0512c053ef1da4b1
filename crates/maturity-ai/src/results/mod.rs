//! Durable write-once storage for completed assessments.
//!
//! One canonical contract: put a `{profile, results}` pair under a generated
//! 8-character identifier, get it back until the retention window lapses. No
//! update or delete is exposed. The in-memory backend has no native TTL
//! support, so its deterministic expiry policy is lazy: `get` compares the
//! record's age against the TTL and reports expired records as not found,
//! dropping them on observation.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::assessment::{MaturityTier, RespondentProfile, Scores};

pub const RESULT_ID_LENGTH: usize = 8;
const RESULT_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const MAX_ID_ATTEMPTS: usize = 8;
const DEFAULT_TTL_DAYS: i64 = 90;

/// Everything derived from one submission: scores, tier, and the narrative
/// report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResults {
    pub scores: Scores,
    pub maturity_tier: MaturityTier,
    pub analysis: Analysis,
}

/// The persisted record. Write-once; the identifier is generated, never
/// user-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    pub id: String,
    pub user_profile: RespondentProfile,
    pub results: AssessmentResults,
    pub created_at: DateTime<Utc>,
}

/// Not-found is distinct from backend failure so the caller can render
/// "expired or invalid" versus "try again".
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("result not found or expired")]
    NotFound,
    #[error("result store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction so the router and pipeline can be exercised against an
/// in-memory backend.
pub trait ResultStore: Send + Sync {
    fn put(
        &self,
        profile: RespondentProfile,
        results: AssessmentResults,
    ) -> Result<StoredResult, StoreError>;
    fn get(&self, id: &str) -> Result<StoredResult, StoreError>;
}

/// Draw an identifier from the 62-symbol alphanumeric alphabet. The keyspace
/// (62^8) makes collisions vanishingly rare, but `put` still verifies and
/// regenerates a bounded number of times, failing closed if exhausted.
pub fn generate_result_id() -> String {
    let mut rng = rand::thread_rng();
    (0..RESULT_ID_LENGTH)
        .map(|_| {
            let index = rng.gen_range(0..RESULT_ID_ALPHABET.len());
            RESULT_ID_ALPHABET[index] as char
        })
        .collect()
}

/// Shareable permalink for a stored result.
pub fn share_url(origin: &str, id: &str) -> String {
    format!("{}/results/{}", origin.trim_end_matches('/'), id)
}

/// Canonical backend. Per-key writes only ever touch their own entry, so a
/// single mutex around the map is all the coordination needed.
pub struct InMemoryResultStore {
    records: Mutex<HashMap<String, StoredResult>>,
    ttl: Duration,
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::with_ttl(Duration::days(DEFAULT_TTL_DAYS))
    }
}

impl InMemoryResultStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn put_at(
        &self,
        profile: RespondentProfile,
        results: AssessmentResults,
        now: DateTime<Utc>,
    ) -> Result<StoredResult, StoreError> {
        let mut guard = self.records.lock().expect("result store mutex poisoned");

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_result_id();
            if guard.contains_key(&id) {
                continue;
            }
            let record = StoredResult {
                id: id.clone(),
                user_profile: profile,
                results,
                created_at: now,
            };
            guard.insert(id, record.clone());
            return Ok(record);
        }

        Err(StoreError::Unavailable(
            "identifier generation exhausted its attempts".to_string(),
        ))
    }

    fn get_at(&self, id: &str, now: DateTime<Utc>) -> Result<StoredResult, StoreError> {
        let mut guard = self.records.lock().expect("result store mutex poisoned");
        let expired = match guard.get(id) {
            Some(record) => record.created_at + self.ttl <= now,
            None => return Err(StoreError::NotFound),
        };
        if expired {
            guard.remove(id);
            return Err(StoreError::NotFound);
        }
        guard
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

impl ResultStore for InMemoryResultStore {
    fn put(
        &self,
        profile: RespondentProfile,
        results: AssessmentResults,
    ) -> Result<StoredResult, StoreError> {
        self.put_at(profile, results, Utc::now())
    }

    fn get(&self, id: &str) -> Result<StoredResult, StoreError> {
        self.get_at(id, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ActionItem, Swot};
    use std::collections::BTreeMap;

    fn sample_profile() -> RespondentProfile {
        RespondentProfile {
            full_name: "Jordan Reyes".to_string(),
            job_title: "Head of Data".to_string(),
            company_name: "Acme Analytics".to_string(),
            company_size: "51-200".to_string(),
            industry: "Healthcare".to_string(),
        }
    }

    fn sample_results() -> AssessmentResults {
        AssessmentResults {
            scores: Scores {
                dimensions: BTreeMap::new(),
                overall: 3.2,
            },
            maturity_tier: MaturityTier::Developing,
            analysis: Analysis {
                summary: "Developing posture.".to_string(),
                peer_comparison: "Mid-pack.".to_string(),
                swot: Swot::default(),
                recommendations: vec![ActionItem {
                    title: "Govern".to_string(),
                    content: "Charter a council.".to_string(),
                }],
                next_steps: Vec::new(),
            },
        }
    }

    #[test]
    fn put_then_get_round_trips_the_record() {
        let store = InMemoryResultStore::default();
        let stored = store
            .put(sample_profile(), sample_results())
            .expect("put succeeds");

        assert_eq!(stored.id.len(), RESULT_ID_LENGTH);
        assert!(stored.id.chars().all(|ch| ch.is_ascii_alphanumeric()));

        let fetched = store.get(&stored.id).expect("get succeeds");
        assert_eq!(fetched, stored);
        assert_eq!(fetched.user_profile, sample_profile());
        assert_eq!(fetched.results, sample_results());
    }

    #[test]
    fn unknown_identifier_is_not_found() {
        let store = InMemoryResultStore::default();
        let error = store.get("nosuchid").expect_err("id never issued");
        assert!(matches!(error, StoreError::NotFound));
    }

    #[test]
    fn expired_records_read_as_not_found() {
        let store = InMemoryResultStore::with_ttl(Duration::days(90));
        let created = Utc::now();
        let stored = store
            .put_at(sample_profile(), sample_results(), created)
            .expect("put succeeds");

        let just_before = created + Duration::days(90) - Duration::seconds(1);
        assert!(store.get_at(&stored.id, just_before).is_ok());

        let at_expiry = created + Duration::days(90);
        let error = store
            .get_at(&stored.id, at_expiry)
            .expect_err("record expired");
        assert!(matches!(error, StoreError::NotFound));

        // Lazy expiry removed the record for good.
        assert!(store.get_at(&stored.id, created).is_err());
    }

    #[test]
    fn stored_record_serializes_with_the_wire_field_names() {
        let store = InMemoryResultStore::default();
        let stored = store
            .put(sample_profile(), sample_results())
            .expect("put succeeds");

        let value = serde_json::to_value(&stored).expect("serializes");
        assert!(value.get("userProfile").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value["results"].get("maturityTier").is_some());
        assert_eq!(value["results"]["maturityTier"]["level"], 3);
    }

    #[test]
    fn share_url_joins_origin_and_id() {
        assert_eq!(
            share_url("https://example.com", "Ab3xYz12"),
            "https://example.com/results/Ab3xYz12"
        );
        assert_eq!(
            share_url("https://example.com/", "Ab3xYz12"),
            "https://example.com/results/Ab3xYz12"
        );
    }
}
