// src/models.rs
use crate::errors::BreedSenseError;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
}

/// Metadata of a user-selected file. The bytes themselves are never kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedAsset {
    pub name: String,
    pub size_bytes: u64,
    pub kind: AssetKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Cattle,
    Buffalo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
    Marathi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Marathi];

    pub fn key(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Marathi => "marathi",
        }
    }

    /// Name of the language in its own script.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
            Language::Marathi => "मराठी",
        }
    }

    pub fn from_key(key: &str) -> Result<Self, BreedSenseError> {
        let key = key.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| BreedSenseError::UnsupportedLanguage(key.to_string()))
    }

    /// Like [`Language::from_key`], but unknown keys degrade to English.
    pub fn resolve(key: &str) -> Self {
        Language::from_key(key).unwrap_or_else(|e| {
            warn!("{}; falling back to English", e);
            Language::English
        })
    }

    pub fn greeting(&self) -> &'static str {
        match self {
            Language::English => {
                "Hello! I'm your AI farming assistant. How can I help you today?"
            }
            Language::Hindi => {
                "नमस्ते! मैं आपका AI कृषि सहायक हूं। आज मैं आपकी कैसे मदद कर सकता हूं?"
            }
            Language::Marathi => {
                "नमस्कार! मी तुमचा AI शेती सहाय्यक आहे. आज मी तुम्हाला कशी मदत करू शकतो?"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub state: String,
    pub district: String,
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Breed,
    Disease,
    Chat,
    Hospitals,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisRequest {
    Breed {
        assets: Vec<UploadedAsset>,
    },
    Disease {
        subject_kind: SubjectKind,
        subject_name: String,
        breed_hint: Option<String>,
        assets: Vec<UploadedAsset>,
    },
    Chat {
        text: String,
        /// Raw language key as selected on the page.
        language: String,
    },
    Hospitals {
        location: Location,
    },
}

impl AnalysisRequest {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisRequest::Breed { .. } => AnalysisKind::Breed,
            AnalysisRequest::Disease { .. } => AnalysisKind::Disease,
            AnalysisRequest::Chat { .. } => AnalysisKind::Chat,
            AnalysisRequest::Hospitals { .. } => AnalysisKind::Hospitals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreedShare {
    pub breed: String,
    pub percentage: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreedProfile {
    pub milk_yield: String,
    pub origin_region: String,
    pub key_traits: String,
    pub body_weight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreedResult {
    pub breed_name: String,
    pub confidence: f32,
    pub hybridization: Vec<BreedShare>,
    pub profile: BreedProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseResult {
    pub disease_name: String,
    pub confidence: f32,
    pub severity: Severity,
    pub symptoms: Vec<String>,
    pub remedies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub distance_text: String,
    pub contact: String,
    pub address: String,
    pub rating: f32,
    pub specialization: String,
    pub availability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum AnalysisResult {
    Breed(BreedResult),
    Disease(DiseaseResult),
    Chat(ChatMessage),
    Hospitals(Vec<Hospital>),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResult::Breed(_) => AnalysisKind::Breed,
            AnalysisResult::Disease(_) => AnalysisKind::Disease,
            AnalysisResult::Chat(_) => AnalysisKind::Chat,
            AnalysisResult::Hospitals(_) => AnalysisKind::Hospitals,
        }
    }
}
