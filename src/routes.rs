// src/routes.rs
//! Navigation shell: the static route table, header navigation and footer,
//! plus the informational content shown on each page.

use crate::models::{AnalysisKind, Language};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    Home,
    BreedRecognition,
    DiseasePrediction,
    AiChatbot,
    NearbyHospitals,
}

impl PageKind {
    pub const ALL: [PageKind; 5] = [
        PageKind::Home,
        PageKind::BreedRecognition,
        PageKind::DiseasePrediction,
        PageKind::AiChatbot,
        PageKind::NearbyHospitals,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            PageKind::Home => "/",
            PageKind::BreedRecognition => "/breed-recognition",
            PageKind::DiseasePrediction => "/disease-prediction",
            PageKind::AiChatbot => "/ai-chatbot",
            PageKind::NearbyHospitals => "/nearby-hospitals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PageKind::Home => "Home",
            PageKind::BreedRecognition => "Breed Recognition",
            PageKind::DiseasePrediction => "Disease Prediction",
            PageKind::AiChatbot => "AI Chatbot",
            PageKind::NearbyHospitals => "Nearby Hospitals",
        }
    }

    /// The workflow a page runs. Home has none.
    pub fn analysis_kind(&self) -> Option<AnalysisKind> {
        match self {
            PageKind::Home => None,
            PageKind::BreedRecognition => Some(AnalysisKind::Breed),
            PageKind::DiseasePrediction => Some(AnalysisKind::Disease),
            PageKind::AiChatbot => Some(AnalysisKind::Chat),
            PageKind::NearbyHospitals => Some(AnalysisKind::Hospitals),
        }
    }

    pub fn for_analysis(kind: AnalysisKind) -> Self {
        match kind {
            AnalysisKind::Breed => PageKind::BreedRecognition,
            AnalysisKind::Disease => PageKind::DiseasePrediction,
            AnalysisKind::Chat => PageKind::AiChatbot,
            AnalysisKind::Hospitals => PageKind::NearbyHospitals,
        }
    }

    pub fn resolve(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        PageKind::ALL.into_iter().find(|page| page.path() == path)
    }

    /// Resolve a bare slug such as `ai-chatbot`.
    pub fn from_slug(slug: &str) -> Option<Self> {
        PageKind::ALL
            .into_iter()
            .filter(|page| *page != PageKind::Home)
            .find(|page| page.path().trim_start_matches('/') == slug)
    }

    fn title(&self) -> &'static str {
        match self {
            PageKind::Home => "BreedSense",
            PageKind::BreedRecognition => "Breed Recognition",
            PageKind::DiseasePrediction => "Disease Prediction",
            PageKind::AiChatbot => "AI Chatbot Assistant",
            PageKind::NearbyHospitals => "Nearby Veterinary Hospitals",
        }
    }

    fn subtitle(&self) -> &'static str {
        match self {
            PageKind::Home => "AI-powered livestock management for cattle and buffalo farmers",
            PageKind::BreedRecognition => {
                "Upload images or videos to identify your cattle or buffalo breed with AI precision"
            }
            PageKind::DiseasePrediction => {
                "Early detection of diseases through AI-powered image analysis"
            }
            PageKind::AiChatbot => {
                "Get instant answers to your farming questions in your preferred language"
            }
            PageKind::NearbyHospitals => {
                "Find qualified veterinarians and animal hospitals in your area"
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct Footer {
    pub brand: &'static str,
    pub tagline: &'static str,
    pub links: Vec<NavItem>,
}

#[derive(Debug, Serialize)]
pub struct LanguageOption {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DistrictOptions {
    pub state: &'static str,
    pub districts: &'static [&'static str],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageContent {
    Home {
        features: Vec<NavItem>,
    },
    BreedRecognition {
        image_hint: &'static str,
        video_hint: &'static str,
    },
    DiseasePrediction {
        animal_types: &'static [&'static str],
        breeds: &'static [&'static str],
        upload_hint: &'static str,
        disclaimer: &'static str,
    },
    AiChatbot {
        languages: Vec<LanguageOption>,
        quick_prompts: &'static [&'static str],
    },
    NearbyHospitals {
        states: &'static [&'static str],
        districts: Vec<DistrictOptions>,
        cities: &'static [&'static str],
        emergency_hotline: &'static str,
    },
    NotFound {
        requested: String,
    },
}

#[derive(Debug, Serialize)]
pub struct PageDescriptor {
    pub page: Option<PageKind>,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub nav: Vec<NavItem>,
    pub content: PageContent,
    pub footer: Footer,
}

pub const STATES: [&str; 5] = ["Maharashtra", "Gujarat", "Punjab", "Haryana", "Rajasthan"];

// Haryana and Rajasthan have no district list.
const DISTRICTS: [(&str, &[&str]); 3] = [
    ("Maharashtra", &["Pune", "Mumbai", "Nashik", "Aurangabad"]),
    ("Gujarat", &["Ahmedabad", "Surat", "Vadodara", "Rajkot"]),
    ("Punjab", &["Ludhiana", "Amritsar", "Jalandhar", "Patiala"]),
];

pub const CITIES: [&str; 3] = ["pune", "pcmc", "wakad"];

/// Districts offered once `state` is selected.
pub fn districts_of(state: &str) -> &'static [&'static str] {
    DISTRICTS
        .iter()
        .find(|(name, _)| *name == state)
        .map(|&(_, districts)| districts)
        .unwrap_or(&[])
}

const QUICK_PROMPTS: [&str; 3] = [
    "What are the symptoms of mastitis in cows?",
    "How can I improve milk production in my cows?",
    "What is the best feed for Gir cattle?",
];

pub const EMERGENCY_HOTLINE: &str = "1800-VET-HELP";

pub const DISEASE_DISCLAIMER: &str = "This is an AI-based prediction and should not replace professional veterinary diagnosis. Please consult with a qualified veterinarian for proper treatment and medication.";

fn nav(active: Option<PageKind>) -> Vec<NavItem> {
    PageKind::ALL
        .into_iter()
        .map(|page| NavItem {
            path: page.path(),
            label: page.label(),
            active: Some(page) == active,
        })
        .collect()
}

fn footer() -> Footer {
    Footer {
        brand: "BreedSense",
        tagline: "Smart livestock care for every farmer",
        links: nav(None),
    }
}

fn content(page: PageKind) -> PageContent {
    match page {
        PageKind::Home => PageContent::Home {
            features: nav(None)
                .into_iter()
                .filter(|item| item.path != "/")
                .collect(),
        },
        PageKind::BreedRecognition => PageContent::BreedRecognition {
            image_hint: "Images (4-5 photos): JPG, PNG, or WEBP (Max 10MB each)",
            video_hint: "Video (5-10 seconds): MP4, MOV, or AVI (Max 50MB)",
        },
        PageKind::DiseasePrediction => PageContent::DiseasePrediction {
            animal_types: &["cattle", "buffalo"],
            breeds: &["gir", "jersey", "holstein", "murrah", "nili"],
            upload_hint: "Clear images of affected areas help improve accuracy. JPG, PNG, MP4, MOV (Max 50MB)",
            disclaimer: DISEASE_DISCLAIMER,
        },
        PageKind::AiChatbot => PageContent::AiChatbot {
            languages: Language::ALL
                .into_iter()
                .map(|lang| LanguageOption {
                    key: lang.key(),
                    label: lang.label(),
                })
                .collect(),
            quick_prompts: &QUICK_PROMPTS,
        },
        PageKind::NearbyHospitals => PageContent::NearbyHospitals {
            states: &STATES,
            districts: DISTRICTS
                .iter()
                .map(|&(state, districts)| DistrictOptions { state, districts })
                .collect(),
            cities: &CITIES,
            emergency_hotline: EMERGENCY_HOTLINE,
        },
    }
}

pub fn describe(page: PageKind) -> PageDescriptor {
    PageDescriptor {
        page: Some(page),
        title: page.title(),
        subtitle: page.subtitle(),
        nav: nav(Some(page)),
        content: content(page),
        footer: footer(),
    }
}

pub fn not_found(requested: &str) -> PageDescriptor {
    PageDescriptor {
        page: None,
        title: "404",
        subtitle: "Oops! Page not found",
        nav: nav(None),
        content: PageContent::NotFound {
            requested: requested.to_string(),
        },
        footer: footer(),
    }
}
