// src/views.rs
//! JSON rendering of a page session. Formatting only.

use crate::models::*;
use crate::pages::{DiseaseForm, LocationForm, Page, PageState};
use crate::routes::{DISEASE_DISCLAIMER, PageKind};
use crate::workflow::Phase;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AssetView {
    pub name: String,
    pub kind: AssetKind,
    pub size_bytes: u64,
    pub size_text: String,
}

#[derive(Debug, Serialize)]
pub struct BreedView {
    #[serde(flatten)]
    pub result: BreedResult,
    pub confidence_text: String,
}

#[derive(Debug, Serialize)]
pub struct DiseaseView {
    #[serde(flatten)]
    pub result: DiseaseResult,
    pub confidence_text: String,
    pub disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: ChatMessage,
    pub time_text: String,
}

#[derive(Debug, Serialize)]
pub struct HospitalView {
    #[serde(flatten)]
    pub hospital: Hospital,
    pub stars: [bool; 5],
    pub call_link: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageBody {
    BreedRecognition {
        assets: Vec<AssetView>,
        result: Option<BreedView>,
    },
    DiseasePrediction {
        form: DiseaseForm,
        asset: Option<AssetView>,
        result: Option<DiseaseView>,
    },
    AiChatbot {
        language: Language,
        typing: bool,
        messages: Vec<MessageView>,
    },
    NearbyHospitals {
        location: LocationForm,
        heading: Option<String>,
        hospitals: Vec<HospitalView>,
    },
}

#[derive(Debug, Serialize)]
pub struct PageSnapshot {
    pub page_id: Uuid,
    pub page: PageKind,
    pub phase: Phase,
    pub busy: bool,
    pub action_label: &'static str,
    pub body: PageBody,
}

pub fn size_text(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Five star slots; a slot is filled when its position is within the rating.
pub fn stars(rating: f32) -> [bool; 5] {
    std::array::from_fn(|i| (i + 1) as f32 <= rating)
}

fn asset_view(asset: &UploadedAsset) -> AssetView {
    AssetView {
        name: asset.name.clone(),
        kind: asset.kind,
        size_bytes: asset.size_bytes,
        size_text: size_text(asset.size_bytes),
    }
}

fn action_label(kind: AnalysisKind, busy: bool) -> &'static str {
    match (kind, busy) {
        (AnalysisKind::Breed, false) => "Analyze Breed",
        (AnalysisKind::Breed, true) => "Analyzing...",
        (AnalysisKind::Disease, false) => "Predict Disease",
        (AnalysisKind::Disease, true) => "Analyzing Disease...",
        (AnalysisKind::Chat, _) => "Send",
        (AnalysisKind::Hospitals, false) => "Find Hospitals",
        (AnalysisKind::Hospitals, true) => "Searching...",
    }
}

pub fn snapshot(page: &Page) -> PageSnapshot {
    let busy = page.workflow.is_busy();

    let body = match &page.state {
        PageState::Breed { assets, result } => PageBody::BreedRecognition {
            assets: assets.iter().map(asset_view).collect(),
            result: result.clone().map(|result| BreedView {
                confidence_text: format!("{}%", result.confidence),
                result,
            }),
        },
        PageState::Disease {
            form,
            asset,
            result,
        } => PageBody::DiseasePrediction {
            form: form.clone(),
            asset: asset.as_ref().map(asset_view),
            result: result.clone().map(|result| DiseaseView {
                confidence_text: format!("{}%", result.confidence),
                result,
                disclaimer: DISEASE_DISCLAIMER,
            }),
        },
        PageState::Chat { language, history } => PageBody::AiChatbot {
            language: *language,
            typing: busy,
            messages: history
                .iter()
                .map(|message| MessageView {
                    time_text: message.timestamp.format("%H:%M:%S").to_string(),
                    message: message.clone(),
                })
                .collect(),
        },
        PageState::Hospitals {
            location,
            hospitals,
        } => PageBody::NearbyHospitals {
            location: location.clone(),
            heading: (!hospitals.is_empty()).then(|| {
                format!(
                    "Found {} Veterinary Hospitals Near You",
                    hospitals.len()
                )
            }),
            hospitals: hospitals
                .iter()
                .map(|hospital| HospitalView {
                    stars: stars(hospital.rating),
                    call_link: format!("tel:{}", hospital.contact),
                    hospital: hospital.clone(),
                })
                .collect(),
        },
    };

    PageSnapshot {
        page_id: page.id,
        page: PageKind::for_analysis(page.kind),
        phase: page.workflow.phase(),
        busy,
        action_label: action_label(page.kind, busy),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockGenerator;

    #[test]
    fn formats_sizes_in_megabytes() {
        assert_eq!(size_text(1_572_864), "1.50 MB");
        assert_eq!(size_text(0), "0.00 MB");
    }

    #[test]
    fn star_row_fills_whole_stars_only() {
        assert_eq!(stars(4.8), [true, true, true, true, false]);
        assert_eq!(stars(5.0), [true; 5]);
        assert_eq!(stars(0.0), [false; 5]);
    }

    #[test]
    fn busy_breed_page_shows_analyzing_label() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Breed);
        page.add_assets(vec![UploadedAsset {
            name: "cow.mp4".to_string(),
            size_bytes: 3 * 1024 * 1024,
            kind: AssetKind::Video,
        }])
        .unwrap();
        let ticket = page.workflow.begin().unwrap();
        page.workflow.wait(ticket).unwrap();

        let view = snapshot(&page);
        assert!(view.busy);
        assert_eq!(view.phase, Phase::Waiting);
        assert_eq!(view.action_label, "Analyzing...");
        let PageBody::BreedRecognition { assets, result } = view.body else {
            panic!("expected breed body");
        };
        assert_eq!(assets[0].size_text, "3.00 MB");
        assert!(result.is_none());
    }

    #[test]
    fn hospital_view_has_heading_and_stars() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Hospitals);
        page.apply(AnalysisResult::Hospitals(MockGenerator::hospitals()));

        let view = snapshot(&page);
        assert_eq!(view.page, PageKind::NearbyHospitals);
        let PageBody::NearbyHospitals {
            heading, hospitals, ..
        } = view.body
        else {
            panic!("expected hospitals body");
        };
        assert_eq!(
            heading.as_deref(),
            Some("Found 4 Veterinary Hospitals Near You")
        );
        assert_eq!(hospitals[0].call_link, "tel:+91 98765 43210");
        assert_eq!(hospitals[2].stars, [true, true, true, true, false]);
    }

    #[test]
    fn chat_messages_carry_a_clock_time() {
        let page = Page::new(Uuid::new_v4(), AnalysisKind::Chat);
        let view = snapshot(&page);
        let PageBody::AiChatbot {
            messages, typing, ..
        } = view.body
        else {
            panic!("expected chat body");
        };
        assert!(!typing);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].time_text.len(), 8);
    }
}
