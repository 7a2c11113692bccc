// src/pages.rs
//! Per-page session state: form values, selected assets and results, plus
//! the guard each page applies before its workflow may start.

use crate::config::Timings;
use crate::errors::BreedSenseError;
use crate::models::*;
use crate::routes::{CITIES, STATES, districts_of};
use crate::workflow::Workflow;
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiseaseForm {
    pub animal_type: Option<SubjectKind>,
    pub animal_name: String,
    pub breed: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationForm {
    pub state: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
}

/// Match `value` against a fixed option list, returning the listed spelling.
fn pick_option(options: &[&str], field: &str, value: &str) -> Result<String, BreedSenseError> {
    let value = value.trim();
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(value))
        .map(|option| option.to_string())
        .ok_or_else(|| BreedSenseError::InvalidInput(format!("{:?} is not a known {}", value, field)))
}

impl LocationForm {
    /// Apply selections in state, district, city order. A district must
    /// belong to the selected state; changing the state clears the rest.
    fn select(
        &mut self,
        state: Option<String>,
        district: Option<String>,
        city: Option<String>,
    ) -> Result<(), BreedSenseError> {
        let mut next = self.clone();

        if let Some(state) = state {
            let state = pick_option(&STATES, "state", &state)?;
            if next.state.as_deref() != Some(state.as_str()) {
                next.district = None;
                next.city = None;
            }
            next.state = Some(state);
        }

        if let Some(district) = district {
            let state = next.state.as_deref().ok_or_else(|| {
                BreedSenseError::InvalidInput("Select a state before the district".to_string())
            })?;
            next.district = Some(pick_option(districts_of(state), "district", &district)?);
        }

        if let Some(city) = city {
            if next.district.is_none() {
                return Err(BreedSenseError::InvalidInput(
                    "Select a district before the city".to_string(),
                ));
            }
            next.city = Some(pick_option(&CITIES, "city", &city)?);
        }

        *self = next;
        Ok(())
    }

    fn complete(&self) -> Option<Location> {
        let pick = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        Some(Location {
            state: pick(&self.state)?,
            district: pick(&self.district)?,
            city: pick(&self.city)?,
        })
    }
}

/// Partial form update; only the fields relevant to the page may be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormUpdate {
    pub animal_type: Option<SubjectKind>,
    pub animal_name: Option<String>,
    pub breed: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
pub enum PageState {
    Breed {
        assets: Vec<UploadedAsset>,
        result: Option<BreedResult>,
    },
    Disease {
        form: DiseaseForm,
        asset: Option<UploadedAsset>,
        result: Option<DiseaseResult>,
    },
    Chat {
        language: Language,
        history: Vec<ChatMessage>,
    },
    Hospitals {
        location: LocationForm,
        hospitals: Vec<Hospital>,
    },
}

#[derive(Debug, Clone)]
pub enum Action {
    Submit { text: Option<String> },
    Locate,
}

/// Work scheduled by a submission.
#[derive(Debug, Clone)]
pub enum Job {
    Analyze {
        request: AnalysisRequest,
        latency: Duration,
    },
    LocateThenSearch {
        locate_latency: Duration,
        search_latency: Duration,
    },
}

#[derive(Debug)]
pub struct Page {
    pub id: Uuid,
    pub kind: AnalysisKind,
    pub workflow: Workflow,
    pub state: PageState,
}

impl Page {
    pub fn new(id: Uuid, kind: AnalysisKind) -> Self {
        let state = match kind {
            AnalysisKind::Breed => PageState::Breed {
                assets: Vec::new(),
                result: None,
            },
            AnalysisKind::Disease => PageState::Disease {
                form: DiseaseForm::default(),
                asset: None,
                result: None,
            },
            AnalysisKind::Chat => PageState::Chat {
                language: Language::English,
                history: vec![ChatMessage::new(Language::English.greeting(), Sender::Bot)],
            },
            AnalysisKind::Hospitals => PageState::Hospitals {
                location: LocationForm::default(),
                hospitals: Vec::new(),
            },
        };

        Self {
            id,
            kind,
            workflow: Workflow::default(),
            state,
        }
    }

    pub fn add_assets(&mut self, uploads: Vec<UploadedAsset>) -> Result<(), BreedSenseError> {
        if self.workflow.is_busy() {
            return Err(BreedSenseError::Busy);
        }
        if uploads.is_empty() {
            return Err(BreedSenseError::InvalidInput(
                "No files were uploaded".to_string(),
            ));
        }

        match &mut self.state {
            PageState::Breed { assets, .. } => {
                assets.extend(uploads);
                Ok(())
            }
            // Single file slot; the first file of a selection wins.
            PageState::Disease { asset, .. } => {
                *asset = uploads.into_iter().next();
                Ok(())
            }
            _ => Err(BreedSenseError::InvalidInput(format!(
                "{:?} page does not accept uploads",
                self.kind
            ))),
        }
    }

    pub fn update_form(&mut self, update: FormUpdate) -> Result<(), BreedSenseError> {
        if self.workflow.is_busy() {
            return Err(BreedSenseError::Busy);
        }
        let kind = self.kind;
        let rejects = |fields: &[(&str, bool)]| -> Result<(), BreedSenseError> {
            match fields.iter().find(|(_, set)| *set) {
                Some((name, _)) => Err(BreedSenseError::InvalidInput(format!(
                    "{:?} page has no {} field",
                    kind, name
                ))),
                None => Ok(()),
            }
        };

        match &mut self.state {
            PageState::Disease { form, .. } => {
                rejects(&[
                    ("state", update.state.is_some()),
                    ("district", update.district.is_some()),
                    ("city", update.city.is_some()),
                    ("language", update.language.is_some()),
                ])?;
                if let Some(animal_type) = update.animal_type {
                    form.animal_type = Some(animal_type);
                }
                if let Some(name) = update.animal_name {
                    form.animal_name = name;
                }
                if let Some(breed) = update.breed {
                    form.breed = Some(breed).filter(|b| !b.trim().is_empty());
                }
            }
            PageState::Hospitals { location, .. } => {
                rejects(&[
                    ("animal_type", update.animal_type.is_some()),
                    ("animal_name", update.animal_name.is_some()),
                    ("breed", update.breed.is_some()),
                    ("language", update.language.is_some()),
                ])?;
                location.select(update.state, update.district, update.city)?;
            }
            PageState::Chat { language, history } => {
                rejects(&[
                    ("animal_type", update.animal_type.is_some()),
                    ("animal_name", update.animal_name.is_some()),
                    ("breed", update.breed.is_some()),
                    ("state", update.state.is_some()),
                    ("district", update.district.is_some()),
                    ("city", update.city.is_some()),
                ])?;
                if let Some(key) = update.language {
                    let next = Language::resolve(&key);
                    if next != *language {
                        history.push(ChatMessage::new(next.greeting(), Sender::Bot));
                    }
                    *language = next;
                }
            }
            PageState::Breed { .. } => {
                return Err(BreedSenseError::InvalidInput(
                    "Breed recognition page has no form fields".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Check the page's guard and build the job a submission would run.
    /// Does not mutate the page.
    pub fn plan(&self, action: &Action, timings: &Timings) -> Result<Job, BreedSenseError> {
        match (action, &self.state) {
            (Action::Submit { .. }, PageState::Breed { assets, .. }) => {
                if assets.is_empty() {
                    return Err(BreedSenseError::InvalidInput(
                        "Upload at least one image or video".to_string(),
                    ));
                }
                Ok(Job::Analyze {
                    request: AnalysisRequest::Breed {
                        assets: assets.clone(),
                    },
                    latency: timings.analysis,
                })
            }
            (Action::Submit { .. }, PageState::Disease { form, asset, .. }) => {
                let subject_kind = form.animal_type.ok_or_else(|| {
                    BreedSenseError::InvalidInput("Animal type is required".to_string())
                })?;
                let subject_name = form.animal_name.trim();
                if subject_name.is_empty() {
                    return Err(BreedSenseError::InvalidInput(
                        "Animal name is required".to_string(),
                    ));
                }
                let asset = asset.clone().ok_or_else(|| {
                    BreedSenseError::InvalidInput("Upload an image or video".to_string())
                })?;
                Ok(Job::Analyze {
                    request: AnalysisRequest::Disease {
                        subject_kind,
                        subject_name: subject_name.to_string(),
                        breed_hint: form.breed.clone(),
                        assets: vec![asset],
                    },
                    latency: timings.analysis,
                })
            }
            (Action::Submit { text }, PageState::Chat { language, .. }) => {
                let text = text.as_deref().unwrap_or_default();
                if text.trim().is_empty() {
                    return Err(BreedSenseError::InvalidInput(
                        "Message must not be empty".to_string(),
                    ));
                }
                Ok(Job::Analyze {
                    request: AnalysisRequest::Chat {
                        text: text.to_string(),
                        language: language.key().to_string(),
                    },
                    latency: timings.chat,
                })
            }
            (Action::Submit { .. }, PageState::Hospitals { location, .. }) => {
                let location = location.complete().ok_or_else(|| {
                    BreedSenseError::InvalidInput(
                        "State, district and city must all be selected".to_string(),
                    )
                })?;
                Ok(Job::Analyze {
                    request: AnalysisRequest::Hospitals { location },
                    latency: timings.search,
                })
            }
            (Action::Locate, PageState::Hospitals { .. }) => Ok(Job::LocateThenSearch {
                locate_latency: timings.locate,
                search_latency: timings.search,
            }),
            (Action::Locate, _) => Err(BreedSenseError::InvalidInput(format!(
                "{:?} page has no location lookup",
                self.kind
            ))),
        }
    }

    /// Effects visible as soon as a submission is accepted.
    pub fn on_submitted(&mut self, job: &Job) {
        if let (
            PageState::Chat { history, .. },
            Job::Analyze {
                request: AnalysisRequest::Chat { text, .. },
                ..
            },
        ) = (&mut self.state, job)
        {
            history.push(ChatMessage::new(text.clone(), Sender::User));
        }
    }

    pub fn set_location(&mut self, found: Location) {
        if let PageState::Hospitals { location, .. } = &mut self.state {
            *location = LocationForm {
                state: Some(found.state),
                district: Some(found.district),
                city: Some(found.city),
            };
        }
    }

    pub fn apply(&mut self, result: AnalysisResult) {
        match (&mut self.state, result) {
            (PageState::Breed { result, .. }, AnalysisResult::Breed(breed)) => {
                *result = Some(breed);
            }
            (PageState::Disease { result, .. }, AnalysisResult::Disease(disease)) => {
                *result = Some(disease);
            }
            (PageState::Chat { history, .. }, AnalysisResult::Chat(message)) => {
                history.push(message);
            }
            (PageState::Hospitals { hospitals, .. }, AnalysisResult::Hospitals(found)) => {
                *hospitals = found;
            }
            (_, other) => warn!(
                "Ignoring {:?} result on {:?} page {}",
                other.kind(),
                self.kind,
                self.id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> UploadedAsset {
        UploadedAsset {
            name: name.to_string(),
            size_bytes: 1024,
            kind: AssetKind::Image,
        }
    }

    fn submit() -> Action {
        Action::Submit { text: None }
    }

    #[test]
    fn breed_requires_an_asset() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Breed);
        let timings = Timings::default();
        assert!(matches!(
            page.plan(&submit(), &timings),
            Err(BreedSenseError::InvalidInput(_))
        ));

        page.add_assets(vec![image("a.jpg")]).unwrap();
        page.add_assets(vec![image("b.jpg")]).unwrap();
        let Job::Analyze { request, latency } = page.plan(&submit(), &timings).unwrap() else {
            panic!("expected an analysis job");
        };
        assert_eq!(latency, Duration::from_millis(3000));
        let AnalysisRequest::Breed { assets } = request else {
            panic!("expected a breed request");
        };
        assert_eq!(assets.len(), 2);
    }

    #[test]
    fn disease_requires_type_name_and_asset() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Disease);
        let timings = Timings::default();

        page.add_assets(vec![image("udder.jpg")]).unwrap();
        page.update_form(FormUpdate {
            animal_name: Some("Gauri".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(page.plan(&submit(), &timings).is_err(), "type missing");

        page.update_form(FormUpdate {
            animal_type: Some(SubjectKind::Cattle),
            animal_name: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(page.plan(&submit(), &timings).is_err(), "blank name");

        page.update_form(FormUpdate {
            animal_name: Some("Gauri".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(page.plan(&submit(), &timings).is_ok());
    }

    #[test]
    fn disease_keeps_a_single_asset() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Disease);
        page.add_assets(vec![image("first.jpg"), image("second.jpg")])
            .unwrap();
        page.add_assets(vec![image("third.jpg")]).unwrap();
        let PageState::Disease { asset, .. } = &page.state else {
            panic!("expected disease state");
        };
        assert_eq!(asset.as_ref().map(|a| a.name.as_str()), Some("third.jpg"));
    }

    #[test]
    fn chat_rejects_blank_text_and_uploads() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Chat);
        let timings = Timings::default();
        assert!(
            page.plan(
                &Action::Submit {
                    text: Some("  \t".to_string())
                },
                &timings
            )
            .is_err()
        );
        assert!(page.add_assets(vec![image("a.jpg")]).is_err());
    }

    #[test]
    fn chat_starts_with_a_greeting_and_greets_again_on_language_change() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Chat);
        page.update_form(FormUpdate {
            language: Some("marathi".to_string()),
            ..Default::default()
        })
        .unwrap();
        // Same language again adds nothing.
        page.update_form(FormUpdate {
            language: Some("Marathi".to_string()),
            ..Default::default()
        })
        .unwrap();

        let PageState::Chat { language, history } = &page.state else {
            panic!("expected chat state");
        };
        assert_eq!(*language, Language::Marathi);
        let texts: Vec<_> = history.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![Language::English.greeting(), Language::Marathi.greeting()]
        );
    }

    #[test]
    fn hospitals_require_all_three_location_fields() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Hospitals);
        let timings = Timings::default();
        page.update_form(FormUpdate {
            state: Some("Gujarat".to_string()),
            district: Some("Surat".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(page.plan(&submit(), &timings).is_err());

        page.update_form(FormUpdate {
            city: Some("wakad".to_string()),
            ..Default::default()
        })
        .unwrap();
        let Job::Analyze { latency, .. } = page.plan(&submit(), &timings).unwrap() else {
            panic!("expected an analysis job");
        };
        assert_eq!(latency, Duration::from_millis(2000));
    }

    #[test]
    fn location_must_come_from_the_option_lists() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Hospitals);
        let timings = Timings::default();

        let free_text = page.update_form(FormUpdate {
            state: Some("Haryana".to_string()),
            district: Some("Nowhere".to_string()),
            city: Some("x".to_string()),
            ..Default::default()
        });
        assert!(matches!(free_text, Err(BreedSenseError::InvalidInput(_))));
        // A rejected update changes nothing.
        let PageState::Hospitals { location, .. } = &page.state else {
            panic!("expected hospitals state");
        };
        assert!(location.state.is_none());

        let wrong_state = page.update_form(FormUpdate {
            state: Some("Maharashtra".to_string()),
            district: Some("Surat".to_string()),
            ..Default::default()
        });
        assert!(wrong_state.is_err());

        let no_state = page.update_form(FormUpdate {
            district: Some("Pune".to_string()),
            ..Default::default()
        });
        assert!(no_state.is_err());

        page.update_form(FormUpdate {
            state: Some("maharashtra".to_string()),
            district: Some("Nashik".to_string()),
            city: Some("PCMC".to_string()),
            ..Default::default()
        })
        .unwrap();
        let PageState::Hospitals { location, .. } = &page.state else {
            panic!("expected hospitals state");
        };
        assert_eq!(location.state.as_deref(), Some("Maharashtra"));
        assert_eq!(location.city.as_deref(), Some("pcmc"));
        assert!(page.plan(&submit(), &timings).is_ok());

        // Switching state drops the district picked for the old one.
        page.update_form(FormUpdate {
            state: Some("Punjab".to_string()),
            ..Default::default()
        })
        .unwrap();
        let PageState::Hospitals { location, .. } = &page.state else {
            panic!("expected hospitals state");
        };
        assert!(location.district.is_none());
        assert!(location.city.is_none());
        assert!(page.plan(&submit(), &timings).is_err());
    }

    #[test]
    fn inputs_are_frozen_while_a_request_is_in_flight() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Disease);
        page.add_assets(vec![image("udder.jpg")]).unwrap();
        let ticket = page.workflow.begin().unwrap();
        page.workflow.wait(ticket).unwrap();

        assert!(matches!(
            page.add_assets(vec![image("other.jpg")]),
            Err(BreedSenseError::Busy)
        ));
        assert!(matches!(
            page.update_form(FormUpdate {
                animal_name: Some("Gauri".to_string()),
                ..Default::default()
            }),
            Err(BreedSenseError::Busy)
        ));

        page.workflow.complete(ticket).unwrap();
        page.add_assets(vec![image("other.jpg")]).unwrap();
        let PageState::Disease { asset, .. } = &page.state else {
            panic!("expected disease state");
        };
        assert_eq!(asset.as_ref().map(|a| a.name.as_str()), Some("other.jpg"));
    }

    #[test]
    fn form_fields_from_another_page_are_rejected() {
        let mut page = Page::new(Uuid::new_v4(), AnalysisKind::Hospitals);
        let err = page
            .update_form(FormUpdate {
                language: Some("hindi".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, BreedSenseError::InvalidInput(_)));
    }

    #[test]
    fn locate_is_only_for_hospitals() {
        let timings = Timings::default();
        let breed = Page::new(Uuid::new_v4(), AnalysisKind::Breed);
        assert!(breed.plan(&Action::Locate, &timings).is_err());

        let hospitals = Page::new(Uuid::new_v4(), AnalysisKind::Hospitals);
        assert!(matches!(
            hospitals.plan(&Action::Locate, &timings),
            Ok(Job::LocateThenSearch { .. })
        ));
    }
}
