// src/services/result_generator.rs
use crate::models::*;
use async_trait::async_trait;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tokio::sync::Mutex;

/// Boundary toward the inference backend. A real backend keeps this result
/// shape and replaces only the implementation.
#[async_trait]
pub trait ResultGenerator: Send + Sync {
    async fn generate(&self, request: &AnalysisRequest) -> AnalysisResult;
}

const ENGLISH_REPLIES: [&str; 5] = [
    "Based on your query, I recommend consulting with a veterinarian for the best advice.",
    "For breed-specific information, you can use our Breed Recognition feature. It provides detailed insights about different cattle and buffalo breeds.",
    "Disease symptoms can vary. I suggest using our Disease Prediction tool for more accurate analysis.",
    "Good farming practices include regular health checkups, proper nutrition, and maintaining clean living conditions for your livestock.",
    "The milk yield depends on the breed, nutrition, and care provided. Gir cattle typically produce 12-15 liters per day.",
];

const HINDI_REPLIES: [&str; 5] = [
    "आपके प्रश्न के आधार पर, मैं सबसे अच्छी सलाह के लिए पशु चिकित्सक से सलाह लेने की सिफारिश करता हूं।",
    "नस्ल-विशिष्ट जानकारी के लिए, आप हमारी नस्ल पहचान सुविधा का उपयोग कर सकते हैं।",
    "रोग के लक्षण अलग-अलग हो सकते हैं। मैं अधिक सटीक विश्लेषण के लिए हमारे रोग भविष्यवाणी उपकरण का उपयोग करने का सुझाव देता हूं।",
    "अच्छी कृषि प्रथाओं में नियमित स्वास्थ्य जांच, उचित पोषण और पशुओं के लिए स्वच्छ रहने की स्थिति बनाए रखना शामिल है।",
    "दूध की उपज नस्ल, पोषण और दी गई देखभाल पर निर्भर करती है। गिर गाय आमतौर पर प्रति दिन 12-15 लीटर दूध देती है।",
];

const MARATHI_REPLIES: [&str; 5] = [
    "तुमच्या प्रश्नाच्या आधारे, मी सर्वोत्तम सल्ल्यासाठी पशुवैद्यकांचा सल्ला घेण्याची शिफारस करतो.",
    "जाती-विशिष्ट माहितीसाठी, तुम्ही आमचे जाती ओळख वैशिष्ट्य वापरू शकता.",
    "रोगाची लक्षणे वेगवेगळी असू शकतात. अधिक अचूक विश्लेषणासाठी आमचे रोग भविष्यवाणी साधन वापरण्याचा मी सल्ला देतो.",
    "चांगल्या शेतीच्या पद्धतींमध्ये नियमित आरोग्य तपासणी, योग्य पोषण आणि गुरांसाठी स्वच्छ राहण्याची परिस्थिती राखणे समाविष्ट आहे.",
    "दुधाचे उत्पादन जाती, पोषण आणि दिलेल्या काळजीवर अवलंबून असते. गिर गाई सामान्यतः दिवसाला 12-15 लिटर दूध देते.",
];

pub fn canned_replies(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => &ENGLISH_REPLIES,
        Language::Hindi => &HINDI_REPLIES,
        Language::Marathi => &MARATHI_REPLIES,
    }
}

/// Canned generator standing in for the inference backend. Only the chat
/// reply depends on the random source; everything else ignores its input.
pub struct MockGenerator {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    pub fn breed_result() -> BreedResult {
        BreedResult {
            breed_name: "Gir Cattle".to_string(),
            confidence: 94.5,
            hybridization: vec![
                BreedShare {
                    breed: "Gir".to_string(),
                    percentage: 80.0,
                },
                BreedShare {
                    breed: "Jersey".to_string(),
                    percentage: 20.0,
                },
            ],
            profile: BreedProfile {
                milk_yield: "12-15 liters per day on average".to_string(),
                origin_region: "Gujarat, India (Kathiawar Peninsula)".to_string(),
                key_traits: "Heat tolerant, disease resistant, good mothering ability".to_string(),
                body_weight: "300-400 kg (Cows), 450-500 kg (Bulls)".to_string(),
            },
        }
    }

    pub fn disease_result() -> DiseaseResult {
        DiseaseResult {
            disease_name: "Mastitis".to_string(),
            confidence: 87.3,
            severity: Severity::Moderate,
            symptoms: [
                "Swollen udder",
                "Abnormal milk color",
                "Reduced milk production",
                "Heat in affected quarter",
            ]
            .map(String::from)
            .to_vec(),
            remedies: [
                "Immediate antibiotic treatment",
                "Frequent milking of affected quarter",
                "Apply cold compress to reduce swelling",
                "Consult veterinarian for proper medication",
            ]
            .map(String::from)
            .to_vec(),
        }
    }

    pub fn hospitals() -> Vec<Hospital> {
        let hospital = |id: &str,
                        name: &str,
                        distance: &str,
                        contact: &str,
                        address: &str,
                        rating: f32,
                        specialization: &str,
                        availability: &str| Hospital {
            id: id.to_string(),
            name: name.to_string(),
            distance_text: distance.to_string(),
            contact: contact.to_string(),
            address: address.to_string(),
            rating,
            specialization: specialization.to_string(),
            availability: availability.to_string(),
        };

        vec![
            hospital(
                "1",
                "Green Valley Veterinary Hospital",
                "2.3 km",
                "+91 98765 43210",
                "MG Road, Near City Center",
                4.8,
                "Large Animals, Emergency Care",
                "24/7 Emergency Service",
            ),
            hospital(
                "2",
                "Animal Care Clinic",
                "4.1 km",
                "+91 87654 32109",
                "Station Road, Medical Complex",
                4.5,
                "Cattle & Buffalo Specialist",
                "Mon-Sat: 9 AM - 7 PM",
            ),
            hospital(
                "3",
                "Rural Veterinary Center",
                "5.8 km",
                "+91 76543 21098",
                "Village Road, Agricultural Zone",
                4.3,
                "Farm Animals, Breeding",
                "Daily: 8 AM - 6 PM",
            ),
            hospital(
                "4",
                "Modern Pet & Livestock Clinic",
                "7.2 km",
                "+91 65432 10987",
                "Highway Road, Commercial Area",
                4.6,
                "Advanced Diagnostics",
                "24/7 Service Available",
            ),
        ]
    }

    async fn chat_reply(&self, language_key: &str) -> ChatMessage {
        let replies = canned_replies(Language::resolve(language_key));
        let index = self.rng.lock().await.gen_range(0..replies.len());
        ChatMessage::new(replies[index], Sender::Bot)
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultGenerator for MockGenerator {
    async fn generate(&self, request: &AnalysisRequest) -> AnalysisResult {
        debug!("Generating canned {:?} result", request.kind());

        match request {
            AnalysisRequest::Breed { .. } => AnalysisResult::Breed(Self::breed_result()),
            AnalysisRequest::Disease { .. } => AnalysisResult::Disease(Self::disease_result()),
            AnalysisRequest::Chat { language, .. } => {
                AnalysisResult::Chat(self.chat_reply(language).await)
            }
            // The selected location is not consulted.
            AnalysisRequest::Hospitals { .. } => AnalysisResult::Hospitals(Self::hospitals()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(language: &str) -> AnalysisRequest {
        AnalysisRequest::Chat {
            text: "hi".to_string(),
            language: language.to_string(),
        }
    }

    fn location(state: &str, district: &str, city: &str) -> Location {
        Location {
            state: state.to_string(),
            district: district.to_string(),
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn breed_result_is_gir_with_fixed_hybridization() {
        let generator = MockGenerator::seeded(1);
        let result = generator
            .generate(&AnalysisRequest::Breed { assets: vec![] })
            .await;

        let AnalysisResult::Breed(breed) = result else {
            panic!("expected a breed result");
        };
        assert_eq!(breed.breed_name, "Gir Cattle");
        assert_eq!(breed.confidence, 94.5);
        let shares: Vec<_> = breed
            .hybridization
            .iter()
            .map(|s| (s.breed.as_str(), s.percentage))
            .collect();
        assert_eq!(shares, vec![("Gir", 80.0), ("Jersey", 20.0)]);
        assert!(breed.hybridization.iter().all(|s| s.percentage >= 0.0));
    }

    #[tokio::test]
    async fn disease_result_is_moderate_mastitis() {
        let generator = MockGenerator::seeded(1);
        let result = generator
            .generate(&AnalysisRequest::Disease {
                subject_kind: SubjectKind::Buffalo,
                subject_name: "Lakshmi".to_string(),
                breed_hint: None,
                assets: vec![],
            })
            .await;

        let AnalysisResult::Disease(disease) = result else {
            panic!("expected a disease result");
        };
        assert_eq!(disease.disease_name, "Mastitis");
        assert_eq!(disease.severity, Severity::Moderate);
        assert_eq!(disease.symptoms.len(), 4);
        assert_eq!(disease.remedies[0], "Immediate antibiotic treatment");
    }

    #[tokio::test]
    async fn hospitals_ignore_the_selected_location() {
        let generator = MockGenerator::seeded(1);
        let pune = generator
            .generate(&AnalysisRequest::Hospitals {
                location: location("Maharashtra", "Pune", "pune"),
            })
            .await;
        let surat = generator
            .generate(&AnalysisRequest::Hospitals {
                location: location("Gujarat", "Surat", "wakad"),
            })
            .await;

        assert_eq!(pune, surat);
        let AnalysisResult::Hospitals(list) = pune else {
            panic!("expected hospitals");
        };
        let ids: Vec<_> = list.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert!(list.iter().all(|h| (0.0..=5.0).contains(&h.rating)));
    }

    #[tokio::test]
    async fn chat_reply_comes_from_the_language_set() {
        let generator = MockGenerator::seeded(7);
        for _ in 0..10 {
            let AnalysisResult::Chat(message) = generator.generate(&chat("hindi")).await else {
                panic!("expected a chat message");
            };
            assert_eq!(message.sender, Sender::Bot);
            assert!(HINDI_REPLIES.contains(&message.text.as_str()));
        }
    }

    #[tokio::test]
    async fn unknown_language_falls_back_to_english() {
        let generator = MockGenerator::seeded(7);
        let AnalysisResult::Chat(message) = generator.generate(&chat("tamil")).await else {
            panic!("expected a chat message");
        };
        assert!(ENGLISH_REPLIES.contains(&message.text.as_str()));
    }

    #[tokio::test]
    async fn same_seed_picks_the_same_replies() {
        let a = MockGenerator::seeded(42);
        let b = MockGenerator::seeded(42);
        for _ in 0..5 {
            let (AnalysisResult::Chat(x), AnalysisResult::Chat(y)) = (
                a.generate(&chat("english")).await,
                b.generate(&chat("english")).await,
            ) else {
                panic!("expected chat messages");
            };
            assert_eq!(x.text, y.text);
        }
    }
}
