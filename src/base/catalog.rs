//! Static registry of the six welfare-technology services.
//!
//! The catalog maps clinical/functional indications to services and carries
//! everything the dialogue needs: follow-up questions, descriptions,
//! "read more" links, and embeddable media in both hosting schemes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Atomic clinical/functional facts collected during intake.
///
/// `ALL` doubles as question order: the orchestrator walks it front to back
/// when picking the next follow-up question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indication {
    OrientationDifficulty,
    FallRisk,
    NightWandering,
    DoorDifficulty,
    AcuteRisk,
    UnderstandsAlerts,
    MedicationHelp,
    NeedsSafetyAlarm,
    Adult,
}

impl Indication {
    pub const ALL: [Indication; 9] = [
        Indication::OrientationDifficulty,
        Indication::FallRisk,
        Indication::NightWandering,
        Indication::DoorDifficulty,
        Indication::AcuteRisk,
        Indication::UnderstandsAlerts,
        Indication::MedicationHelp,
        Indication::NeedsSafetyAlarm,
        Indication::Adult,
    ];

    /// Canonical follow-up question asked while this indication is unknown.
    pub fn question(self) -> &'static str {
        match self {
            Indication::OrientationDifficulty => "Har pasienten vansker med tids- og stedsorientering?",
            Indication::FallRisk => "Har pasienten økt risiko for fall?",
            Indication::NightWandering => "Har pasienten en tendens til å gå ut om natten uten å finne tilbake?",
            Indication::DoorDifficulty => "Klarer pasienten å åpne døren selv?",
            Indication::AcuteRisk => "Har pasienten en medisinsk tilstand som gjør at det kan oppstå akutte nødsituasjoner hjemme?",
            Indication::UnderstandsAlerts => "Klarer pasienten å forstå varsler eller muntlige beskjeder fra utstyr?",
            Indication::MedicationHelp => "Trenger pasienten hjelp til å ta medisiner til riktig tid?",
            Indication::NeedsSafetyAlarm => "Har pasienten behov for en trygghetsalarm?",
            Indication::Adult => "Hvor gammel er pasienten? (Skriv alder i tall)",
        }
    }

    /// Short Norwegian label used in recommendation cards.
    pub fn label(self) -> &'static str {
        match self {
            Indication::OrientationDifficulty => "orienteringsvansker",
            Indication::FallRisk => "fallfare",
            Indication::NightWandering => "tendens til nattevandring",
            Indication::DoorDifficulty => "vansker med å åpne døren",
            Indication::AcuteRisk => "risiko for akutte nødsituasjoner",
            Indication::UnderstandsAlerts => "forstår varsler fra utstyr",
            Indication::MedicationHelp => "behov for hjelp med medisiner",
            Indication::NeedsSafetyAlarm => "behov for trygghetsalarm",
            Indication::Adult => "over 18 år",
        }
    }

    /// Wire name the model uses in its JSON envelope.
    ///
    /// Must match the serde `snake_case` rename of the variant.
    pub fn wire_name(self) -> &'static str {
        match self {
            Indication::OrientationDifficulty => "orientation_difficulty",
            Indication::FallRisk => "fall_risk",
            Indication::NightWandering => "night_wandering",
            Indication::DoorDifficulty => "door_difficulty",
            Indication::AcuteRisk => "acute_risk",
            Indication::UnderstandsAlerts => "understands_alerts",
            Indication::MedicationHelp => "medication_help",
            Indication::NeedsSafetyAlarm => "needs_safety_alarm",
            Indication::Adult => "adult",
        }
    }
}

/// Embeddable media for a service, in both hosting schemes.
#[derive(Debug, Clone, Copy)]
pub struct Media {
    /// Lowercase needle scanned for in assistant text.
    pub match_key: &'static str,
    /// Externally hosted embed URL.
    pub youtube_embed: &'static str,
    /// Locally served asset path.
    pub local_asset: &'static str,
}

/// Which media scheme rendered embeds use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStrategy {
    /// Externally hosted iframes.
    #[default]
    Youtube,
    /// `<video>` tags pointing at `/assets`.
    Local,
}

/// One assistive-technology service: indications in, recommendation out.
#[derive(Debug)]
pub struct ServiceDefinition {
    pub name: &'static str,
    /// The service applies when every required indication is confirmed true.
    pub required: &'static [Indication],
    pub follow_up: &'static str,
    pub description: &'static str,
    pub link: &'static str,
    pub media: Option<Media>,
}

static SERVICES: [ServiceDefinition; 6] = [
    ServiceDefinition {
        name: "Digitalt tilsyn",
        required: &[Indication::FallRisk, Indication::OrientationDifficulty],
        follow_up: "Har pasienten problemer med tids- og stedsorientering?",
        description: "Overvåker pasientens sikkerhet og gir rask respons ved fall.",
        link: "https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/digitalt-tilsyn?authuser=0",
        media: None,
    },
    ServiceDefinition {
        name: "Døralarm",
        required: &[Indication::OrientationDifficulty, Indication::NightWandering],
        follow_up: "Har pasienten en tendens til å gå ut om natten uten å finne tilbake?",
        description: "Varsler når pasienten går ut om natten og hjelper med å finne tilbake.",
        link: "https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/d%C3%B8ralarm?authuser=0",
        media: None,
    },
    ServiceDefinition {
        name: "Elektronisk dørlås (eLås)",
        required: &[Indication::NeedsSafetyAlarm, Indication::DoorDifficulty],
        follow_up: "Har pasienten en trygghetsalarm og vansker med å åpne døren?",
        description: "Lar hjemmetjenesten låse opp døren uten fysisk nøkkel når pasienten ikke kan åpne selv.",
        link: "https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/elektronisk-d%C3%B8rl%C3%A5s-el%C3%A5s?authuser=0",
        media: Some(Media {
            match_key: "elås",
            youtube_embed: "https://www.youtube.com/embed/gjHYm-c8ewg",
            local_asset: "/assets/elas.mp4",
        }),
    },
    ServiceDefinition {
        name: "Elektronisk medisindispenser",
        required: &[Indication::MedicationHelp, Indication::UnderstandsAlerts],
        follow_up: "Trenger pasienten hjelp til å ta medisiner til riktig tid?",
        description: "Sikrer at pasienten tar riktig medisin til riktig tid ved å gi varsler.",
        link: "https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/elektronisk-medisindispenser?authuser=0",
        media: Some(Media {
            match_key: "elektronisk medisindispenser",
            youtube_embed: "https://www.youtube.com/embed/AjTFhQEXdCc",
            local_asset: "/assets/elektronisk_medisindispenser.mp4",
        }),
    },
    ServiceDefinition {
        name: "GPS/lokaliseringstjeneste",
        required: &[Indication::Adult, Indication::OrientationDifficulty],
        follow_up: "Er pasienten over 18 år og har orienteringsvansker?",
        description: "Hjelper med å lokalisere pasienten og gir trygghet ved orienteringsvansker.",
        link: "https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/lokaliseringstjeneste-gps?authuser=0",
        media: Some(Media {
            match_key: "lokaliseringstjeneste",
            youtube_embed: "https://www.youtube.com/embed/_8HXxuNqL7k",
            local_asset: "/assets/lokaliseringstjeneste.mp4",
        }),
    },
    ServiceDefinition {
        name: "Trygghetsalarm",
        required: &[Indication::AcuteRisk],
        follow_up: "Har pasienten en sykdom som kan kreve akutt hjelp?",
        description: "Gir mulighet for å tilkalle hjelp raskt ved akutte situasjoner.",
        link: "https://sites.google.com/trondheim.kommune.no/velferdsteknologi/v%C3%A5re-tilbud/trygghetsalarm?authuser=0",
        media: Some(Media {
            match_key: "trygghetsalarm",
            youtube_embed: "https://www.youtube.com/embed/Cn5rc6xNEVY",
            local_asset: "/assets/trygghetsalarm.mp4",
        }),
    },
];

/// All six service definitions, in catalog order.
pub fn lookup_all() -> &'static [ServiceDefinition] {
    &SERVICES
}

/// Services whose required indications are all confirmed true.
pub fn matched_services(collected: &BTreeMap<Indication, bool>) -> Vec<&'static ServiceDefinition> {
    lookup_all().iter().filter(|service| service.required.iter().all(|indication| collected.get(indication) == Some(&true))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_six_services_with_links_and_questions() {
        let services = lookup_all();

        assert_eq!(services.len(), 6);

        for service in services {
            assert!(!service.name.is_empty());
            assert!(!service.required.is_empty());
            assert!(service.link.starts_with("https://"));
            assert!(!service.follow_up.is_empty());
            assert!(!service.description.is_empty());
        }
    }

    #[test]
    fn media_match_keys_are_lowercase_needles_of_the_name() {
        for service in lookup_all() {
            if let Some(media) = &service.media {
                assert_eq!(media.match_key, media.match_key.to_lowercase());
                assert!(service.name.to_lowercase().contains(media.match_key));
                assert!(media.youtube_embed.starts_with("https://www.youtube.com/embed/"));
                assert!(media.local_asset.starts_with("/assets/"));
            }
        }
    }

    #[test]
    fn every_required_indication_has_a_question() {
        for service in lookup_all() {
            for indication in service.required {
                assert!(Indication::ALL.contains(indication));
                assert!(!indication.question().is_empty());
            }
        }
    }

    #[test]
    fn wire_names_round_trip_through_serde() {
        for indication in Indication::ALL {
            let serialized = serde_json::to_string(&indication).unwrap();
            assert_eq!(serialized, format!("\"{}\"", indication.wire_name()));

            let deserialized: Indication = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, indication);
        }
    }

    #[test]
    fn matching_requires_all_indications_confirmed() {
        let mut collected = BTreeMap::new();
        collected.insert(Indication::FallRisk, true);

        assert!(matched_services(&collected).is_empty());

        collected.insert(Indication::OrientationDifficulty, true);

        let matched = matched_services(&collected);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Digitalt tilsyn");

        // A denied indication never matches.
        collected.insert(Indication::AcuteRisk, false);
        assert!(!matched_services(&collected).iter().any(|s| s.name == "Trygghetsalarm"));
    }
}
