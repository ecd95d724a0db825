//! Fixed dialogue texts and prompt composition for LLM turns.

use crate::base::{
    catalog::{self, Indication},
    types::ChatMessage,
};

/// Greeting returned by `/start`.
pub const GREETING: &str =
    "Hei, jeg er Velfie og er din digitale hjelpeassistent. Jeg er her for å hjelpe deg med å finne riktig velferdsteknologi for pasienten. Hvilke utfordringer har pasienten?";

/// User-facing apology returned whenever the LLM call fails.
pub const FALLBACK_REPLY: &str = "Beklager, det oppstod en feil. Prøv igjen.";

/// Persona, tone, and the turn-taking/output contract.
///
/// The serialized indication and service catalog is appended at composition
/// time, so the directive always matches the code-driven catalog.
const SYSTEM_DIRECTIVE: &str = r#####"
Du er en digital helseassistent kalt Velfie. Din oppgave er å hjelpe brukeren med å finne riktig velferdsteknologi for en pasient. Vær vennlig, konsis og profesjonell, og svar på norsk.

For hver melding fra brukeren skal du:
1. Tolke svaret og avgjøre hvilke indikasjoner det bekrefter eller avkrefter.
2. Skrive en kort, naturlig respons til brukeren. Ikke røp hvilke tjenester du vurderer før alle indikasjoner er avklart.

Du skal returnere KUN ett JSON-objekt, uten annen tekst eller formatering rundt:

{"reply": "<din respons til brukeren>", "updates": [{"indication": "<indikasjonsnavn>", "value": true|false}]}

Regler:
- "updates" skal bare inneholde indikasjoner brukerens siste melding faktisk sier noe om. Er meldingen tvetydig, lar du indikasjonen stå ubesvart.
- For alder: "value" er true når pasienten er over 18 år.
- Still aldri mer enn ett spørsmål i "reply". Applikasjonen holder selv rede på hvilke spørsmål som gjenstår.
"#####;

/// Build the full system directive: persona plus serialized catalog.
pub fn system_directive() -> String {
    let mut directive = String::from(SYSTEM_DIRECTIVE);

    directive.push_str("\nIndikasjoner (navn: betydning):\n");
    for indication in Indication::ALL {
        directive.push_str(&format!("- {}: {}\n", indication.wire_name(), indication.label()));
    }

    directive.push_str("\nTjenester (indikasjoner -> tjeneste):\n");
    for service in catalog::lookup_all() {
        let required = service.required.iter().map(|i| i.wire_name()).collect::<Vec<_>>().join(", ");
        directive.push_str(&format!("- {}: krever {}. Oppfølgingsspørsmål: \"{}\". {}\n", service.name, required, service.follow_up, service.description));
    }

    directive
}

/// Compose the message sequence for one LLM turn: the system directive
/// followed by the replayed transcript (which already ends with the newest
/// user turn). Pure function of session state.
pub fn compose(transcript: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);

    messages.push(ChatMessage::system(system_directive()));
    messages.extend(transcript.iter().cloned());

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::types::ChatRole;

    #[test]
    fn directive_serializes_the_whole_catalog() {
        let directive = system_directive();

        for service in catalog::lookup_all() {
            assert!(directive.contains(service.name));
            assert!(directive.contains(service.follow_up));
        }

        for indication in Indication::ALL {
            assert!(directive.contains(indication.wire_name()));
        }
    }

    #[test]
    fn compose_prepends_the_directive_and_preserves_order() {
        let transcript = vec![ChatMessage::user("Pasienten har fallfare"), ChatMessage::assistant("Takk!"), ChatMessage::user("Ja")];

        let messages = compose(&transcript);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].text, "Pasienten har fallfare");
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(messages[3].text, "Ja");
    }
}
