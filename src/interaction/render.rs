//! Recommendation cards and media-placeholder substitution.

use crate::base::catalog::{self, Media, MediaStrategy, ServiceDefinition};

/// Placeholder token the card template (and the model) use for embeddable media.
pub const MEDIA_PLACEHOLDER: &str = "{video_html}";

const CARDS_HEADER: &str = "📌 **Anbefalte tjenester basert på din informasjon:**";

const NO_MATCH_REPLY: &str = "Ut fra opplysningene er det ingen av tjenestene våre som passer akkurat nå. Ta gjerne kontakt med kommunen for en individuell vurdering.";

/// Render one recommendation card per matched service.
///
/// Cards for services with media carry the placeholder token; concrete embeds
/// are filled in by [`substitute_media`].
pub fn render_cards(matched: &[&'static ServiceDefinition]) -> String {
    if matched.is_empty() {
        return NO_MATCH_REPLY.to_string();
    }

    let mut blocks = Vec::with_capacity(matched.len() + 1);
    blocks.push(CARDS_HEADER.to_string());

    for service in matched {
        let indications = service.required.iter().map(|indication| indication.label()).collect::<Vec<_>>().join(", ");
        let media_slot = if service.media.is_some() { format!("\n    {MEDIA_PLACEHOLDER}") } else { String::new() };

        blocks.push(format!(
            r#"<div class="recommendation-card">
    <h3>📌 {name}</h3>
    <p><strong>Indikasjoner:</strong> {indications}</p>
    <p>ℹ️ <strong>Beskrivelse:</strong> {description}</p>
    <a href="{link}" class="btn-link" target="_blank" rel="noopener">🔗 Les mer</a>{media_slot}
</div>"#,
            name = service.name,
            indications = indications,
            description = service.description,
            link = service.link,
            media_slot = media_slot,
        ));
    }

    blocks.join("\n\n")
}

/// Substitute each media placeholder with the embed of the first service
/// mentioned in its block (the text since the previous placeholder).
///
/// A block without any known service mention loses its token; text without
/// placeholders passes through unchanged. One pass leaves no token behind,
/// so the substitution is idempotent.
pub fn substitute_media(text: &str, strategy: MediaStrategy) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest_start = 0;

    while let Some(found) = text[rest_start..].find(MEDIA_PLACEHOLDER) {
        let at = rest_start + found;
        let block = &text[rest_start..at];

        out.push_str(block);

        if let Some(media) = first_media_mention(block) {
            out.push_str(&embed_html(media, strategy));
        }

        rest_start = at + MEDIA_PLACEHOLDER.len();
    }

    out.push_str(&text[rest_start..]);

    out
}

/// Earliest case-insensitive media match-key occurrence in the block.
fn first_media_mention(block: &str) -> Option<&'static Media> {
    let lowered = block.to_lowercase();

    catalog::lookup_all()
        .iter()
        .filter_map(|service| service.media.as_ref())
        .filter_map(|media| lowered.find(media.match_key).map(|position| (position, media)))
        .min_by_key(|(position, _)| *position)
        .map(|(_, media)| media)
}

fn embed_html(media: &Media, strategy: MediaStrategy) -> String {
    match strategy {
        MediaStrategy::Youtube => format!(r#"<iframe class="youtube-video" src="{}" allowfullscreen></iframe>"#, media.youtube_embed),
        MediaStrategy::Local => format!(
            "<video class=\"video-thumbnail\" controls>\n        <source src=\"{}\" type=\"video/mp4\">\n    </video>",
            media.local_asset
        ),
    }
}
