use crate::models::TranscriptMessage;

/// Flatten a dialogue into `"<speaker> said: <content>, "` segments
///
/// Turns without content are skipped entirely; order is preserved and
/// nothing is truncated.
pub fn normalize_transcript(messages: &[TranscriptMessage]) -> String {
    let mut text = String::new();

    for message in messages {
        let Some(content) = &message.content else {
            continue;
        };
        text.push_str(message.role.speaker());
        text.push_str(" said: ");
        text.push_str(content);
        text.push_str(", ");
    }

    text
}
